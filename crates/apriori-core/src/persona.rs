use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    Urban,
    Rural,
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Urban => write!(f, "Urban"),
            Zone::Rural => write!(f, "Rural"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PurchasingPowerTier {
    High,
    Mid,
    Low,
}

impl std::fmt::Display for PurchasingPowerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchasingPowerTier::High => write!(f, "High"),
            PurchasingPowerTier::Mid => write!(f, "Mid"),
            PurchasingPowerTier::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Device {
    Android,
    #[serde(rename = "iPhone")]
    IPhone,
    Desktop,
    #[serde(rename = "Feature Phone")]
    FeaturePhone,
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Android => write!(f, "Android"),
            Device::IPhone => write!(f, "iPhone"),
            Device::Desktop => write!(f, "Desktop"),
            Device::FeaturePhone => write!(f, "Feature Phone"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScamVulnerability {
    High,
    Low,
}

/// A synthetic consumer profile after psychographic enrichment.
///
/// Personas are immutable once hydrated; nothing downstream mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub uuid: String,
    /// Free-text occupation as it appears in the source dataset,
    /// e.g. `"Manager, Export"`.
    pub occupation: String,
    pub state: String,
    pub zone: Zone,
    pub age: u32,
    /// Self-reported comfort with digital products, `0..=10`.
    pub digital_literacy: u8,
    pub purchasing_power_tier: PurchasingPowerTier,
    pub primary_device: Device,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub scam_vulnerability: Option<ScamVulnerability>,
    #[serde(default)]
    pub monthly_income_inr: Option<u32>,
}

//! Deterministic partition of personas into behavioral clusters.
//!
//! Personas whose occupation falls in a distinctive category (trade,
//! freelance, consulting) are grouped by age band and occupation; everyone
//! else is grouped by zone and purchasing-power tier.

use std::collections::BTreeMap;

use apriori_core::{ClusterId, Persona};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OccupationCategory {
    ExportManager,
    ImportManager,
    Freelancer,
    Consultant,
    ItProfessional,
    Manager,
    BusinessOwner,
    Professional,
}

impl OccupationCategory {
    /// Identifier used inside cluster keys, e.g. `"Export_Manager"`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            OccupationCategory::ExportManager => "Export_Manager",
            OccupationCategory::ImportManager => "Import_Manager",
            OccupationCategory::Freelancer => "Freelancer",
            OccupationCategory::Consultant => "Consultant",
            OccupationCategory::ItProfessional => "IT_Professional",
            OccupationCategory::Manager => "Manager",
            OccupationCategory::BusinessOwner => "Business_Owner",
            OccupationCategory::Professional => "Professional",
        }
    }

    /// Plural noun used in human-readable segment labels.
    #[must_use]
    pub fn plural(self) -> &'static str {
        match self {
            OccupationCategory::ExportManager => "Export Managers",
            OccupationCategory::ImportManager => "Import Managers",
            OccupationCategory::Freelancer => "Freelancers",
            OccupationCategory::Consultant => "Consultants",
            OccupationCategory::ItProfessional => "IT Professionals",
            OccupationCategory::Manager => "Managers",
            OccupationCategory::BusinessOwner => "Business Owners",
            OccupationCategory::Professional => "Professionals",
        }
    }

    /// Whether personas in this category get their own age×occupation cluster.
    #[must_use]
    pub fn is_distinctive(self) -> bool {
        matches!(
            self,
            OccupationCategory::ExportManager
                | OccupationCategory::ImportManager
                | OccupationCategory::Freelancer
                | OccupationCategory::Consultant
        )
    }
}

/// Lowercase occupation substrings, in priority order. First match wins.
const OCCUPATION_RULES: &[(&str, OccupationCategory)] = &[
    ("export", OccupationCategory::ExportManager),
    ("import", OccupationCategory::ImportManager),
    ("freelanc", OccupationCategory::Freelancer),
    ("consultant", OccupationCategory::Consultant),
    ("software", OccupationCategory::ItProfessional),
    ("developer", OccupationCategory::ItProfessional),
    ("programmer", OccupationCategory::ItProfessional),
    ("information technology", OccupationCategory::ItProfessional),
    ("it professional", OccupationCategory::ItProfessional),
    ("data scientist", OccupationCategory::ItProfessional),
    ("manager", OccupationCategory::Manager),
    ("business owner", OccupationCategory::BusinessOwner),
    ("proprietor", OccupationCategory::BusinessOwner),
    ("entrepreneur", OccupationCategory::BusinessOwner),
    ("founder", OccupationCategory::BusinessOwner),
    ("shop owner", OccupationCategory::BusinessOwner),
    ("trader", OccupationCategory::BusinessOwner),
    ("accountant", OccupationCategory::Professional),
    ("engineer", OccupationCategory::Professional),
    ("lawyer", OccupationCategory::Professional),
    ("advocate", OccupationCategory::Professional),
    ("doctor", OccupationCategory::Professional),
    ("architect", OccupationCategory::Professional),
    ("analyst", OccupationCategory::Professional),
    ("director", OccupationCategory::Professional),
    ("professional", OccupationCategory::Professional),
];

/// Map a free-text occupation to its category, case-insensitively.
#[must_use]
pub fn categorize_occupation(occupation: &str) -> Option<OccupationCategory> {
    let lower = occupation.to_lowercase();
    OCCUPATION_RULES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|&(_, category)| category)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeCategory {
    Youth,
    YoungAdult,
    MiddleAge,
    Senior,
}

impl AgeCategory {
    #[must_use]
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=24 => AgeCategory::Youth,
            25..=34 => AgeCategory::YoungAdult,
            35..=49 => AgeCategory::MiddleAge,
            _ => AgeCategory::Senior,
        }
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            AgeCategory::Youth => "Youth_18-24",
            AgeCategory::YoungAdult => "Young_Adults_25-34",
            AgeCategory::MiddleAge => "Middle_Age_35-49",
            AgeCategory::Senior => "Senior_50+",
        }
    }

    /// Key with underscores replaced, for labels: `"Young Adults 25-34"`.
    #[must_use]
    pub fn label(self) -> String {
        self.key().replace('_', " ")
    }
}

/// Cluster key for a single persona.
#[must_use]
pub fn cluster_id_for(persona: &Persona) -> ClusterId {
    match categorize_occupation(&persona.occupation) {
        Some(category) if category.is_distinctive() => {
            format!(
                "{}_{}",
                AgeCategory::from_age(persona.age).key(),
                category.key()
            )
        }
        _ => format!("{}_{}", persona.zone, persona.purchasing_power_tier),
    }
}

/// Partition personas into clusters. Every persona lands in exactly one.
#[must_use]
pub fn fragment_audience_into_clusters(personas: &[Persona]) -> BTreeMap<ClusterId, Vec<&Persona>> {
    let mut clusters: BTreeMap<ClusterId, Vec<&Persona>> = BTreeMap::new();
    for persona in personas {
        clusters.entry(cluster_id_for(persona)).or_default().push(persona);
    }
    tracing::debug!(
        personas = personas.len(),
        clusters = clusters.len(),
        "fragmented audience into clusters"
    );
    clusters
}

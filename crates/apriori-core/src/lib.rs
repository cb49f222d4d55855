//! Shared data model, dataset loading, and configuration for Apriori.
//!
//! Personas and reactions are produced upstream (persona hydration and LLM
//! simulation); this crate only describes their shape and loads them from
//! disk for the optimizer.

pub mod app_config;
pub mod config;
pub mod dataset;
pub mod journey;
pub mod persona;
pub mod reaction;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use dataset::{
    load_ad_contexts, load_flow_names, load_flow_results, load_personas, load_reactions,
};
pub use journey::FlowJourney;
pub use persona::{Device, Persona, PurchasingPowerTier, ScamVulnerability, Zone};
pub use reaction::{Action, AdContext, IntentLevel, Reaction};

/// Opaque identifier of an ad creative.
pub type AdId = String;

/// Identifier of a derived persona cluster, e.g. `"Urban_High"`.
pub type ClusterId = String;

/// Identifier of a simulated multi-screen flow.
pub type FlowId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("YAML parse error in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported dataset format for {path}; expected .json, .yaml or .yml")]
    UnsupportedFormat { path: String },

    #[error("dataset validation failed: {0}")]
    Validation(String),
}

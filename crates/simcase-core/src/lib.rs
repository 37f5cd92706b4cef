//! Simcase core - shared domain types
//!
//! Plain data passed by value between the import, persistence and archive
//! layers:
//! - Scenario variants and seed structs (the full entity graph of one
//!   scenario before it is persisted)
//! - Fixed catalogs (supplies, materials, physical-exam sections)
//! - The media store contract

pub mod catalog;
mod media;
mod scenario;

pub use media::MediaStore;
pub use scenario::{
    AccessoSeed, ParametroSeed, PazienteT0Seed, RefertoSeed, ScenarioKind, ScenarioSeed,
    TempoSeed, TestiScenario, Vitali,
};

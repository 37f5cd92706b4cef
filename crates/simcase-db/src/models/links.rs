//! Shared rows and their link/join tables.
//!
//! Vascular accesses and key actions are shared, independently-addressable
//! rows: nothing here assumes a row belongs to exactly one scenario. They
//! are removed only when a derived query over the link/join tables shows no
//! remaining reference.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use simcase_core::AccessoSeed;

/// A vascular access (type, site, side, gauge), referenced from the venous
/// and/or arterial link tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 8, version = 1)]
#[native_db]
pub struct StoredAccesso {
    #[primary_key]
    pub id: u32,
    pub tipologia: String,
    pub posizione: String,
    pub lato: String,
    pub misura: i32,
}

impl StoredAccesso {
    /// Build an access row for a seed under a freshly allocated id.
    pub fn from_seed(id: u32, seed: &AccessoSeed) -> Self {
        Self {
            id,
            tipologia: seed.tipologia.clone(),
            posizione: seed.posizione.clone(),
            lato: seed.lato.clone(),
            misura: seed.misura,
        }
    }
}

/// Venous link row: one patient state uses one access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 9, version = 1)]
#[native_db]
pub struct StoredAccessoVenoso {
    #[primary_key]
    pub id: u32,
    /// Patient-state id (equals the scenario id).
    #[secondary_key]
    pub paziente_t0: u32,
    /// Referenced access id.
    #[secondary_key]
    pub accesso: u32,
}

/// Arterial link row: one patient state uses one access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 10, version = 1)]
#[native_db]
pub struct StoredAccessoArterioso {
    #[primary_key]
    pub id: u32,
    /// Patient-state id (equals the scenario id).
    #[secondary_key]
    pub paziente_t0: u32,
    /// Referenced access id.
    #[secondary_key]
    pub accesso: u32,
}

/// A key action from the shared catalog, linked to scenarios via
/// `StoredAzioneScenario` join rows. Created find-or-create by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 11, version = 1)]
#[native_db]
pub struct StoredAzioneChiave {
    #[primary_key]
    pub id: u32,
    #[secondary_key]
    pub nome: String,
}

/// Scenario <-> key action join row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 12, version = 1)]
#[native_db]
pub struct StoredAzioneScenario {
    #[primary_key]
    pub id: u32,
    #[secondary_key]
    pub scenario_id: u32,
    #[secondary_key]
    pub azione_id: u32,
}

/// Scenario <-> material join row. The Materiale catalog itself is fixed
/// and never touched by scenario deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 13, version = 1)]
#[native_db]
pub struct StoredMaterialeScenario {
    #[primary_key]
    pub id: u32,
    #[secondary_key]
    pub scenario_id: u32,
    pub materiale_id: u32,
}

/// Scenario <-> supply join row. The Presidio catalog itself is fixed and
/// never touched by scenario deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 14, version = 1)]
#[native_db]
pub struct StoredPresidioScenario {
    #[primary_key]
    pub id: u32,
    #[secondary_key]
    pub scenario_id: u32,
    pub presidio_id: u32,
}

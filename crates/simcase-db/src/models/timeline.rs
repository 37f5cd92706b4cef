//! Timeline rows for Advanced / PatientSimulated scenarios.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use simcase_core::{ParametroSeed, TempoSeed, Vitali};

/// One timeline step: vitals snapshot, expected action and branch targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 15, version = 1)]
#[native_db]
pub struct StoredTempo {
    #[primary_key]
    pub id: u32,
    #[secondary_key]
    pub scenario_id: u32,
    /// Ordered step index within the scenario.
    pub indice: i32,
    pub vitali: Vitali,
    pub azione: String,
    /// Branch target when the action is performed.
    pub t_si: i32,
    /// Branch target when the action is not performed.
    pub t_no: i32,
    pub altri_dettagli: String,
    /// Step timer, seconds.
    pub timer: i64,
    /// Parent role instructions, pediatric scenarios only.
    pub ruolo_genitore: Option<String>,
}

impl StoredTempo {
    /// Build a timeline row for a seed under a freshly allocated id.
    pub fn from_seed(id: u32, scenario_id: u32, seed: &TempoSeed) -> Self {
        Self {
            id,
            scenario_id,
            indice: seed.indice,
            vitali: seed.vitali.clone(),
            azione: seed.azione.clone(),
            t_si: seed.t_si,
            t_no: seed.t_no,
            altri_dettagli: seed.altri_dettagli.clone(),
            timer: seed.timer,
            ruolo_genitore: seed.ruolo_genitore.clone(),
        }
    }
}

/// A named extra parameter owned exclusively by one timeline step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 16, version = 1)]
#[native_db]
pub struct StoredParametroAggiuntivo {
    #[primary_key]
    pub id: u32,
    #[secondary_key]
    pub tempo_id: u32,
    pub nome: String,
    pub valore: f64,
    pub unita_misura: String,
}

impl StoredParametroAggiuntivo {
    /// Build a parameter row for a seed under a freshly allocated id.
    pub fn from_seed(id: u32, tempo_id: u32, seed: &ParametroSeed) -> Self {
        Self {
            id,
            tempo_id,
            nome: seed.nome.clone(),
            valore: seed.valore,
            unita_misura: seed.unita_misura.clone(),
        }
    }
}

//! Root scenario rows, patient state and exam rows.

use indexmap::IndexMap;
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use simcase_core::{ScenarioKind, ScenarioSeed, Vitali};

/// Root scenario row. Owns every sub-entity via `scenario_id` foreign keys;
/// the variant discriminator is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredScenario {
    /// Primary key - scenario ID.
    #[primary_key]
    pub id: u32,
    /// Variant discriminator.
    pub kind: ScenarioKind,
    pub titolo: String,
    pub nome_paziente: String,
    pub patologia: String,
    pub autori: String,
    /// Overall duration, seconds.
    pub durata: i32,
    /// Patient type tag ("Adulto" / "Pediatrico").
    pub tipologia_paziente: String,
    /// Learning target text.
    pub target: String,
    pub descrizione: String,
    pub briefing: String,
    pub patto_aula: String,
    pub obiettivi_didattici: String,
    pub moulage: String,
    pub liquidi: String,
    /// Pediatric scenarios only.
    pub info_genitore: Option<String>,
}

impl StoredScenario {
    /// Build the root row for a seed under a freshly allocated id.
    pub fn from_seed(id: u32, seed: &ScenarioSeed) -> Self {
        Self {
            id,
            kind: seed.kind,
            titolo: seed.titolo.clone(),
            nome_paziente: seed.nome_paziente.clone(),
            patologia: seed.patologia.clone(),
            autori: seed.autori.clone(),
            durata: seed.durata,
            tipologia_paziente: seed.tipologia_paziente.clone(),
            target: seed.target.clone(),
            descrizione: seed.testi.descrizione.clone(),
            briefing: seed.testi.briefing.clone(),
            patto_aula: seed.testi.patto_aula.clone(),
            obiettivi_didattici: seed.testi.obiettivi_didattici.clone(),
            moulage: seed.testi.moulage.clone(),
            liquidi: seed.testi.liquidi.clone(),
            info_genitore: seed.testi.info_genitore.clone(),
        }
    }
}

/// Extension row marking an Advanced scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredAdvanced {
    /// Primary key - equals the scenario id.
    #[primary_key]
    pub scenario_id: u32,
}

/// Extension row for a PatientSimulated scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct StoredPatientSimulated {
    /// Primary key - equals the scenario id.
    #[primary_key]
    pub scenario_id: u32,
    /// Simulated-patient script text.
    pub sceneggiatura: String,
}

/// Initial (time-zero) patient state, one-to-one with the scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 4, version = 1)]
#[native_db]
pub struct StoredPazienteT0 {
    /// Primary key - equals the scenario id.
    #[primary_key]
    pub id: u32,
    pub vitali: Vitali,
}

/// Physical exam, one-to-one with the scenario: section name -> text over
/// the fixed section list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 5, version = 1)]
#[native_db]
pub struct StoredEsameFisico {
    /// Primary key - equals the scenario id.
    #[primary_key]
    pub scenario_id: u32,
    pub sezioni: IndexMap<String, String>,
}

/// One exam/report record. `media` names a file in the media store; the row
/// references the file, it does not own it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 6, version = 1)]
#[native_db]
pub struct StoredEsameReferto {
    #[primary_key]
    pub id: u32,
    #[secondary_key]
    pub scenario_id: u32,
    pub tipo: String,
    pub media: Option<String>,
    pub referto_testuale: String,
}

/// Id sequence row, one per logical table. Ids are allocated inside the
/// transaction that writes the rows, so a rollback releases them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 7, version = 1)]
#[native_db]
pub struct StoredSequence {
    /// Sequence name.
    #[primary_key]
    pub name: String,
    /// Next id to hand out.
    pub next: u32,
}

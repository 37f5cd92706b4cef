//! Scenario seed types.
//!
//! A `ScenarioSeed` is the complete, self-contained description of one
//! scenario and all of its sub-entities, built by the importer and written
//! by the store in a single transaction. Nothing here touches persistence.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Scenario variant discriminator. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Minimal scenario: no timeline.
    Quick,
    /// Full scenario with a branching timeline.
    Advanced,
    /// Advanced plus a simulated-patient script.
    PatientSimulated,
}

impl ScenarioKind {
    /// Manifest label for this variant.
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioKind::Quick => "Quick Scenario",
            ScenarioKind::Advanced => "Advanced Scenario",
            ScenarioKind::PatientSimulated => "Patient Simulated Scenario",
        }
    }

    /// Parse a manifest label. Returns `None` for unknown labels.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Quick Scenario" => Some(ScenarioKind::Quick),
            "Advanced Scenario" => Some(ScenarioKind::Advanced),
            "Patient Simulated Scenario" => Some(ScenarioKind::PatientSimulated),
            _ => None,
        }
    }

    /// Whether this variant carries timeline steps.
    pub fn has_tempi(&self) -> bool {
        matches!(self, ScenarioKind::Advanced | ScenarioKind::PatientSimulated)
    }
}

/// One snapshot of vital signs. Used for the initial patient state and for
/// every timeline step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitali {
    /// Blood pressure, free text ("120/80").
    pub pa: String,
    /// Heart rate, beats per minute.
    pub fc: i32,
    /// Respiratory rate, breaths per minute.
    pub rr: i32,
    /// Body temperature, degrees Celsius.
    pub t: f64,
    /// Peripheral oxygen saturation, percent.
    pub spo2: i32,
    /// Inspired oxygen fraction, percent.
    pub fio2: i32,
    /// Supplemental oxygen, litres per minute.
    pub litri_o2: f64,
    /// End-tidal CO2, mmHg.
    pub etco2: i32,
    /// Monitor display text.
    pub monitor: String,
}

/// A vascular access (venous or arterial depending on which list carries it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoSeed {
    /// Access type ("Periferico", "Centrale", ...).
    pub tipologia: String,
    /// Anatomical site.
    pub posizione: String,
    /// Side ("DX" / "SX").
    pub lato: String,
    /// Gauge.
    pub misura: i32,
}

/// Initial patient state: time-zero vitals plus vascular accesses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PazienteT0Seed {
    pub vitali: Vitali,
    pub accessi_venosi: Vec<AccessoSeed>,
    pub accessi_arteriosi: Vec<AccessoSeed>,
}

/// A named extra parameter attached to one timeline step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametroSeed {
    pub nome: String,
    pub valore: f64,
    pub unita_misura: String,
}

/// One timeline step of an Advanced / PatientSimulated scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TempoSeed {
    /// Ordered step index within the scenario.
    pub indice: i32,
    pub vitali: Vitali,
    /// Expected action text.
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
    pub parametri: Vec<ParametroSeed>,
}

/// One exam/report record. `media` names a file in the media store; the
/// record does not own the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefertoSeed {
    pub tipo: String,
    pub media: Option<String>,
    pub referto_testuale: String,
}

/// Free-text sections of a scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestiScenario {
    pub descrizione: String,
    pub briefing: String,
    pub patto_aula: String,
    pub obiettivi_didattici: String,
    pub moulage: String,
    pub liquidi: String,
    /// Present only for pediatric scenarios.
    pub info_genitore: Option<String>,
}

/// Complete description of one scenario to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSeed {
    pub kind: ScenarioKind,
    pub titolo: String,
    pub nome_paziente: String,
    pub patologia: String,
    pub autori: String,
    /// Overall duration, seconds.
    pub durata: i32,
    /// Patient type tag ("Adulto" / "Pediatrico").
    pub tipologia_paziente: String,
    /// Learning target description.
    pub target: String,
    pub testi: TestiScenario,
    /// Key-action names, resolved find-or-create against the shared catalog.
    pub azioni_chiave: Vec<String>,
    /// Materiale catalog ids.
    pub materiali: Vec<u32>,
    /// Presidio catalog ids (already resolved from names).
    pub presidi: Vec<u32>,
    /// Section name -> text, over the fixed section list.
    pub esame_fisico: IndexMap<String, String>,
    pub paziente_t0: PazienteT0Seed,
    pub referti: Vec<RefertoSeed>,
    /// Empty for Quick scenarios.
    pub tempi: Vec<TempoSeed>,
    /// Simulated-patient script, PatientSimulated only.
    pub sceneggiatura: Option<String>,
}

impl ScenarioSeed {
    /// Empty seed of the given variant, for incremental construction.
    pub fn new(kind: ScenarioKind) -> Self {
        Self {
            kind,
            titolo: String::new(),
            nome_paziente: String::new(),
            patologia: String::new(),
            autori: String::new(),
            durata: 0,
            tipologia_paziente: String::new(),
            target: String::new(),
            testi: TestiScenario::default(),
            azioni_chiave: Vec::new(),
            materiali: Vec::new(),
            presidi: Vec::new(),
            esame_fisico: IndexMap::new(),
            paziente_t0: PazienteT0Seed::default(),
            referti: Vec::new(),
            tempi: Vec::new(),
            sceneggiatura: None,
        }
    }

    /// Whether the patient type tag marks this scenario as pediatric.
    pub fn pediatrico(&self) -> bool {
        self.tipologia_paziente.eq_ignore_ascii_case("Pediatrico")
    }

    /// Media filenames referenced by the exam/report records.
    pub fn media_names(&self) -> Vec<String> {
        self.referti.iter().filter_map(|r| r.media.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_roundtrip() {
        for kind in [
            ScenarioKind::Quick,
            ScenarioKind::Advanced,
            ScenarioKind::PatientSimulated,
        ] {
            assert_eq!(ScenarioKind::parse(kind.label()), Some(kind));
        }
    }

    #[test]
    fn test_kind_parse_unknown() {
        assert_eq!(ScenarioKind::parse("Basic Scenario"), None);
        assert_eq!(ScenarioKind::parse(""), None);
    }

    #[test]
    fn test_has_tempi() {
        assert!(!ScenarioKind::Quick.has_tempi());
        assert!(ScenarioKind::Advanced.has_tempi());
        assert!(ScenarioKind::PatientSimulated.has_tempi());
    }

    #[test]
    fn test_pediatrico_tag() {
        let mut seed = ScenarioSeed::new(ScenarioKind::Quick);
        assert!(!seed.pediatrico());
        seed.tipologia_paziente = "Pediatrico".to_string();
        assert!(seed.pediatrico());
        seed.tipologia_paziente = "pediatrico".to_string();
        assert!(seed.pediatrico());
    }

    #[test]
    fn test_media_names_skips_recordless() {
        let mut seed = ScenarioSeed::new(ScenarioKind::Quick);
        seed.referti = vec![
            RefertoSeed {
                tipo: "ECG".to_string(),
                media: Some("ecg.png".to_string()),
                referto_testuale: String::new(),
            },
            RefertoSeed {
                tipo: "Emogas".to_string(),
                media: None,
                referto_testuale: "pH 7.21".to_string(),
            },
        ];
        assert_eq!(seed.media_names(), vec!["ecg.png".to_string()]);
    }
}

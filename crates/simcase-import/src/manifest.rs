//! Lenient accessors over the untrusted JSON manifest.
//!
//! The manifest is kept as a generic `serde_json::Value`: fields a variant
//! does not use are never read, missing text defaults to empty, missing
//! numerics default to zero, and integer vitals truncate (never round)
//! whether they arrive as numbers or numeric strings.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde_json::Value;
use simcase_core::{
    AccessoSeed, ParametroSeed, RefertoSeed, ScenarioKind, ScenarioSeed, TempoSeed, Vitali,
};

/// A parsed scenario manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    root: Value,
}

impl Manifest {
    /// Parse manifest bytes as JSON.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let root: Value = serde_json::from_slice(bytes)?;
        Ok(Self { root })
    }

    /// Wrap an already-parsed JSON value.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Variant discriminator label.
    pub fn tipo(&self) -> Option<&str> {
        self.root.get("tipo").and_then(Value::as_str)
    }

    /// Supply names, to be validated against the fixed catalog.
    pub fn presidi(&self) -> Vec<String> {
        str_list(self.root.get("presidi"))
    }

    /// Material catalog ids from the `materialeNecessario` list. Kept
    /// signed and unvalidated so an out-of-range id reaches the catalog
    /// check as written and the error can name it verbatim.
    pub fn materiali(&self) -> Vec<i64> {
        match self.root.get("materialeNecessario").and_then(Value::as_array) {
            Some(items) => items.iter().map(|item| i64_of(item, "idMateriale")).collect(),
            None => Vec::new(),
        }
    }

    /// Build the scenario seed for the given variant. Presidio/materiale
    /// associations are left empty; the caller fills them after catalog
    /// validation.
    pub fn seed(&self, kind: ScenarioKind) -> Result<ScenarioSeed> {
        let scenario = self
            .root
            .get("scenario")
            .filter(|v| v.is_object())
            .ok_or(Error::MissingField("scenario"))?;

        let mut seed = ScenarioSeed::new(kind);
        seed.titolo = str_of(scenario, "titolo");
        seed.nome_paziente = str_of(scenario, "nomePaziente");
        seed.patologia = str_of(scenario, "patologia");
        seed.autori = str_of(scenario, "autori");
        seed.durata = i32_of(scenario, "durata");
        seed.tipologia_paziente = str_of(scenario, "tipologiaPaziente");
        seed.target = str_of(scenario, "target");

        seed.testi.descrizione = str_of(scenario, "descrizione");
        seed.testi.briefing = str_of(scenario, "briefing");
        seed.testi.patto_aula = str_of(scenario, "pattoAula");
        seed.testi.obiettivi_didattici = str_of(scenario, "obiettivi");
        seed.testi.moulage = str_of(scenario, "moulage");
        seed.testi.liquidi = str_of(scenario, "liquidi");
        // parent info exists only for pediatric scenarios
        if seed.pediatrico() {
            seed.testi.info_genitore = opt_str(scenario, "infoGenitore");
        }

        seed.azioni_chiave = str_list(self.root.get("azioniChiave"));
        seed.esame_fisico = self.esame_fisico();
        seed.referti = self.referti();

        if let Some(t0) = self.root.get("pazienteT0") {
            seed.paziente_t0.vitali = vitali_of(t0);
            seed.paziente_t0.accessi_venosi = accessi_of(t0.get("accessiVenosi"));
            seed.paziente_t0.accessi_arteriosi = accessi_of(t0.get("accessiArteriosi"));
        }

        if kind.has_tempi() {
            seed.tempi = self.tempi(seed.pediatrico());
        }
        if kind == ScenarioKind::PatientSimulated {
            seed.sceneggiatura = opt_str(&self.root, "sceneggiatura");
        }
        Ok(seed)
    }

    fn esame_fisico(&self) -> IndexMap<String, String> {
        let sections = self
            .root
            .get("esameFisico")
            .and_then(|e| e.get("sections"))
            .and_then(Value::as_object);
        match sections {
            Some(map) => map
                .iter()
                .map(|(nome, testo)| {
                    (nome.clone(), testo.as_str().unwrap_or_default().to_string())
                })
                .collect(),
            None => IndexMap::new(),
        }
    }

    fn referti(&self) -> Vec<RefertoSeed> {
        let items = match self.root.get("esamiReferti").and_then(Value::as_array) {
            Some(items) => items,
            None => return Vec::new(),
        };
        items
            .iter()
            .map(|item| RefertoSeed {
                tipo: str_of(item, "tipo"),
                media: opt_str(item, "media"),
                referto_testuale: str_of(item, "refertoTestuale"),
            })
            .collect()
    }

    fn tempi(&self, pediatrico: bool) -> Vec<TempoSeed> {
        let items = match self.root.get("tempi").and_then(Value::as_array) {
            Some(items) => items,
            None => return Vec::new(),
        };
        items
            .iter()
            .map(|item| TempoSeed {
                indice: i32_of(item, "idTempo"),
                vitali: vitali_of(item),
                azione: str_of(item, "Azione"),
                t_si: i32_of(item, "TSi"),
                t_no: i32_of(item, "TNo"),
                altri_dettagli: str_of(item, "altriDettagli"),
                timer: i64_of(item, "timerTempo"),
                ruolo_genitore: if pediatrico {
                    opt_str(item, "ruoloGenitore")
                } else {
                    None
                },
                parametri: parametri_of(item.get("parametriAggiuntivi")),
            })
            .collect()
    }
}

fn vitali_of(obj: &Value) -> Vitali {
    Vitali {
        pa: str_of(obj, "PA"),
        fc: i32_of(obj, "FC"),
        rr: i32_of(obj, "RR"),
        t: f64_of(obj, "T"),
        spo2: i32_of(obj, "SpO2"),
        fio2: i32_of(obj, "FiO2"),
        litri_o2: f64_of(obj, "litriO2"),
        etco2: i32_of(obj, "EtCO2"),
        monitor: str_of(obj, "monitor"),
    }
}

fn accessi_of(value: Option<&Value>) -> Vec<AccessoSeed> {
    let items = match value.and_then(Value::as_array) {
        Some(items) => items,
        None => return Vec::new(),
    };
    items
        .iter()
        .map(|item| AccessoSeed {
            tipologia: str_of(item, "tipologia"),
            posizione: str_of(item, "posizione"),
            lato: str_of(item, "lato"),
            misura: i32_of(item, "misura"),
        })
        .collect()
}

fn parametri_of(value: Option<&Value>) -> Vec<ParametroSeed> {
    let items = match value.and_then(Value::as_array) {
        Some(items) => items,
        None => return Vec::new(),
    };
    items
        .iter()
        .map(|item| ParametroSeed {
            nome: str_of(item, "nome"),
            valore: f64_of(item, "valore"),
            unita_misura: str_of(item, "unitaMisura"),
        })
        .collect()
}

fn str_of(obj: &Value, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn opt_str(obj: &Value, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn str_list(value: Option<&Value>) -> Vec<String> {
    match value.and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

/// Numeric field as f64: a JSON number, or a numeric string. Missing or
/// malformed values default to zero.
fn f64_of(obj: &Value, key: &str) -> f64 {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    }
}

/// Integer field: truncates, never rounds.
fn i32_of(obj: &Value, key: &str) -> i32 {
    f64_of(obj, key).trunc() as i32
}

fn i64_of(obj: &Value, key: &str) -> i64 {
    f64_of(obj, key).trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_truncation_not_rounding() {
        let obj = json!({ "FC": 99.9, "RR": "17.8", "T": 36.6 });
        assert_eq!(i32_of(&obj, "FC"), 99);
        assert_eq!(i32_of(&obj, "RR"), 17);
        assert_eq!(f64_of(&obj, "T"), 36.6);
    }

    #[test]
    fn test_missing_numerics_default_to_zero() {
        let obj = json!({});
        assert_eq!(i32_of(&obj, "FC"), 0);
        assert_eq!(f64_of(&obj, "T"), 0.0);
        assert_eq!(i64_of(&obj, "idMateriale"), 0);
    }

    #[test]
    fn test_malformed_numeric_string_defaults() {
        let obj = json!({ "FC": "alta" });
        assert_eq!(i32_of(&obj, "FC"), 0);
    }

    #[test]
    fn test_seed_requires_scenario_section() {
        let manifest = Manifest::from_value(json!({ "tipo": "Quick Scenario" }));
        let err = manifest.seed(ScenarioKind::Quick).unwrap_err();
        assert!(matches!(err, Error::MissingField("scenario")));
    }

    #[test]
    fn test_seed_reads_header_and_vitals() {
        let manifest = Manifest::from_value(json!({
            "tipo": "Quick Scenario",
            "scenario": {
                "titolo": "Trauma toracico",
                "nomePaziente": "Luca Verdi",
                "patologia": "Pneumotorace",
                "autori": "A. Neri",
                "durata": 600,
                "tipologiaPaziente": "Adulto",
                "target": "Specializzandi",
                "descrizione": "Incidente stradale"
            },
            "pazienteT0": {
                "PA": "90/60",
                "FC": "128",
                "RR": 28.7,
                "SpO2": 88,
                "accessiVenosi": [
                    { "tipologia": "Periferico", "posizione": "Avambraccio",
                      "lato": "DX", "misura": 18 }
                ]
            }
        }));

        let seed = manifest.seed(ScenarioKind::Quick).unwrap();
        assert_eq!(seed.titolo, "Trauma toracico");
        assert_eq!(seed.durata, 600);
        assert_eq!(seed.paziente_t0.vitali.pa, "90/60");
        // numeric string, truncated integer
        assert_eq!(seed.paziente_t0.vitali.fc, 128);
        assert_eq!(seed.paziente_t0.vitali.rr, 28);
        assert_eq!(seed.paziente_t0.accessi_venosi.len(), 1);
        assert!(seed.paziente_t0.accessi_arteriosi.is_empty());
    }

    #[test]
    fn test_info_genitore_only_for_pediatric() {
        let base = json!({
            "scenario": {
                "tipologiaPaziente": "Adulto",
                "infoGenitore": "Genitore ansioso"
            }
        });
        let seed = Manifest::from_value(base.clone())
            .seed(ScenarioKind::Quick)
            .unwrap();
        assert_eq!(seed.testi.info_genitore, None);

        let mut pediatric = base;
        pediatric["scenario"]["tipologiaPaziente"] = json!("Pediatrico");
        let seed = Manifest::from_value(pediatric)
            .seed(ScenarioKind::Quick)
            .unwrap();
        assert_eq!(
            seed.testi.info_genitore.as_deref(),
            Some("Genitore ansioso")
        );
    }

    #[test]
    fn test_tempi_not_read_for_quick() {
        let manifest = Manifest::from_value(json!({
            "scenario": {},
            "tempi": [ { "idTempo": 1 } ]
        }));
        let seed = manifest.seed(ScenarioKind::Quick).unwrap();
        assert!(seed.tempi.is_empty());

        let seed = manifest.seed(ScenarioKind::Advanced).unwrap();
        assert_eq!(seed.tempi.len(), 1);
    }

    #[test]
    fn test_parametri_numeric_or_string() {
        let manifest = Manifest::from_value(json!({
            "scenario": {},
            "tempi": [{
                "idTempo": 1,
                "parametriAggiuntivi": [
                    { "nome": "Lattati", "valore": 4.2, "unitaMisura": "mmol/L" },
                    { "nome": "Glicemia", "valore": "110", "unitaMisura": "mg/dL" }
                ]
            }]
        }));
        let seed = manifest.seed(ScenarioKind::Advanced).unwrap();
        let parametri = &seed.tempi[0].parametri;
        assert_eq!(parametri[0].valore, 4.2);
        assert_eq!(parametri[1].valore, 110.0);
    }

    #[test]
    fn test_materiali_ids() {
        let manifest = Manifest::from_value(json!({
            "materialeNecessario": [ { "idMateriale": 1 }, { "idMateriale": 4 } ]
        }));
        assert_eq!(manifest.materiali(), vec![1, 4]);
    }

    #[test]
    fn test_materiali_ids_keep_sign() {
        // a bad id must survive parsing as written; validation reports it
        let manifest = Manifest::from_value(json!({
            "materialeNecessario": [ { "idMateriale": -3 }, { "idMateriale": 2 } ]
        }));
        assert_eq!(manifest.materiali(), vec![-3, 2]);
    }
}

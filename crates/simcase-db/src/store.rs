//! Database store wrapper and the transactional scenario-creation pipeline.

use crate::error::{Error, Result};
use crate::models::*;
use native_db::transaction::RwTransaction;
use native_db::*;
use simcase_core::ScenarioSeed;
use std::path::Path;
use std::sync::LazyLock;

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredScenario>().unwrap();
    models.define::<StoredAdvanced>().unwrap();
    models.define::<StoredPatientSimulated>().unwrap();
    models.define::<StoredPazienteT0>().unwrap();
    models.define::<StoredEsameFisico>().unwrap();
    models.define::<StoredEsameReferto>().unwrap();
    models.define::<StoredSequence>().unwrap();
    models.define::<StoredAccesso>().unwrap();
    models.define::<StoredAccessoVenoso>().unwrap();
    models.define::<StoredAccessoArterioso>().unwrap();
    models.define::<StoredAzioneChiave>().unwrap();
    models.define::<StoredAzioneScenario>().unwrap();
    models.define::<StoredMaterialeScenario>().unwrap();
    models.define::<StoredPresidioScenario>().unwrap();
    models.define::<StoredTempo>().unwrap();
    models.define::<StoredParametroAggiuntivo>().unwrap();
    models
});

// Sequence names, one per table with allocated ids.
pub(crate) const SEQ_SCENARIO: &str = "scenario";
pub(crate) const SEQ_ACCESSO: &str = "accesso";
pub(crate) const SEQ_ACCESSO_VENOSO: &str = "accesso_venoso";
pub(crate) const SEQ_ACCESSO_ARTERIOSO: &str = "accesso_arterioso";
pub(crate) const SEQ_AZIONE_CHIAVE: &str = "azione_chiave";
pub(crate) const SEQ_AZIONE_SCENARIO: &str = "azione_scenario";
pub(crate) const SEQ_MATERIALE_SCENARIO: &str = "materiale_scenario";
pub(crate) const SEQ_PRESIDIO_SCENARIO: &str = "presidio_scenario";
pub(crate) const SEQ_ESAME_REFERTO: &str = "esame_referto";
pub(crate) const SEQ_TEMPO: &str = "tempo";
pub(crate) const SEQ_PARAMETRO: &str = "parametro_aggiuntivo";

/// Database store for scenario persistence.
pub struct Store {
    pub(crate) db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Persist a complete scenario seed in one transaction.
    ///
    /// Runs the fixed [`IMPORT_STEPS`] sequence; any step failure drops the
    /// transaction, rolling back every row including the root. Returns the
    /// new scenario id.
    pub fn create_scenario(&self, seed: &ScenarioSeed) -> Result<u32> {
        self.create_scenario_with_steps(seed, IMPORT_STEPS)
    }

    pub(crate) fn create_scenario_with_steps(
        &self,
        seed: &ScenarioSeed,
        steps: &[(&'static str, ImportStep)],
    ) -> Result<u32> {
        let rw = self.db.rw_transaction()?;
        let mut ctx = ImportCtx {
            seed,
            scenario_id: 0,
        };
        for (name, step) in steps {
            // any step error drops the transaction: full rollback, no
            // dangling root row
            let rows = step(&rw, &mut ctx)?;
            tracing::debug!(step = *name, rows, "import step");
        }
        rw.commit()?;
        tracing::debug!(scenario_id = ctx.scenario_id, "scenario created");
        Ok(ctx.scenario_id)
    }
}

/// Allocate the next id from a named sequence, inside the caller's
/// transaction.
pub(crate) fn next_id(rw: &RwTransaction, name: &str) -> Result<u32> {
    let seq: Option<StoredSequence> = rw.get().primary(name.to_string())?;
    let next = seq.map(|s| s.next).unwrap_or(1);
    rw.upsert(StoredSequence {
        name: name.to_string(),
        next: next + 1,
    })?;
    Ok(next)
}

/// State threaded through the import steps.
pub(crate) struct ImportCtx<'a> {
    pub(crate) seed: &'a ScenarioSeed,
    /// Set by the first step; zero until then.
    pub(crate) scenario_id: u32,
}

pub(crate) type ImportStep = fn(&RwTransaction<'_>, &mut ImportCtx<'_>) -> Result<u64>;

/// Scenario-creation steps, in the order they must run. The step order is
/// data so tests can assert it and so it cannot be silently reordered.
pub(crate) const IMPORT_STEPS: &[(&str, ImportStep)] = &[
    ("scenario", step_scenario),
    ("azioni_chiave", step_azioni_chiave),
    ("materiali", step_materiali),
    ("presidi", step_presidi),
    ("esame_fisico", step_esame_fisico),
    ("paziente_t0", step_paziente_t0),
    ("esami_referti", step_esami_referti),
    ("tempi", step_tempi),
    ("estensione_variante", step_estensione_variante),
];

/// Create the root row: header fields, target and free-text sections.
fn step_scenario(rw: &RwTransaction, ctx: &mut ImportCtx) -> Result<u64> {
    let id = next_id(rw, SEQ_SCENARIO)?;
    if id == 0 {
        return Err(Error::CreationFailed);
    }
    rw.insert(StoredScenario::from_seed(id, ctx.seed))?;
    ctx.scenario_id = id;
    Ok(1)
}

/// Replace-all key-action association, with orphan cleanup of the shared
/// catalog in the same call.
fn step_azioni_chiave(rw: &RwTransaction, ctx: &mut ImportCtx) -> Result<u64> {
    set_azioni_chiave(rw, ctx.scenario_id, &ctx.seed.azioni_chiave)
}

fn step_materiali(rw: &RwTransaction, ctx: &mut ImportCtx) -> Result<u64> {
    for materiale_id in &ctx.seed.materiali {
        let id = next_id(rw, SEQ_MATERIALE_SCENARIO)?;
        rw.insert(StoredMaterialeScenario {
            id,
            scenario_id: ctx.scenario_id,
            materiale_id: *materiale_id,
        })?;
    }
    Ok(ctx.seed.materiali.len() as u64)
}

fn step_presidi(rw: &RwTransaction, ctx: &mut ImportCtx) -> Result<u64> {
    for presidio_id in &ctx.seed.presidi {
        let id = next_id(rw, SEQ_PRESIDIO_SCENARIO)?;
        rw.insert(StoredPresidioScenario {
            id,
            scenario_id: ctx.scenario_id,
            presidio_id: *presidio_id,
        })?;
    }
    Ok(ctx.seed.presidi.len() as u64)
}

/// One row over the fixed section list; sections missing from the seed
/// default to empty text.
fn step_esame_fisico(rw: &RwTransaction, ctx: &mut ImportCtx) -> Result<u64> {
    let sezioni = simcase_core::catalog::ESAME_FISICO_SEZIONI
        .iter()
        .map(|&nome| {
            let testo = ctx.seed.esame_fisico.get(nome).cloned().unwrap_or_default();
            (nome.to_string(), testo)
        })
        .collect();
    rw.insert(StoredEsameFisico {
        scenario_id: ctx.scenario_id,
        sezioni,
    })?;
    Ok(1)
}

/// Initial patient state plus venous/arterial access rows and link rows.
fn step_paziente_t0(rw: &RwTransaction, ctx: &mut ImportCtx) -> Result<u64> {
    let t0 = &ctx.seed.paziente_t0;
    rw.insert(StoredPazienteT0 {
        id: ctx.scenario_id,
        vitali: t0.vitali.clone(),
    })?;
    let mut rows = 1u64;

    for seed in &t0.accessi_venosi {
        let accesso_id = next_id(rw, SEQ_ACCESSO)?;
        rw.insert(StoredAccesso::from_seed(accesso_id, seed))?;
        let link_id = next_id(rw, SEQ_ACCESSO_VENOSO)?;
        rw.insert(StoredAccessoVenoso {
            id: link_id,
            paziente_t0: ctx.scenario_id,
            accesso: accesso_id,
        })?;
        rows += 2;
    }
    for seed in &t0.accessi_arteriosi {
        let accesso_id = next_id(rw, SEQ_ACCESSO)?;
        rw.insert(StoredAccesso::from_seed(accesso_id, seed))?;
        let link_id = next_id(rw, SEQ_ACCESSO_ARTERIOSO)?;
        rw.insert(StoredAccessoArterioso {
            id: link_id,
            paziente_t0: ctx.scenario_id,
            accesso: accesso_id,
        })?;
        rows += 2;
    }
    Ok(rows)
}

fn step_esami_referti(rw: &RwTransaction, ctx: &mut ImportCtx) -> Result<u64> {
    for seed in &ctx.seed.referti {
        let id = next_id(rw, SEQ_ESAME_REFERTO)?;
        rw.insert(StoredEsameReferto {
            id,
            scenario_id: ctx.scenario_id,
            tipo: seed.tipo.clone(),
            media: seed.media.clone(),
            referto_testuale: seed.referto_testuale.clone(),
        })?;
    }
    Ok(ctx.seed.referti.len() as u64)
}

/// Timeline steps with their additional parameters. Quick scenarios carry
/// no timeline; their `tempi` list is not read.
fn step_tempi(rw: &RwTransaction, ctx: &mut ImportCtx) -> Result<u64> {
    if !ctx.seed.kind.has_tempi() {
        return Ok(0);
    }
    let mut rows = 0u64;
    for tempo in &ctx.seed.tempi {
        let tempo_id = next_id(rw, SEQ_TEMPO)?;
        rw.insert(StoredTempo::from_seed(tempo_id, ctx.scenario_id, tempo))?;
        rows += 1;
        for parametro in &tempo.parametri {
            let id = next_id(rw, SEQ_PARAMETRO)?;
            rw.insert(StoredParametroAggiuntivo::from_seed(id, tempo_id, parametro))?;
            rows += 1;
        }
    }
    Ok(rows)
}

/// Variant extension row: a marker for Advanced, the script text for
/// PatientSimulated, nothing for Quick.
fn step_estensione_variante(rw: &RwTransaction, ctx: &mut ImportCtx) -> Result<u64> {
    match ctx.seed.kind {
        simcase_core::ScenarioKind::Quick => Ok(0),
        simcase_core::ScenarioKind::Advanced => {
            rw.insert(StoredAdvanced {
                scenario_id: ctx.scenario_id,
            })?;
            Ok(1)
        }
        simcase_core::ScenarioKind::PatientSimulated => {
            rw.insert(StoredPatientSimulated {
                scenario_id: ctx.scenario_id,
                sceneggiatura: ctx.seed.sceneggiatura.clone().unwrap_or_default(),
            })?;
            Ok(1)
        }
    }
}

/// Replace the scenario's key-action set with `nomi`, find-or-create the
/// shared catalog rows by name, then drop catalog rows no join row
/// references anymore. Shared between import and future edits so both get
/// identical orphan handling.
pub(crate) fn set_azioni_chiave(
    rw: &RwTransaction,
    scenario_id: u32,
    nomi: &[String],
) -> Result<u64> {
    let mut rows = 0u64;

    // Drop the scenario's existing join rows (replace-all semantics).
    let existing: Vec<StoredAzioneScenario> = {
        let scan = rw
            .scan()
            .secondary::<StoredAzioneScenario>(StoredAzioneScenarioKey::scenario_id)?;
        let iter = scan.start_with(scenario_id)?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    for row in existing {
        rw.remove(row)?;
        rows += 1;
    }

    // Find-or-create each named action and link it.
    for nome in nomi {
        let found: Option<StoredAzioneChiave> = {
            let scan = rw
                .scan()
                .secondary::<StoredAzioneChiave>(StoredAzioneChiaveKey::nome)?;
            let iter = scan.start_with(nome.as_str())?;
            let mut exact = None;
            for item in iter {
                let azione = item?;
                if azione.nome == *nome {
                    exact = Some(azione);
                    break;
                }
            }
            exact
        };
        let azione_id = match found {
            Some(azione) => azione.id,
            None => {
                let id = next_id(rw, SEQ_AZIONE_CHIAVE)?;
                rw.insert(StoredAzioneChiave {
                    id,
                    nome: nome.clone(),
                })?;
                rows += 1;
                id
            }
        };
        let join_id = next_id(rw, SEQ_AZIONE_SCENARIO)?;
        rw.insert(StoredAzioneScenario {
            id: join_id,
            scenario_id,
            azione_id,
        })?;
        rows += 1;
    }

    rows += remove_azioni_chiave_orfane(rw)?;
    Ok(rows)
}

/// Drop key actions no join row references. A derived query over the join
/// table, never a counter.
pub(crate) fn remove_azioni_chiave_orfane(rw: &RwTransaction) -> Result<u64> {
    let azioni: Vec<StoredAzioneChiave> = {
        let scan = rw.scan().primary::<StoredAzioneChiave>()?;
        let iter = scan.all()?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    let mut removed = 0u64;
    for azione in azioni {
        let referenced = {
            let scan = rw
                .scan()
                .secondary::<StoredAzioneScenario>(StoredAzioneScenarioKey::azione_id)?;
            let mut iter = scan.start_with(azione.id)?;
            iter.next().transpose()?.is_some()
        };
        if !referenced {
            rw.remove(azione)?;
            removed += 1;
        }
    }
    Ok(removed)
}

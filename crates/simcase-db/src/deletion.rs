//! Transactional scenario deletion.
//!
//! All row removal happens in one transaction driven by the fixed
//! [`DELETE_STEPS`] sequence. Media filenames are resolved first, before any
//! row that references them is gone; shared rows (accesses, key actions) are
//! removed only when a derived query over the link/join tables finds no
//! remaining reference, scenario-agnostic by construction.

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::{remove_azioni_chiave_orfane, Store};
use native_db::transaction::RwTransaction;

/// Outcome of a committed deletion: per-step affected-row counts plus the
/// media filenames to remove from the file store.
#[derive(Debug, Clone, Default)]
pub struct DeleteReport {
    pub scenario_id: u32,
    /// Media filenames resolved before any row was deleted.
    pub media: Vec<String>,
    /// (step name, rows affected), in execution order.
    pub steps: Vec<(&'static str, u64)>,
}

impl DeleteReport {
    /// Total rows removed across all steps.
    pub fn rows_removed(&self) -> u64 {
        // the resolve step touches no rows; its count is zero
        self.steps.iter().map(|(_, n)| n).sum()
    }
}

pub(crate) struct DeleteCtx {
    pub(crate) scenario_id: u32,
    pub(crate) media: Vec<String>,
}

pub(crate) type DeleteStep = fn(&RwTransaction<'_>, &mut DeleteCtx) -> Result<u64>;

/// Deletion steps, in the order they must run. Media resolution precedes
/// every removal; orphan checks run after the owning links are gone. The
/// order is data so tests can assert it and so it cannot be silently
/// reordered.
pub(crate) const DELETE_STEPS: &[(&'static str, DeleteStep)] = &[
    ("risolvi_media", step_risolvi_media),
    ("accessi_venosi", step_accessi_venosi),
    ("accessi_arteriosi", step_accessi_arteriosi),
    ("materiali", step_materiali),
    ("accessi_orfani", step_accessi_orfani),
    ("presidi", step_presidi),
    ("azioni_scenario", step_azioni_scenario),
    ("azioni_chiave_orfane", step_azioni_chiave_orfane),
    ("tempi", step_tempi),
    ("estensione_variante", step_estensione_variante),
    ("esami_referti", step_esami_referti),
    ("esame_fisico", step_esame_fisico),
    ("paziente_t0", step_paziente_t0),
    ("scenario", step_scenario),
];

impl Store {
    /// Delete a scenario and everything it exclusively owns, in one
    /// transaction.
    ///
    /// An unknown id fails before any write. On success the returned report
    /// carries the media filenames whose rows are now gone; removing the
    /// files themselves is the caller's post-commit concern (see
    /// [`crate::ScenarioDeleter`]).
    pub fn delete_scenario(&self, scenario_id: u32) -> Result<DeleteReport> {
        self.delete_scenario_with_steps(scenario_id, DELETE_STEPS)
    }

    pub(crate) fn delete_scenario_with_steps(
        &self,
        scenario_id: u32,
        steps: &[(&'static str, DeleteStep)],
    ) -> Result<DeleteReport> {
        let rw = self.db.rw_transaction()?;

        if rw.get().primary::<StoredScenario>(scenario_id)?.is_none() {
            return Err(Error::ScenarioNotFound(scenario_id));
        }

        let mut ctx = DeleteCtx {
            scenario_id,
            media: Vec::new(),
        };
        let mut report = DeleteReport {
            scenario_id,
            ..DeleteReport::default()
        };
        for (name, step) in steps {
            // any step error drops the transaction: full rollback
            let rows = step(&rw, &mut ctx)?;
            tracing::debug!(scenario_id, step = *name, rows, "delete step");
            report.steps.push((*name, rows));
        }
        rw.commit()?;

        report.media = ctx.media;
        tracing::debug!(
            scenario_id,
            rows = report.rows_removed(),
            "scenario deleted"
        );
        Ok(report)
    }
}

/// Collect the media filenames referenced by the scenario's exam/report
/// rows. Must run before those rows are deleted.
fn step_risolvi_media(rw: &RwTransaction, ctx: &mut DeleteCtx) -> Result<u64> {
    let referti: Vec<StoredEsameReferto> = {
        let scan = rw
            .scan()
            .secondary::<StoredEsameReferto>(StoredEsameRefertoKey::scenario_id)?;
        let iter = scan.start_with(ctx.scenario_id)?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    ctx.media = referti.into_iter().filter_map(|r| r.media).collect();
    Ok(0)
}

fn step_accessi_venosi(rw: &RwTransaction, ctx: &mut DeleteCtx) -> Result<u64> {
    let links: Vec<StoredAccessoVenoso> = {
        let scan = rw
            .scan()
            .secondary::<StoredAccessoVenoso>(StoredAccessoVenosoKey::paziente_t0)?;
        let iter = scan.start_with(ctx.scenario_id)?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    let n = links.len() as u64;
    for link in links {
        rw.remove(link)?;
    }
    Ok(n)
}

fn step_accessi_arteriosi(rw: &RwTransaction, ctx: &mut DeleteCtx) -> Result<u64> {
    let links: Vec<StoredAccessoArterioso> = {
        let scan = rw
            .scan()
            .secondary::<StoredAccessoArterioso>(StoredAccessoArteriosoKey::paziente_t0)?;
        let iter = scan.start_with(ctx.scenario_id)?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    let n = links.len() as u64;
    for link in links {
        rw.remove(link)?;
    }
    Ok(n)
}

fn step_materiali(rw: &RwTransaction, ctx: &mut DeleteCtx) -> Result<u64> {
    let rows: Vec<StoredMaterialeScenario> = {
        let scan = rw
            .scan()
            .secondary::<StoredMaterialeScenario>(StoredMaterialeScenarioKey::scenario_id)?;
        let iter = scan.start_with(ctx.scenario_id)?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    let n = rows.len() as u64;
    for row in rows {
        rw.remove(row)?;
    }
    Ok(n)
}

/// Remove accesses no venous or arterial link references anymore. The check
/// runs over the whole link tables, not just this scenario's former links:
/// an access referenced elsewhere survives.
fn step_accessi_orfani(rw: &RwTransaction, _ctx: &mut DeleteCtx) -> Result<u64> {
    let accessi: Vec<StoredAccesso> = {
        let scan = rw.scan().primary::<StoredAccesso>()?;
        let iter = scan.all()?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    let mut removed = 0u64;
    for accesso in accessi {
        let venoso = {
            let scan = rw
                .scan()
                .secondary::<StoredAccessoVenoso>(StoredAccessoVenosoKey::accesso)?;
            let mut iter = scan.start_with(accesso.id)?;
            iter.next().transpose()?.is_some()
        };
        let arterioso = {
            let scan = rw
                .scan()
                .secondary::<StoredAccessoArterioso>(StoredAccessoArteriosoKey::accesso)?;
            let mut iter = scan.start_with(accesso.id)?;
            iter.next().transpose()?.is_some()
        };
        if !venoso && !arterioso {
            rw.remove(accesso)?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn step_presidi(rw: &RwTransaction, ctx: &mut DeleteCtx) -> Result<u64> {
    let rows: Vec<StoredPresidioScenario> = {
        let scan = rw
            .scan()
            .secondary::<StoredPresidioScenario>(StoredPresidioScenarioKey::scenario_id)?;
        let iter = scan.start_with(ctx.scenario_id)?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    let n = rows.len() as u64;
    for row in rows {
        rw.remove(row)?;
    }
    Ok(n)
}

fn step_azioni_scenario(rw: &RwTransaction, ctx: &mut DeleteCtx) -> Result<u64> {
    let rows: Vec<StoredAzioneScenario> = {
        let scan = rw
            .scan()
            .secondary::<StoredAzioneScenario>(StoredAzioneScenarioKey::scenario_id)?;
        let iter = scan.start_with(ctx.scenario_id)?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    let n = rows.len() as u64;
    for row in rows {
        rw.remove(row)?;
    }
    Ok(n)
}

fn step_azioni_chiave_orfane(rw: &RwTransaction, _ctx: &mut DeleteCtx) -> Result<u64> {
    remove_azioni_chiave_orfane(rw)
}

/// Remove the scenario's timeline steps and, for each, its exclusively
/// owned additional parameters.
fn step_tempi(rw: &RwTransaction, ctx: &mut DeleteCtx) -> Result<u64> {
    let tempi: Vec<StoredTempo> = {
        let scan = rw
            .scan()
            .secondary::<StoredTempo>(StoredTempoKey::scenario_id)?;
        let iter = scan.start_with(ctx.scenario_id)?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    let mut removed = 0u64;
    for tempo in tempi {
        let parametri: Vec<StoredParametroAggiuntivo> = {
            let scan = rw
                .scan()
                .secondary::<StoredParametroAggiuntivo>(StoredParametroAggiuntivoKey::tempo_id)?;
            let iter = scan.start_with(tempo.id)?;
            iter.collect::<std::result::Result<Vec<_>, _>>()?
        };
        for parametro in parametri {
            rw.remove(parametro)?;
            removed += 1;
        }
        rw.remove(tempo)?;
        removed += 1;
    }
    Ok(removed)
}

fn step_estensione_variante(rw: &RwTransaction, ctx: &mut DeleteCtx) -> Result<u64> {
    let mut removed = 0u64;
    if let Some(row) = rw.get().primary::<StoredAdvanced>(ctx.scenario_id)? {
        rw.remove(row)?;
        removed += 1;
    }
    if let Some(row) = rw.get().primary::<StoredPatientSimulated>(ctx.scenario_id)? {
        rw.remove(row)?;
        removed += 1;
    }
    Ok(removed)
}

fn step_esami_referti(rw: &RwTransaction, ctx: &mut DeleteCtx) -> Result<u64> {
    let rows: Vec<StoredEsameReferto> = {
        let scan = rw
            .scan()
            .secondary::<StoredEsameReferto>(StoredEsameRefertoKey::scenario_id)?;
        let iter = scan.start_with(ctx.scenario_id)?;
        iter.collect::<std::result::Result<Vec<_>, _>>()?
    };
    let n = rows.len() as u64;
    for row in rows {
        rw.remove(row)?;
    }
    Ok(n)
}

fn step_esame_fisico(rw: &RwTransaction, ctx: &mut DeleteCtx) -> Result<u64> {
    if let Some(row) = rw.get().primary::<StoredEsameFisico>(ctx.scenario_id)? {
        rw.remove(row)?;
        return Ok(1);
    }
    Ok(0)
}

fn step_paziente_t0(rw: &RwTransaction, ctx: &mut DeleteCtx) -> Result<u64> {
    if let Some(row) = rw.get().primary::<StoredPazienteT0>(ctx.scenario_id)? {
        rw.remove(row)?;
        return Ok(1);
    }
    Ok(0)
}

fn step_scenario(rw: &RwTransaction, ctx: &mut DeleteCtx) -> Result<u64> {
    if let Some(row) = rw.get().primary::<StoredScenario>(ctx.scenario_id)? {
        rw.remove(row)?;
        return Ok(1);
    }
    Ok(0)
}

//! Common query patterns for the database.

use crate::error::Result;
use crate::models::*;
use crate::store::Store;

/// Per-type row counts for one scenario id. After a successful deletion
/// every field is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioCounts {
    pub paziente_t0: usize,
    pub esame_fisico: usize,
    pub referti: usize,
    pub tempi: usize,
    pub parametri: usize,
    pub materiali: usize,
    pub presidi: usize,
    pub azioni_scenario: usize,
    pub accessi_venosi: usize,
    pub accessi_arteriosi: usize,
    pub estensione: usize,
}

impl ScenarioCounts {
    /// Total owned sub-entity rows.
    pub fn total(&self) -> usize {
        self.paziente_t0
            + self.esame_fisico
            + self.referti
            + self.tempi
            + self.parametri
            + self.materiali
            + self.presidi
            + self.azioni_scenario
            + self.accessi_venosi
            + self.accessi_arteriosi
            + self.estensione
    }
}

impl Store {
    /// Whether a root scenario row exists.
    pub fn scenario_exists(&self, id: u32) -> Result<bool> {
        let r = self.db.r_transaction()?;
        Ok(r.get().primary::<StoredScenario>(id)?.is_some())
    }

    /// Load a root scenario row.
    pub fn scenario(&self, id: u32) -> Result<Option<StoredScenario>> {
        let r = self.db.r_transaction()?;
        Ok(r.get().primary::<StoredScenario>(id)?)
    }

    /// Total number of scenarios.
    pub fn scenario_count(&self) -> Result<usize> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredScenario>()?;
        let iter = scan.all()?;
        Ok(iter.count())
    }

    /// Load the initial patient state.
    pub fn paziente_t0(&self, scenario_id: u32) -> Result<Option<StoredPazienteT0>> {
        let r = self.db.r_transaction()?;
        Ok(r.get().primary::<StoredPazienteT0>(scenario_id)?)
    }

    /// Load the PatientSimulated extension row.
    pub fn patient_simulated(
        &self,
        scenario_id: u32,
    ) -> Result<Option<StoredPatientSimulated>> {
        let r = self.db.r_transaction()?;
        Ok(r.get().primary::<StoredPatientSimulated>(scenario_id)?)
    }

    /// Load the physical-exam row.
    pub fn esame_fisico(&self, scenario_id: u32) -> Result<Option<StoredEsameFisico>> {
        let r = self.db.r_transaction()?;
        Ok(r.get().primary::<StoredEsameFisico>(scenario_id)?)
    }

    /// Exam/report rows for a scenario.
    pub fn referti_for_scenario(&self, scenario_id: u32) -> Result<Vec<StoredEsameReferto>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredEsameReferto>(StoredEsameRefertoKey::scenario_id)?;
        let iter = scan.start_with(scenario_id)?;
        let rows: std::result::Result<Vec<_>, _> = iter.collect();
        Ok(rows?)
    }

    /// Timeline steps for a scenario, ordered by step index.
    pub fn tempi_for_scenario(&self, scenario_id: u32) -> Result<Vec<StoredTempo>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredTempo>(StoredTempoKey::scenario_id)?;
        let iter = scan.start_with(scenario_id)?;
        let rows: std::result::Result<Vec<_>, _> = iter.collect();
        let mut rows = rows?;
        rows.sort_by_key(|t| t.indice);
        Ok(rows)
    }

    /// Additional parameters attached to one timeline step.
    pub fn parametri_for_tempo(&self, tempo_id: u32) -> Result<Vec<StoredParametroAggiuntivo>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredParametroAggiuntivo>(StoredParametroAggiuntivoKey::tempo_id)?;
        let iter = scan.start_with(tempo_id)?;
        let rows: std::result::Result<Vec<_>, _> = iter.collect();
        Ok(rows?)
    }

    /// Material join rows for a scenario.
    pub fn materiali_for_scenario(
        &self,
        scenario_id: u32,
    ) -> Result<Vec<StoredMaterialeScenario>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredMaterialeScenario>(StoredMaterialeScenarioKey::scenario_id)?;
        let iter = scan.start_with(scenario_id)?;
        let rows: std::result::Result<Vec<_>, _> = iter.collect();
        Ok(rows?)
    }

    /// Supply join rows for a scenario.
    pub fn presidi_for_scenario(&self, scenario_id: u32) -> Result<Vec<StoredPresidioScenario>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredPresidioScenario>(StoredPresidioScenarioKey::scenario_id)?;
        let iter = scan.start_with(scenario_id)?;
        let rows: std::result::Result<Vec<_>, _> = iter.collect();
        Ok(rows?)
    }

    /// Venous link rows for a patient state.
    pub fn accessi_venosi_for_paziente(
        &self,
        paziente_t0: u32,
    ) -> Result<Vec<StoredAccessoVenoso>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredAccessoVenoso>(StoredAccessoVenosoKey::paziente_t0)?;
        let iter = scan.start_with(paziente_t0)?;
        let rows: std::result::Result<Vec<_>, _> = iter.collect();
        Ok(rows?)
    }

    /// Arterial link rows for a patient state.
    pub fn accessi_arteriosi_for_paziente(
        &self,
        paziente_t0: u32,
    ) -> Result<Vec<StoredAccessoArterioso>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredAccessoArterioso>(StoredAccessoArteriosoKey::paziente_t0)?;
        let iter = scan.start_with(paziente_t0)?;
        let rows: std::result::Result<Vec<_>, _> = iter.collect();
        Ok(rows?)
    }

    /// Whether an access row exists.
    pub fn accesso_exists(&self, id: u32) -> Result<bool> {
        let r = self.db.r_transaction()?;
        Ok(r.get().primary::<StoredAccesso>(id)?.is_some())
    }

    /// Total number of access rows, across all scenarios.
    pub fn accessi_count(&self) -> Result<usize> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredAccesso>()?;
        let iter = scan.all()?;
        Ok(iter.count())
    }

    /// Total number of key-action catalog rows.
    pub fn azioni_chiave_count(&self) -> Result<usize> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredAzioneChiave>()?;
        let iter = scan.all()?;
        Ok(iter.count())
    }

    /// Find a key action by exact name.
    pub fn azione_chiave_by_nome(&self, nome: &str) -> Result<Option<StoredAzioneChiave>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredAzioneChiave>(StoredAzioneChiaveKey::nome)?;
        let iter = scan.start_with(nome)?;
        for item in iter {
            let azione = item?;
            if azione.nome == nome {
                return Ok(Some(azione));
            }
        }
        Ok(None)
    }

    /// Key-action join rows for a scenario.
    pub fn azioni_for_scenario(&self, scenario_id: u32) -> Result<Vec<StoredAzioneScenario>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredAzioneScenario>(StoredAzioneScenarioKey::scenario_id)?;
        let iter = scan.start_with(scenario_id)?;
        let rows: std::result::Result<Vec<_>, _> = iter.collect();
        Ok(rows?)
    }

    /// Count every owned sub-entity row for one scenario id.
    pub fn sub_entity_counts(&self, scenario_id: u32) -> Result<ScenarioCounts> {
        let r = self.db.r_transaction()?;
        let mut counts = ScenarioCounts {
            paziente_t0: r
                .get()
                .primary::<StoredPazienteT0>(scenario_id)?
                .is_some() as usize,
            esame_fisico: r
                .get()
                .primary::<StoredEsameFisico>(scenario_id)?
                .is_some() as usize,
            ..ScenarioCounts::default()
        };
        counts.estensione = r.get().primary::<StoredAdvanced>(scenario_id)?.is_some() as usize
            + r.get()
                .primary::<StoredPatientSimulated>(scenario_id)?
                .is_some() as usize;
        drop(r);

        counts.referti = self.referti_for_scenario(scenario_id)?.len();
        let tempi = self.tempi_for_scenario(scenario_id)?;
        counts.tempi = tempi.len();
        for tempo in &tempi {
            counts.parametri += self.parametri_for_tempo(tempo.id)?.len();
        }
        counts.materiali = self.materiali_for_scenario(scenario_id)?.len();
        counts.presidi = self.presidi_for_scenario(scenario_id)?.len();
        counts.azioni_scenario = self.azioni_for_scenario(scenario_id)?.len();
        counts.accessi_venosi = self.accessi_venosi_for_paziente(scenario_id)?.len();
        counts.accessi_arteriosi = self.accessi_arteriosi_for_paziente(scenario_id)?.len();
        Ok(counts)
    }
}

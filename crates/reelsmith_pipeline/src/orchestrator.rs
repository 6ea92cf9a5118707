//! The studio orchestrator: runs the five-stage production protocol.
//!
//! One [`Studio`] owns the shared blueprint, the agent log, and the
//! persistent ledger. `run_protocol` drives the fixed stage sequence
//! (research, script, visual, marketing, logic) for one slot;
//! `unlock_next_phase` runs the strategist to extend the ledger. The two
//! are mutually exclusive under a single in-progress flag, and a second
//! invocation while either is active is ignored with [`RunOutcome::Busy`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use reelsmith_error::{PipelineError, PipelineErrorKind, ReelsmithError, ReelsmithResult};
use reelsmith_interface::ReelsmithDriver;

use crate::agents::{
    self, AgentConfig,
};
use crate::blueprint::{Blueprint, ValidationStatus};
use crate::ledger::{LedgerStore, ProductionLedger};
use crate::log::AgentLog;

/// How an orchestrated operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All stages finished and the slot was marked completed
    Completed,
    /// A stage failed; the blueprint holds the last-merged partial state
    Halted,
    /// Another run or unlock was already in progress; nothing happened
    Busy,
}

/// Mutable state shared between the operations of one studio.
#[derive(Debug, Default)]
struct Inner {
    blueprint: Blueprint,
    log: AgentLog,
    ledger: ProductionLedger,
}

/// Orchestrates the production pipeline over a generative AI driver.
///
/// The in-progress flag serializes `run_protocol` and
/// `unlock_next_phase`; the state mutex is only ever held between awaits,
/// so each stage's merge is atomic with respect to readers.
#[derive(Debug)]
pub struct Studio<D: ReelsmithDriver> {
    driver: D,
    config: AgentConfig,
    store: LedgerStore,
    inner: Mutex<Inner>,
    run_active: AtomicBool,
}

/// Clears the in-progress flag when an operation ends, on every exit path.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<D: ReelsmithDriver> Studio<D> {
    /// Create a studio, loading the persisted ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger document exists but cannot be read.
    pub fn new(driver: D, config: AgentConfig, store: LedgerStore) -> ReelsmithResult<Self> {
        let ledger = store.load()?;
        Ok(Self {
            driver,
            config,
            store,
            inner: Mutex::new(Inner {
                ledger,
                ..Inner::default()
            }),
            run_active: AtomicBool::new(false),
        })
    }

    /// Whether a run or unlock is currently in progress.
    pub fn is_busy(&self) -> bool {
        self.run_active.load(Ordering::Acquire)
    }

    /// Snapshot of the current blueprint.
    pub fn blueprint(&self) -> Blueprint {
        self.lock_inner().blueprint.clone()
    }

    /// Snapshot of the agent log for the current or last run.
    pub fn log(&self) -> AgentLog {
        self.lock_inner().log.clone()
    }

    /// Snapshot of the production ledger.
    pub fn ledger(&self) -> ProductionLedger {
        self.lock_inner().ledger.clone()
    }

    /// Whether the ledger's final phase is fully completed, which exposes
    /// the unlock-next-phase capability.
    pub fn can_unlock(&self) -> bool {
        self.lock_inner().ledger.current_phase_complete()
    }

    /// Reset the transient blueprint and log. The ledger is untouched.
    pub fn reset(&self) {
        let mut inner = self.lock_inner();
        inner.blueprint = Blueprint::default();
        inner.log = AgentLog::new();
    }

    /// Append one topic to the ledger and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be written.
    pub fn add_topic(&self, label: impl Into<String>) -> ReelsmithResult<u32> {
        let mut inner = self.lock_inner();
        let slot = inner.ledger.add_topic(label);
        self.store.save(&mut inner.ledger)?;
        Ok(slot)
    }

    /// Run the full production protocol for one slot.
    ///
    /// Stages run strictly in sequence; each stage's output merges into the
    /// blueprint before the next stage's request is issued. A stage failure
    /// halts the run, leaves the blueprint at its last-merged state, and
    /// surfaces as a log entry plus [`RunOutcome::Halted`]. On success the
    /// slot is marked completed in the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error for caller mistakes (unknown slot) and for ledger
    /// persistence failures; agent failures are reported via the outcome.
    #[tracing::instrument(skip(self))]
    pub async fn run_protocol(&self, slot: u32) -> ReelsmithResult<RunOutcome> {
        if self
            .run_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!(slot, "run requested while another is in progress");
            return Ok(RunOutcome::Busy);
        }
        let _guard = RunGuard(&self.run_active);

        let video_type = {
            let mut inner = self.lock_inner();
            let label = inner
                .ledger
                .label(slot)
                .ok_or_else(|| PipelineError::new(PipelineErrorKind::UnknownSlot(slot)))?
                .to_string();
            // Fresh run: previous blueprint and log are discarded
            inner.blueprint = Blueprint::for_slot(slot, label.clone());
            inner.log = AgentLog::new();
            inner.log.info("studio", format!("Protocol started for video #{slot}"));
            label
        };

        match self.run_stages(slot, &video_type).await {
            Ok(()) => {
                let mut inner = self.lock_inner();
                inner.ledger.mark_completed(slot)?;
                self.store.save(&mut inner.ledger)?;
                inner
                    .log
                    .success("studio", format!("Protocol complete, video #{slot} marked done"));
                Ok(RunOutcome::Completed)
            }
            Err(e) => {
                let mut inner = self.lock_inner();
                inner
                    .log
                    .error("studio", format!("Protocol halted: {e}"));
                Ok(RunOutcome::Halted)
            }
        }
    }

    /// The five-stage sequence. Returns at the first failing stage.
    async fn run_stages(&self, slot: u32, video_type: &str) -> Result<(), ReelsmithError> {
        let driver: &dyn ReelsmithDriver = &self.driver;

        // Research
        self.lock_inner().log.info("researcher", "Researching keywords and title");
        let seo = agents::researcher(driver, &self.config, video_type).await?;
        let (title, keywords) = (seo.selected_title.clone(), seo.keywords.clone());
        {
            let mut inner = self.lock_inner();
            inner.blueprint.merge_seo(seo);
            inner
                .log
                .success("researcher", format!("Selected title: {title}"));
        }

        // Script
        self.lock_inner().log.info("director", "Writing script and scene breakdown");
        let script = agents::director(driver, &self.config, &title, video_type, &keywords).await?;
        let scenes = script.scenes.clone();
        {
            let mut inner = self.lock_inner();
            let n = script.scenes.len();
            inner.blueprint.merge_script(script);
            inner.log.success("director", format!("Script ready with {n} scenes"));
        }

        // Visuals
        self.lock_inner().log.info("visual_designer", "Planning visuals");
        let visuals = agents::visual_designer(driver, &self.config, &scenes).await?;
        {
            let mut inner = self.lock_inner();
            let n = visuals.image_prompts.len();
            inner.blueprint.merge_visuals(visuals);
            inner
                .log
                .success("visual_designer", format!("{n} image prompts planned"));
        }

        // Marketing
        self.lock_inner().log.info("marketer", "Selecting funnel destination");
        let marketing = agents::marketer(driver, &self.config, slot).await?;
        let target_url = marketing.target_url.clone();
        {
            let mut inner = self.lock_inner();
            inner
                .log
                .success("marketer", format!("Target: {} ({})", marketing.target_url, marketing.offer_type));
            inner.blueprint.merge_marketing(marketing);
        }

        // Logic validation: an invalid verdict is a normal outcome, recorded
        // as an error-typed log entry, and does not halt the run.
        self.lock_inner().log.info("logic_validator", "Auditing funnel logic");
        let verdict = agents::logic_validator(driver, &self.config, &target_url, slot).await?;
        {
            let mut inner = self.lock_inner();
            inner
                .blueprint
                .record_validation(verdict.is_valid, verdict.report.clone())?;
            if verdict.is_valid {
                inner.log.success("logic_validator", "Funnel logic is sound");
            } else {
                inner
                    .log
                    .error("logic_validator", format!("Funnel logic invalid: {}", verdict.report));
            }
        }

        Ok(())
    }

    /// Run the strategist and merge its five new slots into the ledger.
    ///
    /// Mutually exclusive with `run_protocol` under the same in-progress
    /// flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the extended ledger cannot be persisted.
    #[tracing::instrument(skip(self))]
    pub async fn unlock_next_phase(&self) -> ReelsmithResult<RunOutcome> {
        if self
            .run_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("unlock requested while a run is in progress");
            return Ok(RunOutcome::Busy);
        }
        let _guard = RunGuard(&self.run_active);

        let last_slot = {
            let mut inner = self.lock_inner();
            inner
                .log
                .info("strategist", "Planning the next phase of topics");
            inner.ledger.last_slot()
        };

        let batch = match agents::strategist(&self.driver, &self.config, last_slot).await {
            Ok(batch) => batch,
            Err(e) => {
                self.lock_inner()
                    .log
                    .error("studio", format!("Unlock halted: {e}"));
                return Ok(RunOutcome::Halted);
            }
        };

        let mut inner = self.lock_inner();
        if let Err(e) = inner.ledger.extend_phase(&batch) {
            inner.log.error("studio", format!("Unlock halted: {e}"));
            return Ok(RunOutcome::Halted);
        }
        self.store.save(&mut inner.ledger)?;
        let last = inner.ledger.last_slot();
        inner.log.success(
            "strategist",
            format!("Ledger extended through video #{last}"),
        );
        Ok(RunOutcome::Completed)
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            // State mutations hold the lock synchronously and do not panic
            // mid-update, so a poisoned lock still holds consistent state.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

// Keeps the validation status visible to display layers without digging
// through the blueprint.
impl<D: ReelsmithDriver> Studio<D> {
    /// Validation status of the current blueprint's marketing section.
    pub fn validation_status(&self) -> ValidationStatus {
        self.lock_inner()
            .blueprint
            .marketing
            .as_ref()
            .map(|m| m.validation_status)
            .unwrap_or_default()
    }
}

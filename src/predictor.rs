//! Implementations of different branch predictors.

pub mod counter;
pub mod gshare;
pub mod pht;
pub mod simple;
pub mod tage;
pub mod tournament;

pub use counter::*;
pub use gshare::*;
pub use pht::*;
pub use simple::*;
pub use tage::*;
pub use tournament::*;

use log::info;
use rand::RngCore;

use crate::branch::{BranchRecord, Outcome};
use crate::config::{PredictorConfig, Scheme};
use crate::error::ConfigError;

/// Interface to a predictor with some internal state which is only subject to
/// change by the correct branch outcome.
pub trait DirectionPredictor {
    fn name(&self) -> &'static str;

    /// Return the predicted outcome for the branch at 'pc'.
    fn predict(&self, pc: u32) -> Outcome;

    /// Update the internal state of the predictor with the correct outcome
    /// of the branch at 'pc'.
    fn update(&mut self, pc: u32, outcome: Outcome);
}

/// Interface to a table of predictors.
pub trait PredictorTable {
    /// The type of entry in the table.
    type Entry;

    /// Returns the number of entries in the table.
    fn size(&self) -> usize;

    /// Returns a reference to an entry in the table.
    fn get_entry(&self, idx: usize) -> &Self::Entry;

    /// Returns a mutable reference to an entry in the table.
    fn get_entry_mut(&mut self, idx: usize) -> &mut Self::Entry;

    /// Returns a bitmask corresponding to the number of entries in the table.
    fn index_mask(&self) -> usize {
        assert!(self.size().is_power_of_two());
        self.size() - 1
    }
}

/// The predictor a simulator talks to.
///
/// Exactly one scheme is active, chosen at configuration time. All state
/// belongs to this value: tables are allocated by [Predictor::configure]
/// and released when the predictor is dropped (or [Predictor::teardown]).
pub enum Predictor {
    Static(TakenPredictor),
    Gshare(GsharePredictor),
    Tournament(TournamentPredictor),
    Tage(TagePredictor),
}
impl Predictor {
    /// Validate a configuration and allocate the tables of its scheme.
    pub fn configure(cfg: &PredictorConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let res = match cfg.scheme {
            Scheme::Static => Self::Static(TakenPredictor),
            Scheme::Gshare => Self::Gshare(cfg.gshare.build()?),
            Scheme::Tournament => Self::Tournament(cfg.tournament.build()?),
            Scheme::Tage => Self::Tage(cfg.tage.clone().build()?),
        };
        Self::log_configured(cfg);
        Ok(res)
    }

    /// Like [Predictor::configure], but the tagged predictor draws its
    /// allocation decisions from 'rng' instead of a generator seeded from
    /// the configuration. Other schemes ignore 'rng'.
    pub fn configure_with_rng(cfg: &PredictorConfig,
        rng: impl RngCore + 'static) -> Result<Self, ConfigError>
    {
        match cfg.scheme {
            Scheme::Tage => {
                let res = Self::Tage(cfg.tage.clone().build_with_rng(rng)?);
                Self::log_configured(cfg);
                Ok(res)
            },
            _ => Self::configure(cfg),
        }
    }

    fn log_configured(cfg: &PredictorConfig) {
        let storage_bits = cfg.storage_bits();
        info!("configured {} predictor ({} storage bits, {:.2}KiB)",
            cfg.scheme, storage_bits, storage_bits as f64 / 1024.0 / 8.0
        );
    }

    /// The active scheme.
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::Static(_) => Scheme::Static,
            Self::Gshare(_) => Scheme::Gshare,
            Self::Tournament(_) => Scheme::Tournament,
            Self::Tage(_) => Scheme::Tage,
        }
    }

    fn inner(&self) -> &dyn DirectionPredictor {
        match self {
            Self::Static(p) => p,
            Self::Gshare(p) => p,
            Self::Tournament(p) => p,
            Self::Tage(p) => p,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn DirectionPredictor {
        match self {
            Self::Static(p) => p,
            Self::Gshare(p) => p,
            Self::Tournament(p) => p,
            Self::Tage(p) => p,
        }
    }

    /// The name of the active scheme.
    pub fn name(&self) -> &'static str {
        self.inner().name()
    }

    /// Predict the direction of the conditional branch at 'pc'.
    pub fn predict(&self, pc: u32) -> Outcome {
        self.inner().predict(pc)
    }

    /// Train with a resolved branch. Only conditional branches change any
    /// state; the target and the call/return/direct properties are ignored.
    ///
    /// Records must be presented in program order, and every branch that
    /// was predicted must be trained.
    pub fn train(&mut self, record: &BranchRecord) {
        if !record.is_conditional() {
            return;
        }
        self.inner_mut().update(record.pc, record.outcome);
    }

    /// Release all tables.
    pub fn teardown(self) {
        info!("tearing down {} predictor", self.scheme());
    }
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Predictor").field("scheme", &self.scheme()).finish()
    }
}

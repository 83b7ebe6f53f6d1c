//! The tournament predictor.
//!
//! A global-history predictor and a two-level local-history predictor run
//! side by side, and a table of choosers (indexed by global history) learns
//! which of the two to believe. See "The Alpha 21264 Microprocessor"
//! (Kessler, 1999).

use log::trace;
use serde::{Deserialize, Serialize};

use crate::branch::Outcome;
use crate::config::{check_index_bits, defaults};
use crate::error::ConfigError;
use crate::history::*;
use crate::predictor::*;

/// Configuration for a [TournamentPredictor].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Number of global history bits (global table and chooser index width)
    pub global_bits: usize,

    /// Number of local history bits (local history table and local counter
    /// table index width)
    pub local_bits: usize,
}
impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            global_bits: defaults::TOURNAMENT_GLOBAL_BITS,
            local_bits: defaults::TOURNAMENT_LOCAL_BITS,
        }
    }
}
impl TournamentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_index_bits("tournament global", self.global_bits)?;
        check_index_bits("tournament local", self.local_bits)?;
        Ok(())
    }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        let global_entries = 1 << self.global_bits;
        let local_entries  = 1 << self.local_bits;
        (
            // Global counters and choosers
            global_entries * (2 + 2) +
            // Local histories and local counters
            local_entries * (self.local_bits + 3) +
            self.global_bits
        )
    }

    /// Use this configuration to create a new [TournamentPredictor].
    pub fn build(&self) -> Result<TournamentPredictor, ConfigError> {
        self.validate()?;
        let lht = vec![HistoryRegister::new(self.local_bits); 1 << self.local_bits];
        Ok(TournamentPredictor {
            ghr: HistoryRegister::new(self.global_bits),
            lht,
            global: CounterTable::new(self.global_bits),
            local: CounterTable::new(self.local_bits),
            choice: CounterTable::new(self.global_bits),
            cfg: self.clone(),
        })
    }
}

/// Everything looked up for one branch: where each sub-predictor reads from
/// and what it says.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TournamentPrediction {
    /// Index into the local history table (low bits of the program counter)
    pub lht_idx: usize,
    /// Index into the local counter table (the local history value)
    pub local_idx: usize,
    /// Index into the global counter and chooser tables
    pub global_idx: usize,
    /// Prediction from the global counters
    pub global: Outcome,
    /// Prediction from the local counters
    pub local: Outcome,
    /// Whether the chooser selected the global prediction
    pub use_global: bool,
}
impl TournamentPrediction {
    /// The outcome presented to the caller.
    pub fn outcome(&self) -> Outcome {
        if self.use_global { self.global } else { self.local }
    }
}

/// A global/local predictor pair with a chooser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TournamentPredictor {
    cfg: TournamentConfig,

    /// Global history register
    ghr: HistoryRegister,

    /// Local history table, indexed by the program counter
    lht: Vec<HistoryRegister>,

    /// 2-bit counters indexed by global history
    global: CounterTable<CounterState2>,

    /// 3-bit counters indexed by local history
    local: CounterTable<CounterState3>,

    /// Choosers indexed by global history
    choice: CounterTable<ChoiceState>,
}
impl TournamentPredictor {
    pub fn config(&self) -> &TournamentConfig { &self.cfg }
    pub fn history(&self) -> &HistoryRegister { &self.ghr }
    pub fn global_table(&self) -> &CounterTable<CounterState2> { &self.global }
    pub fn local_table(&self) -> &CounterTable<CounterState3> { &self.local }
    pub fn choice_table(&self) -> &CounterTable<ChoiceState> { &self.choice }

    /// Return the local history recorded for the branch at 'pc'.
    pub fn local_history(&self, pc: u32) -> &HistoryRegister {
        &self.lht[self.lht_index(pc)]
    }

    fn lht_index(&self, pc: u32) -> usize {
        pc as usize & (self.lht.len() - 1)
    }

    /// Look up both sub-predictions and the chooser.
    pub fn lookup(&self, pc: u32) -> TournamentPrediction {
        let lht_idx = self.lht_index(pc);
        let local_idx = self.lht[lht_idx].value() as usize;
        let global_idx = self.ghr.value() as usize;
        TournamentPrediction {
            lht_idx,
            local_idx,
            global_idx,
            global: self.global.predict(global_idx),
            local: self.local.predict(local_idx),
            use_global: self.choice.get_entry(global_idx).prefers_global(),
        }
    }
}

impl DirectionPredictor for TournamentPredictor {
    fn name(&self) -> &'static str { "Tournament" }

    fn predict(&self, pc: u32) -> Outcome {
        self.lookup(pc).outcome()
    }

    fn update(&mut self, pc: u32, outcome: Outcome) {
        let p = self.lookup(pc);

        // The chooser only learns when the two sides disagree.
        if p.global != p.local {
            let choice = self.choice.get_entry_mut(p.global_idx);
            *choice = choice.reward(p.global == outcome);
            trace!("chooser[{:#x}] -> {:?}", p.global_idx, *choice);
        }

        // Both sides always train, so the losing side can win back the
        // chooser later.
        self.global.update(p.global_idx, outcome);
        self.local.update(p.local_idx, outcome);
        self.lht[p.lht_idx].push(outcome);
        self.ghr.push(outcome);
    }
}

//! The gshare predictor.
//!
//! See "Combining Branch Predictors" (McFarling, 1993).

use serde::{Deserialize, Serialize};

use crate::branch::Outcome;
use crate::config::{check_index_bits, defaults};
use crate::error::ConfigError;
use crate::history::*;
use crate::predictor::*;

/// Configuration for a [GsharePredictor].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GshareConfig {
    /// Number of global history bits, which is also the table index width
    #[serde(default = "GshareConfig::default_history_bits")]
    pub history_bits: usize,
}
impl Default for GshareConfig {
    fn default() -> Self {
        Self { history_bits: Self::default_history_bits() }
    }
}
impl GshareConfig {
    fn default_history_bits() -> usize {
        defaults::GSHARE_HISTORY_BITS
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_index_bits("gshare", self.history_bits)
    }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        2 * (1 << self.history_bits) + self.history_bits
    }

    /// Use this configuration to create a new [GsharePredictor].
    pub fn build(&self) -> Result<GsharePredictor, ConfigError> {
        self.validate()?;
        Ok(GsharePredictor {
            pht: CounterTable::new(self.history_bits),
            ghr: HistoryRegister::new(self.history_bits),
            cfg: self.clone(),
        })
    }
}

/// A single table of 2-bit counters indexed by the program counter XOR'ed
/// with global history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GsharePredictor {
    cfg: GshareConfig,

    /// Table of counters
    pht: CounterTable<CounterState2>,

    /// Global history register
    ghr: HistoryRegister,
}
impl GsharePredictor {
    pub fn config(&self) -> &GshareConfig { &self.cfg }
    pub fn history(&self) -> &HistoryRegister { &self.ghr }
    pub fn table(&self) -> &CounterTable<CounterState2> { &self.pht }

    /// Form an index from the low bits of the program counter and the
    /// current global history.
    pub fn index(&self, pc: u32) -> usize {
        let mask = self.pht.index_mask();
        let pc_bits = pc as usize & mask;
        let ghr_bits = self.ghr.value() as usize & mask;
        pc_bits ^ ghr_bits
    }
}

impl DirectionPredictor for GsharePredictor {
    fn name(&self) -> &'static str { "Gshare" }

    fn predict(&self, pc: u32) -> Outcome {
        self.pht.predict(self.index(pc))
    }

    fn update(&mut self, pc: u32, outcome: Outcome) {
        // The index must be formed before the outcome enters history.
        let idx = self.index(pc);
        self.pht.update(idx, outcome);
        self.ghr.push(outcome);
    }
}


use itertools::Itertools;
use log::debug;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{check_index_bits, defaults, MAX_TAG_BITS, MIN_TAG_BITS};
use crate::error::ConfigError;
use crate::history::*;
use crate::predictor::*;

/// Configuration for a [TageBaseComponent].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TageBaseConfig {
    /// Number of index bits (the table has `1 << index_bits` entries)
    pub index_bits: usize,
}
impl Default for TageBaseConfig {
    fn default() -> Self {
        Self { index_bits: defaults::TAGE_BASE_INDEX_BITS }
    }
}
impl TageBaseConfig {
    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        3 * (1 << self.index_bits)
    }
}

/// Configuration for a [TageComponent].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TageComponentConfig {
    /// Number of global history bits folded into the index and tag
    pub history_len: usize,

    /// Number of index bits (the table has `1 << index_bits` entries)
    pub index_bits: usize,

    /// Number of tag bits
    pub tag_bits: usize,
}
impl TageComponentConfig {
    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        // 3-bit counter, 2-bit 'useful' counter, and the tag
        let entry_size = 3 + 2 + self.tag_bits;
        entry_size * (1 << self.index_bits)
    }

    fn validate(&self, component: usize) -> Result<(), ConfigError> {
        check_index_bits("tagged component", self.index_bits)?;
        if self.history_len == 0 {
            return Err(ConfigError::ZeroHistoryLength { what: "tagged component" });
        }
        if self.tag_bits < MIN_TAG_BITS {
            return Err(ConfigError::TagTooNarrow {
                component, bits: self.tag_bits, min: MIN_TAG_BITS
            });
        }
        if self.tag_bits > MAX_TAG_BITS {
            return Err(ConfigError::TagTooWide {
                component, bits: self.tag_bits, max: MAX_TAG_BITS
            });
        }
        Ok(())
    }
}

/// Configuration for a [TagePredictor].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TageConfig {
    /// Base component configuration
    pub base: TageBaseConfig,

    /// Tagged component configurations
    pub comp: Vec<TageComponentConfig>,

    /// Number of training calls between full 'useful' counter resets
    pub reset_period: u64,

    /// Seed for the generator used to break allocation ties
    pub seed: u64,
}
impl Default for TageConfig {
    fn default() -> Self {
        let mut cfg = Self::new(TageBaseConfig::default());
        for history_len in defaults::TAGE_HISTORY_LENGTHS {
            cfg.add_component(TageComponentConfig {
                history_len,
                index_bits: defaults::TAGE_INDEX_BITS,
                tag_bits: defaults::TAGE_TAG_BITS,
            });
        }
        cfg
    }
}
impl TageConfig {
    /// A configuration with some base component and no tagged components.
    pub fn new(base: TageBaseConfig) -> Self {
        Self {
            base,
            comp: Vec::new(),
            reset_period: defaults::TAGE_RESET_PERIOD,
            seed: 0,
        }
    }

    pub fn total_entries(&self) -> usize {
        let c: usize = self.comp.iter().map(|c| 1 << c.index_bits).sum();
        (1 << self.base.index_bits) + c
    }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        let c: usize = self.comp.iter().map(|c| c.storage_bits()).sum();
        c + self.base.storage_bits() + self.longest_history()
    }

    /// The length of the global history register, which is the longest
    /// history used by any component.
    pub fn longest_history(&self) -> usize {
        self.comp.iter().map(|c| c.history_len).max().unwrap_or(0)
    }

    /// Add a tagged component to the predictor.
    ///
    /// Components are kept sorted by history length, shortest first.
    pub fn add_component(&mut self, c: TageComponentConfig) {
        self.comp.push(c);
        self.comp.sort_by_key(|c| c.history_len);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_index_bits("tagged base", self.base.index_bits)?;
        if self.comp.is_empty() {
            return Err(ConfigError::NoTaggedComponents);
        }
        for (idx, c) in self.comp.iter().enumerate() {
            c.validate(idx)?;
        }
        let duplicate = self.comp.iter().map(|c| c.history_len)
            .sorted()
            .tuple_windows()
            .find(|(x, y)| x == y);
        if let Some((len, _)) = duplicate {
            return Err(ConfigError::DuplicateHistoryLength(len));
        }
        if self.reset_period < 2 {
            return Err(ConfigError::ResetPeriodTooShort(self.reset_period));
        }
        Ok(())
    }

    /// Use this configuration to create a new [TagePredictor], breaking
    /// allocation ties with a generator seeded from [TageConfig::seed].
    pub fn build(self) -> Result<TagePredictor, ConfigError> {
        let rng = StdRng::seed_from_u64(self.seed);
        self.build_with_rng(rng)
    }

    /// Use this configuration to create a new [TagePredictor] that breaks
    /// allocation ties with the provided random source.
    pub fn build_with_rng(mut self, rng: impl RngCore + 'static)
        -> Result<TagePredictor, ConfigError>
    {
        self.validate()?;
        self.comp.sort_by_key(|c| c.history_len);

        debug!("tagged predictor: {} entries in total", self.total_entries());
        for (idx, c) in self.comp.iter().enumerate() {
            debug!("  component[{}]: {} entries, {}-bit history, {}-bit tags",
                idx, 1usize << c.index_bits, c.history_len, c.tag_bits
            );
        }

        let comp = self.comp.iter().cloned().map(TageComponent::new)
            .collect::<Vec<TageComponent>>();
        let base = TageBaseComponent::new(self.base.clone());
        let stat = TageStats::new(comp.len());
        let ghr = HistoryRegister::new(self.longest_history());
        Ok(TagePredictor {
            cfg: self,
            base,
            comp,
            stat,
            ghr,
            reset_ctr: 0,
            rng: Box::new(rng),
        })
    }
}

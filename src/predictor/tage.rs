//! Implementations of a "Tagged GEometric history length" (TAGE) predictor.

pub mod component;
pub mod config;
pub mod stat;

pub use component::*;
pub use config::*;
pub use stat::*;

use itertools::Itertools;
use log::{debug, trace};
use rand::{Rng, RngCore};

use crate::branch::Outcome;
use crate::history::*;
use crate::predictor::*;

/// Identifies a particular component in a [TagePredictor].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TageProvider {
    /// The base component
    Base,

    /// A tagged component (indexed from the shortest history length)
    Tagged(usize),
}

/// Where a single tagged component was looked up for some branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TageAccess {
    /// Index of the entry in the component
    pub idx: usize,

    /// The tag computed for this access
    pub tag: u16,

    /// Whether the stored tag matches
    pub hit: bool,
}

/// Container for output from [TagePredictor::lookup], including the
/// predicted outcome and other metadata about how the prediction was made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagePrediction {
    /// The component providing the prediction
    pub provider: TageProvider,

    /// Predicted direction from the provider
    pub provider_outcome: Outcome,

    /// Alternate component used to provide a prediction
    pub alt_provider: TageProvider,

    /// Predicted direction from the alternate component
    pub alt_outcome: Outcome,

    /// Whether the provider entry has just been allocated
    pub fresh: bool,

    /// Index of the entry in the base component
    pub base_idx: usize,

    /// Accesses into each tagged component
    pub accesses: Vec<TageAccess>,
}
impl TagePrediction {
    /// The outcome presented to the caller.
    ///
    /// A freshly-allocated provider has not been trained yet, so the
    /// alternate prediction is used instead.
    pub fn outcome(&self) -> Outcome {
        if self.fresh { self.alt_outcome } else { self.provider_outcome }
    }

    /// Returns 'true' when the provider's own counter disagreed with the
    /// resolved outcome.
    pub fn provider_missed(&self, outcome: Outcome) -> bool {
        self.provider_outcome != outcome
    }
}

/// The "TAgged GEometric history length" predictor.
///
/// See the following:
///  - "A case for (partially) TAgged GEometric history length branch prediction"
///  (Seznec, 2006).
pub struct TagePredictor {
    /// The configuration used to create this object
    pub cfg: TageConfig,

    pub stat: TageStats,

    /// Base component
    pub base: TageBaseComponent,

    /// Tagged components, sorted by increasing history length
    pub comp: Vec<TageComponent>,

    /// Global history shared by every component
    ghr: HistoryRegister,

    /// Number of updates since the last full 'useful' reset
    reset_ctr: u64,

    /// Source of randomness for allocation
    rng: Box<dyn RngCore>,
}

impl TagePredictor {
    /// Return the number of tagged components.
    pub fn num_tagged_components(&self) -> usize {
        self.comp.len()
    }

    /// Return the global history register.
    pub fn history(&self) -> &HistoryRegister {
        &self.ghr
    }

    /// Number of updates since the last full 'useful' reset.
    pub fn reset_ctr(&self) -> u64 {
        self.reset_ctr
    }

    fn outcome_from(&self, provider: TageProvider, base_idx: usize,
        accesses: &[TageAccess]) -> Outcome
    {
        match provider {
            TageProvider::Base => self.base.predict(base_idx),
            TageProvider::Tagged(idx) => {
                self.comp[idx].get_entry(accesses[idx].idx).predict()
            },
        }
    }

    /// Access all components and resolve the provider and alternate for the
    /// branch at 'pc' under the current global history.
    pub fn lookup(&self, pc: u32) -> TagePrediction {
        let base_idx = self.base.get_index(pc);
        let accesses: Vec<TageAccess> = self.comp.iter().map(|c| {
            let idx = c.get_index(pc, &self.ghr);
            let tag = c.get_tag(pc, &self.ghr);
            let hit = c.get_entry(idx).tag_matches(tag);
            TageAccess { idx, tag, hit }
        }).collect();

        // The longest-history hit provides the prediction, and the next
        // longest hit is the alternate. The base component always hits.
        let mut hits = accesses.iter().enumerate().rev()
            .filter(|(_, a)| a.hit)
            .map(|(idx, _)| TageProvider::Tagged(idx));
        let provider = hits.next().unwrap_or(TageProvider::Base);
        let alt_provider = hits.next().unwrap_or(TageProvider::Base);

        let fresh = match provider {
            TageProvider::Base => false,
            TageProvider::Tagged(idx) => {
                self.comp[idx].get_entry(accesses[idx].idx).is_fresh()
            },
        };

        TagePrediction {
            provider,
            provider_outcome: self.outcome_from(provider, base_idx, &accesses),
            alt_provider,
            alt_outcome: self.outcome_from(alt_provider, base_idx, &accesses),
            fresh,
            base_idx,
            accesses,
        }
    }

    /// Given the provider of an incorrect prediction, try to allocate an
    /// entry in a component with a longer history.
    ///
    /// When no entry can be taken, the candidates are aged instead so that
    /// a later attempt can succeed.
    fn allocate(&mut self, prediction: &TagePrediction, pc: u32) {
        // Only components whose associated history length is longer than
        // the provider are considered.
        let start = match prediction.provider {
            TageProvider::Base => 0,
            TageProvider::Tagged(idx) => idx + 1,
        };
        if start >= self.comp.len() {
            return;
        }

        // A component is only eligible when the entry associated with this
        // branch has its 'useful' bits set to zero.
        let accesses = &prediction.accesses[start..];
        let candidates: Vec<usize> = self.comp[start..].iter()
            .zip(accesses)
            .positions(|(c, a)| c.get_entry(a.idx).useful.is_zero())
            .map(|pos| pos + start)
            .collect();

        // With multiple candidates, the shortest history is twice as likely
        // to be picked as the next shortest.
        let chosen = match candidates.as_slice() {
            [] => {
                for idx in start..self.comp.len() {
                    let a = prediction.accesses[idx];
                    self.comp[idx].get_entry_mut(a.idx).useful.decrement();
                }
                self.stat.failed_alcs += 1;
                trace!("pc={:#010x}: no entry to allocate, aged components {}..{}",
                    pc, start, self.comp.len()
                );
                return;
            },
            [only] => *only,
            [first, second, ..] => {
                if self.rng.gen_ratio(2, 3) { *first } else { *second }
            },
        };

        let a = prediction.accesses[chosen];
        self.comp[chosen].get_entry_mut(a.idx).allocate(a.tag);
        self.stat.alcs += 1;
        self.stat.comp_alcs[chosen] += 1;
        trace!("pc={:#010x}: allocated comp[{}][{:#x}] tag={:#x}",
            pc, chosen, a.idx, a.tag
        );
    }

    /// Advance the aging schedule by one update.
    ///
    /// Halfway through the period the MSB of every 'useful' counter is
    /// cleared. At the end of the period the LSB is cleared and the
    /// schedule starts over.
    fn tick(&mut self) {
        self.reset_ctr += 1;
        let period = self.cfg.reset_period;
        if self.reset_ctr == period / 2 {
            for comp in self.comp.iter_mut() {
                comp.clear_useful_msb();
            }
            self.stat.msb_resets += 1;
            debug!("cleared 'useful' MSBs after {} updates", self.stat.clk);
        } else if self.reset_ctr >= period {
            for comp in self.comp.iter_mut() {
                comp.clear_useful_lsb();
            }
            self.reset_ctr = 0;
            self.stat.lsb_resets += 1;
            debug!("cleared 'useful' LSBs after {} updates", self.stat.clk);
        }
    }
}

impl DirectionPredictor for TagePredictor {
    fn name(&self) -> &'static str { "TAGE" }

    fn predict(&self, pc: u32) -> Outcome {
        self.lookup(pc).outcome()
    }

    fn update(&mut self, pc: u32, outcome: Outcome) {
        let prediction = self.lookup(pc);

        // Update the entry in the component that provided the prediction.
        // Its 'useful' counter only moves when the alternate disagreed.
        match prediction.provider {
            TageProvider::Base => {
                self.base.update(prediction.base_idx, outcome);
                self.stat.base_provided += 1;
            },
            TageProvider::Tagged(idx) => {
                let a = prediction.accesses[idx];
                let entry = self.comp[idx].get_entry_mut(a.idx);
                entry.update(outcome);
                if prediction.provider_outcome != prediction.alt_outcome {
                    if prediction.provider_outcome == outcome {
                        entry.useful.increment();
                    } else {
                        entry.useful.decrement();
                    }
                }
                self.stat.comp_provided[idx] += 1;
                if prediction.fresh {
                    self.stat.alt_used += 1;
                }
            },
        }

        if prediction.provider_missed(outcome) {
            self.allocate(&prediction, pc);
        }

        self.ghr.push(outcome);
        self.stat.clk += 1;
        self.tick();
    }
}

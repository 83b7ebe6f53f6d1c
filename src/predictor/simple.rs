
use crate::branch::Outcome;
use crate::predictor::DirectionPredictor;

/// A simple predictor with no state: always predict 'taken'.
///
/// This is the static baseline, useful for sanity-checking a harness.
#[derive(Clone, Copy, Debug, Default)]
pub struct TakenPredictor;
impl DirectionPredictor for TakenPredictor {
    fn name(&self) -> &'static str { "Static" }
    fn predict(&self, _pc: u32) -> Outcome { Outcome::T }
    fn update(&mut self, _pc: u32, _outcome: Outcome) {}
}

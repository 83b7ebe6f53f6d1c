
/// Container for [TagePredictor](super::TagePredictor) runtime stats.
///
/// These counters never influence a prediction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TageStats {
    /// Successful allocations
    pub alcs: usize,

    /// Failed allocations (no eligible entry, so entries were aged instead)
    pub failed_alcs: usize,

    /// Allocations per tagged component
    pub comp_alcs: Vec<usize>,

    /// Updates where the base component provided the prediction
    pub base_provided: usize,

    /// Updates where each tagged component provided the prediction
    pub comp_provided: Vec<usize>,

    /// Updates where a fresh provider was overruled by the alternate
    pub alt_used: usize,

    /// Number of times the MSB of every 'useful' counter was cleared
    pub msb_resets: usize,

    /// Number of times the LSB of every 'useful' counter was cleared
    pub lsb_resets: usize,

    /// Number of updates
    pub clk: usize,
}
impl TageStats {
    pub fn new(num_comp: usize) -> Self {
        Self {
            comp_alcs: vec![0; num_comp],
            comp_provided: vec![0; num_comp],
            ..Self::default()
        }
    }
}

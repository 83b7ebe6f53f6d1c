//! Predictor configuration.
//!
//! A [PredictorConfig] picks one [Scheme] and carries the sizing parameters
//! for every scheme. Only the parameters of the selected scheme are
//! validated and used. Every field has a default, so a configuration file
//! only needs to name what it changes:
//!
//! ```json
//! { "scheme": "tage", "tage": { "reset_period": 65536, "seed": 7 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::predictor::gshare::GshareConfig;
use crate::predictor::tage::TageConfig;
use crate::predictor::tournament::TournamentConfig;

/// Default parameters, matching the reference configuration.
pub mod defaults {
    /// Gshare history (and table index) width.
    pub const GSHARE_HISTORY_BITS: usize = 15;

    /// Tournament global history (and global table index) width.
    pub const TOURNAMENT_GLOBAL_BITS: usize = 12;
    /// Tournament local history (and local table index) width.
    pub const TOURNAMENT_LOCAL_BITS: usize = 12;

    /// Index width of the untagged base table.
    pub const TAGE_BASE_INDEX_BITS: usize = 11;
    /// History lengths of the tagged components.
    pub const TAGE_HISTORY_LENGTHS: [usize; 4] = [8, 16, 32, 64];
    /// Index width of each tagged component.
    pub const TAGE_INDEX_BITS: usize = 10;
    /// Tag width of each tagged component.
    pub const TAGE_TAG_BITS: usize = 9;
    /// Number of training calls between full usefulness resets.
    pub const TAGE_RESET_PERIOD: u64 = 2_097_152;
}

/// Largest table index width accepted by any scheme.
pub const MAX_INDEX_BITS: usize = 28;

/// Narrowest tag accepted for a tagged component.
pub const MIN_TAG_BITS: usize = 4;

/// Widest tag accepted for a tagged component.
pub const MAX_TAG_BITS: usize = 16;

/// Check a table index width against [MAX_INDEX_BITS].
pub(crate) fn check_index_bits(what: &'static str, bits: usize)
    -> Result<(), ConfigError>
{
    if bits == 0 {
        return Err(ConfigError::ZeroIndexWidth { what });
    }
    if bits > MAX_INDEX_BITS {
        return Err(ConfigError::TableTooLarge { what, bits, max: MAX_INDEX_BITS });
    }
    Ok(())
}

/// The prediction scheme in use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Always predict taken
    #[default]
    Static,
    /// Global history XOR address
    Gshare,
    /// Global/local pair with a chooser
    Tournament,
    /// Tagged multi-table geometric-history predictor
    Tage,
}
impl Scheme {
    pub fn name(self) -> &'static str {
        match self {
            Self::Static => "Static",
            Self::Gshare => "Gshare",
            Self::Tournament => "Tournament",
            Self::Tage => "TAGE",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Configuration for building a [crate::Predictor].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// The active scheme
    #[serde(default)]
    pub scheme: Scheme,

    /// Gshare parameters
    #[serde(default)]
    pub gshare: GshareConfig,

    /// Tournament parameters
    #[serde(default)]
    pub tournament: TournamentConfig,

    /// Tagged predictor parameters
    #[serde(default)]
    pub tage: TageConfig,
}
impl PredictorConfig {
    /// A default configuration for some scheme.
    pub fn new(scheme: Scheme) -> Self {
        Self { scheme, ..Self::default() }
    }

    /// Check the parameters of the selected scheme.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.scheme {
            Scheme::Static => Ok(()),
            Scheme::Gshare => self.gshare.validate(),
            Scheme::Tournament => self.tournament.validate(),
            Scheme::Tage => self.tage.validate(),
        }
    }

    /// Get the [approximate] number of storage bits used by the selected
    /// scheme.
    pub fn storage_bits(&self) -> usize {
        match self.scheme {
            Scheme::Static => 0,
            Scheme::Gshare => self.gshare.storage_bits(),
            Scheme::Tournament => self.tournament.storage_bits(),
            Scheme::Tage => self.tage.storage_bits(),
        }
    }
}

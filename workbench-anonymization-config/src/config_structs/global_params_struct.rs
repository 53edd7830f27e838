use serde::{Deserialize, Serialize};

use crate::config_error::ConfigError;

pub const DEFAULT_K: u32 = 2;
pub const DEFAULT_L: u32 = 2;
pub const DEFAULT_T: f64 = 0.2;
pub const DEFAULT_EPSILON: f64 = 1.0;

/// Dataset-wide privacy targets, applied regardless of per-column techniques.
///
/// Fields are only reachable through the setters in `global_params_impl`, which
/// keep every field inside its domain.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(try_from = "RawGlobalParameters")]
pub struct GlobalParameters {
    pub(crate) k: u32,
    pub(crate) l: u32,
    pub(crate) t: f64,
    pub(crate) epsilon: f64,
}

impl Default for GlobalParameters {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            l: DEFAULT_L,
            t: DEFAULT_T,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

#[derive(Deserialize)]
struct RawGlobalParameters {
    #[serde(default = "default_k")]
    k: u32,
    #[serde(default = "default_l")]
    l: u32,
    #[serde(default = "default_t")]
    t: f64,
    #[serde(default = "default_epsilon")]
    epsilon: f64,
}

fn default_k() -> u32 {
    DEFAULT_K
}

fn default_l() -> u32 {
    DEFAULT_L
}

fn default_t() -> f64 {
    DEFAULT_T
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl TryFrom<RawGlobalParameters> for GlobalParameters {
    type Error = ConfigError;

    fn try_from(raw: RawGlobalParameters) -> Result<Self, Self::Error> {
        let mut params = GlobalParameters::default();
        params.set_k(raw.k)?;
        params.set_l(raw.l)?;
        params.set_t(raw.t)?;
        params.set_epsilon(raw.epsilon)?;
        Ok(params)
    }
}

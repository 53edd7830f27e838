use std::fmt::Display;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::config_error::ConfigError;

pub const GENERALIZATION_BINS: RangeInclusive<u8> = 2..=10;
pub const SUPPRESSION_THRESHOLD: RangeInclusive<f64> = 0.0..=1.0;
pub const DIFFERENTIAL_PRIVACY_EPSILON: RangeInclusive<f64> = 0.1..=10.0;

pub const DEFAULT_GENERALIZATION_BINS: u8 = 5;
pub const DEFAULT_SUPPRESSION_THRESHOLD: f64 = 0.1;
pub const DEFAULT_DIFFERENTIAL_PRIVACY_EPSILON: f64 = 1.0;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    #[default]
    None,
    Generalization,
    Suppression,
    DifferentialPrivacy,
}

impl Technique {
    pub fn default_parameters(&self) -> TechniqueParameters {
        match self {
            Technique::None => TechniqueParameters::None,
            Technique::Generalization => TechniqueParameters::Generalization {
                bins: DEFAULT_GENERALIZATION_BINS,
            },
            Technique::Suppression => TechniqueParameters::Suppression {
                threshold: DEFAULT_SUPPRESSION_THRESHOLD,
            },
            Technique::DifferentialPrivacy => TechniqueParameters::DifferentialPrivacy {
                epsilon: DEFAULT_DIFFERENTIAL_PRIVACY_EPSILON,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Technique::None => "None",
            Technique::Generalization => "Generalization",
            Technique::Suppression => "Suppression",
            Technique::DifferentialPrivacy => "Differential privacy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Technique::None => "Keep the original values",
            Technique::Generalization => "Replace specific values with broader categories",
            Technique::Suppression => "Hide or mask values",
            Technique::DifferentialPrivacy => "Add calibrated random noise to the values",
        }
    }
}

impl Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Technique::None => write!(f, "none"),
            Technique::Generalization => write!(f, "generalization"),
            Technique::Suppression => write!(f, "suppression"),
            Technique::DifferentialPrivacy => write!(f, "differential_privacy"),
        }
    }
}

/// Parameters of a technique, one variant per technique so a parameter can
/// never be attached to the wrong technique.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TechniqueParameters {
    None,
    Generalization { bins: u8 },
    Suppression { threshold: f64 },
    DifferentialPrivacy { epsilon: f64 },
}

impl TechniqueParameters {
    pub fn technique(&self) -> Technique {
        match self {
            TechniqueParameters::None => Technique::None,
            TechniqueParameters::Generalization { .. } => Technique::Generalization,
            TechniqueParameters::Suppression { .. } => Technique::Suppression,
            TechniqueParameters::DifferentialPrivacy { .. } => Technique::DifferentialPrivacy,
        }
    }

    /// Checks the parameter against its domain. Values are never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            TechniqueParameters::None => Ok(()),
            TechniqueParameters::Generalization { bins } => {
                if GENERALIZATION_BINS.contains(&bins) {
                    Ok(())
                } else {
                    Err(ConfigError::out_of_range("bins", "[2, 10]", bins))
                }
            }
            TechniqueParameters::Suppression { threshold } => {
                if SUPPRESSION_THRESHOLD.contains(&threshold) {
                    Ok(())
                } else {
                    Err(ConfigError::out_of_range("threshold", "[0.0, 1.0]", threshold))
                }
            }
            TechniqueParameters::DifferentialPrivacy { epsilon } => {
                if DIFFERENTIAL_PRIVACY_EPSILON.contains(&epsilon) {
                    Ok(())
                } else {
                    Err(ConfigError::out_of_range("epsilon", "[0.1, 10.0]", epsilon))
                }
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(into = "TechniqueAssignmentWire", try_from = "TechniqueAssignmentWire")]
pub struct TechniqueAssignment {
    pub column: String,
    pub parameters: TechniqueParameters,
}

impl TechniqueAssignment {
    pub fn new(column: impl Into<String>, parameters: TechniqueParameters) -> Self {
        Self {
            column: column.into(),
            parameters,
        }
    }

    /// Builds an assignment carrying the technique's default parameters.
    pub fn with_defaults(column: impl Into<String>, technique: Technique) -> Self {
        Self::new(column, technique.default_parameters())
    }

    pub fn technique(&self) -> Technique {
        self.parameters.technique()
    }
}

/// `{column, technique, params}` as exchanged with the engine and stored in drafts.
#[derive(Serialize, Deserialize)]
struct TechniqueAssignmentWire {
    column: String,
    technique: Technique,
    #[serde(default)]
    params: TechniqueParamsWire,
}

#[derive(Serialize, Deserialize, Default)]
struct TechniqueParamsWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bins: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    levels: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    epsilon: Option<f64>,
}

impl From<TechniqueAssignment> for TechniqueAssignmentWire {
    fn from(assignment: TechniqueAssignment) -> Self {
        let technique = assignment.technique();
        let params = match assignment.parameters {
            TechniqueParameters::None => TechniqueParamsWire::default(),
            // The engine reads `bins` for numeric columns and `levels` for categorical ones.
            TechniqueParameters::Generalization { bins } => TechniqueParamsWire {
                bins: Some(bins),
                levels: Some(bins),
                ..Default::default()
            },
            TechniqueParameters::Suppression { threshold } => TechniqueParamsWire {
                threshold: Some(threshold),
                ..Default::default()
            },
            TechniqueParameters::DifferentialPrivacy { epsilon } => TechniqueParamsWire {
                epsilon: Some(epsilon),
                ..Default::default()
            },
        };

        TechniqueAssignmentWire {
            column: assignment.column,
            technique,
            params,
        }
    }
}

impl TryFrom<TechniqueAssignmentWire> for TechniqueAssignment {
    type Error = ConfigError;

    fn try_from(wire: TechniqueAssignmentWire) -> Result<Self, Self::Error> {
        let params = wire.params;
        let parameters = match wire.technique {
            Technique::None => TechniqueParameters::None,
            Technique::Generalization => TechniqueParameters::Generalization {
                bins: params
                    .bins
                    .or(params.levels)
                    .unwrap_or(DEFAULT_GENERALIZATION_BINS),
            },
            Technique::Suppression => TechniqueParameters::Suppression {
                threshold: params.threshold.unwrap_or(DEFAULT_SUPPRESSION_THRESHOLD),
            },
            Technique::DifferentialPrivacy => TechniqueParameters::DifferentialPrivacy {
                epsilon: params
                    .epsilon
                    .unwrap_or(DEFAULT_DIFFERENTIAL_PRIVACY_EPSILON),
            },
        };
        parameters.validate()?;

        Ok(TechniqueAssignment {
            column: wire.column,
            parameters,
        })
    }
}

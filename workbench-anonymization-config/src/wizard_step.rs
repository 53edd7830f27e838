use std::fmt::Display;

use strum::EnumIter;

/// Steps of the configuration wizard.
///
/// Moving between steps is never gated on the completeness of the previous
/// step: partial configurations are allowed while editing and are validated
/// once, at submission (`ConfigurationDraft::validate`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter)]
pub enum WizardStep {
    #[default]
    ColumnMapping,
    TechniqueSelection,
    Parameters,
}

impl WizardStep {
    pub fn next(self) -> Self {
        match self {
            WizardStep::ColumnMapping => WizardStep::TechniqueSelection,
            WizardStep::TechniqueSelection | WizardStep::Parameters => WizardStep::Parameters,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            WizardStep::ColumnMapping | WizardStep::TechniqueSelection => {
                WizardStep::ColumnMapping
            }
            WizardStep::Parameters => WizardStep::TechniqueSelection,
        }
    }

    pub fn is_last(self) -> bool {
        self == WizardStep::Parameters
    }

    pub fn number(self) -> u8 {
        match self {
            WizardStep::ColumnMapping => 1,
            WizardStep::TechniqueSelection => 2,
            WizardStep::Parameters => 3,
        }
    }
}

impl Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WizardStep::ColumnMapping => write!(f, "Map columns"),
            WizardStep::TechniqueSelection => write!(f, "Select techniques"),
            WizardStep::Parameters => write!(f, "Set parameters"),
        }
    }
}

use std::fmt::Display;

use strum::EnumIter;
use workbench_anonymization_config::config_structs::global_params_struct::GlobalParameters;
use workbench_anonymization_config::config_structs::technique_struct::{
    Technique, TechniqueParameters,
};

/// Dataset-wide parameters prompted on the last wizard step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter)]
pub enum GlobalParameter {
    K,
    L,
    T,
    Epsilon,
}

impl GlobalParameter {
    pub fn prompt(&self) -> &'static str {
        match self {
            GlobalParameter::K => "K-anonymity (minimum group size, at least 2)",
            GlobalParameter::L => "L-diversity (distinct sensitive values per group, at least 2)",
            GlobalParameter::T => "T-closeness (distribution distance, in (0, 1])",
            GlobalParameter::Epsilon => "Epsilon (privacy budget, at least 0.1)",
        }
    }

    pub fn current(&self, params: &GlobalParameters) -> String {
        match self {
            GlobalParameter::K => params.k().to_string(),
            GlobalParameter::L => params.l().to_string(),
            GlobalParameter::T => params.t().to_string(),
            GlobalParameter::Epsilon => params.epsilon().to_string(),
        }
    }

    /// Parses the typed value and stores it. `params` is unchanged on error.
    pub fn apply(&self, params: &mut GlobalParameters, input: &str) -> Result<(), String> {
        let input = input.trim();
        let result = match self {
            GlobalParameter::K => params.set_k(parse_number(self, input)?),
            GlobalParameter::L => params.set_l(parse_number(self, input)?),
            GlobalParameter::T => params.set_t(parse_number(self, input)?),
            GlobalParameter::Epsilon => params.set_epsilon(parse_number(self, input)?),
        };
        result.map_err(|e| e.to_string())
    }
}

impl Display for GlobalParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlobalParameter::K => write!(f, "k"),
            GlobalParameter::L => write!(f, "l"),
            GlobalParameter::T => write!(f, "t"),
            GlobalParameter::Epsilon => write!(f, "epsilon"),
        }
    }
}

/// Prompt for the single parameter of a technique, `None` for `Technique::None`.
pub fn technique_prompt(technique: Technique) -> Option<&'static str> {
    match technique {
        Technique::None => None,
        Technique::Generalization => Some("Number of bins (2-10)"),
        Technique::Suppression => Some("Suppression threshold (0.0-1.0)"),
        Technique::DifferentialPrivacy => Some("Epsilon (0.1-10.0)"),
    }
}

/// The parameter value as it is pre-filled in the prompt.
pub fn technique_input(parameters: &TechniqueParameters) -> String {
    match parameters {
        TechniqueParameters::None => String::new(),
        TechniqueParameters::Generalization { bins } => bins.to_string(),
        TechniqueParameters::Suppression { threshold } => threshold.to_string(),
        TechniqueParameters::DifferentialPrivacy { epsilon } => epsilon.to_string(),
    }
}

/// Parses the typed parameter of `technique` and checks it against its domain.
pub fn parse_technique_parameters(
    technique: Technique,
    input: &str,
) -> Result<TechniqueParameters, String> {
    let input = input.trim();
    let parameters = match technique {
        Technique::None => TechniqueParameters::None,
        Technique::Generalization => TechniqueParameters::Generalization {
            bins: input
                .parse()
                .map_err(|_| "bins must be a whole number within [2, 10]".to_string())?,
        },
        Technique::Suppression => TechniqueParameters::Suppression {
            threshold: input
                .parse()
                .map_err(|_| format!("'{input}' is not a number"))?,
        },
        Technique::DifferentialPrivacy => TechniqueParameters::DifferentialPrivacy {
            epsilon: input
                .parse()
                .map_err(|_| format!("'{input}' is not a number"))?,
        },
    };

    parameters.validate().map_err(|e| e.to_string())?;
    Ok(parameters)
}

fn parse_number<T: std::str::FromStr>(parameter: &GlobalParameter, input: &str) -> Result<T, String> {
    input
        .parse()
        .map_err(|_| format!("'{input}' is not a valid value for {parameter}"))
}

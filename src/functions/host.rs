use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cell::{CellOutput, CellValue};
use crate::functions::{impact_score, impact_verdict, omitted_verdict, standard_block};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomFunction {
    StandardBlock,
    ImpactScore,
    ImpactVerdict,
}

impl CustomFunction {
    pub const ALL: [CustomFunction; 3] = [
        CustomFunction::StandardBlock,
        CustomFunction::ImpactScore,
        CustomFunction::ImpactVerdict,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::StandardBlock => "STANDARD_BLOCK",
            Self::ImpactScore => "IMPACT_SCORE",
            Self::ImpactVerdict => "IMPACT_VERDICT",
        }
    }

    pub fn signature(&self) -> &'static str {
        match self {
            Self::StandardBlock => "STANDARD_BLOCK([targetRatio])",
            Self::ImpactScore => "IMPACT_SCORE(value, [targetRatio])",
            Self::ImpactVerdict => "IMPACT_VERDICT(score)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::StandardBlock => "Standard block capacity for a target ratio (default 1.0)",
            Self::ImpactScore => "Announced value divided by the standard block",
            Self::ImpactVerdict => "Verdict label for an impact score",
        }
    }

    /// Evaluates the function over positional host arguments. Missing
    /// arguments count as omitted and extra ones are ignored.
    pub fn invoke(&self, args: &[CellValue]) -> CellOutput {
        debug!(function = self.name(), ?args, "invoking custom function");
        match self {
            Self::StandardBlock => match standard_block(args.first()) {
                Ok(block) => CellOutput::Number(block),
                Err(err) => CellOutput::Text(err.to_string()),
            },
            Self::ImpactScore => match impact_score(args.first(), args.get(1)) {
                Ok(score) => {
                    if !score.is_finite() {
                        warn!(score, "IMPACT_SCORE produced a non-finite score");
                    }
                    CellOutput::Number(score)
                }
                Err(err) => {
                    warn!("IMPACT_SCORE ratio rejected: {err}");
                    CellOutput::Number(f64::NAN)
                }
            },
            Self::ImpactVerdict => {
                let verdict = match args.first() {
                    Some(score) => impact_verdict(score),
                    None => omitted_verdict(),
                };
                CellOutput::Text(verdict.label().to_string())
            }
        }
    }
}

impl Display for CustomFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Error)]
#[error("unknown custom function: {0}")]
pub struct UnknownFunction(pub String);

impl FromStr for CustomFunction {
    type Err = UnknownFunction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "STANDARD_BLOCK" => Ok(Self::StandardBlock),
            "IMPACT_SCORE" => Ok(Self::ImpactScore),
            "IMPACT_VERDICT" => Ok(Self::ImpactVerdict),
            _ => Err(UnknownFunction(s.to_string())),
        }
    }
}

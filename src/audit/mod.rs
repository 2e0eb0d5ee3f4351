//! Budget distortion audit.
//!
//! Each settled budget line is normalized twice: its money against the budget
//! of one standard block scaled to the city, and its beneficiaries against the
//! standard block population. The ratio of the two is the distortion index.

pub mod reader;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::block_size;

pub const DEFAULT_CITY_POPULATION: f64 = 435_000.0;

/// Coverage at or below this counts as nobody served.
pub const MIN_COVERAGE_IMPACT: f64 = 0.0001;
pub const UNSERVED_DISTORTION: f64 = 9_999.0;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("invalid audit parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("missing CSV column: {0}")]
    MissingColumn(&'static str),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditRow {
    #[serde(rename = "事業名", alias = "project")]
    pub project: String,
    #[serde(rename = "決算額", alias = "budget")]
    pub budget: f64,
    #[serde(rename = "推定受益者数", alias = "beneficiaries")]
    pub beneficiaries: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AuditParams {
    pub city_population: f64,
    pub standard_budget_unit: f64,
}

impl AuditParams {
    pub fn new(city_population: f64, standard_budget_unit: f64) -> Result<Self, AuditError> {
        for (name, value) in [
            ("city_population", city_population),
            ("standard_budget_unit", standard_budget_unit),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AuditError::InvalidParameter { name, value });
            }
        }
        Ok(Self {
            city_population,
            standard_budget_unit,
        })
    }

    /// Budget of one standard block scaled to this city's size.
    pub fn local_budget_unit(&self) -> f64 {
        self.standard_budget_unit * (self.city_population / block_size(1.0))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DistortionVerdict {
    HighEfficiency,
    Appropriate,
    HighCost,
    Abnormal,
}

impl DistortionVerdict {
    pub fn classify(distortion: f64) -> Self {
        if distortion > 50.0 {
            Self::Abnormal
        } else if distortion > 10.0 {
            Self::HighCost
        } else if distortion < 1.0 {
            Self::HighEfficiency
        } else {
            Self::Appropriate
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::HighEfficiency => "💎 高効率",
            Self::Appropriate => "✅ 適正",
            Self::HighCost => "⚠️ 高コスト",
            Self::Abnormal => "🚨 異常な歪み",
        }
    }
}

impl Display for DistortionVerdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditFinding {
    pub project: String,
    pub budget: f64,
    pub coverage_impact: f64,
    pub budget_impact: f64,
    pub distortion: f64,
    pub verdict: DistortionVerdict,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditReport {
    pub params: AuditParams,
    pub standard_block_population: f64,
    pub local_budget_unit: f64,
    pub findings: Vec<AuditFinding>,
}

pub fn audit_row(row: &AuditRow, params: &AuditParams) -> AuditFinding {
    let std_block_pop = block_size(1.0);
    let budget_impact = row.budget / params.local_budget_unit();
    let coverage_impact = row.beneficiaries / std_block_pop;
    let distortion = if coverage_impact <= MIN_COVERAGE_IMPACT {
        UNSERVED_DISTORTION
    } else {
        budget_impact / coverage_impact
    };
    AuditFinding {
        project: row.project.clone(),
        budget: row.budget,
        coverage_impact,
        budget_impact,
        distortion,
        verdict: DistortionVerdict::classify(distortion),
    }
}

/// Findings come back worst distortion first. Rows whose distortion is not a
/// number go last.
pub fn audit_rows(rows: &[AuditRow], params: AuditParams) -> AuditReport {
    let mut findings = rows
        .iter()
        .map(|row| audit_row(row, &params))
        .collect::<Vec<_>>();
    findings.sort_by(|a, b| {
        a.distortion
            .is_nan()
            .cmp(&b.distortion.is_nan())
            .then_with(|| b.distortion.total_cmp(&a.distortion))
    });
    AuditReport {
        params,
        standard_block_population: block_size(1.0),
        local_budget_unit: params.local_budget_unit(),
        findings,
    }
}

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub const LOCALIZED_THRESHOLD: f64 = 1.0;
pub const EFFECTIVE_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Blank,
    ErrorLevel,
    Localized,
    Effective,
}

impl Verdict {
    /// NaN compares false against both thresholds and lands on `Effective`,
    /// as it does in the spreadsheet.
    pub fn from_score(score: f64) -> Self {
        if score < LOCALIZED_THRESHOLD {
            Self::ErrorLevel
        } else if score < EFFECTIVE_THRESHOLD {
            Self::Localized
        } else {
            Self::Effective
        }
    }

    pub fn as_slug(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::ErrorLevel => "error_level",
            Self::Localized => "localized",
            Self::Effective => "effective",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Blank => "",
            Self::ErrorLevel => "❌ 誤差レベル (Error Level: < 1.0)",
            Self::Localized => "⚠️ 局所的 (Localized: 1.0 - 9.9)",
            Self::Effective => "✅ 実効性あり (Effective: >= 10)",
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

//! Six-level "social implementation stage" reading of an impact score.
//!
//! The reference densities: a post office sits at roughly I = 14, a
//! convenience store at I = 32, 1 % of the population at I = 700 and 10 % at
//! I = 7000.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Error,
    Localized,
    Infrastructure,
    Convenience,
    Penetration,
    SocialOs,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Error,
        Stage::Localized,
        Stage::Infrastructure,
        Stage::Convenience,
        Stage::Penetration,
        Stage::SocialOs,
    ];

    pub fn classify(impact: f64) -> Self {
        match impact {
            i if i < 1.0 => Self::Error,
            i if i < 14.0 => Self::Localized,
            i if i < 32.0 => Self::Infrastructure,
            i if i < 700.0 => Self::Convenience,
            i if i < 7_000.0 => Self::Penetration,
            _ => Self::SocialOs,
        }
    }

    pub fn as_slug(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Localized => "localized",
            Self::Infrastructure => "infrastructure",
            Self::Convenience => "convenience",
            Self::Penetration => "penetration",
            Self::SocialOs => "social_os",
        }
    }

    /// Inclusive lower bound of the stage.
    pub fn lower_bound(self) -> f64 {
        match self {
            Self::Error => f64::NEG_INFINITY,
            Self::Localized => 1.0,
            Self::Infrastructure => 14.0,
            Self::Convenience => 32.0,
            Self::Penetration => 700.0,
            Self::SocialOs => 7_000.0,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Error => "💀【誤差レベル (Error)】",
            Self::Localized => "⚠️【局所的 (Localized)】",
            Self::Infrastructure => "🏠【基礎インフラ級 (Infrastructure)】",
            Self::Convenience => "🏪【コンビニ級 (Convenience)】",
            Self::Penetration => "🚀【普及フェーズ (Penetration)】",
            Self::SocialOs => "👑【社会OS級 (Social OS)】",
        }
    }

    pub fn finding(self) -> &'static str {
        match self {
            Self::Error => "1自治体すらカバーできていません。社会インフラとして機能不全です。",
            Self::Localized => {
                "一部地域での実験段階です。郵便局(I=14)のような「基礎インフラ」には達していません。"
            }
            Self::Infrastructure => {
                "郵便局(I=14)と同等の密度です。物理的な拠点としては十分ですが、デジタルとしては物足りません。"
            }
            Self::Convenience => {
                "コンビニ(I=32)を超えています。生活圏に浸透していますが、住民全体の認知(1%)には届いていません。"
            }
            Self::Penetration => {
                "人口の1%を超えました。アーリーアダプターに届き、自律的な普及が始まっています。"
            }
            Self::SocialOs => {
                "人口の10%を超えました。水道や電気のように、なくてはならない社会基盤です。"
            }
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::Stage;

    #[test]
    fn boundaries_are_inclusive_lower_bounds() {
        for stage in Stage::ALL.iter().skip(1) {
            assert_eq!(Stage::classify(stage.lower_bound()), *stage);
        }
        assert_eq!(Stage::classify(0.999), Stage::Error);
        assert_eq!(Stage::classify(13.99), Stage::Localized);
        assert_eq!(Stage::classify(31.99), Stage::Infrastructure);
        assert_eq!(Stage::classify(699.9), Stage::Convenience);
        assert_eq!(Stage::classify(6_999.9), Stage::Penetration);
    }

    #[test]
    fn stages_are_ordered_by_reach() {
        let mut sorted = Stage::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, Stage::ALL.to_vec());
        assert!(Stage::classify(0.0) < Stage::classify(10_000.0));
    }
}

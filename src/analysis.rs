use serde::{Deserialize, Serialize};

use crate::block::block_size;
use crate::functions::Verdict;
use crate::stage::Stage;

/// One announced figure measured against the standard block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImpactReport {
    pub value: f64,
    pub target_ratio: f64,
    pub standard_block: f64,
    pub impact: f64,
    pub verdict: Verdict,
    pub stage: Stage,
}

impl ImpactReport {
    /// Unlike `IMPACT_SCORE`, an empty block reads as zero impact here.
    pub fn compute(value: f64, target_ratio: f64) -> Self {
        let standard_block = block_size(target_ratio);
        let impact = if standard_block == 0.0 {
            0.0
        } else {
            value / standard_block
        };
        Self {
            value,
            target_ratio,
            standard_block,
            impact,
            verdict: Verdict::from_score(impact),
            stage: Stage::classify(impact),
        }
    }

    pub fn summary(&self) -> String {
        format!("{}\n   判定: {}", self.stage.title(), self.stage.finding())
    }
}

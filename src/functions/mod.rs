//! The three spreadsheet custom functions, with typed results.
//!
//! `host` flattens these results into cell values; everything in this module
//! stays strongly typed.

pub mod host;
pub mod verdict;

use thiserror::Error;

use crate::block::{block_size, impact_of, DEFAULT_TARGET_RATIO};
use crate::cell::CellValue;

pub use verdict::Verdict;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatioError {
    #[error("Error: Ratio must be a number")]
    NotNumeric,
}

/// `STANDARD_BLOCK(targetRatio)`. An omitted ratio means the whole
/// population; a present ratio must be a number.
pub fn standard_block(target_ratio: Option<&CellValue>) -> Result<f64, RatioError> {
    let ratio = match target_ratio {
        None => DEFAULT_TARGET_RATIO,
        Some(cell) => cell.as_number().ok_or(RatioError::NotNumeric)?,
    };
    Ok(block_size(ratio))
}

/// `IMPACT_SCORE(value, targetRatio)`. A falsy value short-circuits to `0`
/// before the ratio is looked at. A zero ratio is not guarded and yields a
/// non-finite score.
pub fn impact_score(
    value: Option<&CellValue>,
    target_ratio: Option<&CellValue>,
) -> Result<f64, RatioError> {
    let Some(value) = value.filter(|v| v.is_truthy()) else {
        return Ok(0.0);
    };
    let block = standard_block(target_ratio)?;
    Ok(impact_of(value.coerce_number(), block))
}

/// `IMPACT_VERDICT(score)`. Only the empty string passes through as blank;
/// a null cell coerces to `0`.
pub fn impact_verdict(score: &CellValue) -> Verdict {
    if score.is_blank_sentinel() {
        return Verdict::Blank;
    }
    Verdict::from_score(score.coerce_number())
}

/// `IMPACT_VERDICT()` with no argument: the score is undefined, fails both
/// thresholds and reads as effective.
pub fn omitted_verdict() -> Verdict {
    Verdict::from_score(f64::NAN)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::block::{MUNICIPALITIES, POPULATION};

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    #[test]
    fn omitted_ratio_defaults_to_whole_population() {
        let block = standard_block(None).expect("numeric block");
        assert_eq!(block, POPULATION as f64 / MUNICIPALITIES as f64);
        assert_eq!(block.round(), 72_177.0);
    }

    #[test]
    fn non_numeric_ratio_is_an_error_with_host_text() {
        let err = standard_block(Some(&CellValue::from("x"))).expect_err("text ratio");
        assert_eq!(err.to_string(), "Error: Ratio must be a number");
        assert!(standard_block(Some(&CellValue::from(""))).is_err());
        assert!(standard_block(Some(&CellValue::Empty)).is_err());
        assert!(standard_block(Some(&CellValue::Bool(true))).is_err());
    }

    #[test]
    fn zero_ratio_gives_zero_block() {
        assert_eq!(standard_block(Some(&num(0.0))), Ok(0.0));
    }

    #[test]
    fn falsy_value_scores_zero_without_touching_the_ratio() {
        let bad_ratio = CellValue::from("x");
        assert_eq!(impact_score(None, Some(&bad_ratio)), Ok(0.0));
        assert_eq!(impact_score(Some(&num(0.0)), Some(&bad_ratio)), Ok(0.0));
        assert_eq!(impact_score(Some(&CellValue::from("")), None), Ok(0.0));
        assert_eq!(impact_score(Some(&CellValue::Empty), Some(&num(0.0))), Ok(0.0));
    }

    #[test]
    fn truthy_value_with_text_ratio_is_an_error() {
        assert_eq!(
            impact_score(Some(&num(5.0)), Some(&CellValue::from("x"))),
            Err(RatioError::NotNumeric)
        );
    }

    #[test]
    fn zero_ratio_is_not_guarded() {
        let score = impact_score(Some(&num(5.0)), Some(&num(0.0))).expect("numeric ratio");
        assert!(score.is_infinite());
    }

    #[test]
    fn text_values_are_coerced() {
        let block = POPULATION as f64 / MUNICIPALITIES as f64;
        let score = impact_score(Some(&CellValue::from("1000")), None).expect("numeric");
        assert_eq!(score, 1000.0 / block);
        let score = impact_score(Some(&CellValue::from("abc")), None).expect("numeric");
        assert!(score.is_nan());
    }

    #[test]
    fn ten_blocks_is_effective() {
        let score = impact_score(Some(&num(721_770.0)), Some(&num(1.0))).expect("numeric");
        assert!((score - 10.0).abs() < 0.01);
        assert_eq!(impact_verdict(&num(10.0)), Verdict::Effective);
    }

    #[test]
    fn verdict_boundaries_are_half_open() {
        assert_eq!(impact_verdict(&CellValue::from("")), Verdict::Blank);
        assert_eq!(impact_verdict(&CellValue::from("")).label(), "");
        assert_eq!(impact_verdict(&num(0.5)), Verdict::ErrorLevel);
        assert_eq!(impact_verdict(&num(1.0)), Verdict::Localized);
        assert_eq!(impact_verdict(&num(9.999)), Verdict::Localized);
        assert_eq!(impact_verdict(&num(10.0)), Verdict::Effective);
    }

    #[test]
    fn verdict_of_non_finite_scores_falls_through_to_effective() {
        assert_eq!(impact_verdict(&num(f64::INFINITY)), Verdict::Effective);
        assert_eq!(impact_verdict(&num(f64::NAN)), Verdict::Effective);
        assert_eq!(impact_verdict(&num(f64::NEG_INFINITY)), Verdict::ErrorLevel);
    }

    #[test]
    fn null_score_is_error_level_and_omitted_score_is_effective() {
        assert_eq!(impact_verdict(&CellValue::Empty), Verdict::ErrorLevel);
        assert_eq!(omitted_verdict(), Verdict::Effective);
    }

    proptest! {
        #[test]
        fn block_is_linear_in_ratio(r in 0.0f64..=1.0) {
            let block = standard_block(Some(&num(r))).expect("numeric ratio");
            prop_assert_eq!(block, POPULATION as f64 * r / MUNICIPALITIES as f64);
        }

        #[test]
        fn zero_value_scores_zero_for_any_ratio(r in -10.0f64..10.0) {
            prop_assert_eq!(impact_score(Some(&num(0.0)), Some(&num(r))), Ok(0.0));
        }

        #[test]
        fn default_ratio_score_divides_by_whole_block(v in 1.0f64..1e9) {
            let expected = v / (POPULATION as f64 / MUNICIPALITIES as f64);
            prop_assert_eq!(impact_score(Some(&num(v)), Some(&num(1.0))), Ok(expected));
        }
    }
}

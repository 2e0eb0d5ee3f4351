use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize, Serializer};

/// A value handed over by the spreadsheet host for one function argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// The host's way of saying "blank cell".
    pub fn is_blank_sentinel(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(text) => !text.is_empty(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Loose numeric reading used for comparisons and division. Unparsable
    /// text reads as NaN.
    pub fn coerce_number(&self) -> f64 {
        match self {
            Self::Empty => 0.0,
            Self::Bool(true) => 1.0,
            Self::Bool(false) => 0.0,
            Self::Number(n) => *n,
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    parse_number_text(trimmed).unwrap_or(f64::NAN)
                }
            }
        }
    }

    /// Reads an argument typed on the command line the way a formula bar
    /// would.
    pub fn parse_formula_arg(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Text(String::new());
        }
        if raw.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        match parse_number_text(raw.trim()) {
            Some(n) => Self::Number(n),
            None => Self::Text(raw.to_string()),
        }
    }
}

/// Numeric text as a formula engine reads it: decimal or exponent notation,
/// or exactly `Infinity` with an optional sign. Rust's own spellings such as
/// `inf` and `nan` are not numbers here.
fn parse_number_text(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if unsigned == "Infinity" {
        return Some(if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    if !unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    text.parse::<f64>().ok()
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// What a custom function writes back into its cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellOutput {
    Number(f64),
    Text(String),
}

#[cfg(test)]
impl CellOutput {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

impl Display for CellOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => match non_finite_label(*n) {
                Some(label) => write!(f, "{label}"),
                None => write!(f, "{n}"),
            },
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

// JSON has no spelling for infinities or NaN.
impl Serialize for CellOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => match non_finite_label(*n) {
                Some(label) => serializer.serialize_str(label),
                None => serializer.serialize_f64(*n),
            },
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

fn non_finite_label(n: f64) -> Option<&'static str> {
    if n.is_nan() {
        Some("NaN")
    } else if n == f64::INFINITY {
        Some("Infinity")
    } else if n == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}

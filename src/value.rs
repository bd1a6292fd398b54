//! Logic values and the 2-valued/3-valued logic models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single-bit digital logic value.
///
/// The four-character encoding `0`, `1`, `U`, `X` from the external
/// interface maps directly onto these variants via [`LogicValue::as_char`]
/// and [`LogicValue::from_char`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicValue {
    /// Logic low (`0`).
    Zero,
    /// Logic high (`1`).
    One,
    /// Unknown/uninitialized (`U`). Only meaningful in 3-valued mode.
    Unknown,
    /// Conflict (`X`), e.g. from a multiply-driven net or an inverted
    /// already-undefined value.
    Conflict,
}

impl LogicValue {
    /// Encode as the external single-character representation.
    pub fn as_char(self) -> char {
        match self {
            LogicValue::Zero => '0',
            LogicValue::One => '1',
            LogicValue::Unknown => 'U',
            LogicValue::Conflict => 'X',
        }
    }

    /// Decode from the external single-character representation.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(LogicValue::Zero),
            '1' => Some(LogicValue::One),
            'U' | 'u' => Some(LogicValue::Unknown),
            'X' | 'x' => Some(LogicValue::Conflict),
            _ => None,
        }
    }
}

impl fmt::Display for LogicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Selects which value domain a scheduler operates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicModel {
    /// `{0, 1}` — unknowns collapse to `X` rather than propagating as `U`.
    TwoValued,
    /// `{0, 1, U}`.
    ThreeValued,
}

impl LogicModel {
    /// The value nets are initialized to under this model.
    pub fn initial_value(self) -> LogicValue {
        match self {
            LogicModel::TwoValued => LogicValue::Zero,
            LogicModel::ThreeValued => LogicValue::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_roundtrip() {
        for v in [
            LogicValue::Zero,
            LogicValue::One,
            LogicValue::Unknown,
            LogicValue::Conflict,
        ] {
            assert_eq!(LogicValue::from_char(v.as_char()), Some(v));
        }
    }

    #[test]
    fn initial_values() {
        assert_eq!(LogicModel::TwoValued.initial_value(), LogicValue::Zero);
        assert_eq!(LogicModel::ThreeValued.initial_value(), LogicValue::Unknown);
    }

    #[test]
    fn unrecognized_char_is_none() {
        assert_eq!(LogicValue::from_char('?'), None);
    }
}

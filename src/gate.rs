//! Gate types and the pure logic evaluators of §4.1.

use crate::error::BuildError;
use crate::net::NetId;
use crate::value::{LogicModel, LogicValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a gate, assigned in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GateId(pub u32);

impl GateId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

/// The enumerated gate type set. Case-insensitive when parsed from a
/// string via [`GateKind::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Xnor,
}

impl GateKind {
    /// Parse a gate type name, case-insensitively.
    pub fn parse(name: &str) -> Result<Self, BuildError> {
        match name.to_ascii_uppercase().as_str() {
            "AND" => Ok(GateKind::And),
            "OR" => Ok(GateKind::Or),
            "NOT" => Ok(GateKind::Not),
            "NAND" => Ok(GateKind::Nand),
            "NOR" => Ok(GateKind::Nor),
            "XOR" => Ok(GateKind::Xor),
            "XNOR" => Ok(GateKind::Xnor),
            _ => Err(BuildError::UnsupportedGate(name.to_string())),
        }
    }

    /// Whether this gate type accepts exactly one input (`NOT`) or any
    /// number `>= 1` (everything else).
    fn validate_arity(self, input_count: usize) -> Result<(), BuildError> {
        match self {
            GateKind::Not if input_count != 1 => Err(BuildError::ArityError {
                kind: self,
                expected: "exactly one input",
                got: input_count,
            }),
            _ if input_count == 0 => Err(BuildError::ArityError {
                kind: self,
                expected: "at least one input",
                got: input_count,
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Not => "NOT",
            GateKind::Nand => "NAND",
            GateKind::Nor => "NOR",
            GateKind::Xor => "XOR",
            GateKind::Xnor => "XNOR",
        };
        write!(f, "{s}")
    }
}

/// A combinational gate: immutable once constructed, a pure function of
/// its input values and the active logic model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    id: GateId,
    kind: GateKind,
    inputs: Vec<NetId>,
    output: NetId,
}

impl Gate {
    pub(crate) fn new(
        id: GateId,
        kind: GateKind,
        inputs: Vec<NetId>,
        output: NetId,
    ) -> Result<Self, BuildError> {
        kind.validate_arity(inputs.len())?;
        Ok(Gate {
            id,
            kind,
            inputs,
            output,
        })
    }

    pub fn id(&self) -> GateId {
        self.id
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn inputs(&self) -> &[NetId] {
        &self.inputs
    }

    pub fn output(&self) -> NetId {
        self.output
    }

    /// Evaluate this gate's output given the current value of each of its
    /// inputs, in the same order as [`Gate::inputs`].
    ///
    /// Short-circuits on the controlling value for AND/OR (and their
    /// inversions) so a `0` fed to AND, or a `1` fed to OR, is decisive
    /// regardless of unknowns elsewhere on the gate.
    pub fn evaluate(&self, input_values: &[LogicValue], model: LogicModel) -> LogicValue {
        debug_assert_eq!(input_values.len(), self.inputs.len());
        match self.kind {
            GateKind::And => and(input_values, model),
            GateKind::Or => or(input_values, model),
            GateKind::Not => not(input_values[0], model),
            GateKind::Nand => invert(and(input_values, model), model),
            GateKind::Nor => invert(or(input_values, model), model),
            GateKind::Xor => xor(input_values, model),
            GateKind::Xnor => invert(xor(input_values, model), model),
        }
    }
}

fn and(values: &[LogicValue], model: LogicModel) -> LogicValue {
    for &v in values {
        if v == LogicValue::Zero {
            return LogicValue::Zero;
        }
        if model == LogicModel::ThreeValued && v == LogicValue::Unknown {
            return LogicValue::Unknown;
        }
    }
    LogicValue::One
}

fn or(values: &[LogicValue], model: LogicModel) -> LogicValue {
    for &v in values {
        if v == LogicValue::One {
            return LogicValue::One;
        }
        if model == LogicModel::ThreeValued && v == LogicValue::Unknown {
            return LogicValue::Unknown;
        }
    }
    LogicValue::Zero
}

fn xor(values: &[LogicValue], _model: LogicModel) -> LogicValue {
    let mut ones = 0usize;
    for &v in values {
        if v == LogicValue::Unknown {
            return LogicValue::Unknown;
        }
        if v == LogicValue::One {
            ones += 1;
        }
    }
    if ones % 2 == 1 {
        LogicValue::One
    } else {
        LogicValue::Zero
    }
}

fn not(value: LogicValue, model: LogicModel) -> LogicValue {
    match value {
        LogicValue::Zero => LogicValue::One,
        LogicValue::One => LogicValue::Zero,
        LogicValue::Unknown if model == LogicModel::ThreeValued => LogicValue::Unknown,
        _ => LogicValue::Conflict,
    }
}

/// Inverts an AND/OR/XOR result that is guaranteed to be `Zero`, `One`,
/// or `Unknown` (never `Conflict` — see the evaluators above).
fn invert(inner: LogicValue, model: LogicModel) -> LogicValue {
    if inner == LogicValue::Unknown {
        return LogicValue::Unknown;
    }
    not(inner, model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(kind: GateKind, n_inputs: usize) -> Gate {
        let inputs: Vec<NetId> = (0..n_inputs).map(|i| NetId(i as u32)).collect();
        Gate::new(GateId(0), kind, inputs, NetId(n_inputs as u32)).unwrap()
    }

    #[test]
    fn and_short_circuits_on_zero() {
        let g = gate(GateKind::And, 2);
        let v = g.evaluate(&[LogicValue::Zero, LogicValue::Unknown], LogicModel::ThreeValued);
        assert_eq!(v, LogicValue::Zero);
    }

    #[test]
    fn and_two_valued_basic_truth_table() {
        let g = gate(GateKind::And, 2);
        use LogicValue::*;
        assert_eq!(g.evaluate(&[Zero, Zero], LogicModel::TwoValued), Zero);
        assert_eq!(g.evaluate(&[Zero, One], LogicModel::TwoValued), Zero);
        assert_eq!(g.evaluate(&[One, Zero], LogicModel::TwoValued), Zero);
        assert_eq!(g.evaluate(&[One, One], LogicModel::TwoValued), One);
    }

    #[test]
    fn and_three_valued_unknown_propagates_unless_shortcircuited() {
        let g = gate(GateKind::And, 2);
        use LogicValue::*;
        assert_eq!(g.evaluate(&[One, Unknown], LogicModel::ThreeValued), Unknown);
        assert_eq!(g.evaluate(&[Zero, Unknown], LogicModel::ThreeValued), Zero);
    }

    #[test]
    fn or_short_circuits_on_one() {
        let g = gate(GateKind::Or, 2);
        let v = g.evaluate(&[LogicValue::One, LogicValue::Unknown], LogicModel::ThreeValued);
        assert_eq!(v, LogicValue::One);
    }

    #[test]
    fn not_truth_table() {
        let g = gate(GateKind::Not, 1);
        use LogicValue::*;
        assert_eq!(g.evaluate(&[Zero], LogicModel::TwoValued), One);
        assert_eq!(g.evaluate(&[One], LogicModel::TwoValued), Zero);
        assert_eq!(g.evaluate(&[Unknown], LogicModel::ThreeValued), Unknown);
        assert_eq!(g.evaluate(&[Unknown], LogicModel::TwoValued), Conflict);
        assert_eq!(g.evaluate(&[Conflict], LogicModel::ThreeValued), Conflict);
    }

    #[test]
    fn nand_nor_xnor_invert_their_base_gate() {
        use LogicValue::*;
        let nand = gate(GateKind::Nand, 2);
        assert_eq!(nand.evaluate(&[One, One], LogicModel::TwoValued), Zero);
        assert_eq!(nand.evaluate(&[Zero, One], LogicModel::TwoValued), One);

        let nor = gate(GateKind::Nor, 2);
        assert_eq!(nor.evaluate(&[Zero, Zero], LogicModel::TwoValued), One);
        assert_eq!(nor.evaluate(&[One, Zero], LogicModel::TwoValued), Zero);

        let xnor = gate(GateKind::Xnor, 2);
        assert_eq!(xnor.evaluate(&[One, One], LogicModel::TwoValued), One);
        assert_eq!(xnor.evaluate(&[One, Zero], LogicModel::TwoValued), Zero);
    }

    #[test]
    fn xor_is_parity_and_propagates_unknown_unconditionally() {
        use LogicValue::*;
        let xor3 = gate(GateKind::Xor, 3);
        assert_eq!(xor3.evaluate(&[One, One, One], LogicModel::TwoValued), One);
        assert_eq!(xor3.evaluate(&[One, One, Zero], LogicModel::TwoValued), Zero);
        assert_eq!(
            xor3.evaluate(&[One, Unknown, Zero], LogicModel::TwoValued),
            Unknown
        );
    }

    #[test]
    fn not_requires_exactly_one_input() {
        let err = Gate::new(GateId(0), GateKind::Not, vec![NetId(0), NetId(1)], NetId(2))
            .unwrap_err();
        assert!(matches!(err, BuildError::ArityError { .. }));
    }

    #[test]
    fn and_requires_at_least_one_input() {
        let err = Gate::new(GateId(0), GateKind::And, vec![], NetId(0)).unwrap_err();
        assert!(matches!(err, BuildError::ArityError { .. }));
    }

    #[test]
    fn unsupported_gate_type_is_rejected() {
        assert!(matches!(
            GateKind::parse("XORX"),
            Err(BuildError::UnsupportedGate(_))
        ));
        assert_eq!(GateKind::parse("and").unwrap(), GateKind::And);
        assert_eq!(GateKind::parse("NAND").unwrap(), GateKind::Nand);
    }
}

//! Shared helpers used by all five scheduler implementations.

use crate::circuit::Circuit;
use crate::hazard::{Hazard, HazardKind};
use crate::net::NetId;
use crate::value::{LogicModel, LogicValue};
use std::collections::HashMap;

/// A single `simulate_vector` call's worth of input assignments. Nets
/// absent from the map retain their current value (§4.2, §6).
pub type InputVector = HashMap<NetId, LogicValue>;

/// A snapshot of the primary outputs at one point in time, as recorded
/// in `output_log` and `intermediate_log`.
pub type OutputSnapshot = HashMap<NetId, LogicValue>;

/// External contract shared by all five scheduler variants (§6).
///
/// Each scheduler is constructed against a [`Circuit`] and retains
/// mutable per-net state across successive [`Scheduler::simulate_vector`]
/// calls; `simulate_vector` is not re-entrant on the same instance (§5).
pub trait Scheduler {
    /// Apply one input vector, settle the circuit, and return the
    /// hazards observed while doing so.
    fn simulate_vector(&mut self, inputs: &InputVector) -> Vec<Hazard>;

    /// One entry per completed `simulate_vector` call.
    fn output_log(&self) -> &[OutputSnapshot];

    /// Time-stamped primary-output snapshots taken during settling.
    /// Always empty for schedulers that don't model delay.
    fn intermediate_log(&self) -> &[(u64, OutputSnapshot)];

    /// Total number of gate evaluations performed across all vectors so
    /// far. Monotonically non-decreasing.
    fn gate_sim_count(&self) -> u64;

    /// The current value of a net.
    fn net_value(&self, net: NetId) -> LogicValue;
}

/// The initial net-value vector for a freshly constructed scheduler:
/// all-`0` in 2-valued mode, all-`U` in 3-valued mode (§3).
pub(crate) fn initial_values(circuit: &Circuit, model: LogicModel) -> Vec<LogicValue> {
    vec![model.initial_value(); circuit.net_count()]
}

/// Snapshot the primary outputs' current values.
pub(crate) fn snapshot_outputs(circuit: &Circuit, values: &[LogicValue]) -> OutputSnapshot {
    circuit
        .primary_outputs()
        .iter()
        .map(|&n| (n, values[n.index()]))
        .collect()
}

/// Whether a primary input assignment should be treated as an active
/// change this vector: either the value genuinely differs from the
/// stored one, or (2-valued mode only) the net is still marked from
/// construction (§4.3). `mark` is `None` for schedulers that don't
/// implement the mark-flag mechanism (§9 open question, resolved against
/// `original_source/src.py`: only Two-List and Single-List-Event carry
/// one).
pub(crate) fn input_is_active(
    new_value: LogicValue,
    current_value: LogicValue,
    mark: Option<bool>,
    model: LogicModel,
) -> bool {
    new_value != current_value || (model == LogicModel::TwoValued && mark.unwrap_or(false))
}

/// Classify every net whose `change_count` exceeds one as a static or
/// dynamic hazard (§4.3 step 5, shared verbatim by every delay-aware
/// scheduler).
pub(crate) fn detect_hazards(old_values: &[LogicValue], new_values: &[LogicValue], change_count: &[u32]) -> Vec<Hazard> {
    let mut hazards = Vec::new();
    for (i, &count) in change_count.iter().enumerate() {
        if count > 1 {
            let net = NetId(i as u32);
            let kind = if old_values[i] == new_values[i] {
                HazardKind::Static
            } else {
                HazardKind::Dynamic
            };
            hazards.push(Hazard { net, kind });
        }
    }
    hazards
}

/// Build an [`InputVector`] from `(net, value)` pairs. Test-only
/// convenience — production callers build the map from whatever
/// boundary representation (name lookups, a parsed test vector file,
/// etc.) they have.
#[cfg(test)]
pub(crate) fn input_vector(pairs: &[(NetId, LogicValue)]) -> InputVector {
    pairs.iter().copied().collect()
}

//! Single-list event scheduler — §4.4.
//!
//! One queue carries both net-change events and time-marker sentinels.
//! A gate is evaluated the moment its driving event is dequeued rather
//! than being deferred to a second queue, so duplicate pending events on
//! the same net are suppressed with a name-indexed latest-pending-value
//! map instead of a linear scan over the queue.

use crate::circuit::Circuit;
use crate::hazard::Hazard;
use crate::net::NetId;
use crate::schedulers::common::{
    detect_hazards, initial_values, input_is_active, snapshot_outputs, InputVector,
    OutputSnapshot, Scheduler,
};
use crate::value::{LogicModel, LogicValue};
use std::collections::VecDeque;
use std::rc::Rc;

/// A single-list entry: either a pending net change or a time-marker
/// sentinel separating one time unit from the next.
enum Entry {
    Change(NetId, LogicValue),
    Marker,
}

pub struct SingleListEventScheduler {
    circuit: Rc<Circuit>,
    model: LogicModel,
    values: Vec<LogicValue>,
    marks: Vec<bool>,
    gate_sim_count: u64,
    output_log: Vec<OutputSnapshot>,
    intermediate_log: Vec<(u64, OutputSnapshot)>,
}

impl SingleListEventScheduler {
    pub fn new(circuit: Rc<Circuit>, model: LogicModel) -> Self {
        let values = initial_values(&circuit, model);
        let marks = vec![model == LogicModel::TwoValued; circuit.net_count()];
        SingleListEventScheduler {
            circuit,
            model,
            values,
            marks,
            gate_sim_count: 0,
            output_log: Vec::new(),
            intermediate_log: Vec::new(),
        }
    }
}

impl Scheduler for SingleListEventScheduler {
    fn simulate_vector(&mut self, inputs: &InputVector) -> Vec<Hazard> {
        let old_values = self.values.clone();
        let mut change_count = vec![0u32; self.circuit.net_count()];

        let mut queue: VecDeque<Entry> = VecDeque::new();
        // Latest pending value per net, for O(1) duplicate suppression
        // (§4.4, §9) rather than a linear scan over the queue.
        let mut pending: Vec<Option<LogicValue>> = vec![None; self.circuit.net_count()];

        for &net in self.circuit.primary_inputs() {
            let Some(&new_value) = inputs.get(&net) else {
                continue;
            };
            let current = self.values[net.index()];
            let mark = self.marks[net.index()];
            if input_is_active(new_value, current, Some(mark), self.model) {
                queue.push_back(Entry::Change(net, new_value));
                pending[net.index()] = Some(new_value);
                self.marks[net.index()] = false;
            }
        }

        // The first marker is appended unconditionally (§4.4 step 1),
        // even when no input changed this vector — it still produces one
        // intermediate-log snapshot at time 0 before the loop empties out.
        queue.push_back(Entry::Marker);

        let mut time_unit: u64 = 0;
        while let Some(entry) = queue.pop_front() {
            match entry {
                Entry::Change(net, new_value) => {
                    // Only this entry's own value un-marks it as pending —
                    // if a newer value for the same net was queued after
                    // this one, that later entry is still "the" pending
                    // record and must survive.
                    if pending[net.index()] == Some(new_value) {
                        pending[net.index()] = None;
                    }
                    if new_value != self.values[net.index()] {
                        self.values[net.index()] = new_value;
                        change_count[net.index()] += 1;
                    }
                    // Fanout gates are evaluated unconditionally, even for
                    // a net-event that turns out to be a no-op by the time
                    // it's drained (matching the reference, whose fanout
                    // loop sits outside the value-changed `if`) — this is
                    // what lets a marked-but-unchanged primary input still
                    // force its downstream gates to be evaluated.
                    for &g in self.circuit.fanout_of(net) {
                        let gate = self.circuit.gate(g);
                        let input_values: Vec<LogicValue> = gate
                            .inputs()
                            .iter()
                            .map(|n| self.values[n.index()])
                            .collect();
                        let out = gate.evaluate(&input_values, self.model);
                        self.gate_sim_count += 1;
                        let out_net = gate.output();
                        if out != self.values[out_net.index()] && pending[out_net.index()] != Some(out) {
                            queue.push_back(Entry::Change(out_net, out));
                            pending[out_net.index()] = Some(out);
                        }
                    }
                }
                Entry::Marker => {
                    self.intermediate_log
                        .push((time_unit, snapshot_outputs(&self.circuit, &self.values)));
                    time_unit += 1;
                    if !queue.is_empty() {
                        queue.push_back(Entry::Marker);
                    }
                }
            }
        }

        self.output_log
            .push(snapshot_outputs(&self.circuit, &self.values));
        let hazards = detect_hazards(&old_values, &self.values, &change_count);
        if !hazards.is_empty() {
            log::debug!("single-list-event scheduler observed {} hazard(s)", hazards.len());
        }
        hazards
    }

    fn output_log(&self) -> &[OutputSnapshot] {
        &self.output_log
    }

    fn intermediate_log(&self) -> &[(u64, OutputSnapshot)] {
        &self.intermediate_log
    }

    fn gate_sim_count(&self) -> u64 {
        self.gate_sim_count
    }

    fn net_value(&self, net: NetId) -> LogicValue {
        self.values[net.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateKind;
    use crate::schedulers::common::input_vector;

    fn and_circuit() -> Rc<Circuit> {
        let mut c = Circuit::new();
        c.add_gate(GateKind::And, &["A", "B"], "Y").unwrap();
        c.set_primary_inputs(&["A", "B"]);
        c.set_primary_outputs(&["Y"]);
        Rc::new(c)
    }

    #[test]
    fn s1_basic_and() {
        let circuit = and_circuit();
        let a = circuit.net_id("A").unwrap();
        let b = circuit.net_id("B").unwrap();
        let y = circuit.net_id("Y").unwrap();
        let mut sim = SingleListEventScheduler::new(circuit, LogicModel::TwoValued);

        sim.simulate_vector(&input_vector(&[(a, LogicValue::One), (b, LogicValue::One)]));
        assert_eq!(sim.net_value(y), LogicValue::One);

        sim.simulate_vector(&input_vector(&[(a, LogicValue::Zero), (b, LogicValue::One)]));
        assert_eq!(sim.net_value(y), LogicValue::Zero);
    }

    #[test]
    fn mark_flag_forces_initial_propagation() {
        let circuit = and_circuit();
        let a = circuit.net_id("A").unwrap();
        let b = circuit.net_id("B").unwrap();
        let y = circuit.net_id("Y").unwrap();
        let mut sim = SingleListEventScheduler::new(circuit, LogicModel::TwoValued);

        sim.simulate_vector(&input_vector(&[(a, LogicValue::Zero), (b, LogicValue::Zero)]));
        assert_eq!(sim.net_value(y), LogicValue::Zero);
        assert!(sim.gate_sim_count() >= 1);
    }

    #[test]
    fn duplicate_pending_events_on_same_net_are_suppressed() {
        // A reconvergent fanout shape where two paths can each enqueue
        // a change to the same downstream net in one settling pass.
        let mut c = Circuit::new();
        c.add_gate(GateKind::Or, &["A", "B"], "X").unwrap();
        c.add_gate(GateKind::Or, &["A", "C"], "W").unwrap();
        c.add_gate(GateKind::And, &["X", "W"], "Y").unwrap();
        c.set_primary_inputs(&["A", "B", "C"]);
        c.set_primary_outputs(&["Y"]);
        let a = c.net_id("A").unwrap();
        let b = c.net_id("B").unwrap();
        let cc = c.net_id("C").unwrap();
        let y = c.net_id("Y").unwrap();
        let mut sim = SingleListEventScheduler::new(Rc::new(c), LogicModel::TwoValued);

        sim.simulate_vector(&input_vector(&[
            (a, LogicValue::One),
            (b, LogicValue::Zero),
            (cc, LogicValue::Zero),
        ]));
        assert_eq!(sim.net_value(y), LogicValue::One);
    }

    #[test]
    fn cascade_settles_to_correct_value_across_multiple_vectors() {
        let mut c = Circuit::new();
        c.add_gate(GateKind::And, &["A", "B"], "X").unwrap();
        c.add_gate(GateKind::Or, &["X", "C"], "Y").unwrap();
        c.set_primary_inputs(&["A", "B", "C"]);
        c.set_primary_outputs(&["Y"]);
        let a = c.net_id("A").unwrap();
        let b = c.net_id("B").unwrap();
        let cc = c.net_id("C").unwrap();
        let y = c.net_id("Y").unwrap();
        let mut sim = SingleListEventScheduler::new(Rc::new(c), LogicModel::TwoValued);

        sim.simulate_vector(&input_vector(&[
            (a, LogicValue::One),
            (b, LogicValue::One),
            (cc, LogicValue::Zero),
        ]));
        assert_eq!(sim.net_value(y), LogicValue::One);

        sim.simulate_vector(&input_vector(&[
            (a, LogicValue::Zero),
            (b, LogicValue::One),
            (cc, LogicValue::Zero),
        ]));
        assert_eq!(sim.net_value(y), LogicValue::Zero);
        assert_eq!(sim.output_log().len(), 2);
    }

    #[test]
    fn three_valued_unknown_resolves_once_driven() {
        let circuit = and_circuit();
        let a = circuit.net_id("A").unwrap();
        let b = circuit.net_id("B").unwrap();
        let y = circuit.net_id("Y").unwrap();
        let mut sim = SingleListEventScheduler::new(circuit, LogicModel::ThreeValued);

        sim.simulate_vector(&input_vector(&[(a, LogicValue::One), (b, LogicValue::Unknown)]));
        assert_eq!(sim.net_value(y), LogicValue::Unknown);

        sim.simulate_vector(&input_vector(&[(a, LogicValue::Zero), (b, LogicValue::Unknown)]));
        assert_eq!(sim.net_value(y), LogicValue::Zero);
    }
}

//! Threaded (stack-based) scheduler — §4.7.
//!
//! Structurally the same unit-delay algorithm as the two-list scheduler,
//! but both queues are LIFO stacks rather than FIFO queues, so a net
//! change that fans out to several gates has its last-discovered
//! consumer evaluated first. This gives a depth-first settling order
//! instead of breadth-first, while still separating net changes from
//! gate evaluations into distinct phases. There is no mark-flag
//! mechanism here, and — unlike Two-List, Zero-Delay, and Single-List-
//! Gate (§9) — no gate-stack membership dedup either: a gate with more
//! than one input changing in the same event-drain phase is pushed, and
//! evaluated, once per changed input, matching the reference
//! `ThreadedSimulator`'s unconditional `gate_stack.append`.

use crate::circuit::Circuit;
use crate::gate::GateId;
use crate::hazard::Hazard;
use crate::net::NetId;
use crate::schedulers::common::{
    detect_hazards, initial_values, snapshot_outputs, InputVector, OutputSnapshot, Scheduler,
};
use crate::value::{LogicModel, LogicValue};
use std::rc::Rc;

pub struct ThreadedScheduler {
    circuit: Rc<Circuit>,
    model: LogicModel,
    values: Vec<LogicValue>,
    gate_sim_count: u64,
    output_log: Vec<OutputSnapshot>,
    intermediate_log: Vec<(u64, OutputSnapshot)>,
}

impl ThreadedScheduler {
    pub fn new(circuit: Rc<Circuit>, model: LogicModel) -> Self {
        let values = initial_values(&circuit, model);
        ThreadedScheduler {
            circuit,
            model,
            values,
            gate_sim_count: 0,
            output_log: Vec::new(),
            intermediate_log: Vec::new(),
        }
    }
}

impl Scheduler for ThreadedScheduler {
    fn simulate_vector(&mut self, inputs: &InputVector) -> Vec<Hazard> {
        let old_values = self.values.clone();
        let mut change_count = vec![0u32; self.circuit.net_count()];

        let mut event_stack: Vec<(NetId, LogicValue)> = Vec::new();
        let mut gate_stack: Vec<GateId> = Vec::new();

        for &net in self.circuit.primary_inputs() {
            let Some(&new_value) = inputs.get(&net) else {
                continue;
            };
            if new_value != self.values[net.index()] {
                event_stack.push((net, new_value));
            }
        }

        let mut time_unit: u64 = 0;
        while !event_stack.is_empty() {
            while let Some((net, new_value)) = event_stack.pop() {
                if new_value != self.values[net.index()] {
                    self.values[net.index()] = new_value;
                    change_count[net.index()] += 1;
                }
                // Fanout gates are re-pushed unconditionally, even for a
                // net-event task that turns out to be a no-op by the time
                // it's popped (matching the reference `NetEventTask`,
                // whose fanout loop sits outside the value-changed `if`).
                for &g in self.circuit.fanout_of(net) {
                    gate_stack.push(g);
                }
            }

            if !gate_stack.is_empty() {
                self.intermediate_log
                    .push((time_unit, snapshot_outputs(&self.circuit, &self.values)));

                while let Some(g) = gate_stack.pop() {
                    let gate = self.circuit.gate(g);
                    let input_values: Vec<LogicValue> = gate
                        .inputs()
                        .iter()
                        .map(|n| self.values[n.index()])
                        .collect();
                    let out = gate.evaluate(&input_values, self.model);
                    self.gate_sim_count += 1;
                    if out != self.values[gate.output().index()] {
                        event_stack.push((gate.output(), out));
                    }
                }
                time_unit += 1;
            }
        }

        self.output_log
            .push(snapshot_outputs(&self.circuit, &self.values));
        let hazards = detect_hazards(&old_values, &self.values, &change_count);
        if !hazards.is_empty() {
            log::debug!("threaded scheduler observed {} hazard(s)", hazards.len());
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
        let mut sim = ThreadedScheduler::new(circuit, LogicModel::TwoValued);

        sim.simulate_vector(&input_vector(&[(a, LogicValue::One), (b, LogicValue::One)]));
        assert_eq!(sim.net_value(y), LogicValue::One);

        sim.simulate_vector(&input_vector(&[(a, LogicValue::Zero), (b, LogicValue::One)]));
        assert_eq!(sim.net_value(y), LogicValue::Zero);
    }

    #[test]
    fn no_mark_flag_initial_vector_equal_to_reset_state_does_nothing() {
        let circuit = and_circuit();
        let a = circuit.net_id("A").unwrap();
        let b = circuit.net_id("B").unwrap();
        let mut sim = ThreadedScheduler::new(circuit, LogicModel::TwoValued);

        sim.simulate_vector(&input_vector(&[(a, LogicValue::Zero), (b, LogicValue::Zero)]));
        assert_eq!(sim.gate_sim_count(), 0);
    }

    #[test]
    fn cascade_settles_depth_first_to_the_correct_value() {
        let mut c = Circuit::new();
        c.add_gate(GateKind::And, &["A", "B"], "X").unwrap();
        c.add_gate(GateKind::Or, &["X", "C"], "Y").unwrap();
        c.set_primary_inputs(&["A", "B", "C"]);
        c.set_primary_outputs(&["Y"]);
        let a = c.net_id("A").unwrap();
        let b = c.net_id("B").unwrap();
        let cc = c.net_id("C").unwrap();
        let y = c.net_id("Y").unwrap();
        let mut sim = ThreadedScheduler::new(Rc::new(c), LogicModel::TwoValued);

        let hazards = sim.simulate_vector(&input_vector(&[
            (a, LogicValue::One),
            (b, LogicValue::One),
            (cc, LogicValue::Zero),
        ]));
        assert!(hazards.is_empty());
        assert_eq!(sim.net_value(y), LogicValue::One);
    }

    #[test]
    fn three_valued_unknown_resolves_once_driven() {
        let circuit = and_circuit();
        let a = circuit.net_id("A").unwrap();
        let b = circuit.net_id("B").unwrap();
        let y = circuit.net_id("Y").unwrap();
        let mut sim = ThreadedScheduler::new(circuit, LogicModel::ThreeValued);

        sim.simulate_vector(&input_vector(&[(a, LogicValue::One), (b, LogicValue::Unknown)]));
        assert_eq!(sim.net_value(y), LogicValue::Unknown);

        sim.simulate_vector(&input_vector(&[(a, LogicValue::Zero), (b, LogicValue::Unknown)]));
        assert_eq!(sim.net_value(y), LogicValue::Zero);
    }
}

//! Two-list (unit-delay, event-driven) scheduler — §4.3.
//!
//! Separate event queue and gate queue, alternating in phases separated
//! by an integer `time_unit`.

use crate::circuit::Circuit;
use crate::gate::GateId;
use crate::hazard::Hazard;
use crate::net::NetId;
use crate::schedulers::common::{
    detect_hazards, initial_values, input_is_active, snapshot_outputs, InputVector,
    OutputSnapshot, Scheduler,
};
use crate::value::{LogicModel, LogicValue};
use std::collections::VecDeque;
use std::rc::Rc;

pub struct TwoListScheduler {
    circuit: Rc<Circuit>,
    model: LogicModel,
    values: Vec<LogicValue>,
    marks: Vec<bool>,
    gate_sim_count: u64,
    output_log: Vec<OutputSnapshot>,
    intermediate_log: Vec<(u64, OutputSnapshot)>,
}

impl TwoListScheduler {
    pub fn new(circuit: Rc<Circuit>, model: LogicModel) -> Self {
        let values = initial_values(&circuit, model);
        let marks = vec![model == LogicModel::TwoValued; circuit.net_count()];
        TwoListScheduler {
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

impl Scheduler for TwoListScheduler {
    fn simulate_vector(&mut self, inputs: &InputVector) -> Vec<Hazard> {
        let old_values = self.values.clone();
        let mut change_count = vec![0u32; self.circuit.net_count()];

        let mut event_queue: VecDeque<(NetId, LogicValue)> = VecDeque::new();
        let mut gate_queue: VecDeque<GateId> = VecDeque::new();
        let mut in_gate_queue = vec![false; self.circuit.gate_count()];

        for &net in self.circuit.primary_inputs() {
            let Some(&new_value) = inputs.get(&net) else {
                continue;
            };
            let current = self.values[net.index()];
            let mark = self.marks[net.index()];
            if input_is_active(new_value, current, Some(mark), self.model) {
                event_queue.push_back((net, new_value));
                self.marks[net.index()] = false;
            }
        }

        let mut time_unit: u64 = 0;
        while !event_queue.is_empty() {
            while let Some((net, new_value)) = event_queue.pop_front() {
                if new_value != self.values[net.index()] {
                    self.values[net.index()] = new_value;
                    change_count[net.index()] += 1;
                }
                // Fanout gates are scheduled unconditionally, even for a
                // net-event that turns out to be a no-op by the time it's
                // drained (matching the reference, whose fanout loop sits
                // outside the value-changed `if`) — this is what lets a
                // marked-but-unchanged primary input still force its
                // downstream gates to be evaluated.
                for &g in self.circuit.fanout_of(net) {
                    if !in_gate_queue[g.as_u32() as usize] {
                        gate_queue.push_back(g);
                        in_gate_queue[g.as_u32() as usize] = true;
                    }
                }
            }

            if !gate_queue.is_empty() {
                self.intermediate_log
                    .push((time_unit, snapshot_outputs(&self.circuit, &self.values)));

                while let Some(g) = gate_queue.pop_front() {
                    in_gate_queue[g.as_u32() as usize] = false;
                    let gate = self.circuit.gate(g);
                    let input_values: Vec<LogicValue> = gate
                        .inputs()
                        .iter()
                        .map(|n| self.values[n.index()])
                        .collect();
                    let out = gate.evaluate(&input_values, self.model);
                    self.gate_sim_count += 1;
                    if out != self.values[gate.output().index()] {
                        event_queue.push_back((gate.output(), out));
                    }
                }
                time_unit += 1;
            }
        }

        self.output_log
            .push(snapshot_outputs(&self.circuit, &self.values));
        let hazards = detect_hazards(&old_values, &self.values, &change_count);
        if !hazards.is_empty() {
            log::debug!("two-list scheduler observed {} hazard(s)", hazards.len());
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

//! Single-list gate scheduler — §4.5.
//!
//! A single queue carries gate ids and time-marker sentinels only; there
//! is no separate event queue. A gate's computed output is not applied
//! to the net array immediately — it is held in a pending-commit map and
//! only becomes visible (and only then fans out to further gates) when
//! the next marker is reached. Primary inputs are the exception: they
//! commit directly, since nothing upstream of them could need ordering
//! against their own arrival.

use crate::circuit::Circuit;
use crate::gate::GateId;
use crate::hazard::Hazard;
use crate::net::NetId;
use crate::schedulers::common::{
    detect_hazards, initial_values, snapshot_outputs, InputVector, OutputSnapshot, Scheduler,
};
use crate::value::{LogicModel, LogicValue};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

enum Entry {
    Gate(GateId),
    Marker,
}

pub struct SingleListGateScheduler {
    circuit: Rc<Circuit>,
    model: LogicModel,
    values: Vec<LogicValue>,
    gate_sim_count: u64,
    output_log: Vec<OutputSnapshot>,
    intermediate_log: Vec<(u64, OutputSnapshot)>,
}

impl SingleListGateScheduler {
    pub fn new(circuit: Rc<Circuit>, model: LogicModel) -> Self {
        let values = initial_values(&circuit, model);
        SingleListGateScheduler {
            circuit,
            model,
            values,
            gate_sim_count: 0,
            output_log: Vec::new(),
            intermediate_log: Vec::new(),
        }
    }
}

impl Scheduler for SingleListGateScheduler {
    fn simulate_vector(&mut self, inputs: &InputVector) -> Vec<Hazard> {
        let old_values = self.values.clone();
        let mut change_count = vec![0u32; self.circuit.net_count()];

        let mut queue: VecDeque<Entry> = VecDeque::new();
        let mut flagged = vec![false; self.circuit.gate_count()];
        let mut pending_commit: HashMap<NetId, LogicValue> = HashMap::new();

        for &net in self.circuit.primary_inputs() {
            let Some(&new_value) = inputs.get(&net) else {
                continue;
            };
            if new_value == self.values[net.index()] {
                continue;
            }
            self.values[net.index()] = new_value;
            change_count[net.index()] += 1;
            for &g in self.circuit.fanout_of(net) {
                if !flagged[g.as_u32() as usize] {
                    queue.push_back(Entry::Gate(g));
                    flagged[g.as_u32() as usize] = true;
                }
            }
        }

        // The first marker is appended unconditionally (§4.5 step 2),
        // even when no input changed this vector — it still produces one
        // intermediate-log snapshot at time 0 before the loop empties out.
        queue.push_back(Entry::Marker);

        let mut time_unit: u64 = 0;
        while let Some(entry) = queue.pop_front() {
            match entry {
                Entry::Gate(g) => {
                    flagged[g.as_u32() as usize] = false;
                    let gate = self.circuit.gate(g);
                    let input_values: Vec<LogicValue> = gate
                        .inputs()
                        .iter()
                        .map(|n| self.values[n.index()])
                        .collect();
                    let out = gate.evaluate(&input_values, self.model);
                    self.gate_sim_count += 1;
                    pending_commit.insert(gate.output(), out);
                }
                Entry::Marker => {
                    for (net, val) in pending_commit.drain() {
                        if val == self.values[net.index()] {
                            continue;
                        }
                        self.values[net.index()] = val;
                        change_count[net.index()] += 1;
                        for &g in self.circuit.fanout_of(net) {
                            if !flagged[g.as_u32() as usize] {
                                queue.push_back(Entry::Gate(g));
                                flagged[g.as_u32() as usize] = true;
                            }
                        }
                    }
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
            log::debug!("single-list-gate scheduler observed {} hazard(s)", hazards.len());
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

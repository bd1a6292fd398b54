//! Zero-delay (levelized) scheduler — §4.6.
//!
//! Gates are assigned a topological level once, at construction time,
//! using a Kahn-style sweep over the gate dependency graph (a
//! predecessor counted once per distinct driving gate, never once per
//! input wire). Each `simulate_vector` call then drives gates through
//! per-level buckets built fresh for that vector: only gates reachable
//! from a changed primary input (directly, or transitively through a
//! gate whose output changed) are ever enqueued and evaluated, in level
//! order. No event queue, no intermediate log, and no hazard detection —
//! a net is only ever committed once per level-ordered pass, so the
//! multiple-toggle condition hazards are defined on cannot occur here.
//!
//! Combinational feedback defeats a pure topological sort. Gates left
//! over after the Kahn sweep stalls (a cycle) are assigned an extra
//! level in a second pass at construction, in gate-id order, purely so
//! every gate has *some* level to be bucketed under. Convergence for
//! that feedback is then the runtime's job: at most two full ascending
//! sweeps per vector, with a second sweep only triggered when a gate's
//! output change fans out to a gate at a strictly lower level than the
//! one currently being processed (§4.6 step 3).

use crate::circuit::Circuit;
use crate::gate::GateId;
use crate::hazard::Hazard;
use crate::net::NetId;
use crate::schedulers::common::{initial_values, snapshot_outputs, InputVector, OutputSnapshot, Scheduler};
use crate::value::{LogicModel, LogicValue};
use std::collections::VecDeque;
use std::rc::Rc;

/// Assign every gate a topological level (§4.6 open question #2 resolved:
/// a gate's in-degree counts each distinct driving gate once, even if it
/// feeds more than one of the gate's input pins).
fn levelize(circuit: &Circuit) -> Vec<u32> {
    let gate_count = circuit.gate_count();
    if gate_count == 0 {
        return Vec::new();
    }

    let mut predecessors: Vec<Vec<GateId>> = vec![Vec::new(); gate_count];
    let mut successors: Vec<Vec<GateId>> = vec![Vec::new(); gate_count];

    for gate in circuit.gates() {
        let mut drivers: Vec<GateId> = Vec::new();
        for &input_net in gate.inputs() {
            for driver in circuit.get_gate_by_output(input_net) {
                if !drivers.contains(&driver.id()) {
                    drivers.push(driver.id());
                }
            }
        }
        for &d in &drivers {
            successors[d.as_u32() as usize].push(gate.id());
        }
        predecessors[gate.id().as_u32() as usize] = drivers;
    }

    let mut in_degree: Vec<usize> = predecessors.iter().map(Vec::len).collect();
    let mut level = vec![0u32; gate_count];
    let mut resolved = vec![false; gate_count];
    let mut queue: VecDeque<GateId> = VecDeque::new();

    for g in circuit.gates() {
        if in_degree[g.id().as_u32() as usize] == 0 {
            queue.push_back(g.id());
        }
    }

    let mut resolved_count = 0;
    while let Some(g) = queue.pop_front() {
        resolved[g.as_u32() as usize] = true;
        resolved_count += 1;
        let this_level = level[g.as_u32() as usize];
        for &succ in &successors[g.as_u32() as usize] {
            let idx = succ.as_u32() as usize;
            level[idx] = level[idx].max(this_level + 1);
            in_degree[idx] -= 1;
            if in_degree[idx] == 0 {
                queue.push_back(succ);
            }
        }
    }

    if resolved_count < gate_count {
        // Second pass: anything left is part of a combinational cycle
        // and was never reached by the Kahn sweep above. Force the whole
        // remaining set onto one level past the deepest resolved gate so
        // every gate has a bucket to live in; per-vector convergence for
        // the feedback itself is handled at runtime by the two-pass rule.
        let max_resolved_level = level
            .iter()
            .zip(&resolved)
            .filter(|(_, &r)| r)
            .map(|(&l, _)| l)
            .max()
            .unwrap_or(0);
        let fallback_level = max_resolved_level + 1;
        for g in circuit.gates() {
            let idx = g.id().as_u32() as usize;
            if !resolved[idx] {
                level[idx] = fallback_level;
                resolved[idx] = true;
            }
        }
        log::debug!(
            "zero-delay levelization found a combinational cycle; {} gate(s) forced onto level {}",
            gate_count - resolved_count,
            fallback_level
        );
    }

    level
}

/// Place `g` into its level's bucket unless it's already pending there
/// this pass (§9: bucket membership via a parallel bitset keyed by gate
/// id, not a linear scan).
fn enqueue(g: GateId, gate_level: &[u32], buckets: &mut [VecDeque<GateId>], in_bucket: &mut [bool]) {
    let idx = g.as_u32() as usize;
    if !in_bucket[idx] {
        in_bucket[idx] = true;
        buckets[gate_level[idx] as usize].push_back(g);
    }
}

pub struct ZeroDelayScheduler {
    circuit: Rc<Circuit>,
    model: LogicModel,
    values: Vec<LogicValue>,
    gate_level: Vec<u32>,
    max_level: u32,
    gate_sim_count: u64,
    output_log: Vec<OutputSnapshot>,
}

impl ZeroDelayScheduler {
    pub fn new(circuit: Rc<Circuit>, model: LogicModel) -> Self {
        let values = initial_values(&circuit, model);
        let gate_level = levelize(&circuit);
        let max_level = gate_level.iter().copied().max().unwrap_or(0);
        ZeroDelayScheduler {
            circuit,
            model,
            values,
            gate_level,
            max_level,
            gate_sim_count: 0,
            output_log: Vec::new(),
        }
    }

    /// The number of distinct topological levels computed at construction.
    pub fn level_count(&self) -> usize {
        if self.circuit.gate_count() == 0 {
            0
        } else {
            self.max_level as usize + 1
        }
    }

    /// Run one ascending sweep over every level's bucket. Returns whether
    /// any gate's output fanned out to a gate at a strictly lower level
    /// than the one currently being drained — the signal for a second
    /// pass (§4.6).
    fn sweep(&mut self, buckets: &mut [VecDeque<GateId>], in_bucket: &mut [bool]) -> bool {
        let mut iterate_again = false;
        for current_level in 0..=self.max_level as usize {
            while let Some(g) = buckets[current_level].pop_front() {
                in_bucket[g.as_u32() as usize] = false;
                let gate = self.circuit.gate(g);
                let input_values: Vec<LogicValue> = gate
                    .inputs()
                    .iter()
                    .map(|n| self.values[n.index()])
                    .collect();
                let out = gate.evaluate(&input_values, self.model);
                self.gate_sim_count += 1;
                if out != self.values[gate.output().index()] {
                    self.values[gate.output().index()] = out;
                    for &h in self.circuit.fanout_of(gate.output()) {
                        enqueue(h, &self.gate_level, buckets, in_bucket);
                        if (self.gate_level[h.as_u32() as usize] as usize) < current_level {
                            iterate_again = true;
                        }
                    }
                }
            }
        }
        iterate_again
    }
}

impl Scheduler for ZeroDelayScheduler {
    fn simulate_vector(&mut self, inputs: &InputVector) -> Vec<Hazard> {
        let gate_count = self.circuit.gate_count();
        let mut buckets: Vec<VecDeque<GateId>> = vec![VecDeque::new(); self.level_count().max(1)];
        let mut in_bucket = vec![false; gate_count];

        for &net in self.circuit.primary_inputs() {
            if let Some(&new_value) = inputs.get(&net) {
                if new_value != self.values[net.index()] {
                    self.values[net.index()] = new_value;
                    for &g in self.circuit.fanout_of(net) {
                        enqueue(g, &self.gate_level, &mut buckets, &mut in_bucket);
                    }
                }
            }
        }

        if self.sweep(&mut buckets, &mut in_bucket) {
            self.sweep(&mut buckets, &mut in_bucket);
        }

        self.output_log
            .push(snapshot_outputs(&self.circuit, &self.values));
        Vec::new()
    }

    fn output_log(&self) -> &[OutputSnapshot] {
        &self.output_log
    }

    fn intermediate_log(&self) -> &[(u64, OutputSnapshot)] {
        &[]
    }

    fn gate_sim_count(&self) -> u64 {
        self.gate_sim_count
    }

    fn net_value(&self, net: NetId) -> LogicValue {
        self.values[net.index()]
    }
}

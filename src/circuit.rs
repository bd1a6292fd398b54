//! The netlist builder and the frozen [`Circuit`] it produces.

use crate::error::{BuildError, LookupError};
use crate::gate::{Gate, GateId, GateKind};
use crate::net::NetId;
use std::collections::HashMap;
use std::fmt;

/// The netlist: nets, gates, the fanout index, and the primary I/O sets.
///
/// Constructed once via the builder methods below, then treated as
/// frozen — schedulers borrow a `Circuit` immutably and never mutate it.
/// Net ids are consecutive from 0 with no gaps; a fanout index maps each
/// net id to the gates that read it, kept consistent with each gate's
/// input list as gates are added.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    name_to_id: HashMap<String, NetId>,
    net_names: Vec<String>,
    gates: Vec<Gate>,
    fanout: Vec<Vec<GateId>>,
    primary_inputs: Vec<NetId>,
    primary_outputs: Vec<NetId>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Circuit::default()
    }

    /// Add a net by name, or return the id of the existing net with that
    /// name. Idempotent.
    pub fn add_net(&mut self, name: &str) -> NetId {
        if let Some(&id) = self.name_to_id.get(name) {
            return id;
        }
        let id = NetId(self.net_names.len() as u32);
        self.net_names.push(name.to_string());
        self.fanout.push(Vec::new());
        self.name_to_id.insert(name.to_string(), id);
        id
    }

    /// Add a gate of the given type reading `input_names` and driving
    /// `output_name`, creating any nets that don't already exist. The
    /// gate id equals the gate count at the time of the call.
    ///
    /// Fails with [`BuildError::ArityError`] if `kind` is `NOT` and the
    /// input count isn't exactly one, or if any other gate type is given
    /// zero inputs. Acyclicity and single-driver invariants are not
    /// checked here — a malformed circuit is a caller error, not a
    /// diagnosed one (§3).
    pub fn add_gate(
        &mut self,
        kind: GateKind,
        input_names: &[&str],
        output_name: &str,
    ) -> Result<GateId, BuildError> {
        let inputs: Vec<NetId> = input_names.iter().map(|n| self.add_net(n)).collect();
        let output = self.add_net(output_name);
        let id = GateId(self.gates.len() as u32);
        let gate = Gate::new(id, kind, inputs.clone(), output)?;

        for input in dedup(&inputs) {
            self.fanout[input.index()].push(id);
        }
        self.gates.push(gate);

        log::debug!("added gate {id} ({kind}) driving {output_name}");
        Ok(id)
    }

    /// Same as [`Circuit::add_gate`], but parses the gate type from a
    /// name, case-insensitively, failing with
    /// [`BuildError::UnsupportedGate`] for unrecognized types.
    pub fn add_gate_named(
        &mut self,
        type_name: &str,
        input_names: &[&str],
        output_name: &str,
    ) -> Result<GateId, BuildError> {
        let kind = GateKind::parse(type_name)?;
        self.add_gate(kind, input_names, output_name)
    }

    /// Designate the primary input nets, in order, creating any nets
    /// that don't already exist.
    pub fn set_primary_inputs(&mut self, names: &[&str]) {
        self.primary_inputs = names.iter().map(|n| self.add_net(n)).collect();
    }

    /// Designate the primary output nets, in order, creating any nets
    /// that don't already exist.
    pub fn set_primary_outputs(&mut self, names: &[&str]) {
        self.primary_outputs = names.iter().map(|n| self.add_net(n)).collect();
    }

    /// Look up a net's name, if it exists.
    pub fn get_net_name(&self, id: NetId) -> Option<&str> {
        self.net_names.get(id.index()).map(String::as_str)
    }

    /// Look up a net's id by name.
    pub fn net_id(&self, name: &str) -> Result<NetId, LookupError> {
        self.name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| LookupError::UnknownNet(name.to_string()))
    }

    /// All gates whose output is `id` — 0 or 1 for well-formed circuits,
    /// more for circuits with multiply-driven nets (undefined semantics,
    /// not diagnosed).
    pub fn get_gate_by_output(&self, id: NetId) -> Vec<&Gate> {
        self.gates.iter().filter(|g| g.output() == id).collect()
    }

    pub fn gate(&self, id: GateId) -> &Gate {
        &self.gates[id.0 as usize]
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    pub fn net_count(&self) -> usize {
        self.net_names.len()
    }

    pub fn primary_inputs(&self) -> &[NetId] {
        &self.primary_inputs
    }

    pub fn primary_outputs(&self) -> &[NetId] {
        &self.primary_outputs
    }

    /// The gates that read `net` as an input, in the order they were
    /// added to the circuit.
    pub fn fanout_of(&self, net: NetId) -> &[GateId] {
        &self.fanout[net.index()]
    }
}

fn dedup(ids: &[NetId]) -> Vec<NetId> {
    let mut seen = Vec::with_capacity(ids.len());
    for &id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Circuit: {} nets, {} gates, {} primary inputs, {} primary outputs",
            self.net_count(),
            self.gate_count(),
            self.primary_inputs.len(),
            self.primary_outputs.len()
        )
    }
}

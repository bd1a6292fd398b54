//! Core simulation kernel for a combinational gate-level logic
//! simulator.
//!
//! A [`circuit::Circuit`] is a netlist of named nets and gates built up
//! through a small builder API. Once built, it's handed to one of five
//! [`schedulers`] implementations — each a different event/gate
//! propagation discipline over the same netlist and gate semantics —
//! and driven one input vector at a time through the shared
//! [`schedulers::Scheduler`] trait.
//!
//! The two-valued `{0, 1}` and three-valued `{0, 1, U}` logic models
//! ([`value::LogicModel`]) are selected per scheduler instance; `X`
//! (conflict) is reachable from either model as the result of inverting
//! an already-unknown value.

pub mod circuit;
pub mod error;
pub mod gate;
pub mod hazard;
pub mod net;
pub mod schedulers;
pub mod value;

pub use circuit::Circuit;
pub use error::{BuildError, LookupError};
pub use gate::{Gate, GateId, GateKind};
pub use hazard::{Hazard, HazardKind};
pub use net::NetId;
pub use schedulers::{
    Scheduler, SingleListEventScheduler, SingleListGateScheduler, ThreadedScheduler,
    TwoListScheduler, ZeroDelayScheduler,
};
pub use value::{LogicModel, LogicValue};

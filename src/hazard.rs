//! Hazard classification.

use crate::net::NetId;
use serde::{Deserialize, Serialize};

/// Whether a multiply-toggled net settled back to its starting value
/// ([`HazardKind::Static`]) or ended somewhere else
/// ([`HazardKind::Dynamic`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// The net changed more than once during settling but returned to
    /// its value from before the vector was applied.
    Static,
    /// The net changed more than once during settling and ended at a
    /// different value.
    Dynamic,
}

/// A net flagged for having changed value more than once while a vector
/// settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hazard {
    pub net: NetId,
    pub kind: HazardKind,
}

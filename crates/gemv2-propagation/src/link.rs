//! Link classification

use serde::{Deserialize, Serialize};

/// Classification of a transmitter-receiver link by the geometry that
/// obstructs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Unobstructed direct path
    Los,
    /// Blocked by vehicles only
    Nlosv,
    /// Blocked by at least one building
    Nlosb,
    /// Blocked by foliage only
    Nlosf,
    /// Not classified, e.g. beyond every communication range
    Unknown,
}

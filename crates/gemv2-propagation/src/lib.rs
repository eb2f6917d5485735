//! GEMV^2 propagation loss engine for vehicular radio links
//!
//! Given two link endpoints and a scene of buildings, foliage, and vehicles
//! from `gemv2-core`, the engine classifies the link (LOS, NLOSv, NLOSb,
//! NLOSf), applies the matching large-scale loss model, adds a small-scale
//! variation driven by how occupied the communication ellipse is, and
//! returns received power in dBm.
//!
//! Positions, simulation time, and the random stream are collaborator
//! contracts: implement [`mobility::Mobility`] and [`mobility::Clock`] for
//! the host simulation, and pin randomness with
//! [`engine::PropagationLossModel::assign_streams`] or suppress it entirely
//! with the deterministic configuration flag.

pub mod config;
pub mod engine;
pub mod link;
pub mod mobility;
pub mod parameters;

pub use config::{ConfigError, MinMedMax, NlosbModel, NlosvModel, PropagationConfig};
pub use engine::{PropagationLossModel, NO_RECEPTION_DBM};
pub use link::LinkType;
pub use mobility::{Clock, ConstantPositionMobility, ManualClock, Mobility};
pub use parameters::{FadingRange, PropagationParameters};

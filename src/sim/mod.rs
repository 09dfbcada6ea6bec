// Simulation engines - tick-driven state evolution
// Principle: Synchronous, single-writer, injectable randomness

pub mod activity;
pub mod environment;
pub mod mining;
pub mod protocol;
pub mod queue;
pub mod rng;
pub mod session;
pub mod staged;
pub mod vitals;

pub use activity::ActivityLog;
pub use environment::{EnvironmentConfig, EnvironmentEngine};
pub use mining::{MiningConfig, MiningEngine};
pub use protocol::resolve_protocol_level;
pub use queue::{QueueConfig, TransmissionQueue};
pub use rng::SimRng;
pub use session::{BunkerSession, SessionConfig, SessionSnapshot, WalletEvent};
pub use staged::StagePlan;
pub use vitals::{VitalsConfig, VitalsEngine};

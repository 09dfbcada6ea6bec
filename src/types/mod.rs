// Core types for the bunker simulation
// Principle: Plain data, serializable, owned by the session

pub mod environment;
pub mod mining;
pub mod primitives;
pub mod transmission;
pub mod vitals;
pub mod wallet;

pub use environment::*;
pub use mining::*;
pub use primitives::*;
pub use transmission::*;
pub use vitals::*;
pub use wallet::*;

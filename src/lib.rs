pub mod error;
pub mod network;
pub mod simulator;
pub mod stats;

pub use error::{Error, Leg, ValidationError};
pub use simulator::{ConfigOverrides, NetworkSimulator, SimulationConfig};
pub use stats::Stats;

pub mod prelude {
    pub use crate::error::{Leg, ValidationError};
    pub use crate::simulator::{ConfigOverrides, NetworkSimulator, SimulationConfig};
    pub use crate::stats::Stats;
}

/// One dimensional door world and sensor model
pub mod model;
pub use model::{Estimate, LandmarkSensorModel, Observation, Robot, Stamped, World};

/// Simulation actor for the robot in the one dimensional world.
pub mod sim;
pub use sim::{Sim, SimProp, SimState};

/// Histogram filter actor for the one dimensional robot.
pub mod filter;
pub use filter::{Filter, FilterProp, FilterState, RecoveryPolicy};

/// Drawing actor for the one dimensional robot.
///
/// Draws "ascii art" of the robot, the belief and the likelihood to the console.
///
/// ```text
/// time:12
///                     ⢸                             ⢸
///                     ⢸                             ⢸
///             ⡇      ⡇                             ⡇
///                       ⡇
///                       ⡇
/// detect no door
/// predicted location: 12, actual location: 12, error: 0
/// ```
pub mod draw;
pub use draw::{DrawActor, DrawProp};

//! Actors of the one dimensional robot localization demo.

/// Robot moving along a circular corridor with doors, localized by a histogram filter.
///
/// ```text
/// * Periodic_0 * in: [] out: [time_stamp]
///     time_stamp -> Sim_0.TimeStamp
/// * Sim_0 * in: [TimeStamp] out: [cancel_request, observation, true_robot]
///     observation -> Filter_0.Observation
///     true_robot -> DrawActor_0.TrueRobot
/// * Filter_0 * in: [Observation] out: [estimate]
///     estimate -> DrawActor_0.Estimate
/// * DrawActor_0 * in: [Estimate, TrueRobot] out: []
/// ```
pub mod one_dim_robot;

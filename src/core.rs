//! Core of the actor runtime: actors, inbound and outbound channels, and runners.

/// Actor
pub mod actor;

/// Actor builder
pub mod actor_builder;

/// Inbound
pub mod inbound;

/// Outbound
pub mod outbound;

/// Connection
pub mod connection;

/// Run
pub mod runner;

/// State
pub mod value;

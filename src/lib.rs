#![deny(missing_docs)]

//! # Discrete Bayes
//!
//! A discrete (histogram) Bayes filter for localizing an agent on a one dimensional, circular
//! track of `N` bins, together with a small actor pipeline which runs the filter against a
//! simulated robot.
//!
//! The belief is a probability vector over the bins. Each time step refines it twice: the
//! predict step shifts the belief by the commanded offset and blurs it with a motion kernel,
//! the update step multiplies it element-wise with the likelihood of the current sensor reading
//! and renormalizes.
//!
//! ## Module Overview
//!
//! - The [bayes] module is the filter itself: [Belief](bayes::Belief),
//!   [Likelihood](bayes::Likelihood), [MotionKernel](bayes::MotionKernel), the pure
//!   [predict](bayes::predict()) and [update](bayes::update()) functions and the stateful
//!   [DiscreteBayesFilter](bayes::DiscreteBayesFilter). It does not depend on any other module.
//!
//! - The [core] module contains the actor runtime: [Actor] is a generic struct that represents an
//!   actor. [IsInboundHub] is the trait which represents the collection of inbound channels of an
//!   actor, [IsOutboundHub] the collection of its outbound channels. [HasOnMessage] is the main
//!   entry point for user code and sets the behavior of an actor.
//!
//! - The [compute] module contains the [Context] and [Pipeline] which are used to configure a
//!   set of actors, connect them into a graph and to execute flow.
//!
//! - The [actors] module contains the clock and printer actors.
//!
//! - The [example_actors] module contains the simulated robot in a corridor with doors, the
//!   filter actor and a console renderer.
//!
//! ## Example: localization from a single door
//!
//! A robot on a track of ten bins, with a door at bin 3, knows nothing about its position. After
//! one step the door sensor fires, so the robot must be at bin 3. It then moves one bin further:
//!
//! ```rust
//! use discrete_bayes::bayes::{predict, update, Belief, Likelihood, MotionKernel};
//!
//! let prior = Belief::uniform(10).unwrap();
//! let kernel = MotionKernel::default();
//!
//! let mut detection = vec![0.0; 10];
//! detection[3] = 1.0;
//! let detection = Likelihood::try_from_vec(detection).unwrap();
//!
//! let belief = update(&detection, &predict(&prior, 1, &kernel)).unwrap();
//! assert_eq!(belief.argmax(), 3);
//!
//! let belief = predict(&belief, 1, &kernel);
//! assert_eq!(belief.get(4), Some(1.0));
//! ```
//!
//! ## Example: the robot pipeline
//!
//! The demo connects a clock, the simulation, the filter and the renderer:
//!
//! ```rust,no_run
//! # use discrete_bayes::actors::Periodic;
//! # use discrete_bayes::example_actors::one_dim_robot::*;
//! # use discrete_bayes::prelude::*;
//! # async fn run() {
//! let pipeline = Context::configure(&mut |context| {
//!     let sim_prop = SimProp::default();
//!     let filter_prop = FilterProp::default();
//!     let num_bins = sim_prop.sensor.world.num_bins();
//!
//!     let mut timer = Periodic::new_with_period(context, 0.1);
//!     let mut sim = Sim::from_prop_and_state(context, sim_prop, SimState::new(0, 0));
//!     let filter_state = match FilterState::new(num_bins, &filter_prop) {
//!         Ok(state) => state,
//!         Err(err) => panic!("{}", err),
//!     };
//!     let mut filter = Filter::from_prop_and_state(context, filter_prop, filter_state);
//!     let mut draw = DrawActor::from_prop_and_state(
//!         context,
//!         DrawProp::default(),
//!         Default::default(),
//!     );
//!
//!     timer.outbound.time_stamp.connect(context, &mut sim.inbound.time_stamp);
//!     sim.outbound.observation.connect(context, &mut filter.inbound.observation);
//!     sim.outbound.true_robot.connect(context, &mut draw.inbound.true_robot);
//!     filter.outbound.estimate.connect(context, &mut draw.inbound.estimate);
//!     context.register_cancel_requester(&mut sim.outbound.cancel_request);
//! });
//! pipeline.print_flow_graph();
//! pipeline.run().await;
//! # }
//! ```
//!
//! Messages travel from outbound channels to inbound channels. Each outbound channel can be
//! connected to zero, one or more inbound channels, and each message is cloned for every
//! connection. This is the main reason why [IsInboundMessage] must be [Clone]. Messages from one
//! sender to one receiver arrive in the order they were sent.
//!
//! The pipeline runs until a cancel request arrives, here sent by the simulation after its last
//! step, or Ctrl-C is pressed. Actors are then stopped upstream first, and each one handles the
//! messages already queued for it before it exits.

/// The discrete Bayes filter.
pub mod bayes;

/// The core framework concepts such as actors, state, inbound, outbound and runners.
pub mod core;
pub use crate::core::actor::Actor;
pub use crate::core::actor::GenericActor;
pub use crate::core::actor::HasFromPropState;
pub use crate::core::actor::IsActorNode;
pub use crate::core::actor_builder::ActorBuilder;
pub use crate::core::connection::ConnectionEnum;
pub use crate::core::inbound::HasOnMessage;
pub use crate::core::inbound::InboundChannel;
pub use crate::core::inbound::IsInboundHub;
pub use crate::core::inbound::IsInboundMessage;
pub use crate::core::inbound::IsInboundMessageNew;
pub use crate::core::inbound::NullInbound;
pub use crate::core::inbound::NullMessage;
pub use crate::core::outbound::HasActivate;
pub use crate::core::outbound::IsGenericConnection;
pub use crate::core::outbound::IsOutboundHub;
pub use crate::core::outbound::NullOutbound;
pub use crate::core::outbound::OutboundChannel;
pub use crate::core::runner::DefaultRunner;
pub use crate::core::runner::IsRunner;
pub use crate::core::value::NullProp;
pub use crate::core::value::NullState;
pub use crate::core::value::Value;

/// The compute context and compute graph.
pub mod compute;
pub use crate::compute::context::Context;
pub use crate::compute::pipeline::CancelRequest;
pub use compute::pipeline::Pipeline;

/// Library of actors.
pub mod actors;

/// Actors of the robot localization demo.
pub mod example_actors;

/// The prelude module contains the most commonly used traits and structs.
pub mod prelude {
    pub use crate::compute::context::Context;
    pub use crate::compute::pipeline::{CancelRequest, Pipeline};
    pub use crate::core::actor::{Actor, GenericActor, HasFromPropState, IsActorNode};
    pub use crate::core::actor_builder::ActorBuilder;
    pub use crate::core::inbound::{
        HasOnMessage, InboundChannel, IsInboundHub, IsInboundMessage, IsInboundMessageNew,
        NullInbound, NullMessage,
    };
    pub use crate::core::outbound::{HasActivate, IsOutboundHub, NullOutbound, OutboundChannel};
    pub use crate::core::runner::{DefaultRunner, IsRunner};
    pub use crate::core::value::{NullProp, NullState, Value};
}

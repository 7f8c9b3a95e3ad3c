use std::marker::PhantomData;
use std::sync::Arc;

use crate::compute::pipeline::{CancelRequest, Pipeline};
use crate::compute::topology::Topology;
use crate::core::actor::IsActorNode;
use crate::core::outbound::{OutboundChannel, OutboundConnection};

/// Collects actors and their connections while the pipeline is being set up.
///
/// Only reachable inside the [Context::configure()] callback.
pub struct Context {
    pub(crate) actors: Vec<Box<dyn IsActorNode + Send>>,
    pub(crate) topology: Topology,
    cancel_sender: tokio::sync::mpsc::UnboundedSender<CancelRequest>,
    cancel_receiver: tokio::sync::mpsc::UnboundedReceiver<CancelRequest>,
}

impl Context {
    /// Builds a pipeline from the actors and connections created by `callback`.
    ///
    /// Actor handles must not escape the callback. Dropping them hands their outbound
    /// connections to the actor nodes owned by the pipeline.
    ///
    /// ```rust
    /// # use discrete_bayes::actors::Periodic;
    /// # use discrete_bayes::example_actors::one_dim_robot::{Sim, SimProp, SimState};
    /// # use discrete_bayes::prelude::*;
    /// let pipeline = Context::configure(&mut |context| {
    ///     let mut clock = Periodic::new_with_period(context, 0.1);
    ///     let mut sim = Sim::from_prop_and_state(context, SimProp::default(), SimState::new(0, 0));
    ///     clock
    ///         .outbound
    ///         .time_stamp
    ///         .connect(context, &mut sim.inbound.time_stamp);
    ///     context.register_cancel_requester(&mut sim.outbound.cancel_request);
    /// });
    /// assert!(pipeline.flow_graph().contains("time_stamp -> Sim_0.TimeStamp"));
    /// ```
    pub fn configure(callback: &mut dyn FnMut(&mut Context)) -> Pipeline {
        let (cancel_sender, cancel_receiver) = tokio::sync::mpsc::unbounded_channel();
        let mut context = Context {
            actors: vec![],
            topology: Topology::new(),
            cancel_sender,
            cancel_receiver,
        };
        callback(&mut context);
        Pipeline::new(
            context.actors,
            context.topology,
            context.cancel_sender,
            context.cancel_receiver,
        )
    }

    /// Stops the pipeline whenever `outbound` sends.
    pub fn register_cancel_requester(&mut self, outbound: &mut OutboundChannel<()>) {
        outbound
            .connection_register
            .push(Arc::new(OutboundConnection::<(), CancelRequest> {
                sender: self.cancel_sender.clone(),
                inbound_channel: CancelRequest::CANCEL_REQUEST_INBOUND_CHANNEL.to_owned(),
                phantom: PhantomData,
            }));
    }
}

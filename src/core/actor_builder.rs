use crate::compute::context::Context;
use crate::core::actor::GenericActor;
use crate::core::inbound::{IsInboundHub, IsInboundMessage};
use crate::core::outbound::IsOutboundHub;
use crate::core::runner::IsRunner;

/// Creates actor from its components.
///
/// Used in [IsInboundHub::from_builder] public interface.
pub struct ActorBuilder<'a, Prop, State, M: IsInboundMessage> {
    /// unique identifier of the actor
    pub actor_name: String,
    prop: Prop,
    state: State,
    /// execution context
    pub context: &'a mut Context,
    /// a channel for sending messages to the actor
    pub sender: tokio::sync::mpsc::UnboundedSender<M>,
    pub(crate) receiver: tokio::sync::mpsc::UnboundedReceiver<M>,
}

impl<'a, Prop, State, M: IsInboundMessage> ActorBuilder<'a, Prop, State, M> {
    pub(crate) fn new(
        context: &'a mut Context,
        actor_name: &str,
        prop: Prop,
        initial_state: State,
    ) -> Self {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        Self {
            actor_name: actor_name.to_owned(),
            prop,
            state: initial_state,
            context,
            sender,
            receiver,
        }
    }

    pub(crate) fn build<
        Inbound: IsInboundHub<Prop, State, Outbound, M>,
        Outbound: IsOutboundHub,
        Run: IsRunner<Prop, Inbound, State, Outbound, M>,
    >(
        self,
        inbound: Inbound,
        mut outbound: Outbound,
    ) -> GenericActor<Prop, Inbound, State, Outbound, Run> {
        let node = Run::new_actor_node(
            self.actor_name.clone(),
            self.prop,
            self.state,
            self.receiver,
            outbound.extract(),
        );
        self.context.actors.push(node);
        GenericActor {
            actor_name: self.actor_name,
            inbound,
            outbound,
            phantom: std::marker::PhantomData,
        }
    }
}

use crate::core::actor::{ActorNode, IsActorNode};
use crate::core::inbound::{HasOnMessage, IsInboundHub, IsInboundMessage};
use crate::core::outbound::IsOutboundHub;
use crate::core::value::Value;

/// Runner of the compute pipeline, it decides how an actor processes its inbound messages.
pub trait IsRunner<Prop, Inbound, State, Outbound, M: IsInboundMessage>:
    Send + Sync + 'static
{
    /// Produces a new actor node, which is run by the pipeline.
    fn new_actor_node(
        name: String,
        prop: Prop,
        state: State,
        receiver: tokio::sync::mpsc::UnboundedReceiver<M>,
        outbound: Outbound,
    ) -> Box<dyn IsActorNode + Send>;
}

/// The default runner: processes one inbound message at a time by calling
/// [HasOnMessage::on_message].
pub struct DefaultRunner<Prop, Inbound, State, Outbound> {
    phantom: std::marker::PhantomData<fn() -> (Prop, Inbound, State, Outbound)>,
}

impl<Prop, Inbound, State, Outbound> DefaultRunner<Prop, Inbound, State, Outbound> {
    /// Create a new default runner.
    pub fn new() -> Self {
        Self {
            phantom: std::marker::PhantomData,
        }
    }
}

impl<Prop, Inbound, State, Outbound> Default for DefaultRunner<Prop, Inbound, State, Outbound> {
    fn default() -> Self {
        Self::new()
    }
}

impl<
        Prop: Value,
        Inbound: IsInboundHub<Prop, State, Outbound, M> + 'static,
        State: Value,
        Outbound: IsOutboundHub,
        M: HasOnMessage<Prop = Prop, State = State, OutboundHub = Outbound>,
    > IsRunner<Prop, Inbound, State, Outbound, M> for DefaultRunner<Prop, Inbound, State, Outbound>
{
    fn new_actor_node(
        name: String,
        prop: Prop,
        state: State,
        receiver: tokio::sync::mpsc::UnboundedReceiver<M>,
        outbound: Outbound,
    ) -> Box<dyn IsActorNode + Send> {
        Box::new(ActorNode::<Prop, State, Outbound, M> {
            name,
            prop,
            init_state: state,
            state: None,
            receiver: Some(receiver),
            outbound,
        })
    }
}

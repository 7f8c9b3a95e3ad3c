use std::fmt::Debug;
use std::marker::PhantomData;

use crate::compute::context::Context;
use crate::core::actor_builder::ActorBuilder;
use crate::core::outbound::IsOutboundHub;
use crate::core::value::Value;

/// The inbound hub is a collection of inbound channels.
pub trait IsInboundHub<Prop, State, Outbound, M: IsInboundMessage>: Send + Sync {
    /// Create a new inbound hub for an actor.
    fn from_builder(builder: &mut ActorBuilder<Prop, State, M>, actor_name: &str) -> Self;
}

/// An empty inbound hub - for actors with no inbound channels.
#[derive(Debug, Clone)]
pub struct NullInbound {}

impl<Prop, State, Outbound, M: IsInboundMessage> IsInboundHub<Prop, State, Outbound, M>
    for NullInbound
{
    fn from_builder(_builder: &mut ActorBuilder<Prop, State, M>, _actor_name: &str) -> Self {
        Self {}
    }
}

/// Inbound channel to receive messages of a specific type `T`.
///
/// Inbound channels can be connected to one or more outbound channels of upstream actors.
#[derive(Debug, Clone)]
pub struct InboundChannel<T, M: IsInboundMessage> {
    /// Unique identifier of the inbound channel.
    pub name: String,
    /// Name of the actor that the inbound messages are for.
    pub actor_name: String,
    pub(crate) sender: tokio::sync::mpsc::UnboundedSender<M>,
    pub(crate) phantom: PhantomData<fn() -> T>,
}

impl<T, M: IsInboundMessageNew<T>> InboundChannel<T, M> {
    /// Creates a new inbound channel.
    pub fn new(
        context: &mut Context,
        actor_name: &str,
        sender: &tokio::sync::mpsc::UnboundedSender<M>,
        name: String,
    ) -> Self {
        context
            .topology
            .assert_unique_inbound_name(name.clone(), actor_name);
        Self {
            name,
            actor_name: actor_name.to_owned(),
            sender: sender.clone(),
            phantom: PhantomData,
        }
    }
}

/// Inbound messages to be received by the actor.
///
/// Typically an enum with one variant per inbound channel.
pub trait IsInboundMessage: Send + Sync + Clone + Debug + 'static {
    /// Prop type of the receiving actor.
    type Prop: Value;

    /// State type of the receiving actor.
    type State: Value;

    /// OutboundHub type of the receiving actor, to produce outbound messages downstream.
    type OutboundHub: IsOutboundHub;

    /// Name of the inbound channel that this message is for.
    fn inbound_channel(&self) -> String;
}

/// Customization point for processing inbound messages.
pub trait HasOnMessage: IsInboundMessage {
    /// Process the inbound message - user code with main business logic goes here.
    fn on_message(
        self,
        prop: &Self::Prop,
        state: &mut Self::State,
        outbound: &Self::OutboundHub,
    );
}

/// Trait for creating inbound messages of compatible types `T`.
pub trait IsInboundMessageNew<T>: IsInboundMessage {
    /// Create a new inbound message from the inbound channel name and the message value of type `T`.
    fn new(inbound_channel: String, value: T) -> Self;
}

/// Null message is a marker type for actors with no inbound channels.
pub enum NullMessage<P, S, O> {
    /// Null message.
    NullMessage(PhantomData<fn() -> (P, S, O)>),
}

impl<P, S, O> NullMessage<P, S, O> {
    /// Creates a new null message.
    pub fn new() -> Self {
        NullMessage::NullMessage(PhantomData)
    }
}

impl<P, S, O> Default for NullMessage<P, S, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, S, O> Clone for NullMessage<P, S, O> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<P, S, O> Debug for NullMessage<P, S, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NullMessage")
    }
}

impl<P: Value, S: Value, O: IsOutboundHub> IsInboundMessage for NullMessage<P, S, O> {
    type Prop = P;
    type State = S;
    type OutboundHub = O;

    fn inbound_channel(&self) -> String {
        "".to_owned()
    }
}

impl<P: Value, S: Value, O: IsOutboundHub> HasOnMessage for NullMessage<P, S, O> {
    fn on_message(self, _prop: &P, _state: &mut S, _outbound: &O) {}
}

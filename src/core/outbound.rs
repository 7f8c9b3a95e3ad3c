use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::compute::context::Context;
use crate::core::connection::ConnectionEnum;
use crate::core::inbound::{InboundChannel, IsInboundMessageNew};

/// OutboundHub is a collection of outbound channels for the actor.
pub trait IsOutboundHub: Send + Sync + 'static + HasActivate {
    /// Creates the OutboundHub from context and the actor name.
    fn from_context_and_parent(context: &mut Context, actor_name: &str) -> Self;
}

/// Trait for morphing state of an outbound channel.
pub trait HasActivate {
    /// Extract outbound channel and returns it.
    fn extract(&mut self) -> Self;

    /// Activates the outbound channel to be used.
    fn activate(&mut self);
}

/// An empty outbound hub - used for actors that do not have any outbound channels.
#[derive(Debug, Clone)]
pub struct NullOutbound {}

impl HasActivate for NullOutbound {
    fn extract(&mut self) -> Self {
        Self {}
    }

    fn activate(&mut self) {}
}

impl IsOutboundHub for NullOutbound {
    fn from_context_and_parent(_context: &mut Context, _actor_name: &str) -> Self {
        Self {}
    }
}

/// OutboundChannel is a connections for messages which are sent to a downstream actor.
///
/// Each message is cloned and delivered to every connected inbound channel.
pub struct OutboundChannel<T> {
    /// Unique name of the outbound.
    pub name: String,
    /// Name of the actor that sends the outbound messages.
    pub actor_name: String,
    pub(crate) connection_register: ConnectionEnum<T>,
}

impl<T: Clone + Send + Sync + 'static> OutboundChannel<T> {
    /// Create a new outbound for actor in provided context.
    pub fn new(context: &mut Context, name: String, actor_name: &str) -> Self {
        context
            .topology
            .assert_unique_outbound_name(name.clone(), actor_name);

        Self {
            name,
            actor_name: actor_name.to_owned(),
            connection_register: ConnectionEnum::new(),
        }
    }

    /// Connect the outbound channel from this actor to the inbound channel of another actor.
    pub fn connect<M: IsInboundMessageNew<T>>(
        &mut self,
        ctx: &mut Context,
        inbound: &mut InboundChannel<T, M>,
    ) {
        ctx.topology
            .connect(&self.actor_name, &self.name, &inbound.actor_name, &inbound.name);
        self.connection_register.push(Arc::new(OutboundConnection {
            sender: inbound.sender.clone(),
            inbound_channel: inbound.name.clone(),
            phantom: PhantomData,
        }));
    }

    /// Connect the outbound channel to an inbound channel of a different type, converting each
    /// message with `adapter`.
    pub fn connect_with_adapter<U: 'static, M: IsInboundMessageNew<U>>(
        &mut self,
        ctx: &mut Context,
        adapter: fn(T) -> U,
        inbound: &mut InboundChannel<U, M>,
    ) {
        ctx.topology
            .connect(&self.actor_name, &self.name, &inbound.actor_name, &inbound.name);
        self.connection_register
            .push(Arc::new(OutboundConnectionWithAdapter {
                sender: inbound.sender.clone(),
                inbound_channel: inbound.name.clone(),
                adapter,
            }));
    }

    /// Send a message to the connected inbound channels to other actors.
    pub fn send(&self, msg: T) {
        self.connection_register.send(msg);
    }
}

impl<T> HasActivate for OutboundChannel<T> {
    fn activate(&mut self) {
        self.connection_register.activate();
    }

    fn extract(&mut self) -> Self {
        Self {
            name: self.name.clone(),
            actor_name: self.actor_name.clone(),
            connection_register: self.connection_register.extract(),
        }
    }
}

/// A single edge from an outbound channel to an inbound channel.
pub trait IsGenericConnection<T>: Send + Sync {
    /// Forwards `msg` to the inbound channel.
    fn send_impl(&self, msg: T);
}

pub(crate) struct OutboundConnection<T, M> {
    pub(crate) sender: tokio::sync::mpsc::UnboundedSender<M>,
    pub(crate) inbound_channel: String,
    pub(crate) phantom: PhantomData<fn(T)>,
}

impl<T, M: IsInboundMessageNew<T>> IsGenericConnection<T> for OutboundConnection<T, M> {
    fn send_impl(&self, msg: T) {
        let msg = M::new(self.inbound_channel.clone(), msg);
        if self.sender.send(msg).is_err() {
            debug!("inbound channel {} is closed", self.inbound_channel);
        }
    }
}

pub(crate) struct OutboundConnectionWithAdapter<T, U, M> {
    pub(crate) sender: tokio::sync::mpsc::UnboundedSender<M>,
    pub(crate) inbound_channel: String,
    pub(crate) adapter: fn(T) -> U,
}

impl<T, U, M: IsInboundMessageNew<U>> IsGenericConnection<T>
    for OutboundConnectionWithAdapter<T, U, M>
{
    fn send_impl(&self, msg: T) {
        let msg = M::new(self.inbound_channel.clone(), (self.adapter)(msg));
        if self.sender.send(msg).is_err() {
            debug!("inbound channel {} is closed", self.inbound_channel);
        }
    }
}

use async_trait::async_trait;
use tokio::select;
use tracing::warn;

use crate::compute::context::Context;
use crate::core::actor_builder::ActorBuilder;
use crate::core::inbound::{HasOnMessage, IsInboundHub, IsInboundMessage};
use crate::core::outbound::IsOutboundHub;
use crate::core::runner::{DefaultRunner, IsRunner};
use crate::core::value::Value;

/// A generic actor in the compute pipeline.
///
/// The actor handle consists of its unique name, a set of inbound channels, and a set of outbound
/// channels. It is used to connect the actor to other actors while the pipeline is configured.
/// The state of the actor is not part of the handle: it is owned by the actor node which runs
/// inside the pipeline.
pub struct GenericActor<Prop, Inbound, State, Outbound, Run> {
    /// unique name of the actor
    pub actor_name: String,
    /// a collection of inbound channels
    pub inbound: Inbound,
    /// a collection of outbound channels
    pub outbound: Outbound,
    pub(crate) phantom: std::marker::PhantomData<fn() -> (Prop, State, Run)>,
}

/// An actor with the default runner, but otherwise generic over its prop, inbound hub, state and
/// outbound hub.
pub type Actor<Prop, Inbound, State, Outbound> =
    GenericActor<Prop, Inbound, State, Outbound, DefaultRunner<Prop, Inbound, State, Outbound>>;

/// New actor from prop and state.
pub trait HasFromPropState<
    Prop: Value,
    Inbound: IsInboundHub<Prop, State, Outbound, M>,
    State: Value,
    Outbound: IsOutboundHub,
    M: IsInboundMessage,
    Run: IsRunner<Prop, Inbound, State, Outbound, M>,
>
{
    /// Produces a hint for the name of the actor. Typically the hint is mangled with an id to
    /// produce a unique name, if multiple actors of the same type are created.
    fn name_hint(prop: &Prop) -> String;

    /// Produces a new actor with the given prop and initial state, and adds it to the context.
    fn from_prop_and_state(
        context: &mut Context,
        prop: Prop,
        initial_state: State,
    ) -> GenericActor<Prop, Inbound, State, Outbound, Run> {
        let actor_name = context.topology.add_new_unique_name(Self::name_hint(&prop));
        let out = Outbound::from_context_and_parent(context, &actor_name);

        let mut builder = ActorBuilder::new(context, &actor_name, prop, initial_state);

        let inbound = Inbound::from_builder(&mut builder, &actor_name);
        builder.build::<Inbound, Outbound, Run>(inbound, out)
    }
}

/// An actor node as run by the pipeline.
#[async_trait]
pub trait IsActorNode {
    /// Get the name of the actor.
    fn name(&self) -> &String;

    /// Reset the actor to its initial state.
    fn reset(&mut self);

    /// Run the actor until all inbound channels are closed or `kill` fires.
    ///
    /// Messages already queued when `kill` fires are still processed.
    async fn run(&mut self, kill: tokio::sync::broadcast::Receiver<()>);
}

pub(crate) struct ActorNode<Prop, State, Outbound, M> {
    pub(crate) name: String,
    pub(crate) prop: Prop,
    pub(crate) init_state: State,
    pub(crate) state: Option<State>,
    pub(crate) receiver: Option<tokio::sync::mpsc::UnboundedReceiver<M>>,
    pub(crate) outbound: Outbound,
}

#[async_trait]
impl<
        Prop: Value,
        State: Value,
        Outbound: IsOutboundHub,
        M: HasOnMessage<Prop = Prop, State = State, OutboundHub = Outbound>,
    > IsActorNode for ActorNode<Prop, State, Outbound, M>
{
    fn name(&self) -> &String {
        &self.name
    }

    fn reset(&mut self) {
        self.state = Some(self.init_state.clone());
    }

    async fn run(&mut self, mut kill: tokio::sync::broadcast::Receiver<()>) {
        self.outbound.activate();
        let mut state = self.init_state.clone();
        let mut receiver = match self.receiver.take() {
            Some(receiver) => receiver,
            None => {
                warn!("actor {} has been run already", self.name);
                return;
            }
        };

        loop {
            select! {
                _ = kill.recv() => {
                    // upstream actors have stopped, so the queue holds all that is left
                    while let Ok(m) = receiver.try_recv() {
                        m.on_message(&self.prop, &mut state, &self.outbound);
                    }
                    break;
                },
                m = receiver.recv() => {
                    match m {
                        Some(m) => m.on_message(&self.prop, &mut state, &self.outbound),
                        None => break,
                    }
                }
            }
        }

        self.state = Some(state);
        self.receiver = Some(receiver);
    }
}

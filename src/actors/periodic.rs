use async_trait::async_trait;
use tokio::select;
use tracing::warn;

use crate::compute::context::Context;
use crate::core::actor::{GenericActor, HasFromPropState, IsActorNode};
use crate::core::inbound::{NullInbound, NullMessage};
use crate::core::outbound::{HasActivate, IsOutboundHub, OutboundChannel};
use crate::core::runner::IsRunner;
use crate::core::value::Value;

/// A periodic actor.
///
/// This is an actor that periodically sends a message to its outbound. It is the clock driving
/// the simulation, one time stamp per simulated step.
pub type Periodic =
    GenericActor<PeriodicProp, NullInbound, PeriodicState, PeriodicOutbound, PeriodicRunner>;

type PeriodicMessage = NullMessage<PeriodicProp, PeriodicState, PeriodicOutbound>;

impl Periodic {
    /// Create a new periodic actor, with a period of `period` seconds.
    pub fn new_with_period(context: &mut Context, period: f64) -> Periodic {
        Periodic::from_prop_and_state(
            context,
            PeriodicProp {
                period,
                ..Default::default()
            },
            PeriodicState::default(),
        )
    }
}

impl
    HasFromPropState<
        PeriodicProp,
        NullInbound,
        PeriodicState,
        PeriodicOutbound,
        PeriodicMessage,
        PeriodicRunner,
    > for Periodic
{
    fn name_hint(_prop: &PeriodicProp) -> String {
        "Periodic".to_owned()
    }
}

/// Configuration properties for the periodic actor.
#[derive(Clone, Debug)]
pub struct PeriodicProp {
    /// Period in seconds.
    pub period: f64,
    /// Elapsed time in seconds after which no more time stamps are sent.
    pub stop_time: f64,
}

impl Default for PeriodicProp {
    fn default() -> Self {
        Self {
            period: 1.0,
            stop_time: 24.0 * 60.0 * 60.0,
        }
    }
}

impl Value for PeriodicProp {}

/// State of the periodic actor.
#[derive(Clone, Debug, Default)]
pub struct PeriodicState {
    /// Number of time stamps sent.
    pub count: u32,
    /// Time elapsed since start, in seconds.
    pub time_elapsed: f64,
}

impl Value for PeriodicState {}

/// Outbound hub of periodic actor, which consists of a single outbound channel.
pub struct PeriodicOutbound {
    /// Time stamp outbound channel, which sends a messages every `period`
    /// seconds with the current time stamp.
    pub time_stamp: OutboundChannel<f64>,
}

impl HasActivate for PeriodicOutbound {
    fn extract(&mut self) -> Self {
        Self {
            time_stamp: self.time_stamp.extract(),
        }
    }

    fn activate(&mut self) {
        self.time_stamp.activate();
    }
}

impl IsOutboundHub for PeriodicOutbound {
    fn from_context_and_parent(context: &mut Context, actor_name: &str) -> Self {
        Self {
            time_stamp: OutboundChannel::<f64>::new(context, "time_stamp".to_owned(), actor_name),
        }
    }
}

/// The custom runner for the periodic actor.
pub struct PeriodicRunner {}

impl IsRunner<PeriodicProp, NullInbound, PeriodicState, PeriodicOutbound, PeriodicMessage>
    for PeriodicRunner
{
    fn new_actor_node(
        name: String,
        prop: PeriodicProp,
        state: PeriodicState,
        _receiver: tokio::sync::mpsc::UnboundedReceiver<PeriodicMessage>,
        outbound: PeriodicOutbound,
    ) -> Box<dyn IsActorNode + Send> {
        Box::new(ActivePeriodic {
            name,
            prop,
            init_state: state,
            state: None,
            outbound,
        })
    }
}

/// The active periodic actor.
pub struct ActivePeriodic {
    name: String,
    prop: PeriodicProp,
    init_state: PeriodicState,
    state: Option<PeriodicState>,
    outbound: PeriodicOutbound,
}

#[async_trait]
impl IsActorNode for ActivePeriodic {
    fn name(&self) -> &String {
        &self.name
    }

    fn reset(&mut self) {
        self.state = Some(self.init_state.clone());
    }

    async fn run(&mut self, mut kill: tokio::sync::broadcast::Receiver<()>) {
        self.outbound.activate();

        if !(self.prop.period.is_finite() && self.prop.period > 0.0) {
            warn!("{}: invalid period {}, no time stamps sent", self.name, self.prop.period);
            return;
        }

        let mut state = self.init_state.clone();
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs_f64(self.prop.period));

        loop {
            select! {
                _ = kill.recv() => {
                    break;
                },
                _ = interval.tick() => {
                    if state.time_elapsed >= self.prop.stop_time {
                        break;
                    }
                    state.count += 1;
                    state.time_elapsed += interval.period().as_secs_f64();
                    self.outbound.time_stamp.send(state.time_elapsed);
                }
            }
        }
        self.state = Some(state);
    }
}

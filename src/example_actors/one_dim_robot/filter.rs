use tracing::{debug, error, warn};

use crate::bayes::{Belief, DiscreteBayesFilter, MotionKernel, Result};
use crate::compute::context::Context;
use crate::core::actor::{Actor, HasFromPropState};
use crate::core::actor_builder::ActorBuilder;
use crate::core::inbound::{
    HasOnMessage, InboundChannel, IsInboundHub, IsInboundMessage, IsInboundMessageNew,
};
use crate::core::outbound::{HasActivate, IsOutboundHub, OutboundChannel};
use crate::core::runner::DefaultRunner;
use crate::core::value::Value;
use crate::example_actors::one_dim_robot::{Estimate, Observation, Stamped};

/// Inbound channels for the filter actor.
#[derive(Clone, Debug)]
pub enum FilterInboundMessage {
    /// Commanded motion and door sensor reading of one step.
    Observation(Stamped<Observation>),
}

/// Histogram filter actor for the one dimensional robot.
pub type Filter = Actor<FilterProp, FilterInbound, FilterState, FilterOutbound>;

impl
    HasFromPropState<
        FilterProp,
        FilterInbound,
        FilterState,
        FilterOutbound,
        FilterInboundMessage,
        DefaultRunner<FilterProp, FilterInbound, FilterState, FilterOutbound>,
    > for Filter
{
    fn name_hint(_prop: &FilterProp) -> String {
        "Filter".to_owned()
    }
}

impl IsInboundMessage for FilterInboundMessage {
    type Prop = FilterProp;
    type State = FilterState;
    type OutboundHub = FilterOutbound;

    fn inbound_channel(&self) -> String {
        match self {
            FilterInboundMessage::Observation(_) => "Observation".to_owned(),
        }
    }
}

impl HasOnMessage for FilterInboundMessage {
    /// Runs one predict and update cycle per observation.
    fn on_message(self, prop: &FilterProp, state: &mut FilterState, outbound: &FilterOutbound) {
        match self {
            FilterInboundMessage::Observation(observation) => {
                state.process_observation(&observation, prop, outbound);
            }
        }
    }
}

impl IsInboundMessageNew<Stamped<Observation>> for FilterInboundMessage {
    fn new(_inbound_name: String, msg: Stamped<Observation>) -> Self {
        FilterInboundMessage::Observation(msg)
    }
}

/// Inbound hub of the filter actor.
pub struct FilterInbound {
    /// Observations from the robot.
    pub observation: InboundChannel<Stamped<Observation>, FilterInboundMessage>,
}

impl IsInboundHub<FilterProp, FilterState, FilterOutbound, FilterInboundMessage>
    for FilterInbound
{
    fn from_builder(
        builder: &mut ActorBuilder<FilterProp, FilterState, FilterInboundMessage>,
        actor_name: &str,
    ) -> Self {
        let observation = InboundChannel::new(
            builder.context,
            actor_name,
            &builder.sender,
            "Observation".to_owned(),
        );
        Self { observation }
    }
}

/// What the filter actor does when an update is degenerate, i.e. the sensor reading is
/// impossible under the predicted belief.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecoveryPolicy {
    /// Forget everything and restart from a uniform belief.
    #[default]
    ResetUniform,
    /// Skip the update and carry on with the predicted belief.
    KeepPrior,
}

/// Filter properties.
#[derive(Clone, Debug, Default)]
pub struct FilterProp {
    /// Motion kernel of the predict step.
    pub kernel: MotionKernel,
    /// Reaction to degenerate updates.
    pub recovery: RecoveryPolicy,
}

impl Value for FilterProp {}

/// Filter state
#[derive(Clone, Debug)]
pub struct FilterState {
    /// The histogram filter, owning the current belief.
    pub filter: DiscreteBayesFilter,
}

impl Value for FilterState {}

impl FilterState {
    /// Uniform belief over `num_bins` bins.
    pub fn new(num_bins: usize, prop: &FilterProp) -> Result<Self> {
        Ok(Self {
            filter: DiscreteBayesFilter::with_uniform_prior(num_bins, prop.kernel.clone())?,
        })
    }

    /// Predict by the commanded offset, then update with the sensor likelihood.
    ///
    /// A degenerate update is not an error at this level: it is logged and the configured
    /// [RecoveryPolicy] is applied. A malformed observation, e.g. a likelihood for a track of
    /// different length, is logged and dropped, and the belief stays as it was.
    pub fn observe(&mut self, observation: &Observation, prop: &FilterProp) -> Estimate {
        let recovered = match self.filter.step(observation.offset, &observation.likelihood) {
            Ok(_) => false,
            Err(err) if err.is_degenerate() => {
                warn!("filter step failed: {}, recovering with {:?}", err, prop.recovery);
                self.recover(observation.offset, prop.recovery);
                true
            }
            Err(err) => {
                error!("observation rejected: {}", err);
                false
            }
        };
        Estimate {
            belief: self.filter.belief().clone(),
            likelihood: observation.likelihood.clone(),
            bin: self.filter.estimate(),
            detected: observation.detected,
            recovered,
        }
    }

    fn recover(&mut self, offset: i64, policy: RecoveryPolicy) {
        match policy {
            RecoveryPolicy::ResetUniform => {
                let reset = Belief::uniform(self.filter.num_bins())
                    .and_then(|prior| self.filter.reset(prior));
                if let Err(err) = reset {
                    warn!("cannot reset belief: {}", err);
                }
            }
            RecoveryPolicy::KeepPrior => {
                self.filter.predict(offset);
            }
        }
    }

    /// Filters one observation and publishes the estimate under the observation's stamp.
    pub fn process_observation(
        &mut self,
        observation: &Stamped<Observation>,
        prop: &FilterProp,
        outbound: &FilterOutbound,
    ) {
        let estimate = self.observe(&observation.value, prop);
        debug!(
            "filter step {}: estimate {}",
            observation.seq, estimate.belief
        );
        outbound
            .estimate
            .send(Stamped::from_stamp_counter_and_value(
                observation.time,
                observation.seq,
                &estimate,
            ));
    }
}

/// OutboundChannel channels for the filter actor.
pub struct FilterOutbound {
    /// Publishes the posterior belief after each observation.
    pub estimate: OutboundChannel<Stamped<Estimate>>,
}

impl HasActivate for FilterOutbound {
    fn extract(&mut self) -> Self {
        Self {
            estimate: self.estimate.extract(),
        }
    }

    fn activate(&mut self) {
        self.estimate.activate();
    }
}

impl IsOutboundHub for FilterOutbound {
    fn from_context_and_parent(context: &mut Context, actor_name: &str) -> Self {
        Self {
            estimate: OutboundChannel::new(context, "estimate".to_owned(), actor_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bayes::Likelihood;
    use crate::example_actors::one_dim_robot::{LandmarkSensorModel, World};

    fn observation(offset: i64, likelihood: Likelihood) -> Observation {
        Observation {
            offset,
            detected: false,
            likelihood,
        }
    }

    #[test]
    fn observe_localizes_at_door() {
        let sensor = LandmarkSensorModel::new(World::new(10, vec![3]).unwrap());
        let prop = FilterProp::default();
        let mut state = FilterState::new(10, &prop).unwrap();

        let estimate = state.observe(
            &Observation {
                offset: 1,
                detected: true,
                likelihood: sensor.likelihood(true),
            },
            &prop,
        );
        assert_eq!(estimate.bin, 3);
        assert!(estimate.detected);
        assert!(!estimate.recovered);
        assert!((estimate.belief.get(3).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_update_resets_to_uniform() {
        let prop = FilterProp::default();
        let mut state = FilterState::new(4, &prop).unwrap();
        state.filter.reset(Belief::one_hot(4, 0).unwrap()).unwrap();

        let estimate = state.observe(&observation(1, Likelihood::uniform(4, 0.0).unwrap()), &prop);
        assert!(estimate.recovered);
        for p in estimate.belief.as_slice() {
            assert!((p - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn malformed_observation_leaves_belief_unchanged() {
        for recovery in [RecoveryPolicy::ResetUniform, RecoveryPolicy::KeepPrior] {
            let prop = FilterProp {
                recovery,
                ..Default::default()
            };
            let mut state = FilterState::new(4, &prop).unwrap();
            state.filter.reset(Belief::one_hot(4, 2).unwrap()).unwrap();

            let estimate =
                state.observe(&observation(1, Likelihood::uniform(5, 1.0).unwrap()), &prop);
            assert!(!estimate.recovered);
            assert_eq!(estimate.bin, 2);
            assert_eq!(state.filter.belief(), &Belief::one_hot(4, 2).unwrap());
        }
    }

    #[test]
    fn degenerate_update_keeps_prediction() {
        let prop = FilterProp {
            recovery: RecoveryPolicy::KeepPrior,
            ..Default::default()
        };
        let mut state = FilterState::new(4, &prop).unwrap();
        state.filter.reset(Belief::one_hot(4, 0).unwrap()).unwrap();

        let estimate = state.observe(&observation(1, Likelihood::uniform(4, 0.0).unwrap()), &prop);
        assert!(estimate.recovered);
        assert_eq!(estimate.bin, 1);
        assert_eq!(estimate.belief.get(1), Some(1.0));
    }
}

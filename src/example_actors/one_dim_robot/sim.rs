use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rand_distr::Bernoulli;
use rand_distr::Distribution;
use tracing::{debug, warn};

use crate::compute::context::Context;
use crate::core::actor::{Actor, HasFromPropState};
use crate::core::actor_builder::ActorBuilder;
use crate::core::inbound::{
    HasOnMessage, InboundChannel, IsInboundHub, IsInboundMessage, IsInboundMessageNew,
};
use crate::core::outbound::{HasActivate, IsOutboundHub, OutboundChannel};
use crate::core::runner::DefaultRunner;
use crate::core::value::Value;
use crate::example_actors::one_dim_robot::{LandmarkSensorModel, Observation, Robot, Stamped};

/// Inbound channels for the simulation actor.
#[derive(Clone, Debug)]
pub enum SimInboundMessage {
    /// Time-stamp message to drive the simulation, one step per message.
    TimeStamp(f64),
}

/// Simulation for the one-dimensional Robot.
pub type Sim = Actor<SimProp, SimInbound, SimState, SimOutbound>;

impl
    HasFromPropState<
        SimProp,
        SimInbound,
        SimState,
        SimOutbound,
        SimInboundMessage,
        DefaultRunner<SimProp, SimInbound, SimState, SimOutbound>,
    > for Sim
{
    fn name_hint(_prop: &SimProp) -> String {
        "Sim".to_owned()
    }
}

impl IsInboundMessage for SimInboundMessage {
    type Prop = SimProp;
    type State = SimState;
    type OutboundHub = SimOutbound;

    fn inbound_channel(&self) -> String {
        match self {
            SimInboundMessage::TimeStamp(_) => "TimeStamp".to_owned(),
        }
    }
}

impl HasOnMessage for SimInboundMessage {
    /// Invokes [SimState::process_time_stamp()] on TimeStamp.
    fn on_message(self, prop: &SimProp, state: &mut SimState, outbound: &SimOutbound) {
        match self {
            SimInboundMessage::TimeStamp(time) => {
                state.process_time_stamp(time, prop, outbound);
            }
        }
    }
}

impl IsInboundMessageNew<f64> for SimInboundMessage {
    fn new(_inbound_name: String, msg: f64) -> Self {
        SimInboundMessage::TimeStamp(msg)
    }
}

/// Inbound hub of the simulation actor.
pub struct SimInbound {
    /// Clock of the simulation.
    pub time_stamp: InboundChannel<f64, SimInboundMessage>,
}

impl IsInboundHub<SimProp, SimState, SimOutbound, SimInboundMessage> for SimInbound {
    fn from_builder(
        builder: &mut ActorBuilder<SimProp, SimState, SimInboundMessage>,
        actor_name: &str,
    ) -> Self {
        let time_stamp = InboundChannel::new(
            builder.context,
            actor_name,
            &builder.sender,
            SimInboundMessage::TimeStamp(0.0).inbound_channel(),
        );
        Self { time_stamp }
    }
}

/// Simulation properties.
#[derive(Clone, Debug)]
pub struct SimProp {
    /// World and door sensor.
    pub sensor: LandmarkSensorModel,
    /// Commanded displacement per step, in bins.
    pub velocity: i64,
    /// Number of steps after which the simulation requests the pipeline to shut down.
    pub shutdown_step: u64,
    /// Probability that the robot overshoots, and again that it undershoots, its commanded
    /// displacement by one bin.
    pub slip_probability: f64,
}

impl Default for SimProp {
    fn default() -> Self {
        Self {
            sensor: LandmarkSensorModel::default(),
            velocity: 1,
            shutdown_step: 100,
            slip_probability: 0.0,
        }
    }
}

impl Value for SimProp {}

/// Simulation state
#[derive(Clone, Debug)]
pub struct SimState {
    /// Current time.
    pub time: f64,
    /// Number of simulated steps.
    pub seq: u64,
    /// True position and velocity of the robot.
    pub true_robot: Robot,
    rng: StdRng,
}

impl Value for SimState {}

impl SimState {
    /// Robot starting at `start_bin`, slips drawn from a generator seeded with `seed`.
    pub fn new(start_bin: usize, seed: u64) -> Self {
        Self {
            time: 0.0,
            seq: 0,
            true_robot: Robot {
                bin: start_bin,
                velocity: 0,
            },
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn sample_slip(&mut self, slip_probability: f64) -> i64 {
        if slip_probability <= 0.0 {
            return 0;
        }
        let slip = match Bernoulli::new((2.0 * slip_probability).min(1.0)) {
            Ok(slip) => slip,
            Err(err) => {
                warn!("invalid slip probability {}: {}", slip_probability, err);
                return 0;
            }
        };
        if !slip.sample(&mut self.rng) {
            0
        } else if self.rng.gen_bool(0.5) {
            1
        } else {
            -1
        }
    }

    /// Moves the robot one step and reads the door sensor.
    pub fn step(&mut self, prop: &SimProp) -> Observation {
        let displacement = prop.velocity + self.sample_slip(prop.slip_probability);
        self.true_robot.velocity = prop.velocity;
        self.true_robot.bin = prop.sensor.world.advance(self.true_robot.bin, displacement);

        let detected = prop.sensor.detect(self.true_robot.bin);
        Observation {
            offset: prop.velocity,
            detected,
            likelihood: prop.sensor.likelihood(detected),
        }
    }

    /// One step of the simulation.
    pub fn process_time_stamp(&mut self, time: f64, prop: &SimProp, outbound: &SimOutbound) {
        if self.seq >= prop.shutdown_step {
            return;
        }
        self.time = time;
        let observation = self.step(prop);
        debug!(
            "sim step {}: robot at bin {}, {}",
            self.seq, self.true_robot.bin, observation
        );

        outbound
            .true_robot
            .send(Stamped::from_stamp_counter_and_value(
                time,
                self.seq,
                &self.true_robot,
            ));
        outbound
            .observation
            .send(Stamped::from_stamp_counter_and_value(
                time,
                self.seq,
                &observation,
            ));

        self.seq += 1;

        if self.seq >= prop.shutdown_step {
            outbound.cancel_request.send(());
        }
    }
}

/// OutboundChannel channels for the simulation actor.
pub struct SimOutbound {
    /// True position of the robot.
    pub true_robot: OutboundChannel<Stamped<Robot>>,
    /// Commanded motion and door sensor reading.
    pub observation: OutboundChannel<Stamped<Observation>>,
    /// Compute pipeline cancel request.
    pub cancel_request: OutboundChannel<()>,
}

impl HasActivate for SimOutbound {
    fn extract(&mut self) -> Self {
        Self {
            true_robot: self.true_robot.extract(),
            observation: self.observation.extract(),
            cancel_request: self.cancel_request.extract(),
        }
    }

    fn activate(&mut self) {
        self.true_robot.activate();
        self.observation.activate();
        self.cancel_request.activate();
    }
}

impl IsOutboundHub for SimOutbound {
    fn from_context_and_parent(context: &mut Context, actor_name: &str) -> Self {
        Self {
            true_robot: OutboundChannel::new(context, "true_robot".to_owned(), actor_name),
            observation: OutboundChannel::new(context, "observation".to_owned(), actor_name),
            cancel_request: OutboundChannel::new(context, "cancel_request".to_owned(), actor_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example_actors::one_dim_robot::World;

    #[test]
    fn noise_free_robot_moves_by_velocity() {
        let prop = SimProp::default();
        let mut state = SimState::new(0, 0);
        for _ in 0..10 {
            state.step(&prop);
        }
        assert_eq!(state.true_robot.bin, 10);
        let observation = state.step(&prop);
        assert_eq!(state.true_robot.bin, 11);
        assert!(!observation.detected);
        assert_eq!(observation.offset, 1);
    }

    #[test]
    fn sensor_fires_at_door() {
        let prop = SimProp {
            sensor: LandmarkSensorModel::new(World::new(10, vec![3]).unwrap()),
            ..Default::default()
        };
        let mut state = SimState::new(2, 0);
        let observation = state.step(&prop);
        assert!(observation.detected);
        assert_eq!(observation.likelihood.as_slice()[3], 1.0);
    }

    #[test]
    fn slipping_robot_stays_close_to_command() {
        let prop = SimProp {
            slip_probability: 0.2,
            ..Default::default()
        };
        let mut state = SimState::new(0, 42);
        let world = prop.sensor.world.clone();
        for _ in 0..50 {
            let before = state.true_robot.bin;
            state.step(&prop);
            let moved = world.signed_distance(before, state.true_robot.bin);
            assert!((0..=2).contains(&moved), "moved {}", moved);
        }
    }
}

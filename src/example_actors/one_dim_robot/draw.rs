use std::collections::BTreeMap;
use std::fmt::Write;

use drawille::{Canvas, PixelColor};

use crate::core::actor::{Actor, HasFromPropState};
use crate::core::actor_builder::ActorBuilder;
use crate::core::inbound::{
    HasOnMessage, InboundChannel, IsInboundHub, IsInboundMessage, IsInboundMessageNew,
};
use crate::core::outbound::NullOutbound;
use crate::core::runner::DefaultRunner;
use crate::core::value::Value;
use crate::example_actors::one_dim_robot::{Estimate, Robot, Stamped, World};

/// Inbound channels for the draw actor
#[derive(Clone, Debug)]
pub enum DrawInboundMessage {
    /// True robot position of one step.
    TrueRobot(Stamped<Robot>),
    /// Filter estimate of one step.
    Estimate(Stamped<Estimate>),
}

/// Draw actor for one-dim-robot example.
pub type DrawActor = Actor<DrawProp, DrawInbound, DrawState, NullOutbound>;

impl
    HasFromPropState<
        DrawProp,
        DrawInbound,
        DrawState,
        NullOutbound,
        DrawInboundMessage,
        DefaultRunner<DrawProp, DrawInbound, DrawState, NullOutbound>,
    > for DrawActor
{
    fn name_hint(_prop: &DrawProp) -> String {
        "DrawActor".to_owned()
    }
}

impl IsInboundMessage for DrawInboundMessage {
    type Prop = DrawProp;
    type State = DrawState;
    type OutboundHub = NullOutbound;

    fn inbound_channel(&self) -> String {
        match self {
            DrawInboundMessage::TrueRobot(_) => "TrueRobot".to_owned(),
            DrawInboundMessage::Estimate(_) => "Estimate".to_owned(),
        }
    }
}

impl HasOnMessage for DrawInboundMessage {
    /// Forward the message to the correct handler method of [DrawState].
    fn on_message(self, prop: &DrawProp, state: &mut DrawState, _outbound: &NullOutbound) {
        let frame = match self {
            DrawInboundMessage::TrueRobot(robot) => state.add_true_robot(robot, prop),
            DrawInboundMessage::Estimate(estimate) => state.add_estimate(estimate, prop),
        };
        if let Some(frame) = frame {
            println!("{}", frame);
        }
    }
}

impl IsInboundMessageNew<Stamped<Robot>> for DrawInboundMessage {
    fn new(_inbound_name: String, msg: Stamped<Robot>) -> Self {
        DrawInboundMessage::TrueRobot(msg)
    }
}

impl IsInboundMessageNew<Stamped<Estimate>> for DrawInboundMessage {
    fn new(_inbound_name: String, msg: Stamped<Estimate>) -> Self {
        DrawInboundMessage::Estimate(msg)
    }
}

/// Inbound hub of the draw actor.
pub struct DrawInbound {
    /// True robot position from the simulation.
    pub true_robot: InboundChannel<Stamped<Robot>, DrawInboundMessage>,
    /// Estimate from the filter.
    pub estimate: InboundChannel<Stamped<Estimate>, DrawInboundMessage>,
}

impl IsInboundHub<DrawProp, DrawState, NullOutbound, DrawInboundMessage> for DrawInbound {
    fn from_builder(
        builder: &mut ActorBuilder<DrawProp, DrawState, DrawInboundMessage>,
        actor_name: &str,
    ) -> Self {
        let true_robot = InboundChannel::new(
            builder.context,
            actor_name,
            &builder.sender,
            "TrueRobot".to_owned(),
        );
        let estimate = InboundChannel::new(
            builder.context,
            actor_name,
            &builder.sender,
            "Estimate".to_owned(),
        );
        Self {
            true_robot,
            estimate,
        }
    }
}

/// Layout of the console drawing.
#[derive(Clone, Debug)]
pub struct DrawProp {
    /// The world to draw the doors of.
    pub world: World,
    /// Horizontal braille pixels per bin.
    pub pixels_per_bin: u32,
    /// Height in braille pixels of each of the three strips.
    pub strip_height: u32,
}

impl Default for DrawProp {
    fn default() -> Self {
        Self {
            world: World::default(),
            pixels_per_bin: 2,
            strip_height: 12,
        }
    }
}

impl Value for DrawProp {}

/// State of the draw actor.
///
/// Truth and estimate travel along different paths through the pipeline, so each side is kept
/// until its counterpart with the same sequence number arrives.
#[derive(Clone, Debug, Default)]
pub struct DrawState {
    true_robots: BTreeMap<u64, Stamped<Robot>>,
    estimates: BTreeMap<u64, Stamped<Estimate>>,
}

impl Value for DrawState {}

impl DrawState {
    /// Adds the truth of one step, returns the frame if its estimate is already there.
    pub fn add_true_robot(&mut self, robot: Stamped<Robot>, prop: &DrawProp) -> Option<String> {
        let seq = robot.seq;
        match self.estimates.remove(&seq) {
            Some(estimate) => Some(self.complete(seq, &robot, &estimate, prop)),
            None => {
                self.true_robots.insert(seq, robot);
                None
            }
        }
    }

    /// Adds the estimate of one step, returns the frame if its truth is already there.
    pub fn add_estimate(&mut self, estimate: Stamped<Estimate>, prop: &DrawProp) -> Option<String> {
        let seq = estimate.seq;
        match self.true_robots.remove(&seq) {
            Some(robot) => Some(self.complete(seq, &robot, &estimate, prop)),
            None => {
                self.estimates.insert(seq, estimate);
                None
            }
        }
    }

    /// Number of steps waiting for their counterpart.
    pub fn num_pending(&self) -> usize {
        self.true_robots.len() + self.estimates.len()
    }

    fn complete(
        &mut self,
        seq: u64,
        robot: &Stamped<Robot>,
        estimate: &Stamped<Estimate>,
        prop: &DrawProp,
    ) -> String {
        // older steps can no longer be completed
        self.true_robots = self.true_robots.split_off(&seq);
        self.estimates = self.estimates.split_off(&seq);
        render_frame(prop, robot, estimate)
    }
}

/// Renders one step to a string: the time, three braille strips and a summary.
///
/// The strips show, from top to bottom, the robot (blue) among the doors (green), the belief
/// (red) and the likelihood of the sensor reading (blue). Belief and likelihood are scaled to
/// their largest entry.
pub fn render_frame(prop: &DrawProp, robot: &Stamped<Robot>, estimate: &Stamped<Estimate>) -> String {
    let num_bins = prop.world.num_bins();
    let ppb = prop.pixels_per_bin.max(1);
    let h = prop.strip_height.max(4);
    let width = num_bins as u32 * ppb;
    let mut canvas = Canvas::new(width, 3 * h);

    let x_of = |bin: usize| bin as u32 * ppb;

    let ground = h - 1;
    for &door in prop.world.landmarks() {
        let x = x_of(door);
        canvas.line_colored(x, ground, x, ground - h / 2, PixelColor::Green);
    }
    let x = x_of(robot.value.bin);
    let top = ground - (h - 2);
    let right = x + ppb.max(2) - 1;
    canvas.line_colored(x, ground, x, top, PixelColor::Blue);
    canvas.line_colored(x, top, right, top, PixelColor::Blue);
    canvas.line_colored(right, ground, right, top, PixelColor::Blue);

    draw_bars(
        &mut canvas,
        estimate.value.belief.as_slice(),
        2 * h - 1,
        h - 1,
        ppb,
        PixelColor::Red,
    );
    draw_bars(
        &mut canvas,
        estimate.value.likelihood.as_slice(),
        3 * h - 1,
        h - 1,
        ppb,
        PixelColor::Blue,
    );

    let predicted = estimate.value.bin;
    let actual = robot.value.bin;
    let mut out = String::new();
    let _ = writeln!(out, "time:{}", robot.time);
    let _ = writeln!(out, "{}", canvas.frame());
    let _ = writeln!(
        out,
        "{}",
        if estimate.value.detected {
            "detect door"
        } else {
            "detect no door"
        }
    );
    let _ = write!(
        out,
        "predicted location: {}, actual location: {}, error: {}",
        predicted,
        actual,
        prop.world.signed_distance(actual, predicted)
    );
    if estimate.value.recovered {
        let _ = write!(out, " (filter reset)");
    }
    out
}

fn draw_bars(
    canvas: &mut Canvas,
    values: &[f64],
    base: u32,
    max_height: u32,
    ppb: u32,
    color: PixelColor,
) {
    let peak = values.iter().cloned().fold(0.0, f64::max);
    if peak <= 0.0 {
        return;
    }
    for (bin, &value) in values.iter().enumerate() {
        let height = ((value / peak) * max_height as f64).round() as u32;
        if height == 0 {
            continue;
        }
        let x = bin as u32 * ppb;
        canvas.line_colored(x, base, x, base - height.min(max_height), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bayes::{Belief, Likelihood};

    fn estimate(seq: u64, bin: usize, detected: bool) -> Stamped<Estimate> {
        let mut likelihood = vec![0.0; 100];
        likelihood[bin] = 1.0;
        Stamped::from_stamp_counter_and_value(
            seq as f64,
            seq,
            &Estimate {
                belief: Belief::one_hot(100, bin).unwrap(),
                likelihood: Likelihood::try_from_vec(likelihood).unwrap(),
                bin,
                detected,
                recovered: false,
            },
        )
    }

    fn robot(seq: u64, bin: usize) -> Stamped<Robot> {
        Stamped::from_stamp_counter_and_value(seq as f64, seq, &Robot { bin, velocity: 1 })
    }

    #[test]
    fn frame_reports_error() {
        let frame = render_frame(&DrawProp::default(), &robot(3, 11), &estimate(3, 10, true));
        assert!(frame.starts_with("time:3"));
        assert!(frame.contains("detect door"));
        assert!(frame.contains("predicted location: 10, actual location: 11, error: -1"));
    }

    #[test]
    fn pairs_by_sequence_number() {
        let prop = DrawProp::default();
        let mut state = DrawState::default();
        assert!(state.add_true_robot(robot(0, 1), &prop).is_none());
        assert!(state.add_true_robot(robot(1, 2), &prop).is_none());
        assert!(state.add_estimate(estimate(2, 3, false), &prop).is_none());

        let frame = state.add_estimate(estimate(1, 2, false), &prop).unwrap();
        assert!(frame.contains("detect no door"));
        assert!(frame.contains("error: 0"));
        // step 0 is dropped, step 2 still waits for its truth
        assert_eq!(state.num_pending(), 1);
        assert!(state.add_true_robot(robot(2, 3), &prop).is_some());
        assert_eq!(state.num_pending(), 0);
    }
}

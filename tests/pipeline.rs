use std::sync::{Arc, Mutex};
use std::time::Duration;

use discrete_bayes::actors::{Periodic, Printer};
use discrete_bayes::example_actors::one_dim_robot::{
    DrawActor, DrawProp, Estimate, Filter, FilterProp, FilterState, Sim, SimProp, SimState,
    Stamped,
};
use discrete_bayes::prelude::*;

/// Records the sequence number of every estimate it receives.
#[derive(Clone, Debug, Default)]
struct CollectorProp {
    seqs: Arc<Mutex<Vec<u64>>>,
}

impl Value for CollectorProp {}

#[derive(Clone, Debug)]
enum CollectorMessage {
    Estimate(Stamped<Estimate>),
}

impl IsInboundMessage for CollectorMessage {
    type Prop = CollectorProp;
    type State = NullState;
    type OutboundHub = NullOutbound;

    fn inbound_channel(&self) -> String {
        "Estimate".to_owned()
    }
}

impl HasOnMessage for CollectorMessage {
    fn on_message(self, prop: &CollectorProp, _state: &mut NullState, _outbound: &NullOutbound) {
        match self {
            CollectorMessage::Estimate(estimate) => prop.seqs.lock().unwrap().push(estimate.seq),
        }
    }
}

impl IsInboundMessageNew<Stamped<Estimate>> for CollectorMessage {
    fn new(_inbound_channel: String, value: Stamped<Estimate>) -> Self {
        CollectorMessage::Estimate(value)
    }
}

struct CollectorInbound {
    estimate: InboundChannel<Stamped<Estimate>, CollectorMessage>,
}

impl IsInboundHub<CollectorProp, NullState, NullOutbound, CollectorMessage> for CollectorInbound {
    fn from_builder(
        builder: &mut ActorBuilder<CollectorProp, NullState, CollectorMessage>,
        actor_name: &str,
    ) -> Self {
        Self {
            estimate: InboundChannel::new(
                builder.context,
                actor_name,
                &builder.sender,
                "Estimate".to_owned(),
            ),
        }
    }
}

type Collector = Actor<CollectorProp, CollectorInbound, NullState, NullOutbound>;

impl
    HasFromPropState<
        CollectorProp,
        CollectorInbound,
        NullState,
        NullOutbound,
        CollectorMessage,
        DefaultRunner<CollectorProp, CollectorInbound, NullState, NullOutbound>,
    > for Collector
{
    fn name_hint(_prop: &CollectorProp) -> String {
        "Collector".to_owned()
    }
}

fn robot_pipeline(shutdown_step: u64) -> Pipeline {
    let sim_prop = SimProp {
        shutdown_step,
        ..Default::default()
    };
    let filter_prop = FilterProp::default();
    let filter_state = FilterState::new(sim_prop.sensor.world.num_bins(), &filter_prop).unwrap();

    Context::configure(&mut |context| {
        let mut timer = Periodic::new_with_period(context, 0.005);
        let mut sim = Sim::from_prop_and_state(context, sim_prop.clone(), SimState::new(0, 0));
        let mut filter =
            Filter::from_prop_and_state(context, filter_prop.clone(), filter_state.clone());
        let mut printer = Printer::<Stamped<Estimate>>::new_with_topic(context, "estimate");
        let mut draw = DrawActor::from_prop_and_state(
            context,
            DrawProp::default(),
            Default::default(),
        );

        timer
            .outbound
            .time_stamp
            .connect(context, &mut sim.inbound.time_stamp);
        sim.outbound
            .observation
            .connect(context, &mut filter.inbound.observation);
        sim.outbound
            .true_robot
            .connect(context, &mut draw.inbound.true_robot);
        filter
            .outbound
            .estimate
            .connect(context, &mut draw.inbound.estimate);
        filter
            .outbound
            .estimate
            .connect(context, &mut printer.inbound.printable);
        context.register_cancel_requester(&mut sim.outbound.cancel_request);
    })
}

#[test]
fn flow_graph_lists_actors_and_connections() {
    let pipeline = robot_pipeline(3);
    let graph = pipeline.flow_graph();
    assert!(graph.contains("time_stamp -> Sim_0.TimeStamp"));
    assert!(graph.contains("observation -> Filter_0.Observation"));
    assert!(graph.contains("true_robot -> DrawActor_0.TrueRobot"));
    assert!(graph.contains("estimate -> DrawActor_0.Estimate"));
    assert!(graph.contains("estimate -> Printer(estimate)_0.Printable"));

    let periodic = graph.find("* Periodic_0 *").unwrap();
    let sim = graph.find("* Sim_0 *").unwrap();
    let filter = graph.find("* Filter_0 *").unwrap();
    assert!(periodic < sim && sim < filter);
    assert_eq!(pipeline.actor_names().len(), 5);
}

#[tokio::test]
async fn simulation_end_stops_the_pipeline() {
    let pipeline = robot_pipeline(5);
    let pipeline = tokio::time::timeout(Duration::from_secs(10), pipeline.run())
        .await
        .expect("pipeline did not stop after the last simulation step");
    assert_eq!(
        pipeline.actor_names(),
        vec!["Periodic_0", "Sim_0", "Filter_0", "Printer(estimate)_0", "DrawActor_0"]
    );
}

#[tokio::test]
async fn cancel_request_stops_the_pipeline() {
    let pipeline = Context::configure(&mut |context| {
        let mut timer = Periodic::new_with_period(context, 0.01);
        let mut printer = Printer::<String>::new_with_topic(context, "tick");
        timer.outbound.time_stamp.connect_with_adapter(
            context,
            |t| format!("{:.2}", t),
            &mut printer.inbound.printable,
        );
    });
    assert!(pipeline
        .flow_graph()
        .contains("time_stamp -> Printer(tick)_0.Printable"));

    let cancel = pipeline.get_cancel_request_sender();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.send(CancelRequest).unwrap();
    });

    let pipeline = tokio::time::timeout(Duration::from_secs(10), pipeline.run())
        .await
        .expect("pipeline did not stop on cancel request");
    assert_eq!(pipeline.actor_names().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn every_step_reaches_the_last_actor_before_shutdown() {
    for _ in 0..3 {
        let collector_prop = CollectorProp::default();
        let seqs = collector_prop.seqs.clone();
        let filter_prop = FilterProp::default();
        let sim_prop = SimProp {
            shutdown_step: 5,
            ..Default::default()
        };
        let filter_state =
            FilterState::new(sim_prop.sensor.world.num_bins(), &filter_prop).unwrap();

        let pipeline = Context::configure(&mut |context| {
            let mut timer = Periodic::new_with_period(context, 0.005);
            let mut sim =
                Sim::from_prop_and_state(context, sim_prop.clone(), SimState::new(0, 0));
            let mut filter =
                Filter::from_prop_and_state(context, filter_prop.clone(), filter_state.clone());
            let mut collector =
                Collector::from_prop_and_state(context, collector_prop.clone(), NullState::default());

            timer
                .outbound
                .time_stamp
                .connect(context, &mut sim.inbound.time_stamp);
            sim.outbound
                .observation
                .connect(context, &mut filter.inbound.observation);
            filter
                .outbound
                .estimate
                .connect(context, &mut collector.inbound.estimate);
            context.register_cancel_requester(&mut sim.outbound.cancel_request);
        });

        tokio::time::timeout(Duration::from_secs(10), pipeline.run())
            .await
            .expect("pipeline did not stop after the last simulation step");
        assert_eq!(*seqs.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }
}

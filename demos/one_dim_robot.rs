use discrete_bayes::actors::{Periodic, Printer};
use discrete_bayes::example_actors::one_dim_robot::{
    DrawActor, DrawProp, Estimate, Filter, FilterProp, FilterState, Sim, SimProp, SimState,
    Stamped,
};
use discrete_bayes::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(value) => match value.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("cannot parse {}={}, using default", key, value);
                default
            }
        },
        Err(_) => default,
    }
}

async fn run_robot_example() {
    let num_steps: u64 = env_or("BAYES_NUM_STEPS", 100);
    let period: f64 = env_or("BAYES_PERIOD", 0.1);
    info!("simulating {} steps, one every {}s", num_steps, period);

    let sim_prop = SimProp {
        shutdown_step: num_steps,
        ..Default::default()
    };
    let draw_prop = DrawProp {
        world: sim_prop.sensor.world.clone(),
        ..Default::default()
    };
    let filter_prop = FilterProp::default();
    let filter_state = FilterState::new(sim_prop.sensor.world.num_bins(), &filter_prop)
        .expect("world has at least one bin");

    let pipeline = Context::configure(&mut |context| {
        let mut timer = Periodic::new_with_period(context, period);
        let mut sim =
            Sim::from_prop_and_state(context, sim_prop.clone(), SimState::new(0, 0));
        let mut filter =
            Filter::from_prop_and_state(context, filter_prop.clone(), filter_state.clone());
        let mut estimate_printer =
            Printer::<Stamped<Estimate>>::new_with_topic(context, "estimate");
        let mut draw_actor =
            DrawActor::from_prop_and_state(context, draw_prop.clone(), Default::default());

        timer
            .outbound
            .time_stamp
            .connect(context, &mut sim.inbound.time_stamp);

        sim.outbound
            .observation
            .connect(context, &mut filter.inbound.observation);
        sim.outbound
            .true_robot
            .connect(context, &mut draw_actor.inbound.true_robot);
        context.register_cancel_requester(&mut sim.outbound.cancel_request);

        filter
            .outbound
            .estimate
            .connect(context, &mut draw_actor.inbound.estimate);
        filter
            .outbound
            .estimate
            .connect(context, &mut estimate_printer.inbound.printable);
    });

    pipeline.print_flow_graph();

    let _pipeline = pipeline.run().await;
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async {
            run_robot_example().await;
        })
}

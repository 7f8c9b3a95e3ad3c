use discrete_bayes::bayes::MotionKernel;
use discrete_bayes::example_actors::one_dim_robot::{
    FilterProp, FilterState, RecoveryPolicy, SimProp, SimState,
};

#[test]
fn robot_is_localized_after_passing_two_doors() {
    // doors at 10, 25 and 50 on a track of 100 bins
    let sim_prop = SimProp::default();
    let filter_prop = FilterProp::default();
    let mut sim = SimState::new(0, 0);
    let mut filter = FilterState::new(sim_prop.sensor.world.num_bins(), &filter_prop).unwrap();

    for step in 1..=100_usize {
        let observation = sim.step(&sim_prop);
        let estimate = filter.observe(&observation, &filter_prop);
        let actual = sim.true_robot.bin;
        assert_eq!(actual, step % 100);
        assert!(!estimate.recovered, "step {}", step);
        assert!((estimate.belief.sum() - 1.0).abs() < 1e-9);

        if (10..25).contains(&step) {
            // the first door is explained by three starting positions
            let candidates = [step, step + 15, step + 40];
            assert!(
                candidates.contains(&estimate.bin),
                "step {}: {}",
                step,
                estimate.bin
            );
            for bin in candidates {
                assert!((estimate.belief.get(bin).unwrap() - 1.0 / 3.0).abs() < 1e-9);
            }
        } else if step >= 25 {
            assert_eq!(estimate.bin, actual, "step {}", step);
            assert_eq!(estimate.belief.get(actual), Some(1.0));
        }
    }
}

#[test]
fn slipping_robot_keeps_a_valid_belief() {
    let sim_prop = SimProp {
        slip_probability: 0.1,
        ..Default::default()
    };
    for recovery in [RecoveryPolicy::ResetUniform, RecoveryPolicy::KeepPrior] {
        let filter_prop = FilterProp {
            kernel: MotionKernel::symmetric(0.1).unwrap(),
            recovery,
        };
        let mut sim = SimState::new(0, 1234);
        let mut filter =
            FilterState::new(sim_prop.sensor.world.num_bins(), &filter_prop).unwrap();

        for _ in 0..300 {
            let observation = sim.step(&sim_prop);
            let estimate = filter.observe(&observation, &filter_prop);
            assert!((estimate.belief.sum() - 1.0).abs() < 1e-9);
            assert!(estimate.bin < 100);
        }
    }
}

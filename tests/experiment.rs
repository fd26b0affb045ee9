use rand::SeedableRng;
use rand::rngs::StdRng;
use rggpath::{BoundingBox, ExperimentDriver, GraphError, KdTree, Point, SweepConfig, TrialResult, UniformGrid};

fn corners() -> (Point, Point) {
    (Point::new(0.0, 0.0), Point::new(1.0, 1.0))
}

#[test]
fn test_disconnected_sweep_records_every_trial() {
    // Two points in a hair-thin strip: the far-left and far-right queries always resolve to
    // different nodes, and the nodes are never within eps of each other.
    let strip = BoundingBox::new([0.0, 0.0], [1.0, 1e-9]);
    let mut driver = ExperimentDriver::<KdTree>::from_seed(2024).with_bounds(strip).unwrap();

    let results = driver
        .single_sweep(Point::new(-1.0, 0.0), Point::new(2.0, 0.0), 50, 2, 1e-6)
        .unwrap();
    assert_eq!(results.len(), 50);
    assert!(results.iter().all(|r| *r == TrialResult::NoPath));
}

#[test]
fn test_connected_sweep_paths() {
    let (start, end) = corners();
    let mut driver: ExperimentDriver = ExperimentDriver::from_seed(7);
    // eps above the diagonal: every trial is a complete graph.
    let results = driver.single_sweep(start, end, 20, 30, 1.5).unwrap();
    assert_eq!(results.len(), 20);

    for r in &results {
        let TrialResult::Found { path, cost } = r else {
            panic!("complete graph must connect the corners");
        };
        assert!(!path.is_empty());
        let walked = path.windows(2).map(|w| w[0].distance(&w[1])).fold(0.0, |acc, d| acc + d);
        assert_eq!(*cost, walked);
    }
}

#[test]
fn test_sweeps_are_reproducible() {
    let (start, end) = corners();
    let mut a: ExperimentDriver = ExperimentDriver::from_seed(99);
    let mut b: ExperimentDriver = ExperimentDriver::from_seed(99);
    assert_eq!(
        a.single_sweep(start, end, 15, 80, 0.2).unwrap(),
        b.single_sweep(start, end, 15, 80, 0.2).unwrap()
    );
}

#[test]
fn test_mixed_sweep_keeps_going() {
    let (start, end) = corners();
    let mut driver: ExperimentDriver = ExperimentDriver::from_seed(31);
    // Around the connectivity threshold: expect both outcomes over 60 trials.
    let results = driver.single_sweep(start, end, 60, 100, 0.13).unwrap();
    assert_eq!(results.len(), 60);
    assert!(results.iter().any(|r| r.is_found()));
    assert!(results.iter().any(|r| !r.is_found()));
}

#[test]
fn test_invalid_parameters_abort() {
    let (start, end) = corners();
    let mut driver: ExperimentDriver = ExperimentDriver::from_seed(1);
    assert!(matches!(driver.single_sweep(start, end, 10, 0, 0.1), Err(GraphError::InvalidParameter(_))));
    assert!(matches!(driver.par_single_sweep(start, end, 10, 5, f64::NAN), Err(GraphError::InvalidParameter(_))));
    assert!(ExperimentDriver::<KdTree>::from_seed(1).with_bounds(BoundingBox::from_size(0.0, 1.0)).is_err());

    let nan = Point::new(f64::NAN, 0.0);
    assert!(matches!(driver.single_sweep(nan, end, 5, 20, 0.3), Err(GraphError::InvalidParameter(_))));
    assert!(matches!(driver.par_single_sweep(start, nan, 5, 20, 0.3), Err(GraphError::InvalidParameter(_))));
}

#[test]
fn test_multi_sweep_progress_and_filtering() {
    let (start, end) = corners();
    let power = -0.5;
    let iterations = 25;

    let mut progress = Vec::new();
    let mut driver: ExperimentDriver = ExperimentDriver::from_seed(8);
    let costs = driver
        .multi_sweep_with_progress(&[10, 20], start, end, iterations, power, |n| progress.push(n))
        .unwrap();
    assert_eq!(progress, vec![10, 20]);
    assert_eq!(costs.keys().copied().collect::<Vec<_>>(), vec![10, 20]);

    // Replaying the same generator through single sweeps must give exactly the found costs.
    let mut replay: ExperimentDriver = ExperimentDriver::from_seed(8);
    for n in [10usize, 20] {
        let eps = (n as f64).powf(power);
        let results = replay.single_sweep(start, end, iterations, n, eps).unwrap();
        let found: Vec<f64> = results.iter().filter_map(TrialResult::cost).collect();
        assert!(found.len() <= iterations);
        assert_eq!(costs[&n], found);
    }
}

#[test]
fn test_multi_sweep_with_grid_index() {
    let (start, end) = corners();
    let mut kd: ExperimentDriver<KdTree> = ExperimentDriver::from_seed(5);
    let mut grid: ExperimentDriver<UniformGrid> = ExperimentDriver::from_seed(5);
    assert_eq!(
        kd.multi_sweep(&[50, 100], start, end, 5, -0.3).unwrap(),
        grid.multi_sweep(&[50, 100], start, end, 5, -0.3).unwrap()
    );
}

#[test]
fn test_parallel_sweep_independent_of_thread_count() {
    let (start, end) = corners();
    let run = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
        pool.install(|| {
            let mut driver: ExperimentDriver = ExperimentDriver::from_seed(77);
            driver.par_single_sweep(start, end, 24, 150, 0.12).unwrap()
        })
    };
    let single = run(1);
    assert_eq!(single.len(), 24);
    assert_eq!(single, run(4));
}

#[test]
fn test_custom_rng() {
    let (start, end) = corners();
    let mut driver = ExperimentDriver::<KdTree, _>::with_rng(StdRng::seed_from_u64(3));
    let result = driver.trial(start, end, 40, 2.0).unwrap();
    assert!(result.is_found());
}

#[test]
fn test_run_config() {
    let config = SweepConfig {
        n_values: vec![40, 80],
        iterations: 6,
        seed: Some(17),
        ..SweepConfig::default()
    };
    let mut a: ExperimentDriver = ExperimentDriver::from_entropy();
    let mut b: ExperimentDriver = ExperimentDriver::from_entropy();
    let first = a.run(&config).unwrap();
    assert_eq!(first, b.run(&config).unwrap());
    assert!(first.values().all(|costs| costs.len() <= 6));

    let parallel = SweepConfig { parallel: true, ..config.clone() };
    let p1 = a.run(&parallel).unwrap();
    assert_eq!(p1, b.run(&parallel).unwrap());

    let empty = SweepConfig { n_values: Vec::new(), ..config };
    assert!(matches!(a.run(&empty), Err(GraphError::InvalidParameter(_))));
}

#[test]
fn test_serialized_shapes() {
    let found = TrialResult::Found { path: vec![Point::new(0.0, 0.5)], cost: 0.25 };
    let json = serde_json::to_value(&found).unwrap();
    assert_eq!(json, serde_json::json!({"status": "found", "path": [{"x": 0.0, "y": 0.5}], "cost": 0.25}));
    assert_eq!(serde_json::to_value(TrialResult::NoPath).unwrap(), serde_json::json!({"status": "no_path"}));

    let config: SweepConfig = serde_json::from_str(r#"{"iterations": 3, "n_values": [10]}"#).unwrap();
    assert_eq!(config.iterations, 3);
    assert_eq!(config.n_values, vec![10]);
    assert_eq!(config.start, SweepConfig::default().start);
    assert_eq!(config.power, -0.4);
}

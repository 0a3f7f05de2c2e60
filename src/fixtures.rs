//! Small deterministic instances shared by unit tests.

use crate::model::{CandidatePosition, Device, GatewayProfile, Position};
use crate::problem::{Problem, ProblemConfig};

/// Three devices and two sites 20 km apart: devices 0 and 1 only reach
/// site 0, device 2 only reaches site 1.
pub(crate) fn two_cluster_problem(config: ProblemConfig) -> Problem {
    let devices = vec![
        Device::new(0, Position::new(100.0, 0.0, 0.0), 0),
        Device::new(1, Position::new(0.0, 200.0, 0.0), 0),
        Device::new(2, Position::new(20_150.0, 0.0, 0.0), 0),
    ];
    let sites = vec![
        CandidatePosition::new(0, Position::new(0.0, 0.0, 0.0)),
        CandidatePosition::new(1, Position::new(20_000.0, 0.0, 0.0)),
    ];
    Problem::new(config, devices, sites, GatewayProfile::reference(1))
        .expect("two-cluster problem is feasible")
}

/// Two devices on one slice next to two sites, where a single SF7 device
/// uses 60% of the slice capacity.
pub(crate) fn overload_problem() -> Problem {
    let sf7_rate = GatewayProfile::reference(1).datarate(7, 0);
    let gateway = GatewayProfile::reference(0).with_slice(125_000.0, sf7_rate / 0.6);
    let devices = vec![
        Device::new(0, Position::new(10.0, 0.0, 0.0), 0),
        Device::new(1, Position::new(0.0, 10.0, 0.0), 0),
    ];
    let sites = vec![
        CandidatePosition::new(0, Position::new(0.0, 0.0, 0.0)),
        CandidatePosition::new(1, Position::new(50.0, 0.0, 0.0)),
    ];
    Problem::new(ProblemConfig::default(), devices, sites, gateway)
        .expect("overload problem is feasible")
}

/// `num_devices` devices spread over a 3 km square and `num_sites` sites on
/// a grid over the same square. Every site reaches every device.
pub(crate) fn grid_problem(num_devices: usize, num_sites: usize, num_slices: usize) -> Problem {
    grid_problem_with(ProblemConfig::default(), num_devices, num_sites, num_slices)
}

pub(crate) fn grid_problem_with(
    config: ProblemConfig,
    num_devices: usize,
    num_sites: usize,
    num_slices: usize,
) -> Problem {
    const SIDE: f64 = 3_000.0;
    let devices = (0..num_devices)
        .map(|i| {
            // Low-discrepancy scatter, deterministic without an RNG.
            let x = (i as f64 * 0.618_033_988_75).fract() * SIDE;
            let y = (i as f64 * 0.754_877_666_25).fract() * SIDE;
            Device::new(i, Position::new(x, y, 0.0), i % num_slices.max(1))
        })
        .collect();
    let per_row = (num_sites as f64).sqrt().ceil().max(1.0) as usize;
    let step = SIDE / per_row as f64;
    let sites = (0..num_sites)
        .map(|i| {
            let x = (i % per_row) as f64 * step + step / 2.0;
            let y = (i / per_row) as f64 * step + step / 2.0;
            CandidatePosition::new(i, Position::new(x, y, 30.0))
        })
        .collect();
    Problem::new(config, devices, sites, GatewayProfile::reference(num_slices))
        .expect("grid problem is feasible")
}

/// Checks assignment totality and aggregate consistency.
pub(crate) fn assert_consistent(solution: &crate::solution::Solution<'_>) {
    let problem = solution.problem();
    assert!(solution.is_complete(), "every device must be assigned");

    let mut expected = vec![0.0; problem.num_sites() * problem.num_slices()];
    let mut sf_counts = [0usize; crate::model::NUM_SF];
    for (device, a) in solution.assignments() {
        assert!(
            problem.is_feasible(device, a.site, a.config),
            "device {device} holds infeasible pair {a:?}"
        );
        assert!(solution.devices_at(a.site).contains(&device));
        let slice = problem.slice_of(device);
        expected[a.site * problem.num_slices() + slice] += problem.datarate(a.config, slice);
        sf_counts[problem.configuration(a.config).sf_index()] += 1;
    }
    for site in 0..problem.num_sites() {
        for slice in 0..problem.num_slices() {
            let want = expected[site * problem.num_slices() + slice];
            let got = solution.load(site, slice);
            assert!(
                (want - got).abs() < 1e-6,
                "load mismatch at ({site}, {slice}): {got} vs {want}"
            );
        }
        assert_eq!(
            solution.deployed_sites().contains(&site),
            !solution.devices_at(site).is_empty(),
            "deployed set out of sync at site {site}"
        );
        for &device in solution.devices_at(site) {
            assert_eq!(solution.assignment(device).map(|a| a.site), Some(site));
        }
    }
    assert_eq!(solution.sf_counts(), &sf_counts);
}

//! The solution state and its single mutation point.

use std::collections::BTreeSet;

use crate::error::{PlacementError, Result};
use crate::model::{ConfigId, DeviceId, SiteId, SliceId, NUM_SF};
use crate::problem::Problem;

use super::types::{Assignment, Move};

/// A (possibly partial) assignment of devices to (site, configuration)
/// pairs, with incrementally maintained aggregates.
#[derive(Debug, Clone)]
pub struct Solution<'p> {
    pub(super) problem: &'p Problem,
    pub(super) assignment: Vec<Option<Assignment>>,
    /// Indexed by `site * num_slices + slice`.
    pub(super) load: Vec<f64>,
    pub(super) devices_at: Vec<BTreeSet<DeviceId>>,
    pub(super) deployed: BTreeSet<SiteId>,
    pub(super) sf_counts: [usize; NUM_SF],
    pub(super) generating_move: Option<Move>,
}

impl<'p> Solution<'p> {
    /// A solution with no device assigned.
    pub fn empty(problem: &'p Problem) -> Self {
        Self {
            problem,
            assignment: vec![None; problem.num_devices()],
            load: vec![0.0; problem.num_sites() * problem.num_slices()],
            devices_at: vec![BTreeSet::new(); problem.num_sites()],
            deployed: BTreeSet::new(),
            sf_counts: [0; NUM_SF],
            generating_move: None,
        }
    }

    pub fn problem(&self) -> &'p Problem {
        self.problem
    }

    pub fn assignment(&self, device: DeviceId) -> Option<Assignment> {
        self.assignment[device]
    }

    /// `(device, assignment)` pairs of every assigned device, by device id.
    pub fn assignments(&self) -> impl Iterator<Item = (DeviceId, Assignment)> + '_ {
        self.assignment
            .iter()
            .enumerate()
            .filter_map(|(device, a)| a.map(|a| (device, a)))
    }

    pub fn is_complete(&self) -> bool {
        self.assignment.iter().all(Option::is_some)
    }

    /// Aggregate load on `slice` at `site`.
    pub fn load(&self, site: SiteId, slice: SliceId) -> f64 {
        self.load[site * self.problem.num_slices() + slice]
    }

    pub fn devices_at(&self, site: SiteId) -> &BTreeSet<DeviceId> {
        &self.devices_at[site]
    }

    pub fn deployed_sites(&self) -> &BTreeSet<SiteId> {
        &self.deployed
    }

    pub fn num_deployed(&self) -> usize {
        self.deployed.len()
    }

    pub fn is_deployed(&self, site: SiteId) -> bool {
        !self.devices_at[site].is_empty()
    }

    /// Device count per spreading factor, index 0 is SF7.
    pub fn sf_counts(&self) -> &[usize; NUM_SF] {
        &self.sf_counts
    }

    /// The move that produced this solution from its parent, if any.
    pub fn generating_move(&self) -> Option<&Move> {
        self.generating_move.as_ref()
    }

    pub(crate) fn set_generating_move(&mut self, mv: Move) {
        self.generating_move = Some(mv);
    }

    /// `alpha * |deployed sites|`.
    pub fn cost_sites(&self) -> f64 {
        self.problem.config().alpha * self.deployed.len() as f64
    }

    /// `beta * max over SF of the number of devices using it`.
    pub fn cost_collisions(&self) -> f64 {
        let worst = self.sf_counts.iter().copied().max().unwrap_or(0);
        self.problem.config().beta * worst as f64
    }

    /// Total cost. Recomputed from the aggregates on every call.
    pub fn cost(&self) -> f64 {
        self.cost_sites() + self.cost_collisions()
    }

    /// Moves `device` to `(site, config)` and updates every aggregate.
    ///
    /// This is the only place that mutates the assignment. It does not
    /// check feasibility or capacity.
    pub(crate) fn update_association(&mut self, device: DeviceId, next: Assignment) {
        let problem = self.problem;
        let slice = problem.slice_of(device);
        let num_slices = problem.num_slices();

        if let Some(previous) = self.assignment[device] {
            self.load[previous.site * num_slices + slice] -=
                problem.datarate(previous.config, slice);
            self.devices_at[previous.site].remove(&device);
            if self.devices_at[previous.site].is_empty() {
                self.deployed.remove(&previous.site);
                // Drop accumulated rounding once the site is empty.
                for s in 0..num_slices {
                    self.load[previous.site * num_slices + s] = 0.0;
                }
            }
            self.sf_counts[problem.configuration(previous.config).sf_index()] -= 1;
        }

        self.load[next.site * num_slices + slice] += problem.datarate(next.config, slice);
        self.devices_at[next.site].insert(device);
        self.deployed.insert(next.site);
        self.sf_counts[problem.configuration(next.config).sf_index()] += 1;
        self.assignment[device] = Some(next);
    }

    /// Assigns `device` to `(site, config)` after checking the pair against
    /// the feasibility tables. Capacity is not repaired.
    ///
    /// # Errors
    ///
    /// [`PlacementError::InfeasibleAssignment`] if the pair is not feasible.
    pub fn assign(&mut self, device: DeviceId, site: SiteId, config: ConfigId) -> Result<()> {
        if device >= self.problem.num_devices()
            || site >= self.problem.num_sites()
            || !self.problem.is_feasible(device, site, config)
        {
            return Err(PlacementError::InfeasibleAssignment {
                device,
                site,
                config,
            });
        }
        self.update_association(device, Assignment::new(site, config));
        Ok(())
    }

    pub fn is_overloaded(&self, site: SiteId, slice: SliceId) -> bool {
        self.load(site, slice) > self.problem.max_datarate(slice)
    }

    /// Every overloaded `(site, slice)` pair, in site order.
    pub fn overloaded(&self) -> Vec<(SiteId, SliceId)> {
        let num_slices = self.problem.num_slices();
        self.deployed
            .iter()
            .flat_map(|&site| (0..num_slices).map(move |slice| (site, slice)))
            .filter(|&(site, slice)| self.is_overloaded(site, slice))
            .collect()
    }

    /// Complete, every pair feasible, and no (site, slice) over capacity.
    pub fn is_feasible(&self) -> bool {
        self.is_complete()
            && self
                .assignments()
                .all(|(d, a)| self.problem.is_feasible(d, a.site, a.config))
            && self.overloaded().is_empty()
    }

    /// Fraction of the deployed sites that are in `tabu`. Zero when
    /// nothing is deployed.
    pub fn tabu_ratio(&self, tabu: &BTreeSet<SiteId>) -> f64 {
        if self.deployed.is_empty() {
            return 0.0;
        }
        let hit = self.deployed.intersection(tabu).count();
        hit as f64 / self.deployed.len() as f64
    }

    /// One bit per candidate site: is the site deployed.
    pub fn deployed_gene(&self) -> Vec<bool> {
        (0..self.problem.num_sites())
            .map(|site| self.is_deployed(site))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::model::config_id;
    use crate::problem::ProblemConfig;

    #[test]
    fn test_update_moves_load_and_membership() {
        let problem = fixtures::grid_problem(4, 4, 1);
        let mut solution = Solution::empty(&problem);
        let c7 = config_id(7, 14);
        let c9 = config_id(9, 14);

        solution.assign(0, 0, c7).unwrap();
        assert!(solution.is_deployed(0));
        assert!((solution.load(0, 0) - problem.datarate(c7, 0)).abs() < 1e-9);

        solution.assign(0, 1, c9).unwrap();
        assert!(!solution.is_deployed(0), "site 0 should be withdrawn");
        assert_eq!(solution.load(0, 0), 0.0);
        assert!((solution.load(1, 0) - problem.datarate(c9, 0)).abs() < 1e-9);
        assert_eq!(solution.sf_counts()[0], 0);
        assert_eq!(solution.sf_counts()[2], 1);
        assert_eq!(
            solution.deployed_sites().iter().copied().collect::<Vec<_>>(),
            vec![1]
        );
    }

    #[test]
    fn test_cost_is_alpha_sites_plus_beta_worst_sf() {
        let problem = fixtures::grid_problem_with(
            ProblemConfig::default().with_alpha(10.0).with_beta(1.0),
            4,
            4,
            1,
        );
        let mut solution = Solution::empty(&problem);
        solution.assign(0, 0, config_id(8, 14)).unwrap();
        solution.assign(1, 0, config_id(8, 12)).unwrap();
        solution.assign(2, 1, config_id(9, 14)).unwrap();
        solution.assign(3, 1, config_id(8, 14)).unwrap();

        assert!((solution.cost_sites() - 20.0).abs() < 1e-12);
        assert!((solution.cost_collisions() - 3.0).abs() < 1e-12);
        assert!((solution.cost() - 23.0).abs() < 1e-12);
    }

    #[test]
    fn test_two_cluster_solution_costs_two() {
        let problem =
            fixtures::two_cluster_problem(ProblemConfig::default().with_alpha(1.0).with_beta(0.0));
        let mut solution = Solution::empty(&problem);
        solution.assign(0, 0, config_id(10, 14)).unwrap();
        solution.assign(1, 0, config_id(10, 14)).unwrap();
        solution.assign(2, 1, config_id(10, 14)).unwrap();

        assert!(solution.overloaded().is_empty(), "no repair should be needed");
        assert!(solution.is_feasible());
        assert_eq!(solution.cost(), 2.0);
    }

    #[test]
    fn test_assign_rejects_infeasible_pair() {
        let problem = fixtures::two_cluster_problem(ProblemConfig::default());
        let mut solution = Solution::empty(&problem);
        let err = solution.assign(2, 0, config_id(10, 14)).unwrap_err();
        assert_eq!(
            err,
            PlacementError::InfeasibleAssignment {
                device: 2,
                site: 0,
                config: config_id(10, 14)
            }
        );
        // SF12 never passes QoS.
        assert!(solution.assign(0, 0, config_id(12, 14)).is_err());
        assert!(solution.assignment(0).is_none());
    }

    #[test]
    fn test_tabu_ratio_over_deployed_sites() {
        let problem = fixtures::grid_problem(4, 4, 1);
        let mut solution = Solution::empty(&problem);
        let c = config_id(10, 14);
        solution.assign(0, 0, c).unwrap();
        solution.assign(1, 1, c).unwrap();
        solution.assign(2, 2, c).unwrap();
        solution.assign(3, 3, c).unwrap();

        let tabu: BTreeSet<SiteId> = [1, 3].into_iter().collect();
        assert!((solution.tabu_ratio(&tabu) - 0.5).abs() < 1e-12);
        assert_eq!(Solution::empty(&problem).tabu_ratio(&tabu), 0.0);
    }

    #[test]
    fn test_deployed_gene() {
        let problem = fixtures::grid_problem(2, 4, 1);
        let mut solution = Solution::empty(&problem);
        solution.assign(0, 2, config_id(10, 14)).unwrap();
        solution.assign(1, 3, config_id(10, 14)).unwrap();
        assert_eq!(solution.deployed_gene(), vec![false, false, true, true]);
    }

    #[test]
    fn test_clone_is_independent() {
        let problem = fixtures::grid_problem(2, 4, 1);
        let mut original = Solution::empty(&problem);
        original.assign(0, 0, config_id(10, 14)).unwrap();
        let mut copy = original.clone();
        copy.assign(0, 1, config_id(10, 14)).unwrap();

        assert_eq!(original.assignment(0).map(|a| a.site), Some(0));
        assert!(original.is_deployed(0));
        assert!(!copy.is_deployed(0));
    }
}

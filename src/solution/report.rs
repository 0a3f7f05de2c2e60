//! Plain-text result reports.

use std::fmt;
use std::fmt::Write as _;

use super::state::Solution;

impl Solution<'_> {
    /// One `id,x,y,z` line per deployed site, in id order, after a header.
    pub fn deployed_sites_report(&self) -> String {
        let mut out = String::from("id,x,y,z\n");
        for &site in &self.deployed {
            let p = self.problem.site(site).position;
            let _ = writeln!(out, "{site},{:.6},{:.6},{:.6}", p.x, p.y, p.z);
        }
        out
    }

    /// One `device,sf,tp` line per assigned device, in id order, after a
    /// header.
    pub fn configurations_report(&self) -> String {
        let mut out = String::from("device,sf,tp\n");
        for (device, a) in self.assignments() {
            let c = self.problem.configuration(a.config);
            let _ = writeln!(out, "{device},{},{}", c.sf, c.tp);
        }
        out
    }
}

impl fmt::Display for Solution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cost {:.2} ({} sites, worst SF count {}, {}/{} devices assigned)",
            self.cost(),
            self.deployed.len(),
            self.sf_counts.iter().max().copied().unwrap_or(0),
            self.assignments().count(),
            self.assignment.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures;
    use crate::model::config_id;
    use crate::problem::ProblemConfig;
    use crate::solution::Solution;

    fn forced(problem: &crate::problem::Problem) -> Solution<'_> {
        let mut solution = Solution::empty(problem);
        solution.assign(0, 0, config_id(10, 14)).unwrap();
        solution.assign(1, 0, config_id(9, 12)).unwrap();
        solution.assign(2, 1, config_id(7, 2)).unwrap();
        solution
    }

    #[test]
    fn test_deployed_sites_report() {
        let problem = fixtures::two_cluster_problem(ProblemConfig::default());
        let report = forced(&problem).deployed_sites_report();
        assert_eq!(
            report,
            "id,x,y,z\n0,0.000000,0.000000,0.000000\n1,20000.000000,0.000000,0.000000\n"
        );
    }

    #[test]
    fn test_configurations_report() {
        let problem = fixtures::two_cluster_problem(ProblemConfig::default());
        let report = forced(&problem).configurations_report();
        assert_eq!(report, "device,sf,tp\n0,10,14\n1,9,12\n2,7,2\n");
    }

    #[test]
    fn test_display_summary() {
        let problem =
            fixtures::two_cluster_problem(ProblemConfig::default().with_alpha(1.0).with_beta(0.0));
        let text = forced(&problem).to_string();
        assert!(text.starts_with("cost 2.00"), "unexpected summary: {text}");
        assert!(text.contains("3/3 devices"));
    }
}

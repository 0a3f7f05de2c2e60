//! Deployed-site crossover.
//!
//! Parents are reduced to one bit per candidate site ("deployed here").
//! Genes recombine with a single pivot and per-bit mutation, and each
//! child gene is decoded back into a full solution with
//! [`Solution::from_deployed_sites`].

use rand::Rng;
use tracing::trace;

use crate::model::SiteId;
use crate::solution::Solution;

/// A decoded child.
#[derive(Debug, Clone)]
pub struct Offspring<'p> {
    pub solution: Solution<'p>,
    /// The child could not be decoded into a feasible solution and is a
    /// copy of its parent instead.
    pub fallback: bool,
}

/// Single-pivot crossover with per-gene mutation.
///
/// With probability `crossover_rate` a pivot is drawn from `[0, n - 1)` and
/// the children swap every gene at or after it; otherwise each child keeps
/// its own parent's gene. Every gene of each child then flips with
/// probability `mutation_rate`.
///
/// # Examples
///
/// ```
/// use u_placement::ga::recombine_genes;
/// use u_placement::random::create_rng;
///
/// let a = vec![true, true, false, false];
/// let b = vec![false, true, true, false];
/// let (c1, c2) = recombine_genes(&a, &b, 0.0, 0.0, &mut create_rng(1));
/// assert_eq!((c1, c2), (a, b));
/// ```
pub fn recombine_genes<R: Rng + ?Sized>(
    a: &[bool],
    b: &[bool],
    crossover_rate: f64,
    mutation_rate: f64,
    rng: &mut R,
) -> (Vec<bool>, Vec<bool>) {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len().min(b.len());
    let mut c1 = a[..n].to_vec();
    let mut c2 = b[..n].to_vec();

    let cross = rng.random_bool(crossover_rate.clamp(0.0, 1.0));
    let pivot = if cross && n >= 2 {
        rng.random_range(0..n - 1)
    } else {
        n
    };

    let mutation_rate = mutation_rate.clamp(0.0, 1.0);
    for i in 0..n {
        if i >= pivot {
            std::mem::swap(&mut c1[i], &mut c2[i]);
        }
        if rng.random_bool(mutation_rate) {
            c1[i] = !c1[i];
        }
        if rng.random_bool(mutation_rate) {
            c2[i] = !c2[i];
        }
    }
    (c1, c2)
}

/// Sites whose bit is set.
pub fn gene_sites(gene: &[bool]) -> Vec<SiteId> {
    gene.iter()
        .enumerate()
        .filter(|&(_, &deployed)| deployed)
        .map(|(site, _)| site)
        .collect()
}

/// Decodes `gene` with spreading factor `sf`, falling back to a copy of
/// `parent` when decoding fails or yields an infeasible solution.
pub fn decode_child<'p, R: Rng + ?Sized>(
    parent: &Solution<'p>,
    gene: &[bool],
    sf: u8,
    rng: &mut R,
) -> Offspring<'p> {
    match Solution::from_deployed_sites(parent.problem(), &gene_sites(gene), sf, rng) {
        Ok(solution) if solution.is_feasible() => Offspring {
            solution,
            fallback: false,
        },
        Ok(_) => {
            trace!("decoded child infeasible, keeping parent");
            Offspring {
                solution: parent.clone(),
                fallback: true,
            }
        }
        Err(e) => {
            trace!(error = %e, "child decoding failed, keeping parent");
            Offspring {
                solution: parent.clone(),
                fallback: true,
            }
        }
    }
}

/// Two children of `p1` and `p2`: child `i` decodes the `i`-th
/// recombined gene and falls back to parent `i`.
pub fn crossover<'p, R: Rng + ?Sized>(
    p1: &Solution<'p>,
    p2: &Solution<'p>,
    crossover_rate: f64,
    mutation_rate: f64,
    sf: u8,
    rng: &mut R,
) -> [Offspring<'p>; 2] {
    let (g1, g2) = recombine_genes(
        &p1.deployed_gene(),
        &p2.deployed_gene(),
        crossover_rate,
        mutation_rate,
        rng,
    );
    [
        decode_child(p1, &g1, sf, rng),
        decode_child(p2, &g2, sf, rng),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::random::create_rng;
    use proptest::prelude::*;

    #[test]
    fn test_no_crossover_no_mutation_keeps_parents() {
        let a = vec![true, false, true, true, false];
        let b = vec![false, false, true, false, true];
        let mut rng = create_rng(42);
        for _ in 0..20 {
            let (c1, c2) = recombine_genes(&a, &b, 0.0, 0.0, &mut rng);
            assert_eq!(c1, a);
            assert_eq!(c2, b);
        }
    }

    #[test]
    fn test_full_crossover_swaps_tail() {
        let a = vec![true; 8];
        let b = vec![false; 8];
        let mut rng = create_rng(7);
        for _ in 0..50 {
            let (c1, c2) = recombine_genes(&a, &b, 1.0, 0.0, &mut rng);
            let pivot = c1.iter().position(|&g| !g).unwrap_or(8);
            assert!(pivot < 7, "pivot must fall in [0, n-1), got {pivot}");
            assert!(c1[..pivot].iter().all(|&g| g), "{c1:?}");
            assert!(c1[pivot..].iter().all(|&g| !g), "{c1:?}");
            for i in 0..8 {
                assert_eq!(c2[i], !c1[i], "children must be complementary at {i}");
            }
        }
    }

    #[test]
    fn test_full_mutation_flips_every_gene() {
        let a = vec![true, false, true];
        let b = vec![false, false, true];
        let (c1, c2) = recombine_genes(&a, &b, 0.0, 1.0, &mut create_rng(3));
        assert_eq!(c1, vec![false, true, false]);
        assert_eq!(c2, vec![true, true, false]);
    }

    #[test]
    fn test_single_site_gene_never_crosses() {
        let (c1, c2) = recombine_genes(&[true], &[false], 1.0, 0.0, &mut create_rng(3));
        assert_eq!((c1, c2), (vec![true], vec![false]));
    }

    #[test]
    fn test_gene_sites() {
        assert_eq!(gene_sites(&[false, true, true, false, true]), vec![1, 2, 4]);
        assert!(gene_sites(&[false, false]).is_empty());
    }

    #[test]
    fn test_crossover_children_are_feasible() {
        let problem = fixtures::grid_problem(30, 9, 2);
        let mut rng = create_rng(11);
        let p1 = Solution::random(&problem, &mut rng).unwrap();
        let p2 = Solution::random(&problem, &mut rng).unwrap();
        for _ in 0..10 {
            for child in crossover(&p1, &p2, 0.9, 0.05, 10, &mut rng) {
                assert!(child.solution.is_feasible());
                fixtures::assert_consistent(&child.solution);
            }
        }
    }

    #[test]
    fn test_decode_keeps_gene_sites_when_sufficient() {
        let problem = fixtures::grid_problem(10, 4, 1);
        let mut rng = create_rng(2);
        let parent = Solution::random(&problem, &mut rng).unwrap();
        // Every site reaches every device and one site holds them all at SF 10.
        let child = decode_child(&parent, &[false, false, true, false], 10, &mut rng);
        assert!(!child.fallback);
        assert_eq!(
            child.solution.deployed_sites().iter().copied().collect::<Vec<_>>(),
            vec![2]
        );
    }

    #[test]
    fn test_decode_falls_back_to_parent() {
        let problem = fixtures::overload_problem();
        let mut rng = create_rng(4);
        let parent = Solution::random(&problem, &mut rng).unwrap();
        // SF 12 fails the QoS bound, so no site supports it: each device
        // has to open a fresh site and the second one finds none left.
        let child = decode_child(&parent, &[true, false], 12, &mut rng);
        assert!(child.fallback, "decoding should have failed");
        assert_eq!(
            child.solution.assignments().collect::<Vec<_>>(),
            parent.assignments().collect::<Vec<_>>()
        );
    }

    proptest! {
        #[test]
        fn prop_children_combine_parent_bits(
            a in proptest::collection::vec(any::<bool>(), 2..20),
            seed in 0u64..1000,
        ) {
            let b: Vec<bool> = a.iter().map(|g| !g).collect();
            let (c1, c2) = recombine_genes(&a, &b, 1.0, 0.0, &mut create_rng(seed));
            for i in 0..a.len() {
                let pair = (c1[i], c2[i]);
                prop_assert!(pair == (a[i], b[i]) || pair == (b[i], a[i]));
            }
        }
    }
}

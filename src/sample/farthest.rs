//! Greedy farthest-point (max-min) sampling.
//!
//! # The Algorithm
//!
//! Given a pool of M points and a target K < M:
//!
//! 1. Pick one initial point (from an explicit seed, or an explicit index).
//! 2. Repeat until K points are selected:
//!    - for every remaining candidate, take its minimum distance to the
//!      points selected so far
//!    - select the candidate whose minimum distance is largest
//!
//! Ties go to the candidate with the lowest pool index.
//!
//! Each candidate keeps its running minimum, and each step only measures the
//! candidates against the point selected in the previous step. The minimum
//! over the whole selection is therefore maintained with one distance call
//! per candidate per step: O(K·M) distance evaluations overall.
//!
//! The result is the classic greedy 2-approximation to the k-center problem
//! (Gonzalez, 1985): locally optimal at each step, not globally optimal.
//!
//! The remaining set is an index array with swap-and-pop removal, so its order
//! drifts from pool order; ties are compared on the original index, never on
//! array position.

use rand::prelude::*;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geodesic::{distance_unchecked, Point};

/// Outcome of a sampling run.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleOutcome {
    /// Selected points, in selection order.
    pub selected: Vec<Point>,
    /// Position of each selected point in the input slice.
    pub indices: Vec<usize>,
    /// For every selection after the first, its minimum distance (meters) to
    /// the points selected before it. Empty when no selection ran.
    pub separations: Vec<f64>,
    /// Number of input points dropped for being out of range.
    pub rejected: usize,
    /// Number of distance evaluations performed.
    pub evaluations: usize,
}

impl SampleOutcome {
    fn empty(rejected: usize) -> Self {
        Self {
            selected: Vec::new(),
            indices: Vec::new(),
            separations: Vec::new(),
            rejected,
            evaluations: 0,
        }
    }

    /// Number of selected points.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Greedy farthest-point sampler.
#[derive(Debug, Clone)]
pub struct FarthestPointSampler {
    /// Number of points to keep.
    target: usize,
    /// Seed for the initial pick.
    seed: u64,
    /// Explicit initial pick (input index); overrides `seed`.
    initial_index: Option<usize>,
}

impl FarthestPointSampler {
    /// Create a sampler keeping `target` points, seeded with 0.
    pub fn new(target: usize) -> Self {
        Self {
            target,
            seed: 0,
            initial_index: None,
        }
    }

    /// Set the number of points to keep.
    pub fn with_target(mut self, target: usize) -> Self {
        self.target = target;
        self
    }

    /// Set the seed used to choose the initial point.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Start from a fixed point (index into the input slice) instead of a
    /// seeded random pick.
    pub fn with_initial_index(mut self, index: usize) -> Self {
        self.initial_index = Some(index);
        self
    }

    /// Configured target.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Select up to `target` spatially spread points from `pool`.
    ///
    /// The pool must already be free of duplicates. Points outside the valid
    /// coordinate range are dropped and counted in
    /// [`SampleOutcome::rejected`]. If the target covers every valid point,
    /// they are returned in input order without any distance evaluation, and
    /// the initial index is not consulted.
    pub fn sample(&self, pool: &[Point]) -> Result<SampleOutcome> {
        if self.target == 0 {
            return Err(Error::DegenerateConfiguration {
                name: "target",
                message: "must be at least 1",
            });
        }
        // Positions (in `pool`) of the points that pass the range check.
        let mut valid: Vec<usize> = Vec::with_capacity(pool.len());
        for (i, p) in pool.iter().enumerate() {
            if p.is_valid() {
                valid.push(i);
            } else {
                warn!(
                    index = i,
                    latitude = p.latitude,
                    longitude = p.longitude,
                    "dropping out-of-range point from sampling pool"
                );
            }
        }
        let rejected = pool.len() - valid.len();
        let m = valid.len();

        if m == 0 {
            debug!("empty sampling pool");
            return Ok(SampleOutcome::empty(rejected));
        }

        if self.target >= m {
            debug!(pool = m, target = self.target, "pool within target, returning unchanged");
            return Ok(SampleOutcome {
                selected: valid.iter().map(|&i| pool[i]).collect(),
                indices: valid,
                separations: Vec::new(),
                rejected,
                evaluations: 0,
            });
        }

        if let Some(i) = self.initial_index {
            if i >= pool.len() || !pool[i].is_valid() {
                return Err(Error::InvalidParameter {
                    name: "initial_index",
                    message: format!("{i} does not refer to a valid point in a pool of {}", pool.len()),
                });
            }
        }

        let first = match self.initial_index {
            // Checked above: present in `valid`.
            Some(i) => valid.binary_search(&i).unwrap_or_default(),
            None => StdRng::seed_from_u64(self.seed).random_range(0..m),
        };

        // Working sets are positions into `valid`. Since `valid` is ascending,
        // comparing positions is comparing original indices.
        let mut remaining: Vec<usize> = (0..m).filter(|&p| p != first).collect();
        let mut min_dist = vec![f64::INFINITY; m];
        let mut chosen: Vec<usize> = Vec::with_capacity(self.target);
        let mut separations = Vec::with_capacity(self.target - 1);
        let mut evaluations = 0usize;

        chosen.push(first);
        let mut last = pool[valid[first]];

        while chosen.len() < self.target && !remaining.is_empty() {
            let mut best_slot = 0;
            let mut best_dist = f64::NEG_INFINITY;

            for (slot, &cand) in remaining.iter().enumerate() {
                let d = distance_unchecked(&pool[valid[cand]], &last);
                evaluations += 1;
                if d < min_dist[cand] {
                    min_dist[cand] = d;
                }

                let md = min_dist[cand];
                if md > best_dist || (md == best_dist && cand < remaining[best_slot]) {
                    best_dist = md;
                    best_slot = slot;
                }
            }

            let pick = remaining.swap_remove(best_slot);
            chosen.push(pick);
            separations.push(best_dist);
            last = pool[valid[pick]];

            if chosen.len() % 10 == 0 {
                debug!(selected = chosen.len(), separation_m = best_dist, "sampling progress");
            }
        }

        let indices: Vec<usize> = chosen.iter().map(|&p| valid[p]).collect();
        debug!(
            selected = indices.len(),
            evaluations,
            "farthest-point sampling complete"
        );

        Ok(SampleOutcome {
            selected: indices.iter().map(|&i| pool[i]).collect(),
            indices,
            separations,
            rejected,
            evaluations,
        })
    }
}

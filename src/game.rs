//! Game layer: lifts a target and a throw distribution to probability
//! distributions over hit outcomes and successor states.
//!
//! The expensive step is the per-bed region integral, so the hit
//! distribution for each aim point is computed once and cached under the
//! aim's exact bit pattern. State transitions and expected-score queries
//! reuse the cached entry.
//!
//! Two rule variants share everything but the transition function:
//! [`FinishRule::Any`] (any hit reaching zero wins) and
//! [`FinishRule::Double`] (the winning throw must be a double landing
//! exactly on zero; an exact finish on anything else is a bust).

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use rand::rngs::SmallRng;

use crate::distribution::NormalDistribution;
use crate::geometry::{Bounds, Vec2};
use crate::target::{HitData, HitType, Target};

/// Countdown score remaining; 0 means the game is won.
pub type State = u32;

/// Hit outcomes with probabilities, ordered by `HitData`.
pub type HitDistribution = Vec<(HitData, f64)>;

/// Successor states with probabilities, ordered by state.
pub type StateDistribution = Vec<(State, f64)>;

/// Fraction of each side's extent added around the target bounding box.
const BOUNDS_PADDING: f64 = 0.1;

/// Which throws are allowed to win.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinishRule {
    /// Any hit landing exactly on zero wins; overshooting is a bust.
    Any,
    /// The winning hit must be a double; exact finish on a non-double and
    /// any overshoot are busts. A state of 1 can never be finished.
    Double,
}

impl FinishRule {
    /// Successor of `state` under `hit`. Busts leave the state unchanged.
    pub fn apply(self, state: State, hit: HitData) -> State {
        let next = state as i64 + hit.diff as i64;
        match self {
            FinishRule::Any => {
                if next < 0 {
                    state
                } else {
                    next as State
                }
            }
            FinishRule::Double => {
                if next == 0 {
                    if hit.hit_type == HitType::Double {
                        0
                    } else {
                        state
                    }
                } else if next < 0 {
                    state
                } else {
                    next as State
                }
            }
        }
    }
}

/// A target plus a throw distribution plus a finish rule.
///
/// Borrows both collaborators for its lifetime; the hit cache is owned and
/// guarded by a single lock, per the shared-resource policy.
pub struct Game<'a> {
    target: &'a Target,
    distribution: &'a NormalDistribution,
    rule: FinishRule,
    bounds: Bounds,
    hit_cache: Mutex<HashMap<(u64, u64), HitDistribution>>,
}

impl<'a> Game<'a> {
    pub fn new(
        target: &'a Target,
        distribution: &'a NormalDistribution,
        rule: FinishRule,
    ) -> Self {
        // Target construction guarantees at least one bed with vertices.
        let bounds = Bounds::covering(
            target
                .beds()
                .iter()
                .flat_map(|bed| bed.shape().vertices().iter().copied()),
        )
        .expect("target has at least one bed")
        .padded(BOUNDS_PADDING);

        Self {
            target,
            distribution,
            rule,
            bounds,
            hit_cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn target(&self) -> &Target {
        self.target
    }

    pub fn rule(&self) -> FinishRule {
        self.rule
    }

    /// Target bounding box expanded by 10% per side. Fixed at construction.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Probability distribution over typed hit outcomes when aiming at
    /// `aim`, ordered by `HitData`. Cached per exact aim point.
    pub fn hit_distribution(&self, aim: Vec2) -> HitDistribution {
        let key = aim.key();
        {
            let cache = self.hit_cache.lock().expect("hit cache lock poisoned");
            if let Some(hits) = cache.get(&key) {
                return hits.clone();
            }
        }

        let mut acc: BTreeMap<HitData, f64> = BTreeMap::new();
        let mut total = 0.0;
        for bed in self.target.beds() {
            let p = self.distribution.integrate_offset(bed.shape(), aim);
            total += p;
            *acc.entry(bed.hit()).or_insert(0.0) += p;
        }
        *acc.entry(HitData::MISS).or_insert(0.0) += (1.0 - total).max(0.0);

        // zero-mass outcomes (e.g. a vanished miss entry) carry no
        // information and would leak impossible successors downstream
        let hits: HitDistribution = acc.into_iter().filter(|&(_, p)| p > 0.0).collect();
        let mut cache = self.hit_cache.lock().expect("hit cache lock poisoned");
        cache.entry(key).or_insert_with(|| hits.clone());
        hits
    }

    /// Successor of `state` for a single known hit.
    pub fn apply_hit(&self, state: State, hit: HitData) -> State {
        self.rule.apply(state, hit)
    }

    /// Distribution over successor states when aiming at `aim` from
    /// `state`. Duplicate successors are merged; entries are ordered by
    /// state.
    pub fn transitions(&self, aim: Vec2, state: State) -> StateDistribution {
        let mut acc: BTreeMap<State, f64> = BTreeMap::new();
        for (hit, p) in self.hit_distribution(aim) {
            *acc.entry(self.rule.apply(state, hit)).or_insert(0.0) += p;
        }
        acc.into_iter().collect()
    }

    /// One sampled throw: draw from the distribution, add the aim,
    /// classify, transition. Never used by the solvers.
    pub fn throw_sample(&self, aim: Vec2, state: State) -> State {
        let landing = self.distribution.sample() + aim;
        self.rule.apply(state, self.target.classify(landing))
    }

    /// Like [`throw_sample`](Self::throw_sample) with an external
    /// generator, for reproducible parallel simulation.
    pub fn throw_sample_with(&self, rng: &mut SmallRng, aim: Vec2, state: State) -> State {
        let landing = self.distribution.sample_with(rng) + aim;
        self.rule.apply(state, self.target.classify(landing))
    }
}

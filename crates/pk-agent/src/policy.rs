//! The `VisitorPolicy` trait — pluggable visitor choices.

use pk_core::AgentRng;

use crate::{RideInfo, StandInfo, Visitor};

/// The two random choices a visitor makes.
///
/// Filtering (visited subtypes, thrill level, wait tolerance) and path
/// search happen in [`Visitor`]; a policy only picks among what survives.
/// Both methods have defaults, so [`UniformPolicy`] is an empty impl.
pub trait VisitorPolicy {
    /// Index of the attraction to try next, or `None` to give up.
    /// `candidates` is never empty.
    fn choose_attraction(
        &self,
        _visitor:   &Visitor,
        candidates: &[&RideInfo],
        rng:        &mut AgentRng,
    ) -> Option<usize> {
        rng.pick_index(candidates.len())
    }

    /// Whether to stop at `stand` while walking past it.
    fn stop_at_concession(&self, _visitor: &Visitor, stand: &StandInfo, rng: &mut AgentRng) -> bool {
        rng.gen_bool(stand.stop_probability)
    }
}

/// Uniform ride choice, Bernoulli stop decision.
#[derive(Copy, Clone, Debug, Default)]
pub struct UniformPolicy;

impl VisitorPolicy for UniformPolicy {}

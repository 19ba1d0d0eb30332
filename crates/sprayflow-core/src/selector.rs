//! Uniform random cue selection.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{Category, Movement};

/// Set of enabled categories.
pub type CategorySet = BTreeSet<Category>;

/// Pick one eligible movement uniformly at random.
///
/// A movement is eligible when its category is in `enabled`. Returns `None`
/// when nothing is eligible. Calls are independent, so the same movement may
/// come up twice in a row.
pub fn pick<R: Rng + ?Sized>(
    catalog: &[Movement],
    enabled: &CategorySet,
    rng: &mut R,
) -> Option<Movement> {
    let eligible: Vec<&Movement> = catalog
        .iter()
        .filter(|m| enabled.contains(&m.category))
        .collect();
    eligible.choose(rng).map(|m| **m)
}

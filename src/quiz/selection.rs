//! Selection without replacement.
//!
//! Every function here reports "not enough items" as `None` rather than an
//! error: running out of data is an ordinary outcome while building a quiz.

use std::{collections::HashSet, hash::Hash};

use rand::{seq::index, Rng};

use crate::spotify::models::Image;

/// Picks `count` items at distinct, uniformly chosen positions.
///
/// Returns `None` when the slice is shorter than `count`. Choose from a
/// sub-range by slicing first, e.g. `random_from_list(&items[1..], 3, rng)`.
pub fn random_from_list<T, R>(items: &[T], count: usize, rng: &mut R) -> Option<Vec<T>>
where
    T: Clone,
    R: Rng + ?Sized,
{
    if count > items.len() {
        return None;
    }

    Some(
        index::sample(rng, items.len(), count)
            .into_iter()
            .map(|i| items[i].clone())
            .collect(),
    )
}

/// Picks `count` items whose key is neither in `excluded` nor already chosen.
///
/// Candidates are tried in random order and each is looked at once, so the
/// pool is exhausted at most once before giving up with `None`.
pub fn random_excluding<T, K, F, R>(
    items: &[T],
    excluded: &HashSet<K>,
    key: F,
    count: usize,
    rng: &mut R,
) -> Option<Vec<T>>
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&T) -> K,
    R: Rng + ?Sized,
{
    let mut pool = Untried::new(items.iter().collect());
    let mut chosen_keys = HashSet::with_capacity(count);
    let mut chosen = Vec::with_capacity(count);

    while chosen.len() < count {
        let item = pool.draw(rng)?;
        let item_key = key(item);
        if excluded.contains(&item_key) {
            continue;
        }
        if chosen_keys.insert(item_key) {
            chosen.push(item.clone());
        }
    }

    Some(chosen)
}

/// Candidates that have not been tried yet.
#[derive(Debug, Clone)]
pub struct Untried<T> {
    remaining: Vec<T>,
}

impl<T> Untried<T> {
    pub fn new(candidates: Vec<T>) -> Self {
        Self {
            remaining: candidates,
        }
    }

    /// Removes and returns a uniformly chosen remaining candidate.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<T> {
        if self.remaining.is_empty() {
            return None;
        }
        let i = rng.random_range(0..self.remaining.len());
        Some(self.remaining.swap_remove(i))
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Calls randomly chosen functions until `count` of them return `Some`.
///
/// Each function is called at most once. Fails with `None` straight away
/// when there are fewer than `count` functions, and after trying them all
/// if fewer than `count` succeeded.
pub fn call_random_functions<T, F, R>(functions: Vec<F>, count: usize, rng: &mut R) -> Option<Vec<T>>
where
    F: FnOnce() -> Option<T>,
    R: Rng + ?Sized,
{
    if functions.len() < count {
        return None;
    }

    let mut untried = Untried::new(functions);
    let mut results = Vec::with_capacity(count);

    while results.len() < count {
        let function = untried.draw(rng)?;
        if let Some(result) = function() {
            results.push(result);
        }
    }

    Some(results)
}

/// URL of the tallest image. Images without a height count as zero.
pub fn largest_image(images: &[Image]) -> Option<String> {
    images
        .iter()
        .max_by_key(|image| image.height.unwrap_or(0))
        .map(|image| image.url.clone())
}

//! Weighted random choice.

use rand::Rng;
use rand::seq::SliceRandom;

/// Pick an item with probability proportional to its weight.
///
/// Each item owns a slice `[cumulative, cumulative + weight)` of the range
/// `[0, total)`; a uniform draw in that range selects the item owning it.
/// When all weights are zero the choice is uniform. Returns `None` only for
/// an empty slice.
pub fn pick_weighted<'a, T, R, F>(items: &'a [T], weight: F, rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
    F: Fn(&T) -> u64,
{
    let total = items
        .iter()
        .map(&weight)
        .fold(0u64, u64::saturating_add);

    if total == 0 {
        return items.choose(rng);
    }

    let mut draw = rng.gen_range(0..total);
    for item in items {
        let item_weight = weight(item);
        if draw < item_weight {
            return Some(item);
        }
        draw -= item_weight;
    }

    // Only reachable if the total saturated
    items.last()
}

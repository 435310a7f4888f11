use std::collections::BTreeMap;

use rand::Rng;

/// Selects an item at random, proportionally to its occurrence count.
///
/// Draws a value in `[0, total)` and walks the map in key order, subtracting
/// each count until the draw falls inside an item's bucket.
///
/// Returns `None` if the map is empty or all counts are zero.
pub(crate) fn select_random_item<'a, K, R>(items: &'a BTreeMap<K, usize>, rng: &mut R) -> Option<&'a K>
where
	R: Rng + ?Sized,
{
	let total: usize = items.values().sum();
	if total == 0 {
		return None;
	}

	let mut r = rng.random_range(0..total);
	for (item, occurrence) in items {
		if r < *occurrence {
			return Some(item);
		}
		r -= occurrence;
	}

	// Unreachable: r < total
	None
}

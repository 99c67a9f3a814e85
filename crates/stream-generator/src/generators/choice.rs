//! Categorical value generators.

use rand::Rng;

/// Pick one value uniformly. `values` must not be empty.
pub fn one_of<R: Rng, T: Copy>(rng: &mut R, values: &[T]) -> T {
    values[rng.random_range(0..values.len())]
}

/// Pick one value according to relative weights.
///
/// Weights need not sum to one. `values` must not be empty; the last entry
/// absorbs any floating point remainder.
pub fn weighted<R: Rng, T: Copy>(rng: &mut R, values: &[(T, f64)]) -> T {
    let total: f64 = values.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return values[0].0;
    }
    let mut roll = rng.random_range(0.0..total);
    for (value, weight) in values {
        if roll < *weight {
            return *value;
        }
        roll -= weight;
    }
    values[values.len() - 1].0
}

/// Return `1` with the given probability, `0` otherwise (ClickHouse `UInt8` flags).
pub fn weighted_flag<R: Rng>(rng: &mut R, true_weight: f64) -> u8 {
    u8::from(rng.random_bool(true_weight))
}

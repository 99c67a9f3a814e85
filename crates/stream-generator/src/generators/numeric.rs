//! Numeric value generators.

use rand::Rng;

/// Generate a random integer in the given range (inclusive).
pub fn int_range<R: Rng>(rng: &mut R, min: u64, max: u64) -> u64 {
    if min >= max {
        return min;
    }
    rng.random_range(min..=max)
}

/// Generate a random monetary amount in the given range, rounded to cents.
///
/// Both bounds must be non-negative; the result never drops below `min`.
pub fn money_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    let value = if min >= max {
        min
    } else {
        rng.random_range(min..=max)
    };
    round_cents(value).max(min)
}

/// Round to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

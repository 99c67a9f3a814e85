//! Pattern-based string generator.
//!
//! Supports placeholders:
//! - `{index}` - row index
//! - `{uuid}` - random UUID drawn from the RNG
//! - `{rand:N}` - random N-digit number

use rand::Rng;

/// Render a pattern, substituting every placeholder.
pub fn render<R: Rng>(pattern: &str, rng: &mut R, index: u64) -> String {
    let mut result = pattern.replace("{index}", &index.to_string());

    while result.contains("{uuid}") {
        let uuid = super::uuid::uuid_v4(rng).to_string();
        result = result.replacen("{uuid}", &uuid, 1);
    }

    let mut search_from = 0;
    while let Some(offset) = result[search_from..].find("{rand:") {
        let start = search_from + offset;
        let Some(len) = result[start..].find('}') else {
            break;
        };
        let end = start + len;
        match result[start + 6..end].parse::<usize>() {
            Ok(digits) => {
                let number = random_digits(rng, digits);
                result = format!("{}{}{}", &result[..start], number, &result[end + 1..]);
                search_from = start + number.len();
            }
            // Leave malformed placeholders as-is.
            Err(_) => search_from = end + 1,
        }
    }

    result
}

/// Generate a random number with exactly N digits.
fn random_digits<R: Rng>(rng: &mut R, digits: usize) -> String {
    (0..digits)
        .map(|i| {
            let low = if i == 0 { 1 } else { 0 };
            char::from(b'0' + rng.random_range(low..10u8))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_render_index() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(
            render("user_{index}@example.com", &mut rng, 123),
            "user_123@example.com"
        );
    }

    #[test]
    fn test_render_uuid() {
        let mut rng = StdRng::seed_from_u64(42);
        let s = render("id-{uuid}", &mut rng, 0);

        assert!(s.starts_with("id-"));
        assert_eq!(s.len(), 3 + 36);
    }

    #[test]
    fn test_render_random_digits() {
        let mut rng = StdRng::seed_from_u64(42);
        let s = render("code-{rand:6}", &mut rng, 0);

        assert!(s.starts_with("code-"));
        assert_eq!(s.len(), 5 + 6);
        assert!(s[5..].chars().all(|c| c.is_ascii_digit()));
        assert_ne!(&s[5..6], "0");
    }

    #[test]
    fn test_render_malformed_placeholder_kept() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(render("x-{rand:abc}-{index}", &mut rng, 9), "x-{rand:abc}-9");
    }
}

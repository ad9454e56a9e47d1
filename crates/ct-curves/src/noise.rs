//! Deterministic pseudo-random jitter for noisy curve families.
//!
//! A linear congruential step keyed on the sample index, so the same sample
//! always gets the same jitter.

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233280;

/// Uniform value in `[0, 1)` for a sample index.
pub fn seeded_unit(index: u64) -> f64 {
    let v = index.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT) % MODULUS;
    v as f64 / MODULUS as f64
}

/// Symmetric jitter in `[-amplitude, amplitude)` for a sample index.
pub fn seeded_jitter(index: u64, amplitude: f64) -> f64 {
    (seeded_unit(index) - 0.5) * 2.0 * amplitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(seeded_unit(0), 49297.0 / 233280.0);
        assert_eq!(seeded_unit(1), (9301.0 + 49297.0) / 233280.0);
        // 20 * 9301 + 49297 = 235317 -> wraps
        assert_eq!(seeded_unit(20), 2037.0 / 233280.0);
    }

    #[test]
    fn repeatable_and_bounded() {
        for i in 0..2_000 {
            let a = seeded_jitter(i, 0.5);
            assert_eq!(a, seeded_jitter(i, 0.5));
            assert!((-0.5..0.5).contains(&a));
        }
    }
}

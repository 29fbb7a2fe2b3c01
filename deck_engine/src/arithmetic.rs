/// Deck Engine — Arithmetic Primitives
///
/// Inventory counts are `u32`, scores are `i64`.
/// Ratios use fixed-point basis points. No float anywhere.

/// Fixed-point scale factor. A ratio of 1.0 is stored as `SCALE`.
pub const SCALE: i64 = 10_000;

/// Apply a signed unit delta to a slot count.
///
/// Returns `None` when the result would be negative (or overflow).
pub fn apply_delta(count: u32, delta: i32) -> Option<u32> {
    count.checked_add_signed(delta)
}

/// Like `apply_delta`, but floors a negative result to zero.
pub fn apply_delta_clamped(count: u32, delta: i32) -> u32 {
    apply_delta(count, delta).unwrap_or(0)
}

/// `part / whole` in basis points, never above `SCALE`.
///
/// A non-positive `whole` yields 0.
pub fn capped_ratio(part: i64, whole: i64) -> i64 {
    if whole <= 0 {
        return 0;
    }
    (part.max(0).saturating_mul(SCALE) / whole).min(SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_delta_ok() {
        assert_eq!(apply_delta(3, 1), Some(4));
        assert_eq!(apply_delta(1, -1), Some(0));
    }

    #[test]
    fn test_apply_delta_underflow() {
        assert_eq!(apply_delta(0, -1), None);
        assert_eq!(apply_delta(u32::MAX, 1), None);
    }

    #[test]
    fn test_apply_delta_clamped_floors_at_zero() {
        assert_eq!(apply_delta_clamped(0, -1), 0);
        assert_eq!(apply_delta_clamped(2, -1), 1);
    }

    #[test]
    fn test_capped_ratio() {
        assert_eq!(capped_ratio(25, 50), 5_000);
        assert_eq!(capped_ratio(55, 50), SCALE);
        assert_eq!(capped_ratio(10, 0), 0);
        assert_eq!(capped_ratio(1, 3), 3_333);
    }
}

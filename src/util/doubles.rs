
/// Tolerance for treating two f64 values as equal
const EPSILON: f64 = 1e-10;

/// Returns true if `a` and `b` are equal within tolerance
pub fn equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Returns true if `a` is less than `b` beyond tolerance
pub fn less_than(a: f64, b: f64) -> bool {
    a < b - EPSILON
}

/// Returns true if `a` is less than or approximately equal to `b`
pub fn less_or_equal(a: f64, b: f64) -> bool {
    !greater_than(a, b)
}

/// Returns true if `a` is greater than `b` beyond tolerance
pub fn greater_than(a: f64, b: f64) -> bool {
    a > b + EPSILON
}

/// Returns true if `a` is greater than or approximately equal to `b`
pub fn greater_or_equal(a: f64, b: f64) -> bool {
    !less_than(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal() {
        assert!(equal(1.0, 1.0));
        assert!(equal(1.0, 1.0 + 1e-12));
        assert!(!equal(1.0, 1.0 + 1e-9));
    }

    #[test]
    fn test_orderings() {
        assert!(less_than(0.1, 0.2));
        assert!(!less_than(0.2, 0.2));
        assert!(!less_than(0.2 + 1e-12, 0.2));

        assert!(greater_than(0.2, 0.1));
        assert!(!greater_than(0.2, 0.2 + 1e-12));

        // boundary values count as "or equal"
        assert!(less_or_equal(0.15, 0.15));
        assert!(greater_or_equal(0.15, 0.15));
        assert!(greater_or_equal(0.15 + 1e-12, 0.15));
        assert!(!greater_or_equal(0.15 - 1e-9, 0.15));
    }
}

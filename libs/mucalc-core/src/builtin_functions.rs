//! Built-in functions for expression evaluation
//!
//! Pure numeric helpers that the engine does not provide natively. The
//! generator functions (`seed`, `random`, `gaussian`) live on
//! [`RandomState`](crate::state::RandomState).

use std::f64::consts::PI;

/// Radians to degrees
pub fn deg(x: f64) -> f64 {
    x * 180.0 / PI
}

/// Degrees to radians
pub fn rad(x: f64) -> f64 {
    x * PI / 180.0
}

/// Truncate toward zero through an integer cast.
///
/// Out-of-range values saturate at the `i64` limits and NaN becomes 0.
pub fn int(x: f64) -> f64 {
    x as i64 as f64
}

/// Fractional part, always in `[0, 1)` for finite input
pub fn fract(x: f64) -> f64 {
    x - x.floor()
}

/// Floored modulo: the result takes the sign of the divisor
pub fn modulo(x: f64, y: f64) -> f64 {
    x - y * (x / y).floor()
}

/// Median of a non-empty list of values
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Clamp a value to a range
///
/// Unlike `f64::clamp` this never panics when `lo > hi`; `hi` wins.
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    hi.min(lo.max(x))
}

/// 0 below the edge, 1 at or above it
pub fn step(x: f64, edge: f64) -> f64 {
    if x < edge {
        0.0
    } else {
        1.0
    }
}

/// Hermite interpolation between two edges
pub fn smoothstep(x: f64, edge0: f64, edge1: f64) -> f64 {
    let t = clamp((x - edge0) / (edge1 - edge0), 0.0, 1.0);
    t * t * (3.0 - t * 2.0)
}

/// Linear blend of `x` and `y`
pub fn mix(x: f64, y: f64, t: f64) -> f64 {
    x * (1.0 - t) + y * t
}

/// Sign function: returns -1, 0, or 1
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Identity, registered as prefix `+`
pub fn unary_plus(x: f64) -> f64 {
    x
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub fn avg(values: &[f64]) -> f64 {
    sum(values) / values.len() as f64
}

pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    const SAMPLES: [f64; 9] = [-7.5, -3.0, -1.0, -0.25, 0.0, 0.5, 2.0, 5.25, 11.0];

    #[test]
    fn test_angles() {
        assert!((deg(PI) - 180.0).abs() < 1e-12);
        assert!((rad(180.0) - PI).abs() < 1e-15);
        assert!((deg(rad(37.0)) - 37.0).abs() < 1e-12);
    }

    #[test]
    fn test_int_truncates_toward_zero() {
        assert_eq!(int(2.7), 2.0);
        assert_eq!(int(-2.7), -2.0);
        assert_eq!(int(f64::NAN), 0.0);
    }

    #[test]
    fn test_fract() {
        assert_eq!(fract(2.25), 0.25);
        assert_eq!(fract(-2.25), 0.75);
    }

    #[test]
    fn test_modulo_follows_divisor() {
        assert_eq!(modulo(7.0, 3.0), 1.0);
        assert_eq!(modulo(-7.0, 3.0), 2.0);
        assert_eq!(modulo(7.0, -3.0), -2.0);
        assert_eq!(modulo(-7.0, -3.0), -1.0);
    }

    #[test]
    fn test_modulo_range_and_period() {
        for &y in &[0.5, 1.0, 3.0, 10.0] {
            for &x in &SAMPLES {
                let r = modulo(x, y);
                assert!((0.0..y).contains(&r), "mod({}, {}) = {}", x, y, r);
                assert!((modulo(x + y, y) - r).abs() < 1e-9);
            }
        }
        for &x in &SAMPLES {
            assert!(modulo(x, -4.0) <= 0.0);
        }
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[5.0]), 5.0);
        assert_eq!(median(&[2.0, 4.0, 1.0, 3.0]), median(&[1.0, 2.0, 3.0, 4.0]));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(50.0, 0.0, 100.0), 50.0);
        assert_eq!(clamp(-10.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp(150.0, 0.0, 100.0), 100.0);
        for &x in &SAMPLES {
            let once = clamp(x, -1.0, 2.0);
            assert_eq!(clamp(once, -1.0, 2.0), once);
            assert!((-1.0..=2.0).contains(&once));
        }
    }

    #[test]
    fn test_step() {
        assert_eq!(step(0.9, 1.0), 0.0);
        assert_eq!(step(1.0, 1.0), 1.0);
    }

    #[test]
    fn test_smoothstep() {
        assert_eq!(smoothstep(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(smoothstep(0.0, 0.0, 1.0), 0.0);
        assert_eq!(smoothstep(0.5, 0.0, 1.0), 0.5);
        assert_eq!(smoothstep(1.0, 0.0, 1.0), 1.0);
        assert_eq!(smoothstep(3.0, 0.0, 1.0), 1.0);

        let mut last = 0.0;
        for i in 0..=100 {
            let v = smoothstep(2.0 + i as f64 * 0.03, 2.0, 5.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_mix() {
        assert_eq!(mix(2.0, 4.0, 0.0), 2.0);
        assert_eq!(mix(2.0, 4.0, 1.0), 4.0);
        assert_eq!(mix(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(10.0), 1.0);
        assert_eq!(sign(-10.0), -1.0);
        assert_eq!(sign(0.0), 0.0);
    }

    #[test]
    fn test_aggregates() {
        let values = [4.0, -2.0, 7.0, 1.0];
        assert_eq!(sum(&values), 10.0);
        assert_eq!(avg(&values), 2.5);
        assert_eq!(min(&values), -2.0);
        assert_eq!(max(&values), 7.0);
    }
}

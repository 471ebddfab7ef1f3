//! Brent–Dekker bracketed root finder.
//!
//! Combines inverse quadratic interpolation, the secant step and bisection.
//! Interpolated steps are accepted only while they stay inside the bracket
//! and keep shrinking fast enough; otherwise the step bisects. Convergence
//! is superlinear near a simple root and never slower than bisection.
//!
//! # References
//! - Brent, R.P. "Algorithms for Minimization without Derivatives" (1973), ch. 4

/// Configuration for [`brent`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct BrentConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Absolute convergence threshold on the bracket width `|b − a|`.
    pub tolerance: f64,
}

/// Outcome of a bracketed solve.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BrentResult {
    /// Best estimate of the root (the bracket end with the smaller residual).
    pub root: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// `true` if the bracket shrank below tolerance or an exact zero was hit.
    pub converged: bool,
}

/// Find a root of `f` in `[lo, hi]`.
///
/// Returns `None` when the endpoints do not bracket a root: either residual
/// is NaN, both share a strict sign, or `f` vanishes at both ends. Running
/// out of iterations is not a failure; the best estimate is returned with
/// `converged = false`.
pub(crate) fn brent<F>(f: F, lo: f64, hi: f64, config: &BrentConfig) -> Option<BrentResult>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = (lo, hi);
    let (mut fa, mut fb) = (f(a), f(b));

    if fa.is_nan() || fb.is_nan() {
        return None;
    }
    if fa == 0.0 && fb == 0.0 {
        return None;
    }
    if fa != 0.0 && fb != 0.0 && fa.is_sign_positive() == fb.is_sign_positive() {
        return None;
    }

    // b holds the best estimate throughout
    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    let tol = config.tolerance;
    let (mut c, mut fc) = (a, fa);
    let mut d = c;
    let mut bisected = true;
    let mut iterations = 0;

    while iterations < config.max_iter {
        if fb == 0.0 || (b - a).abs() < tol {
            break;
        }
        iterations += 1;

        let interpolated = if fa != fc && fb != fc {
            // Inverse quadratic interpolation
            a * fb * fc / ((fa - fb) * (fa - fc))
                + b * fa * fc / ((fb - fa) * (fb - fc))
                + c * fa * fb / ((fc - fa) * (fc - fb))
        } else {
            // Secant
            b - fb * (b - a) / (fb - fa)
        };

        let bound = (3.0 * a + b) / 4.0;
        let (lower, upper) = if bound < b { (bound, b) } else { (b, bound) };
        let outside = !(lower < interpolated && interpolated < upper);
        let step = (interpolated - b).abs();
        let slow_after_bisect = bisected && step >= (b - c).abs() / 2.0;
        let slow_after_interp = !bisected && step >= (c - d).abs() / 2.0;
        let tiny_after_bisect = bisected && (b - c).abs() < tol;
        let tiny_after_interp = !bisected && (c - d).abs() < tol;

        let s = if outside
            || slow_after_bisect
            || slow_after_interp
            || tiny_after_bisect
            || tiny_after_interp
        {
            bisected = true;
            0.5 * (a + b)
        } else {
            bisected = false;
            interpolated
        };

        let fs = f(s);
        if fs.is_nan() {
            return None;
        }
        d = c;
        c = b;
        fc = fb;
        if fa * fs < 0.0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }
        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
    }

    Some(BrentResult {
        root: b,
        iterations,
        converged: fb == 0.0 || (b - a).abs() < tol,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TIGHT: BrentConfig = BrentConfig {
        max_iter: 200,
        tolerance: 1e-12,
    };

    #[test]
    fn finds_sqrt_two() {
        let r = brent(|x| x * x - 2.0, 0.0, 2.0, &TIGHT).unwrap();
        assert!(r.converged);
        assert_abs_diff_eq!(r.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn finds_fixed_point_of_cosine() {
        let r = brent(|x: f64| x.cos() - x, 0.0, 1.0, &TIGHT).unwrap();
        assert!(r.converged);
        assert_abs_diff_eq!(r.root, 0.739_085_133_215_160_6, epsilon = 1e-10);
    }

    #[test]
    fn handles_reversed_bracket() {
        let r = brent(|x| x - 0.3, 1.0, 0.0, &TIGHT).unwrap();
        assert_abs_diff_eq!(r.root, 0.3, epsilon = 1e-10);
    }

    #[test]
    fn beats_bisection_on_smooth_function() {
        // Bisection needs ~41 halvings to shrink [0, 2] below 1e-12.
        let r = brent(|x: f64| x.exp() - 3.0, 0.0, 2.0, &TIGHT).unwrap();
        assert!(r.converged);
        assert!(r.iterations < 20, "took {} iterations", r.iterations);
        assert_abs_diff_eq!(r.root, 3.0_f64.ln(), epsilon = 1e-10);
    }

    #[test]
    fn survives_flat_then_steep_function() {
        // Interpolation is poor here; the safeguards must fall back to bisection.
        let r = brent(|x: f64| (x - 0.9).powi(9) * 1e6 - 1e-9, 0.0, 1.0, &TIGHT).unwrap();
        assert!(r.converged);
        let root = 0.9 + (1e-15_f64).powf(1.0 / 9.0);
        assert_abs_diff_eq!(r.root, root, epsilon = 1e-6);
    }

    #[test]
    fn root_at_endpoint() {
        let r = brent(|x| x - 1.0, 0.0, 1.0, &TIGHT).unwrap();
        assert!(r.converged);
        assert_eq!(r.iterations, 0);
        assert_eq!(r.root, 1.0);
    }

    #[test]
    fn unbracketed_returns_none() {
        assert!(brent(|x| x * x + 1.0, -1.0, 1.0, &TIGHT).is_none());
    }

    #[test]
    fn nan_endpoint_returns_none() {
        assert!(brent(|x: f64| x.ln(), -1.0, 2.0, &TIGHT).is_none());
    }

    #[test]
    fn identically_zero_returns_none() {
        assert!(brent(|_| 0.0, 0.0, 1.0, &TIGHT).is_none());
    }

    #[test]
    fn iteration_cap_returns_best_estimate_unconverged() {
        let cfg = BrentConfig {
            max_iter: 2,
            tolerance: 1e-15,
        };
        let r = brent(|x: f64| x.exp() - 3.0, 0.0, 10.0, &cfg).unwrap();
        assert!(!r.converged);
        assert_eq!(r.iterations, 2);
        assert!(r.root > 0.0 && r.root < 10.0);
    }
}

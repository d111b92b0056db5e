use crate::CoreError;

/// Floating point type used throughout the engine
pub type Real = f64;

/// Absolute + relative tolerance pair for comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Tolerance suitable for comparing results of a fixed-step integration.
    pub fn loose() -> Self {
        Self {
            abs: 1e-6,
            rel: 1e-6,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Linear interpolation through a sorted table, clamped at both ends.
///
/// `xs` must be strictly increasing and the same length as `ys`.
pub fn interp_clamped(x: Real, xs: &[Real], ys: &[Real]) -> Result<Real, CoreError> {
    if xs.len() != ys.len() {
        return Err(CoreError::ShapeMismatch {
            what: "interpolation table",
            left: xs.len(),
            right: ys.len(),
        });
    }
    let (Some(&x_first), Some(&x_last)) = (xs.first(), xs.last()) else {
        return Err(CoreError::Empty {
            what: "interpolation table",
        });
    };

    if x <= x_first {
        return Ok(ys[0]);
    }
    if x >= x_last {
        return Ok(ys[ys.len() - 1]);
    }

    // First index with xs[k] >= x; k >= 1 because x > xs[0]
    let k = xs.partition_point(|&v| v < x);
    let (x0, x1) = (xs[k - 1], xs[k]);
    let (y0, y1) = (ys[k - 1], ys[k]);
    Ok(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

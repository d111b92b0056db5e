//! Time-advance callbacks.

use crate::error::{SimError, SimResult};

/// Produces the time of output step `k` (`k = 0` is the initial instant).
///
/// Returns `false` once the run is over.
pub trait TimeAdvance {
    fn advance(&mut self, k: usize, t: &mut f64) -> bool;
}

impl<F> TimeAdvance for F
where
    F: FnMut(usize, &mut f64) -> bool,
{
    fn advance(&mut self, k: usize, t: &mut f64) -> bool {
        self(k, t)
    }
}

/// Relative slack on the end time so `t1` itself is reached despite rounding.
const END_SLACK: f64 = 1e-9;

/// `t = t0 + k * dt`, continuing while `t <= t1`.
pub fn arange(k: usize, t: &mut f64, t0: f64, t1: f64, dt: f64) -> bool {
    let next = t0 + k as f64 * dt;
    if next > t1 + END_SLACK * dt.abs() {
        return false;
    }
    *t = next;
    true
}

/// Evenly spaced grid over `[t0, t1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arange {
    pub t0: f64,
    pub t1: f64,
    pub dt: f64,
}

impl Arange {
    pub fn new(t0: f64, t1: f64, dt: f64) -> SimResult<Self> {
        if !(t0.is_finite() && t1.is_finite() && dt.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "time grid bounds must be finite",
            });
        }
        if dt <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if t1 < t0 {
            return Err(SimError::InvalidArg {
                what: "t_end must not be before t0",
            });
        }
        Ok(Self { t0, t1, dt })
    }

    /// Number of instants on the grid, the initial one included.
    pub fn len(&self) -> usize {
        ((self.t1 - self.t0) / self.dt * (1.0 + END_SLACK)).floor() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl TimeAdvance for Arange {
    fn advance(&mut self, k: usize, t: &mut f64) -> bool {
        arange(k, t, self.t0, self.t1, self.dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(mut grid: impl TimeAdvance) -> Vec<f64> {
        let mut out = Vec::new();
        let mut t = f64::NAN;
        let mut k = 0;
        while grid.advance(k, &mut t) {
            out.push(t);
            k += 1;
        }
        out
    }

    #[test]
    fn includes_end_point() {
        let ts = collect(Arange::new(0.0, 1.0, 0.1).unwrap());
        assert_eq!(ts.len(), 11);
        assert!((ts[10] - 1.0).abs() < 1e-12);
        assert_eq!(Arange::new(0.0, 1.0, 0.1).unwrap().len(), 11);
    }

    #[test]
    fn closure_as_time_callback() {
        let ts = collect(|k: usize, t: &mut f64| arange(k, t, 2.0, 3.0, 0.5));
        assert_eq!(ts, [2.0, 2.5, 3.0]);
    }

    #[test]
    fn rejects_bad_grids() {
        assert!(Arange::new(0.0, 1.0, 0.0).is_err());
        assert!(Arange::new(1.0, 0.0, 0.1).is_err());
        assert!(Arange::new(0.0, f64::INFINITY, 0.1).is_err());
    }
}

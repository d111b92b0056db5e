//! Fixed-step ODE steppers.
//!
//! A stepper only ever calls [`DynamicSystem::rhs`]; it never commits. The
//! run loop commits once the returned state is accepted, so multi-stage
//! methods may evaluate the network as often as they like.

use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::system::DynamicSystem;

pub trait Stepper {
    /// Advance state by one step of size `dt`.
    fn step<S: DynamicSystem>(&self, system: &mut S, t: f64, x: &S::State, dt: f64) -> SimResult<S::State>;
}

/// Classical RK4 (Runge-Kutta 4th order).
#[derive(Clone, Copy, Debug, Default)]
pub struct RK4;

impl Stepper for RK4 {
    fn step<S: DynamicSystem>(&self, system: &mut S, t: f64, x: &S::State, dt: f64) -> SimResult<S::State> {
        let k1 = system.rhs(t, x)?;

        let x2 = system.add(x, &system.scale(&k1, 0.5 * dt));
        let k2 = system.rhs(t + 0.5 * dt, &x2)?;

        let x3 = system.add(x, &system.scale(&k2, 0.5 * dt));
        let k3 = system.rhs(t + 0.5 * dt, &x3)?;

        let x4 = system.add(x, &system.scale(&k3, dt));
        let k4 = system.rhs(t + dt, &x4)?;

        // x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = system.add(
            &system.add(&k1, &system.scale(&k2, 2.0)),
            &system.add(&system.scale(&k3, 2.0), &k4),
        );

        Ok(system.add(x, &system.scale(&k_sum, dt / 6.0)))
    }
}

/// Forward Euler: one rhs call per step.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl Stepper for ForwardEuler {
    fn step<S: DynamicSystem>(&self, system: &mut S, t: f64, x: &S::State, dt: f64) -> SimResult<S::State> {
        let xdot = system.rhs(t, x)?;
        Ok(system.add(x, &system.scale(&xdot, dt)))
    }
}

/// Stepper selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepperType {
    /// 4 rhs calls per step.
    #[default]
    #[serde(rename = "rk4")]
    RK4,
    ForwardEuler,
}

impl StepperType {
    pub fn step<S: DynamicSystem>(self, system: &mut S, t: f64, x: &S::State, dt: f64) -> SimResult<S::State> {
        match self {
            StepperType::RK4 => RK4.step(system, t, x, dt),
            StepperType::ForwardEuler => ForwardEuler.step(system, t, x, dt),
        }
    }
}

//! Configuration of an optimization run.
//!
//! [`Settings`] bundles the convergence thresholds, the stagnation rule and
//! the hard budget caps. The [`Default`] implementation gives the standard
//! values; individual fields are adjusted through setters:
//!
//! ```rust
//! use minim::{FunctionConverge, Settings};
//!
//! let mut settings = Settings::<f64>::default();
//! settings
//!     .set_gradient_threshold(1e-9)
//!     .set_major_iterations(1_000);
//! ```

use std::time::Duration;

use getset::{CopyGetters, Setters};
use nalgebra::{convert, Dyn, OMatrix, OVector, RealField};

/// The stagnation rule: requires the objective function value to decrease by
/// a significant amount over a window of major iterations.
///
/// A new value `f` is a significant improvement over the running best iff
/// `f < best` and `best - f > relative * max(|f|, |best|) + absolute`. If
/// there is no significant improvement for `iterations` consecutive major
/// iterations, the run terminates with
/// [`Status::FunctionConvergence`](crate::Status::FunctionConvergence).
///
/// A window of 0 iterations disables the rule entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionConverge<T: RealField + Copy> {
    /// Relative component of the required decrease.
    pub relative: T,
    /// Absolute component of the required decrease.
    pub absolute: T,
    /// Number of consecutive non-significant major iterations after which the
    /// run is declared converged.
    pub iterations: usize,
}

impl<T: RealField + Copy> Default for FunctionConverge<T> {
    fn default() -> Self {
        Self {
            relative: convert(0.0),
            absolute: convert(1e-10),
            iterations: 20,
        }
    }
}

/// Pre-supplied information about the conditions at the initial point.
///
/// Seeding the initial location from this data avoids a redundant first
/// evaluation; seeded fields do not count towards the evaluation statistics.
#[derive(Debug, Clone)]
pub struct InitialData<T: RealField + Copy> {
    value: T,
    gradient: Option<OVector<T, Dyn>>,
    hessian: Option<OMatrix<T, Dyn, Dyn>>,
}

impl<T: RealField + Copy> InitialData<T> {
    /// Creates initial data from the function value at the initial point.
    pub fn new(value: T) -> Self {
        Self {
            value,
            gradient: None,
            hessian: None,
        }
    }

    /// Adds the gradient at the initial point.
    pub fn with_gradient(mut self, gradient: OVector<T, Dyn>) -> Self {
        self.gradient = Some(gradient);
        self
    }

    /// Adds the Hessian at the initial point.
    pub fn with_hessian(mut self, hessian: OMatrix<T, Dyn, Dyn>) -> Self {
        self.hessian = Some(hessian);
        self
    }

    /// The function value at the initial point.
    pub fn value(&self) -> T {
        self.value
    }

    /// The gradient at the initial point, if supplied.
    pub fn gradient(&self) -> Option<&OVector<T, Dyn>> {
        self.gradient.as_ref()
    }

    /// The Hessian at the initial point, if supplied.
    pub fn hessian(&self) -> Option<&OMatrix<T, Dyn, Dyn>> {
        self.hessian.as_ref()
    }
}

/// Settings of an optimization run.
///
/// All hard caps with value 0 (and the zero [`runtime`](Settings::runtime))
/// mean "no limit" and never trigger. The bundle is immutable once handed to
/// the driver.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct Settings<T: RealField + Copy> {
    /// Threshold for acceptably small values of the objective function.
    /// [`Status::FunctionThreshold`](crate::Status::FunctionThreshold) is
    /// reported if the function value goes below this value. Default:
    /// negative infinity.
    function_threshold: T,
    /// Accuracy to which the minimum is found.
    /// [`Status::GradientThreshold`](crate::Status::GradientThreshold) is
    /// reported if the infinity norm of the gradient goes below this value.
    /// Has no effect if gradient information is not used. Default: `1e-6`.
    gradient_threshold: T,
    /// Maximum number of major iterations allowed. Default: 0 (no limit).
    major_iterations: usize,
    /// Maximum runtime allowed, checked at major iteration boundaries only,
    /// so a long single evaluation can overshoot the budget. Default: zero
    /// (no limit).
    runtime: Duration,
    /// Maximum allowed number of function evaluations. Default: 0 (no
    /// limit).
    func_evaluations: usize,
    /// Maximum allowed number of gradient evaluations. Default: 0 (no
    /// limit).
    grad_evaluations: usize,
    /// Maximum allowed number of Hessian evaluations. Default: 0 (no limit).
    hess_evaluations: usize,
    #[getset(skip)]
    function_converge: Option<FunctionConverge<T>>,
    #[getset(skip)]
    initial: Option<InitialData<T>>,
}

impl<T: RealField + Copy> Settings<T> {
    /// The stagnation rule, if enabled.
    pub fn function_converge(&self) -> Option<&FunctionConverge<T>> {
        self.function_converge.as_ref()
    }

    /// Sets or disables the stagnation rule.
    pub fn set_function_converge(&mut self, rule: Option<FunctionConverge<T>>) -> &mut Self {
        self.function_converge = rule;
        self
    }

    /// Pre-supplied information about the initial point, if any.
    pub fn initial(&self) -> Option<&InitialData<T>> {
        self.initial.as_ref()
    }

    /// Sets pre-supplied information about the initial point.
    pub fn set_initial(&mut self, initial: InitialData<T>) -> &mut Self {
        self.initial = Some(initial);
        self
    }
}

impl<T: RealField + Copy> Default for Settings<T> {
    fn default() -> Self {
        Self {
            function_threshold: convert(f64::NEG_INFINITY),
            gradient_threshold: convert(1e-6),
            major_iterations: 0,
            runtime: Duration::ZERO,
            func_evaluations: 0,
            grad_evaluations: 0,
            hess_evaluations: 0,
            function_converge: Some(FunctionConverge::default()),
            initial: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = Settings::<f64>::default();

        assert_eq!(settings.function_threshold(), f64::NEG_INFINITY);
        assert_eq!(settings.gradient_threshold(), 1e-6);
        assert_eq!(settings.major_iterations(), 0);
        assert_eq!(settings.runtime(), Duration::ZERO);

        let rule = settings.function_converge().unwrap();
        assert_eq!(rule.relative, 0.0);
        assert_eq!(rule.absolute, 1e-10);
        assert_eq!(rule.iterations, 20);
    }

    #[test]
    fn setters_chain() {
        let mut settings = Settings::<f64>::default();
        settings
            .set_function_threshold(-10.0)
            .set_major_iterations(5)
            .set_function_converge(None);

        assert_eq!(settings.function_threshold(), -10.0);
        assert_eq!(settings.major_iterations(), 5);
        assert!(settings.function_converge().is_none());
    }
}

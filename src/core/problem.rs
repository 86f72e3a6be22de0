use std::fmt;

use nalgebra::{DimName, Dyn, OMatrix, OVector, RealField, U1};
use thiserror::Error;

use super::location::{Evaluation, Location};
use super::method::Needs;
use super::report::{Failure, Stats};

/// Error type reported by a problem's status callback.
pub type ProblemError = Box<dyn std::error::Error + Send + Sync>;

/// Invalid combination of problem and method, detected before the run starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The method requires gradient information, but the problem does not
    /// provide a gradient callable.
    #[error("method requires gradient, but the problem does not provide one")]
    MissingGradient,
    /// The method requires Hessian information, but the problem does not
    /// provide a Hessian callable.
    #[error("method requires Hessian, but the problem does not provide one")]
    MissingHessian,
}

/// The optimization problem to be solved.
///
/// A problem bundles the objective function with optional in-place derivative
/// callables and an optional status callback:
///
/// ```rust
/// use minim::nalgebra as na;
/// use minim::Problem;
/// use na::{Dyn, OVector};
///
/// let problem = Problem::new(|x: &OVector<f64, Dyn>| x.norm_squared())
///     .with_gradient(|x, gradient: &mut OVector<f64, Dyn>| {
///         gradient.copy_from(x);
///         *gradient *= 2.0;
///     });
/// ```
///
/// The derivative callables write their result in place into buffers owned by
/// the driver and reused across iterations. None of the callables may modify
/// `x`.
///
/// The status callback is polled once per fulfilled evaluation request. It
/// can be used to abort the run early, for example when the objective is not
/// able to evaluate itself anymore; a returned error terminates the run with
/// [`Status::Failure`](crate::Status::Failure) while keeping the statistics
/// collected so far.
pub struct Problem<'a, T: RealField + Copy> {
    func: Box<dyn Fn(&OVector<T, Dyn>) -> T + 'a>,
    grad: Option<Box<dyn Fn(&OVector<T, Dyn>, &mut OVector<T, Dyn>) + 'a>>,
    hess: Option<Box<dyn Fn(&OVector<T, Dyn>, &mut OMatrix<T, Dyn, Dyn>) + 'a>>,
    report: Option<Box<dyn Fn() -> Result<(), ProblemError> + 'a>>,
}

impl<'a, T: RealField + Copy> Problem<'a, T> {
    /// Creates a problem from the objective function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&OVector<T, Dyn>) -> T + 'a,
    {
        Self {
            func: Box::new(func),
            grad: None,
            hess: None,
            report: None,
        }
    }

    /// Adds a gradient callable evaluating in place into the given buffer.
    pub fn with_gradient<G>(mut self, grad: G) -> Self
    where
        G: Fn(&OVector<T, Dyn>, &mut OVector<T, Dyn>) + 'a,
    {
        self.grad = Some(Box::new(grad));
        self
    }

    /// Adds a Hessian callable evaluating in place into the given matrix.
    pub fn with_hessian<H>(mut self, hess: H) -> Self
    where
        H: Fn(&OVector<T, Dyn>, &mut OMatrix<T, Dyn, Dyn>) + 'a,
    {
        self.hess = Some(Box::new(hess));
        self
    }

    /// Adds a status callback polled once per fulfilled evaluation request.
    pub fn with_report<R>(mut self, report: R) -> Self
    where
        R: Fn() -> Result<(), ProblemError> + 'a,
    {
        self.report = Some(Box::new(report));
        self
    }

    /// Whether the problem provides a gradient callable.
    pub fn has_gradient(&self) -> bool {
        self.grad.is_some()
    }

    /// Whether the problem provides a Hessian callable.
    pub fn has_hessian(&self) -> bool {
        self.hess.is_some()
    }

    /// Checks that the problem provides every callable the method declared it
    /// needs.
    pub(crate) fn satisfies(&self, needs: Needs) -> Result<(), ConfigError> {
        if needs.gradient && self.grad.is_none() {
            return Err(ConfigError::MissingGradient);
        }

        if needs.hessian && self.hess.is_none() {
            return Err(ConfigError::MissingHessian);
        }

        Ok(())
    }

    /// Fulfills an evaluation request at `loc.x`.
    ///
    /// Exactly the requested fields are evaluated, each incrementing its
    /// counter in `stats` once. Derivative slots missing from the location
    /// are allocated on first use and reused afterwards. After the
    /// evaluations, the status callback (if any) is polled once; an error
    /// from it is surfaced as [`Failure::Problem`].
    pub fn evaluate(
        &self,
        eval: Evaluation,
        loc: &mut Location<T>,
        stats: &mut Stats,
    ) -> Result<(), Failure> {
        let dim = loc.dim();
        let Location {
            x,
            fx,
            gradient,
            hessian,
        } = loc;

        if eval.function() {
            *fx = (self.func)(x);
            stats.func_evaluations += 1;
        }

        if eval.gradient() {
            let grad = self.grad.as_ref().ok_or(Failure::MissingGradient)?;
            let buffer =
                gradient.get_or_insert_with(|| OVector::zeros_generic(Dyn(dim), U1::name()));

            grad(x, buffer);
            stats.grad_evaluations += 1;
        }

        if eval.hessian() {
            let hess = self.hess.as_ref().ok_or(Failure::MissingHessian)?;
            let buffer =
                hessian.get_or_insert_with(|| OMatrix::zeros_generic(Dyn(dim), Dyn(dim)));

            hess(x, buffer);
            stats.hess_evaluations += 1;
        }

        if let Some(report) = &self.report {
            report().map_err(Failure::Problem)?;
        }

        Ok(())
    }
}

impl<T: RealField + Copy> fmt::Debug for Problem<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("gradient", &self.grad.is_some())
            .field("hessian", &self.hess.is_some())
            .field("report", &self.report.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use nalgebra::dvector;

    fn sphere<'a>(calls: &'a Cell<usize>, grad_calls: &'a Cell<usize>) -> Problem<'a, f64> {
        Problem::new(move |x: &OVector<f64, Dyn>| {
            calls.set(calls.get() + 1);
            x.norm_squared()
        })
        .with_gradient(move |x, gradient| {
            grad_calls.set(grad_calls.get() + 1);
            gradient.copy_from(x);
            *gradient *= 2.0;
        })
    }

    #[test]
    fn evaluates_exactly_requested_fields() {
        let calls = Cell::new(0);
        let grad_calls = Cell::new(0);
        let problem = sphere(&calls, &grad_calls);

        let mut loc = Location::new(
            dvector![1.0, 2.0],
            Needs {
                gradient: true,
                hessian: false,
            },
        );
        let mut stats = Stats::default();

        problem
            .evaluate(Evaluation::FUNCTION, &mut loc, &mut stats)
            .unwrap();

        assert_eq!(loc.fx, 5.0);
        assert_eq!((calls.get(), grad_calls.get()), (1, 0));
        assert_eq!((stats.func_evaluations, stats.grad_evaluations), (1, 0));

        problem
            .evaluate(Evaluation::GRADIENT, &mut loc, &mut stats)
            .unwrap();

        assert_eq!(loc.gradient.as_ref().unwrap(), &dvector![2.0, 4.0]);
        assert_eq!((calls.get(), grad_calls.get()), (1, 1));
        assert_eq!((stats.func_evaluations, stats.grad_evaluations), (1, 1));
    }

    #[test]
    fn allocates_missing_slot_on_first_use() {
        let calls = Cell::new(0);
        let grad_calls = Cell::new(0);
        let problem = sphere(&calls, &grad_calls);

        // Derivative-free location; the gradient slot appears on demand.
        let mut loc = Location::new(dvector![3.0], Needs::default());
        let mut stats = Stats::default();

        assert!(loc.gradient.is_none());
        problem
            .evaluate(Evaluation::GRADIENT, &mut loc, &mut stats)
            .unwrap();
        assert_eq!(loc.gradient.as_ref().unwrap(), &dvector![6.0]);
    }

    #[test]
    fn missing_callable_is_a_failure() {
        let problem = Problem::new(|x: &OVector<f64, Dyn>| x.norm_squared());
        let mut loc = Location::new(dvector![1.0], Needs::default());
        let mut stats = Stats::default();

        let result = problem.evaluate(Evaluation::GRADIENT, &mut loc, &mut stats);
        assert!(matches!(result, Err(Failure::MissingGradient)));

        let result = problem.evaluate(Evaluation::HESSIAN, &mut loc, &mut stats);
        assert!(matches!(result, Err(Failure::MissingHessian)));
    }

    #[test]
    fn report_error_aborts_evaluation() {
        let problem = Problem::new(|x: &OVector<f64, Dyn>| x.norm_squared())
            .with_report(|| Err("objective data source went away".into()));

        let mut loc = Location::new(dvector![1.0], Needs::default());
        let mut stats = Stats::default();

        let result = problem.evaluate(Evaluation::FUNCTION, &mut loc, &mut stats);
        assert!(matches!(result, Err(Failure::Problem(_))));

        // The evaluation itself still happened and was counted.
        assert_eq!(stats.func_evaluations, 1);
    }

    #[test]
    fn satisfies_checks_needed_callables() {
        let problem = Problem::new(|x: &OVector<f64, Dyn>| x.norm_squared());

        assert!(problem.satisfies(Needs::default()).is_ok());
        assert!(matches!(
            problem.satisfies(Needs {
                gradient: true,
                hessian: false
            }),
            Err(ConfigError::MissingGradient)
        ));
        assert!(matches!(
            problem.satisfies(Needs {
                gradient: false,
                hessian: true
            }),
            Err(ConfigError::MissingHessian)
        ));
    }
}

use std::fmt;
use std::time::Duration;

use nalgebra::RealField;
use thiserror::Error;

use super::location::Location;

/// Statistics collected during a run.
///
/// The counters are owned by the driver and incremented only when the problem
/// actually invokes a callable, never when a value is seeded or already
/// fresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Total number of major iterations.
    pub major_iterations: usize,
    /// Number of objective function evaluations.
    pub func_evaluations: usize,
    /// Number of gradient evaluations.
    pub grad_evaluations: usize,
    /// Number of Hessian evaluations.
    pub hess_evaluations: usize,
    /// Total runtime of the run, sampled at major iteration boundaries and
    /// once more at termination.
    pub runtime: Duration,
}

/// A failure that terminated a run.
///
/// Failures are never silently corrected or retried; they are carried in the
/// terminal [`Status`] together with whatever statistics and location data
/// were collected up to that point.
#[derive(Debug, Error)]
pub enum Failure {
    /// The problem reported an error through its status callback.
    #[error("problem reported an error")]
    Problem(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The method failed to compute its next request.
    #[error("method failed")]
    Method(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The method emitted an evaluation request with no flags set.
    #[error("method emitted an empty evaluation request")]
    EmptyEvaluation,
    /// The method requested a gradient evaluation, but the problem does not
    /// provide a gradient callable.
    #[error("method requested gradient, but the problem does not provide one")]
    MissingGradient,
    /// The method requested a Hessian evaluation, but the problem does not
    /// provide a Hessian callable.
    #[error("method requested Hessian, but the problem does not provide one")]
    MissingHessian,
}

/// The reason why a run terminated.
///
/// The checks behind these statuses are not mutually exclusive; the driver
/// applies them in a fixed priority order (thresholds before stagnation
/// before budget limits) so that the reported status is deterministic when
/// several conditions hold at once.
#[derive(Debug)]
pub enum Status {
    /// The objective function value went below the configured threshold.
    FunctionThreshold,
    /// The infinity norm of the gradient went below the configured threshold.
    GradientThreshold,
    /// The objective function value showed no significant decrease over the
    /// configured window of major iterations.
    FunctionConvergence,
    /// The maximum number of major iterations was reached.
    IterationLimit,
    /// The maximum runtime was exceeded.
    RuntimeLimit,
    /// The maximum number of function evaluations was reached.
    FunctionEvaluationLimit,
    /// The maximum number of gradient evaluations was reached.
    GradientEvaluationLimit,
    /// The maximum number of Hessian evaluations was reached.
    HessianEvaluationLimit,
    /// The run was aborted by a failure.
    Failure(Failure),
}

impl Status {
    /// Whether the run converged (a threshold or the stagnation rule was
    /// satisfied), as opposed to running out of budget or failing.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Status::FunctionThreshold | Status::GradientThreshold | Status::FunctionConvergence
        )
    }

    /// Whether the run was aborted by a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failure(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::FunctionThreshold => write!(f, "function value below threshold"),
            Status::GradientThreshold => write!(f, "gradient norm below threshold"),
            Status::FunctionConvergence => write!(f, "no significant function decrease"),
            Status::IterationLimit => write!(f, "major iteration limit reached"),
            Status::RuntimeLimit => write!(f, "runtime limit exceeded"),
            Status::FunctionEvaluationLimit => write!(f, "function evaluation limit reached"),
            Status::GradientEvaluationLimit => write!(f, "gradient evaluation limit reached"),
            Status::HessianEvaluationLimit => write!(f, "Hessian evaluation limit reached"),
            Status::Failure(failure) => write!(f, "failure: {failure}"),
        }
    }
}

/// The answer of an optimization run.
///
/// Contains the final location (fully populated with the function value and
/// every derivative the method used), the statistics taken during the run and
/// the terminal [`Status`] explaining why the run stopped.
#[derive(Debug)]
pub struct Minimum<T: RealField + Copy> {
    /// The final location.
    pub location: Location<T>,
    /// Statistics of the run.
    pub stats: Stats,
    /// The reason why the run terminated.
    pub status: Status,
}

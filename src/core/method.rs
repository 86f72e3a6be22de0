use nalgebra::RealField;

use super::location::{Location, Request};

/// Derivative information consumed by a [`Method`].
///
/// The driver allocates the corresponding [`Location`] slots up front and the
/// problem is validated against this declaration once, before the run starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Needs {
    /// The method reads the gradient.
    pub gradient: bool,
    /// The method reads the Hessian.
    pub hessian: bool,
}

/// Interface of an optimization method.
///
/// A method is an iterative algorithm driven by the
/// [`Minimizer`](crate::Minimizer). At each turn, the method receives the
/// current [`Location`] and answers with a [`Request`]: either a set of
/// evaluations it wants fulfilled at the (possibly updated) point, or
/// [`Request::MajorIteration`] announcing that the point is the next
/// candidate for the minimum and convergence should be checked. The driver
/// guarantees that every evaluation the method asked for is present in the
/// location before the method is consulted again.
///
/// If you implement a method, please reach out to discuss if we could include
/// it in minim.
///
/// ## Implementing a method
///
/// Here is a fixed-step gradient descent. It alternates between taking a step
/// against the gradient (requesting fresh values at the new point) and
/// announcing the stepped point as a candidate.
///
/// ```rust
/// use minim::{Evaluation, Location, Method, Needs, Request};
///
/// struct SteepestDescent {
///     step: f64,
///     fresh: bool,
/// }
///
/// impl SteepestDescent {
///     fn take_step(&self, loc: &mut Location<f64>) -> Request {
///         let Location { x, gradient, .. } = loc;
///
///         if let Some(gradient) = gradient {
///             x.axpy(-self.step, gradient, 1.0);
///         }
///
///         Request::Evaluation(Evaluation::FUNCTION | Evaluation::GRADIENT)
///     }
/// }
///
/// impl Method<f64> for SteepestDescent {
///     const NAME: &'static str = "Steepest descent";
///     type Error = std::convert::Infallible;
///
///     fn init(&mut self, loc: &mut Location<f64>) -> Result<Request, Self::Error> {
///         self.fresh = true;
///         Ok(self.take_step(loc))
///     }
///
///     fn next(&mut self, loc: &mut Location<f64>) -> Result<Request, Self::Error> {
///         if self.fresh {
///             self.fresh = false;
///             Ok(Request::MajorIteration)
///         } else {
///             self.fresh = true;
///             Ok(self.take_step(loc))
///         }
///     }
///
///     fn needs(&self) -> Needs {
///         Needs {
///             gradient: true,
///             hessian: false,
///         }
///     }
/// }
/// ```
pub trait Method<T: RealField + Copy> {
    /// Name of the method.
    const NAME: &'static str;

    /// Error while computing the next request.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Prepares the method for a fresh run and returns its first request.
    ///
    /// The location is fully populated: the function value and every
    /// derivative declared by [`needs`](Method::needs) have been evaluated
    /// (or seeded from initial data) at `loc.x`.
    fn init(&mut self, loc: &mut Location<T>) -> Result<Request, Self::Error>;

    /// Returns the next request, given that the previous one was fulfilled.
    ///
    /// The method may move `loc.x` before requesting evaluations at the new
    /// point. The implementations _can_ assume that subsequent calls receive
    /// the location exactly as they left it, refreshed with the requested
    /// values.
    fn next(&mut self, loc: &mut Location<T>) -> Result<Request, Self::Error>;

    /// Declares which derivative information the method consumes. The default
    /// is derivative-free.
    fn needs(&self) -> Needs {
        Needs::default()
    }
}

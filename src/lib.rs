#![warn(missing_docs)]

//! # Minim
//!
//! An iteration-control and convergence engine for numerical optimization,
//! written entirely in Rust.
//!
//! This library does not implement optimization algorithms. It implements
//! everything around them: the protocol by which an algorithm (a
//! [`Method`]) requests function, gradient and Hessian evaluations of a
//! user-supplied objective (a [`Problem`]), the bookkeeping of what has been
//! computed at the current candidate point, the evaluation statistics, and
//! the multi-criterion decision of when to stop — value and gradient
//! thresholds, stagnation over a window of iterations, iteration, runtime
//! and evaluation budgets, and externally reported aborts.
//!
//! ## Problem
//!
//! A problem is the objective function together with whatever derivative
//! information is available for it. The derivatives evaluate in place into
//! buffers owned by the driver and reused across iterations.
//!
//! ```rust
//! use minim::nalgebra as na;
//! use minim::Problem;
//! use na::{Dyn, OVector};
//!
//! let problem = Problem::new(|x: &OVector<f64, Dyn>| x.norm_squared())
//!     .with_gradient(|x, gradient: &mut OVector<f64, Dyn>| {
//!         gradient.copy_from(x);
//!         *gradient *= 2.0;
//!     });
//! ```
//!
//! An optional status callback can abort a run from the outside, for example
//! when the data behind the objective becomes unavailable. It is polled once
//! per fulfilled evaluation request, so cancellation is bounded but not
//! instantaneous.
//!
//! ## Method
//!
//! A method is any type implementing the [`Method`] trait. It never
//! evaluates anything itself; it moves the current point and answers the
//! driver with a [`Request`]: either a combination of evaluation flags or
//! [`Request::MajorIteration`], announcing a new candidate for the minimum.
//! The driver guarantees that the requested values are present in the
//! [`Location`] before the method is consulted again.
//!
//! ```rust
//! use minim::{Evaluation, Location, Method, Needs, Request};
//!
//! struct SteepestDescent {
//!     step: f64,
//!     fresh: bool,
//! }
//!
//! impl SteepestDescent {
//!     fn take_step(&self, loc: &mut Location<f64>) -> Request {
//!         let Location { x, gradient, .. } = loc;
//!
//!         if let Some(gradient) = gradient {
//!             x.axpy(-self.step, gradient, 1.0);
//!         }
//!
//!         Request::Evaluation(Evaluation::FUNCTION | Evaluation::GRADIENT)
//!     }
//! }
//!
//! impl Method<f64> for SteepestDescent {
//!     const NAME: &'static str = "Steepest descent";
//!     type Error = std::convert::Infallible;
//!
//!     fn init(&mut self, loc: &mut Location<f64>) -> Result<Request, Self::Error> {
//!         self.fresh = true;
//!         Ok(self.take_step(loc))
//!     }
//!
//!     fn next(&mut self, loc: &mut Location<f64>) -> Result<Request, Self::Error> {
//!         if self.fresh {
//!             self.fresh = false;
//!             Ok(Request::MajorIteration)
//!         } else {
//!             self.fresh = true;
//!             Ok(self.take_step(loc))
//!         }
//!     }
//!
//!     fn needs(&self) -> Needs {
//!         Needs {
//!             gradient: true,
//!             hessian: false,
//!         }
//!     }
//! }
//! ```
//!
//! ## Minimizing
//!
//! The [`Minimizer`](crate::Minimizer) drives the whole process and returns
//! a [`Minimum`]: the final location, the statistics of the run and the
//! terminal [`Status`] explaining why it stopped. Every run-time failure is
//! absorbed into the status, so the statistics collected so far are never
//! lost.
//!
//! ```rust
//! # use minim::nalgebra as na;
//! # use minim::{Evaluation, Location, Method, Needs, Request};
//! # use na::{Dyn, OVector};
//! #
//! # struct SteepestDescent {
//! #     step: f64,
//! #     fresh: bool,
//! # }
//! #
//! # impl SteepestDescent {
//! #     fn take_step(&self, loc: &mut Location<f64>) -> Request {
//! #         let Location { x, gradient, .. } = loc;
//! #
//! #         if let Some(gradient) = gradient {
//! #             x.axpy(-self.step, gradient, 1.0);
//! #         }
//! #
//! #         Request::Evaluation(Evaluation::FUNCTION | Evaluation::GRADIENT)
//! #     }
//! # }
//! #
//! # impl Method<f64> for SteepestDescent {
//! #     const NAME: &'static str = "Steepest descent";
//! #     type Error = std::convert::Infallible;
//! #
//! #     fn init(&mut self, loc: &mut Location<f64>) -> Result<Request, Self::Error> {
//! #         self.fresh = true;
//! #         Ok(self.take_step(loc))
//! #     }
//! #
//! #     fn next(&mut self, loc: &mut Location<f64>) -> Result<Request, Self::Error> {
//! #         if self.fresh {
//! #             self.fresh = false;
//! #             Ok(Request::MajorIteration)
//! #         } else {
//! #             self.fresh = true;
//! #             Ok(self.take_step(loc))
//! #         }
//! #     }
//! #
//! #     fn needs(&self) -> Needs {
//! #         Needs {
//! #             gradient: true,
//! #             hessian: false,
//! #         }
//! #     }
//! # }
//! #
//! use minim::{Minimizer, Problem, Settings};
//!
//! let problem = Problem::new(|x: &OVector<f64, Dyn>| x.norm_squared())
//!     .with_gradient(|x, gradient: &mut OVector<f64, Dyn>| {
//!         gradient.copy_from(x);
//!         *gradient *= 2.0;
//!     });
//!
//! let method = SteepestDescent {
//!     step: 0.1,
//!     fresh: false,
//! };
//!
//! let mut settings = Settings::default();
//! settings.set_function_converge(None);
//!
//! let mut minimizer = Minimizer::builder(&problem, method, vec![3.0, -4.0])
//!     .with_settings(settings)
//!     .build()
//!     .expect("problem does not satisfy the method");
//!
//! let minimum = minimizer.run();
//!
//! assert!(minimum.status.is_success());
//! assert!(minimum.location.x.norm() < 1e-3);
//! ```
//!
//! When several stopping conditions hold at once, the reported status is
//! deterministic: thresholds are checked before the stagnation rule, which
//! is checked before the budget caps. See [`Status`] for the closed set of
//! terminal reasons.
//!
//! ## License
//!
//! Licensed under MIT.

mod convergence;
mod core;
pub mod driver;
pub mod recorder;
pub mod settings;

pub use core::*;
pub use driver::{minimize, Minimizer, MinimizerBuilder};
pub use recorder::{LogRecorder, RecordKind, Recorder};
pub use settings::{FunctionConverge, InitialData, Settings};

#[cfg(feature = "testing")]
pub mod testing;

#[cfg(not(feature = "testing"))]
pub(crate) mod testing;

pub use nalgebra;

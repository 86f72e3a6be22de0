//! High-level API for running the optimization process.
//!
//! This module contains the driver that encapsulates all internal state of
//! the iteration process: it asks the [`Method`] what to do next, fulfills
//! evaluation requests through the [`Problem`], checks convergence after each
//! major iteration and assembles the final [`Minimum`].
//!
//! The simplest way of running a method is the [`minimize`] function, which
//! uses the default settings:
//!
//! ```rust
//! use minim::nalgebra as na;
//! use minim::{minimize, Location, Method, Problem, Request, Settings, Status};
//! use na::{Dyn, OVector};
//!
//! // A method that keeps re-announcing the current point as the candidate.
//! struct Stay;
//!
//! impl Method<f64> for Stay {
//!     const NAME: &'static str = "Stay";
//!     type Error = std::convert::Infallible;
//!
//!     fn init(&mut self, _loc: &mut Location<f64>) -> Result<Request, Self::Error> {
//!         Ok(Request::MajorIteration)
//!     }
//!
//!     fn next(&mut self, _loc: &mut Location<f64>) -> Result<Request, Self::Error> {
//!         Ok(Request::MajorIteration)
//!     }
//! }
//!
//! let problem = Problem::new(|x: &OVector<f64, Dyn>| x.norm_squared());
//! let minimum = minimize(&problem, Stay, vec![1.0, -1.0]).unwrap();
//!
//! // The point never improves, so the stagnation rule stops the run.
//! assert!(matches!(minimum.status, Status::FunctionConvergence));
//! ```
//!
//! If you need to specify additional settings or attach a recorder, use the
//! builder:
//!
//! ```rust
//! # use minim::nalgebra as na;
//! # use minim::{Location, Method, Problem, Request, Status};
//! # use na::{Dyn, OVector};
//! #
//! # struct Stay;
//! #
//! # impl Method<f64> for Stay {
//! #     const NAME: &'static str = "Stay";
//! #     type Error = std::convert::Infallible;
//! #
//! #     fn init(&mut self, _loc: &mut Location<f64>) -> Result<Request, Self::Error> {
//! #         Ok(Request::MajorIteration)
//! #     }
//! #
//! #     fn next(&mut self, _loc: &mut Location<f64>) -> Result<Request, Self::Error> {
//! #         Ok(Request::MajorIteration)
//! #     }
//! # }
//! use minim::{LogRecorder, Minimizer, Settings};
//!
//! let problem = Problem::new(|x: &OVector<f64, Dyn>| x.norm_squared());
//!
//! let mut settings = Settings::default();
//! settings.set_major_iterations(10).set_function_converge(None);
//!
//! let mut minimizer = Minimizer::builder(&problem, Stay, vec![1.0, -1.0])
//!     .with_settings(settings)
//!     .with_recorder(LogRecorder)
//!     .build()
//!     .unwrap();
//!
//! let minimum = minimizer.run();
//! assert!(matches!(minimum.status, Status::IterationLimit));
//! assert_eq!(minimum.stats.major_iterations, 10);
//! ```

use std::time::Instant;

use log::debug;
use nalgebra::{DimName, Dyn, OVector, RealField, U1};

use crate::convergence::Checker;
use crate::core::{
    ConfigError, Evaluation, Failure, Location, Method, Minimum, Problem, Request, Stats, Status,
};
use crate::recorder::{RecordKind, Recorder};
use crate::settings::Settings;

/// Builder for the [`Minimizer`].
pub struct MinimizerBuilder<'a, T: RealField + Copy, M> {
    problem: &'a Problem<'a, T>,
    method: M,
    x0: OVector<T, Dyn>,
    settings: Settings<T>,
    recorder: Option<Box<dyn Recorder<T> + 'a>>,
}

impl<'a, T: RealField + Copy, M: Method<T>> MinimizerBuilder<'a, T, M> {
    /// Sets the settings of the run.
    pub fn with_settings(mut self, settings: Settings<T>) -> Self {
        self.settings = settings;
        self
    }

    /// Attaches a recorder receiving snapshots of the iteration process.
    pub fn with_recorder<R>(mut self, recorder: R) -> Self
    where
        R: Recorder<T> + 'a,
    {
        self.recorder = Some(Box::new(recorder));
        self
    }

    /// Builds the [`Minimizer`].
    ///
    /// Fails if the problem does not provide a callable that the method
    /// declares it needs. This is checked once, here, never mid-run.
    pub fn build(self) -> Result<Minimizer<'a, T, M>, ConfigError> {
        self.problem.satisfies(self.method.needs())?;

        Ok(Minimizer {
            problem: self.problem,
            method: self.method,
            x0: self.x0,
            settings: self.settings,
            recorder: self.recorder,
        })
    }
}

/// The driver for the optimization process.
///
/// The driver owns the iteration loop: it alternates between consulting the
/// method and fulfilling its requests, checks convergence at every major
/// iteration and stops with a terminal [`Status`]. See [module](self)
/// documentation for usage.
pub struct Minimizer<'a, T: RealField + Copy, M> {
    problem: &'a Problem<'a, T>,
    method: M,
    x0: OVector<T, Dyn>,
    settings: Settings<T>,
    recorder: Option<Box<dyn Recorder<T> + 'a>>,
}

impl<'a, T: RealField + Copy, M: Method<T>> Minimizer<'a, T, M> {
    /// Returns the builder for specifying additional settings.
    ///
    /// The initial point must not be empty.
    pub fn builder(
        problem: &'a Problem<'a, T>,
        method: M,
        x0: Vec<T>,
    ) -> MinimizerBuilder<'a, T, M> {
        assert!(!x0.is_empty(), "empty initial point");

        let dim = Dyn(x0.len());
        let x0 = OVector::from_vec_generic(dim, U1::name(), x0);

        MinimizerBuilder {
            problem,
            method,
            x0,
            settings: Settings::default(),
            recorder: None,
        }
    }

    /// Returns the name of the used method.
    pub fn name(&self) -> &str {
        M::NAME
    }

    /// Runs the iteration process until a stopping condition is reached.
    ///
    /// Every run-time failure is absorbed into the terminal
    /// [`Status`](Minimum::status); the returned [`Minimum`] always carries
    /// the statistics and the (fully populated) location collected so far.
    /// Each call starts a fresh run from the initial point.
    pub fn run(&mut self) -> Minimum<T> {
        let start = Instant::now();
        let mut stats = Stats::default();
        let mut location = Location::new(self.x0.clone_owned(), self.method.needs());
        let mut last_eval = Evaluation::NONE;

        debug!("starting {} in dimension {}", M::NAME, location.dim());

        let mut status = self.iterate(start, &mut location, &mut stats, &mut last_eval);

        // The final location must hold every field the run was using, so
        // issue one last complement evaluation if anything is stale.
        let fill = last_eval.complement(&location);
        if !fill.is_empty() {
            if let Err(failure) = self.problem.evaluate(fill, &mut location, &mut stats) {
                if !status.is_failure() {
                    status = Status::Failure(failure);
                }
            }
        }

        stats.runtime = start.elapsed();
        self.record(RecordKind::PostIteration, &location, &stats);

        debug!(
            "{} terminated after {} major iterations: {}",
            M::NAME,
            stats.major_iterations,
            status
        );

        Minimum {
            location,
            stats,
            status,
        }
    }

    fn iterate(
        &mut self,
        start: Instant,
        loc: &mut Location<T>,
        stats: &mut Stats,
        last_eval: &mut Evaluation,
    ) -> Status {
        let seeded = self.seed(loc);
        let fill = seeded.complement(loc);

        // Seeded fields count as fulfilled so they are never re-evaluated
        // at termination.
        *last_eval = seeded | fill;

        if !fill.is_empty() {
            if let Err(failure) = self.problem.evaluate(fill, loc, stats) {
                return Status::Failure(failure);
            }
        }

        let mut checker = Checker::new(self.settings.function_converge().cloned(), loc.fx);

        stats.runtime = start.elapsed();
        self.record(RecordKind::InitIteration, loc, stats);

        let mut request = match self.method.init(loc) {
            Ok(request) => request,
            Err(error) => return Status::Failure(Failure::Method(Box::new(error))),
        };

        loop {
            match request {
                Request::Evaluation(eval) => {
                    if eval.is_empty() {
                        return Status::Failure(Failure::EmptyEvaluation);
                    }

                    *last_eval = eval;

                    if let Err(failure) = self.problem.evaluate(eval, loc, stats) {
                        return Status::Failure(failure);
                    }
                }
                Request::MajorIteration => {
                    stats.major_iterations += 1;
                    stats.runtime = start.elapsed();

                    if let Some(status) = checker.check(loc, stats, &self.settings) {
                        return status;
                    }

                    self.record(RecordKind::MajorIteration, loc, stats);
                }
            }

            request = match self.method.next(loc) {
                Ok(request) => request,
                Err(error) => return Status::Failure(Failure::Method(Box::new(error))),
            };
        }
    }

    /// Copies pre-supplied initial data into the location, returning the set
    /// of fields that were seeded. No evaluation counter is touched.
    fn seed(&self, loc: &mut Location<T>) -> Evaluation {
        let mut seeded = Evaluation::NONE;

        let init = match self.settings.initial() {
            Some(init) => init,
            None => return seeded,
        };

        loc.fx = init.value();
        seeded |= Evaluation::FUNCTION;

        if let (Some(buffer), Some(gradient)) = (loc.gradient.as_mut(), init.gradient()) {
            buffer.copy_from(gradient);
            seeded |= Evaluation::GRADIENT;
        }

        if let (Some(buffer), Some(hessian)) = (loc.hessian.as_mut(), init.hessian()) {
            buffer.copy_from(hessian);
            seeded |= Evaluation::HESSIAN;
        }

        seeded
    }

    fn record(&mut self, kind: RecordKind, loc: &Location<T>, stats: &Stats) {
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.record(kind, loc, stats);
        }
    }
}

/// Runs the method on the problem from the given initial point with the
/// default [`Settings`].
///
/// This is a convenience wrapper around the [`Minimizer::builder`] API.
pub fn minimize<'a, T: RealField + Copy, M: Method<T>>(
    problem: &'a Problem<'a, T>,
    method: M,
    x0: Vec<T>,
) -> Result<Minimum<T>, ConfigError> {
    Minimizer::builder(problem, method, x0)
        .build()
        .map(|mut minimizer| minimizer.run())
}

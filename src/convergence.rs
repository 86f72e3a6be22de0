//! Convergence decisions for the driver.
//!
//! The checker is consulted once per major iteration, never per raw
//! evaluation request. Its checks are not mutually exclusive, so they are
//! applied in a fixed priority order and the first satisfied one wins:
//! function threshold, gradient threshold, stagnation, iteration cap,
//! runtime cap, evaluation caps. External aborts outrank all of these, but
//! they are surfaced at evaluation time by the problem adapter and therefore
//! never reach the checker.

use std::time::Duration;

use nalgebra::{convert, RealField};

use crate::core::{Location, Stats, Status};
use crate::settings::{FunctionConverge, Settings};

/// Convergence state carried between major iterations: the running best
/// function value and the current stagnation streak.
pub(crate) struct Checker<T: RealField + Copy> {
    rule: Option<FunctionConverge<T>>,
    best: T,
    streak: usize,
}

impl<T: RealField + Copy> Checker<T> {
    /// Creates the checker with the function value at the initial location as
    /// the running best.
    pub(crate) fn new(rule: Option<FunctionConverge<T>>, initial: T) -> Self {
        Self {
            rule,
            best: initial,
            streak: 0,
        }
    }

    /// Decides whether the run terminates at this major iteration and with
    /// which status. Returns `None` to continue.
    pub(crate) fn check(
        &mut self,
        loc: &Location<T>,
        stats: &Stats,
        settings: &Settings<T>,
    ) -> Option<Status> {
        if loc.fx <= settings.function_threshold() {
            return Some(Status::FunctionThreshold);
        }

        if let Some(gradient) = &loc.gradient {
            let zero: T = convert(0.0);
            let norm = gradient.iter().fold(zero, |acc, g| acc.max(g.abs()));

            if norm <= settings.gradient_threshold() {
                return Some(Status::GradientThreshold);
            }
        }

        if self.stagnated(loc.fx) {
            return Some(Status::FunctionConvergence);
        }

        let iterations = settings.major_iterations();
        if iterations > 0 && stats.major_iterations >= iterations {
            return Some(Status::IterationLimit);
        }

        let runtime = settings.runtime();
        if runtime > Duration::ZERO && stats.runtime > runtime {
            return Some(Status::RuntimeLimit);
        }

        let func = settings.func_evaluations();
        if func > 0 && stats.func_evaluations >= func {
            return Some(Status::FunctionEvaluationLimit);
        }

        let grad = settings.grad_evaluations();
        if grad > 0 && stats.grad_evaluations >= grad {
            return Some(Status::GradientEvaluationLimit);
        }

        let hess = settings.hess_evaluations();
        if hess > 0 && stats.hess_evaluations >= hess {
            return Some(Status::HessianEvaluationLimit);
        }

        None
    }

    /// Applies the stagnation rule to a new function value. A significant
    /// decrease updates the running best and resets the streak; otherwise the
    /// streak grows and the rule fires exactly when it reaches the window.
    fn stagnated(&mut self, fx: T) -> bool {
        let rule = match &self.rule {
            Some(rule) if rule.iterations > 0 => rule,
            _ => return false,
        };

        let max_abs = fx.abs().max(self.best.abs());

        if fx < self.best && self.best - fx > rule.relative * max_abs + rule.absolute {
            self.best = fx;
            self.streak = 0;
            return false;
        }

        self.streak += 1;
        self.streak == rule.iterations
    }
}

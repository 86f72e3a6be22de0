//! Testing objectives and utilities useful for benchmarking, debugging and
//! smoke testing.
//!
//! [`Sphere`] is recommended for first tests; [`Rosenbrock`] for conditions
//! where the minimum sits in a narrow curved valley. Both come with analytic
//! derivatives so the full evaluation protocol can be exercised.
//! [`GradientDescent`] is a deliberately simple method driving that protocol
//! end to end; it is a test fixture, not a recommendation.
//!
//! # References
//!
//! \[1\] [A Literature Survey of Benchmark Functions For Global Optimization
//! Problems](https://arxiv.org/abs/1308.4008)
//!
//! \[2\] [Numerical Methods for Unconstrained Optimization and Nonlinear
//! Equations](https://epubs.siam.org/doi/book/10.1137/1.9781611971200)

#![allow(unused)]

use std::convert::Infallible;

use nalgebra::{DimName, Dyn, OMatrix, OVector, U1};

use crate::core::{Evaluation, Location, Method, Needs, Problem, Request};

/// Sphere function: the sum of squares of all variables.
///
/// The global minimum is 0 at the origin. Smooth, convex and separable; any
/// sane combination of method and settings should handle it.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    n: usize,
}

impl Sphere {
    /// Initializes the function with given dimension.
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "n must be greater than zero");
        Self { n }
    }

    /// Computes the function value.
    pub fn value(&self, x: &OVector<f64, Dyn>) -> f64 {
        debug_assert_eq!(x.nrows(), self.n);
        x.norm_squared()
    }

    /// Computes the gradient in place.
    pub fn gradient(&self, x: &OVector<f64, Dyn>, gradient: &mut OVector<f64, Dyn>) {
        gradient.copy_from(x);
        *gradient *= 2.0;
    }

    /// Computes the Hessian in place.
    pub fn hessian(&self, x: &OVector<f64, Dyn>, hessian: &mut OMatrix<f64, Dyn, Dyn>) {
        hessian.fill(0.0);
        hessian.fill_diagonal(2.0);
    }

    /// Bundles the function and its derivatives into a [`Problem`].
    pub fn problem(&self) -> Problem<'_, f64> {
        Problem::new(move |x: &OVector<f64, Dyn>| self.value(x))
            .with_gradient(move |x, gradient| self.gradient(x, gradient))
            .with_hessian(move |x, hessian| self.hessian(x, hessian))
    }

    /// Standard initial points for the function. Using the same initial
    /// points is essential for fair comparison of methods.
    pub fn initials(&self) -> Vec<OVector<f64, Dyn>> {
        vec![
            OVector::from_element_generic(Dyn(self.n), U1::name(), 10.0),
            OVector::from_element_generic(Dyn(self.n), U1::name(), -5.0),
        ]
    }
}

/// [Rosenbrock function](https://en.wikipedia.org/wiki/Rosenbrock_function)
/// \[1,2\] in two dimensions (also known as Rosenbrock's valley or banana
/// function).
///
/// The global minimum is 0 at (a, a²), inside a long, narrow, parabolic
/// shaped flat valley.
#[derive(Debug, Clone, Copy)]
pub struct Rosenbrock {
    a: f64,
    b: f64,
}

impl Rosenbrock {
    /// Initializes the function with given parameters. The classic choice is
    /// `a = 1`, `b = 100`.
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// Computes the function value.
    pub fn value(&self, x: &OVector<f64, Dyn>) -> f64 {
        debug_assert_eq!(x.nrows(), 2);
        (self.a - x[0]).powi(2) + self.b * (x[1] - x[0].powi(2)).powi(2)
    }

    /// Computes the gradient in place.
    pub fn gradient(&self, x: &OVector<f64, Dyn>, gradient: &mut OVector<f64, Dyn>) {
        gradient[0] = -2.0 * (self.a - x[0]) - 4.0 * self.b * x[0] * (x[1] - x[0].powi(2));
        gradient[1] = 2.0 * self.b * (x[1] - x[0].powi(2));
    }

    /// Computes the Hessian in place.
    pub fn hessian(&self, x: &OVector<f64, Dyn>, hessian: &mut OMatrix<f64, Dyn, Dyn>) {
        hessian[(0, 0)] = 2.0 - 4.0 * self.b * x[1] + 12.0 * self.b * x[0].powi(2);
        hessian[(0, 1)] = -4.0 * self.b * x[0];
        hessian[(1, 0)] = -4.0 * self.b * x[0];
        hessian[(1, 1)] = 2.0 * self.b;
    }

    /// Bundles the function and its derivatives into a [`Problem`].
    pub fn problem(&self) -> Problem<'_, f64> {
        Problem::new(move |x: &OVector<f64, Dyn>| self.value(x))
            .with_gradient(move |x, gradient| self.gradient(x, gradient))
            .with_hessian(move |x, hessian| self.hessian(x, hessian))
    }

    /// Standard initial points for the function.
    pub fn initials(&self) -> Vec<OVector<f64, Dyn>> {
        vec![
            OVector::from_vec_generic(Dyn(2), U1::name(), vec![-1.2, 1.0]),
            OVector::from_vec_generic(Dyn(2), U1::name(), vec![6.39, -0.221]),
        ]
    }
}

/// Fixed-step gradient descent.
///
/// Alternates between stepping against the gradient (requesting fresh values
/// at the new point) and announcing the stepped point as a candidate. Useful
/// for exercising the request protocol; do not expect it to be a good
/// optimizer.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    step: f64,
    fresh: bool,
}

impl GradientDescent {
    /// Initializes the method with given step size.
    pub fn new(step: f64) -> Self {
        assert!(step > 0.0, "step must be positive");

        Self { step, fresh: false }
    }

    fn take_step(&self, loc: &mut Location<f64>) -> Request {
        let Location { x, gradient, .. } = loc;

        if let Some(gradient) = gradient {
            x.axpy(-self.step, gradient, 1.0);
        }

        Request::Evaluation(Evaluation::FUNCTION | Evaluation::GRADIENT)
    }
}

impl Method<f64> for GradientDescent {
    const NAME: &'static str = "Gradient descent";
    type Error = Infallible;

    fn init(&mut self, loc: &mut Location<f64>) -> Result<Request, Self::Error> {
        self.fresh = true;
        Ok(self.take_step(loc))
    }

    fn next(&mut self, loc: &mut Location<f64>) -> Result<Request, Self::Error> {
        if self.fresh {
            self.fresh = false;
            Ok(Request::MajorIteration)
        } else {
            self.fresh = true;
            Ok(self.take_step(loc))
        }
    }

    fn needs(&self) -> Needs {
        Needs {
            gradient: true,
            hessian: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::dvector;

    fn finite_difference_gradient<F>(f: F, x: &OVector<f64, Dyn>) -> OVector<f64, Dyn>
    where
        F: Fn(&OVector<f64, Dyn>) -> f64,
    {
        let eps = 1e-7;
        let mut gradient = x.clone_owned();

        for i in 0..x.nrows() {
            let mut fwd = x.clone_owned();
            let mut bwd = x.clone_owned();
            fwd[i] += eps;
            bwd[i] -= eps;
            gradient[i] = (f(&fwd) - f(&bwd)) / (2.0 * eps);
        }

        gradient
    }

    #[test]
    fn sphere_gradient_matches_finite_difference() {
        let f = Sphere::new(3);
        let x = dvector![1.0, -2.0, 0.5];

        let mut gradient = x.clone_owned();
        f.gradient(&x, &mut gradient);

        let expected = finite_difference_gradient(|x| f.value(x), &x);
        assert_relative_eq!(gradient, expected, epsilon = 1e-5);
    }

    #[test]
    fn rosenbrock_gradient_matches_finite_difference() {
        let f = Rosenbrock::new(1.0, 100.0);

        for x in f.initials() {
            let mut gradient = x.clone_owned();
            f.gradient(&x, &mut gradient);

            let expected = finite_difference_gradient(|x| f.value(x), &x);
            assert_relative_eq!(gradient, expected, epsilon = 1e-3);
        }
    }

    #[test]
    fn rosenbrock_minimum_value() {
        let f = Rosenbrock::new(1.0, 100.0);
        let minimum = dvector![1.0, 1.0];

        assert_eq!(f.value(&minimum), 0.0);

        let mut gradient = minimum.clone_owned();
        f.gradient(&minimum, &mut gradient);
        assert_eq!(gradient, dvector![0.0, 0.0]);
    }
}

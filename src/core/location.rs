use std::ops::{BitOr, BitOrAssign};

use nalgebra::{convert, DimName, Dyn, OMatrix, OVector, RealField, U1};

use super::method::Needs;

/// A location visited during the optimization process.
///
/// The point `x` is always meaningful. The remaining fields hold whatever has
/// been evaluated at `x` so far: `fx` is valid only after a function
/// evaluation, and the `gradient` and `hessian` slots are `Some` only when the
/// run uses that kind of derivative information. Readers must not assume a
/// field is fresh unless the corresponding [`Evaluation`] flag was fulfilled
/// since `x` last changed.
///
/// The buffers are allocated once per run and reused across iterations. A
/// consumer that retains data from a location across iterations must copy it
/// explicitly, because later evaluations write into the same storage.
#[derive(Debug, Clone)]
pub struct Location<T: RealField + Copy> {
    /// The candidate point.
    pub x: OVector<T, Dyn>,
    /// Objective function value at `x`.
    pub fx: T,
    /// Gradient of the objective at `x`, if the run uses gradients.
    pub gradient: Option<OVector<T, Dyn>>,
    /// Hessian of the objective at `x` (symmetric by convention), if the run
    /// uses second derivatives.
    pub hessian: Option<OMatrix<T, Dyn, Dyn>>,
}

impl<T: RealField + Copy> Location<T> {
    /// Creates a location at the given point with derivative slots allocated
    /// according to `needs`.
    pub fn new(x: OVector<T, Dyn>, needs: Needs) -> Self {
        let dim = x.nrows();

        Self {
            x,
            fx: convert(f64::INFINITY),
            gradient: needs
                .gradient
                .then(|| OVector::zeros_generic(Dyn(dim), U1::name())),
            hessian: needs
                .hessian
                .then(|| OMatrix::zeros_generic(Dyn(dim), Dyn(dim))),
        }
    }

    /// Returns the dimensionality of the point.
    pub fn dim(&self) -> usize {
        self.x.nrows()
    }
}

/// A set of evaluation flags, drawn from {function, gradient, Hessian}.
///
/// Flags are combined with the `|` operator:
///
/// ```rust
/// use minim::Evaluation;
///
/// let eval = Evaluation::FUNCTION | Evaluation::GRADIENT;
/// assert!(eval.function() && eval.gradient() && !eval.hessian());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    function: bool,
    gradient: bool,
    hessian: bool,
}

impl Evaluation {
    /// The empty set.
    pub const NONE: Self = Self {
        function: false,
        gradient: false,
        hessian: false,
    };

    /// Evaluation of the objective function value.
    pub const FUNCTION: Self = Self {
        function: true,
        gradient: false,
        hessian: false,
    };

    /// Evaluation of the gradient.
    pub const GRADIENT: Self = Self {
        function: false,
        gradient: true,
        hessian: false,
    };

    /// Evaluation of the Hessian.
    pub const HESSIAN: Self = Self {
        function: false,
        gradient: false,
        hessian: true,
    };

    /// Whether the function value is requested.
    pub fn function(&self) -> bool {
        self.function
    }

    /// Whether the gradient is requested.
    pub fn gradient(&self) -> bool {
        self.gradient
    }

    /// Whether the Hessian is requested.
    pub fn hessian(&self) -> bool {
        self.hessian
    }

    /// Whether no evaluation is requested at all.
    pub fn is_empty(&self) -> bool {
        !self.function && !self.gradient && !self.hessian
    }

    /// Computes the complement of this set with respect to the fields the
    /// driver keeps current in `loc`: the function value always, and a
    /// derivative only when its slot exists in the location.
    ///
    /// Given the set of evaluations just fulfilled, the returned set contains
    /// exactly the missing fields. A field present in `self` is never part of
    /// the complement, so fresh values are never re-evaluated.
    pub fn complement<T: RealField + Copy>(self, loc: &Location<T>) -> Evaluation {
        Evaluation {
            function: !self.function,
            gradient: loc.gradient.is_some() && !self.gradient,
            hessian: loc.hessian.is_some() && !self.hessian,
        }
    }
}

impl BitOr for Evaluation {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            function: self.function || rhs.function,
            gradient: self.gradient || rhs.gradient,
            hessian: self.hessian || rhs.hessian,
        }
    }
}

impl BitOrAssign for Evaluation {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

/// An action requested by a [`Method`](super::method::Method) from the
/// driver.
///
/// A method either asks for evaluations at the current point or announces
/// that it has produced the next candidate for an optimum and convergence
/// should be checked. The bracketing notifications of a run
/// ([`InitIteration`](crate::RecordKind::InitIteration) and
/// [`PostIteration`](crate::RecordKind::PostIteration)) are emitted by the
/// driver alone and are deliberately not representable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Evaluate the given fields at the current point.
    Evaluation(Evaluation),
    /// The current point is the next candidate for an optimum; check
    /// convergence.
    MajorIteration,
}

#[cfg(test)]
mod tests {
    use super::*;

    use nalgebra::dvector;

    fn gradient_location() -> Location<f64> {
        Location::new(
            dvector![1.0, 2.0],
            Needs {
                gradient: true,
                hessian: false,
            },
        )
    }

    #[test]
    fn complement_never_requests_fresh_fields() {
        let loc = gradient_location();

        let evals = [
            Evaluation::FUNCTION,
            Evaluation::GRADIENT,
            Evaluation::FUNCTION | Evaluation::GRADIENT,
        ];

        for eval in evals {
            let compl = eval.complement(&loc);
            assert!(!(eval.function() && compl.function()));
            assert!(!(eval.gradient() && compl.gradient()));
            assert!(!(eval.hessian() && compl.hessian()));
        }
    }

    #[test]
    fn complement_fills_missing_fields() {
        let loc = gradient_location();

        let compl = Evaluation::GRADIENT.complement(&loc);
        assert_eq!(compl, Evaluation::FUNCTION);

        let compl = Evaluation::NONE.complement(&loc);
        assert_eq!(compl, Evaluation::FUNCTION | Evaluation::GRADIENT);

        let compl = (Evaluation::FUNCTION | Evaluation::GRADIENT).complement(&loc);
        assert!(compl.is_empty());
    }

    #[test]
    fn complement_ignores_absent_slots() {
        let loc = Location::new(dvector![0.0], Needs::default());

        let compl = Evaluation::NONE.complement(&loc);
        assert_eq!(compl, Evaluation::FUNCTION);

        // The Hessian slot does not exist, so it is never owed.
        let compl = Evaluation::FUNCTION.complement(&loc);
        assert!(compl.is_empty());
    }

    #[test]
    fn slots_follow_needs() {
        let loc = gradient_location();
        assert!(loc.gradient.is_some());
        assert!(loc.hessian.is_none());
        assert_eq!(loc.dim(), 2);

        let loc = Location::<f64>::new(
            dvector![0.0, 0.0, 0.0],
            Needs {
                gradient: true,
                hessian: true,
            },
        );
        assert_eq!(loc.gradient.as_ref().map(|g| g.nrows()), Some(3));
        assert_eq!(loc.hessian.as_ref().map(|h| h.nrows()), Some(3));
    }
}

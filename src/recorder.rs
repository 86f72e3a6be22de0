//! Recording of the iteration process.
//!
//! A [`Recorder`] is a write-only sink receiving a snapshot of the location
//! and statistics at the start of a run, after each completed major iteration
//! and at the final location. Recording failures cannot propagate into the
//! optimization result; a recorder that can fail must handle its errors
//! internally.

use log::debug;
use nalgebra::RealField;

use crate::core::{Location, Stats};

/// The kind of snapshot being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// The initial location of a run. All fields of the location are valid.
    InitIteration,
    /// A completed major iteration.
    MajorIteration,
    /// The final location reached during a run. All fields of the location
    /// are valid.
    PostIteration,
}

/// A sink receiving snapshots of the iteration process.
pub trait Recorder<T: RealField + Copy> {
    /// Records one snapshot of the run.
    fn record(&mut self, kind: RecordKind, loc: &Location<T>, stats: &Stats);
}

/// Recorder that emits every snapshot via the [`log`] crate at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRecorder;

impl<T: RealField + Copy> Recorder<T> for LogRecorder {
    fn record(&mut self, kind: RecordKind, loc: &Location<T>, stats: &Stats) {
        debug!(
            "{:?}: f = {:?}, iterations = {}, evaluations = {}/{}/{}",
            kind,
            loc.fx,
            stats.major_iterations,
            stats.func_evaluations,
            stats.grad_evaluations,
            stats.hess_evaluations
        );
    }
}

//! Core abstractions and types for minim.
//!
//! *Users* are mainly interested in constructing a [`Problem`] and running it
//! through the [driver](crate::driver).
//!
//! Methods *developers* are interested in implementing the [`Method`] trait
//! and working with the [`Location`] and [`Request`] protocol types.

mod location;
mod method;
mod problem;
mod report;

pub use location::*;
pub use method::*;
pub use problem::*;
pub use report::*;

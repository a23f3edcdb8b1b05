//! Error classification shared by every calculator in the crate.
//!
//! Each module reports failures through its own `thiserror` enum. All of
//! them can be mapped onto the four categories below, which is what callers
//! presenting errors to an end user usually care about.

use serde::{Deserialize, Serialize};

/// Coarse category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A value was outside its permitted range (fraction, divisor, rate, enum code).
    InvalidArgument,

    /// A monetary string was malformed.
    Parse,

    /// An arithmetic result did not fit in the 64-bit scaled representation.
    Overflow,

    /// The request was incomplete or not valid under regulation.
    Calculation,
}

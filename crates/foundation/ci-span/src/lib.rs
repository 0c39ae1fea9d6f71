//! Source locations
//!
//! Every node of the Ci tree remembers the line it was parsed from. Lines are
//! the only location information the tree carries; columns and byte offsets
//! stay with the front end.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// A 1-based source line number
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[display("line {_0}")]
pub struct Line(pub u32);

impl Line {
    /// Creates a line number
    pub const fn new(line: u32) -> Self {
        Self(line)
    }

    /// Raw line number
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Anything that carries a source line
pub trait HasLine {
    /// Line the node was parsed from
    fn line(&self) -> Line;
}

impl HasLine for Line {
    fn line(&self) -> Line {
        *self
    }
}

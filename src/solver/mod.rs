//! C5/C6: MIP construction and solving.

pub mod backend;
pub mod builder;

pub use backend::{solve, RawSolution};
pub use builder::{build, BuildInput, Problem, Variables};

//! Command handlers invoked by `main`.

pub mod plan;

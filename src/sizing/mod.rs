//! Worker-count sizing.
//!
//! Converts detected resources into a worker count using a
//! threshold-and-clamp formula: the fraction of the memory ceiling
//! considered safe to use, divided by the per-worker footprint, bounded by
//! an optional CPU-based candidate and the policy's min/max.

mod calculator;
mod policy;

pub use calculator::{compute, SizingDecision};
pub use policy::{DeploymentMode, SizingPolicy};

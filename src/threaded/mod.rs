//! Multi-threaded blocked multiply.
//!
//! Wraps the blocked multiply with parallel execution across block-row
//! stripes. Thread count adapts to matrix size: small matrices use fewer
//! threads to avoid overhead.

pub mod blocked_mt;

pub use blocked_mt::multiply_blocked_parallel;

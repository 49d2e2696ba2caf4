//! Service layer for business logic with dependency injection.
//!
//! Services accept trait-based dependencies, enabling testing with mock
//! implementations.

pub mod pipeline;

#[cfg(test)]
mod test_mocks;

pub use pipeline::{Outcome, PipelineService};

//! Generation Coordinator Module
//!
//! Single in-flight generation request with observable state:
//! - `RequestState` sum type (idle, pending, succeeded, failed)
//! - `GenerationCoordinator` with duplicate refusal and stale-result guarding

pub mod dispatch;
pub mod state;

pub use dispatch::{GenerationCoordinator, GenerationToken, Submission};
pub use state::RequestState;

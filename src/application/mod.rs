// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - The boundary between callers (CLI, embedding apps) and the services
// - Applies each operation's failure policy
// - Classifies errors for display

pub mod error_handling;
pub mod synchronizer;


pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use synchronizer::Synchronizer;

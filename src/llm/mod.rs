//! Text generation through a remote language model.

pub mod gateway;
pub mod gemini;
pub mod response;

pub use gateway::{GenerationOptions, ModelGateway, UnconfiguredGateway};
pub use gemini::{DEFAULT_API_BASE, DEFAULT_MODEL, GeminiClient};
pub use response::clean_response;

#[cfg(test)]
pub use gateway::MockModelGateway;

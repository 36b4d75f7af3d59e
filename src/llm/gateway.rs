//! The model gateway seam.

use async_trait::async_trait;

use crate::error::GatewayError;

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    /// Upper bound on generated tokens; `None` leaves it to the service.
    pub max_output_tokens: Option<u32>,
}

impl GenerationOptions {
    pub const fn new(temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            temperature,
            max_output_tokens: Some(max_output_tokens),
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            max_output_tokens: None,
        }
    }
}

/// Sends a prompt to a text-generation service.
///
/// This abstraction allows mocking the remote model in tests. Implementations
/// do not retry; a failed call is returned to the caller as is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Generate text for `prompt` and return it trimmed.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GatewayError>;
}

/// Stand-in used when no credential is configured.
///
/// Every call fails with [`GatewayError::MissingCredential`], so commands
/// still report their own preconditions (such as an empty staged diff) first.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGateway;

#[async_trait]
impl ModelGateway for UnconfiguredGateway {
    async fn generate(
        &self,
        _prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        Err(GatewayError::MissingCredential)
    }
}

pub mod credentials;
pub mod error;
pub mod gemini;

use async_trait::async_trait;

pub use credentials::{CredentialProvider, CredentialRef, EnvCredentialProvider};
pub use error::{GatewayError, GatewayErrorKind};
pub use gemini::GeminiClient;

/// Opaque completion boundary the pipeline depends on: one prompt in,
/// one text completion out, no streaming.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GatewayError>;
}

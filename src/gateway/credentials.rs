use std::env;

use serde::{Deserialize, Serialize};

use crate::gateway::error::{GatewayError, authentication_error, invalid_request};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialRef {
    Env { var: String },
    Inline { key: String },
    None,
}

impl Default for CredentialRef {
    fn default() -> Self {
        Self::Env {
            var: "GEMINI_API_KEY".to_string(),
        }
    }
}

pub trait CredentialProvider: Send + Sync {
    /// Resolves the API key for a request, or `None` for anonymous
    /// backends. A missing required credential is an authentication
    /// error at call time, which the stages then degrade on.
    fn resolve(&self, reference: &CredentialRef) -> Result<Option<String>, GatewayError>;
}

#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl CredentialProvider for EnvCredentialProvider {
    fn resolve(&self, reference: &CredentialRef) -> Result<Option<String>, GatewayError> {
        match reference {
            CredentialRef::Env { var } => {
                let key = env::var(var).map_err(|_| {
                    authentication_error(format!("missing credential environment variable {var}"))
                })?;
                if key.trim().is_empty() {
                    return Err(authentication_error(format!(
                        "credential environment variable {var} is empty"
                    )));
                }
                Ok(Some(key))
            }
            CredentialRef::Inline { key } => {
                if key.trim().is_empty() {
                    return Err(invalid_request("inline credential key cannot be empty"));
                }
                Ok(Some(key.clone()))
            }
            CredentialRef::None => Ok(None),
        }
    }
}

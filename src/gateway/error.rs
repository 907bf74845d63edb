use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    Network,
    Authentication,
    RateLimited,
    InvalidRequest,
    Protocol,
    Internal,
}

/// Failure of one completion round-trip. The pipeline stages never let
/// this escape; they degrade to a fallback value and keep the message
/// for the `error` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for GatewayError {}

pub fn network_error(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::Network, message)
}

pub fn authentication_error(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::Authentication, message)
}

pub fn rate_limited(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::RateLimited, message)
}

pub fn invalid_request(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::InvalidRequest, message)
}

pub fn protocol_error(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::Protocol, message)
}

pub fn internal_error(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::Internal, message)
}

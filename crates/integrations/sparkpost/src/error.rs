use thiserror::Error;

/// Errors surfaced by a `SparkPost` delivery.
///
/// Every failure reaches the caller of
/// [`SparkPostDelivery::deliver`](crate::SparkPostDelivery::deliver); nothing
/// is retried or recovered internally.
#[derive(Debug, Error)]
pub enum SparkPostError {
    /// `SparkPost` answered with a non-null `errors` field. The value is kept
    /// exactly as received.
    #[error("SparkPost rejected the transmission: {0}")]
    Rejected(serde_json::Value),

    /// The HTTP request could not be built, sent, or its body read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("malformed SparkPost response (HTTP {status}): {source}")]
    MalformedResponse {
        /// HTTP status code of the response.
        status: u16,
        /// The JSON parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The outgoing message cannot be mapped onto a transmission.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The adapter was given unusable configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl SparkPostError {
    /// The provider's `errors` payload, if this is a rejection.
    pub fn provider_errors(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Rejected(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = SparkPostError::Rejected(serde_json::json!([{"message": "bad address"}]));
        assert_eq!(
            err.to_string(),
            r#"SparkPost rejected the transmission: [{"message":"bad address"}]"#
        );

        let err = SparkPostError::InvalidMessage("multipart message has no text part".into());
        assert_eq!(
            err.to_string(),
            "invalid message: multipart message has no text part"
        );

        let err = SparkPostError::Configuration("api_key must not be empty".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: api_key must not be empty"
        );
    }

    #[test]
    fn malformed_response_keeps_status_and_source() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = SparkPostError::MalformedResponse {
            status: 502,
            source,
        };
        assert!(err.to_string().starts_with("malformed SparkPost response (HTTP 502)"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn provider_errors_only_for_rejections() {
        let errors = serde_json::json!([{"code": "1902"}]);
        let err = SparkPostError::Rejected(errors.clone());
        assert_eq!(err.provider_errors(), Some(&errors));

        let err = SparkPostError::InvalidMessage("x".into());
        assert!(err.provider_errors().is_none());
    }
}

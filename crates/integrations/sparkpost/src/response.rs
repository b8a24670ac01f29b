use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::SparkPostError;

/// Status and body of the HTTP response to a transmission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, as received.
    pub body: String,
}

impl RawResponse {
    /// Build a response from its status code and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// How `SparkPost` answered a transmission.
///
/// Decided only by the presence of an `errors` key in the response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The `results` value, or `Value::Null` when the body had none.
    Success(Value),
    /// The `errors` value, verbatim.
    Failure(Value),
}

impl DeliveryOutcome {
    /// Returns `true` for [`DeliveryOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The transmission ID `SparkPost` assigned, if the outcome carries one.
    pub fn transmission_id(&self) -> Option<&str> {
        match self {
            Self::Success(results) => results.get("id").and_then(Value::as_str),
            Self::Failure(_) => None,
        }
    }

    /// Convert into a `Result`, mapping a failure to [`SparkPostError::Rejected`].
    pub fn into_result(self) -> Result<Value, SparkPostError> {
        match self {
            Self::Success(results) => Ok(results),
            Self::Failure(errors) => Err(SparkPostError::Rejected(errors)),
        }
    }
}

/// Classify a transmission response.
///
/// The HTTP status is not consulted: a body with a truthy `errors` field is a
/// [`DeliveryOutcome::Failure`], anything else is a
/// [`DeliveryOutcome::Success`]. A body that is not a JSON object yields
/// [`SparkPostError::MalformedResponse`].
///
/// ```
/// use courier_sparkpost::{DeliveryOutcome, RawResponse, interpret};
///
/// let raw = RawResponse::new(200, r#"{"results": {"id": "123"}}"#);
/// let outcome = interpret(&raw).unwrap();
/// assert_eq!(outcome, DeliveryOutcome::Success(serde_json::json!({"id": "123"})));
/// ```
pub fn interpret(raw: &RawResponse) -> Result<DeliveryOutcome, SparkPostError> {
    let mut parsed: Map<String, Value> =
        serde_json::from_str(&raw.body).map_err(|source| SparkPostError::MalformedResponse {
            status: raw.status,
            source,
        })?;

    if let Some(errors) = parsed.remove("errors").filter(is_truthy) {
        warn!(status = raw.status, "SparkPost returned errors");
        return Ok(DeliveryOutcome::Failure(errors));
    }

    if !(200..300).contains(&raw.status) {
        warn!(
            status = raw.status,
            "non-success HTTP status without an errors field"
        );
    }

    let results = parsed.remove("results").unwrap_or(Value::Null);
    debug!(status = raw.status, "SparkPost accepted the transmission");
    Ok(DeliveryOutcome::Success(results))
}

/// `null` and `false` do not count as an `errors` value.
fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

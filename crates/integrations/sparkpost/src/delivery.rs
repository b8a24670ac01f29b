use tracing::{debug, info, instrument, warn};

use crate::config::SparkPostConfig;
use crate::error::SparkPostError;
use crate::message::OutgoingMessage;
use crate::response::{DeliveryOutcome, RawResponse, interpret};
use crate::translate::translate;
use crate::transport::{HttpTransport, TransmissionTransport};
use crate::types::Transmission;

/// Everything one delivery produced, for diagnostics.
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    /// The payload that was sent.
    pub data: Transmission,
    /// The raw HTTP response.
    pub response: RawResponse,
    /// How the response was classified.
    pub outcome: DeliveryOutcome,
}

/// Delivers [`OutgoingMessage`]s through the `SparkPost` Transmissions API.
///
/// Holds only immutable state, so a single instance can serve concurrent
/// deliveries; each call translates, sends and interprets independently.
///
/// # Examples
///
/// ```no_run
/// use courier_sparkpost::{SparkPostConfig, SparkPostDelivery};
///
/// let delivery = SparkPostDelivery::new(SparkPostConfig::new("your-api-key")).unwrap();
/// assert!(!delivery.settings().track_opens);
/// ```
pub struct SparkPostDelivery {
    config: SparkPostConfig,
    transport: Box<dyn TransmissionTransport>,
}

impl std::fmt::Debug for SparkPostDelivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparkPostDelivery")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .finish()
    }
}

impl SparkPostDelivery {
    /// Create a delivery method that talks HTTPS to the configured endpoint.
    ///
    /// Returns [`SparkPostError::Configuration`] if the configuration is
    /// unusable or the HTTP client cannot be built.
    pub fn new(config: SparkPostConfig) -> Result<Self, SparkPostError> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self {
            config,
            transport: Box::new(transport),
        })
    }

    /// Create a delivery method with a pre-built transport (for testing).
    pub fn with_transport(
        config: SparkPostConfig,
        transport: Box<dyn TransmissionTransport>,
    ) -> Result<Self, SparkPostError> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    /// The settings this delivery method was built with.
    pub fn settings(&self) -> &SparkPostConfig {
        &self.config
    }

    /// Send `message` and classify `SparkPost`'s answer.
    ///
    /// A provider-side rejection is returned as [`DeliveryOutcome::Failure`];
    /// use [`DeliveryOutcome::into_result`] to turn it into an error instead.
    pub async fn deliver(
        &self,
        message: &OutgoingMessage,
    ) -> Result<DeliveryOutcome, SparkPostError> {
        self.deliver_with_report(message)
            .await
            .map(|report| report.outcome)
    }

    /// Like [`deliver`](Self::deliver), but also returns the payload and raw
    /// response.
    #[instrument(skip_all, fields(recipients = message.to.len()))]
    pub async fn deliver_with_report(
        &self,
        message: &OutgoingMessage,
    ) -> Result<DeliveryReport, SparkPostError> {
        let data = translate(message, &self.config)?;

        debug!(subject = %message.subject, "sending transmission");
        let response = self.transport.send(&data, &self.config.api_key).await?;
        let outcome = interpret(&response)?;

        match &outcome {
            DeliveryOutcome::Success(_) => info!(
                status = response.status,
                transmission_id = outcome.transmission_id().unwrap_or_default(),
                "transmission accepted"
            ),
            DeliveryOutcome::Failure(errors) => warn!(
                status = response.status,
                errors = %errors,
                "transmission rejected"
            ),
        }

        Ok(DeliveryReport {
            data,
            response,
            outcome,
        })
    }
}

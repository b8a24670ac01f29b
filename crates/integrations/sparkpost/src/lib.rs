//! `SparkPost` transmission adapter for Courier.
//!
//! Converts an [`OutgoingMessage`] into the JSON body expected by the
//! [SparkPost Transmissions API](https://developers.sparkpost.com/api/transmissions/),
//! submits it, and classifies the reply as a [`DeliveryOutcome`].
//!
//! # Quick start
//!
//! ```rust,no_run
//! use courier_sparkpost::{MessageBody, OutgoingMessage, SparkPostConfig, SparkPostDelivery};
//!
//! # async fn run() -> Result<(), courier_sparkpost::SparkPostError> {
//! let config = SparkPostConfig::new("your-api-key")
//!     .with_track_opens(true)
//!     .with_campaign_id("spring-promo");
//! let delivery = SparkPostDelivery::new(config)?;
//!
//! let message = OutgoingMessage::new(
//!     "Shop <shop@example.com>".parse()?,
//!     "Your order has shipped",
//!     MessageBody::multipart("It's on its way.", "<p>It's on its way.</p>"),
//! )
//! .with_recipient("Alice <alice@example.com>".parse()?);
//!
//! let results = delivery.deliver(&message).await?.into_result()?;
//! println!("accepted: {results}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod delivery;
pub mod error;
pub mod message;
pub mod response;
pub mod translate;
pub mod transport;
pub mod types;

pub use config::SparkPostConfig;
pub use delivery::{DeliveryReport, SparkPostDelivery};
pub use error::SparkPostError;
pub use message::{BodyPart, Mailbox, MessageBody, OutgoingMessage};
pub use response::{DeliveryOutcome, RawResponse, interpret};
pub use translate::{cleanse_encoding, translate};
pub use transport::{HttpTransport, TransmissionTransport};
pub use types::{
    Transmission, TransmissionAddress, TransmissionContent, TransmissionOptions,
    TransmissionRecipient,
};

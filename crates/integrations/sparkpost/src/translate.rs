use std::borrow::Cow;

use tracing::debug;

use crate::config::SparkPostConfig;
use crate::error::SparkPostError;
use crate::message::{BodyPart, Mailbox, MessageBody, OutgoingMessage};
use crate::types::{
    Transmission, TransmissionAddress, TransmissionContent, TransmissionOptions,
    TransmissionRecipient,
};

/// Build the transmission payload for `message`.
///
/// Recipient order is preserved and optional inputs that are unset stay
/// absent from the payload. A multipart body without a text part is rejected
/// with [`SparkPostError::InvalidMessage`]; nothing else about the message is
/// validated locally.
///
/// # Examples
///
/// ```
/// use courier_sparkpost::{Mailbox, MessageBody, OutgoingMessage, SparkPostConfig, translate};
///
/// let message = OutgoingMessage::new(
///     Mailbox::new("shop@example.com"),
///     "Hello",
///     MessageBody::text("hi"),
/// )
/// .with_recipient(Mailbox::new("alice@example.com").with_name("Alice"));
///
/// let transmission = translate(&message, &SparkPostConfig::new("key")).unwrap();
/// assert_eq!(transmission.recipients[0].address.name.as_deref(), Some("Alice"));
/// assert_eq!(transmission.content.text, "hi");
/// assert!(transmission.content.html.is_none());
/// ```
pub fn translate(
    message: &OutgoingMessage,
    config: &SparkPostConfig,
) -> Result<Transmission, SparkPostError> {
    let recipients = message
        .to
        .iter()
        .map(|mailbox| TransmissionRecipient {
            address: address_object(mailbox),
        })
        .collect::<Vec<_>>();

    let (html, text) = body_content(&message.body)?;

    debug!(
        recipients = recipients.len(),
        multipart = message.body.is_multipart(),
        has_html = html.is_some(),
        "translated message into transmission"
    );

    Ok(Transmission {
        recipients,
        content: TransmissionContent {
            from: address_object(&message.from),
            reply_to: message.reply_to.clone(),
            subject: message.subject.clone(),
            html,
            text,
        },
        options: options_from(config),
        campaign_id: config.campaign_id.clone(),
        return_path: config.return_path.clone(),
    })
}

/// Decode a body part into text that survives a JSON round trip unchanged.
///
/// Valid UTF-8 comes back as-is, so the operation is idempotent. Invalid byte
/// sequences are replaced with `U+FFFD` instead of failing.
///
/// ```
/// use courier_sparkpost::cleanse_encoding;
///
/// assert_eq!(cleanse_encoding("héllo".as_bytes()), "héllo");
/// assert_eq!(cleanse_encoding(b"caf\xE9"), "caf\u{FFFD}");
/// ```
pub fn cleanse_encoding(content: &[u8]) -> String {
    match String::from_utf8_lossy(content) {
        Cow::Borrowed(valid) => valid.to_owned(),
        Cow::Owned(repaired) => {
            debug!(
                bytes = content.len(),
                "replaced invalid UTF-8 sequences in message body"
            );
            repaired
        }
    }
}

fn address_object(mailbox: &Mailbox) -> TransmissionAddress {
    TransmissionAddress {
        email: mailbox.email.clone(),
        name: mailbox.name.clone(),
    }
}

/// Returns the `(html, text)` pair for the content block.
fn body_content(body: &MessageBody) -> Result<(Option<String>, String), SparkPostError> {
    match body {
        MessageBody::Single(part) => Ok((None, cleanse(part))),
        MessageBody::Multipart { text, html } => {
            let text = text.as_ref().ok_or_else(|| {
                SparkPostError::InvalidMessage("multipart message has no text part".into())
            })?;
            Ok((html.as_ref().map(cleanse), cleanse(text)))
        }
    }
}

fn cleanse(part: &BodyPart) -> String {
    cleanse_encoding(part.as_bytes())
}

fn options_from(config: &SparkPostConfig) -> TransmissionOptions {
    TransmissionOptions {
        open_tracking: config.track_opens,
        click_tracking: config.track_clicks,
        transactional: config.transactional,
        sandbox: config.sandbox,
        skip_suppression: config.skip_suppression,
        inline_css: config.inline_css,
        ip_pool: config.ip_pool.clone(),
    }
}

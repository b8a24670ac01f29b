use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SparkPostError;

/// An email address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    /// Bare email address.
    pub email: String,
    /// Display name, if the address carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Mailbox {
    /// A mailbox without a display name.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Parses `"Alice <alice@example.com>"` or a bare `"alice@example.com"`.
///
/// ```
/// use courier_sparkpost::Mailbox;
///
/// let mailbox: Mailbox = "Alice <alice@example.com>".parse().unwrap();
/// assert_eq!(mailbox.email, "alice@example.com");
/// assert_eq!(mailbox.name.as_deref(), Some("Alice"));
/// ```
impl FromStr for Mailbox {
    type Err = SparkPostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed: lettre::message::Mailbox = s
            .parse()
            .map_err(|e| SparkPostError::InvalidMessage(format!("invalid address '{s}': {e}")))?;
        Ok(parsed.into())
    }
}

impl From<lettre::message::Mailbox> for Mailbox {
    fn from(mailbox: lettre::message::Mailbox) -> Self {
        Self {
            email: mailbox.email.to_string(),
            name: mailbox.name,
        }
    }
}

/// Raw content of one body part.
///
/// Held as bytes because upstream mail bodies are not guaranteed to be valid
/// UTF-8; [`cleanse_encoding`](crate::cleanse_encoding) turns them into text
/// during translation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct BodyPart(Vec<u8>);

impl BodyPart {
    /// Wrap raw body bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw bytes of this part.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for BodyPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BodyPart")
            .field(&String::from_utf8_lossy(&self.0))
            .finish()
    }
}

impl From<String> for BodyPart {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&str> for BodyPart {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for BodyPart {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<BodyPart> for String {
    fn from(part: BodyPart) -> Self {
        match String::from_utf8(part.0) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}

/// Body of an outgoing message.
///
/// Deserializes from a plain string (single part) or from an object with
/// `text` and/or `html` keys (multipart).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    /// A single-part message. Its content is sent as `text` whatever its MIME type.
    Single(BodyPart),

    /// A `multipart/alternative` message.
    Multipart {
        /// The `text/plain` part. Required for translation.
        #[serde(default)]
        text: Option<BodyPart>,
        /// The `text/html` part.
        #[serde(default)]
        html: Option<BodyPart>,
    },
}

impl MessageBody {
    /// A single-part body.
    pub fn text(content: impl Into<BodyPart>) -> Self {
        Self::Single(content.into())
    }

    /// A multipart body with both a text and an HTML part.
    pub fn multipart(text: impl Into<BodyPart>, html: impl Into<BodyPart>) -> Self {
        Self::Multipart {
            text: Some(text.into()),
            html: Some(html.into()),
        }
    }

    /// Returns `true` for `multipart/alternative` bodies.
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart { .. })
    }
}

/// The message handed to the adapter by mail-construction code.
///
/// # Examples
///
/// ```
/// use courier_sparkpost::{Mailbox, MessageBody, OutgoingMessage};
///
/// let message = OutgoingMessage::new(
///     Mailbox::new("shop@example.com").with_name("Shop"),
///     "Receipt",
///     MessageBody::text("Thanks for your order."),
/// )
/// .with_recipient(Mailbox::new("alice@example.com"))
/// .with_reply_to("support@example.com");
/// assert_eq!(message.to.len(), 1);
/// assert!(!message.body.is_multipart());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Recipients, in delivery order.
    #[serde(default)]
    pub to: Vec<Mailbox>,

    /// Sender.
    pub from: Mailbox,

    /// Reply-to address.
    #[serde(default)]
    pub reply_to: Option<String>,

    /// Subject line.
    pub subject: String,

    /// Message content.
    pub body: MessageBody,
}

impl OutgoingMessage {
    /// Create a message with no recipients yet.
    pub fn new(from: Mailbox, subject: impl Into<String>, body: MessageBody) -> Self {
        Self {
            to: Vec::new(),
            from,
            reply_to: None,
            subject: subject.into(),
            body,
        }
    }

    /// Append a recipient.
    #[must_use]
    pub fn with_recipient(mut self, mailbox: Mailbox) -> Self {
        self.to.push(mailbox);
        self
    }

    /// Append several recipients, keeping their order.
    #[must_use]
    pub fn with_recipients(mut self, mailboxes: impl IntoIterator<Item = Mailbox>) -> Self {
        self.to.extend(mailboxes);
        self
    }

    /// Set the reply-to address.
    #[must_use]
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/v1/transmissions`.
///
/// Optional fields are left out of the JSON entirely when unset; they are
/// never sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transmission {
    /// Recipients, in the order the message listed them.
    pub recipients: Vec<TransmissionRecipient>,

    /// Sender, subject and body.
    pub content: TransmissionContent,

    /// Tracking and delivery options.
    pub options: TransmissionOptions,

    /// Campaign the transmission is reported under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,

    /// Envelope return path (bounce address).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_path: Option<String>,
}

/// One entry of [`Transmission::recipients`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmissionRecipient {
    /// The recipient's address.
    pub address: TransmissionAddress,
}

/// An address object, as used for recipients and the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmissionAddress {
    /// Bare email address.
    pub email: String,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The `content` block of a transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmissionContent {
    /// Sender address object.
    pub from: TransmissionAddress,

    /// Reply-to, sent as a bare string rather than an address object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,

    /// Subject line.
    pub subject: String,

    /// HTML body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// Plain-text body.
    pub text: String,
}

/// The `options` block of a transmission.
///
/// `open_tracking` and `click_tracking` are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmissionOptions {
    /// Record open events.
    pub open_tracking: bool,

    /// Rewrite links to record click events.
    pub click_tracking: bool,

    /// Treat the transmission as transactional rather than marketing mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactional: Option<bool>,

    /// Send from the `SparkPost` sandbox domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<bool>,

    /// Deliver even to addresses on the suppression list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_suppression: Option<bool>,

    /// Inline CSS into the HTML content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_css: Option<bool>,

    /// Dedicated IP pool to send from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_pool: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_transmission() -> Transmission {
        Transmission {
            recipients: vec![TransmissionRecipient {
                address: TransmissionAddress {
                    email: "a@x.com".into(),
                    name: None,
                },
            }],
            content: TransmissionContent {
                from: TransmissionAddress {
                    email: "shop@x.com".into(),
                    name: None,
                },
                reply_to: None,
                subject: "Hello".into(),
                html: None,
                text: "hi".into(),
            },
            options: TransmissionOptions {
                open_tracking: false,
                click_tracking: false,
                transactional: None,
                sandbox: None,
                skip_suppression: None,
                inline_css: None,
                ip_pool: None,
            },
            campaign_id: None,
            return_path: None,
        }
    }

    #[test]
    fn unset_fields_are_omitted_not_null() {
        let json = serde_json::to_value(minimal_transmission()).unwrap();
        assert!(json.get("campaign_id").is_none());
        assert!(json.get("return_path").is_none());
        assert!(json["recipients"][0]["address"].get("name").is_none());
        assert!(json["content"]["from"].get("name").is_none());
        assert!(json["content"].get("reply_to").is_none());
        assert!(json["content"].get("html").is_none());
        assert_eq!(
            json["options"],
            serde_json::json!({"open_tracking": false, "click_tracking": false})
        );
    }

    #[test]
    fn set_fields_are_serialized() {
        let mut transmission = minimal_transmission();
        transmission.campaign_id = Some("promo1".into());
        transmission.return_path = Some("bounces@x.com".into());
        transmission.content.reply_to = Some("support@x.com".into());
        transmission.content.html = Some("<b>hi</b>".into());
        transmission.options.ip_pool = Some("dedicated".into());
        transmission.options.sandbox = Some(true);

        let json = serde_json::to_value(&transmission).unwrap();
        assert_eq!(json["campaign_id"], "promo1");
        assert_eq!(json["return_path"], "bounces@x.com");
        assert_eq!(json["content"]["reply_to"], "support@x.com");
        assert_eq!(json["content"]["html"], "<b>hi</b>");
        assert_eq!(json["options"]["ip_pool"], "dedicated");
        assert_eq!(json["options"]["sandbox"], true);
        assert!(json["options"].get("transactional").is_none());
    }

    #[test]
    fn top_level_key_order_matches_wire_layout() {
        let json = serde_json::to_string(&minimal_transmission()).unwrap();
        let recipients = json.find("\"recipients\"").unwrap();
        let content = json.find("\"content\"").unwrap();
        let options = json.find("\"options\"").unwrap();
        assert!(recipients < content && content < options);
    }
}

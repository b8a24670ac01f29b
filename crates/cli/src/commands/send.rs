use anyhow::{Context, bail};
use clap::Args;
use courier_sparkpost::{
    DeliveryOutcome, DeliveryReport, Mailbox, MessageBody, OutgoingMessage, SparkPostConfig,
    SparkPostDelivery, translate,
};

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Whole message as JSON (string or @file path). Replaces the flags below.
    #[arg(long, conflicts_with_all = ["from", "to", "subject", "text", "html", "reply_to"])]
    pub message: Option<String>,
    /// Sender, e.g. "Shop <shop@example.com>".
    #[arg(long)]
    pub from: Option<String>,
    /// Recipient; repeat for several.
    #[arg(long)]
    pub to: Vec<String>,
    /// Reply-to address.
    #[arg(long)]
    pub reply_to: Option<String>,
    /// Subject line.
    #[arg(long)]
    pub subject: Option<String>,
    /// Plain-text body (string or @file path).
    #[arg(long)]
    pub text: Option<String>,
    /// HTML body (string or @file path).
    #[arg(long)]
    pub html: Option<String>,
    /// Print the transmission payload instead of sending it. No API key is needed.
    #[arg(long)]
    pub dry_run: bool,
}

/// Read an argument value, or the file it names when prefixed with `@`.
fn read_arg(value: &str) -> anyhow::Result<Vec<u8>> {
    match value.strip_prefix('@') {
        Some(path) => std::fs::read(path).with_context(|| format!("failed to read {path}")),
        None => Ok(value.as_bytes().to_vec()),
    }
}

fn build_message(args: &SendArgs) -> anyhow::Result<OutgoingMessage> {
    if let Some(ref message) = args.message {
        let json = read_arg(message)?;
        return serde_json::from_slice(&json).context("invalid message JSON");
    }

    let Some(ref from) = args.from else {
        bail!("--from is required unless --message is given");
    };
    let Some(ref subject) = args.subject else {
        bail!("--subject is required unless --message is given");
    };

    let text = args.text.as_deref().map(read_arg).transpose()?;
    let html = args.html.as_deref().map(read_arg).transpose()?;
    let body = match (text, html) {
        (Some(text), Some(html)) => MessageBody::multipart(text, html),
        (Some(body), None) | (None, Some(body)) => MessageBody::text(body),
        (None, None) => bail!("at least one of --text or --html is required"),
    };

    let recipients = args
        .to
        .iter()
        .map(|to| to.parse::<Mailbox>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut message = OutgoingMessage::new(from.parse()?, subject.clone(), body)
        .with_recipients(recipients);
    message.reply_to.clone_from(&args.reply_to);
    Ok(message)
}

/// Render the payload a dry run would send.
///
/// JSON output is the bare payload; text output prefixes it with a summary
/// line.
fn render_preview(
    message: &OutgoingMessage,
    settings: &SparkPostConfig,
    format: &OutputFormat,
) -> anyhow::Result<String> {
    let transmission = translate(message, settings)?;
    let payload = serde_json::to_string_pretty(&transmission)?;
    Ok(match format {
        OutputFormat::Json => payload,
        OutputFormat::Text => format!(
            "Dry run: {} recipient(s), POST {}\n{payload}",
            transmission.recipients.len(),
            settings.transmissions_url()
        ),
    })
}

fn render_outcome(report: &DeliveryReport, format: &OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => {
            let value = match &report.outcome {
                DeliveryOutcome::Success(results) => serde_json::json!({ "results": results }),
                DeliveryOutcome::Failure(errors) => serde_json::json!({ "errors": errors }),
            };
            serde_json::to_string_pretty(&value)?
        }
        OutputFormat::Text => match &report.outcome {
            DeliveryOutcome::Success(_) => format!(
                "Accepted (HTTP {}), transmission id: {}",
                report.response.status,
                report.outcome.transmission_id().unwrap_or("-")
            ),
            DeliveryOutcome::Failure(errors) => {
                format!("Rejected (HTTP {}): {errors}", report.response.status)
            }
        },
    })
}

/// Build, then preview or deliver, the message. Returns the output and whether
/// `SparkPost` accepted it.
async fn execute(
    settings: SparkPostConfig,
    args: &SendArgs,
    format: &OutputFormat,
) -> anyhow::Result<(String, bool)> {
    let message = build_message(args)?;

    if args.dry_run {
        return Ok((render_preview(&message, &settings, format)?, true));
    }

    let delivery = SparkPostDelivery::new(settings)?;
    let report = delivery.deliver_with_report(&message).await?;
    Ok((render_outcome(&report, format)?, report.outcome.is_success()))
}

pub async fn run(
    settings: SparkPostConfig,
    args: &SendArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let (output, accepted) = execute(settings, args, format).await?;
    println!("{output}");
    if !accepted {
        std::process::exit(1);
    }
    Ok(())
}

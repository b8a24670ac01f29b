use std::path::Path;

use anyhow::Context;
use courier_sparkpost::SparkPostConfig;
use tracing::debug;

/// Load settings from `path` (or defaults when absent), then apply the
/// API key override.
///
/// ```toml
/// api_key = "..."
/// track_opens = true
/// track_clicks = false
/// campaign_id = "spring-promo"
/// return_path = "bounces@example.com"
/// ```
pub fn load(path: Option<&Path>, api_key: Option<&str>) -> anyhow::Result<SparkPostConfig> {
    let mut settings = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading settings");
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse(&contents).with_context(|| format!("invalid settings in {}", path.display()))?
        }
        None => parse("")?,
    };

    if let Some(key) = api_key {
        settings.api_key = key.to_owned();
    }
    Ok(settings)
}

fn parse(contents: &str) -> Result<SparkPostConfig, toml::de::Error> {
    toml::from_str(contents)
}

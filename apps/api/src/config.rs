use anyhow::{bail, Context, Result};

use crate::ingest::{ExtractorKind, Level1Heading};
use crate::llm_client::DEFAULT_MODEL;
use crate::sections::title::parse_alias_pairs;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Everything has a default; only an inconsistent combination fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    pub extractor: ExtractorKind,
    pub level1_heading: Level1Heading,
    /// Extra `alias -> canonical` title pairs layered over the built-in table.
    pub section_aliases: Vec<(String, String)>,
    pub export_filename: String,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            anthropic_api_key: None,
            llm_model: DEFAULT_MODEL.to_string(),
            extractor: ExtractorKind::default(),
            level1_heading: Level1Heading::default(),
            section_aliases: Vec::new(),
            export_filename: "resume".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let anthropic_api_key = optional_env("ANTHROPIC_API_KEY");
        let extractor = match optional_env("EXTRACTOR") {
            Some(raw) => raw.parse::<ExtractorKind>().map_err(anyhow::Error::msg)?,
            None => ExtractorKind::default(),
        };
        if extractor == ExtractorKind::Llm && anthropic_api_key.is_none() {
            bail!("EXTRACTOR=llm requires ANTHROPIC_API_KEY to be set");
        }

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            anthropic_api_key,
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            extractor,
            level1_heading: match optional_env("LEVEL1_HEADING") {
                Some(raw) => parse_level1(&raw)?,
                None => Level1Heading::default(),
            },
            section_aliases: optional_env("SECTION_ALIASES")
                .map(|raw| parse_alias_pairs(&raw))
                .unwrap_or_default(),
            export_filename: optional_env("EXPORT_FILENAME")
                .unwrap_or_else(|| "resume".to_string()),
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}

/// Unset and blank both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_level1(raw: &str) -> Result<Level1Heading> {
    raw.parse::<Level1Heading>()
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("LEVEL1_HEADING must be 'header' or 'section', got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level1() {
        assert_eq!(parse_level1("header").unwrap(), Level1Heading::JoinsHeader);
        assert_eq!(parse_level1("Section").unwrap(), Level1Heading::StartsSection);
        assert!(parse_level1("sideways").is_err());
    }

    #[test]
    fn test_extractor_kind_names() {
        assert_eq!("LLM".parse::<ExtractorKind>().unwrap(), ExtractorKind::Llm);
        assert_eq!("markdown".parse::<ExtractorKind>().unwrap(), ExtractorKind::Markdown);
    }
}

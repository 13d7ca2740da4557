//! Configuration for the sales dashboard

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::constants;

// =============================================================================
// File-based Configuration (dashboard.toml)
// =============================================================================

/// Configuration loaded from dashboard.toml. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub parsing: ParsingConfig,
    pub charts: ChartsConfig,
    pub display: DisplayConfig,
}

/// CSV parsing characters
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Quote character (single ASCII character)
    pub quote: Option<String>,
    /// Escape character; an empty string disables backslash-style escapes
    pub escape: Option<String>,
}

/// Chart sizes
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    pub top_categories: Option<usize>,
    pub top_locations: Option<usize>,
    pub top_products: Option<usize>,
    pub preview_rows: Option<usize>,
}

/// Labels and console layout
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub currency_symbol: Option<String>,
    pub bar_width: Option<usize>,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| {
            "Invalid dashboard config. Check for:\n\
             - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
             - Incorrect data types (strings vs numbers)"
        })
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Main configuration struct with validated values
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV quote byte
    pub quote: u8,
    /// CSV escape byte (None = only doubled quotes)
    pub escape: Option<u8>,
    pub top_categories: usize,
    pub top_locations: usize,
    pub top_products: usize,
    pub preview_rows: usize,
    pub title: String,
    pub subtitle: String,
    pub currency_symbol: String,
    pub bar_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quote: constants::DEFAULT_QUOTE as u8,
            escape: Some(constants::DEFAULT_ESCAPE as u8),
            top_categories: constants::TOP_CATEGORIES,
            top_locations: constants::TOP_LOCATIONS,
            top_products: constants::TOP_PRODUCTS,
            preview_rows: constants::PREVIEW_ROWS,
            title: constants::DASHBOARD_TITLE.to_string(),
            subtitle: constants::DASHBOARD_SUBTITLE.to_string(),
            currency_symbol: constants::CURRENCY_SYMBOL.to_string(),
            bar_width: constants::BAR_WIDTH,
        }
    }
}

impl Config {
    /// Resolve the runtime config.
    ///
    /// An explicit path must exist. Without one, dashboard.toml in the working
    /// directory is used when present, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(&FileConfig::load(path)?),
            None => {
                let path = Path::new(constants::CONFIG_FILE);
                if path.exists() {
                    Self::from_file(&FileConfig::load(path)?)
                } else {
                    tracing::debug!("no {} found, using defaults", constants::CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Create config from file config, filling gaps with defaults
    pub fn from_file(file_config: &FileConfig) -> Result<Self> {
        let defaults = Self::default();
        let parsing = &file_config.parsing;
        let charts = &file_config.charts;
        let display = &file_config.display;

        let quote = match parsing.quote.as_deref() {
            Some(q) => ascii_byte(q).with_context(|| format!("Invalid parsing.quote: {:?}", q))?,
            None => defaults.quote,
        };

        let escape = match parsing.escape.as_deref() {
            Some("") => None,
            Some(e) => Some(ascii_byte(e).with_context(|| format!("Invalid parsing.escape: {:?}", e))?),
            None => defaults.escape,
        };

        if escape == Some(quote) {
            anyhow::bail!("parsing.escape must differ from parsing.quote");
        }

        Ok(Self {
            quote,
            escape,
            top_categories: positive(charts.top_categories, defaults.top_categories, "charts.top_categories")?,
            top_locations: positive(charts.top_locations, defaults.top_locations, "charts.top_locations")?,
            top_products: positive(charts.top_products, defaults.top_products, "charts.top_products")?,
            preview_rows: charts.preview_rows.unwrap_or(defaults.preview_rows),
            title: display.title.clone().unwrap_or(defaults.title),
            subtitle: display.subtitle.clone().unwrap_or(defaults.subtitle),
            currency_symbol: display.currency_symbol.clone().unwrap_or(defaults.currency_symbol),
            bar_width: positive(display.bar_width, defaults.bar_width, "display.bar_width")?,
        })
    }
}

/// Single ASCII character as a byte
fn ascii_byte(s: &str) -> Result<u8> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => anyhow::bail!("expected a single ASCII character"),
    }
}

fn positive(value: Option<usize>, default: usize, key: &str) -> Result<usize> {
    match value {
        Some(0) => anyhow::bail!("{} must be greater than zero", key),
        Some(n) => Ok(n),
        None => Ok(default),
    }
}

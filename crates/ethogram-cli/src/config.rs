//! Report configuration file
//!
//! ```toml
//! [report]
//! title = "Rehabilitation Raptor Ethogram"
//! sheet_name = "Ethogram Data"
//! label_column_width = 50
//! slot_column_width = 12
//! freeze_header = true
//!
//! [email]
//! signature = "World Bird Sanctuary Ethogram Team"
//! ```
//!
//! Every key is optional. Command-line flags override file values, which
//! override the renderer defaults.

use std::path::Path;

use anyhow::{Context, Result};
use ethogram_render::{EmailRenderer, ExcelRenderer};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub report: ReportSection,
    pub email: EmailSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    pub title: Option<String>,
    pub sheet_name: Option<String>,
    pub label_column_width: Option<f64>,
    pub slot_column_width: Option<f64>,
    pub freeze_header: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmailSection {
    pub signature: Option<String>,
}

impl Config {
    /// Load from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Excel renderer with file settings applied
    pub fn excel_renderer(&self) -> ExcelRenderer {
        let report = &self.report;
        let mut renderer = ExcelRenderer::new();
        if let Some(title) = &report.title {
            renderer = renderer.title(title);
        }
        if let Some(name) = &report.sheet_name {
            renderer = renderer.sheet_name(name);
        }
        if let Some(width) = report.label_column_width {
            renderer = renderer.label_width(width);
        }
        if let Some(width) = report.slot_column_width {
            renderer = renderer.slot_width(width);
        }
        if report.freeze_header == Some(false) {
            renderer = renderer.no_freeze();
        }
        renderer
    }

    /// Email renderer with file settings applied
    pub fn email_renderer(&self) -> EmailRenderer {
        match &self.email.signature {
            Some(signature) => EmailRenderer::new().signature(signature),
            None => EmailRenderer::new(),
        }
    }
}

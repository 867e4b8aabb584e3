// SPDX-License-Identifier: MIT
//
// The optional TOML config file.
//
//   [marks]    → n_mark::MarkConfig
//   [editor]   → initial option values
//   [palette]  → the MarkWord1..N colors

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use n_editor::highlight::{DEFAULT_MARK_COLORS, HighlightGroups, Rgb};
use n_mark::MarkConfig;
use serde::Deserialize;

/// Initial editor option values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorSection {
    pub ignorecase: bool,
    pub number: bool,
}

/// Mark colors. `None` keeps the built-in six.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaletteSection {
    pub colors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub marks: MarkConfig,
    pub editor: EditorSection,
    pub palette: PaletteSection,
}

impl AppConfig {
    /// Read and parse `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// The mark highlight groups this config defines.
    pub fn highlight_groups(&self) -> Result<HighlightGroups> {
        let Some(colors) = &self.palette.colors else {
            return Ok(HighlightGroups::with_mark_colors(&DEFAULT_MARK_COLORS));
        };
        let mut parsed = Vec::with_capacity(colors.len());
        for (i, color) in colors.iter().enumerate() {
            let Some(rgb) = Rgb::hex(color) else {
                bail!("palette color {} is not a hex color: {color:?}", i + 1);
            };
            parsed.push(rgb);
        }
        Ok(HighlightGroups::with_mark_colors(&parsed))
    }
}

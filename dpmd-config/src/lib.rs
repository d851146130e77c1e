//! Shared configuration loader for the dpmd toolchain.
//!
//! `defaults/dpmd.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`DpmdConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use dpmd_babel::formats::html::HtmlOptions;
use dpmd_babel::formats::tagged::accordion::ViewportPolicy;
use dpmd_babel::formats::tagged::TaggedOptions;
use dpmd_babel::PageOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/dpmd.default.toml");

/// Top-level configuration consumed by dpmd applications.
#[derive(Debug, Clone, Deserialize)]
pub struct DpmdConfig {
    pub tagged: TaggedConfig,
    pub accordion: AccordionConfig,
    pub html: HtmlConfig,
}

/// Tagged-text writing knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct TaggedConfig {
    pub indent_string: String,
    pub flatten_accordions: bool,
}

/// Mirrors the accordion promotion policy.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AccordionConfig {
    pub enabled: bool,
    pub chars_per_line: usize,
    pub line_height_px: usize,
    pub viewport_height_px: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HtmlConfig {
    pub banner_image_url: String,
    pub trailing_spacer: bool,
    pub base_url: String,
}

impl From<AccordionConfig> for ViewportPolicy {
    fn from(config: AccordionConfig) -> Self {
        ViewportPolicy {
            enabled: config.enabled,
            chars_per_line: config.chars_per_line,
            line_height_px: config.line_height_px,
            viewport_height_px: config.viewport_height_px,
        }
    }
}

impl From<&DpmdConfig> for TaggedOptions {
    fn from(config: &DpmdConfig) -> Self {
        TaggedOptions {
            indent_string: config.tagged.indent_string.clone(),
            flatten_accordions: config.tagged.flatten_accordions,
            accordion: config.accordion.into(),
        }
    }
}

impl From<&HtmlConfig> for HtmlOptions {
    fn from(config: &HtmlConfig) -> Self {
        let base_url = config.base_url.trim();
        HtmlOptions {
            banner_image_url: config.banner_image_url.clone(),
            trailing_spacer: config.trailing_spacer,
            base_url: (!base_url.is_empty()).then(|| base_url.to_string()),
        }
    }
}

impl From<&DpmdConfig> for PageOptions {
    fn from(config: &DpmdConfig) -> Self {
        PageOptions {
            tagged: config.into(),
            html: (&config.html).into(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<DpmdConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DpmdConfig, ConfigError> {
    Loader::new().build()
}

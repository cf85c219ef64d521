//! Configuration management for folio.
//!
//! Parses the `folio.toml` file at the root of a site's input directory with
//! serde. The file carries the page and diagram [`Manifest`] along with the
//! site-wide settings used by the shell template and the asset copier.
//!
//! ```toml
//! [site]
//! title = "A Bit of Web Development"
//! stylesheet = "style.css"
//!
//! [[pages]]
//! source = "index.html"
//! title = "Introduction"
//!
//! [[diagrams]]
//! source = "TheBig3.dot"
//! engine = "circo"
//! ```

mod manifest;

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

pub use manifest::{DEFAULT_LAYOUT_ENGINE, DiagramEntry, Manifest, Navigation, PageEntry};

/// Configuration filename looked up in the input directory.
pub const CONFIG_FILENAME: &str = "folio.toml";

/// Extensions of page template fragments.
pub const TEMPLATE_EXTENSIONS: &[&str] = &["html", "htm"];

/// Extensions of graph descriptions consumed by layout engines.
pub const DIAGRAM_EXTENSIONS: &[&str] = &["dot", "gv"];

/// Site configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shell template settings.
    pub site: SiteConfig,
    /// Asset copier settings.
    pub assets: AssetsConfig,
    /// Layout engine settings (paths are relative strings from TOML).
    layout: LayoutConfigRaw,
    /// Pages and diagrams to build.
    #[serde(flatten)]
    pub manifest: Manifest,

    /// Resolved path to a custom shell template (set after loading).
    #[serde(skip)]
    pub shell_path: Option<PathBuf>,
    /// Resolved directory holding layout engine executables (set after loading).
    #[serde(skip)]
    pub engine_dir: Option<PathBuf>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Settings applied to every page through the shell template.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Suffix shown in every page's `<title>`.
    pub title: String,
    /// Stylesheet linked from every page's `<head>`.
    pub stylesheet: String,
    /// Custom shell template, relative to the input directory.
    shell: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Site".to_owned(),
            stylesheet: "style.css".to_owned(),
            shell: None,
        }
    }
}

/// Asset copier configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Extensions (without leading dot) copied verbatim to the output.
    pub passthrough: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            passthrough: vec!["css".to_owned(), "svg".to_owned()],
        }
    }
}

impl AssetsConfig {
    /// Whether files with `extension` are copied verbatim.
    #[must_use]
    pub fn is_passthrough(&self, extension: &str) -> bool {
        self.passthrough
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

/// Raw layout configuration as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LayoutConfigRaw {
    engine_dir: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a plain file name that stays inside the input directory.
fn require_file_name(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "{field} must be a file name in the input directory, got '{value}'"
        ))),
    }
}

impl Config {
    /// Load `folio.toml` from the input directory.
    ///
    /// Relative paths in the file are resolved against `input_dir`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist, or a parse or
    /// validation error if its contents are invalid.
    pub fn load(input_dir: &Path) -> Result<Self, ConfigError> {
        let path = input_dir.join(CONFIG_FILENAME);
        if !path.is_file() {
            return Err(ConfigError::NotFound(path));
        }
        let content = std::fs::read_to_string(&path)?;
        let mut config = Self::parse(&content, input_dir)?;
        config.config_path = Some(path);
        Ok(config)
    }

    /// Parse and validate configuration, resolving paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::Validation` for invalid values.
    pub fn parse(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.resolve_paths(base_dir);
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration around an explicit manifest with default settings.
    #[must_use]
    pub fn with_manifest(manifest: Manifest) -> Self {
        Self {
            manifest,
            ..Self::default()
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_assets()?;
        self.validate_manifest()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;
        require_non_empty(&self.site.stylesheet, "site.stylesheet")?;
        if let Some(shell) = &self.site.shell {
            require_non_empty(shell, "site.shell")?;
        }
        Ok(())
    }

    fn validate_assets(&self) -> Result<(), ConfigError> {
        for ext in &self.assets.passthrough {
            require_non_empty(ext, "assets.passthrough")?;
            if ext.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "assets.passthrough entries must not start with '.', got '{ext}'"
                )));
            }
        }
        Ok(())
    }

    fn validate_manifest(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for page in self.manifest.pages() {
            require_file_name(&page.source, "pages.source")?;
            if !seen.insert(page.source.as_str()) {
                tracing::debug!(source = %page.source, "Page listed more than once");
            }
        }
        for diagram in self.manifest.diagrams() {
            require_file_name(&diagram.source, "diagrams.source")?;
            require_non_empty(&diagram.engine, "diagrams.engine")?;
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on the input directory.
    fn resolve_paths(&mut self, base_dir: &Path) {
        self.shell_path = self.site.shell.as_deref().map(|s| base_dir.join(s));
        self.engine_dir = self.layout.engine_dir.as_deref().map(|d| base_dir.join(d));
    }
}

//! Configuration management for Dossier.
//!
//! Parses `dossier.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [project]
//! source = "project.json"
//! readme = "README.md"
//!
//! [render]
//! router = "kind"
//!
//! [[outputs]]
//! type = "html"
//! path = "docs"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `project.source`
//! - `project.readme`
//! - `outputs[].path`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "dossier.toml";

/// Default routing strategy.
const DEFAULT_ROUTER: &str = "kind";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override project graph file.
    pub source: Option<PathBuf>,
    /// Replace all outputs with a single HTML output at this path.
    pub output: Option<PathBuf>,
    /// Add a JSON output at this path.
    pub json: Option<PathBuf>,
    /// Override clean output directory flag.
    pub clean_output_dir: Option<bool>,
    /// Override cache busting flag.
    pub cache_bust: Option<bool>,
    /// Override routing strategy.
    pub router: Option<String>,
    /// Override readme.
    pub readme: Option<ReadmeSetting>,
}

/// Where the project readme comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadmeSetting {
    /// No readme; the project page lists the top-level entities.
    None,
    /// Markdown file to use as the project readme.
    Path(PathBuf),
}

impl ReadmeSetting {
    /// Parse a readme value: `"none"` or a path relative to `base`.
    #[must_use]
    pub fn from_value(value: &str, base: &Path) -> Self {
        if value.eq_ignore_ascii_case("none") {
            Self::None
        } else {
            Self::Path(base.join(value))
        }
    }
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project configuration (paths are relative strings from TOML).
    project: ProjectConfigRaw,
    /// Render configuration (paths are relative strings from TOML).
    render: RenderConfigRaw,
    /// Output targets as parsed from TOML.
    outputs: Vec<OutputConfigRaw>,

    /// Resolved project configuration (set after loading).
    #[serde(skip)]
    pub project_resolved: ProjectConfig,
    /// Resolved render configuration (set after loading).
    #[serde(skip)]
    pub render_resolved: RenderConfig,
    /// Resolved output targets, in declaration order (set after loading).
    #[serde(skip)]
    pub outputs_resolved: Vec<OutputConfig>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ProjectConfigRaw {
    source: Option<String>,
    readme: Option<String>,
    name: Option<String>,
}

/// Resolved project configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ProjectConfig {
    /// JSON project graph file.
    pub source: PathBuf,
    /// Readme override. `None` keeps whatever the graph carries.
    pub readme: Option<ReadmeSetting>,
    /// Project name override.
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RenderConfigRaw {
    router: Option<String>,
    clean_output_dir: Option<bool>,
    cache_bust: Option<bool>,
    custom_css: Option<String>,
}

/// Resolved render configuration.
#[derive(Debug)]
pub struct RenderConfig {
    /// Routing strategy name.
    pub router: String,
    /// Empty output directories before writing.
    pub clean_output_dir: bool,
    /// Append a cache-busting query to asset URLs.
    pub cache_bust: bool,
    /// Stylesheet replacing the built-in one.
    pub custom_css: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            router: DEFAULT_ROUTER.to_owned(),
            clean_output_dir: true,
            cache_bust: false,
            custom_css: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    #[serde(rename = "type")]
    kind: String,
    path: String,
}

/// Resolved output target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputConfig {
    /// Backend name (`html`, `json`, ...).
    pub kind: String,
    /// Output directory, or file for single-document backends.
    pub path: PathBuf,
}

impl OutputConfig {
    #[must_use]
    pub fn new(kind: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            kind: kind.into(),
            path: path.into(),
        }
    }
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`outputs[0].path`").
        field: String,
        /// Error message (e.g., "${`DOCS_OUT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dossier.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Directory relative paths were resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(Path::new("."))
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source) = &settings.source {
            self.project_resolved.source.clone_from(source);
        }
        if let Some(readme) = &settings.readme {
            self.project_resolved.readme = Some(readme.clone());
        }
        if let Some(router) = &settings.router {
            self.render_resolved.router.clone_from(router);
        }
        if let Some(clean) = settings.clean_output_dir {
            self.render_resolved.clean_output_dir = clean;
        }
        if let Some(cache_bust) = settings.cache_bust {
            self.render_resolved.cache_bust = cache_bust;
        }
        if let Some(output) = &settings.output {
            self.outputs_resolved = vec![OutputConfig::new("html", output.clone())];
        }
        if let Some(json) = &settings.json {
            self.outputs_resolved.push(OutputConfig::new("json", json.clone()));
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            project: ProjectConfigRaw::default(),
            render: RenderConfigRaw::default(),
            outputs: Vec::new(),
            project_resolved: ProjectConfig {
                source: base.join("project.json"),
                readme: None,
                name: None,
            },
            render_resolved: RenderConfig::default(),
            outputs_resolved: vec![OutputConfig::new("html", base.join("docs"))],
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.render_resolved.router, "render.router")?;
        if self.outputs_resolved.is_empty() {
            return Err(ConfigError::Validation(
                "at least one output is required".to_owned(),
            ));
        }
        for (index, output) in self.outputs_resolved.iter().enumerate() {
            require_non_empty(&output.kind, &format!("outputs[{index}].type"))?;
            require_non_empty(
                &output.path.to_string_lossy(),
                &format!("outputs[{index}].path"),
            )?;
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref source) = self.project.source {
            self.project.source = Some(expand::expand_env(source, "project.source")?);
        }
        if let Some(ref readme) = self.project.readme {
            self.project.readme = Some(expand::expand_env(readme, "project.readme")?);
        }
        for (index, output) in self.outputs.iter_mut().enumerate() {
            output.path = expand::expand_env(&output.path, &format!("outputs[{index}].path"))?;
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// Empty output paths are kept empty so validation can report them.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.project_resolved = ProjectConfig {
            source: config_dir.join(self.project.source.as_deref().unwrap_or("project.json")),
            readme: self
                .project
                .readme
                .as_deref()
                .map(|value| ReadmeSetting::from_value(value, config_dir)),
            name: self.project.name.clone(),
        };

        self.render_resolved = RenderConfig {
            router: self
                .render
                .router
                .clone()
                .unwrap_or_else(|| DEFAULT_ROUTER.to_owned()),
            clean_output_dir: self.render.clean_output_dir.unwrap_or(true),
            cache_bust: self.render.cache_bust.unwrap_or(false),
            custom_css: self.render.custom_css.as_deref().map(|css| config_dir.join(css)),
        };

        self.outputs_resolved = if self.outputs.is_empty() {
            vec![OutputConfig::new("html", config_dir.join("docs"))]
        } else {
            self.outputs
                .iter()
                .map(|output| {
                    let path = if output.path.is_empty() {
                        PathBuf::new()
                    } else {
                        config_dir.join(&output.path)
                    };
                    OutputConfig::new(output.kind.clone(), path)
                })
                .collect()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolved(toml: &str, base: &str) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new(base));
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.project_resolved.source, PathBuf::from("/test/project.json"));
        assert_eq!(config.project_resolved.readme, None);
        assert_eq!(config.render_resolved.router, "kind");
        assert!(config.render_resolved.clean_output_dir);
        assert!(!config.render_resolved.cache_bust);
        assert_eq!(
            config.outputs_resolved,
            vec![OutputConfig::new("html", "/test/docs")]
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = resolved("", "/project");
        assert_eq!(config.render_resolved.router, "kind");
        assert_eq!(
            config.outputs_resolved,
            vec![OutputConfig::new("html", "/project/docs")]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[project]
source = "build/api.json"
readme = "README.md"
name = "Demo Library"

[render]
router = "structure"
clean_output_dir = false
cache_bust = true
custom_css = "theme/site.css"

[[outputs]]
type = "html"
path = "site"

[[outputs]]
type = "json"
path = "site/api.json"
"#;
        let config = resolved(toml, "/project");

        assert_eq!(
            config.project_resolved.source,
            PathBuf::from("/project/build/api.json")
        );
        assert_eq!(
            config.project_resolved.readme,
            Some(ReadmeSetting::Path(PathBuf::from("/project/README.md")))
        );
        assert_eq!(config.project_resolved.name.as_deref(), Some("Demo Library"));
        assert_eq!(config.render_resolved.router, "structure");
        assert!(!config.render_resolved.clean_output_dir);
        assert!(config.render_resolved.cache_bust);
        assert_eq!(
            config.render_resolved.custom_css,
            Some(PathBuf::from("/project/theme/site.css"))
        );
        assert_eq!(
            config.outputs_resolved,
            vec![
                OutputConfig::new("html", "/project/site"),
                OutputConfig::new("json", "/project/site/api.json"),
            ]
        );
    }

    #[test]
    fn test_readme_none() {
        let config = resolved("[project]\nreadme = \"none\"\n", "/project");
        assert_eq!(config.project_resolved.readme, Some(ReadmeSetting::None));
    }

    #[test]
    fn test_readme_setting_from_value() {
        let base = Path::new("/base");
        assert_eq!(ReadmeSetting::from_value("NONE", base), ReadmeSetting::None);
        assert_eq!(
            ReadmeSetting::from_value("docs/intro.md", base),
            ReadmeSetting::Path(PathBuf::from("/base/docs/intro.md"))
        );
    }

    #[test]
    fn test_expand_env_vars_output_path() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("DOSSIER_TEST_SITE_DIR", "public");
        }

        let toml = r#"
[[outputs]]
type = "html"
path = "${DOSSIER_TEST_SITE_DIR}/api"
"#;
        let config = resolved(toml, "/project");
        assert_eq!(
            config.outputs_resolved,
            vec![OutputConfig::new("html", "/project/public/api")]
        );

        unsafe {
            std::env::remove_var("DOSSIER_TEST_SITE_DIR");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("DOSSIER_TEST_MISSING_SOURCE");
        }

        let mut config: Config =
            toml::from_str("[project]\nsource = \"${DOSSIER_TEST_MISSING_SOURCE}\"\n").unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "project.source"));
    }

    #[test]
    fn test_apply_cli_settings_output_replaces_outputs() {
        let mut config = resolved(
            "[[outputs]]\ntype = \"html\"\npath = \"site\"\n\n[[outputs]]\ntype = \"json\"\npath = \"api.json\"\n",
            "/project",
        );
        config.apply_cli_settings(&CliSettings {
            output: Some(PathBuf::from("out")),
            ..CliSettings::default()
        });
        assert_eq!(config.outputs_resolved, vec![OutputConfig::new("html", "out")]);
    }

    #[test]
    fn test_apply_cli_settings_json_adds_output() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            json: Some(PathBuf::from("api.json")),
            ..CliSettings::default()
        });
        assert_eq!(
            config.outputs_resolved,
            vec![
                OutputConfig::new("html", "/test/docs"),
                OutputConfig::new("json", "api.json"),
            ]
        );
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            source: Some(PathBuf::from("other.json")),
            clean_output_dir: Some(false),
            cache_bust: Some(true),
            router: Some("kind-dir".to_owned()),
            readme: Some(ReadmeSetting::None),
            ..CliSettings::default()
        });

        assert_eq!(config.project_resolved.source, PathBuf::from("other.json"));
        assert_eq!(config.project_resolved.readme, Some(ReadmeSetting::None));
        assert_eq!(config.render_resolved.router, "kind-dir");
        assert!(!config.render_resolved.clean_output_dir);
        assert!(config.render_resolved.cache_bust);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.project_resolved.source, PathBuf::from("/test/project.json"));
        assert_eq!(config.outputs_resolved.len(), 1);
    }

    #[test]
    fn test_validate_empty_output_type() {
        let config = resolved("[[outputs]]\npath = \"site\"\n", "/project");
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: outputs[0].type cannot be empty"
        );
    }

    #[test]
    fn test_validate_empty_output_path() {
        let config = resolved("[[outputs]]\ntype = \"json\"\n", "/project");
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: outputs[0].path cannot be empty"
        );
    }

    #[test]
    fn test_validate_empty_router() {
        let config = resolved("[render]\nrouter = \"\"\n", "/project");
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/dossier.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[project]\nsource = \"api.json\"\n").unwrap();

        let settings = CliSettings {
            cache_bust: Some(true),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.project_resolved.source, dir.path().join("api.json"));
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.base_dir(), dir.path());
        assert!(config.render_resolved.cache_bust);
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[project\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}

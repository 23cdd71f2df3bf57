//! Arguments shared by `build` and `watch`.

use std::path::{Path, PathBuf};

use clap::Args;
use dossier_config::{CliSettings, Config, ReadmeSetting};

use crate::error::CliError;

#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to configuration file (default: auto-discover dossier.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project graph JSON file (overrides config).
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Write a single HTML output to this directory (replaces configured outputs).
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Also write the project as JSON to this file.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Routing strategy: kind, kind-dir, structure, structure-dir.
    #[arg(long, env = "DOSSIER_ROUTER")]
    router: Option<String>,

    /// Empty output directories before writing (default: enabled).
    #[arg(long)]
    clean: bool,

    /// Keep existing files in output directories.
    #[arg(long, conflicts_with = "clean")]
    no_clean: bool,

    /// Append a cache-busting query to asset URLs.
    #[arg(long)]
    cache_bust: bool,

    /// Readme markdown file, or "none" to skip the readme page.
    #[arg(long)]
    readme: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Load configuration with these arguments applied on top.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        Ok(Config::load(self.config.as_deref(), Some(&self.settings()))?)
    }

    fn settings(&self) -> CliSettings {
        CliSettings {
            source: self.source.clone(),
            output: self.out.clone(),
            json: self.json.clone(),
            clean_output_dir: self.resolve_clean(),
            cache_bust: self.cache_bust.then_some(true),
            router: self.router.clone(),
            readme: self
                .readme
                .as_deref()
                .map(|value| ReadmeSetting::from_value(value, Path::new(""))),
        }
    }

    /// Resolve `clean_output_dir` from --clean/--no-clean flags.
    fn resolve_clean(&self) -> Option<bool> {
        self.no_clean
            .then_some(false)
            .or(self.clean.then_some(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        render: RenderArgs,
    }

    fn parse(args: &[&str]) -> RenderArgs {
        TestCli::parse_from(std::iter::once("dossier").chain(args.iter().copied())).render
    }

    #[test]
    fn test_no_flags_override_nothing() {
        let settings = parse(&[]).settings();
        assert_eq!(settings.clean_output_dir, None);
        assert_eq!(settings.cache_bust, None);
        assert_eq!(settings.readme, None);
    }

    #[test]
    fn test_clean_flags() {
        assert_eq!(parse(&["--clean"]).settings().clean_output_dir, Some(true));
        assert_eq!(parse(&["--no-clean"]).settings().clean_output_dir, Some(false));
    }

    #[test]
    fn test_readme_flag() {
        assert_eq!(
            parse(&["--readme", "none"]).settings().readme,
            Some(ReadmeSetting::None)
        );
        assert_eq!(
            parse(&["--readme", "docs/README.md"]).settings().readme,
            Some(ReadmeSetting::Path(PathBuf::from("docs/README.md")))
        );
    }

    #[test]
    fn test_output_flags() {
        let settings = parse(&["-o", "site", "--json", "site/api.json", "--cache-bust"]).settings();
        assert_eq!(settings.output, Some(PathBuf::from("site")));
        assert_eq!(settings.json, Some(PathBuf::from("site/api.json")));
        assert_eq!(settings.cache_bust, Some(true));
    }
}

//! Loading the project graph and output targets from configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use dossier_config::{Config, ReadmeSetting};
use dossier_model::{ContentBlock, ContentKind, ProjectGraph};
use dossier_render::{OutputTarget, RenderOptions};
use dossier_router::ReadmeMode;

use crate::error::CliError;

/// Load the project graph named by the config.
///
/// A configured readme file replaces the root readme carried by the graph,
/// and a configured name replaces the project name.
pub(crate) fn load_project(config: &Config) -> Result<ProjectGraph, CliError> {
    let source = &config.project_resolved.source;
    let file = File::open(source).map_err(|e| read_error(source, e))?;
    let graph = ProjectGraph::from_reader(BufReader::new(file))?;

    let readme = match &config.project_resolved.readme {
        Some(ReadmeSetting::Path(path)) => {
            Some(std::fs::read_to_string(path).map_err(|e| read_error(path, e))?)
        }
        Some(ReadmeSetting::None) | None => None,
    };
    let name = config.project_resolved.name.as_deref();
    if readme.is_none() && name.is_none() {
        return Ok(graph);
    }

    let mut tree = graph.to_tree();
    if let Some(name) = name {
        tree.name = name.to_owned();
    }
    if let Some(text) = readme {
        tree.content.retain(|block| block.kind != ContentKind::Readme);
        tree.content.insert(0, ContentBlock::new(ContentKind::Readme, text));
    }
    tracing::debug!(source = %source.display(), "Applied project overrides");
    Ok(ProjectGraph::from_tree(tree)?)
}

/// Output targets in configuration order.
pub(crate) fn output_targets(config: &Config) -> Vec<OutputTarget> {
    let render = &config.render_resolved;
    let options = RenderOptions {
        clean_output_dir: render.clean_output_dir,
        cache_bust: render.cache_bust,
        readme: match config.project_resolved.readme {
            Some(ReadmeSetting::None) => ReadmeMode::None,
            _ => ReadmeMode::Present,
        },
        router: render.router.clone(),
    };
    config
        .outputs_resolved
        .iter()
        .map(|output| {
            OutputTarget::new(output.kind.clone(), output.path.clone()).with_options(options.clone())
        })
        .collect()
}

/// Files whose changes trigger a rebuild in watch mode.
pub(crate) fn watched_files(config: &Config) -> Vec<PathBuf> {
    let mut files = vec![config.project_resolved.source.clone()];
    if let Some(ReadmeSetting::Path(readme)) = &config.project_resolved.readme {
        files.push(readme.clone());
    }
    if let Some(css) = &config.render_resolved.custom_css {
        files.push(css.clone());
    }
    files
}

fn read_error(path: &Path, source: std::io::Error) -> CliError {
    CliError::Read {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_config::CliSettings;
    use pretty_assertions::assert_eq;

    const PROJECT: &str = r##"{
        "name": "demo",
        "kind": "project",
        "content": [{ "kind": "readme", "text": "# From graph" }],
        "children": [{ "name": "Parser", "kind": "class" }]
    }"##;

    fn config_in(dir: &Path, toml: &str, settings: &CliSettings) -> Config {
        let path = dir.join("dossier.toml");
        std::fs::write(&path, toml).unwrap();
        std::fs::write(dir.join("project.json"), PROJECT).unwrap();
        Config::load(Some(&path), Some(settings)).unwrap()
    }

    #[test]
    fn test_load_project_from_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "", &CliSettings::default());

        let graph = load_project(&config).unwrap();
        assert_eq!(graph.name(), "demo");
        assert_eq!(graph.readme(), Some("# From graph"));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_readme_file_replaces_graph_readme() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "# From file").unwrap();
        let config = config_in(
            dir.path(),
            "[project]\nreadme = \"README.md\"\nname = \"Demo Library\"\n",
            &CliSettings::default(),
        );

        let graph = load_project(&config).unwrap();
        assert_eq!(graph.name(), "Demo Library");
        assert_eq!(graph.readme(), Some("# From file"));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_missing_source_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "[project]\nsource = \"missing.json\"\n", &CliSettings::default());

        let err = load_project(&config).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_output_targets_carry_render_options() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CliSettings {
            json: Some(PathBuf::from("api.json")),
            readme: Some(ReadmeSetting::None),
            router: Some("structure".to_owned()),
            ..CliSettings::default()
        };
        let config = config_in(dir.path(), "[render]\ncache_bust = true\n", &settings);

        let targets = output_targets(&config);
        let backends: Vec<_> = targets.iter().map(|t| t.backend.as_str()).collect();
        assert_eq!(backends, vec!["html", "json"]);
        assert_eq!(targets[0].path, dir.path().join("docs"));
        assert_eq!(targets[1].options.router, "structure");
        assert_eq!(targets[1].options.readme, ReadmeMode::None);
        assert!(targets[0].options.cache_bust);
    }

    #[test]
    fn test_watched_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CliSettings {
            readme: Some(ReadmeSetting::Path(PathBuf::from("intro.md"))),
            ..CliSettings::default()
        };
        let config = config_in(dir.path(), "", &settings);

        assert_eq!(
            watched_files(&config),
            vec![dir.path().join("project.json"), PathBuf::from("intro.md")]
        );
    }
}

//! `dossier build` command implementation.

use std::sync::Arc;

use clap::Args;
use dossier_config::Config;
use dossier_output::OutputOptions;
use dossier_render::Renderer;

use crate::commands::args::RenderArgs;
use crate::error::CliError;
use crate::output::Output;
use crate::project::{load_project, output_targets};

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub render: RenderArgs,
}

impl BuildArgs {
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let config = self.render.load_config()?;
        run_build(&config, &Output::new()).await
    }
}

/// Render every configured output once with a fresh renderer.
///
/// # Errors
///
/// Returns an error if the project cannot be loaded or any output failed.
pub(crate) async fn run_build(config: &Config, output: &Output) -> Result<(), CliError> {
    let graph = Arc::new(load_project(config)?);
    let targets = output_targets(config);

    output.info(&format!(
        "Source: {}",
        config.project_resolved.source.display()
    ));

    let mut renderer = Renderer::default().with_output_options(OutputOptions {
        custom_css: config.render_resolved.custom_css.clone(),
    });
    let reports = renderer.write_outputs(graph, &targets).await;

    let failed = output.summary(&reports);
    if failed > 0 {
        return Err(CliError::Render {
            failed,
            total: reports.len(),
        });
    }
    Ok(())
}

//! Render orchestration for Dossier.
//!
//! [`Renderer::write_output`] runs one output target through a fixed
//! sequence of phases:
//!
//! 1. resolve the backend by name,
//! 2. set it up,
//! 3. build its router and route the project,
//! 4. emit `beginRender`,
//! 5. run pre-render jobs,
//! 6. prepare the output directory (multi-document outputs only),
//! 7. render and write every document between `beginPage` and `endPage`,
//! 8. emit `endRender`,
//! 9. tear the backend down,
//! 10. run post-render jobs,
//! 11. release backend and router.
//!
//! Failures never escape as errors: they are logged and collected in a
//! [`RenderReport`].

mod jobs;
mod renderer;
mod report;
mod target;
mod writer;

pub use dossier_output::{HookContext, JobError, JobQueue, PageEvent, RenderEvent};
pub use renderer::Renderer;
pub use report::{DocumentFailure, RenderError, RenderReport, RunState};
pub use target::{OutputTarget, RenderOptions};
pub use writer::{WriteError, prepare_output_dir, write_file};

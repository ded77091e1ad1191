//! Batch post generation.
//!
//! Renders N posts from the library: each post pairs the next caption and the
//! next background from their own [`ShuffledQueue`], and is written to the
//! output directory under the [`naming`](crate::naming) convention.
//!
//! ## Output Structure
//!
//! ```text
//! output/
//! ├── manifest.json        # what was rendered, from what, and what failed
//! ├── post_pov_001.jpg
//! ├── post_pov_002.jpg
//! └── ...
//! ```
//!
//! ## Parallel Rendering
//!
//! Jobs are planned up front on one thread (so a seed fully determines the
//! pairing), then rendered in parallel with [rayon](https://docs.rs/rayon) on
//! a pool capped by `processing.max_processes`. Every finished job sends a
//! [`BatchEvent`] down an `mpsc` channel so the CLI can report progress while
//! the pool works.
//!
//! A failed post does not stop the batch. It is logged, reported as an event,
//! and recorded in the manifest; the remaining posts still render.

use crate::config::{StudioConfig, effective_threads};
use crate::imaging::{
    CaptionComposer, CaptionMode, ImageBackend, OutputFormat, RenderError, RustBackend,
};
use crate::library::{Library, LibraryError, load_library};
use crate::naming::post_file_name;
use crate::queue::ShuffledQueue;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{info, warn};

/// Manifest file written next to the rendered posts.
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Library error: {0}")]
    Library(#[from] LibraryError),
    #[error("Render setup failed: {0}")]
    Render(#[from] RenderError),
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// One planned post.
#[derive(Debug, Clone, PartialEq)]
pub struct PostJob {
    /// 1-based post number.
    pub number: usize,
    pub background: PathBuf,
    pub caption: String,
    pub output: PathBuf,
}

/// Progress report for one finished job.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Rendered {
        number: usize,
        total: usize,
        background: PathBuf,
        output: PathBuf,
        lines: Vec<String>,
    },
    Failed {
        number: usize,
        total: usize,
        background: PathBuf,
        error: String,
    },
}

/// Manifest record of one post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub number: usize,
    pub background: PathBuf,
    pub caption: String,
    /// Written file; absent when rendering failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Wrapped caption lines as drawn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Contents of `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchManifest {
    pub mode: String,
    pub font: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub requested: usize,
    pub rendered: usize,
    pub failed: usize,
    pub posts: Vec<PostRecord>,
}

fn mode_name(mode: &CaptionMode) -> String {
    match mode {
        CaptionMode::Single => "single".to_string(),
        CaptionMode::LabelCaption { label } => format!("label ({label})"),
    }
}

/// Pair captions with backgrounds for `count` posts.
///
/// With a seed the plan is reproducible; without one it is drawn from system
/// entropy.
pub fn plan_jobs(
    library: &Library,
    count: usize,
    mode: &CaptionMode,
    format: OutputFormat,
    output_dir: &Path,
    seed: Option<u64>,
) -> Vec<PostJob> {
    let (mut captions, mut backgrounds) = match seed {
        Some(seed) => (
            ShuffledQueue::with_seed(library.captions.clone(), seed),
            ShuffledQueue::with_seed(library.backgrounds.clone(), seed.wrapping_add(1)),
        ),
        None => (
            ShuffledQueue::from_entropy(library.captions.clone()),
            ShuffledQueue::from_entropy(library.backgrounds.clone()),
        ),
    };

    (1..=count)
        .map_while(|number| {
            Some(PostJob {
                number,
                caption: captions.next_item()?,
                background: backgrounds.next_item()?,
                output: output_dir.join(post_file_name(mode, number, format)),
            })
        })
        .collect()
}

/// Render planned jobs in parallel and collect the manifest records in job
/// order.
pub fn render_jobs(
    backend: &impl ImageBackend,
    composer: &CaptionComposer,
    config: &StudioConfig,
    jobs: &[PostJob],
    events: Sender<BatchEvent>,
) -> Vec<PostRecord> {
    let total = jobs.len();
    jobs.par_iter()
        .map_with(events, |tx, job| {
            let params = config.encode_params(job.output.clone());
            let result = composer.render(backend, &job.background, &job.caption, &params);
            let (record, event) = match result {
                Ok(summary) => (
                    PostRecord {
                        number: job.number,
                        background: job.background.clone(),
                        caption: job.caption.clone(),
                        output: Some(summary.output.clone()),
                        lines: summary.lines.clone(),
                        error: None,
                    },
                    BatchEvent::Rendered {
                        number: job.number,
                        total,
                        background: job.background.clone(),
                        output: summary.output,
                        lines: summary.lines,
                    },
                ),
                Err(e) => {
                    warn!(
                        post = job.number,
                        background = %job.background.display(),
                        error = %e,
                        "post failed"
                    );
                    (
                        PostRecord {
                            number: job.number,
                            background: job.background.clone(),
                            caption: job.caption.clone(),
                            output: None,
                            lines: Vec::new(),
                            error: Some(e.to_string()),
                        },
                        BatchEvent::Failed {
                            number: job.number,
                            total,
                            background: job.background.clone(),
                            error: e.to_string(),
                        },
                    )
                }
            };
            // The receiver may have hung up; the record still counts.
            let _ = tx.send(event);
            record
        })
        .collect()
}

/// Write `manifest.json` into `output_dir` and return its path.
pub fn write_manifest(manifest: &BatchManifest, output_dir: &Path) -> Result<PathBuf, BatchError> {
    let path = output_dir.join(MANIFEST_FILE);
    std::fs::write(&path, serde_json::to_string_pretty(manifest)?)?;
    Ok(path)
}

fn build_thread_pool(threads: usize) -> Result<rayon::ThreadPool, BatchError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| BatchError::ThreadPool(e.to_string()))
}

/// Generate `count` posts with the filesystem backend.
pub fn generate(
    config: &StudioConfig,
    count: usize,
    seed: Option<u64>,
    events: Sender<BatchEvent>,
) -> Result<BatchManifest, BatchError> {
    generate_with_backend(&RustBackend::new(), config, count, seed, events)
}

/// Generate posts using a specific backend (allows testing with mock).
///
/// Setup failures (no captions, no usable background, no font) abort before
/// anything is rendered. Per-post failures are recorded and skipped.
pub fn generate_with_backend(
    backend: &impl ImageBackend,
    config: &StudioConfig,
    count: usize,
    seed: Option<u64>,
    events: Sender<BatchEvent>,
) -> Result<BatchManifest, BatchError> {
    let composer = CaptionComposer::resolve(
        config.fonts.path.as_deref(),
        &config.font_candidates(),
        config.composer_config()?,
    )?;
    info!(font = %composer.font().path().display(), "font resolved");

    let library = load_library(backend, &config.library)?;
    let output_dir = &config.library.output_dir;
    std::fs::create_dir_all(output_dir)?;

    let mode = &composer.config().mode;
    let jobs = plan_jobs(&library, count, mode, config.output.format, output_dir, seed);
    let threads = effective_threads(&config.processing);
    info!(posts = jobs.len(), threads, "rendering batch");

    let pool = build_thread_pool(threads)?;
    let posts = pool.install(|| render_jobs(backend, &composer, config, &jobs, events));

    let failed = posts.iter().filter(|p| p.error.is_some()).count();
    let manifest = BatchManifest {
        mode: mode_name(mode),
        font: composer.font().path().to_path_buf(),
        seed,
        requested: count,
        rendered: posts.len() - failed,
        failed,
        posts,
    };
    let manifest_path = write_manifest(&manifest, output_dir)?;
    info!(
        rendered = manifest.rendered,
        failed = manifest.failed,
        manifest = %manifest_path.display(),
        "batch complete"
    );
    Ok(manifest)
}

// thumbsmith/src/engine/batch.rs
use super::pipeline::{self, GlobalTransform};
use crate::core::{Result, RunConfig, ThumbError};
use crate::geometry::Anchor;
use crate::ops::ImageOps;
use crate::strategy::{EncodeFormat, QualityPreset, TransformStep};
use crate::utils::{format_file_size, replace_extension};
use image::DynamicImage;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// One thumbnail variant: where it goes, how it is produced, and an
/// optional extension override for the output filename. Configuration-time
/// data, read-only during a run.
#[derive(Debug, Clone)]
pub struct ThumbnailSpec {
    pub output_dir: PathBuf,
    pub steps: Vec<TransformStep>,
    pub ext_override: Option<String>,
}

impl ThumbnailSpec {
    pub fn new(output_dir: impl Into<PathBuf>, steps: Vec<TransformStep>) -> Self {
        Self {
            output_dir: output_dir.into(),
            steps,
            ext_override: None,
        }
    }

    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        self.ext_override = Some(ext.into());
        self
    }

    /// The task's identity: output directory joined with the source
    /// filename, extension replaced when an override is set. Derivable
    /// from the spec alone, so failures can be reported without running
    /// the pipeline.
    pub fn output_path(&self, source_name: &str) -> PathBuf {
        self.output_dir
            .join(replace_extension(source_name, self.ext_override.as_deref()))
    }

    /// Fallback output format when the pipeline declares no encode step,
    /// derived from the output filename extension.
    pub fn output_format(&self, source_name: &str) -> EncodeFormat {
        self.output_path(source_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(EncodeFormat::from_extension)
            .unwrap_or(EncodeFormat::Png)
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ThumbError::InvalidParameter(
                "Thumbnail spec has an empty output directory".to_string(),
            ));
        }

        for step in &self.steps {
            let dims = match *step {
                TransformStep::Crop { width, height, .. }
                | TransformStep::Fit { width, height, .. }
                | TransformStep::Stretch { width, height, .. }
                | TransformStep::Embed { width, height, .. } => Some((width, height)),
                _ => None,
            };
            if let Some((width, height)) = dims {
                if width == 0 || height == 0 {
                    return Err(ThumbError::InvalidParameter(format!(
                        "Thumbnail dimensions {}x{} have an empty axis",
                        width, height
                    )));
                }
                if width > 100_000 || height > 100_000 {
                    return Err(ThumbError::InvalidParameter(
                        "Dimensions too large (max 100,000 pixels)".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// The stock variant table: three center crops plus a best-quality
    /// fitted jpeg with an extension override.
    pub fn standard_set(root: &Path) -> Vec<ThumbnailSpec> {
        vec![
            ThumbnailSpec::new(
                root.join("300x100"),
                vec![TransformStep::crop(Anchor::Center, 300, 100, None)],
            ),
            ThumbnailSpec::new(
                root.join("100x300"),
                vec![TransformStep::crop(Anchor::Center, 100, 300, None)],
            ),
            ThumbnailSpec::new(
                root.join("200x200"),
                vec![TransformStep::crop(Anchor::Center, 200, 200, None)],
            ),
            ThumbnailSpec::new(
                root.join("hs"),
                vec![
                    TransformStep::fit(625, 400, Some(QualityPreset::BEST)),
                    TransformStep::jpeg(95),
                ],
            )
            .with_extension("jpg"),
        ]
    }
}

/// Terminal state of one task. Failures carry their cause; they never
/// escape the task boundary.
#[derive(Debug)]
pub enum TaskOutcome {
    Generated,
    Failed(ThumbError),
}

#[derive(Debug)]
pub struct TaskReport {
    pub output_path: PathBuf,
    pub outcome: TaskOutcome,
}

impl TaskReport {
    pub fn failure(&self) -> Option<&ThumbError> {
        match &self.outcome {
            TaskOutcome::Generated => None,
            TaskOutcome::Failed(err) => Some(err),
        }
    }
}

/// Aggregate of a full run. Every spec settles into exactly one report;
/// outputs that succeeded stay on disk regardless of sibling failures.
#[derive(Debug)]
pub struct BatchResult {
    pub reports: Vec<TaskReport>,
}

impl BatchResult {
    pub fn any_failed(&self) -> bool {
        self.reports.iter().any(|r| r.failure().is_some())
    }

    pub fn generated_count(&self) -> usize {
        self.reports.len() - self.failed_count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TaskReport> {
        self.reports.iter().filter(|r| r.failure().is_some())
    }
}

/// Runs every thumbnail pipeline against the shared decoded source with a
/// bounded worker pool, capturing each task's result so one bad variant
/// never takes down the batch.
pub struct BatchScheduler {
    max_concurrency: usize,
    thread_pool: rayon::ThreadPool,
}

impl BatchScheduler {
    /// `max_concurrency` bounds in-flight tasks; zero means the default
    /// bound.
    pub fn new(max_concurrency: usize) -> Result<Self> {
        let max_concurrency = if max_concurrency == 0 {
            RunConfig::DEFAULT_CONCURRENCY
        } else {
            max_concurrency
        };

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_concurrency)
            .build()
            .map_err(|e| {
                ThumbError::ProcessingError(format!("Failed to create thread pool: {}", e))
            })?;

        Ok(Self {
            max_concurrency,
            thread_pool,
        })
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Read and decode the configured source, then fan out.
    pub fn run(&self, ops: &dyn ImageOps, config: &RunConfig) -> Result<BatchResult> {
        config.validate()?;

        let source_name = config
            .source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ThumbError::InvalidParameter(format!(
                    "Invalid source file name: {}",
                    config.source.display()
                ))
            })?;

        let bytes = std::fs::read(&config.source)?;
        self.run_bytes(ops, &bytes, source_name, &config.global, &config.specs)
    }

    /// Decode `bytes` once, apply the shared pre-transform once, then run
    /// every pipeline against the result.
    pub fn run_bytes(
        &self,
        ops: &dyn ImageOps,
        bytes: &[u8],
        source_name: &str,
        global: &GlobalTransform,
        specs: &[ThumbnailSpec],
    ) -> Result<BatchResult> {
        let decoded = ops.decode(bytes)?;
        log::info!(
            "Loaded source {}: {}x{} pixels",
            source_name,
            decoded.width(),
            decoded.height()
        );

        // Shared pre-transform runs once, not once per variant.
        let source = if global.is_noop() {
            decoded
        } else {
            let (pre, _) = pipeline::apply_geometry(ops, &decoded, &global.steps())?;
            pre
        };

        let pb = self.create_progress_bar(specs.len());

        let reports: Vec<TaskReport> = self.thread_pool.install(|| {
            specs
                .par_iter()
                .progress_with(pb.clone())
                .map(|spec| self.run_task(ops, &source, source_name, spec))
                .collect()
        });

        let result = BatchResult { reports };
        pb.finish_with_message(format!(
            "{} generated, {} failed",
            result.generated_count(),
            result.failed_count()
        ));

        Ok(result)
    }

    /// One task end to end. All errors are converted into the report here;
    /// nothing propagates to sibling tasks.
    fn run_task(
        &self,
        ops: &dyn ImageOps,
        source: &DynamicImage,
        source_name: &str,
        spec: &ThumbnailSpec,
    ) -> TaskReport {
        let output_path = spec.output_path(source_name);

        let outcome = match self.execute_task(ops, source, source_name, spec, &output_path) {
            Ok(()) => {
                log::info!("generated {}", output_path.display());
                TaskOutcome::Generated
            }
            Err(err) => {
                log::error!("failed to generate {}: {}", output_path.display(), err);
                TaskOutcome::Failed(err)
            }
        };

        TaskReport {
            output_path,
            outcome,
        }
    }

    fn execute_task(
        &self,
        ops: &dyn ImageOps,
        source: &DynamicImage,
        source_name: &str,
        spec: &ThumbnailSpec,
        output_path: &Path,
    ) -> Result<()> {
        std::fs::create_dir_all(&spec.output_dir)?;

        let fallback = spec.output_format(source_name);
        let encoded = pipeline::execute(ops, source, &spec.steps, fallback)?;

        std::fs::write(output_path, &encoded)?;
        log::debug!(
            "wrote {} ({})",
            output_path.display(),
            format_file_size(encoded.len() as u64)
        );

        Ok(())
    }

    fn create_progress_bar(&self, total: usize) -> ProgressBar {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    }
}

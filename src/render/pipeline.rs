use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context as _;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    assets::color::ColorSpec,
    assets::svg_raster::{PreparedSource, prepare_source},
    catalog::formats::{FormatRecord, VariantDescriptor, catalog, max_dimension},
    foundation::error::{FaviconError, FaviconResult},
    io::paths::{validate_output_dir, validate_source},
    metadata::markup,
    render::variant::VariantRenderer,
};

/// Options shared by every variant of one generation run.
///
/// Deserializes from JSON with every field optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FaviconsOpts {
    /// Background color; only its RGB channels are used.
    pub background: ColorSpec,
    /// Fully transparent backing canvas when `true`, opaque `background` when `false`.
    pub transparent: bool,
    /// Prefix for hrefs and prefixed filenames.
    pub base_url: String,
    /// Worker threads for [`Favicons::generate_concurrent`]; `None` uses the rayon default.
    pub threads: Option<usize>,
}

impl Default for FaviconsOpts {
    fn default() -> Self {
        Self {
            background: ColorSpec::rgb(0, 0, 0),
            transparent: true,
            base_url: "/".to_owned(),
            threads: None,
        }
    }
}

impl FaviconsOpts {
    /// Parse options from JSON text.
    pub fn from_json_str(s: &str) -> FaviconResult<Self> {
        serde_json::from_str(s).map_err(|e| FaviconError::config(e.to_string()))
    }

    /// Load options from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> FaviconResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read options file '{}'", path.display()))?;
        Self::from_json_str(&text)
            .map_err(|e| FaviconError::config(format!("'{}': {e}", path.display())))
    }
}

/// Lifecycle of a [`Favicons`] pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Constructed; paths not checked yet.
    Unvalidated,
    /// Paths checked, source prepared; ready to generate.
    Validated,
    /// A generation run is in progress.
    Generating,
    /// The last generation run wrote every variant.
    Done,
}

#[derive(Debug)]
struct ValidatedPaths {
    source: PreparedSource,
    output_dir: PathBuf,
}

/// Favicon generation pipeline for one source image and one output directory.
///
/// Validation (path checks, output directory creation, SVG rasterization) happens once, either
/// in [`Favicons::open`] / [`Favicons::validate`] or lazily on the first generation call.
/// A rasterized SVG is a temporary owned by the pipeline; it is removed by [`Favicons::close`]
/// or when the pipeline is dropped, whatever the outcome of generation.
#[derive(Debug)]
pub struct Favicons {
    source: PathBuf,
    output_dir: PathBuf,
    opts: FaviconsOpts,
    catalog: &'static [VariantDescriptor],
    state: PipelineState,
    validated: Option<ValidatedPaths>,
    completed: AtomicUsize,
}

impl Favicons {
    /// Create an unvalidated pipeline. No filesystem access happens here.
    pub fn new(
        source: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        opts: FaviconsOpts,
    ) -> Self {
        Self {
            source: source.into(),
            output_dir: output_dir.into(),
            opts,
            catalog: catalog(),
            state: PipelineState::Unvalidated,
            validated: None,
            completed: AtomicUsize::new(0),
        }
    }

    /// Create and validate a pipeline.
    pub fn open(
        source: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        opts: FaviconsOpts,
    ) -> FaviconResult<Self> {
        let mut fav = Self::new(source, output_dir, opts);
        fav.validate()?;
        Ok(fav)
    }

    /// Open a pipeline, run `f` on it, then tear it down.
    ///
    /// The temporary rasterized source (if any) is removed on every exit path, including a
    /// validation failure or an error returned by `f`.
    pub fn scoped<R>(
        source: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        opts: FaviconsOpts,
        f: impl FnOnce(&mut Favicons) -> FaviconResult<R>,
    ) -> FaviconResult<R> {
        let mut fav = Self::open(source, output_dir, opts)?;
        let out = f(&mut fav);
        fav.close();
        out
    }

    /// Check paths and prepare the source. A no-op once validated.
    #[tracing::instrument(skip(self), fields(source = %self.source.display()))]
    pub fn validate(&mut self) -> FaviconResult<()> {
        if self.validated.is_some() {
            return Ok(());
        }

        let source = validate_source(&self.source)?;
        let output_dir = validate_output_dir(&self.output_dir)?;
        let source = prepare_source(&source, max_dimension(self.catalog))?;

        tracing::debug!(
            effective_source = %source.path().display(),
            output_dir = %output_dir.display(),
            "pipeline validated"
        );
        self.validated = Some(ValidatedPaths { source, output_dir });
        self.state = PipelineState::Validated;
        Ok(())
    }

    /// Render every catalog entry one at a time, in catalog order.
    ///
    /// Stops at the first failing variant and returns its error. Returns the written paths in
    /// catalog order.
    #[tracing::instrument(skip(self))]
    pub fn generate_sync(&mut self) -> FaviconResult<Vec<PathBuf>> {
        self.validate()?;
        self.state = PipelineState::Generating;
        let result = self.run_sequential();
        self.finish(result)
    }

    /// Render every catalog entry as an independent task on a worker pool.
    ///
    /// All tasks run to completion; if any fail, their errors are returned together as
    /// [`FaviconError::Batch`]. Files written by successful tasks are left in place. Returns the
    /// written paths in catalog order.
    #[tracing::instrument(skip(self))]
    pub fn generate_concurrent(&mut self) -> FaviconResult<Vec<PathBuf>> {
        self.validate()?;
        self.state = PipelineState::Generating;
        let result = self.run_concurrent();
        self.finish(result)
    }

    /// Remove the temporary rasterized source now. Dropping the pipeline does the same.
    pub fn close(mut self) {
        self.release_temporary();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// `true` once [`Favicons::validate`] has succeeded.
    pub fn is_validated(&self) -> bool {
        self.validated.is_some()
    }

    /// Total variants written by this pipeline across all runs.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Source path as given.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Output directory as given.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Raster image variants are rendered from; `None` before validation.
    pub fn effective_source(&self) -> Option<&Path> {
        self.validated.as_ref().map(|v| v.source.path())
    }

    /// Temporary rasterized source owned by this pipeline, if one exists.
    pub fn temp_source(&self) -> Option<&Path> {
        self.validated
            .as_ref()
            .filter(|v| v.source.owns_temporary())
            .map(|v| v.source.path())
    }

    /// Options this pipeline was built with.
    pub fn opts(&self) -> &FaviconsOpts {
        &self.opts
    }

    /// Variant catalog this pipeline renders.
    pub fn catalog(&self) -> &'static [VariantDescriptor] {
        self.catalog
    }

    /// `<link>` markup for every variant, using the configured base URL.
    pub fn links(&self) -> impl Iterator<Item = String> + Clone + '_ {
        markup::links(self.catalog, &self.opts.base_url)
    }

    /// `<link>` markup for every variant under an explicit base URL.
    pub fn links_for<'a>(&'a self, base_url: &'a str) -> impl Iterator<Item = String> + Clone + 'a {
        markup::links(self.catalog, base_url)
    }

    /// Collected [`Favicons::links`].
    pub fn html(&self) -> Vec<String> {
        self.links().collect()
    }

    /// Output filenames, optionally prefixed with the configured base URL.
    pub fn filenames(&self, prefix: bool) -> impl Iterator<Item = String> + Clone + '_ {
        markup::filenames(self.catalog, &self.opts.base_url, prefix)
    }

    /// Collected [`Favicons::filenames`].
    pub fn filenames_vec(&self, prefix: bool) -> Vec<String> {
        self.filenames(prefix).collect()
    }

    /// Serializable descriptor records.
    pub fn formats(&self) -> Vec<FormatRecord> {
        markup::formats(self.catalog)
    }

    /// Descriptor records as compact JSON.
    pub fn json(&self) -> FaviconResult<String> {
        markup::formats_json(self.catalog, false)
    }

    /// Descriptor records as indented JSON.
    pub fn json_pretty(&self) -> FaviconResult<String> {
        markup::formats_json(self.catalog, true)
    }

    fn renderer(&self) -> FaviconResult<VariantRenderer<'_>> {
        let paths = self.validated.as_ref().ok_or_else(|| {
            FaviconError::Other(anyhow::anyhow!(
                "internal error: generation requested before validation"
            ))
        })?;
        Ok(VariantRenderer {
            source: paths.source.path(),
            output_dir: &paths.output_dir,
            background: self.opts.background,
            transparent: self.opts.transparent,
            completed: &self.completed,
        })
    }

    fn run_sequential(&self) -> FaviconResult<Vec<PathBuf>> {
        let renderer = self.renderer()?;
        self.catalog
            .iter()
            .map(|desc| renderer.render(desc))
            .collect()
    }

    fn run_concurrent(&self) -> FaviconResult<Vec<PathBuf>> {
        let renderer = self.renderer()?;
        let pool = build_thread_pool(self.opts.threads)?;
        let catalog = self.catalog;

        let results = pool.install(|| {
            catalog
                .par_iter()
                .map(|desc| renderer.render(desc))
                .collect::<Vec<_>>()
        });

        let mut written = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for item in results {
            match item {
                Ok(path) => written.push(path),
                Err(e) => failures.push(e),
            }
        }

        if failures.is_empty() {
            Ok(written)
        } else {
            Err(FaviconError::Batch(failures))
        }
    }

    fn finish(&mut self, result: FaviconResult<Vec<PathBuf>>) -> FaviconResult<Vec<PathBuf>> {
        match &result {
            Ok(written) => {
                self.state = PipelineState::Done;
                tracing::debug!(
                    written = written.len(),
                    completed = self.completed(),
                    "generation finished"
                );
            }
            Err(e) => {
                self.state = PipelineState::Validated;
                tracing::debug!(error = %e, "generation failed");
            }
        }
        result
    }

    fn release_temporary(&mut self) {
        if let Some(paths) = self.validated.as_mut() {
            paths.source.release();
        }
    }
}

impl Drop for Favicons {
    fn drop(&mut self) {
        self.release_temporary();
    }
}

fn build_thread_pool(threads: Option<usize>) -> FaviconResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(FaviconError::config("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| FaviconError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;

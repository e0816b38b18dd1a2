//! Command-line interface for batch solving PNG jigsaw images

use crate::algorithm::executor::{Analysis, SolverConfig, analyze, solve};
use crate::algorithm::reconstruction::SeedPolicy;
use crate::io::analysis::AnalysisArtifact;
use crate::io::configuration::{
    ANALYSIS_SUFFIX, DEFAULT_CANDIDATE_CAPACITY, DEFAULT_MATCH_DEPTH, DEFAULT_SEGMENT_SIZE,
    OUTPUT_SUFFIX,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::{load_rgba, render_placement, save_image};
use crate::io::progress::ProgressManager;
use clap::Parser;
use image::RgbaImage;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "tilestitch")]
#[command(
    author,
    version,
    about = "Reassemble shuffled square-tile images from edge affinities"
)]
/// Command-line arguments for the solver
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Tile edge length in pixels
    #[arg(short, long, default_value_t = DEFAULT_SEGMENT_SIZE)]
    pub segment_size: u32,

    /// Candidates kept per tile and direction
    #[arg(short, long, default_value_t = DEFAULT_CANDIDATE_CAPACITY)]
    pub candidates: usize,

    /// Depth of the mutual-rank search (at most the candidate count)
    #[arg(short = 'd', long, default_value_t = DEFAULT_MATCH_DEPTH)]
    pub match_depth: usize,

    /// Highest edge score a confirmed link may have
    #[arg(short, long)]
    pub threshold: Option<u64>,

    /// Tile id to anchor at the top-left cell instead of searching
    #[arg(long)]
    pub seed_tile: Option<usize>,

    /// Ignore stored analysis and rescore every tile pair
    #[arg(short, long)]
    pub recompute: bool,

    /// Score on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Suppress progress output and informational logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter for the chosen verbosity
    pub const fn log_filter(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Solver parameters from the arguments
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if the combination is inconsistent
    pub fn solver_config(&self) -> Result<SolverConfig> {
        let config = SolverConfig {
            segment_size: self.segment_size,
            candidate_capacity: self.candidates,
            match_depth: self.match_depth,
            link_threshold: self.threshold,
            seed_policy: self
                .seed_tile
                .map_or(SeedPolicy::BestCoverage, SeedPolicy::Explicit),
            parallel: !self.sequential,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Orchestrates batch processing of PNG files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if argument validation, target discovery, or any
    /// file's processing fails
    pub fn process(&mut self) -> Result<()> {
        let config = self.cli.solver_config()?;
        let files = self.collect_files()?;

        if files.is_empty() {
            info!("nothing to do");
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index, &config)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if is_png(&self.cli.target) {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_parameter(
                    "target",
                    &self.cli.target.display(),
                    &"must be a PNG image",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if is_png(&path) && !is_output(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &"must be a PNG file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = output_path(input_path);
        if output_path.exists() {
            info!("skipping {} (output exists)", input_path.display());
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, index: usize, config: &SolverConfig) -> Result<()> {
        let start_time = Instant::now();
        info!("solving {}", input_path.display());

        let image = load_rgba(input_path)?;
        let analysis = self.load_or_analyze(input_path, index, &image, config)?;
        let solution = solve(&analysis, config)?;

        let rendered = render_placement(&image, &analysis.grid, &solution.placement)?;
        let output = output_path(input_path);
        save_image(&rendered, &output)?;

        let report = &solution.report;
        info!(
            "wrote {}: {}/{} cells filled, {}/{} in original position",
            output.display(),
            solution.placement.filled_count(),
            analysis.grid.len(),
            report.accuracy.correct,
            report.accuracy.total
        );
        for (direction, count) in report.unresolved_by_direction() {
            info!("  {count} tiles without a {direction} link");
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, start_time.elapsed());
        }

        Ok(())
    }

    // Stored analysis is reused only when it matches the image and settings
    fn load_or_analyze(
        &mut self,
        input_path: &Path,
        index: usize,
        image: &RgbaImage,
        config: &SolverConfig,
    ) -> Result<Analysis> {
        let artifact_path = analysis_path(input_path);

        if !self.cli.recompute && artifact_path.exists() {
            let stored = AnalysisArtifact::load(&artifact_path).and_then(|artifact| {
                artifact.into_analysis(
                    image.width(),
                    image.height(),
                    config.segment_size,
                    config.candidate_capacity,
                )
            });
            match stored {
                Ok(analysis) => {
                    info!("reusing analysis {}", artifact_path.display());
                    if let Some(ref mut pm) = self.progress_manager {
                        pm.reuse_file(index);
                    }
                    return Ok(analysis);
                }
                Err(e) => warn!("recomputing analysis: {e}"),
            }
        }

        let tiles = (image.width() / config.segment_size.max(1)) as usize
            * (image.height() / config.segment_size.max(1)) as usize;
        let bar = self
            .progress_manager
            .as_mut()
            .and_then(|pm| pm.start_file(index, input_path, tiles));

        let analysis = analyze(image, config, bar.as_ref())?;
        AnalysisArtifact::from_analysis(&analysis).save(&artifact_path)?;
        Ok(analysis)
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

// Our own results live next to the inputs; never treat them as puzzles
fn is_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
}

/// Path of the reconstructed image for an input
pub fn output_path(input_path: &Path) -> PathBuf {
    sibling_path(input_path, &format!("{OUTPUT_SUFFIX}.png"))
}

/// Path of the persisted analysis for an input
pub fn analysis_path(input_path: &Path) -> PathBuf {
    sibling_path(input_path, ANALYSIS_SUFFIX)
}

fn sibling_path(input_path: &Path, suffix: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let name = format!("{}{suffix}", stem.to_string_lossy());

    if let Some(parent) = input_path.parent() {
        parent.join(name)
    } else {
        PathBuf::from(name)
    }
}

//! Persisted analysis artifact for reuse across runs
//!
//! The artifact records the grid geometry and every tile's candidate lists
//! so a later run can skip the pairwise pass. It is written all-or-nothing:
//! the JSON goes to a sibling temporary file that is renamed into place only
//! once fully written.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::algorithm::executor::Analysis;
use crate::analysis::ranking::{CandidateList, CandidateTable, TileCandidates};
use crate::io::error::{Result, SolverError, WithPath};
use crate::spatial::TileGrid;

/// Stored candidates of one tile
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Tile id
    pub id: usize,
    /// Origin column
    pub x: usize,
    /// Origin row
    pub y: usize,
    /// Ranked north candidates
    pub north: CandidateList,
    /// Ranked east candidates
    pub east: CandidateList,
    /// Ranked south candidates
    pub south: CandidateList,
    /// Ranked west candidates
    pub west: CandidateList,
}

/// Serializable form of an [`Analysis`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisArtifact {
    /// Tile edge length in pixels
    pub segment_size: u32,
    /// Tile columns
    pub segments_wide: usize,
    /// Tile rows
    pub segments_tall: usize,
    /// Candidates kept per list when the pass ran
    pub candidate_capacity: usize,
    /// Per-tile records in id order
    pub tiles: Vec<TileRecord>,
}

impl AnalysisArtifact {
    /// Capture a finished analysis
    pub fn from_analysis(analysis: &Analysis) -> Self {
        let tiles = analysis
            .grid
            .tiles()
            .iter()
            .zip(analysis.candidates.rows())
            .map(|(tile, lists)| TileRecord {
                id: tile.id,
                x: tile.x,
                y: tile.y,
                north: lists.north.clone(),
                east: lists.east.clone(),
                south: lists.south.clone(),
                west: lists.west.clone(),
            })
            .collect();

        Self {
            segment_size: analysis.grid.segment_size(),
            segments_wide: analysis.grid.segments_wide(),
            segments_tall: analysis.grid.segments_tall(),
            candidate_capacity: analysis.candidates.capacity(),
            tiles,
        }
    }

    /// Rebuild the analysis for an image of `width` x `height` pixels
    ///
    /// # Errors
    ///
    /// Returns an artifact mismatch error if:
    /// - The stored geometry differs from the image or the expected settings
    /// - Tile records are missing, reordered, or carry wrong origins
    ///
    /// Returns an out-of-range or parameter error if candidate lists are
    /// malformed
    pub fn into_analysis(
        self,
        width: u32,
        height: u32,
        segment_size: u32,
        candidate_capacity: usize,
    ) -> Result<Analysis> {
        if self.segment_size != segment_size {
            return Err(mismatch(&format!(
                "segment size {} != {segment_size}",
                self.segment_size
            )));
        }
        if self.candidate_capacity != candidate_capacity {
            return Err(mismatch(&format!(
                "candidate capacity {} != {candidate_capacity}",
                self.candidate_capacity
            )));
        }

        let grid = TileGrid::new(width, height, segment_size)?;
        if (grid.segments_wide(), grid.segments_tall()) != (self.segments_wide, self.segments_tall)
        {
            return Err(mismatch(&format!(
                "grid {}x{} != {}x{}",
                self.segments_wide,
                self.segments_tall,
                grid.segments_wide(),
                grid.segments_tall()
            )));
        }
        if self.tiles.len() != grid.len() {
            return Err(mismatch(&format!(
                "{} tile records for {} tiles",
                self.tiles.len(),
                grid.len()
            )));
        }

        let mut rows = Vec::with_capacity(self.tiles.len());
        for (tile, record) in grid.tiles().iter().zip(self.tiles) {
            if (record.id, record.x, record.y) != (tile.id, tile.x, tile.y) {
                return Err(mismatch(&format!(
                    "record {} at ({}, {}) does not match tile {}",
                    record.id, record.x, record.y, tile.id
                )));
            }
            rows.push(TileCandidates {
                north: record.north,
                east: record.east,
                south: record.south,
                west: record.west,
            });
        }

        let candidates = CandidateTable::from_rows(candidate_capacity, rows)?;
        Ok(Analysis { grid, candidates })
    }

    /// Read an artifact from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| SolverError::FileSystem {
            path: path.to_path_buf(),
            operation: "read analysis",
            source: e,
        })?;
        serde_json::from_str(&raw).with_path(path)
    }

    /// Write the artifact as pretty JSON, replacing any previous file atomically
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be written or renamed into place
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).with_path(path)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SolverError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let staging = staging_path(path);
        fs::write(&staging, json).map_err(|e| SolverError::FileSystem {
            path: staging.clone(),
            operation: "write analysis",
            source: e,
        })?;
        fs::rename(&staging, path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            SolverError::FileSystem {
                path: path.to_path_buf(),
                operation: "replace analysis",
                source: e,
            }
        })
    }
}

fn mismatch(reason: &impl ToString) -> SolverError {
    SolverError::ArtifactMismatch {
        reason: reason.to_string(),
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

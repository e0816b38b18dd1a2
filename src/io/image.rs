//! PNG loading and reconstruction export

use image::imageops;
use image::{Rgba, RgbaImage};
use std::path::Path;

use crate::io::configuration::GAP_COLOR;
use crate::io::error::{Result, SolverError, out_of_range};
use crate::spatial::{PlacementGrid, TileGrid};

/// Load an image from disk as 8-bit RGBA
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| SolverError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(img.to_rgba8())
}

/// Copy every placed tile's block into its cell of a new image
///
/// Empty cells are filled with `GAP_COLOR`.
///
/// # Errors
///
/// Returns an error if:
/// - `placement` is not shaped like `grid`
/// - `source` is smaller than the grid
/// - A placed tile id is outside the grid
pub fn render_placement(
    source: &RgbaImage,
    grid: &TileGrid,
    placement: &PlacementGrid,
) -> Result<RgbaImage> {
    let size = grid.segment_size();
    let width = grid.segments_wide() as u32 * size;
    let height = grid.segments_tall() as u32 * size;

    if (placement.cols(), placement.rows()) != (grid.segments_wide(), grid.segments_tall()) {
        return Err(out_of_range(
            "placement shape",
            &(placement.cols(), placement.rows()),
            &(grid.segments_wide(), grid.segments_tall()),
        ));
    }
    if source.width() < width || source.height() < height {
        return Err(SolverError::OutOfBounds {
            x: width - 1,
            y: height - 1,
            width: source.width(),
            height: source.height(),
        });
    }

    let mut output = RgbaImage::from_pixel(width, height, Rgba(GAP_COLOR));
    for ((col, row), tile) in placement.iter() {
        let Some(tile) = tile else {
            continue;
        };
        let (left, top) = grid.tile(tile)?.pixel_origin(size);
        let block = imageops::crop_imm(source, left, top, size, size).to_image();
        imageops::replace(
            &mut output,
            &block,
            i64::from(col as u32 * size),
            i64::from(row as u32 * size),
        );
    }

    Ok(output)
}

/// Save an image, creating the parent directory when needed
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the image cannot
/// be encoded to `output_path`
pub fn save_image(image: &RgbaImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SolverError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    image
        .save(output_path)
        .map_err(|e| SolverError::ImageExport {
            path: output_path.into(),
            source: e,
        })
}

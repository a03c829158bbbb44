use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::edge::compose::clear_masked;
use crate::edge::marker::{EdgeMarker, MarkStats, MarkStrategy, MarkerConfig};
use crate::error::UnblackError;
use crate::grid::BitGrid;
use crate::pbm::{read_pbm, write_plain_pbm};

/// Comment written into every cleaned bitmap.
pub const OUTPUT_COMMENT: &str = "processed unblackedges file";

/// Comment written when the mask itself is emitted.
pub const MASK_COMMENT: &str = "unblackedges black-edge mask";

/// Which grid a run writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emit {
    /// The input with border-connected black pixels cleared.
    #[default]
    Cleaned,
    /// The black-edge mask.
    Mask,
}

/// Pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub marker: MarkerConfig,
    pub emit: Emit,
}

/// Summary of one processed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunSummary {
    pub width: usize,
    pub height: usize,
    pub strategy: MarkStrategy,
    pub marking: MarkStats,
}

/// Clear every border-connected black pixel of `image` in place.
pub fn unblack_edges(image: &mut BitGrid, config: &MarkerConfig) -> MarkStats {
    let (mask, stats) = EdgeMarker::new(config.clone()).mark(image);
    clear_masked(image, &mask);
    stats
}

/// Read a bitmap from `input`, clear its black edges, and write plain PBM to
/// `output`.
pub fn process<R: Read, W: Write>(
    input: R,
    output: W,
    config: &PipelineConfig,
) -> Result<RunSummary, UnblackError> {
    let mut image = read_pbm(input)?;
    let (mask, marking) = EdgeMarker::new(config.marker.clone()).mark(&image);

    match config.emit {
        Emit::Cleaned => {
            let cleared = clear_masked(&mut image, &mask);
            info!(
                "cleared {cleared} border-connected pixels from {}x{} image",
                image.width(),
                image.height()
            );
            write_plain_pbm(output, &image, Some(OUTPUT_COMMENT))?;
        }
        Emit::Mask => write_plain_pbm(output, &mask, Some(MASK_COMMENT))?,
    }

    Ok(RunSummary {
        width: image.width(),
        height: image.height(),
        strategy: config.marker.strategy,
        marking,
    })
}

/// Pick the input path from the positional arguments: none means stdin, one
/// names a file, more is an error.
pub fn input_path(paths: &[PathBuf]) -> Result<Option<&Path>, UnblackError> {
    match paths {
        [] => Ok(None),
        [path] => Ok(Some(path.as_path())),
        _ => Err(UnblackError::InvalidArgumentCount(paths.len())),
    }
}

/// Process the named file, or stdin when `path` is `None`.
pub fn run<W: Write>(
    path: Option<&Path>,
    output: W,
    config: &PipelineConfig,
) -> Result<RunSummary, UnblackError> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|source| UnblackError::FileOpen {
                path: path.to_path_buf(),
                source,
            })?;
            process(BufReader::new(file), output, config)
        }
        None => process(io::stdin().lock(), output, config),
    }
}

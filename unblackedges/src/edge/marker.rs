use std::collections::VecDeque;

use log::{debug, trace};

use crate::grid::BitGrid;

/// How border connectivity is propagated from the seeded border pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum MarkStrategy {
    /// Repeated forward and mirrored raster passes until nothing changes.
    #[default]
    Relaxation,
    /// Breadth-first propagation from the border seeds.
    FloodFill,
}

/// Marker configuration.
#[derive(Debug, Clone, Default)]
pub struct MarkerConfig {
    pub strategy: MarkStrategy,
}

/// Counters collected while building a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MarkStats {
    /// Relaxation passes run, including the final pass that changed nothing.
    /// Always 1 for flood fill.
    pub passes: usize,
    /// Black pixels on the image border.
    pub seeded: usize,
    /// Black pixels marked as border-connected.
    pub marked: usize,
}

/// Computes which black pixels are 4-connected to the image border.
#[derive(Debug, Clone, Default)]
pub struct EdgeMarker {
    pub config: MarkerConfig,
}

impl EdgeMarker {
    pub fn new(config: MarkerConfig) -> Self {
        Self { config }
    }

    /// Build the black-edge mask for `image`.
    ///
    /// A mask bit is set iff the image pixel is black and a path of
    /// 4-adjacent black pixels joins it to row 0, the last row, column 0 or
    /// the last column. The mask is always a subset of the black pixels.
    pub fn mark(&self, image: &BitGrid) -> (BitGrid, MarkStats) {
        let mut mask = seed_border(image);
        let seeded = mask.count_ones();

        let passes = match self.config.strategy {
            MarkStrategy::Relaxation => relax_to_fixpoint(image, &mut mask),
            MarkStrategy::FloodFill => {
                flood_fill(image, &mut mask);
                1
            }
        };

        let stats = MarkStats {
            passes,
            seeded,
            marked: mask.count_ones(),
        };
        debug!(
            "{:?} marking of {}x{} image: {} seeds, {} marked in {} passes",
            self.config.strategy,
            image.width(),
            image.height(),
            stats.seeded,
            stats.marked,
            stats.passes
        );
        (mask, stats)
    }
}

/// Build the black-edge mask with the default configuration.
pub fn mark_black_edges(image: &BitGrid) -> BitGrid {
    EdgeMarker::default().mark(image).0
}

/// Copy the image's first and last rows and columns into a fresh mask.
pub fn seed_border(image: &BitGrid) -> BitGrid {
    let w = image.width();
    let h = image.height();
    let mut mask = BitGrid::new(w, h);
    if w == 0 || h == 0 {
        return mask;
    }

    let mut copy = |col: usize, row: usize| {
        let idx = row * w + col;
        mask.set_bit(idx, image.bit(idx));
    };
    for col in 0..w {
        copy(col, 0);
        copy(col, h - 1);
    }
    for row in 0..h {
        copy(0, row);
        copy(w - 1, row);
    }
    mask
}

/// Run relaxation passes until one marks nothing. Returns the pass count.
fn relax_to_fixpoint(image: &BitGrid, mask: &mut BitGrid) -> usize {
    let mut passes = 0;
    loop {
        passes += 1;
        let marked = relaxation_pass(image, mask);
        trace!("relaxation pass {passes}: {marked} new marks");
        if marked == 0 {
            return passes;
        }
    }
}

/// One scan over the interior, returning how many cells it newly marked.
///
/// Each forward raster step is paired with the point-mirrored cell, so marks
/// spread from the top-left and bottom-right borders within the same pass.
/// New marks from either direction count as progress.
pub fn relaxation_pass(image: &BitGrid, mask: &mut BitGrid) -> usize {
    let w = image.width();
    let h = image.height();
    if w < 3 || h < 3 {
        return 0;
    }

    let mut marked = 0;
    for row in 1..h - 1 {
        for col in 1..w - 1 {
            if mark_if_connected(image, mask, col, row) {
                marked += 1;
            }
            if mark_if_connected(image, mask, w - 1 - col, h - 1 - row) {
                marked += 1;
            }
        }
    }
    marked
}

/// Mark an interior black cell if any 4-neighbor is already marked.
///
/// `(col, row)` must be an interior cell.
fn mark_if_connected(image: &BitGrid, mask: &mut BitGrid, col: usize, row: usize) -> bool {
    let w = image.width();
    let id = row * w + col;
    if !image.bit(id) || mask.bit(id) {
        return false;
    }

    if mask.bit(id - 1) || mask.bit(id + 1) || mask.bit(id - w) || mask.bit(id + w) {
        mask.set_bit(id, true);
        return true;
    }
    false
}

/// Grow `mask` from its set cells over 4-adjacent black image cells.
fn flood_fill(image: &BitGrid, mask: &mut BitGrid) {
    let w = image.width();
    let h = image.height();
    let mut queue: VecDeque<usize> = (0..mask.count()).filter(|&id| mask.bit(id)).collect();

    while let Some(id) = queue.pop_front() {
        let col = id % w;
        let row = id / w;

        let mut visit = |n: usize| {
            if image.bit(n) && !mask.bit(n) {
                mask.set_bit(n, true);
                queue.push_back(n);
            }
        };
        if col > 0 {
            visit(id - 1);
        }
        if col + 1 < w {
            visit(id + 1);
        }
        if row > 0 {
            visit(id - w);
        }
        if row + 1 < h {
            visit(id + w);
        }
    }
}

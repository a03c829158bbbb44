use crate::error::GridError;
use crate::grid::BitGrid;

/// Clear every image pixel whose mask bit is set. Returns the number of
/// pixels that changed from black to white.
///
/// The mask is only read. Both grids must have the same dimensions.
pub fn apply(image: &mut BitGrid, mask: &BitGrid) -> Result<usize, GridError> {
    if image.width() != mask.width() || image.height() != mask.height() {
        return Err(GridError::DimensionMismatch {
            width: image.width(),
            height: image.height(),
            actual_width: mask.width(),
            actual_height: mask.height(),
        });
    }
    Ok(clear_masked(image, mask))
}

/// [`apply`] for grids already known to share dimensions.
pub(crate) fn clear_masked(image: &mut BitGrid, mask: &BitGrid) -> usize {
    let mut cleared = 0;
    for (word, &m) in image.words_mut().iter_mut().zip(mask.words()) {
        cleared += (*word & m).count_ones() as usize;
        *word &= !m;
    }
    cleared
}

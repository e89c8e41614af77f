//! Atlas grid selection

/// Border added on each side of every atlas cell
pub const CELL_BORDER: usize = 2;

/// Choose `(columns, rows)` for `frame_count` cells of `cell_width` by
/// `cell_height` pixels
///
/// Aims for a roughly square atlas, then drops rows that would stay empty.
/// The result satisfies `columns * rows >= frame_count` and
/// `columns * (rows - 1) < frame_count`. A single frame (or none) gives a
/// single cell.
pub fn frame_configuration(
    frame_count: usize,
    cell_width: usize,
    cell_height: usize,
) -> (usize, usize) {
    if frame_count <= 1 {
        return (1, 1);
    }

    let ratio = frame_count * cell_width / cell_height.max(1);
    let mut rows = ((ratio as f64).sqrt().ceil() as usize).max(1);
    let columns = frame_count.div_ceil(rows).max(1);

    while columns * (rows - 1) >= frame_count {
        rows -= 1;
    }

    (columns, rows)
}

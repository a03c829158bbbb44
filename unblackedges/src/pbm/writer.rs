use std::io::{self, BufWriter, Write};

use crate::grid::BitGrid;

/// Rows wider than this are wrapped every `WRAP_VALUES` pixels counted across
/// the whole image, keeping lines under 70 characters.
const WRAP_VALUES: usize = 35;

/// Write `grid` as a plain (`P1`) PBM with an optional comment line.
///
/// Every pixel is followed by one separator: a newline at the end of each row
/// for narrow images, or after every 35th pixel for images wider than 35.
pub fn write_plain_pbm<W: Write>(out: W, grid: &BitGrid, comment: Option<&str>) -> io::Result<()> {
    let mut out = BufWriter::new(out);
    writeln!(out, "P1")?;
    if let Some(comment) = comment {
        writeln!(out, "# {comment}")?;
    }
    writeln!(out, "{} {}", grid.width(), grid.height())?;

    let mut result: io::Result<()> = Ok(());
    grid.map_row_major(|col, row, g, bit| {
        if result.is_ok() {
            result = write_pixel(&mut out, col, row, g.width(), bit);
        }
    });
    result?;
    out.flush()
}

fn write_pixel<W: Write>(out: &mut W, col: usize, row: usize, width: usize, bit: bool) -> io::Result<()> {
    let end_of_line = if width > WRAP_VALUES {
        (col + row * width + 1) % WRAP_VALUES == 0
    } else {
        col == width - 1
    };
    let digit = if bit { b'1' } else { b'0' };
    let sep = if end_of_line { b'\n' } else { b' ' };
    out.write_all(&[digit, sep])
}

use std::io::Read;

use log::debug;

use super::PbmKind;
use crate::error::PbmError;
use crate::grid::BitGrid;

/// Dimensions and kind declared by a Netpbm header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PbmHeader {
    pub kind: PbmKind,
    pub width: usize,
    pub height: usize,
}

/// Byte cursor over a whole Netpbm file.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    fn rest(&self) -> &'a [u8] {
        let buf = self.buf;
        &buf[self.pos.min(buf.len())..]
    }

    /// Skip whitespace and `#` comments (which run to end of line).
    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if c == b'#' {
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                }
            } else if c.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn magic(&mut self) -> Result<PbmKind, PbmError> {
        let kind = match self.buf {
            [a, b, ..] => PbmKind::from_magic([*a, *b]),
            _ => None,
        };
        let kind = kind.ok_or_else(|| PbmError::Malformed("missing Netpbm magic number".into()))?;
        self.pos = 2;
        match self.peek() {
            Some(c) if !c.is_ascii_whitespace() && c != b'#' => Err(PbmError::Malformed(format!(
                "expected whitespace after {}, found {:?}",
                kind.magic(),
                c as char
            ))),
            _ => Ok(kind),
        }
    }

    fn number(&mut self, what: &str) -> Result<usize, PbmError> {
        self.skip_separators();
        let start = self.pos;
        let mut value: usize = 0;
        while let Some(c) = self.peek().filter(u8::is_ascii_digit) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add((c - b'0') as usize))
                .ok_or_else(|| PbmError::Malformed(format!("{what} is too large")))?;
            self.pos += 1;
        }
        if self.pos == start {
            return Err(match self.peek() {
                None => PbmError::Malformed(format!("header ended before {what}")),
                Some(c) => PbmError::Malformed(format!("expected {what}, found {:?}", c as char)),
            });
        }
        Ok(value)
    }
}

fn header(cur: &mut Cursor<'_>) -> Result<PbmHeader, PbmError> {
    let kind = cur.magic()?;
    let width = cur.number("width")?;
    let height = cur.number("height")?;
    if !kind.is_bitmap() {
        return Err(PbmError::InvalidFormat(kind));
    }
    if width == 0 || height == 0 {
        return Err(PbmError::Malformed(format!(
            "image dimensions {width}x{height} must be positive"
        )));
    }
    if width.checked_mul(height).is_none() {
        return Err(PbmError::Malformed(format!(
            "image dimensions {width}x{height} are too large"
        )));
    }
    Ok(PbmHeader {
        kind,
        width,
        height,
    })
}

/// Parse only the header of a Netpbm image.
///
/// Fails with [`PbmError::InvalidFormat`] when the image is not a bitmap.
pub fn read_header(buf: &[u8]) -> Result<PbmHeader, PbmError> {
    header(&mut Cursor::new(buf))
}

/// Read a `P1` or `P4` bitmap into a grid.
///
/// Pixels are stored row-major; a `1` in the file is black.
pub fn read_pbm<R: Read>(mut input: R) -> Result<BitGrid, PbmError> {
    let mut buf = Vec::new();
    input.read_to_end(&mut buf)?;

    let mut cur = Cursor::new(&buf);
    let hdr = header(&mut cur)?;
    debug!("reading {} image {}x{}", hdr.kind, hdr.width, hdr.height);

    match hdr.kind {
        PbmKind::RawBitmap => read_raw_pixels(&mut cur, hdr),
        _ => read_plain_pixels(&mut cur, hdr),
    }
}

fn read_plain_pixels(cur: &mut Cursor<'_>, hdr: PbmHeader) -> Result<BitGrid, PbmError> {
    let expected = hdr.width * hdr.height;

    // Every pixel takes at least one byte, so a short input is reported
    // before the grid is allocated.
    if cur.rest().len() < expected {
        scan_plain_pixels(&mut Cursor::new(cur.rest()), expected, |_| {})?;
    }

    let mut grid = BitGrid::new(hdr.width, hdr.height);
    scan_plain_pixels(cur, expected, |idx| {
        grid.set_bit(idx, true);
    })?;
    Ok(grid)
}

/// Walk `expected` plain pixels, calling `black` with the index of each `1`.
fn scan_plain_pixels<F>(cur: &mut Cursor<'_>, expected: usize, mut black: F) -> Result<(), PbmError>
where
    F: FnMut(usize),
{
    for idx in 0..expected {
        cur.skip_separators();
        match cur.peek() {
            Some(b'0') => {}
            Some(b'1') => black(idx),
            Some(c) => {
                return Err(PbmError::Malformed(format!(
                    "unexpected {:?} in pixel data",
                    c as char
                )))
            }
            None => return Err(PbmError::Truncated { expected, got: idx }),
        }
        cur.pos += 1;
    }
    Ok(())
}

fn read_raw_pixels(cur: &mut Cursor<'_>, hdr: PbmHeader) -> Result<BitGrid, PbmError> {
    // Exactly one whitespace byte separates the header from raster data.
    match cur.peek() {
        Some(c) if c.is_ascii_whitespace() => cur.pos += 1,
        _ => return Err(PbmError::Malformed("missing whitespace after header".into())),
    }

    let expected = hdr.width * hdr.height;
    let row_bytes = hdr.width.div_ceil(8);
    let data = cur.rest();

    // Checked before allocating so a lying header cannot demand a huge grid.
    let needed = row_bytes.checked_mul(hdr.height).unwrap_or(usize::MAX);
    if data.len() < needed {
        let full_rows = data.len() / row_bytes;
        let partial = ((data.len() % row_bytes) * 8).min(hdr.width);
        return Err(PbmError::Truncated {
            expected,
            got: full_rows * hdr.width + partial,
        });
    }

    let mut grid = BitGrid::new(hdr.width, hdr.height);
    for (row, bytes) in data.chunks_exact(row_bytes).take(hdr.height).enumerate() {
        for col in 0..hdr.width {
            if bytes[col / 8] & (0x80 >> (col % 8)) != 0 {
                grid.set_bit(row * hdr.width + col, true);
            }
        }
    }
    Ok(grid)
}

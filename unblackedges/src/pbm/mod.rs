//! Netpbm bitmap input and plain-PBM output.

use std::fmt;

pub mod reader;
pub mod writer;

pub use reader::{read_header, read_pbm, PbmHeader};
pub use writer::write_plain_pbm;

/// Image kind declared by a Netpbm magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PbmKind {
    /// `P1`
    PlainBitmap,
    /// `P2`
    PlainGraymap,
    /// `P3`
    PlainPixmap,
    /// `P4`
    RawBitmap,
    /// `P5`
    RawGraymap,
    /// `P6`
    RawPixmap,
}

impl PbmKind {
    pub fn from_magic(magic: [u8; 2]) -> Option<Self> {
        match &magic {
            b"P1" => Some(Self::PlainBitmap),
            b"P2" => Some(Self::PlainGraymap),
            b"P3" => Some(Self::PlainPixmap),
            b"P4" => Some(Self::RawBitmap),
            b"P5" => Some(Self::RawGraymap),
            b"P6" => Some(Self::RawPixmap),
            _ => None,
        }
    }

    pub fn magic(self) -> &'static str {
        match self {
            Self::PlainBitmap => "P1",
            Self::PlainGraymap => "P2",
            Self::PlainPixmap => "P3",
            Self::RawBitmap => "P4",
            Self::RawGraymap => "P5",
            Self::RawPixmap => "P6",
        }
    }

    /// True for the bi-level kinds (`P1`, `P4`).
    pub fn is_bitmap(self) -> bool {
        matches!(self, Self::PlainBitmap | Self::RawBitmap)
    }
}

impl fmt::Display for PbmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlainBitmap | Self::RawBitmap => "bitmap",
            Self::PlainGraymap | Self::RawGraymap => "graymap",
            Self::PlainPixmap | Self::RawPixmap => "pixmap",
        };
        write!(f, "{} {}", self.magic(), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_round_trips() {
        for digit in b'1'..=b'6' {
            let kind = PbmKind::from_magic([b'P', digit]).unwrap();
            assert_eq!(kind.magic().as_bytes(), &[b'P', digit]);
        }
        assert_eq!(PbmKind::from_magic(*b"P7"), None);
        assert_eq!(PbmKind::from_magic(*b"BM"), None);
    }

    #[test]
    fn only_bitmaps_are_bitmaps() {
        assert!(PbmKind::PlainBitmap.is_bitmap());
        assert!(PbmKind::RawBitmap.is_bitmap());
        assert!(!PbmKind::PlainGraymap.is_bitmap());
        assert!(!PbmKind::RawPixmap.is_bitmap());
        assert_eq!(PbmKind::RawGraymap.to_string(), "P5 graymap");
    }
}

//! Seven-segment score display encoder
//!
//! Segments are labelled `a` through `g` clockwise from the top, with `g` the
//! middle bar. A pattern stores them as seven bits, `a` in bit 6 down to `g`
//! in bit 0, so `0b1111110` is the digit zero.
//!
//! The display is single-digit: anything outside 0..=9 shows an "E".

use serde::{Deserialize, Serialize};

/// One of the seven bars of a digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Segment {
    pub const ALL: [Segment; 7] = [
        Segment::A,
        Segment::B,
        Segment::C,
        Segment::D,
        Segment::E,
        Segment::F,
        Segment::G,
    ];

    #[inline]
    fn mask(self) -> u8 {
        1 << (6 - self as u8)
    }
}

/// Lit/unlit state of the seven segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentPattern(u8);

const DIGITS: [u8; 10] = [
    0b111_1110, // 0
    0b011_0000, // 1
    0b110_1101, // 2
    0b111_1001, // 3
    0b011_0011, // 4
    0b101_1011, // 5
    0b001_1111, // 6
    0b111_0000, // 7
    0b111_1111, // 8
    0b111_0011, // 9
];

impl SegmentPattern {
    /// The "E" glyph shown for values the display cannot hold
    pub const ERROR: SegmentPattern = SegmentPattern(0b100_1111);

    /// Raw `abcdefg` bits
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_lit(self, segment: Segment) -> bool {
        self.0 & segment.mask() != 0
    }

    /// Segments that are lit, in `a..g` order
    pub fn lit_segments(self) -> impl Iterator<Item = Segment> {
        Segment::ALL.into_iter().filter(move |s| self.is_lit(*s))
    }

    pub fn is_error(self) -> bool {
        self == Self::ERROR
    }
}

impl Default for SegmentPattern {
    fn default() -> Self {
        encode(0)
    }
}

/// Encode a value for a single-digit display
pub fn encode(value: i64) -> SegmentPattern {
    match usize::try_from(value) {
        Ok(digit) if digit < DIGITS.len() => SegmentPattern(DIGITS[digit]),
        _ => SegmentPattern::ERROR,
    }
}

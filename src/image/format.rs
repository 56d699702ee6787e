use std::fmt::Display;
use std::str::FromStr;

use clap::builder::PossibleValue;
use clap::ValueEnum;

use super::SampleKind;
use crate::error::Error;

/// The two character tag at the start of every Netpbm file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Magic {
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
}

/// How the payload of a format is laid out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// decimal tokens separated by whitespace instead of raw bytes
    pub is_ascii: bool,
    /// values making up one pixel
    pub channels_per_sample: usize,
    /// eight single bit samples per byte, rows padded to full bytes
    pub bit_packed_single_channel: bool,
}

impl FormatDescriptor {
    /// Number of payload bytes making up one binary row
    pub fn bytes_per_row(&self, width: usize) -> usize {
        if self.bit_packed_single_channel {
            width.div_ceil(8)
        } else {
            width * self.channels_per_sample
        }
    }
}

impl Magic {
    pub fn kind(&self) -> SampleKind {
        match self {
            Self::P1 | Self::P4 => SampleKind::Bitmap,
            Self::P2 | Self::P5 => SampleKind::Gray,
            Self::P3 | Self::P6 => SampleKind::Color,
        }
    }

    pub fn is_ascii(&self) -> bool {
        matches!(self, Self::P1 | Self::P2 | Self::P3)
    }

    pub fn descriptor(&self) -> FormatDescriptor {
        let kind = self.kind();
        FormatDescriptor {
            is_ascii: self.is_ascii(),
            channels_per_sample: if kind == SampleKind::Color { 3 } else { 1 },
            bit_packed_single_channel: *self == Self::P4,
        }
    }

    /// The magic of `kind` sharing this magic's ASCII or binary encoding
    pub fn with_kind(&self, kind: SampleKind) -> Self {
        Self::for_kind(kind, self.is_ascii())
    }

    /// The ASCII or binary sibling within the same kind
    pub fn with_encoding(&self, ascii: bool) -> Self {
        Self::for_kind(self.kind(), ascii)
    }

    pub fn for_kind(kind: SampleKind, ascii: bool) -> Self {
        match (kind, ascii) {
            (SampleKind::Bitmap, true) => Self::P1,
            (SampleKind::Gray, true) => Self::P2,
            (SampleKind::Color, true) => Self::P3,
            (SampleKind::Bitmap, false) => Self::P4,
            (SampleKind::Gray, false) => Self::P5,
            (SampleKind::Color, false) => Self::P6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::P4 => "P4",
            Self::P5 => "P5",
            Self::P6 => "P6",
        }
    }
}

impl Display for Magic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Magic {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::value_variants()
            .iter()
            .find(|magic| magic.as_str() == token)
            .copied()
            .ok_or_else(|| Error::UnsupportedFormat(token.to_owned()))
    }
}

impl ValueEnum for Magic {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::P1, Self::P2, Self::P3, Self::P4, Self::P5, Self::P6]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.as_str()))
    }
}

use std::fmt::Display;

use crate::image::{format::Magic, SampleKind};

/// The part of a Netpbm stream that was being read when parsing failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseStage {
    Magic,
    Dimensions,
    MaxValue,
    Payload,
}

impl Display for ParseStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Magic => write!(f, "magic number"),
            Self::Dimensions => write!(f, "dimensions"),
            Self::MaxValue => write!(f, "max value"),
            Self::Payload => write!(f, "payload"),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    UnsupportedFormat(String),
    IncompatibleFormat {
        magic: Magic,
        kind: SampleKind,
    },
    Parse {
        stage: ParseStage,
        row: Option<usize>,
    },
    ValueOutOfRange {
        row: usize,
        col: usize,
        value: i64,
    },
    UnexpectedEof {
        row: usize,
    },
    IndexOutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    InvalidDimensions {
        width: usize,
        height: usize,
    },
    InvalidMaxValue(u32),
    MismatchOfSizeBetweenDimensionsAndSamples {
        expected: usize,
        actual: usize,
    },
    SampleKindMismatch {
        expected: SampleKind,
        actual: SampleKind,
    },
    UnsupportedConversion {
        from: SampleKind,
        to: SampleKind,
    },
    RasterizerRequiresColorImage(SampleKind),
    MaxValueNotApplicable(SampleKind),
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    LoggerInitialization(String),
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "I/O error: {}", error),
            Self::UnsupportedFormat(magic) => {
                write!(f, "Unsupported format '{}', expected one of P1 to P6", magic)
            }
            Self::IncompatibleFormat { magic, kind } => {
                write!(f, "Format {} can not encode a {} image", magic, kind)
            }
            Self::Parse { stage, row: None } => write!(f, "Parsing of {} failed", stage),
            Self::Parse {
                stage,
                row: Some(row),
            } => write!(f, "Parsing of {} failed at row {}", stage, row),
            Self::ValueOutOfRange { row, col, value } => {
                write!(
                    f,
                    "Value {} at row {}, column {} exceeds the declared max value",
                    value, row, col
                )
            }
            Self::UnexpectedEof { row } => {
                write!(f, "Unexpected end of file while reading row {}", row)
            }
            Self::IndexOutOfRange {
                x,
                y,
                width,
                height,
            } => {
                write!(
                    f,
                    "Coordinate ({}, {}) lies outside of the {}x{} image",
                    x, y, width, height
                )
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "Invalid image dimensions {}x{}", width, height)
            }
            Self::InvalidMaxValue(max_value) => {
                write!(f, "Max value {} is not in range 1 to 255", max_value)
            }
            Self::MismatchOfSizeBetweenDimensionsAndSamples { expected, actual } => {
                write!(
                    f,
                    "Number of samples does not match the dimensions. Expected {}, but got {}.",
                    expected, actual
                )
            }
            Self::SampleKindMismatch { expected, actual } => {
                write!(f, "Expected a {} sample, but got a {} sample", expected, actual)
            }
            Self::UnsupportedConversion { from, to } => {
                write!(f, "Conversion from {} to {} is not supported", from, to)
            }
            Self::RasterizerRequiresColorImage(kind) => {
                write!(f, "Drawing requires a color image, but got a {} image", kind)
            }
            Self::MaxValueNotApplicable(kind) => {
                write!(f, "A {} image has no max value", kind)
            }
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::LoggerInitialization(reason) => {
                write!(f, "Unable to initialize logging: {}", reason)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error)
            | Self::UnableToOpenInputFileForReading(_, error)
            | Self::UnableToOpenOutputFileForWriting(_, error) => Some(error),
            _ => None,
        }
    }
}

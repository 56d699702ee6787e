use std::fmt::Display;

use crate::color::RGBColor;
use crate::error::Error;

pub mod format;
pub mod rasterizer;
pub mod reader;
pub mod transformer;
pub mod writer;

/// Decodes a complete image from some source
pub trait ImageReader {
    fn read_image(&mut self) -> crate::Result<PixelBuffer>;
}

/// Encodes a complete image to some sink
pub trait ImageWriter {
    fn write_image(&mut self, image: &PixelBuffer) -> crate::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleKind {
    Bitmap,
    Gray,
    Color,
}

impl Display for SampleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bitmap => write!(f, "bitmap"),
            Self::Gray => write!(f, "grayscale"),
            Self::Color => write!(f, "color"),
        }
    }
}

/// Row-major sample storage, one variant per sample kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Samples {
    Bitmap(Vec<bool>),
    Gray(Vec<u8>),
    Color(Vec<RGBColor>),
}

impl Samples {
    pub fn kind(&self) -> SampleKind {
        match self {
            Self::Bitmap(_) => SampleKind::Bitmap,
            Self::Gray(_) => SampleKind::Gray,
            Self::Color(_) => SampleKind::Color,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Bitmap(dots) => dots.len(),
            Self::Gray(dots) => dots.len(),
            Self::Color(dots) => dots.len(),
        }
    }
}

/// A single sample as returned by [`PixelBuffer::at`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sample {
    Bit(bool),
    Gray(u8),
    Color(RGBColor),
}

impl Sample {
    pub fn kind(&self) -> SampleKind {
        match self {
            Self::Bit(_) => SampleKind::Bitmap,
            Self::Gray(_) => SampleKind::Gray,
            Self::Color(_) => SampleKind::Color,
        }
    }

    fn numeric_max(&self) -> u8 {
        match self {
            Self::Bit(bit) => *bit as u8,
            Self::Gray(value) => *value,
            Self::Color(color) => color.max_component(),
        }
    }
}

/// An in-memory raster image with 8 bit samples
///
/// Samples are addressed as `(x, y)` meaning column `x` of row `y`
/// and stored row by row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    max_value: Option<u8>,
    samples: Samples,
}

impl PixelBuffer {
    pub fn bitmap(width: usize, height: usize, dots: Vec<bool>) -> crate::Result<Self> {
        Self::new(width, height, None, Samples::Bitmap(dots))
    }

    pub fn gray(width: usize, height: usize, max_value: u8, dots: Vec<u8>) -> crate::Result<Self> {
        Self::new(width, height, Some(max_value), Samples::Gray(dots))
    }

    pub fn color(
        width: usize,
        height: usize,
        max_value: u8,
        dots: Vec<RGBColor>,
    ) -> crate::Result<Self> {
        Self::new(width, height, Some(max_value), Samples::Color(dots))
    }

    /// Validates dimensions, sample count and the max value bound
    /// before building the buffer.
    pub fn new(
        width: usize,
        height: usize,
        max_value: Option<u8>,
        samples: Samples,
    ) -> crate::Result<Self> {
        Self::check_dimensions(width, height)?;
        let expected = width * height;
        if samples.len() != expected {
            return Err(Error::MismatchOfSizeBetweenDimensionsAndSamples {
                expected,
                actual: samples.len(),
            });
        }
        let max_value = match (&samples, max_value) {
            (Samples::Bitmap(_), _) => None,
            (_, None) | (_, Some(0)) => {
                return Err(Error::InvalidMaxValue(max_value.unwrap_or(0) as u32));
            }
            (_, Some(max_value)) => Some(max_value),
        };
        let image = Self {
            width,
            height,
            max_value,
            samples,
        };
        image.check_samples_within_max_value()?;
        Ok(image)
    }

    /// Skips validation, callers uphold all invariants
    pub(crate) fn from_parts(
        width: usize,
        height: usize,
        max_value: Option<u8>,
        samples: Samples,
    ) -> Self {
        debug_assert_eq!(width * height, samples.len());
        Self {
            width,
            height,
            max_value,
            samples,
        }
    }

    pub(crate) fn check_dimensions(width: usize, height: usize) -> crate::Result<()> {
        if width == 0 || height == 0 || width.checked_mul(height).is_none() {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(())
    }

    fn check_samples_within_max_value(&self) -> crate::Result<()> {
        let max_value = match self.max_value {
            Some(max_value) => max_value,
            None => return Ok(()),
        };
        for index in 0..self.samples.len() {
            let sample = self.sample_at_index(index);
            let value = sample.numeric_max();
            if value > max_value {
                return Err(Error::ValueOutOfRange {
                    row: index / self.width,
                    col: index % self.width,
                    value: value as i64,
                });
            }
        }
        Ok(())
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn kind(&self) -> SampleKind {
        self.samples.kind()
    }

    /// Declared upper bound of the samples, `None` for bitmaps
    pub fn max_value(&self) -> Option<u8> {
        self.max_value
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut Samples {
        &mut self.samples
    }

    pub fn at(&self, x: usize, y: usize) -> crate::Result<Sample> {
        let index = self.index_of(x, y)?;
        Ok(self.sample_at_index(index))
    }

    /// Overwrites one sample, keeping kind and max value intact
    pub fn set(&mut self, x: usize, y: usize, value: Sample) -> crate::Result<()> {
        let index = self.index_of(x, y)?;
        if value.kind() != self.kind() {
            return Err(Error::SampleKindMismatch {
                expected: self.kind(),
                actual: value.kind(),
            });
        }
        if let Some(max_value) = self.max_value {
            if value.numeric_max() > max_value {
                return Err(Error::ValueOutOfRange {
                    row: y,
                    col: x,
                    value: value.numeric_max() as i64,
                });
            }
        }
        match (&mut self.samples, value) {
            (Samples::Bitmap(dots), Sample::Bit(bit)) => dots[index] = bit,
            (Samples::Gray(dots), Sample::Gray(gray)) => dots[index] = gray,
            (Samples::Color(dots), Sample::Color(color)) => dots[index] = color,
            _ => unreachable!("sample kind checked above"),
        }
        Ok(())
    }

    fn index_of(&self, x: usize, y: usize) -> crate::Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }

    fn sample_at_index(&self, index: usize) -> Sample {
        match &self.samples {
            Samples::Bitmap(dots) => Sample::Bit(dots[index]),
            Samples::Gray(dots) => Sample::Gray(dots[index]),
            Samples::Color(dots) => Sample::Color(dots[index]),
        }
    }
}

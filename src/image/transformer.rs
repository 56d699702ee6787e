use std::fmt::Display;

use clap::builder::PossibleValue;
use clap::ValueEnum;

use super::{PixelBuffer, SampleKind, Samples};
use crate::color::RGBColor;
use crate::error::Error;

/// A single whole-image operation, as selected on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transformation {
    Invert,
    Flip,
    Flop,
    Rotate,
    Gray,
    Bitmap,
}

impl Transformation {
    pub fn apply(&self, mut image: PixelBuffer) -> crate::Result<PixelBuffer> {
        match self {
            Self::Invert => image.invert(),
            Self::Flip => image.flip(),
            Self::Flop => image.flop(),
            Self::Rotate => return Ok(image.rotate_90_cw()),
            Self::Gray => return image.into_gray(),
            Self::Bitmap => return image.into_bitmap(),
        }
        Ok(image)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Invert => "invert",
            Self::Flip => "flip",
            Self::Flop => "flop",
            Self::Rotate => "rotate",
            Self::Gray => "gray",
            Self::Bitmap => "bitmap",
        }
    }
}

impl Display for Transformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl ValueEnum for Transformation {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self::Invert,
            Self::Flip,
            Self::Flop,
            Self::Rotate,
            Self::Gray,
            Self::Bitmap,
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.name()))
    }
}

impl PixelBuffer {
    /// Complement every sample in place
    ///
    /// Gray samples are complemented against the max value, color channels
    /// against 255 regardless of the max value.
    pub fn invert(&mut self) {
        let max_value = self.max_value.unwrap_or(u8::MAX);
        match &mut self.samples {
            Samples::Bitmap(dots) => dots.iter_mut().for_each(|dot| *dot = !*dot),
            Samples::Gray(dots) => dots.iter_mut().for_each(|dot| *dot = max_value - *dot),
            Samples::Color(dots) => dots.iter_mut().for_each(|dot| *dot = dot.inverted()),
        }
    }

    /// Mirror horizontally
    pub fn flip(&mut self) {
        let width = self.width;
        match &mut self.samples {
            Samples::Bitmap(dots) => reverse_within_rows(dots, width),
            Samples::Gray(dots) => reverse_within_rows(dots, width),
            Samples::Color(dots) => reverse_within_rows(dots, width),
        }
    }

    /// Mirror vertically
    pub fn flop(&mut self) {
        let width = self.width;
        match &mut self.samples {
            Samples::Bitmap(dots) => reverse_row_order(dots, width),
            Samples::Gray(dots) => reverse_row_order(dots, width),
            Samples::Color(dots) => reverse_row_order(dots, width),
        }
    }

    /// Rotate clockwise by a quarter turn, swapping width and height
    pub fn rotate_90_cw(self) -> PixelBuffer {
        let (width, height) = self.size();
        let samples = match self.samples {
            Samples::Bitmap(dots) => Samples::Bitmap(rotate_clockwise(&dots, width, height)),
            Samples::Gray(dots) => Samples::Gray(rotate_clockwise(&dots, width, height)),
            Samples::Color(dots) => Samples::Color(rotate_clockwise(&dots, width, height)),
        };
        PixelBuffer::from_parts(height, width, self.max_value, samples)
    }

    /// Average the channels of a color image, truncating
    ///
    /// The max value is carried over unchanged. Gray images are returned
    /// as they are.
    pub fn into_gray(self) -> crate::Result<PixelBuffer> {
        let (width, height) = self.size();
        match self.samples {
            Samples::Color(dots) => {
                let gray = dots.iter().map(RGBColor::average).collect();
                Ok(PixelBuffer::from_parts(
                    width,
                    height,
                    self.max_value,
                    Samples::Gray(gray),
                ))
            }
            Samples::Gray(_) => Ok(self),
            Samples::Bitmap(_) => Err(Error::UnsupportedConversion {
                from: SampleKind::Bitmap,
                to: SampleKind::Gray,
            }),
        }
    }

    /// Binarize against half the max value
    ///
    /// A pixel is set when its value, or channel average for color, is
    /// strictly below `max_value / 2`. Bitmaps are returned as they are.
    pub fn into_bitmap(self) -> crate::Result<PixelBuffer> {
        let (width, height) = self.size();
        let threshold = self.max_value.unwrap_or(1) / 2;
        let dots = match self.samples {
            Samples::Bitmap(_) => return Ok(self),
            Samples::Gray(dots) => dots.into_iter().map(|value| value < threshold).collect(),
            Samples::Color(dots) => dots
                .iter()
                .map(|color| color.average() < threshold)
                .collect(),
        };
        Ok(PixelBuffer::from_parts(
            width,
            height,
            None,
            Samples::Bitmap(dots),
        ))
    }

    /// Rescale every sample to a new max value, `v * new / old` truncated
    pub fn set_max_value(&mut self, max_value: u8) -> crate::Result<()> {
        if max_value == 0 {
            return Err(Error::InvalidMaxValue(0));
        }
        let old_max_value = match self.max_value {
            Some(old_max_value) => old_max_value,
            None => return Err(Error::MaxValueNotApplicable(self.kind())),
        };
        // clamped, color inversion may leave channels above the old max
        let rescale =
            |value: u8| (value as u32 * max_value as u32 / old_max_value as u32).min(255) as u8;
        match &mut self.samples {
            Samples::Bitmap(_) => {}
            Samples::Gray(dots) => dots.iter_mut().for_each(|dot| *dot = rescale(*dot)),
            Samples::Color(dots) => dots.iter_mut().for_each(|dot| *dot = dot.map(rescale)),
        }
        self.max_value = Some(max_value);
        Ok(())
    }
}

fn reverse_within_rows<T>(dots: &mut [T], width: usize) {
    dots.chunks_mut(width).for_each(|row| row.reverse());
}

fn reverse_row_order<T>(dots: &mut [T], width: usize) {
    let height = dots.len() / width;
    for top in 0..height / 2 {
        let bottom = height - 1 - top;
        let (upper, lower) = dots.split_at_mut(bottom * width);
        upper[top * width..(top + 1) * width].swap_with_slice(&mut lower[..width]);
    }
}

/// old (x, y) lands on new (height - 1 - y, x)
fn rotate_clockwise<T: Copy>(dots: &[T], width: usize, height: usize) -> Vec<T> {
    let mut rotated = Vec::with_capacity(dots.len());
    for new_y in 0..width {
        for new_x in 0..height {
            let old_y = height - 1 - new_x;
            rotated.push(dots[old_y * width + new_y]);
        }
    }
    rotated
}

use super::{PixelBuffer, Samples};
use crate::color::RGBColor;
use crate::error::Error;

/// An integer position, may lie outside the image
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Moves by `(dx, dy)`, stopping at the edges of the `i64` range
    fn offset(&self, dx: i64, dy: i64) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Draws onto the samples of a color image
///
/// Pixels falling outside the image are skipped silently. Channels above the
/// image's max value are lowered to it, so the image stays encodable.
pub struct Rasterizer<'a> {
    width: usize,
    height: usize,
    max_value: u8,
    dots: &'a mut [RGBColor],
}

impl<'a> Rasterizer<'a> {
    pub fn new(image: &'a mut PixelBuffer) -> crate::Result<Self> {
        let (width, height) = image.size();
        let kind = image.kind();
        let max_value = image.max_value().unwrap_or(u8::MAX);
        match image.samples_mut() {
            Samples::Color(dots) => Ok(Self {
                width,
                height,
                max_value,
                dots: dots.as_mut_slice(),
            }),
            _ => Err(Error::RasterizerRequiresColorImage(kind)),
        }
    }

    pub fn set_pixel(&mut self, point: Point, color: RGBColor) {
        if point.x < 0 || point.y < 0 {
            return;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        if x < self.width && y < self.height {
            let max_value = self.max_value;
            self.dots[y * self.width + x] = color.map(|c| c.min(max_value));
        }
    }

    /// Bresenham line, both end points included
    ///
    /// The error terms are kept in `i128`, wide enough for any pair of
    /// `i64` end points.
    pub fn draw_line(&mut self, from: Point, to: Point, color: RGBColor) {
        let dx = (i128::from(to.x) - i128::from(from.x)).abs();
        let dy = (i128::from(to.y) - i128::from(from.y)).abs();
        let step_x = if from.x < to.x { 1 } else { -1 };
        let step_y = if from.y < to.y { 1 } else { -1 };
        let mut error = dx - dy;
        let mut current = from;
        loop {
            self.set_pixel(current, color);
            if current == to {
                break;
            }
            let doubled_error = 2 * error;
            if doubled_error > -dy {
                error -= dy;
                current.x += step_x;
            }
            if doubled_error < dx {
                error += dx;
                current.y += step_y;
            }
        }
    }

    /// Outline with corners at `origin` and `origin + (width, height)`
    pub fn draw_rectangle(&mut self, origin: Point, width: i64, height: i64, color: RGBColor) {
        let top_right = origin.offset(width, 0);
        let bottom_right = origin.offset(width, height);
        let bottom_left = origin.offset(0, height);
        self.draw_line(origin, top_right, color);
        self.draw_line(top_right, bottom_right, color);
        self.draw_line(bottom_right, bottom_left, color);
        self.draw_line(bottom_left, origin, color);
    }

    /// Fills the half open area `[x, x + width) x [y, y + height)`
    pub fn draw_filled_rectangle(
        &mut self,
        origin: Point,
        width: i64,
        height: i64,
        color: RGBColor,
    ) {
        let far_corner = origin.offset(width, height);
        let rows = origin.y.max(0)..far_corner.y.min(Self::clip_limit(self.height));
        let columns = origin.x.max(0)..far_corner.x.min(Self::clip_limit(self.width));
        for y in rows {
            for x in columns.clone() {
                self.set_pixel(Point::new(x, y), color);
            }
        }
    }

    fn clip_limit(extent: usize) -> i64 {
        i64::try_from(extent).unwrap_or(i64::MAX)
    }
}

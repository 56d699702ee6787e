/// An 8 bit red, green, blue triple
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RGBColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RGBColor {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Integer mean of the three channels, truncated
    pub fn average(&self) -> u8 {
        let sum = self.red as u16 + self.green as u16 + self.blue as u16;
        (sum / 3) as u8
    }

    /// Complement of every channel against the full 8 bit range
    pub fn inverted(&self) -> Self {
        Self {
            red: 255 - self.red,
            green: 255 - self.green,
            blue: 255 - self.blue,
        }
    }

    pub fn max_component(&self) -> u8 {
        self.red.max(self.green).max(self.blue)
    }

    pub fn components(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    pub fn map<F: Fn(u8) -> u8>(&self, f: F) -> Self {
        Self {
            red: f(self.red),
            green: f(self.green),
            blue: f(self.blue),
        }
    }
}

#[cfg(test)]
mod test {
    use super::RGBColor;

    #[test]
    fn average_truncates() {
        let color = RGBColor::new(1, 1, 2);
        assert_eq!(color.average(), 1);
        let color = RGBColor::new(255, 255, 254);
        assert_eq!(color.average(), 254);
    }

    #[test]
    fn average_does_not_overflow() {
        assert_eq!(RGBColor::WHITE.average(), 255);
    }

    #[test]
    fn invert_is_relative_to_full_range() {
        let color = RGBColor::new(0, 100, 255);
        assert_eq!(color.inverted(), RGBColor::new(255, 155, 0));
        assert_eq!(color.inverted().inverted(), color);
    }

    #[test]
    fn max_component() {
        assert_eq!(RGBColor::new(3, 200, 17).max_component(), 200);
        assert_eq!(RGBColor::BLACK.max_component(), 0);
    }

    #[test]
    fn map_applies_to_each_channel() {
        let color = RGBColor::new(9, 8, 7).map(|c| c * 2);
        assert_eq!(color.components(), [18, 16, 14]);
    }
}

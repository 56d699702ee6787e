use std::io::Write;

use super::super::format::Magic;
use super::super::{ImageWriter, PixelBuffer, Samples};
use crate::binary_stream::BitWriter;
use crate::error::Error;

const COMMENT_LINE: &str = "# written by netpbm-toolkit";

/// Encode `image` as `magic` into `writer`
///
/// Fails with [`Error::IncompatibleFormat`] before anything is written when
/// `magic` belongs to a different sample kind than `image`. Bytes already
/// written are not rolled back when the writer fails midway.
pub fn encode<W: Write>(image: &PixelBuffer, magic: Magic, writer: &mut W) -> crate::Result<()> {
    NetpbmImageWriter::new(writer, magic).write_image(image)
}

pub fn encode_to_vec(image: &PixelBuffer, magic: Magic) -> crate::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    encode(image, magic, &mut bytes)?;
    Ok(bytes)
}

pub struct NetpbmImageWriter<'a, T: Write> {
    writer: &'a mut T,
    magic: Magic,
}

impl<'a, T: Write> NetpbmImageWriter<'a, T> {
    pub fn new(writer: &'a mut T, magic: Magic) -> Self {
        Self { writer, magic }
    }

    fn write_header(&mut self, image: &PixelBuffer) -> crate::Result<()> {
        let (width, height) = image.size();
        let mut header = format!("{}\n{}\n{} {}\n", self.magic, COMMENT_LINE, width, height);
        if let Some(max_value) = image.max_value() {
            header.push_str(&format!("{}\n", max_value));
        }
        self.writer.write_all(header.as_bytes())?;
        Ok(())
    }

    fn write_ascii_payload(&mut self, image: &PixelBuffer) -> crate::Result<()> {
        let width = image.width();
        let rows: Vec<String> = match image.samples() {
            Samples::Bitmap(dots) => dots
                .chunks(width)
                .map(|row| Self::join(row.iter().map(|&bit| bit as u8)))
                .collect(),
            Samples::Gray(dots) => dots
                .chunks(width)
                .map(|row| Self::join(row.iter().copied()))
                .collect(),
            Samples::Color(dots) => dots
                .chunks(width)
                .map(|row| Self::join(row.iter().flat_map(|color| color.components())))
                .collect(),
        };
        for row in rows {
            self.writer.write_all(row.as_bytes())?;
            self.writer.write_all(b"\n")?;
        }
        Ok(())
    }

    fn join<I: Iterator<Item = u8>>(values: I) -> String {
        values
            .map(|value| value.to_string())
            .collect::<Vec<String>>()
            .join(" ")
    }

    fn write_binary_payload(&mut self, image: &PixelBuffer) -> crate::Result<()> {
        let width = image.width();
        match image.samples() {
            Samples::Bitmap(dots) => {
                let mut bit_writer = BitWriter::new(&mut *self.writer);
                for row in dots.chunks(width) {
                    for &bit in row {
                        bit_writer.write_bit(bit)?;
                    }
                    bit_writer.pad_to_byte()?;
                }
            }
            Samples::Gray(dots) => self.writer.write_all(dots)?,
            Samples::Color(dots) => {
                let bytes: Vec<u8> = dots.iter().flat_map(|color| color.components()).collect();
                self.writer.write_all(&bytes)?;
            }
        }
        Ok(())
    }
}

impl<T: Write> ImageWriter for NetpbmImageWriter<'_, T> {
    fn write_image(&mut self, image: &PixelBuffer) -> crate::Result<()> {
        if self.magic.kind() != image.kind() {
            return Err(Error::IncompatibleFormat {
                magic: self.magic,
                kind: image.kind(),
            });
        }
        self.write_header(image)?;
        if self.magic.is_ascii() {
            self.write_ascii_payload(image)?;
        } else {
            self.write_binary_payload(image)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::encode_to_vec;
    use crate::color::RGBColor;
    use crate::error::Error;
    use crate::image::format::Magic;
    use crate::image::reader::decode;
    use crate::image::{PixelBuffer, SampleKind};

    fn bitmap_3x2() -> PixelBuffer {
        PixelBuffer::bitmap(3, 2, vec![true, false, true, false, true, false]).unwrap()
    }

    fn gray_3x2() -> PixelBuffer {
        PixelBuffer::gray(3, 2, 200, vec![0, 7, 200, 10, 100, 9]).unwrap()
    }

    fn color_2x2() -> PixelBuffer {
        PixelBuffer::color(
            2,
            2,
            255,
            vec![
                RGBColor::new(255, 0, 0),
                RGBColor::new(0, 255, 0),
                RGBColor::new(0, 0, 255),
                RGBColor::new(12, 34, 56),
            ],
        )
        .unwrap()
    }

    fn as_text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn write_ascii_bitmap() {
        let text = as_text(encode_to_vec(&bitmap_3x2(), Magic::P1).unwrap());
        assert_eq!(text, "P1\n# written by netpbm-toolkit\n3 2\n1 0 1\n0 1 0\n");
    }

    #[test]
    fn write_ascii_gray() {
        let text = as_text(encode_to_vec(&gray_3x2(), Magic::P2).unwrap());
        assert_eq!(
            text,
            "P2\n# written by netpbm-toolkit\n3 2\n200\n0 7 200\n10 100 9\n"
        );
    }

    #[test]
    fn write_ascii_color() {
        let text = as_text(encode_to_vec(&color_2x2(), Magic::P3).unwrap());
        assert_eq!(
            text,
            "P3\n# written by netpbm-toolkit\n2 2\n255\n255 0 0 0 255 0\n0 0 255 12 34 56\n"
        );
    }

    #[test]
    fn write_binary_bitmap_pads_rows() {
        let image = PixelBuffer::bitmap(
            10,
            2,
            vec![
                true, false, false, false, false, false, false, true, true, true, //
                false, false, false, false, false, false, false, false, false, true,
            ],
        )
        .unwrap();
        let bytes = encode_to_vec(&image, Magic::P4).unwrap();
        let header = b"P4\n# written by netpbm-toolkit\n10 2\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(&bytes[header.len()..], &[0x81, 0xC0, 0x00, 0x40]);
    }

    #[test]
    fn write_binary_bitmap_two_by_two() {
        let image = PixelBuffer::bitmap(2, 2, vec![true; 4]).unwrap();
        let bytes = encode_to_vec(&image, Magic::P4).unwrap();
        assert_eq!(&bytes[bytes.len() - 2..], &[0xC0, 0xC0]);
    }

    #[test]
    fn write_binary_gray() {
        let bytes = encode_to_vec(&gray_3x2(), Magic::P5).unwrap();
        let header = b"P5\n# written by netpbm-toolkit\n3 2\n200\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(&bytes[header.len()..], &[0, 7, 200, 10, 100, 9]);
    }

    #[test]
    fn write_binary_color() {
        let bytes = encode_to_vec(&color_2x2(), Magic::P6).unwrap();
        assert_eq!(
            &bytes[bytes.len() - 12..],
            &[255, 0, 0, 0, 255, 0, 0, 0, 255, 12, 34, 56]
        );
    }

    #[test]
    fn incompatible_format() {
        for magic in [Magic::P1, Magic::P4, Magic::P2, Magic::P5] {
            assert!(matches!(
                encode_to_vec(&color_2x2(), magic),
                Err(Error::IncompatibleFormat {
                    kind: SampleKind::Color,
                    ..
                })
            ));
        }
        assert!(matches!(
            encode_to_vec(&bitmap_3x2(), Magic::P3),
            Err(Error::IncompatibleFormat {
                magic: Magic::P3,
                kind: SampleKind::Bitmap
            })
        ));
    }

    #[test]
    fn every_compatible_format_decodes_to_the_same_image() {
        for (image, magics) in [
            (bitmap_3x2(), [Magic::P1, Magic::P4]),
            (gray_3x2(), [Magic::P2, Magic::P5]),
            (color_2x2(), [Magic::P3, Magic::P6]),
        ] {
            for magic in magics {
                let bytes = encode_to_vec(&image, magic).unwrap();
                let decoded = decode(&bytes[..]).unwrap();
                assert_eq!(decoded, image, "mismatch for {}", magic);
            }
        }
    }

    #[test]
    fn binary_gray_with_newline_bytes_survives() {
        let image = PixelBuffer::gray(3, 1, 255, vec![b'\n', b'#', b' ']).unwrap();
        let bytes = encode_to_vec(&image, Magic::P5).unwrap();
        assert_eq!(decode(&bytes[..]).unwrap(), image);
    }
}

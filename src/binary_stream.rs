use std::io;
use std::io::Write;

/// State for writing individual bits to a Writer, most significant bit first
pub struct BitWriter<'a, T: Write> {
    /// the underlying output stream
    writer: &'a mut T,
    /// buffer of individual bits not yet written
    buffer: u8,
    /// how many bits are waiting to be written
    buffer_space_used: u8,
}

impl<'a, T: Write> BitWriter<'a, T> {
    pub fn new(writer: &'a mut T) -> BitWriter<'a, T> {
        BitWriter {
            writer,
            buffer: 0,
            buffer_space_used: 0,
        }
    }

    /// write a single bit, a completed byte goes straight to the writer
    pub fn write_bit(&mut self, bit: bool) -> Result<(), io::Error> {
        if bit {
            self.buffer |= 0b10000000_u8.rotate_right(self.buffer_space_used as u32);
        } else {
            self.buffer &= 0b01111111_u8.rotate_right(self.buffer_space_used as u32);
        }
        self.buffer_space_used += 1;
        if self.buffer_space_used == 8 {
            self.writer.write_all(&[self.buffer])?;
            self.buffer_space_used = 0;
            self.buffer = 0; // depended upon in pad_to_byte()
        }
        Ok(())
    }

    /// Emit the partially filled byte, if any, with its
    /// unused low-order bits set to 0
    pub fn pad_to_byte(&mut self) -> Result<(), io::Error> {
        if self.buffer_space_used != 0 {
            self.writer.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.buffer_space_used = 0;
        }
        Ok(())
    }
}

/// Reads individual bits from a byte slice, most significant bit first
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    pub fn read_bit(&mut self) -> Option<bool> {
        let byte = self.bytes.get(self.position / 8)?;
        let bit_index = 7 - (self.position % 8);
        self.position += 1;
        Some((byte >> bit_index) & 1 == 1)
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_bit()
    }
}

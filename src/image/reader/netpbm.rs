use std::io::{BufRead, BufReader, Read};

use super::super::format::{FormatDescriptor, Magic};
use super::super::{ImageReader, PixelBuffer, SampleKind, Samples};
use crate::binary_stream::BitReader;
use crate::color::RGBColor;
use crate::error::{Error, ParseStage};

/// Upper bound on sample storage reserved from the header alone
const MAX_PREALLOCATED_VALUES: usize = 1 << 20;

/// Decode a Netpbm image of any of the formats P1 to P6 from `reader`
pub fn decode<R: Read>(reader: R) -> crate::Result<PixelBuffer> {
    NetpbmImageReader::new(BufReader::new(reader)).read_image()
}

pub struct NetpbmImageReader<T: BufRead> {
    reader: T,
}

impl<T: BufRead> NetpbmImageReader<T> {
    pub fn new(reader: T) -> Self {
        Self { reader }
    }
}

impl<T: BufRead> ImageReader for NetpbmImageReader<T> {
    fn read_image(&mut self) -> crate::Result<PixelBuffer> {
        let mut parser = NetpbmParser::new(&mut self.reader);
        parser.parse()
    }
}

struct Header {
    magic: Magic,
    width: usize,
    height: usize,
    max_value: Option<u8>,
}

impl Header {
    /// Number of payload values, `None` if it does not fit in memory at all
    fn value_count(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(self.magic.descriptor().channels_per_sample)
    }

    /// Largest value a payload sample may take
    fn sample_limit(&self) -> u8 {
        self.max_value.unwrap_or(1)
    }
}

struct NetpbmParser<'a, R: BufRead> {
    reader: &'a mut R,
}

impl<'a, R: BufRead> NetpbmParser<'a, R> {
    fn new(reader: &'a mut R) -> Self {
        Self { reader }
    }

    fn parse(&mut self) -> crate::Result<PixelBuffer> {
        let header = self.parse_header()?;
        let descriptor = header.magic.descriptor();
        let value_count = header.value_count().ok_or(Error::Parse {
            stage: ParseStage::Dimensions,
            row: None,
        })?;
        // the payload may be shorter than the header claims
        let mut values = Vec::with_capacity(value_count.min(MAX_PREALLOCATED_VALUES));
        for row in 0..header.height {
            if descriptor.is_ascii {
                self.parse_ascii_row(&header, &descriptor, row, &mut values)?;
            } else {
                self.parse_binary_row(&header, &descriptor, row, &mut values)?;
            }
        }
        let samples = Self::assemble_samples(header.magic.kind(), values);
        Ok(PixelBuffer::from_parts(
            header.width,
            header.height,
            header.max_value,
            samples,
        ))
    }

    fn parse_header(&mut self) -> crate::Result<Header> {
        let magic = self.parse_magic()?;
        let (width, height) = self.parse_dimensions()?;
        let max_value = match magic.kind() {
            SampleKind::Bitmap => None,
            SampleKind::Gray | SampleKind::Color => Some(self.parse_max_value()?),
        };
        Ok(Header {
            magic,
            width,
            height,
            max_value,
        })
    }

    fn parse_magic(&mut self) -> crate::Result<Magic> {
        let line = self.next_line(ParseStage::Magic)?.ok_or(Error::Parse {
            stage: ParseStage::Magic,
            row: None,
        })?;
        line.trim().parse()
    }

    fn parse_dimensions(&mut self) -> crate::Result<(usize, usize)> {
        let stage = ParseStage::Dimensions;
        let line = self.next_header_line(stage)?;
        let tokens: Vec<&str> = line.split_ascii_whitespace().collect();
        if tokens.len() != 2 {
            return Err(Error::Parse { stage, row: None });
        }
        let width = Self::parse_positive(tokens[0], stage)?;
        let height = Self::parse_positive(tokens[1], stage)?;
        PixelBuffer::check_dimensions(width, height).map_err(|_| Error::Parse { stage, row: None })?;
        Ok((width, height))
    }

    fn parse_max_value(&mut self) -> crate::Result<u8> {
        let stage = ParseStage::MaxValue;
        let line = self.next_header_line(stage)?;
        let max_value = Self::parse_positive(line.trim(), stage)?;
        u8::try_from(max_value).map_err(|_| Error::Parse { stage, row: None })
    }

    fn parse_positive(token: &str, stage: ParseStage) -> crate::Result<usize> {
        match token.parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(Error::Parse { stage, row: None }),
        }
    }

    fn parse_ascii_row(
        &mut self,
        header: &Header,
        descriptor: &FormatDescriptor,
        row: usize,
        values: &mut Vec<u8>,
    ) -> crate::Result<()> {
        let line = self.next_payload_line(row)?;
        let expected = header.width * descriptor.channels_per_sample;
        let tokens: Vec<&str> = line.split_ascii_whitespace().take(expected).collect();
        if tokens.len() < expected {
            return Err(Error::UnexpectedEof { row });
        }
        for (index, token) in tokens.into_iter().enumerate() {
            let col = index / descriptor.channels_per_sample;
            let value = match header.magic.kind() {
                SampleKind::Bitmap => Self::parse_bit_token(token, row)?,
                SampleKind::Gray | SampleKind::Color => {
                    Self::parse_value_token(token, header.sample_limit(), row, col)?
                }
            };
            values.push(value);
        }
        Ok(())
    }

    fn parse_bit_token(token: &str, row: usize) -> crate::Result<u8> {
        match token {
            "0" => Ok(0),
            "1" => Ok(1),
            _ => Err(Error::Parse {
                stage: ParseStage::Payload,
                row: Some(row),
            }),
        }
    }

    fn parse_value_token(token: &str, limit: u8, row: usize, col: usize) -> crate::Result<u8> {
        let value = Self::parse_integer(token).ok_or(Error::Parse {
            stage: ParseStage::Payload,
            row: Some(row),
        })?;
        Self::check_value(value, limit, row, col)
    }

    /// Signed decimal integer, saturated to `i64` when it has too many digits
    fn parse_integer(token: &str) -> Option<i64> {
        let digits = token.strip_prefix(['-', '+']).unwrap_or(token);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(token.parse().unwrap_or(if token.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }))
    }

    fn check_value(value: i64, limit: u8, row: usize, col: usize) -> crate::Result<u8> {
        u8::try_from(value)
            .ok()
            .filter(|&v| v <= limit)
            .ok_or(Error::ValueOutOfRange { row, col, value })
    }

    fn parse_binary_row(
        &mut self,
        header: &Header,
        descriptor: &FormatDescriptor,
        row: usize,
        values: &mut Vec<u8>,
    ) -> crate::Result<()> {
        let bytes_per_row = descriptor.bytes_per_row(header.width);
        let mut bytes = Vec::new();
        // read_to_end only grows the buffer as far as the data goes
        (&mut *self.reader)
            .take(bytes_per_row as u64)
            .read_to_end(&mut bytes)?;
        if bytes.len() < bytes_per_row {
            return Err(Error::UnexpectedEof { row });
        }
        if descriptor.bit_packed_single_channel {
            // padding bits past the width are ignored
            values.extend(BitReader::new(&bytes).take(header.width).map(u8::from));
            return Ok(());
        }
        for (index, &byte) in bytes.iter().enumerate() {
            let col = index / descriptor.channels_per_sample;
            values.push(Self::check_value(
                byte as i64,
                header.sample_limit(),
                row,
                col,
            )?);
        }
        Ok(())
    }

    fn assemble_samples(kind: SampleKind, values: Vec<u8>) -> Samples {
        match kind {
            SampleKind::Bitmap => Samples::Bitmap(values.into_iter().map(|v| v == 1).collect()),
            SampleKind::Gray => Samples::Gray(values),
            SampleKind::Color => Samples::Color(
                values
                    .chunks_exact(3)
                    .map(|c| RGBColor::new(c[0], c[1], c[2]))
                    .collect(),
            ),
        }
    }

    /// Next header line that is neither blank nor a comment
    fn next_header_line(&mut self, stage: ParseStage) -> crate::Result<String> {
        loop {
            let line = self
                .next_line(stage)?
                .ok_or(Error::Parse { stage, row: None })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok(trimmed.to_owned());
        }
    }

    /// Next non-blank payload line, a missing line means the payload is short
    fn next_payload_line(&mut self, row: usize) -> crate::Result<String> {
        loop {
            let line = self
                .next_line(ParseStage::Payload)
                .map_err(|e| match e {
                    Error::Parse { stage, .. } => Error::Parse {
                        stage,
                        row: Some(row),
                    },
                    other => other,
                })?
                .ok_or(Error::UnexpectedEof { row })?;
            if !line.trim().is_empty() {
                return Ok(line);
            }
        }
    }

    fn next_line(&mut self, stage: ParseStage) -> crate::Result<Option<String>> {
        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        String::from_utf8(line)
            .map(Some)
            .map_err(|_| Error::Parse { stage, row: None })
    }
}

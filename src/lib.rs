use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

pub use cli::CLIParser;
pub use color::RGBColor;
pub use error::{Error, ParseStage};
pub use image::{
    format::{FormatDescriptor, Magic},
    rasterizer::{Point, Rasterizer},
    reader::{decode, NetpbmImageReader},
    transformer::Transformation,
    writer::{encode, encode_to_vec, NetpbmImageWriter},
    ImageReader, ImageWriter, PixelBuffer, Sample, SampleKind, Samples,
};
pub use logger::init_logging;

mod binary_stream;
mod cli;
mod color;
mod error;
mod image;
mod logger;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    input_file: PathBuf,
    output_file: PathBuf,
    format: Option<Magic>,
    transformations: Vec<Transformation>,
    max_value: Option<u8>,
}

impl Arguments {
    pub fn new(input_file: PathBuf, output_file: PathBuf) -> Self {
        Self {
            input_file,
            output_file,
            format: None,
            transformations: Vec::new(),
            max_value: None,
        }
    }

    pub fn with_format(mut self, format: Magic) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_transformation(mut self, transformation: Transformation) -> Self {
        self.transformations.push(transformation);
        self
    }

    pub fn with_max_value(mut self, max_value: u8) -> Self {
        self.max_value = Some(max_value);
        self
    }
}

fn display_path(file_path: &Path) -> String {
    file_path.to_string_lossy().into_owned()
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path)
        .map_err(|e| Error::UnableToOpenInputFileForReading(display_path(file_path), e))
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| Error::UnableToOpenOutputFileForWriting(display_path(file_path), e))
}

/// Reads the leading magic line so the output can keep the input's encoding
fn peek_magic(reader: &mut BufReader<File>) -> Option<Magic> {
    let buffered = reader.fill_buf().ok()?;
    let line_end = buffered
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(buffered.len());
    std::str::from_utf8(&buffered[..line_end])
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Picks the explicit format, else the input magic if the kind still
/// matches, else the same ASCII or binary encoding for the new kind.
fn select_output_format(
    requested: Option<Magic>,
    input: Option<Magic>,
    kind: SampleKind,
) -> Magic {
    match (requested, input) {
        (Some(magic), _) => magic,
        (None, Some(magic)) => magic.with_kind(kind),
        (None, None) => Magic::for_kind(kind, true),
    }
}

pub fn convert_netpbm(arguments: &Arguments) -> Result<()> {
    let input_file = open_input_file(&arguments.input_file)?;
    let mut input_reader = BufReader::new(input_file);
    let input_magic = peek_magic(&mut input_reader);
    let mut image = NetpbmImageReader::new(input_reader).read_image()?;
    let (width, height) = image.size();
    logger::log_header(
        &input_magic.map(|m| m.to_string()).unwrap_or_default(),
        width,
        height,
        image.max_value(),
    );

    for transformation in &arguments.transformations {
        log::debug!("Applying {}", transformation);
        image = transformation.apply(image)?;
    }
    if let Some(max_value) = arguments.max_value {
        log::debug!("Rescaling to max value {}", max_value);
        image.set_max_value(max_value)?;
    }

    let output_magic = select_output_format(arguments.format, input_magic, image.kind());
    let output_file = open_output_file(&arguments.output_file)?;
    let mut output_file_writer = BufWriter::new(output_file);
    NetpbmImageWriter::new(&mut output_file_writer, output_magic).write_image(&image)?;
    output_file_writer.flush()?;
    let (width, height) = image.size();
    log::info!(
        "Wrote {} {}x{} to '{}'",
        output_magic,
        width,
        height,
        display_path(&arguments.output_file)
    );
    Ok(())
}

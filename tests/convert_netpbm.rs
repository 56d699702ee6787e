use netpbm_toolkit::{
    convert_netpbm, decode, encode_to_vec, init_logging, Arguments, CLIParser, Error, Magic,
    PixelBuffer, Point, RGBColor, Rasterizer, Sample, SampleKind, Samples, Transformation,
};
use std::path::PathBuf;
use std::{env, fs};

#[ctor::ctor]
fn init() {
    init_logging().expect("Logger initialization failed");
}

fn get_project_root_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn get_input_image_path(name: &str) -> PathBuf {
    let mut root_path = get_project_root_path();
    root_path.push("tests/images");
    root_path.push(name);
    root_path
}

fn get_result_image_path(name: &str) -> PathBuf {
    let mut root_path = get_project_root_path();
    root_path.push("tests");
    root_path.push(name);
    root_path
}

fn cleanup(result_image_path: &PathBuf) {
    if result_image_path.exists() && result_image_path.is_file() {
        fs::remove_file(result_image_path).expect("Deletion of output file failed");
    }
}

fn read_image(path: &PathBuf) -> PixelBuffer {
    let file = fs::File::open(path).expect("Opening image failed");
    decode(file).expect("Decoding image failed")
}

fn read_magic(path: &PathBuf) -> String {
    let bytes = fs::read(path).expect("Reading image failed");
    String::from_utf8_lossy(&bytes[..2]).into_owned()
}

#[test]
fn test_convert_ascii_color_to_binary() {
    let result_image_path = get_result_image_path("result_stripes.ppm");
    cleanup(&result_image_path);
    let input_image_path = get_input_image_path("stripes.ppm");
    let mut cli_parser = CLIParser::new();
    let arguments = cli_parser.parse(vec![
        "test",
        input_image_path.to_str().unwrap(),
        result_image_path.to_str().unwrap(),
        "--format",
        "P6",
    ]);
    convert_netpbm(&arguments).expect("Conversion failed");
    assert!(result_image_path.exists(), "Output file was not created");
    assert_eq!(read_magic(&result_image_path), "P6");
    assert_eq!(read_image(&result_image_path), read_image(&input_image_path));
    cleanup(&result_image_path);
}

#[test]
fn test_convert_color_to_rotated_gray_keeps_ascii_encoding() {
    let result_image_path = get_result_image_path("result_stripes_gray.pgm");
    cleanup(&result_image_path);
    let mut cli_parser = CLIParser::new();
    let arguments = cli_parser.parse(vec![
        "test",
        get_input_image_path("stripes.ppm").to_str().unwrap(),
        result_image_path.to_str().unwrap(),
        "-t",
        "rotate",
        "-t",
        "gray",
    ]);
    convert_netpbm(&arguments).expect("Conversion failed");
    assert_eq!(read_magic(&result_image_path), "P2");
    let image = read_image(&result_image_path);
    assert_eq!(image.size(), (2, 3));
    assert_eq!(image.max_value(), Some(255));
    // after rotating, the bottom row of the stripes runs down the left column
    assert_eq!(image.samples(), &Samples::Gray(vec![73, 85, 73, 85, 73, 85]));
    cleanup(&result_image_path);
}

#[test]
fn test_convert_binary_gray_to_bitmap() {
    let result_image_path = get_result_image_path("result_gradient.pbm");
    cleanup(&result_image_path);
    let arguments = Arguments::new(
        get_input_image_path("gradient_binary.pgm"),
        result_image_path.clone(),
    )
    .with_transformation(Transformation::Bitmap);
    convert_netpbm(&arguments).expect("Conversion failed");
    assert_eq!(read_magic(&result_image_path), "P4");
    let image = read_image(&result_image_path);
    assert_eq!(image.kind(), SampleKind::Bitmap);
    // threshold 127: 0x00 0x40 0x10 0x50 are set
    assert_eq!(
        image.samples(),
        &Samples::Bitmap(vec![true, true, false, false, true, true, false, false])
    );
    cleanup(&result_image_path);
}

#[test]
fn test_convert_bitmap_round_trip_through_transforms() {
    let result_image_path = get_result_image_path("result_letters.pbm");
    cleanup(&result_image_path);
    let input_image_path = get_input_image_path("letters.pbm");
    let arguments = Arguments::new(input_image_path.clone(), result_image_path.clone())
        .with_format(Magic::P4)
        .with_transformation(Transformation::Flip)
        .with_transformation(Transformation::Flop)
        .with_transformation(Transformation::Invert)
        .with_transformation(Transformation::Flop)
        .with_transformation(Transformation::Invert)
        .with_transformation(Transformation::Flip);
    convert_netpbm(&arguments).expect("Conversion failed");
    assert_eq!(read_magic(&result_image_path), "P4");
    assert_eq!(read_image(&result_image_path), read_image(&input_image_path));
    cleanup(&result_image_path);
}

#[test]
fn test_convert_gray_with_new_max_value() {
    let result_image_path = get_result_image_path("result_gradient.pgm");
    cleanup(&result_image_path);
    let arguments = Arguments::new(
        get_input_image_path("gradient.pgm"),
        result_image_path.clone(),
    )
    .with_max_value(5);
    convert_netpbm(&arguments).expect("Conversion failed");
    let image = read_image(&result_image_path);
    assert_eq!(image.max_value(), Some(5));
    assert_eq!(
        image.samples(),
        &Samples::Gray(vec![0, 1, 3, 5, 0, 2, 3, 4, 0, 2, 4, 4])
    );
    cleanup(&result_image_path);
}

#[test]
fn test_convert_incompatible_format_fails() {
    let result_image_path = get_result_image_path("result_incompatible.pbm");
    cleanup(&result_image_path);
    let arguments = Arguments::new(
        get_input_image_path("stripes.ppm"),
        result_image_path.clone(),
    )
    .with_format(Magic::P1);
    let result = convert_netpbm(&arguments);
    assert!(matches!(
        result,
        Err(Error::IncompatibleFormat {
            magic: Magic::P1,
            kind: SampleKind::Color
        })
    ));
    cleanup(&result_image_path);
}

#[test]
fn test_convert_missing_input_fails() {
    let arguments = Arguments::new(
        get_input_image_path("does_not_exist.pgm"),
        get_result_image_path("result_missing.pgm"),
    );
    assert!(matches!(
        convert_netpbm(&arguments),
        Err(Error::UnableToOpenInputFileForReading(_, _))
    ));
    assert!(!get_result_image_path("result_missing.pgm").exists());
}

#[test]
fn test_decode_truncated_binary_gray() {
    let file = fs::File::open(get_input_image_path("truncated.pgm")).unwrap();
    assert!(matches!(decode(file), Err(Error::UnexpectedEof { row: 1 })));
}

#[test]
fn test_decode_binary_checkerboard() {
    let image = read_image(&get_input_image_path("checker.pbm"));
    assert_eq!(image.size(), (10, 2));
    for y in 0..2 {
        for x in 0..10 {
            assert_eq!(
                image.at(x, y).unwrap(),
                Sample::Bit((x + y) % 2 == 0),
                "mismatch at ({}, {})",
                x,
                y
            );
        }
    }
    let ascii = encode_to_vec(&image, Magic::P1).unwrap();
    assert!(String::from_utf8(ascii)
        .unwrap()
        .ends_with("1 0 1 0 1 0 1 0 1 0\n0 1 0 1 0 1 0 1 0 1\n"));
}

#[test]
fn test_draw_on_decoded_image() {
    let mut image = read_image(&get_input_image_path("stripes.ppm"));
    let white = RGBColor::WHITE;
    {
        let mut rasterizer = Rasterizer::new(&mut image).unwrap();
        rasterizer.draw_line(Point::new(0, 1), Point::new(2, 1), white);
        rasterizer.set_pixel(Point::new(10, 10), white);
    }
    let bytes = encode_to_vec(&image, Magic::P6).unwrap();
    let decoded = decode(&bytes[..]).unwrap();
    assert_eq!(decoded, image);
    assert_eq!(decoded.at(0, 0).unwrap(), Sample::Color(RGBColor::new(255, 0, 0)));
    for x in 0..3 {
        assert_eq!(decoded.at(x, 1).unwrap(), Sample::Color(white));
    }
}

use crate::image::format::Magic;
use crate::image::transformer::Transformation;
use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgAction, ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_file_argument(command);
        let command = Self::register_output_file_argument(command);
        let command = Self::register_format_argument(command);
        let command = Self::register_transform_argument(command);
        Self::register_max_value_argument(command)
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_format_argument(command: Command) -> Command {
        command.arg(Self::create_format_argument())
    }

    fn register_transform_argument(command: Command) -> Command {
        command.arg(Self::create_transform_argument())
    }

    fn register_max_value_argument(command: Command) -> Command {
        command.arg(Self::create_max_value_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to Netpbm input file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_output_file_argument() -> Arg {
        Arg::new("output_file")
            .help("Path to Netpbm output file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_format_argument() -> Arg {
        arg!(format: -f --format <MAGIC> "Output format, defaults to the input encoding")
            .required(false)
            .value_parser(value_parser!(Magic))
    }

    fn create_transform_argument() -> Arg {
        arg!(transform: -t --transform <TRANSFORM> "Transformation to apply, may be repeated")
            .required(false)
            .action(ArgAction::Append)
            .value_parser(value_parser!(Transformation))
    }

    fn create_max_value_argument() -> Arg {
        arg!(max_value: -m --max_value <MAX> "Rescale samples to a new max value")
            .required(false)
            .value_parser(value_parser!(u8).range(1..))
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_file: Self::extract_input_file_argument(matches),
            output_file: Self::extract_output_file_argument(matches),
            format: Self::extract_format_argument(matches),
            transformations: Self::extract_transform_argument(matches),
            max_value: Self::extract_max_value_argument(matches),
        }
    }

    fn extract_input_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input_file")
            .expect("Required argument input_file not provided")
            .clone()
    }

    fn extract_output_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("output_file")
            .expect("Required argument output_file not provided")
            .clone()
    }

    fn extract_format_argument(matches: &ArgMatches) -> Option<Magic> {
        matches.get_one::<Magic>("format").copied()
    }

    fn extract_transform_argument(matches: &ArgMatches) -> Vec<Transformation> {
        matches
            .get_many::<Transformation>("transform")
            .map(|values| values.copied().collect())
            .unwrap_or_default()
    }

    fn extract_max_value_argument(matches: &ArgMatches) -> Option<u8> {
        matches.get_one::<u8>("max_value").copied()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

use std::env::args_os;
use std::process::ExitCode;

use netpbm_toolkit::{convert_netpbm, init_logging, CLIParser};

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("{}", e);
    }
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match convert_netpbm(&arguments) {
        Ok(_) => {
            println!("Conversion successful");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Conversion failed because of: {}", e);
            ExitCode::FAILURE
        }
    }
}

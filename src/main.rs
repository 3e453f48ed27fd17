use std::fs::File;
use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;
use tent_layout::cli::Cli;
use tent_layout::types::CalculationRequest;

macro_rules! eprintln_and_exit {
    ( $err:ident, $code:literal ) => {{
        eprintln!("E: {}", $err);
        ExitCode::from($code)
    }};
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "off" }),
    )
    .init();

    let mut input = String::new();
    let read_result = match &cli.filename {
        None => io::stdin().read_to_string(&mut input),
        Some(filename) => File::open(filename).and_then(|mut f| f.read_to_string(&mut input)),
    };
    if let Err(err) = read_result {
        let err: tent_layout::Error = err.into();
        return eprintln_and_exit!(err, 1);
    }

    let request: CalculationRequest = match serde_json::from_str(&input) {
        Ok(request) => request,
        Err(err) => {
            let err: tent_layout::Error = err.into();
            return eprintln_and_exit!(err, 1);
        }
    };

    let response = match tent_layout::calculate(request) {
        Ok(response) => response,
        Err(err) => return eprintln_and_exit!(err, 1),
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    };
    match rendered {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(err) => {
            let err: tent_layout::Error = err.into();
            eprintln_and_exit!(err, 1)
        }
    }
}

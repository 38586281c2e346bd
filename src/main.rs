mod cli;
mod commands;
mod error;
mod output;
mod reader;
mod render;
mod resolve;
mod summary;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use render::RenderMode;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mode = if cli.html {
        RenderMode::Html
    } else {
        RenderMode::Text
    };

    match commands::handle_inspect(&cli.input, mode) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("ncmeta: {err:#}");
            ExitCode::from(2)
        }
    }
}

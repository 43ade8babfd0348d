use crate::cli::run;

pub mod cli;
mod config;
pub mod domain;
mod engine;
pub mod pipeline;

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

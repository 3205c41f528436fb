use clap::ValueEnum;

pub mod commands;
pub mod config;
pub mod operator;
pub mod workflow;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

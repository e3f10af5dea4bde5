use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "hubgate-ext")]
#[command(about = "Credential helper for the registry auth server")]
#[command(version)]
pub struct Cli {
    /// Forward decisions to a running hubgate server instead of deciding in-process
    #[arg(long, env = "HUBGATE_SERVER")]
    pub server: Option<String>,

    /// Write logs to this file, stdout carries the helper protocol
    #[arg(long, env = "HUBGATE_EXT_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check "<username> <token>" from stdin and print the authentication label
    Authn,
    /// Decide an authorization request read as JSON from stdin
    Authz,
}

//! # CLI Interface
//!
//! Defines the command-line argument structure for `sealkey-keygen` using
//! `clap` derive. Two modes: generate a new identity (default) or, with
//! `-y`, convert an identity file into a recipients file.

use clap::Parser;
use std::path::PathBuf;

/// Generate an X25519 identity, or convert identities to recipients.
///
/// Without -y, a new identity file is written to standard output or to
/// OUTPUT. If OUTPUT is given, the public key is also printed to standard
/// error. OUTPUT is never overwritten.
///
/// With -y, an identity file is read from INPUT (or standard input) and the
/// matching recipients are written one per line, with no comments.
#[derive(Parser, Debug)]
#[command(name = "sealkey-keygen", version)]
pub struct KeygenCli {
    /// Write the result to the file at path OUTPUT.
    #[arg(long, short = 'o', value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Convert an identity file to a recipients file.
    #[arg(short = 'y')]
    pub convert: bool,

    /// Identity file to convert. Reads standard input when absent or `-`.
    #[arg(value_name = "INPUT", requires = "convert")]
    pub input: Option<PathBuf>,

    /// Diagnostic log format on standard error: `pretty` or `json`.
    #[arg(long, env = "SEALKEY_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # sealkey-keygen
//!
//! Entry point for the `sealkey-keygen` binary. Parses CLI arguments,
//! initializes logging, and runs one of two modes:
//!
//! - default: generate an identity and write it as an identity file
//! - `-y`: read an identity file and write its recipients
//!
//! ```text
//! $ sealkey-keygen
//! # created: 2021-01-02T15:30:45+01:00
//! # public key: age1lvyvwawkr0mcnnnncaghunadrqkmuf9e6507x9y920xxpp866cnql7dp2z
//! AGE-SECRET-KEY-1N9JEPW6DWJ0ZQUDX63F5A03GX8QUW7PXDE39N8UYF82VZ9PC8UFS3M7XA9
//!
//! $ sealkey-keygen -o key.txt
//! Public key: age1ql3z7hjy54pw3hyww5ayyfg7zqgvc7w3j2elw8zmrj2kg5sfn9aqmcac8p
//!
//! $ sealkey-keygen -y key.txt
//! age1ql3z7hjy54pw3hyww5ayyfg7zqgvc7w3j2elw8zmrj2kg5sfn9aqmcac8p
//! ```

mod cli;
mod logging;
mod output;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use sealkey_protocol::identity::{
    parse_identities, write_identity, write_recipients, Identity, Recipient,
};

use cli::KeygenCli;
use logging::LogFormat;
use output::Output;

/// Default filter when `RUST_LOG` is unset. Quiet unless something is wrong.
const DEFAULT_LOG_LEVEL: &str = "sealkey_keygen=warn,sealkey_protocol=warn";

fn main() -> Result<()> {
    let cli = KeygenCli::parse();
    logging::init_logging(DEFAULT_LOG_LEVEL, LogFormat::from_str_lossy(&cli.log_format));

    let mut out = Output::open(cli.output.as_deref())?;

    if cli.convert {
        let input = open_input(cli.input.as_deref())?;
        let count = convert(input, &mut out)?;
        tracing::info!(count, "converted identities to recipients");
    } else {
        if out.is_world_readable() {
            eprintln!("Warning: writing secret key to a world-readable file.");
        }
        let announce = !out.is_terminal();
        let recipient = generate(&mut out, &mut io::stderr(), announce)?;
        tracing::info!(%recipient, "generated identity");
    }

    out.flush().context("Failed to flush output")?;
    Ok(())
}

/// Generates a fresh identity and writes it to `out` as an identity file.
/// With `announce`, the public key goes to `notices` first, before any key
/// material is written.
fn generate(out: &mut dyn Write, notices: &mut dyn Write, announce: bool) -> Result<Recipient> {
    let identity = Identity::generate().context("Internal error")?;
    if announce {
        writeln!(notices, "Public key: {}", identity.recipient())
            .context("Failed to write public key")?;
    }
    write_identity(out, &identity, &Local::now()).context("Failed to write identity")?;
    Ok(identity.recipient())
}

/// Reads identities from `input` and writes one recipient per line to `out`.
/// Zero identities is an error here, unlike in the parser.
fn convert(input: impl Read, out: &mut dyn Write) -> Result<usize> {
    let identities = parse_identities(input).context("Failed to parse input")?;
    if identities.is_empty() {
        bail!("No identities found in the input");
    }
    write_recipients(out, &identities).context("Failed to write recipients")?;
    Ok(identities.len())
}

/// Opens INPUT, or standard input when it is absent or `-`.
fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file {:?}", path))?;
            Ok(Box::new(file))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Writer whose clones all append to one buffer, so ordering across
    /// streams is visible.
    #[derive(Clone, Default)]
    struct Interleaved(Rc<RefCell<Vec<u8>>>);

    impl Write for Interleaved {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn generate_quietly(out: &mut dyn Write) -> Recipient {
        generate(out, &mut io::sink(), false).unwrap()
    }

    #[test]
    fn generate_writes_a_parseable_identity_file() {
        let mut out = Vec::new();
        let recipient = generate_quietly(&mut out);
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("# created: "));
        assert_eq!(lines[1], format!("# public key: {}", recipient));
        assert!(lines[2].starts_with("AGE-SECRET-KEY-1"));

        let ids = parse_identities(text.as_bytes()).unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].recipient(), recipient);
    }

    #[test]
    fn public_key_is_announced_before_the_identity_is_written() {
        let shared = Interleaved::default();
        let recipient = generate(&mut shared.clone(), &mut shared.clone(), true).unwrap();

        let text = String::from_utf8(shared.0.borrow().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], format!("Public key: {}", recipient));
        assert!(lines[1].starts_with("# created: "));
        assert!(lines[3].starts_with("AGE-SECRET-KEY-1"));
    }

    #[test]
    fn no_announcement_when_not_requested() {
        let mut out = Vec::new();
        let mut notices = Vec::new();
        generate(&mut out, &mut notices, false).unwrap();
        assert!(notices.is_empty());
        assert!(!out.is_empty());
    }

    #[test]
    fn convert_writes_recipients_in_order() {
        let mut file = Vec::new();
        let first = generate_quietly(&mut file);
        let second = generate_quietly(&mut file);

        let mut out = Vec::new();
        let count = convert(file.as_slice(), &mut out).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\n{}\n", first, second)
        );
    }

    #[test]
    fn convert_rejects_empty_input() {
        let mut out = Vec::new();
        let err = convert("# nothing here\n".as_bytes(), &mut out).unwrap_err();
        assert_eq!(err.to_string(), "No identities found in the input");
        assert!(out.is_empty());
    }

    #[test]
    fn convert_reports_the_bad_line() {
        let mut out = Vec::new();
        let err = convert("# header\nAGE-SECRET-KEY-1NOTAKEY\n".as_bytes(), &mut out).unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse input");
        assert!(format!("{:#}", err).contains("error at line 2"));
        assert!(out.is_empty());
    }

    #[test]
    fn convert_from_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");

        let mut out = Output::open(Some(path.as_path())).unwrap();
        let recipient = generate_quietly(&mut out);
        out.flush().unwrap();
        drop(out);

        let input = open_input(Some(path.as_path())).unwrap();
        let mut converted = Vec::new();
        convert(input, &mut converted).unwrap();
        assert_eq!(String::from_utf8(converted).unwrap(), format!("{}\n", recipient));
    }

    #[test]
    fn missing_input_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_input(Some(dir.path().join("absent.txt").as_path()))
            .err()
            .expect("must fail");
        assert!(err.to_string().starts_with("Failed to open input file"));
    }
}

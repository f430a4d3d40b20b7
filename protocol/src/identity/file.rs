//! # Identity and Recipients Files
//!
//! Line-oriented text files holding keys:
//!
//! ```text
//! # created: 2021-01-02T15:30:45+01:00
//! # public key: age1lvyvwawkr0mcnnnncaghunadrqkmuf9e6507x9y920xxpp866cnql7dp2z
//! AGE-SECRET-KEY-1N9JEPW6DWJ0ZQUDX63F5A03GX8QUW7PXDE39N8UYF82VZ9PC8UFS3M7XA9
//! ```
//!
//! Each line is trimmed. Blank lines and lines starting with `#` are skipped;
//! whatever a comment says (including the public key above) is never read
//! back as data. Every other line must hold exactly one key. The first bad
//! line aborts the whole parse, so callers never see half a keyring.

use chrono::{DateTime, SecondsFormat, TimeZone};
use std::fmt;
use std::io::{self, BufRead, BufReader, Read, Write};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{COMMENT_MARKER, CREATED_COMMENT, IDENTITY_FILE_SIZE_LIMIT, PUBLIC_KEY_COMMENT};
use crate::encoding::DecodeError;
use crate::identity::x25519::{Identity, Recipient};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from reading an identity or recipients file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A data line failed to decode. Line numbers start at 1.
    #[error("error at line {line}: {cause}")]
    Line {
        /// 1-based line number of the offending line.
        line: usize,
        /// Why the line was rejected.
        #[source]
        cause: DecodeError,
    },

    /// The input is larger than any key file has reason to be.
    #[error("input is larger than {limit} bytes")]
    TooLarge {
        /// The size limit in bytes.
        limit: u64,
    },

    /// The underlying reader failed, or the input is not UTF-8.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// The offending line, if the failure is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Line { line, .. } => Some(*line),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse every secret key in an identity file, in file order.
///
/// An empty result is not an error here. Pass `&mut reader` to keep using the
/// reader afterwards.
pub fn parse_identities<R: Read>(reader: R) -> Result<Vec<Identity>, ParseError> {
    let identities = parse_records(reader, str::parse::<Identity>)?;
    tracing::debug!(count = identities.len(), "parsed identity file");
    Ok(identities)
}

/// Parse every recipient in a recipients file, in file order.
pub fn parse_recipients<R: Read>(reader: R) -> Result<Vec<Recipient>, ParseError> {
    let recipients = parse_records(reader, str::parse::<Recipient>)?;
    tracing::debug!(count = recipients.len(), "parsed recipients file");
    Ok(recipients)
}

fn parse_records<R, T, F>(reader: R, mut parse: F) -> Result<Vec<T>, ParseError>
where
    R: Read,
    F: FnMut(&str) -> Result<T, DecodeError>,
{
    let mut reader = BufReader::new(reader.take(IDENTITY_FILE_SIZE_LIMIT + 1));
    let mut buf = Zeroizing::new(String::new());
    let mut consumed: u64 = 0;
    let mut line_number = 0usize;
    let mut records = Vec::new();

    loop {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        if n == 0 {
            break;
        }
        consumed += n as u64;
        if consumed > IDENTITY_FILE_SIZE_LIMIT {
            return Err(ParseError::TooLarge {
                limit: IDENTITY_FILE_SIZE_LIMIT,
            });
        }
        line_number += 1;

        let line = buf.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        let record = parse(line).map_err(|cause| {
            tracing::debug!(line = line_number, error = %cause, "rejected key file line");
            ParseError::Line {
                line: line_number,
                cause,
            }
        })?;
        records.push(record);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write `identity` as a complete identity file: creation timestamp and
/// recipient as comments, then the secret key.
pub fn write_identity<W, Tz>(out: &mut W, identity: &Identity, created: &DateTime<Tz>) -> io::Result<()>
where
    W: Write + ?Sized,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    writeln!(
        out,
        "{}{}",
        CREATED_COMMENT,
        created.to_rfc3339_opts(SecondsFormat::Secs, true)
    )?;
    writeln!(out, "{}{}", PUBLIC_KEY_COMMENT, identity.recipient())?;
    let secret = Zeroizing::new(identity.secret_string());
    writeln!(out, "{}", secret.as_str())
}

/// Write the recipient of each identity, one per line, no comments.
pub fn write_recipients<W: Write + ?Sized>(out: &mut W, identities: &[Identity]) -> io::Result<()> {
    for identity in identities {
        writeln!(out, "{}", identity.recipient())?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

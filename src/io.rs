//! Loading point matrices from delimited text files.
//!
//! The file format is one point per line: at least two whitespace- or
//! tab-separated numeric fields, of which the first two become the
//! point's coordinates. Blank lines are skipped.
//!
//! Failures are explicit: a missing file surfaces as [`Error::Io`], a line
//! with fewer than two fields as [`Error::MalformedRecord`], and a
//! non-numeric field as [`Error::Parse`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

/// Parse a single numeric field.
pub fn parse_field(token: &str) -> Result<f64> {
    token.trim().parse::<f64>().map_err(|_| Error::Parse {
        token: token.to_string(),
    })
}

/// Load a point matrix from a delimited text file.
///
/// Every returned row has exactly two coordinates (the first two fields
/// of its line); extra fields are ignored.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Vec<f64>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut points = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(Error::MalformedRecord {
                line: i + 1,
                found: fields.len(),
            });
        }

        points.push(vec![parse_field(fields[0])?, parse_field(fields[1])?]);
    }
    Ok(points)
}

//! Plain-text loader for field samples.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::vertex::{FieldVertex, Point};

/// Read field samples from a text file, one sample per line.
pub fn read_vertices<P: AsRef<Path>>(path: P) -> Result<Vec<FieldVertex<[f64; 3]>>> {
    let file = File::open(path.as_ref())?;
    let vertices = parse_vertices(BufReader::new(file))?;
    log::debug!(
        "read {} field samples from {}",
        vertices.len(),
        path.as_ref().display()
    );
    Ok(vertices)
}

/// Parse whitespace-separated samples: three coordinates followed by three
/// field components per line, `x y z bx by bz`. Blank lines and lines
/// starting with `#` are skipped; anything else that is not six numbers is
/// reported with its line number.
pub fn parse_vertices<R: BufRead>(reader: R) -> Result<Vec<FieldVertex<[f64; 3]>>> {
    let mut vertices = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut values = Vec::with_capacity(6);
        for token in trimmed.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| Error::Malformed {
                line: index + 1,
                reason: format!("cannot parse {token:?} as a number"),
            })?;
            values.push(value);
        }
        if values.len() != 6 {
            return Err(Error::Malformed {
                line: index + 1,
                reason: format!("expected 6 columns, found {}", values.len()),
            });
        }
        vertices.push(FieldVertex::new(
            Point::new(values[0], values[1], values[2]),
            [values[3], values[4], values[5]],
        ));
    }
    Ok(vertices)
}

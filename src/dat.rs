//! Reader for plain-text particle lists
//!
//! Each line holds one particle as ten whitespace-separated numbers
//!
//! ```text
//! event_index particle_type parent_type px py pz E x y z
//! ```
//!
//! Lines starting with `#` and blank lines are ignored. Every column may be
//! written as a floating-point number, but the first three have to be
//! integral.
use std::io::{BufRead, Lines};

use particle_id::ParticleID;

use crate::{
    error::{Error, ParseError, ParseErrorKind},
    record::ParticleRecord,
    vector::ThreeVector,
};

const COLUMNS: [&str; 10] = [
    "event_index",
    "PID",
    "parent_PID",
    "Px",
    "Py",
    "Pz",
    "E",
    "x",
    "y",
    "z",
];

/// Streaming reader of particle records
#[derive(Debug)]
pub struct DatReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> DatReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for DatReader<R> {
    type Item = Result<ParticleRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line += 1;
            match parse_line(&line, self.line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(err) => return Some(Err(err.into())),
            }
        }
    }
}

/// Parse a single line, `Ok(None)` for blank and comment lines
pub fn parse_line(line: &str, lineno: usize) -> Result<Option<ParticleRecord>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let err = |kind: ParseErrorKind| ParseError { line: lineno, kind };

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != COLUMNS.len() {
        return Err(err(ParseErrorKind::FieldCount {
            expected: COLUMNS.len(),
            found: fields.len(),
        }));
    }
    let mut values = [0f64; COLUMNS.len()];
    for (value, (field, name)) in values.iter_mut().zip(fields.iter().zip(COLUMNS)) {
        *value = field.parse().map_err(|_| {
            err(ParseErrorKind::NotANumber {
                field: name,
                value: field.to_string(),
            })
        })?;
    }
    let integral = |idx: usize| -> Result<f64, ParseError> {
        let value = values[idx];
        if value.is_finite() && value.fract() == 0. {
            Ok(value)
        } else {
            Err(err(ParseErrorKind::NotAnInteger {
                field: COLUMNS[idx],
                value,
            }))
        }
    };
    let pid = |idx: usize| -> Result<ParticleID, ParseError> {
        let value = integral(idx)?;
        if value < i32::MIN as f64 || value > i32::MAX as f64 {
            return Err(err(ParseErrorKind::NotAnInteger {
                field: COLUMNS[idx],
                value,
            }));
        }
        Ok(ParticleID::new(value as i32))
    };

    Ok(Some(ParticleRecord {
        event: integral(0)? as i64,
        id: pid(1)?,
        parent: pid(2)?,
        p: ThreeVector::new(values[3], values[4], values[5]),
        energy: values[6],
        vertex: ThreeVector::new(values[7], values[8], values[9]),
    }))
}

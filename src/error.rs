use thiserror::Error;

/// Errors raised while reading or processing a particle stream
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A malformed line in a `.dat` particle stream
#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// Line number, starting at 1
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("field `{field}` is not a number: `{value}`")]
    NotANumber { field: &'static str, value: String },

    #[error("field `{field}` must be an integer, found {value}")]
    NotAnInteger { field: &'static str, value: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("beam energy must be finite and positive, got {0}")]
    BeamEnergy(f64),

    #[error("mass of particle {pid} must be finite and non-negative, got {mass}")]
    Mass { pid: i32, mass: f64 },

    #[error("invalid mass override `{0}`, expected PID=GEV")]
    MassOverride(String),
}

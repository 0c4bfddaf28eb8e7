use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed header at line {line}: {text}")]
    MalformedHeader { line: usize, text: String },

    #[error("Malformed directive at line {line}: {text}")]
    MalformedDirective { line: usize, text: String },

    #[error("Mask token '{alias}' does not resolve to a binary literal at line {line}: {text}")]
    UnresolvedAlias {
        alias: String,
        line: usize,
        text: String,
    },

    #[error("Repeat source frame {frame:02X} has no recorded rows at line {line}: {text}")]
    UndefinedRepeatSource {
        frame: u32,
        line: usize,
        text: String,
    },

    #[error("Invalid hex value '{value}' at line {line}: {text}")]
    InvalidHexValue {
        value: String,
        line: usize,
        text: String,
    },

    #[error("Chart time steps backward at line {line}: {text}")]
    NonMonotonicChart { line: usize, text: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

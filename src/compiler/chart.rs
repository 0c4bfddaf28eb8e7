//! Chart line model and classification

use crate::error::{Error, Result};

/// Rows in one tracker frame
pub const ROWS_PER_FRAME: u32 = 64;

/// One raw input line with its 1-based source position
#[derive(Debug, Clone)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// A resolved chart triple ready for quantization
#[derive(Debug, Clone)]
pub struct ChartEntry {
    /// Tracker frame index
    pub frame: u32,
    /// Row within the frame (0-63)
    pub row: u32,
    /// Resolved 4-bit column mask
    pub mask: u8,
    /// Line this entry came from
    pub line: SourceLine,
}

/// Classified chart line
///
/// Borrowed field tokens point into the source line's text.
#[derive(Debug, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `<frame> <row> <mask>`
    Data {
        frame: &'a str,
        row: &'a str,
        mask: &'a str,
    },
    /// `<target> = <source>`
    Repeat { target: &'a str, source: &'a str },
    /// `#define <name> <value>`
    Define { name: &'a str, value: &'a str },
    /// `#endframe <last-row>`
    Endframe { last_row: &'a str },
}

impl<'a> Directive<'a> {
    /// Classify a trimmed, non-empty line into one of the four forms
    pub fn classify(line: &'a SourceLine) -> Result<Self> {
        let tokens: Vec<&str> = line.text.split_whitespace().collect();

        match tokens.as_slice() {
            ["#define", name, value] => Ok(Self::Define { name, value }),
            ["#endframe", last_row] => Ok(Self::Endframe { last_row }),
            [first, ..] if first.starts_with('#') => Err(Error::MalformedDirective {
                line: line.number,
                text: line.text.clone(),
            }),
            [target, "=", source] => Ok(Self::Repeat { target, source }),
            [frame, row, mask] => Ok(Self::Data { frame, row, mask }),
            _ => Err(Error::MalformedDirective {
                line: line.number,
                text: line.text.clone(),
            }),
        }
    }
}

/// Parse a hexadecimal field (either case accepted)
pub fn parse_hex(token: &str, line: &SourceLine) -> Result<u32> {
    u32::from_str_radix(token, 16).map_err(|_| Error::InvalidHexValue {
        value: token.to_string(),
        line: line.number,
        text: line.text.clone(),
    })
}

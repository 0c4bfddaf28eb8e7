//! Chart compiler - expands directives and quantizes row timing
//!
//! Authors write charts in tracker time (speed, tempo, frame, row); the
//! compiler translates them into an exact schedule of hardware frames
//! and serializes it as a delta-timing byte stream.

pub mod chart;
pub mod preprocess;
pub mod timing;

use crate::error::{Error, Result};
use crate::stream::StreamWriter;
use chart::SourceLine;
use preprocess::Preprocessor;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use timing::{FrameQuantizer, Header};

/// Main compiler state
///
/// The alias table, frame history and discount live inside the
/// preprocessor and are constructed fresh for every run; nothing is
/// shared across compilations.
pub struct Compiler {
    /// Event pairs emitted by the last run, fillers included
    pub event_count: usize,
}

impl Compiler {
    pub fn new() -> Self {
        Self { event_count: 0 }
    }

    /// Compile chart input to a delta-stream file
    pub fn compile<R: Read>(&mut self, input: R, output: &Path) -> Result<()> {
        let writer = self.run(input)?;
        writer.finalize(output)
    }

    /// Compile a chart file to a delta-stream file
    pub fn compile_file(&mut self, input: &Path, output: &Path) -> Result<()> {
        let file = File::open(input).map_err(|e| {
            Error::Io(io::Error::new(
                e.kind(),
                format!("Failed to open '{}': {}", input.display(), e),
            ))
        })?;
        self.compile(file, output)
    }

    /// Compile chart input and return the raw stream bytes
    pub fn compile_stream<R: Read>(&mut self, input: R) -> Result<Vec<u8>> {
        Ok(self.run(input)?.into_bytes())
    }

    fn run<R: Read>(&mut self, input: R) -> Result<StreamWriter> {
        let mut lines = read_lines(input)?.into_iter();

        let header_line = lines.next().ok_or(Error::MalformedHeader {
            line: 0,
            text: String::new(),
        })?;
        let header = Header::parse(&header_line)?;

        println!("Input file BPM: {}", header.bpm);
        println!("Frames per row: {}", header.frames_per_row);

        let mut preprocessor = Preprocessor::new(lines.collect());
        let mut quantizer = FrameQuantizer::new(header.frames_per_row.clone());
        let mut writer = StreamWriter::new();
        self.event_count = 0;

        while let Some(entry) = preprocessor.next_entry()? {
            let discount = preprocessor.endframe_discount();
            for event in quantizer.advance(&entry, discount)? {
                self.event_count += 1;
                if event.mask != 0 {
                    println!(
                        "| {:5} | {:16} | {:8} |",
                        self.event_count,
                        entry.line.text,
                        quantizer.last_frame().round()
                    );
                }
                writer.write_event(event);
            }
        }

        writer.write_end();
        println!("{} events, {} bytes", self.event_count, writer.len());
        Ok(writer)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Read trimmed, non-blank lines with their 1-based positions
fn read_lines<R: Read>(input: R) -> Result<Vec<SourceLine>> {
    let reader = BufReader::new(input);
    let mut lines = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;

        // Strip UTF-8 BOM and surrounding whitespace
        let text = line.trim_start_matches('\u{FEFF}').trim();
        if text.is_empty() {
            continue;
        }

        lines.push(SourceLine::new(index + 1, text));
    }

    Ok(lines)
}

//! Tempo math and frame quantization

use super::chart::{ChartEntry, SourceLine, ROWS_PER_FRAME};
use crate::error::{Error, Result};
use crate::stream::{EncodedEvent, MAX_DELAY};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Speed/tempo header and the timing derived from it
///
/// BPM = tempo * 6 / speed. At 3600 hardware frames per minute and
/// 4 rows per beat that gives 900 / BPM frames per row.
#[derive(Debug, Clone)]
pub struct Header {
    pub speed: BigRational,
    pub tempo: BigRational,
    pub bpm: BigRational,
    pub frames_per_row: BigRational,
}

impl Header {
    /// Parse the `<speed> <tempo>` header line
    pub fn parse(line: &SourceLine) -> Result<Self> {
        let malformed = || Error::MalformedHeader {
            line: line.number,
            text: line.text.clone(),
        };

        let mut fields = line.text.split_whitespace();
        let speed = fields.next().and_then(parse_ratio).ok_or_else(malformed)?;
        let tempo = fields.next().and_then(parse_ratio).ok_or_else(malformed)?;
        if !speed.is_positive() || !tempo.is_positive() {
            return Err(malformed());
        }

        let bpm = &tempo * ratio(6) / &speed;
        let frames_per_row = ratio(900) / &bpm;
        Ok(Self {
            speed,
            tempo,
            bpm,
            frames_per_row,
        })
    }
}

/// Converts successive chart entries into bounded integer frame delays
///
/// `last_frame` holds the exact rational target of the previous event,
/// never the quantized one; `error` carries the accumulated rounding
/// debt. Together they keep the emitted schedule within one frame of the
/// true rational timeline.
pub struct FrameQuantizer {
    frames_per_row: BigRational,
    last_frame: BigRational,
    error: BigRational,
}

impl FrameQuantizer {
    pub fn new(frames_per_row: BigRational) -> Self {
        Self {
            frames_per_row,
            last_frame: BigRational::zero(),
            error: BigRational::zero(),
        }
    }

    /// Exact rational frame of the most recent event
    pub fn last_frame(&self) -> &BigRational {
        &self.last_frame
    }

    /// Quantize one entry into filler events plus the entry's own event
    pub fn advance(&mut self, entry: &ChartEntry, discount: u32) -> Result<Vec<EncodedEvent>> {
        let pattern_row = i64::from(entry.frame) * i64::from(ROWS_PER_FRAME)
            + i64::from(entry.row)
            - i64::from(discount);
        let absolute = ratio(pattern_row) * &self.frames_per_row;

        let mut delta = &absolute - &self.last_frame;
        if delta.is_negative() {
            return Err(Error::NonMonotonicChart {
                line: entry.line.number,
                text: entry.line.text.clone(),
            });
        }

        let mut events = Vec::new();
        let max_delay = ratio(i64::from(MAX_DELAY));
        while delta >= max_delay {
            events.push(EncodedEvent::filler());
            delta -= &max_delay;
        }

        // Half-way cases round away from zero.
        let rounded = delta.round();
        self.error += &rounded - &delta;
        // The filler loop left delta below MAX_DELAY, so this fits.
        let mut delay = rounded.to_integer().to_i64().unwrap_or(0);

        if self.error >= BigRational::one() {
            self.error -= BigRational::one();
            delay -= 1;
        } else if self.error <= -BigRational::one() {
            self.error += BigRational::one();
            delay += 1;
        }

        if delay < 1 {
            // A zero delay byte would read as the stream terminator.
            // Borrow a frame and charge it to the error budget.
            delay = 1;
            self.error = BigRational::one();
        }

        events.push(EncodedEvent::new(delay as u8, entry.mask));
        self.last_frame = absolute;
        Ok(events)
    }
}

fn ratio(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

/// Parse a positive rational field: integer, decimal, or `numer/denom`
fn parse_ratio(token: &str) -> Option<BigRational> {
    if let Some((numer, denom)) = token.split_once('/') {
        let numer: BigInt = numer.parse().ok()?;
        let denom: BigInt = denom.parse().ok()?;
        if denom.is_zero() {
            return None;
        }
        return Some(BigRational::new(numer, denom));
    }

    if let Some((int, frac)) = token.split_once('.') {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let int_part: BigInt = if int.is_empty() || int == "-" {
            BigInt::zero()
        } else {
            int.parse().ok()?
        };
        let frac_part: BigInt = frac.parse().ok()?;
        let scale = num_traits::pow(BigInt::from(10), frac.len());
        let numer = if int.starts_with('-') {
            int_part * &scale - frac_part
        } else {
            int_part * &scale + frac_part
        };
        return Some(BigRational::new(numer, scale));
    }

    let n: BigInt = token.parse().ok()?;
    Some(BigRational::from_integer(n))
}

//! Pressure traces: the value of one probe cell recorded every step.
//!
//! The text form is a flat list of whitespace-separated floats, the format
//! the plotting tools read.

use std::io::{Read, Write};

use crate::error::{Result, WaveGridError};
use crate::simulation::GridWaveField;

/// Samples recorded at a single probe cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PressureTrace {
    /// Probe column.
    pub x: i32,
    /// Probe row.
    pub y: i32,
    samples: Vec<f32>,
}

impl PressureTrace {
    /// Create an empty trace for the probe at `(x, y)`.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            samples: Vec::new(),
        }
    }

    /// Create an empty trace with room for `steps` samples.
    pub fn with_capacity(x: i32, y: i32, steps: usize) -> Self {
        Self {
            x,
            y,
            samples: Vec::with_capacity(steps),
        }
    }

    /// Append the probe's current value.
    pub fn record(&mut self, field: &GridWaveField) -> Result<f32> {
        let value = field.value(self.x, self.y)?;
        self.samples.push(value);
        Ok(value)
    }

    /// Recorded samples, oldest first.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest absolute sample.
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
    }

    /// `(min, max)` of the samples, or `None` when empty.
    pub fn range(&self) -> Option<(f32, f32)> {
        range_of(&self.samples)
    }

    /// Write the samples space-separated with a trailing newline.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        for (i, sample) in self.samples.iter().enumerate() {
            if i > 0 {
                writer.write_all(b" ")?;
            }
            write!(writer, "{}", sample)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Parse a whitespace-separated list of floats.
    ///
    /// The probe position is not part of the text form and is set to `(0, 0)`.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;

        let samples = text
            .split_whitespace()
            .enumerate()
            .map(|(i, token)| {
                token.parse::<f32>().map_err(|e| {
                    WaveGridError::trace(format!("sample {} ('{}'): {}", i, token, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            x: 0,
            y: 0,
            samples,
        })
    }
}

/// `(min, max)` of a slice, or `None` when empty.
pub fn range_of(values: &[f32]) -> Option<(f32, f32)> {
    values.iter().fold(None, |range, &v| match range {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::AcousticParams;

    #[test]
    fn test_record_probe() {
        let mut field = GridWaveField::new(4, 4, AcousticParams::default()).unwrap();
        let mut trace = PressureTrace::new(1, 2);
        field.inject_source(1, 2, 0.25).unwrap();

        assert_eq!(trace.record(&field).unwrap(), 0.25);
        field.step();
        trace.record(&field).unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.samples()[0], 0.25);
    }

    #[test]
    fn test_probe_out_of_bounds() {
        let field = GridWaveField::new(4, 4, AcousticParams::default()).unwrap();
        let mut trace = PressureTrace::new(4, 0);
        assert!(trace.record(&field).unwrap_err().is_out_of_bounds());
        assert!(trace.is_empty());
    }

    #[test]
    fn test_text_format() {
        let mut trace = PressureTrace::new(0, 0);
        trace.samples = vec![0.5, -1.25, 2.0];

        let mut out = Vec::new();
        trace.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0.5 -1.25 2\n");
    }

    #[test]
    fn test_read_any_whitespace() {
        let trace = PressureTrace::read_from("1.5\n-2\t 3e-1  \n".as_bytes()).unwrap();
        assert_eq!(trace.samples(), &[1.5, -2.0, 0.3]);
        assert_eq!(trace.peak(), 2.0);
        assert_eq!(trace.range(), Some((-2.0, 1.5)));
    }

    #[test]
    fn test_read_rejects_garbage() {
        let err = PressureTrace::read_from("1.0 abc".as_bytes()).unwrap_err();
        assert!(matches!(err, WaveGridError::Trace(_)));
    }

    #[test]
    fn test_empty_trace() {
        let trace = PressureTrace::read_from("".as_bytes()).unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.range(), None);
        assert_eq!(trace.peak(), 0.0);
    }
}

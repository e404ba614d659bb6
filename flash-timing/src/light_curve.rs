//! Light curves, frame time bases and their CSV representation.
//!
//! A recording on disk is one CSV row per video frame, in frame order:
//!
//! ```text
//! intensity,start_time,exposure_s
//! 1012.5,2024-05-01T03:04:05.000000000Z,0.0333667
//! 1009.0,2024-05-01T03:04:05.033366700Z,0.0333667
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::Timestamp;
use std::path::Path;
use thiserror::Error;

use crate::error::FlashTimingError;

/// Errors raised while reading or writing a recording.
#[derive(Error, Debug)]
pub enum LightCurveIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Frame {row}: start time is before the Unix epoch")]
    PreEpochTimestamp { row: usize },
    #[error("Frame {row}: start time cannot be represented as a calendar date")]
    UnrepresentableTimestamp { row: usize },
    #[error("Recording is empty")]
    Empty,
    #[error(transparent)]
    Invalid(#[from] FlashTimingError),
}

/// Brightness per video frame. Index = frame number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurve {
    samples: Vec<f64>,
}

impl LightCurve {
    /// Wrap samples, rejecting NaN, infinite and negative intensities.
    pub fn new(samples: Vec<f64>) -> Result<Self, FlashTimingError> {
        if let Some((index, &value)) = samples
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(FlashTimingError::InvalidIntensity { index, value });
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Intensity of one frame
    pub fn get(&self, index: usize) -> Result<f64, FlashTimingError> {
        self.samples
            .get(index)
            .copied()
            .ok_or(FlashTimingError::FrameOutOfRange {
                index,
                len: self.samples.len(),
            })
    }
}

impl AsRef<[f64]> for LightCurve {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}

/// Exposure start time and exposure duration of every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameTimeBase {
    start_times: Vec<Timestamp>,
    exposure_seconds: Vec<f64>,
}

impl FrameTimeBase {
    pub fn new(
        start_times: Vec<Timestamp>,
        exposure_seconds: Vec<f64>,
    ) -> Result<Self, FlashTimingError> {
        if exposure_seconds.len() != start_times.len() {
            return Err(FlashTimingError::MismatchedLengths {
                what: "exposure durations",
                expected: start_times.len(),
                got: exposure_seconds.len(),
            });
        }
        if let Some((index, &value)) = exposure_seconds
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(FlashTimingError::InvalidExposure { index, value });
        }
        Ok(Self {
            start_times,
            exposure_seconds,
        })
    }

    pub fn len(&self) -> usize {
        self.start_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.start_times.is_empty()
    }

    pub fn start_times(&self) -> &[Timestamp] {
        &self.start_times
    }

    pub fn exposure_seconds(&self) -> &[f64] {
        &self.exposure_seconds
    }

    /// Start time and exposure of one frame
    pub fn frame(&self, index: usize) -> Result<(Timestamp, f64), FlashTimingError> {
        match (
            self.start_times.get(index),
            self.exposure_seconds.get(index),
        ) {
            (Some(&start), Some(&exposure)) => Ok((start, exposure)),
            _ => Err(FlashTimingError::FrameOutOfRange {
                index,
                len: self.len(),
            }),
        }
    }

    /// Require index alignment with a light curve.
    pub fn check_aligned(&self, light_curve: &LightCurve) -> Result<(), FlashTimingError> {
        if self.len() != light_curve.len() {
            return Err(FlashTimingError::MismatchedLengths {
                what: "frame time base",
                expected: light_curve.len(),
                got: self.len(),
            });
        }
        Ok(())
    }
}

/// One CSV row.
#[derive(Debug, Serialize, Deserialize)]
struct FrameRow {
    intensity: f64,
    start_time: DateTime<Utc>,
    exposure_s: f64,
}

/// A light curve together with its index-aligned time base.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub light_curve: LightCurve,
    pub time_base: FrameTimeBase,
}

impl Recording {
    pub fn new(light_curve: LightCurve, time_base: FrameTimeBase) -> Result<Self, FlashTimingError> {
        time_base.check_aligned(&light_curve)?;
        Ok(Self {
            light_curve,
            time_base,
        })
    }

    /// Read a recording from a CSV file with an `intensity,start_time,exposure_s` header.
    pub fn load_csv(path: &Path) -> Result<Self, LightCurveIoError> {
        let reader = csv::Reader::from_path(path)?;
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self, LightCurveIoError> {
        let mut intensities = Vec::new();
        let mut start_times = Vec::new();
        let mut exposures = Vec::new();

        for (row, record) in reader.deserialize::<FrameRow>().enumerate() {
            let record = record?;
            let start = Timestamp::from_datetime(&record.start_time)
                .ok_or(LightCurveIoError::PreEpochTimestamp { row })?;
            intensities.push(record.intensity);
            start_times.push(start);
            exposures.push(record.exposure_s);
        }

        if intensities.is_empty() {
            return Err(LightCurveIoError::Empty);
        }

        log::debug!("Loaded {} frames", intensities.len());

        let light_curve = LightCurve::new(intensities)?;
        let time_base = FrameTimeBase::new(start_times, exposures)?;
        Ok(Self::new(light_curve, time_base)?)
    }

    /// Write the recording in the same CSV layout `load_csv` reads.
    pub fn write_csv(&self, path: &Path) -> Result<(), LightCurveIoError> {
        let mut writer = csv::Writer::from_path(path)?;

        for (row, (&intensity, (&start, &exposure))) in self
            .light_curve
            .samples()
            .iter()
            .zip(
                self.time_base
                    .start_times()
                    .iter()
                    .zip(self.time_base.exposure_seconds()),
            )
            .enumerate()
        {
            let start_time = start
                .to_datetime()
                .ok_or(LightCurveIoError::UnrepresentableTimestamp { row })?;
            writer.serialize(FrameRow {
                intensity,
                start_time,
                exposure_s: exposure,
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_recording() -> Recording {
        let light_curve = LightCurve::new(vec![100.0, 101.5, 480.25]).unwrap();
        let time_base = FrameTimeBase::new(
            vec![
                Timestamp::new(1_714_532_645, 0),
                Timestamp::new(1_714_532_645, 33_366_700),
                Timestamp::new(1_714_532_645, 66_733_400),
            ],
            vec![0.0333667; 3],
        )
        .unwrap();
        Recording::new(light_curve, time_base).unwrap()
    }

    #[test]
    fn test_rejects_invalid_intensity() {
        assert!(matches!(
            LightCurve::new(vec![1.0, f64::NAN]),
            Err(FlashTimingError::InvalidIntensity { index: 1, .. })
        ));
        assert!(matches!(
            LightCurve::new(vec![f64::INFINITY]),
            Err(FlashTimingError::InvalidIntensity { index: 0, .. })
        ));
        assert!(matches!(
            LightCurve::new(vec![1.0, -2.0]),
            Err(FlashTimingError::InvalidIntensity { index: 1, .. })
        ));
    }

    #[test]
    fn test_time_base_length_mismatch() {
        let result = FrameTimeBase::new(vec![Timestamp::new(0, 0)], vec![0.1, 0.1]);
        assert!(matches!(
            result,
            Err(FlashTimingError::MismatchedLengths { expected: 1, got: 2, .. })
        ));
    }

    #[test]
    fn test_recording_alignment() {
        let light_curve = LightCurve::new(vec![1.0, 2.0]).unwrap();
        let time_base = FrameTimeBase::new(vec![Timestamp::new(0, 0)], vec![0.1]).unwrap();
        assert!(matches!(
            Recording::new(light_curve, time_base),
            Err(FlashTimingError::MismatchedLengths { .. })
        ));
    }

    #[test]
    fn test_csv_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("recording.csv");
        let recording = sample_recording();

        recording.write_csv(&path).unwrap();
        let loaded = Recording::load_csv(&path).unwrap();

        assert_eq!(loaded, recording);
    }

    #[test]
    fn test_csv_reads_rfc3339_with_offset() {
        let data = "intensity,start_time,exposure_s\n\
                    12.0,2024-05-01T05:04:05.5+02:00,0.04\n";
        let reader = csv::Reader::from_reader(data.as_bytes());
        let recording = Recording::from_csv_reader(reader).unwrap();

        let (start, exposure) = recording.time_base.frame(0).unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-05-01T03:04:05.5Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(start, Timestamp::from_datetime(&expected).unwrap());
        assert_eq!(exposure, 0.04);
    }

    #[test]
    fn test_csv_rejects_negative_exposure() {
        let data = "intensity,start_time,exposure_s\n\
                    12.0,2024-05-01T03:04:05Z,-0.04\n";
        let reader = csv::Reader::from_reader(data.as_bytes());
        assert!(matches!(
            Recording::from_csv_reader(reader),
            Err(LightCurveIoError::Invalid(
                FlashTimingError::InvalidExposure { index: 0, .. }
            ))
        ));
    }

    #[test]
    fn test_empty_csv() {
        let data = "intensity,start_time,exposure_s\n";
        let reader = csv::Reader::from_reader(data.as_bytes());
        assert!(matches!(
            Recording::from_csv_reader(reader),
            Err(LightCurveIoError::Empty)
        ));
    }
}

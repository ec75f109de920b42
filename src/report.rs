//! Segment reporting.
//!
//! [`SegmentReporter`] turns a marker sequence into report lines. Segments
//! shorter than the minimum duration are dropped before numbering, so the
//! reported segments are always numbered 1, 2, 3… without gaps.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//!
//! use shotsegments::{Markers, ReportFormat, ReportOptions, SegmentReporter, ShotError};
//!
//! let markers = Markers::from(vec![0, 150, 330]);
//! let options = ReportOptions::new()
//!     .with_min_duration(100)
//!     .with_format(ReportFormat::Ffmpeg);
//! let reporter = SegmentReporter::new(Path::new("clip.mp4"), 30.0, options);
//!
//! let mut out = Vec::new();
//! reporter.write_report(&mut out, &markers)?;
//! assert_eq!(
//!     String::from_utf8(out).unwrap().lines().nth(1).unwrap(),
//!     "ffmpeg -ss 00:00:00 -i \"clip.mp4\" -ss 00:00:05 -t 00:00:07 -c copy -y clip-2.mp4",
//! );
//! # Ok::<(), ShotError>(())
//! ```

use std::{
    ffi::OsString,
    fmt::{Display, Formatter, Result as FmtResult},
    io::Write,
    path::{Path, PathBuf},
};

use serde_json::{Value, json};

use crate::{
    config::{ReportFormat, ReportOptions},
    error::ShotError,
    markers::Markers,
    timecode::Timecode,
};

/// A segment that survived minimum-duration filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberedSegment {
    /// 1-based position among the surviving segments.
    pub number: u64,
    /// Marker opening the segment.
    pub start: u64,
    /// Marker closing the segment.
    pub end: u64,
}

impl NumberedSegment {
    /// Length of the segment in frames.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the segment spans no frames.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Display for NumberedSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {} - {}", self.number, self.start, self.end)
    }
}

/// Adjacent marker pairs at least `min_duration` frames long, numbered from 1.
pub fn surviving_segments(
    markers: &Markers,
    min_duration: u64,
) -> impl Iterator<Item = NumberedSegment> + '_ {
    markers
        .segments()
        .filter(move |segment| segment.len() >= min_duration)
        .zip(1..)
        .map(|(segment, number)| NumberedSegment {
            number,
            start: segment.start,
            end: segment.end,
        })
}

/// Output path for segment `number` of `input`.
///
/// `-<number>` is inserted before the last extension of the file name,
/// keeping the directory: `videos/clip.mp4` becomes `videos/clip-3.mp4`. A
/// file name without an extension gets the suffix appended, and a leading
/// dot (as in `.hidden`) does not start an extension.
pub fn segment_file_name(input: &Path, number: u64) -> PathBuf {
    let mut name = OsString::from(input.file_stem().unwrap_or(input.as_os_str()));
    name.push(format!("-{number}"));
    if let Some(extension) = input.extension() {
        name.push(".");
        name.push(extension);
    }
    input.with_file_name(name)
}

/// A stream-copy `ffmpeg` command extracting one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionCommand {
    /// Minute-aligned input-side seek.
    pub seek: Timecode,
    /// Input file as given on the command line.
    pub input: PathBuf,
    /// Output-side seek within the minute.
    pub offset: Timecode,
    /// Segment duration, rounded up by one second.
    pub duration: Timecode,
    /// Output file for the segment.
    pub output: PathBuf,
}

impl ExtractionCommand {
    /// Build the command for `segment` of `input` at `frames_per_second`.
    ///
    /// # Errors
    ///
    /// Returns [`ShotError::InvalidFrameRate`] if the frame rate cannot
    /// convert frames to seconds.
    pub fn new(
        input: &Path,
        segment: &NumberedSegment,
        frames_per_second: f64,
    ) -> Result<Self, ShotError> {
        Ok(Self {
            seek: Timecode::seek(segment.start, frames_per_second)?,
            input: input.to_path_buf(),
            offset: Timecode::offset(segment.start, frames_per_second)?,
            duration: Timecode::duration(segment.len(), frames_per_second)?,
            output: segment_file_name(input, segment.number),
        })
    }
}

impl Display for ExtractionCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "ffmpeg -ss {} -i \"{}\" -ss {} -t {} -c copy -y {}",
            self.seek,
            self.input.display(),
            self.offset,
            self.duration,
            self.output.display()
        )
    }
}

/// Renders the surviving segments of a scan.
#[derive(Debug, Clone)]
pub struct SegmentReporter<'a> {
    input: &'a Path,
    frames_per_second: f64,
    options: ReportOptions,
}

impl<'a> SegmentReporter<'a> {
    /// Create a reporter for segments of `input`.
    ///
    /// `frames_per_second` is only consulted by the formats that print
    /// times.
    pub fn new(input: &'a Path, frames_per_second: f64, options: ReportOptions) -> Self {
        Self {
            input,
            frames_per_second,
            options,
        }
    }

    /// Surviving segments under this reporter's minimum duration.
    pub fn segments<'m>(&self, markers: &'m Markers) -> impl Iterator<Item = NumberedSegment> + 'm {
        surviving_segments(markers, self.options.min_duration())
    }

    /// Write the report for `markers` to `out`.
    ///
    /// Returns the number of segments reported.
    ///
    /// # Errors
    ///
    /// Returns [`ShotError::InvalidFrameRate`] in `Ffmpeg` format when the
    /// frame rate is unusable, and [`ShotError::IoError`] if writing fails.
    pub fn write_report<W: Write>(&self, out: &mut W, markers: &Markers) -> Result<usize, ShotError> {
        let mut count = 0;
        match self.options.format() {
            ReportFormat::Plain => {
                for segment in self.segments(markers) {
                    writeln!(out, "{segment}")?;
                    count += 1;
                }
            }
            ReportFormat::Ffmpeg => {
                for segment in self.segments(markers) {
                    let command =
                        ExtractionCommand::new(self.input, &segment, self.frames_per_second)?;
                    writeln!(out, "{command}")?;
                    count += 1;
                }
            }
            ReportFormat::Json => {
                let records: Vec<Value> = self
                    .segments(markers)
                    .map(|segment| self.json_record(&segment))
                    .collect();
                count = records.len();
                serde_json::to_writer_pretty(&mut *out, &records)?;
                writeln!(out)?;
            }
        }
        Ok(count)
    }

    fn json_record(&self, segment: &NumberedSegment) -> Value {
        let fps = self.frames_per_second;
        let seconds = |frames: u64| (fps.is_finite() && fps > 0.0).then(|| frames as f64 / fps);
        json!({
            "segment": segment.number,
            "start_frame": segment.start,
            "end_frame": segment.end,
            "frames": segment.len(),
            "start_seconds": seconds(segment.start),
            "duration_seconds": seconds(segment.len()),
            "output": segment_file_name(self.input, segment.number).display().to_string(),
        })
    }
}

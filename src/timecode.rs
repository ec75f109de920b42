//! Whole-second `HH:MM:SS` timecodes.
//!
//! An extraction command positions itself in two steps: a fast input-side
//! seek to the start of the minute containing the segment
//! ([`Timecode::seek`]), then an output-side seek by the remaining seconds
//! ([`Timecode::offset`]). The segment length ([`Timecode::duration`]) is
//! rounded up by one second so the last partial second is not cut off.
//!
//! Frame indices are converted to seconds by `frame / fps`, truncated.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use crate::error::ShotError;

/// A non-negative number of whole seconds, displayed as zero-padded
/// `HH:MM:SS`. Hours do not wrap at 24 and grow past two digits if needed.
///
/// # Example
///
/// ```
/// use shotsegments::Timecode;
///
/// let timecode = Timecode::from_seconds(3725);
/// assert_eq!(timecode.to_string(), "01:02:05");
/// assert_eq!("01:02:05".parse::<Timecode>().unwrap(), timecode);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timecode(u64);

impl Timecode {
    /// A timecode of `seconds` whole seconds.
    pub const fn from_seconds(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Whole seconds elapsed at `frame`, truncated.
    ///
    /// # Errors
    ///
    /// Returns [`ShotError::InvalidFrameRate`] unless `frames_per_second` is
    /// finite and positive.
    pub fn from_frames(frame: u64, frames_per_second: f64) -> Result<Self, ShotError> {
        if !frames_per_second.is_finite() || frames_per_second <= 0.0 {
            return Err(ShotError::InvalidFrameRate(frames_per_second));
        }
        Ok(Self((frame as f64 / frames_per_second) as u64))
    }

    /// Input-side seek point for a segment starting at `frame`: the elapsed
    /// time rounded down to a whole minute.
    pub fn seek(frame: u64, frames_per_second: f64) -> Result<Self, ShotError> {
        let seconds = Self::from_frames(frame, frames_per_second)?.0;
        Ok(Self(seconds - seconds % 60))
    }

    /// Output-side offset for a segment starting at `frame`: the seconds
    /// past the minute returned by [`seek`](Self::seek).
    pub fn offset(frame: u64, frames_per_second: f64) -> Result<Self, ShotError> {
        let seconds = Self::from_frames(frame, frames_per_second)?.0;
        Ok(Self(seconds % 60))
    }

    /// Duration of a segment of `frames` frames, plus one second.
    pub fn duration(frames: u64, frames_per_second: f64) -> Result<Self, ShotError> {
        let seconds = Self::from_frames(frames, frames_per_second)?.0;
        Ok(Self(seconds + 1))
    }

    /// Total whole seconds.
    pub const fn as_seconds(self) -> u64 {
        self.0
    }

    /// Whole hours. Not wrapped at 24.
    pub const fn hours(self) -> u64 {
        self.0 / 3600
    }

    /// Minutes past the hour, `0..60`.
    pub const fn minutes(self) -> u64 {
        (self.0 / 60) % 60
    }

    /// Seconds past the minute, `0..60`.
    pub const fn seconds(self) -> u64 {
        self.0 % 60
    }
}

impl Display for Timecode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

impl FromStr for Timecode {
    type Err = ShotError;

    /// Parse `HH:MM:SS`. Minutes and seconds must be below 60; hours are
    /// unbounded.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ShotError::InvalidTimecode(value.to_string());

        let mut parts = value.trim().split(':');
        let (Some(hours), Some(minutes), Some(seconds), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let field = |part: &str| -> Result<u64, ShotError> {
            if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u64>().map_err(|_| invalid())
        };

        let (hours, minutes, seconds) = (field(hours)?, field(minutes)?, field(seconds)?);
        if minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }

        hours
            .checked_mul(3600)
            .and_then(|total| total.checked_add(minutes * 60 + seconds))
            .map(Self)
            .ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_fields() {
        assert_eq!(Timecode::from_seconds(0).to_string(), "00:00:00");
        assert_eq!(Timecode::from_seconds(59).to_string(), "00:00:59");
        assert_eq!(Timecode::from_seconds(3600).to_string(), "01:00:00");
    }

    #[test]
    fn hours_do_not_wrap() {
        assert_eq!(Timecode::from_seconds(100 * 3600).to_string(), "100:00:00");
    }

    #[test]
    fn fields_split_the_total() {
        let timecode = Timecode::from_seconds(26 * 3600 + 7 * 60 + 42);
        assert_eq!(timecode.hours(), 26);
        assert_eq!(timecode.minutes(), 7);
        assert_eq!(timecode.seconds(), 42);
    }

    #[test]
    fn from_frames_truncates() {
        // 29 frames at 30 fps is 0.966s.
        assert_eq!(Timecode::from_frames(29, 30.0).unwrap().as_seconds(), 0);
        assert_eq!(Timecode::from_frames(30, 30.0).unwrap().as_seconds(), 1);
        // NTSC rate.
        assert_eq!(
            Timecode::from_frames(1800, 30000.0 / 1001.0).unwrap().as_seconds(),
            60
        );
    }

    #[test]
    fn rejects_unusable_frame_rates() {
        for fps in [0.0, -25.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Timecode::from_frames(10, fps),
                Err(ShotError::InvalidFrameRate(_))
            ));
        }
    }

    #[test]
    fn parse_rejects_malformed() {
        for value in ["", "1:2", "00:60:00", "00:00:60", "aa:bb:cc", "1:2:3:4", "-1:00:00"] {
            assert!(value.parse::<Timecode>().is_err(), "{value} should not parse");
        }
    }
}

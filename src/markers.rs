//! Segment boundary markers.
//!
//! A [`Markers`] sequence holds the frame indices that bound segments: the
//! start sentinel (frame 0), every detected cut, and the end sentinel (the
//! last frame). Segments are not stored; [`Markers::segments`] derives them
//! from adjacent pairs.

use std::ops::Deref;

/// Strictly increasing frame indices bounding the segments of a video.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers(Vec<u64>);

impl Markers {
    /// Create an empty marker sequence.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append `frame` unless it does not come after the last marker.
    ///
    /// Returns `true` if the marker was added.
    pub fn push(&mut self, frame: u64) -> bool {
        match self.0.last() {
            Some(&last) if frame <= last => false,
            _ => {
                self.0.push(frame);
                true
            }
        }
    }

    /// The adjacent marker pairs, in order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.0.windows(2).map(|pair| Segment {
            start: pair[0],
            end: pair[1],
        })
    }
}

impl Deref for Markers {
    type Target = [u64];

    fn deref(&self) -> &[u64] {
        &self.0
    }
}

impl From<Vec<u64>> for Markers {
    /// Build a sequence from raw indices, dropping any value that is not
    /// strictly greater than the one kept before it.
    fn from(frames: Vec<u64>) -> Self {
        let mut markers = Markers::new();
        for frame in frames {
            markers.push(frame);
        }
        markers
    }
}

/// The frame range between two adjacent markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Marker opening the segment.
    pub start: u64,
    /// Marker closing the segment.
    pub end: u64,
}

impl Segment {
    /// Length of the segment in frames.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the segment spans no frames.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

//! Frame difference scoring.
//!
//! The score of a frame is the mean absolute intensity difference between it
//! and its predecessor, computed over grayscale pixels and truncated to an
//! integer. It is a coarse global-motion measure: a hard cut, a flash or a
//! fast pan all raise it, and nothing here tells them apart.

use image::GrayImage;

use crate::error::ShotError;

/// Largest score two 8-bit grayscale frames can produce.
pub const MAX_SCORE: u32 = u8::MAX as u32;

/// Score `current` against `previous`.
///
/// Returns the sum of absolute per-pixel differences divided by the pixel
/// count, truncated toward zero. The result is always in `0..=MAX_SCORE`.
///
/// # Errors
///
/// Returns [`ShotError::FrameSizeMismatch`] if the two frames do not have the
/// same dimensions.
///
/// # Example
///
/// ```
/// use image::{GrayImage, Luma};
/// use shotsegments::frame_score;
///
/// let dark = GrayImage::from_pixel(4, 4, Luma([10]));
/// let bright = GrayImage::from_pixel(4, 4, Luma([90]));
/// assert_eq!(frame_score(&bright, &dark).unwrap(), 80);
/// ```
pub fn frame_score(current: &GrayImage, previous: &GrayImage) -> Result<u32, ShotError> {
    if current.dimensions() != previous.dimensions() {
        return Err(ShotError::FrameSizeMismatch {
            expected: previous.dimensions(),
            actual: current.dimensions(),
        });
    }

    let pixel_count = current.as_raw().len() as u64;
    if pixel_count == 0 {
        return Ok(0);
    }

    let total: u64 = current
        .as_raw()
        .iter()
        .zip(previous.as_raw())
        .map(|(&a, &b)| u64::from(a.abs_diff(b)))
        .sum();

    Ok((total / pixel_count) as u32)
}

#[cfg(test)]
mod tests {
    use image::Luma;

    use super::*;

    #[test]
    fn truncates_mean() {
        // Differences 0, 0, 0, 5 -> mean 1.25 -> 1.
        let previous = GrayImage::from_raw(2, 2, vec![0, 0, 0, 0]).unwrap();
        let current = GrayImage::from_raw(2, 2, vec![0, 0, 0, 5]).unwrap();
        assert_eq!(frame_score(&current, &previous).unwrap(), 1);
    }

    #[test]
    fn symmetric() {
        let a = GrayImage::from_pixel(3, 3, Luma([200]));
        let b = GrayImage::from_pixel(3, 3, Luma([20]));
        assert_eq!(
            frame_score(&a, &b).unwrap(),
            frame_score(&b, &a).unwrap()
        );
    }

    #[test]
    fn empty_frames_score_zero() {
        let a = GrayImage::new(0, 0);
        let b = GrayImage::new(0, 0);
        assert_eq!(frame_score(&a, &b).unwrap(), 0);
    }
}

//! Synthetic frame helpers shared by the integration tests.

#![allow(dead_code)]

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use shotsegments::ShotError;

pub const WIDTH: u32 = 16;
pub const HEIGHT: u32 = 9;

/// A uniform grayscale frame.
pub fn gray_frame(level: u8) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(WIDTH, HEIGHT, Luma([level])))
}

/// A uniform colour frame whose luma is close to `level`.
pub fn rgb_frame(level: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([level, level, level])))
}

/// Frames for the given intensity levels, ready to feed to `detect_boundaries`.
pub fn stream(levels: &[u8]) -> Vec<Result<DynamicImage, ShotError>> {
    levels.iter().map(|&level| Ok(gray_frame(level))).collect()
}

/// Ten frames: a slow ramp of 5 per frame, then a jump of 80 at frame 5.
///
/// Scores are 5, 5, 5, 5, 80, 5, 5, 5, 5 for frames 1..=9, so frame 5 has
/// score 80 and delta 75.
pub const SINGLE_CUT: [u8; 10] = [0, 5, 10, 15, 20, 100, 105, 110, 115, 120];

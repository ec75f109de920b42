//! Internal helpers for moving decoded pixel data into `image` buffers.

use ffmpeg_next::frame::Video as VideoFrame;
use image::{DynamicImage, GrayImage, RgbImage};

use crate::{config::PixelFormat, error::ShotError};

/// Copy pixel data from an FFmpeg video frame into a tightly-packed buffer,
/// dropping any per-row stride padding.
pub(crate) fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_bytes = (width as usize) * bytes_per_pixel;
    let data = video_frame.data(0);

    if stride == row_bytes {
        data[..row_bytes * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_bytes * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_bytes]);
        }
        buffer
    }
}

/// Wrap a scaled frame in a [`DynamicImage`] of the requested format.
pub(crate) fn frame_to_image(
    video_frame: &VideoFrame,
    pixel_format: PixelFormat,
) -> Result<DynamicImage, ShotError> {
    let width = video_frame.width();
    let height = video_frame.height();
    let buffer = frame_to_buffer(video_frame, width, height, pixel_format.bytes_per_pixel());

    match pixel_format {
        PixelFormat::Rgb8 => RgbImage::from_raw(width, height, buffer)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| {
                ShotError::VideoDecodeError(
                    "Failed to construct RGB image from decoded frame data".to_string(),
                )
            }),
        PixelFormat::Gray8 => GrayImage::from_raw(width, height, buffer)
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(|| {
                ShotError::VideoDecodeError(
                    "Failed to construct grayscale image from decoded frame data".to_string(),
                )
            }),
    }
}

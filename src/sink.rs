//! Boundary image export.
//!
//! When image saving is enabled the detector hands the frames on both sides
//! of every boundary to an [`ImageSink`]. [`JpegDirectory`] writes them as
//! `<8-digit frame index>-in.jpg` (first frame of a segment) and
//! `<8-digit frame index>-out.jpg` (last frame of a segment).

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};

use crate::error::ShotError;

/// Which side of a boundary an exported frame sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryRole {
    /// First frame of a segment.
    In,
    /// Last frame of a segment.
    Out,
}

impl BoundaryRole {
    /// File-name suffix for this role.
    pub fn suffix(self) -> &'static str {
        match self {
            BoundaryRole::In => "in",
            BoundaryRole::Out => "out",
        }
    }
}

impl Display for BoundaryRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.suffix())
    }
}

/// File name of an exported boundary frame, e.g. `00000042-in.jpg`.
pub fn boundary_image_name(frame_number: u64, role: BoundaryRole) -> String {
    format!("{frame_number:08}-{role}.jpg")
}

/// Destination for boundary frames.
pub trait ImageSink {
    /// Write one boundary frame.
    ///
    /// # Errors
    ///
    /// Returns [`ShotError::ImageWrite`] if the frame could not be stored.
    /// The detector logs such errors and keeps scanning.
    fn write_image(
        &mut self,
        image: &DynamicImage,
        frame_number: u64,
        role: BoundaryRole,
    ) -> Result<(), ShotError>;
}

/// Sink that discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageSink for NoImages {
    fn write_image(&mut self, _: &DynamicImage, _: u64, _: BoundaryRole) -> Result<(), ShotError> {
        Ok(())
    }
}

/// Sink that writes JPEG files into a directory.
#[derive(Debug, Clone)]
pub struct JpegDirectory {
    directory: PathBuf,
}

impl JpegDirectory {
    /// Write images into `directory`. The directory must already exist.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Full path an image for `frame_number` and `role` is written to.
    pub fn image_path(&self, frame_number: u64, role: BoundaryRole) -> PathBuf {
        self.directory.join(boundary_image_name(frame_number, role))
    }
}

impl ImageSink for JpegDirectory {
    fn write_image(
        &mut self,
        image: &DynamicImage,
        frame_number: u64,
        role: BoundaryRole,
    ) -> Result<(), ShotError> {
        let path = self.image_path(frame_number, role);
        log::debug!("Writing boundary image {}", path.display());
        image
            .save_with_format(&path, ImageFormat::Jpeg)
            .map_err(|error| ShotError::ImageWrite {
                path,
                reason: error.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_names_are_zero_padded() {
        assert_eq!(boundary_image_name(0, BoundaryRole::In), "00000000-in.jpg");
        assert_eq!(
            boundary_image_name(1234, BoundaryRole::Out),
            "00001234-out.jpg"
        );
    }

    #[test]
    fn image_path_joins_directory() {
        let sink = JpegDirectory::new("shots");
        assert_eq!(
            sink.image_path(7, BoundaryRole::In),
            Path::new("shots").join("00000007-in.jpg")
        );
    }
}

//! Boundary detector tests on synthetic frame streams.

mod common;

use std::sync::{Arc, Mutex};

use common::{SINGLE_CUT, gray_frame, stream};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use shotsegments::{
    BoundaryDetector, BoundaryRole, FrameScore, ImageSink, NoImages, ScanOptions, ScanProgress,
    ShotError, detect_boundaries,
};

#[derive(Default)]
struct Recorder {
    frames: Mutex<Vec<FrameScore>>,
}

impl ScanProgress for Recorder {
    fn on_frame(&self, frame: &FrameScore) {
        self.frames.lock().unwrap().push(*frame);
    }
}

// ── dual threshold ─────────────────────────────────────────────────

#[test]
fn single_cut_produces_three_markers() {
    let boundaries =
        detect_boundaries(stream(&SINGLE_CUT), &ScanOptions::new(), &mut NoImages).unwrap();
    assert_eq!(&*boundaries.markers, &[0, 5, 9]);
    assert_eq!(boundaries.frames_read, 10);
    assert_eq!(boundaries.failed_image_writes, 0);
}

#[test]
fn high_threshold_suppresses_the_cut() {
    let options = ScanOptions::new().with_threshold(100);
    let boundaries = detect_boundaries(stream(&SINGLE_CUT), &options, &mut NoImages).unwrap();
    assert_eq!(&*boundaries.markers, &[0, 9]);
}

#[test]
fn sustained_motion_is_not_a_cut_every_frame() {
    // Alternating frames score 200 every step; only the first jump has a
    // large delta.
    let levels = [0u8, 0, 200, 0, 200, 0, 200, 0];
    let boundaries = detect_boundaries(stream(&levels), &ScanOptions::new(), &mut NoImages).unwrap();
    assert_eq!(&*boundaries.markers, &[0, 2, 7]);
}

#[test]
fn score_must_strictly_exceed_threshold() {
    // Jump of exactly 50 from a still shot: score 50, delta 50.
    let levels = [0u8, 0, 50, 50];
    let boundaries = detect_boundaries(stream(&levels), &ScanOptions::new(), &mut NoImages).unwrap();
    assert_eq!(&*boundaries.markers, &[0, 3]);

    let levels = [0u8, 0, 51, 51];
    let boundaries = detect_boundaries(stream(&levels), &ScanOptions::new(), &mut NoImages).unwrap();
    assert_eq!(&*boundaries.markers, &[0, 2, 3]);
}

#[test]
fn second_frame_can_be_a_cut() {
    let boundaries =
        detect_boundaries(stream(&[0, 255, 255]), &ScanOptions::new(), &mut NoImages).unwrap();
    assert_eq!(&*boundaries.markers, &[0, 1, 2]);
}

#[test]
fn cut_on_last_frame_is_recorded_once() {
    let boundaries =
        detect_boundaries(stream(&[0, 0, 0, 255]), &ScanOptions::new(), &mut NoImages).unwrap();
    assert_eq!(&*boundaries.markers, &[0, 3]);
}

#[test]
fn markers_are_strictly_increasing() {
    let levels = [0u8, 200, 200, 0, 0, 0, 220, 10, 10, 10, 250];
    let boundaries = detect_boundaries(stream(&levels), &ScanOptions::new(), &mut NoImages).unwrap();
    assert!(boundaries.markers.len() >= 2);
    assert!(boundaries.markers.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(boundaries.markers.first(), Some(&0));
    assert_eq!(boundaries.markers.last(), Some(&10));
}

// ── short streams ──────────────────────────────────────────────────

#[test]
fn single_frame_is_too_short() {
    let result = detect_boundaries(stream(&[42]), &ScanOptions::new(), &mut NoImages);
    assert!(matches!(
        result,
        Err(ShotError::StreamTooShort { frames_read: 1 })
    ));
}

#[test]
fn empty_stream_is_too_short() {
    let result = detect_boundaries(stream(&[]), &ScanOptions::new(), &mut NoImages);
    let error = result.unwrap_err();
    assert!(matches!(error, ShotError::StreamTooShort { frames_read: 0 }));
    assert!(error.to_string().contains("too short"));
}

#[test]
fn two_frames_are_enough() {
    let boundaries =
        detect_boundaries(stream(&[10, 10]), &ScanOptions::new(), &mut NoImages).unwrap();
    assert_eq!(&*boundaries.markers, &[0, 1]);
}

// ── errors ─────────────────────────────────────────────────────────

#[test]
fn decode_error_aborts_the_scan() {
    let frames = vec![
        Ok(gray_frame(0)),
        Ok(gray_frame(0)),
        Err(ShotError::VideoDecodeError("corrupt packet".to_string())),
        Ok(gray_frame(0)),
    ];
    let result = detect_boundaries(frames, &ScanOptions::new(), &mut NoImages);
    assert!(matches!(result, Err(ShotError::VideoDecodeError(_))));
}

#[test]
fn resolution_change_is_reported() {
    let frames = vec![
        Ok(gray_frame(0)),
        Ok(DynamicImage::ImageLuma8(GrayImage::new(4, 4))),
    ];
    let result = detect_boundaries(frames, &ScanOptions::new(), &mut NoImages);
    assert!(matches!(result, Err(ShotError::FrameSizeMismatch { .. })));
}

// ── incremental use ────────────────────────────────────────────────

#[test]
fn detector_reports_each_frame() {
    let options = ScanOptions::new();
    let mut sink = NoImages;
    let mut detector = BoundaryDetector::new(&options, &mut sink);

    assert_eq!(detector.push_frame(gray_frame(0)).unwrap(), None);
    let scored = detector.push_frame(gray_frame(5)).unwrap().unwrap();
    assert_eq!(
        scored,
        FrameScore {
            frame_number: 1,
            score: 5,
            delta: 5,
            is_cut: false,
        }
    );

    let scored = detector.push_frame(gray_frame(90)).unwrap().unwrap();
    assert_eq!(scored.score, 85);
    assert_eq!(scored.delta, 80);
    assert!(scored.is_cut);
    assert_eq!(&**detector.markers(), &[0, 2]);
    assert_eq!(detector.frames_read(), 3);

    let boundaries = detector.finish().unwrap();
    assert_eq!(&*boundaries.markers, &[0, 2]);
}

#[test]
fn colour_frames_are_scored_in_grayscale() {
    let frames = [0u8, 0, 200, 200]
        .iter()
        .map(|&level| Ok(common::rgb_frame(level)))
        .collect::<Vec<_>>();
    let boundaries = detect_boundaries(frames, &ScanOptions::new(), &mut NoImages).unwrap();
    assert_eq!(&*boundaries.markers, &[0, 2, 3]);
}

struct CountingSink(usize);

impl ImageSink for CountingSink {
    fn write_image(&mut self, _: &DynamicImage, _: u64, _: BoundaryRole) -> Result<(), ShotError> {
        self.0 += 1;
        Ok(())
    }
}

fn red_then_green() -> Vec<Result<DynamicImage, ShotError>> {
    let red = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 9, Rgb([255, 0, 0])));
    let green = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 9, Rgb([0, 255, 0])));
    std::iter::repeat_n(red, 5)
        .chain(std::iter::repeat_n(green, 5))
        .map(Ok)
        .collect()
}

#[test]
fn saving_images_does_not_change_saturated_colour_cuts() {
    // Red to green is 54 -> 182 in Rec.709 luma: score and delta 128.
    let options = ScanOptions::new().with_threshold(100);
    let without = detect_boundaries(red_then_green(), &options, &mut NoImages).unwrap();

    let mut sink = CountingSink(0);
    let saving = options.clone().with_save_images(true);
    let with = detect_boundaries(red_then_green(), &saving, &mut sink).unwrap();

    assert_eq!(&*without.markers, &[0, 5, 9]);
    assert_eq!(without.markers, with.markers);
    assert_eq!(sink.0, 4);
}

// ── progress ───────────────────────────────────────────────────────

#[test]
fn observer_sees_every_scored_frame() {
    let recorder = Arc::new(Recorder::default());
    let options = ScanOptions::new().with_progress(recorder.clone());
    detect_boundaries(stream(&SINGLE_CUT), &options, &mut NoImages).unwrap();

    let frames = recorder.frames.lock().unwrap();
    assert_eq!(frames.len(), 9);
    assert_eq!(frames[0].frame_number, 1);
    let cuts: Vec<u64> = frames
        .iter()
        .filter(|frame| frame.is_cut)
        .map(|frame| frame.frame_number)
        .collect();
    assert_eq!(cuts, vec![5]);
    assert_eq!(frames[4].score, 80);
    assert_eq!(frames[4].delta, 75);
}

#[test]
fn observer_respects_batch_size() {
    let recorder = Arc::new(Recorder::default());
    let options = ScanOptions::new()
        .with_progress(recorder.clone())
        .with_batch_size(3);
    detect_boundaries(stream(&SINGLE_CUT), &options, &mut NoImages).unwrap();

    let numbers: Vec<u64> = recorder
        .frames
        .lock()
        .unwrap()
        .iter()
        .map(|frame| frame.frame_number)
        .collect();
    assert_eq!(numbers, vec![3, 6, 9]);
}

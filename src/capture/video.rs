//! Video file source using video-rs
//!
//! Decodes frames one by one; video-rs hands out RGB frames as ndarray
//! arrays of shape (height, width, 3).

use super::CameraFrame;
use crate::config::PixelLayout;
use crate::error::EstimatorError;
use ndarray::Axis;
use std::path::Path;
use video_rs::decode::Decoder;

pub struct VideoSource {
    decoder: Decoder,
    layout: PixelLayout,
    next: u64,
    finished: bool,
}

impl VideoSource {
    pub fn open(path: &Path, layout: PixelLayout) -> Result<Self, EstimatorError> {
        video_rs::init().map_err(EstimatorError::video)?;

        let decoder = Decoder::new(path).map_err(EstimatorError::video)?;
        let (width, height) = decoder.size();
        tracing::info!(
            "Input: {}x{} @ {:.2} fps",
            width,
            height,
            decoder.frame_rate()
        );

        Ok(Self {
            decoder,
            layout,
            next: 0,
            finished: false,
        })
    }
}

impl Iterator for VideoSource {
    type Item = Result<CameraFrame, EstimatorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let (time, frame) = match self.decoder.decode() {
            Ok(decoded) => decoded,
            Err(video_rs::Error::DecodeExhausted) => {
                self.finished = true;
                return None;
            }
            Err(e) => {
                self.finished = true;
                return Some(Err(EstimatorError::video(e)));
            }
        };

        let pixels = match self.layout {
            PixelLayout::Rgb888 => frame.iter().copied().collect(),
            PixelLayout::Grayscale => frame
                .map_axis(Axis(2), |px| {
                    (px[0] as f32 * 0.299 + px[1] as f32 * 0.587 + px[2] as f32 * 0.114).round()
                        as u8
                })
                .iter()
                .copied()
                .collect(),
        };

        let index = self.next;
        self.next += 1;

        Some(Ok(CameraFrame {
            index,
            timestamp_secs: Some(time.as_secs() as f32),
            pixels,
        }))
    }
}

//! Image sequence source: a directory of still frames, read in name order

use super::{image_to_pixels, CameraFrame};
use crate::config::PixelLayout;
use crate::error::EstimatorError;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tga", "tif", "tiff"];

/// Frames decoded lazily from the image files of a directory
#[derive(Debug)]
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    layout: PixelLayout,
    next: usize,
}

impl ImageSequence {
    pub fn open(dir: &Path, layout: PixelLayout) -> Result<Self, EstimatorError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_image_extension(&path) {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(EstimatorError::NoFrames(dir.to_path_buf()));
        }
        paths.sort();

        tracing::info!("Found {} frames in {:?}", paths.len(), dir);

        Ok(Self {
            paths,
            layout,
            next: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Iterator for ImageSequence {
    type Item = Result<CameraFrame, EstimatorError>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.get(self.next)?;
        let index = self.next as u64;
        self.next += 1;

        let frame = image::open(path).map(|img| CameraFrame {
            index,
            timestamp_secs: None,
            pixels: image_to_pixels(&img, self.layout),
        });
        Some(frame.map_err(EstimatorError::from))
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

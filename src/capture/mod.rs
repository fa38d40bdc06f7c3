//! Frame sources standing in for the camera feed
//!
//! Sources yield [`CameraFrame`]s whose pixels are already converted to the
//! configured [`PixelLayout`].

mod images;
#[cfg(feature = "video")]
mod video;

pub use images::ImageSequence;
#[cfg(feature = "video")]
pub use video::VideoSource;

use crate::config::PixelLayout;
use image::DynamicImage;

/// One camera frame
#[derive(Clone, Debug, PartialEq)]
pub struct CameraFrame {
    /// Position of the frame in its source
    pub index: u64,
    pub timestamp_secs: Option<f32>,
    /// Interleaved samples in the source's pixel layout
    pub pixels: Vec<u8>,
}

/// Convert a decoded image into a raw buffer in the given layout
pub fn image_to_pixels(image: &DynamicImage, layout: PixelLayout) -> Vec<u8> {
    match layout {
        PixelLayout::Grayscale => image.to_luma8().into_raw(),
        PixelLayout::Rgb888 => image.to_rgb8().into_raw(),
    }
}

//! Temperature-to-color rendering and frame upscaling.
//!
//! [`render_frame`] is a pure value transform: one raw frame plus the
//! current exposure window in, one RGB image out. Normalized values are not
//! clamped before lookup; the colormap itself edge-clamps out-of-range
//! input. [`upscale`] then enlarges the image by the fixed
//! [`FRAME_SCALE`] factor with bilinear filtering.

use image::{Rgb, RgbImage, imageops};

use crate::colormap::Colormap;
use crate::config::FRAME_SCALE;
use crate::source::Frame;

/// Converts one raw frame into an RGB image using the given exposure window.
///
/// Every value is normalized as `(v - min) / (max - min)`, mapped through
/// the colormap, scaled to 0-255 and truncated; the alpha channel is
/// dropped.
///
/// A degenerate window (`max - min` zero or non-finite, e.g. a perfectly
/// uniform first frame) would divide by zero, so the whole frame renders as
/// the colormap's zero point instead.
pub fn render_frame(frame: &Frame, window: (f32, f32), colormap: &Colormap) -> RgbImage {
    let (temp_min, temp_max) = window;
    let range = temp_max - temp_min;
    let degenerate = !range.is_normal() || range <= 0.0;

    let mut image = RgbImage::new(frame.width(), frame.height());
    for (value, pixel) in frame.values().iter().zip(image.pixels_mut()) {
        let normalized = if degenerate {
            0.0
        } else {
            (value - temp_min) / range
        };
        let [r, g, b, _alpha] = colormap.eval(normalized);
        *pixel = Rgb([
            (r * 255.0) as u8,
            (g * 255.0) as u8,
            (b * 255.0) as u8,
        ]);
    }
    image
}

/// Enlarges a rendered frame by [`FRAME_SCALE`] with bilinear interpolation,
/// preserving aspect ratio.
pub fn upscale(image: &RgbImage) -> RgbImage {
    let width = (image.width() as f32 * FRAME_SCALE) as u32;
    let height = (image.height() as f32 * FRAME_SCALE) as u32;
    imageops::resize(image, width, height, imageops::FilterType::Triangle)
}

/// Output dimensions for a sequence with the given native frame size.
pub fn scaled_dimensions(width: u32, height: u32) -> (u32, u32) {
    (
        (width as f32 * FRAME_SCALE) as u32,
        (height as f32 * FRAME_SCALE) as u32,
    )
}

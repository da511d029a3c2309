//! Auto-exposure controller for the normalization window.
//!
//! Thermal frames carry raw radiometric values whose range drifts from frame
//! to frame. Normalizing each frame against its own min/max makes the output
//! flicker, while a fixed window clips whenever something hot enters the
//! scene. The controller tracks the stream's range with exponential
//! smoothing, biased wider by a fixed headroom, and snaps instantly when a
//! frame's true range escapes the smoothed window so genuine changes are
//! shown immediately instead of being gradually revealed.
//!
//! The window is an explicit per-sequence value threaded through the frame
//! pipeline; there is no shared mutable state between sequences.

use crate::config::{HEADROOM, NORMALISATION_SMOOTH};

/// Exposure window state for one frame sequence.
///
/// Starts out [`Uninitialized`](ExposureWindow::Uninitialized) and becomes
/// [`Active`](ExposureWindow::Active) after the first frame, which defines
/// the initial window with no headroom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExposureWindow {
    /// No frame has been observed yet.
    Uninitialized,

    /// The current normalization bounds.
    Active { min: f32, max: f32 },
}

impl ExposureWindow {
    pub fn new() -> Self {
        Self::Uninitialized
    }

    /// Updates the window with one frame's true extremes and returns the
    /// bounds to use when normalizing that frame.
    ///
    /// After initialization the bounds are exponentially smoothed towards
    /// the frame extremes widened by [`HEADROOM`]. If the frame's true range
    /// still falls outside the smoothed window, the smoothed values are
    /// discarded and the window snaps to the frame's exact extremes, so a
    /// single wildly out-of-range frame is never clipped.
    pub fn update(&mut self, frame_min: f32, frame_max: f32) -> (f32, f32) {
        let (min, max) = match *self {
            Self::Uninitialized => (frame_min, frame_max),
            Self::Active { min, max } => {
                let smoothed_min = NORMALISATION_SMOOTH * min
                    + (1.0 - NORMALISATION_SMOOTH) * (frame_min - HEADROOM);
                let smoothed_max = NORMALISATION_SMOOTH * max
                    + (1.0 - NORMALISATION_SMOOTH) * (frame_max + HEADROOM);

                // Extreme values would otherwise be revealed gradually as the
                // smoothed window catches up; switch levels instantly instead.
                if frame_min < smoothed_min || frame_max > smoothed_max {
                    (frame_min, frame_max)
                } else {
                    (smoothed_min, smoothed_max)
                }
            }
        };
        *self = Self::Active { min, max };
        (min, max)
    }
}

impl Default for ExposureWindow {
    fn default() -> Self {
        Self::new()
    }
}

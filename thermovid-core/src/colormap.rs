//! Colormap tables mapping normalized temperatures to RGBA colors.
//!
//! A colormap is a table of evenly spaced RGBA samples over [0, 1] with
//! linear interpolation between samples and edge clamping outside the range.
//! Tables are loaded once per run from a JSON file and shared read-only
//! across every conversion; when no file is given the built-in ironbow
//! palette is used.
//!
//! The JSON format is intentionally minimal and portable:
//!
//! ```json
//! {
//!   "name": "my-palette",
//!   "samples": [[0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0, 1.0]]
//! }
//! ```
//!
//! Each sample is `[r, g, b, a]` with components in [0, 1]; at least two
//! samples are required.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Control points for the built-in palette, a variant of the "ironbow"
/// gradient commonly used by thermal imagers: black through deep purple,
/// red and orange up to near-white yellow.
const IRONBOW_SAMPLES: [[f32; 4]; 12] = [
    [0.000, 0.000, 0.000, 1.0],
    [0.110, 0.016, 0.282, 1.0],
    [0.251, 0.016, 0.478, 1.0],
    [0.392, 0.051, 0.533, 1.0],
    [0.533, 0.114, 0.506, 1.0],
    [0.678, 0.180, 0.416, 1.0],
    [0.800, 0.275, 0.286, 1.0],
    [0.894, 0.400, 0.157, 1.0],
    [0.957, 0.549, 0.055, 1.0],
    [0.984, 0.710, 0.063, 1.0],
    [0.973, 0.871, 0.353, 1.0],
    [0.988, 0.988, 0.749, 1.0],
];

static BUILT_IN: Lazy<Colormap> = Lazy::new(|| {
    Colormap::from_samples("ironbow", IRONBOW_SAMPLES.to_vec())
        .expect("built-in palette table is valid")
});

/// A scalar-to-RGBA lookup table with linear interpolation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colormap {
    /// Optional palette name, used only for logging.
    #[serde(default)]
    name: Option<String>,

    /// Evenly spaced RGBA samples over [0, 1].
    samples: Vec<[f32; 4]>,
}

impl Colormap {
    /// Builds a colormap from RGBA samples, validating the table.
    pub fn from_samples(name: &str, samples: Vec<[f32; 4]>) -> CoreResult<Self> {
        let map = Self {
            name: Some(name.to_string()),
            samples,
        };
        map.validate()?;
        Ok(map)
    }

    /// Loads a colormap table from a JSON file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        if !path.is_file() {
            return Err(CoreError::ColormapNotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|e| {
            CoreError::ColormapLoad(format!("failed to open '{}': {}", path.display(), e))
        })?;
        let map: Self = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            CoreError::ColormapLoad(format!("failed to parse '{}': {}", path.display(), e))
        })?;
        map.validate()?;
        log::debug!(
            "Loaded colormap '{}' with {} samples from {}",
            map.name.as_deref().unwrap_or("unnamed"),
            map.samples.len(),
            path.display()
        );
        Ok(map)
    }

    /// The built-in ironbow palette.
    pub fn built_in() -> &'static Self {
        &BUILT_IN
    }

    /// The palette name, if the table carried one.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    fn validate(&self) -> CoreResult<()> {
        if self.samples.len() < 2 {
            return Err(CoreError::ColormapLoad(format!(
                "colormap table needs at least 2 samples, got {}",
                self.samples.len()
            )));
        }
        for (index, sample) in self.samples.iter().enumerate() {
            if sample.iter().any(|c| !c.is_finite() || *c < 0.0 || *c > 1.0) {
                return Err(CoreError::ColormapLoad(format!(
                    "sample {index} has components outside [0, 1]: {sample:?}"
                )));
            }
        }
        Ok(())
    }

    /// Evaluates the table at `value`, returning an RGBA color in [0, 1]^4.
    ///
    /// Inputs outside [0, 1] (including NaN) are edge-clamped, so callers may
    /// pass unclamped normalized values directly.
    pub fn eval(&self, value: f32) -> [f32; 4] {
        // NaN compares false on both sides and ends up clamped to 0.
        let value = if value > 0.0 { value.min(1.0) } else { 0.0 };

        let last = self.samples.len() - 1;
        let position = value * last as f32;
        let index = (position.floor() as usize).min(last - 1);
        let t = position - index as f32;

        let lower = self.samples[index];
        let upper = self.samples[index + 1];
        [
            lower[0] + (upper[0] - lower[0]) * t,
            lower[1] + (upper[1] - lower[1]) * t,
            lower[2] + (upper[2] - lower[2]) * t,
            lower[3] + (upper[3] - lower[3]) * t,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::{F32Margin, approx_eq};

    fn grayscale() -> Colormap {
        Colormap::from_samples(
            "gray",
            vec![[0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0, 1.0]],
        )
        .unwrap()
    }

    #[test]
    fn endpoints() {
        let map = grayscale();
        assert_eq!(map.eval(0.0), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(map.eval(1.0), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn midpoint_interpolates() {
        let map = grayscale();
        let color = map.eval(0.5);
        for channel in &color[..3] {
            assert!(approx_eq!(f32, *channel, 0.5, F32Margin::default()));
        }
    }

    #[test]
    fn out_of_range_is_edge_clamped() {
        let map = grayscale();
        assert_eq!(map.eval(-3.0), map.eval(0.0));
        assert_eq!(map.eval(42.0), map.eval(1.0));
        assert_eq!(map.eval(f32::NAN), map.eval(0.0));
    }

    #[test]
    fn multi_segment_interpolation() {
        let map = Colormap::from_samples(
            "rgb",
            vec![
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
            ],
        )
        .unwrap();
        // 0.5 lands exactly on the middle sample.
        assert_eq!(map.eval(0.5), [0.0, 1.0, 0.0, 1.0]);
        // 0.25 is halfway between the first two samples.
        let color = map.eval(0.25);
        assert!(approx_eq!(f32, color[0], 0.5, F32Margin::default()));
        assert!(approx_eq!(f32, color[1], 0.5, F32Margin::default()));
        assert!(approx_eq!(f32, color[2], 0.0, F32Margin::default()));
    }

    #[test]
    fn rejects_degenerate_tables() {
        assert!(Colormap::from_samples("empty", vec![]).is_err());
        assert!(Colormap::from_samples("single", vec![[0.0, 0.0, 0.0, 1.0]]).is_err());
        assert!(
            Colormap::from_samples("oob", vec![[0.0, 0.0, 0.0, 1.0], [2.0, 0.0, 0.0, 1.0]])
                .is_err()
        );
    }

    #[test]
    fn built_in_covers_full_range() {
        let map = Colormap::built_in();
        assert_eq!(map.name(), "ironbow");
        let cold = map.eval(0.0);
        let hot = map.eval(1.0);
        // Cold end is black, hot end is bright.
        assert!(cold[..3].iter().all(|c| *c < 0.05));
        assert!(hot[..3].iter().all(|c| *c > 0.7));
    }

    #[test]
    fn round_trips_through_json() {
        let map = grayscale();
        let json = serde_json::to_string(&map).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.json");
        std::fs::write(&path, json).unwrap();

        let loaded = Colormap::from_path(&path).unwrap();
        assert_eq!(loaded.eval(0.25), map.eval(0.25));
    }

    #[test]
    fn missing_file_is_not_found() {
        let result = Colormap::from_path(Path::new("no/such/colormap.json"));
        assert!(matches!(result, Err(CoreError::ColormapNotFound(_))));
    }
}

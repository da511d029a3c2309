//! Hardware status indication during a conversion run.
//!
//! Converter boxes in the field have no display; the only feedback channel
//! is an LED. The indicator is a pluggable capability with a no-op default,
//! and indicator failures are logged but never propagated: a missing LED
//! control surface must not abort a conversion run.

use std::path::{Path, PathBuf};

/// Side-channel signalling the state of a conversion run.
pub trait StatusIndicator {
    /// Called once when the batch starts converting.
    fn converting(&self);

    /// Called once when the batch has finished.
    fn done(&self);
}

impl StatusIndicator for Box<dyn StatusIndicator> {
    fn converting(&self) {
        (**self).converting();
    }

    fn done(&self) {
        (**self).done();
    }
}

/// Default indicator that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullIndicator;

impl StatusIndicator for NullIndicator {
    fn converting(&self) {}
    fn done(&self) {}
}

/// Indicator driving a Linux LED through its sysfs trigger file: blinking
/// while converting, solid when done.
#[derive(Debug, Clone)]
pub struct LedIndicator {
    trigger_path: PathBuf,
}

impl LedIndicator {
    /// The green activity LED on a Raspberry Pi.
    pub fn green_led() -> Self {
        Self::with_trigger_path(Path::new("/sys/class/leds/led0/trigger"))
    }

    pub fn with_trigger_path(trigger_path: &Path) -> Self {
        Self {
            trigger_path: trigger_path.to_path_buf(),
        }
    }

    fn set_trigger(&self, trigger: &str) {
        if let Err(e) = std::fs::write(&self.trigger_path, trigger) {
            // No-op on hardware without this LED; the run continues.
            log::warn!(
                "Failed to set LED trigger '{}' via {}: {}",
                trigger,
                self.trigger_path.display(),
                e
            );
        }
    }
}

impl StatusIndicator for LedIndicator {
    fn converting(&self) {
        self.set_trigger("timer");
    }

    fn done(&self) {
        self.set_trigger("default-on");
    }
}

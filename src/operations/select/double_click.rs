use std::time::{Duration, Instant};

use crate::math::Point3;

/// Recognises two clicks close together in time and space.
#[derive(Debug, Clone)]
pub struct DoubleClickDetector {
    interval: Duration,
    spacing: f64,
    last: Option<(Instant, Point3)>,
}

impl DoubleClickDetector {
    /// Creates a detector accepting clicks at most `interval` apart in time
    /// and strictly less than `spacing` apart in space.
    #[must_use]
    pub fn new(interval: Duration, spacing: f64) -> Self {
        Self {
            interval,
            spacing,
            last: None,
        }
    }

    /// Updates the spatial tolerance, e.g. after a new mesh was loaded.
    pub fn set_spacing(&mut self, spacing: f64) {
        self.spacing = spacing;
    }

    /// Registers a click and reports whether it completes a double-click.
    ///
    /// A detected double-click resets the tracked click, so a third rapid
    /// click starts a new sequence instead of pairing with the second.
    pub fn detect(&mut self, point: Point3, now: Instant) -> bool {
        if let Some((at, last_point)) = self.last {
            let elapsed = now.saturating_duration_since(at);
            let distance = (point - last_point).norm();
            if elapsed <= self.interval && distance < self.spacing {
                tracing::debug!(
                    "Double-click detected: distance={:.6}, spacing={:.6}",
                    distance,
                    self.spacing
                );
                self.last = None;
                return true;
            }
        }
        self.last = Some((now, point));
        false
    }

    /// Forgets the tracked click.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

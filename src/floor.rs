//! # Barometric Floor Tracking
//!
//! Turns a stream of noisy pressure samples into discrete, confirmed
//! floor-change events. Pressure falls with altitude: a drop against the
//! latched reference means the user went up.
//!
//! A change is committed only when three signals agree — the magnitude of
//! the reference delta, the noise-stability of the recent sample window
//! (the user is not mid-flight on stairs), and a minimum dwell time. The
//! express override skips the dwell when the routing target is several
//! floors away, so elevator rides confirm one floor per reference latch
//! instead of one per three seconds.
//!
//! The tracker is inert without input: no barometer means no samples means
//! no events, and the floor then comes solely from [`FloorTracker::override_floor`].
//! Samples carry their own monotonic timestamps, so no ambient clock is
//! ever read and tests are fully deterministic.

use tracing::{debug, info};

/// Samples retained for the stability scan.
const WINDOW: usize = 10;

// ============================================================================
// Configuration
// ============================================================================

/// Detector tuning. Defaults are the field-calibrated values.
#[derive(Debug, Clone, Copy)]
pub struct FloorConfig {
    /// Reference-to-sample delta that marks one floor's worth of pressure
    /// change (hPa).
    pub change_threshold_hpa: f32,
    /// Maximum adjacent-sample delta for the window to count as stable (hPa).
    pub noise_threshold_hpa: f32,
    /// Minimum time a trend must persist before it is committed (ms).
    pub min_dwell_ms: u64,
    /// Floor gap to the routing target beyond which confirmation skips the
    /// dwell and stability checks.
    pub express_gap_floors: i32,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            change_threshold_hpa: 0.34,
            noise_threshold_hpa: 0.04,
            min_dwell_ms: 3000,
            express_gap_floors: 1,
        }
    }
}

// ============================================================================
// Samples and events
// ============================================================================

/// A single barometer reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureSample {
    /// Monotonic timestamp in milliseconds.
    pub timestamp_ms: u64,
    pub pressure_hpa: f32,
}

impl PressureSample {
    pub fn new(timestamp_ms: u64, pressure_hpa: f32) -> Self {
        Self {
            timestamp_ms,
            pressure_hpa,
        }
    }
}

/// Direction of a confirmed floor change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorDirection {
    Up,
    Down,
}

impl FloorDirection {
    pub fn delta(self) -> i32 {
        match self {
            FloorDirection::Up => 1,
            FloorDirection::Down => -1,
        }
    }
}

/// A confirmed floor change. Always exactly one floor; a multi-floor ride
/// produces one event per confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorChange {
    /// The floor the user is now on.
    pub floor: i32,
    pub direction: FloorDirection,
    pub timestamp_ms: u64,
}

// ============================================================================
// Sample window
// ============================================================================

/// Fixed-capacity ring of recent pressures, oldest overwritten.
#[derive(Debug, Clone)]
struct SampleWindow {
    samples: [f32; WINDOW],
    head: usize,
    len: usize,
}

impl SampleWindow {
    fn new() -> Self {
        Self {
            samples: [0.0; WINDOW],
            head: 0,
            len: 0,
        }
    }

    fn push(&mut self, pressure: f32) {
        self.samples[self.head] = pressure;
        self.head = (self.head + 1) % WINDOW;
        self.len = (self.len + 1).min(WINDOW);
    }

    /// Stable when the window is full and no chronologically adjacent pair
    /// differs by more than `noise_threshold`. A part-filled window is
    /// never stable — ten near-equal samples are the evidence that the
    /// user has settled.
    fn is_stable(&self, noise_threshold: f32) -> bool {
        if self.len < WINDOW {
            return false;
        }
        let mut prev = self.samples[self.head];
        for i in 1..WINDOW {
            let cur = self.samples[(self.head + i) % WINDOW];
            if (cur - prev).abs() > noise_threshold {
                return false;
            }
            prev = cur;
        }
        true
    }
}

// ============================================================================
// FloorTracker
// ============================================================================

/// Per-stream floor-transition state machine.
///
/// Two states: *settling* (a floor was just established, the next sample
/// latches a fresh reference) and *stable* (deltas are measured against the
/// latched reference until one is confirmed as a floor change).
pub struct FloorTracker {
    config: FloorConfig,
    window: SampleWindow,
    floor: i32,
    reference_hpa: f32,
    settling: bool,
    dwell_start_ms: u64,
    target_floor: Option<i32>,
}

impl FloorTracker {
    pub fn new(initial_floor: i32) -> Self {
        Self::with_config(initial_floor, FloorConfig::default())
    }

    pub fn with_config(initial_floor: i32, config: FloorConfig) -> Self {
        Self {
            config,
            window: SampleWindow::new(),
            floor: initial_floor,
            reference_hpa: 0.0,
            settling: true,
            dwell_start_ms: 0,
            target_floor: None,
        }
    }

    /// The floor the tracker currently believes the user is on.
    pub fn floor(&self) -> i32 {
        self.floor
    }

    /// Floor of the active routing target, if any. Enables the express
    /// override for multi-floor rides; `None` disables it.
    pub fn set_target_floor(&mut self, floor: Option<i32>) {
        self.target_floor = floor;
    }

    /// Manual floor override (user self-report, or a device without a
    /// barometer). Forces a fresh reference latch so a stale reference can
    /// never leak across the correction.
    pub fn override_floor(&mut self, floor: i32) {
        info!(floor, "manual floor override");
        self.floor = floor;
        self.settling = true;
    }

    /// Feed one pressure sample; returns the confirmed floor change, if
    /// this sample completed one.
    pub fn process_sample(&mut self, sample: PressureSample) -> Option<FloorChange> {
        self.window.push(sample.pressure_hpa);

        if self.settling {
            self.reference_hpa = sample.pressure_hpa;
            self.dwell_start_ms = sample.timestamp_ms;
            self.settling = false;
            debug!(reference = self.reference_hpa, "latched reference pressure");
        }

        // Positive delta = pressure dropped = altitude gained.
        let delta_p = self.reference_hpa - sample.pressure_hpa;
        let pending = if delta_p > self.config.change_threshold_hpa {
            Some(FloorDirection::Up)
        } else if delta_p < -self.config.change_threshold_hpa {
            Some(FloorDirection::Down)
        } else {
            // Inside the threshold band there is no trend to confirm; a
            // spike that reverted must not leave a direction armed.
            None
        };
        let direction = pending?;

        let stable = self.window.is_stable(self.config.noise_threshold_hpa);
        let dwell_elapsed =
            sample.timestamp_ms.saturating_sub(self.dwell_start_ms) >= self.config.min_dwell_ms;
        let express = self
            .target_floor
            .is_some_and(|t| (t - self.floor).abs() > self.config.express_gap_floors);

        if (stable && dwell_elapsed) || express {
            self.floor += direction.delta();
            self.settling = true;
            info!(floor = self.floor, ?direction, express, "floor change confirmed");
            return Some(FloorChange {
                floor: self.floor,
                direction,
                timestamp_ms: sample.timestamp_ms,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_not_stable_until_full() {
        let mut w = SampleWindow::new();
        for _ in 0..WINDOW - 1 {
            w.push(1013.0);
        }
        assert!(!w.is_stable(0.04));
        w.push(1013.0);
        assert!(w.is_stable(0.04));
    }

    #[test]
    fn window_detects_noise_across_wrap() {
        let mut w = SampleWindow::new();
        for _ in 0..WINDOW {
            w.push(1013.0);
        }
        // Overwrites the oldest slot; the jump sits mid-window after wrap.
        w.push(1013.5);
        assert!(!w.is_stable(0.04));
        for _ in 0..WINDOW {
            w.push(1013.5);
        }
        assert!(w.is_stable(0.04));
    }

    #[test]
    fn first_sample_latches_reference() {
        let mut t = FloorTracker::new(0);
        assert_eq!(t.process_sample(PressureSample::new(0, 1013.0)), None);
        assert_eq!(t.reference_hpa, 1013.0);
        assert!(!t.settling);
    }

    #[test]
    fn override_forces_relatch() {
        let mut t = FloorTracker::new(0);
        t.process_sample(PressureSample::new(0, 1013.0));
        t.override_floor(4);
        assert_eq!(t.floor(), 4);
        // Next sample must latch anew, not diff against the stale reference.
        assert_eq!(t.process_sample(PressureSample::new(200, 1012.0)), None);
        assert_eq!(t.reference_hpa, 1012.0);
    }
}

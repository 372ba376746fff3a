//! End-to-end floor-tracker scenarios, fed at a realistic ~2.5 Hz sensor
//! cadence (400 ms between samples).

use pretty_assertions::assert_eq;
use wayfinder::{FloorChange, FloorDirection, FloorTracker, PressureSample};

fn feed(tracker: &mut FloorTracker, samples: &[(u64, f32)]) -> Vec<FloorChange> {
    samples
        .iter()
        .filter_map(|&(t, p)| tracker.process_sample(PressureSample::new(t, p)))
        .collect()
}

/// `count` samples of constant pressure starting at `t0`, 400 ms apart.
fn steady(t0: u64, pressure: f32, count: usize) -> Vec<(u64, f32)> {
    (0..count as u64)
        .map(|i| (t0 + i * 400, pressure))
        .collect()
}

// ============================================================================
// 1. A sustained pressure drop, held stable past the dwell, is one floor up
// ============================================================================

#[test]
fn test_sustained_drop_confirms_single_floor_up() {
    let mut tracker = FloorTracker::new(0);

    let mut samples = steady(0, 1013.0, 10);
    samples.extend(steady(4000, 1012.5, 20));
    let events = feed(&mut tracker, &samples);

    // Pressure fell: altitude gained. One confirmation, exactly +1.
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].direction, FloorDirection::Up);
    assert_eq!(events[0].floor, 1);
    assert_eq!(tracker.floor(), 1);
    // Confirmation waited for a full stable window and the 3 s dwell.
    assert!(events[0].timestamp_ms >= 3000);
}

#[test]
fn test_sustained_rise_confirms_single_floor_down() {
    let mut tracker = FloorTracker::new(2);

    let mut samples = steady(0, 1013.0, 10);
    samples.extend(steady(4000, 1013.5, 20));
    let events = feed(&mut tracker, &samples);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].direction, FloorDirection::Down);
    assert_eq!(events[0].floor, 1);
}

// ============================================================================
// 2. A transient spike that reverts before the dwell emits nothing
// ============================================================================

#[test]
fn test_noise_spike_is_rejected() {
    let mut tracker = FloorTracker::new(0);

    let mut samples = steady(0, 1013.0, 5); // t = 0..1600
    samples.push((2000, 1012.4)); // spike, |ΔP| = 0.6
    samples.push((2400, 1012.4));
    samples.extend(steady(2800, 1013.0, 25)); // reverted within 1 s

    let events = feed(&mut tracker, &samples);
    assert_eq!(events, vec![]);
    assert_eq!(tracker.floor(), 0);
}

// ============================================================================
// 3. One delta per confirmation: a fresh latch is required before the next
// ============================================================================

#[test]
fn test_single_step_per_confirmation() {
    let mut tracker = FloorTracker::new(0);

    let mut samples = steady(0, 1013.0, 10);
    // Held low for a long time — far beyond a second dwell period.
    samples.extend(steady(4000, 1012.5, 50));
    let events = feed(&mut tracker, &samples);

    assert_eq!(events.len(), 1);
    assert_eq!(tracker.floor(), 1);
}

// ============================================================================
// 4. Elevator ride: express override confirms without the dwell until the
//    target is adjacent, then the last floor needs the usual evidence
// ============================================================================

#[test]
fn test_express_override_for_multi_floor_ride() {
    let mut tracker = FloorTracker::new(0);
    tracker.set_target_floor(Some(3));

    let ramp: Vec<(u64, f32)> = vec![
        (0, 1013.00), // latches the reference
        (200, 1012.88),
        (400, 1012.76),
        (600, 1012.64), // ΔP = 0.36 → express confirm, floor 1
        (800, 1012.52), // fresh latch
        (1000, 1012.40),
        (1200, 1012.28),
        (1400, 1012.16), // express confirm, floor 2
        (1600, 1012.04), // fresh latch; |target − floor| = 1, express off
        (1800, 1011.92),
        (2000, 1011.80),
        (2200, 1011.68), // ΔP = 0.36, but now dwell + stability apply
    ];
    let mut samples = ramp;
    samples.extend(steady(2400, 1011.68, 20)); // cab stops, pressure settles

    let events = feed(&mut tracker, &samples);

    assert_eq!(events.len(), 3);
    assert_eq!(
        events.iter().map(|e| e.floor).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    // The first two confirmations beat the 3 s dwell; the last one cannot.
    assert!(events[0].timestamp_ms < 3000);
    assert!(events[1].timestamp_ms < 3000);
    assert!(events[2].timestamp_ms >= 1600 + 3000);
    assert_eq!(tracker.floor(), 3);
}

#[test]
fn test_no_express_without_target() {
    let mut tracker = FloorTracker::new(0);

    // Same ramp as the elevator test, but nobody set a routing target:
    // nothing may confirm while the pressure is still moving.
    let events = feed(
        &mut tracker,
        &[
            (0, 1013.00),
            (200, 1012.88),
            (400, 1012.76),
            (600, 1012.64),
            (800, 1012.52),
        ],
    );
    assert_eq!(events, vec![]);
    assert_eq!(tracker.floor(), 0);
}

// ============================================================================
// 5. Manual override re-latches; stale references never leak across it
// ============================================================================

#[test]
fn test_manual_override_forces_fresh_reference() {
    let mut tracker = FloorTracker::new(0);
    feed(&mut tracker, &steady(0, 1013.0, 10));

    tracker.override_floor(5);
    assert_eq!(tracker.floor(), 5);

    // The first post-override sample differs from the old reference by far
    // more than the change threshold, but it only latches — no event.
    let events = feed(&mut tracker, &steady(4000, 1011.0, 15));
    assert_eq!(events, vec![]);
    assert_eq!(tracker.floor(), 5);
}

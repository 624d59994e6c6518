use super::*;

#[test]
fn progress_runs_from_40_and_caps_at_99() {
    let d = Duration::from_secs(5);
    assert_eq!(capture_progress(Duration::ZERO, d), 40);
    assert_eq!(capture_progress(Duration::from_millis(2500), d), 70);
    assert_eq!(capture_progress(Duration::from_secs(5), d), 99);
    assert_eq!(capture_progress(Duration::from_secs(9), d), 99);
    assert_eq!(capture_progress(Duration::ZERO, Duration::ZERO), 99);
}

#[test]
fn progress_floors() {
    // 40 + 0.999 * 60 / 5 = 40.01...
    assert_eq!(
        capture_progress(Duration::from_millis(83), Duration::from_secs(5)),
        40
    );
}

#[test]
fn five_seconds_at_30fps_is_150_frames() {
    let mut clock = CaptureClock::new(30, Duration::from_secs(5));
    assert_eq!(clock.total_frames(), 150);
    let mut last = 0;
    while !clock.is_finished() {
        let p = clock.tick();
        assert!(p >= last);
        last = p;
    }
    assert_eq!(clock.frames(), 150);
    assert_eq!(last, 99);
    assert!((clock.elapsed().as_secs_f64() - 5.0).abs() < 1e-9);
}

#[test]
fn partial_frame_durations_round_up() {
    let clock = CaptureClock::new(30, Duration::from_millis(1010));
    assert_eq!(clock.total_frames(), 31);
    assert_eq!(clock.frame_interval(), Duration::from_nanos(33_333_333));
}

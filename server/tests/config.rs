//! Pacing of resolution playback.

use arena_duel_server::config::RoomSettings;
use tokio::time::Duration;

fn paced(resolution_pace: u64) -> RoomSettings {
    RoomSettings {
        resolution_pace,
        ..RoomSettings::default()
    }
}

#[test]
fn pace_scales_delays_by_percentage() {
    assert_eq!(paced(100).pace(300), Duration::from_millis(300));
    assert_eq!(paced(50).pace(300), Duration::from_millis(150));
    assert!(paced(0).pace(800).is_zero());
}

#[test]
fn huge_pace_saturates_instead_of_overflowing() {
    assert_eq!(paced(u64::MAX).pace(800), Duration::from_millis(u64::MAX / 100));
}

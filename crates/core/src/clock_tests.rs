// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_is_past_2020() {
    assert!(SystemClock.epoch_ms() > 1_577_836_800_000);
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.epoch_ms();
    clock.advance(Duration::from_secs(60));
    assert_eq!(clock.epoch_ms() - t1, 60_000);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    clock2.advance(Duration::from_secs(30));
    assert_eq!(clock1.epoch_ms(), clock2.epoch_ms());
}

#[test]
fn tick_after_follows_wall_time() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(5_000);
    assert_eq!(clock.tick_after(0), 5_000);
}

#[test]
fn tick_after_never_repeats() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(5_000);
    let first = clock.tick_after(0);
    let second = clock.tick_after(first);
    let third = clock.tick_after(second);
    assert!(second > first);
    assert!(third > second);
}

#[test]
fn tick_after_ignores_clock_going_backwards() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(100);
    assert_eq!(clock.tick_after(9_000), 9_001);
}

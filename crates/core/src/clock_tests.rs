// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{Clock, FakeClock};
use std::time::Duration;

#[test]
fn fake_clock_advances_both_instant_and_epoch() {
    let clock = FakeClock::new();
    let start = clock.now();
    let start_epoch = clock.epoch_ms();

    clock.advance(Duration::from_secs(30));

    assert_eq!(clock.now(), start + Duration::from_secs(30));
    assert_eq!(clock.epoch_ms(), start_epoch + 30_000);
}

#[test]
fn fake_clock_is_cheaply_cloned_and_shares_state() {
    let clock = FakeClock::new();
    let handle = clock.clone();

    clock.advance(Duration::from_secs(5));

    assert_eq!(clock.now(), handle.now());
}

//! Live code display loop.
//!
//! Recomputes the code once per interval until the stop flag is set.
//! The clock and the sleep are injected so the loop can be driven
//! deterministically in tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::generator::{generate, TotpCode};
use crate::errors::Result;

/// One recomputation of the live code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub code: TotpCode,
    /// `true` when the code differs from the previous tick (always `true`
    /// on the first tick).
    pub changed: bool,
}

/// Drives [`watch`]: where time comes from and how to wait.
pub trait Clock {
    fn now(&mut self) -> u64;
    fn sleep(&mut self, interval: Duration);
}

/// The real wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> u64 {
        super::generator::unix_now()
    }

    fn sleep(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// Run the live loop for `secret` until `stop` is set.
///
/// `on_tick` is called after every recomputation; an error from it (or
/// from code generation) ends the loop.  Returns the number of ticks.
pub fn watch<C, F>(
    secret: &str,
    stop: &AtomicBool,
    interval: Duration,
    clock: &mut C,
    mut on_tick: F,
) -> Result<u64>
where
    C: Clock,
    F: FnMut(Tick) -> Result<()>,
{
    let mut last: Option<u32> = None;
    let mut ticks = 0u64;

    while !stop.load(Ordering::Relaxed) {
        let code = generate(secret, clock.now())?;
        let changed = last != Some(code.code);
        last = Some(code.code);

        on_tick(Tick { code, changed })?;
        ticks += 1;

        if stop.load(Ordering::Relaxed) {
            break;
        }
        clock.sleep(interval);
    }

    Ok(ticks)
}

//! Ctrl-C handling.
//!
//! The handler only raises a flag. The running git child receives the same
//! signal and exits on its own; whoever observes the flag next turns it
//! into [`Error::Interrupted`].

use crate::error::{Error, Result};
use anyhow::Context;
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Installs the process-wide handler. Call once, from `main`.
pub fn install() -> anyhow::Result<()> {
    ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::SeqCst))
        .context("Failed to install interrupt handler")
}

#[must_use]
pub fn requested() -> bool {
    INTERRUPTED.load(Ordering::SeqCst) || simulated()
}

#[cfg(not(test))]
fn simulated() -> bool {
    false
}

// Per-thread so a simulated Ctrl-C cannot leak into tests running alongside.
#[cfg(test)]
thread_local! {
    static SIMULATED: std::cell::Cell<bool> = const { std::cell::Cell::new(false) };
}

#[cfg(test)]
fn simulated() -> bool {
    SIMULATED.with(std::cell::Cell::get)
}

/// Raises (or clears) the interrupt flag for the calling test thread only.
#[cfg(test)]
pub(crate) fn simulate(raised: bool) {
    SIMULATED.with(|flag| flag.set(raised));
}

pub fn check() -> Result<()> {
    if requested() {
        Err(Error::Interrupted)
    } else {
        Ok(())
    }
}

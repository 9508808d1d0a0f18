// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Cooperative cancellation of a running search.
//!
//! The driver polls the token at every time check. A signal listener thread
//! turns SIGINT, SIGTERM and SIGHUP into a cancellation request; the driver
//! then stops and publishes one final report.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
#[cfg(not(windows))]
use std::thread;

use tracing::info;
#[cfg(windows)]
use tracing::warn;

use crate::error::{FreqSetError, FreqSetResult};

/// Shared stop flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A running signal listener; dropping it leaves the thread running.
#[derive(Debug)]
pub struct SignalListener {
    #[cfg(not(windows))]
    handle: signal_hook::iterator::Handle,
    #[cfg(not(windows))]
    thread: Option<thread::JoinHandle<()>>,
}

impl SignalListener {
    /// Stop listening and join the listener thread.
    pub fn stop(mut self) {
        #[cfg(not(windows))]
        {
            self.handle.close();
            if let Some(thread) = self.thread.take() {
                let _ = thread.join();
            }
        }
        #[cfg(windows)]
        let _ = &mut self;
    }
}

/// Cancel `token` when the process receives an interrupt or termination signal.
#[cfg(not(windows))]
pub fn install_signal_handler(token: &CancellationToken) -> FreqSetResult<SignalListener> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP]).map_err(FreqSetError::Signal)?;
    let handle = signals.handle();
    let token = token.clone();
    let thread = thread::Builder::new()
        .name("freqsetgen-signal-listener".to_owned())
        .spawn(move || {
            for signal in signals.forever() {
                info!(signal, "termination signal received");
                token.cancel();
            }
        })
        .map_err(FreqSetError::Signal)?;
    Ok(SignalListener {
        handle,
        thread: Some(thread),
    })
}

#[cfg(windows)]
pub fn install_signal_handler(_token: &CancellationToken) -> FreqSetResult<SignalListener> {
    warn!("signal listener is not supported on windows; cancellation only via the token");
    Ok(SignalListener {})
}

//! Global input hook lifecycle
//!
//! The OS hooks live on a dedicated thread that does nothing but pump its
//! message queue. Hook callbacks run on that thread, one event at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Weak};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{error, info};

use crate::platform::{self, HookThreadId};

use super::interceptor::InputSink;

/// Owns the hook thread
pub struct HotkeyListener {
    running: Arc<AtomicBool>,
    worker: Mutex<Option<Worker>>,
}

struct Worker {
    thread_id: HookThreadId,
    handle: JoinHandle<()>,
}

impl HotkeyListener {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    /// Install the global hooks, routing every event to `sink`.
    ///
    /// Blocks until the hook thread reports whether installation worked.
    /// The hooks hold only a weak reference; once the sink is dropped
    /// every event passes through untouched.
    pub fn start(&self, sink: Weak<dyn InputSink>) -> Result<(), HotkeyError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(HotkeyError::AlreadyRunning);
        }

        let (ready_tx, ready_rx) = mpsc::channel();
        let running = Arc::clone(&self.running);

        let spawned = thread::Builder::new()
            .name("input-hook".to_string())
            .spawn(move || {
                info!("input hook thread started");

                if let Err(e) = platform::run_hooks(sink, ready_tx) {
                    error!(error = %e, "input hook error");
                }

                running.store(false, Ordering::SeqCst);
                info!("input hook thread stopped");
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(HotkeyError::ThreadSpawn(e.to_string()));
            }
        };

        let startup = ready_rx.recv().unwrap_or_else(|_| {
            Err(HotkeyError::HookInstall(
                "hook thread exited during startup".to_string(),
            ))
        });

        match startup {
            Ok(thread_id) => {
                *self.worker.lock() = Some(Worker { thread_id, handle });
                Ok(())
            }
            Err(e) => {
                let _ = handle.join();
                self.running.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Remove the hooks and wait for the hook thread to exit
    pub fn stop(&self) {
        let Some(worker) = self.worker.lock().take() else {
            return;
        };

        platform::stop_hooks(worker.thread_id);
        if worker.handle.join().is_err() {
            error!("input hook thread panicked");
        }
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the hooks are currently installed
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for HotkeyListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Errors that can occur while installing or running the hooks
#[derive(Debug, Clone, thiserror::Error)]
pub enum HotkeyError {
    #[error("input hooks are already installed")]
    AlreadyRunning,

    #[error("failed to install input hooks: {0}")]
    HookInstall(String),

    #[error("global input hooks are not supported on this platform")]
    Unsupported,

    #[error("failed to spawn hook thread: {0}")]
    ThreadSpawn(String),
}

//! Session runner and manager
//!
//! This module drives controller sessions over time: the poll loop with its
//! inter-poll delays, cooperative cancellation, and running one session per
//! controller in parallel.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, SendError};
use futures::future::join_all;
use log::{error, info, warn};
use thiserror::Error;
use tokio::runtime::Builder;
use tokio_util::sync::CancellationToken;

use crate::session::{render_state, ControllerSession, SessionError};
use crate::transport::ReadSource;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Manager is already running")]
    AlreadyRunning,

    #[error("No sessions to run")]
    NoSessions,

    #[error("Failed to start session thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Poll `session` until `token` is cancelled or the transport fails.
///
/// Cancellation is checked before every poll; a dispatch already under way
/// always completes. Malformed reports are logged and skipped. The session,
/// and with it the read source, is dropped when the loop ends.
pub async fn run_session<S: ReadSource>(
    mut session: ControllerSession<S>,
    token: CancellationToken,
) -> Result<(), SessionError> {
    let settings = session.settings().clone();
    let name = session.name().to_string();
    info!("{}: session started", name);

    let result = loop {
        if token.is_cancelled() {
            break Ok(());
        }

        let pause = match session.poll() {
            Ok(Some(state)) => {
                if let Some(format) = settings.reporting {
                    match render_state(&state, format) {
                        Ok(line) => info!("{}: {}", name, line),
                        Err(e) => warn!("{}: failed to render state: {}", name, e),
                    }
                }
                settings.poll_delay
            }
            Ok(None) => Some(settings.idle_interval),
            Err(e) if e.is_recoverable() => {
                warn!("{}: skipping report: {}", name, e);
                None
            }
            Err(e) => break Err(e),
        };

        match pause {
            Some(delay) if !delay.is_zero() => {
                let cancelled = tokio::select! {
                    _ = token.cancelled() => true,
                    _ = tokio::time::sleep(delay) => false,
                };
                if cancelled {
                    break Ok(());
                }
            }
            _ => tokio::task::yield_now().await,
        }
    };

    match &result {
        Ok(()) => info!("{}: session stopped", name),
        Err(e) => error!("{}: session ended: {}", name, e),
    }
    result
}

/// Run several sessions concurrently on the current runtime.
///
/// Sessions are independent: one failing doesn't stop the others. Results
/// come back in input order.
pub async fn run_all<S: ReadSource>(
    sessions: Vec<ControllerSession<S>>,
    token: CancellationToken,
) -> Vec<Result<(), SessionError>> {
    join_all(
        sessions
            .into_iter()
            .map(|session| run_session(session, token.clone())),
    )
    .await
}

type PendingSession = ControllerSession<Box<dyn ReadSource>>;

/// Runs each controller session on its own thread
pub struct SessionManager {
    pending: Vec<PendingSession>,
    handles: Vec<JoinHandle<Result<(), SessionError>>>,
    token: CancellationToken,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            handles: Vec::new(),
            token: CancellationToken::new(),
        }
    }

    /// Queue a session to be started by [`start`](Self::start)
    pub fn add_session<S: ReadSource + 'static>(&mut self, session: ControllerSession<S>) {
        info!("Added session: {}", session.name());
        self.pending.push(session.boxed());
    }

    /// Start every queued session on a thread named `controller-<n>`
    pub fn start(&mut self) -> Result<(), ManagerError> {
        if self.is_running() {
            return Err(ManagerError::AlreadyRunning);
        }
        if self.pending.is_empty() {
            return Err(ManagerError::NoSessions);
        }

        self.token = CancellationToken::new();
        info!("Starting {} controller session(s)...", self.pending.len());

        let mut queue = std::mem::take(&mut self.pending).into_iter();
        while let Some(session) = queue.next() {
            if let Err((e, session)) = self.spawn_session(session) {
                // Unstarted sessions stay queued with their sources and observers
                self.pending.push(session);
                self.pending.extend(queue);
                error!("Failed to start session: {} ({} still queued)", e, self.pending.len());
                return Err(e);
            }
        }

        info!("✓ Manager started");
        Ok(())
    }

    /// Spawn `controller-<n>` for one session, handing the session back on failure
    fn spawn_session(&mut self, session: PendingSession) -> Result<(), (ManagerError, PendingSession)> {
        let runtime = match Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(e) => return Err((e.into(), session)),
        };
        let token = self.token.clone();

        // The session only moves once the thread exists
        let (handoff, inbox) = bounded::<PendingSession>(1);
        let spawned = thread::Builder::new()
            .name(format!("controller-{}", self.handles.len()))
            .spawn(move || match inbox.recv() {
                Ok(session) => runtime.block_on(run_session(session, token)),
                Err(_) => Ok(()),
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => return Err((e.into(), session)),
        };

        if let Err(SendError(session)) = handoff.send(session) {
            let _ = handle.join();
            return Err((io::Error::new(io::ErrorKind::Other, "session thread exited before start").into(), session));
        }

        self.handles.push(handle);
        Ok(())
    }

    /// Sessions added but not yet started
    pub fn pending_sessions(&self) -> usize {
        self.pending.len()
    }

    /// Ask every session to stop before its next poll
    pub fn stop(&self) {
        info!("Stopping session manager...");
        self.token.cancel();
    }

    /// True while at least one session thread is still polling
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled() && self.handles.iter().any(|h| !h.is_finished())
    }

    /// Wait for all session threads and collect their results
    pub fn join(&mut self) -> Vec<Result<(), SessionError>> {
        self.handles
            .drain(..)
            .filter_map(|handle| {
                let name = handle.thread().name().unwrap_or("controller").to_string();
                match handle.join() {
                    Ok(result) => Some(result),
                    Err(_) => {
                        error!("{} thread panicked", name);
                        None
                    }
                }
            })
            .collect()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Stop and join every session so read sources are released deterministically
impl Drop for SessionManager {
    fn drop(&mut self) {
        if self.handles.is_empty() {
            return;
        }

        info!("Shutting down session manager (Drop trait)...");
        self.token.cancel();
        self.join();
        info!("✓ Session manager shutdown complete");
    }
}

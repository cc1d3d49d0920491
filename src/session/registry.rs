//! Session registry implementation
//!
//! Maps each calling thread to at most one live [`Session`]. `acquire` is the
//! only place a new remote connection is opened.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::capabilities::SessionConfig;
use super::handle::Session;
use super::scoped::ThreadScoped;
use crate::driver::{DriverFactory, HttpDriverFactory};
use crate::{Error, Result};

/// Thread to session registry
pub struct SessionRegistry {
    factory: Arc<dyn DriverFactory>,
    configs: ThreadScoped<SessionConfig>,
    sessions: ThreadScoped<Session>,
}

impl SessionRegistry {
    /// Create a registry opening connections through `factory`
    pub fn new(factory: Arc<dyn DriverFactory>) -> Self {
        Self {
            factory,
            configs: ThreadScoped::new(),
            sessions: ThreadScoped::new(),
        }
    }

    /// Create a registry backed by the HTTP driver
    pub fn http() -> Self {
        Self::new(Arc::new(HttpDriverFactory))
    }

    /// Set the platform and capabilities the calling thread's next session uses
    pub fn configure(&self, config: SessionConfig) -> Result<()> {
        if !config.platform.is_supported() {
            return Err(Error::configuration(format!(
                "Unsupported platform variant '{}'",
                config.platform
            )));
        }
        self.configs.set(config)?;
        Ok(())
    }

    /// Session of the calling thread, opened on first access
    #[instrument(skip(self))]
    pub fn acquire(&self) -> Result<Arc<Session>> {
        if let Some(existing) = self.sessions.get()? {
            if existing.is_active() {
                return Ok(existing);
            }
            warn!("Session {} was closed remotely, opening a new one", existing.id());
            self.sessions.remove()?;
        }

        let config = self.configs.get()?.ok_or_else(|| {
            Error::configuration("No session configuration for the current thread")
        })?;

        let session = self.sessions.get_or_try_insert_with(|| {
            let session = Session::open(&config, self.factory.as_ref())?;
            info!(
                "Opened {} session {} (remote {})",
                session.platform(),
                session.id(),
                session.remote_id()
            );
            Ok(session)
        })?;

        Ok(session)
    }

    /// Session of the calling thread, if one was acquired
    pub fn current(&self) -> Result<Arc<Session>> {
        self.sessions
            .get()?
            .ok_or_else(|| Error::internal("No session acquired on the current thread"))
    }

    /// Close and forget the calling thread's session
    ///
    /// Never fails; problems are logged.
    #[instrument(skip(self))]
    pub fn release(&self) {
        match self.sessions.remove() {
            Ok(Some(session)) => {
                if let Err(e) = session.close() {
                    warn!("Failed to close session {}: {}", session.id(), e);
                } else {
                    info!("Released session {}", session.id());
                }
            }
            Ok(None) => warn!("No session to release on the current thread"),
            Err(e) => warn!("Failed to release session: {}", e),
        }
    }

    /// Number of threads holding a session
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Close every session still registered
    pub fn shutdown(&self) {
        match self.sessions.drain() {
            Ok(sessions) => {
                for session in sessions {
                    if let Err(e) = session.close() {
                        warn!("Failed to close session {}: {}", session.id(), e);
                    }
                }
            }
            Err(e) => warn!("Failed to drain sessions: {}", e),
        }
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.session_count())
            .finish()
    }
}

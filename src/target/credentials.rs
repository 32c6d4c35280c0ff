// ABOUTME: The two fixed remote roles and the session slots discovery fills.
// ABOUTME: SessionManager swaps both slots together so a pair is never half-written.

use crate::ssh::{PromptResponder, SessionConfig};
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Remote account identity used for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Privileged `admin` account.
    Admin,
    /// Unprivileged `lvuser` account the robot program runs as.
    Service,
}

impl Role {
    pub fn username(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Service => "lvuser",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username())
    }
}

/// Credentials for one role, bound to the address discovery picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub role: Role,
    pub username: String,
    pub responder: PromptResponder,
    pub host: String,
    pub port: u16,
    pub connect_timeout: Duration,
}

impl Credentials {
    /// Empty-password credentials for `role` at `host`.
    pub fn new(role: Role, host: impl Into<String>, port: u16, connect_timeout: Duration) -> Self {
        Self {
            role,
            username: role.username().to_string(),
            responder: PromptResponder::new(""),
            host: host.into(),
            port,
            connect_timeout,
        }
    }

    pub fn session_config(&self, command_timeout: Duration) -> SessionConfig {
        SessionConfig {
            host: self.host.clone(),
            port: self.port,
            user: self.username.clone(),
            responder: self.responder.clone(),
            connect_timeout: self.connect_timeout,
            command_timeout,
        }
    }
}

#[derive(Debug, Clone)]
struct CredentialPair {
    admin: Arc<Credentials>,
    service: Arc<Credentials>,
}

/// Holder of the admin and service credential slots.
#[derive(Debug, Default)]
pub struct SessionManager {
    slots: RwLock<Option<CredentialPair>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: Role) -> Option<Arc<Credentials>> {
        self.slots.read().as_ref().map(|pair| match role {
            Role::Admin => Arc::clone(&pair.admin),
            Role::Service => Arc::clone(&pair.service),
        })
    }

    pub fn is_active(&self) -> bool {
        self.slots.read().is_some()
    }

    /// Bind both roles to `host`. Only discovery calls this.
    pub(crate) fn install(&self, host: &str, port: u16, connect_timeout: Duration) {
        let pair = CredentialPair {
            admin: Arc::new(Credentials::new(Role::Admin, host, port, connect_timeout)),
            service: Arc::new(Credentials::new(Role::Service, host, port, connect_timeout)),
        };
        *self.slots.write() = Some(pair);
    }

    /// Drop both slots.
    pub fn clear(&self) {
        *self.slots.write() = None;
    }
}

// ABOUTME: Diagnostics accumulator for non-fatal warnings during install cleanup.
// ABOUTME: Collects warnings that shouldn't change the verdict but should be shown to users.

/// Collects non-fatal warnings during cleanup.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during cleanup.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// A cleanup command that failed or could not be run.
    pub fn cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Cleanup,
            message: message.into(),
        }
    }

    /// The target dropped off before cleanup could connect.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Unreachable,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A cleanup command exited non-zero or errored; staging files may remain.
    Cleanup,
    /// No session could be opened for cleanup.
    Unreachable,
}

// ABOUTME: Process-wide busy flag that keeps install workflows from overlapping.
// ABOUTME: The guard clears the flag on drop, including after a panic unwinds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

static GLOBAL: LazyLock<Arc<DeployGate>> = LazyLock::new(|| Arc::new(DeployGate::new()));

/// Admits one install workflow at a time.
#[derive(Debug, Default)]
pub struct DeployGate {
    busy: AtomicBool,
}

impl DeployGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// The gate shared by every installer in this process.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Claim the gate, or `None` if a workflow already holds it.
    pub fn try_enter(self: &Arc<Self>) -> Option<GateGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard {
                gate: Arc::clone(self),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the life of a workflow, cleanup included.
#[derive(Debug)]
pub struct GateGuard {
    gate: Arc<DeployGate>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
        tracing::debug!("deploy gate released");
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag checked by the grind loop between batches.
///
/// Clones share the flag, so a signal handler can hold one copy while the
/// engine holds another. The token also records whether a grind is running,
/// so an interrupt that arrives while the caller is idle can exit instead
/// of waiting for a batch check that will never come.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    busy: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Clear a previous cancellation so the session can keep grinding
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Mark a grind as running until the guard drops
    pub(crate) fn busy_guard(&self) -> BusyGuard {
        self.busy.store(true, Ordering::SeqCst);
        BusyGuard {
            busy: Arc::clone(&self.busy),
        }
    }

    /// Handle an interrupt. Returns true when a running grind was asked to
    /// stop, false when nothing is grinding or a stop is already pending and
    /// the caller should exit now.
    pub fn interrupt(&self) -> bool {
        if self.is_busy() && !self.is_cancelled() {
            self.cancel();
            true
        } else {
            false
        }
    }
}

pub(crate) struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
        token.reset();
        assert!(!handle.is_cancelled());
    }

    #[test]
    fn test_busy_guard_scope() {
        let token = CancelToken::new();
        let handle = token.clone();
        {
            let _guard = token.busy_guard();
            assert!(handle.is_busy());
        }
        assert!(!handle.is_busy());
    }

    #[test]
    fn test_interrupt_while_idle_asks_for_exit() {
        let token = CancelToken::new();
        assert!(!token.interrupt());
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_second_interrupt_asks_for_exit() {
        let token = CancelToken::new();
        let _guard = token.busy_guard();
        assert!(token.interrupt());
        assert!(token.is_cancelled());
        assert!(!token.interrupt());
    }
}

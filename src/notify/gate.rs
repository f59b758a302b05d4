//! Anti-spam gate for room notifications.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether the bot was the last one to speak in the quotes room.
///
/// Starts open. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct NotificationGate {
    bot_was_last: Arc<AtomicBool>,
}

impl NotificationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a suppressible notification may go out now.
    pub fn should_send(&self) -> bool {
        !self.bot_was_last.load(Ordering::Acquire)
    }

    /// The bot just posted in the room.
    pub fn mark_sent(&self) {
        self.bot_was_last.store(true, Ordering::Release);
    }

    /// Someone else posted in the room.
    pub fn mark_others_spoke(&self) {
        self.bot_was_last.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_starts_open() {
        assert!(NotificationGate::new().should_send());
    }

    #[test]
    fn test_gate_closes_after_send_and_reopens() {
        let gate = NotificationGate::new();

        gate.mark_sent();
        assert!(!gate.should_send());

        gate.mark_others_spoke();
        assert!(gate.should_send());
    }

    #[test]
    fn test_clones_share_state() {
        let gate = NotificationGate::new();
        let other = gate.clone();

        other.mark_sent();

        assert!(!gate.should_send());
    }
}

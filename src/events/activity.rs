//! Room activity tracking.
//!
//! Runs for every incoming message before command handling.

use teloxide::prelude::*;
use teloxide::types::{MessageId, UserId};

use crate::bot::dispatcher::AppState;

/// Record a message and update the anti-spam gate.
pub fn track_activity(msg: Message, state: AppState) {
    observe(
        &state,
        msg.chat.id,
        msg.id,
        msg.from.as_ref().map(|u| u.id),
        msg.text(),
    );
}

fn observe(
    state: &AppState,
    chat_id: ChatId,
    message_id: MessageId,
    sender: Option<UserId>,
    text: Option<&str>,
) {
    if let Some(text) = text {
        state.messages.record(chat_id, message_id, text);
    }

    if state.is_quotes_room(chat_id) && sender != Some(state.bot_id) {
        state.gate.mark_others_spoke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::dispatcher::testing::{self, BOT_ID, QUOTES_ROOM};

    #[test]
    fn test_other_user_in_room_reopens_gate() {
        let (state, _) = testing::state();
        state.gate.mark_sent();

        observe(&state, QUOTES_ROOM, MessageId(1), Some(UserId(5)), Some("hi"));

        assert!(state.gate.should_send());
    }

    #[test]
    fn test_non_text_messages_count_as_activity() {
        let (state, _) = testing::state();
        state.gate.mark_sent();

        observe(&state, QUOTES_ROOM, MessageId(1), Some(UserId(5)), None);

        assert!(state.gate.should_send());
    }

    #[test]
    fn test_bot_message_keeps_gate_closed() {
        let (state, _) = testing::state();
        state.gate.mark_sent();

        observe(&state, QUOTES_ROOM, MessageId(1), Some(BOT_ID), Some("🗣️Q001: hi"));

        assert!(!state.gate.should_send());
    }

    #[test]
    fn test_other_rooms_do_not_touch_gate() {
        let (state, _) = testing::state();
        state.gate.mark_sent();

        observe(&state, ChatId(42), MessageId(1), Some(UserId(5)), Some("hi"));

        assert!(!state.gate.should_send());
    }

    #[test]
    fn test_text_is_recorded_everywhere() {
        let (state, _) = testing::state();

        observe(&state, ChatId(42), MessageId(7), Some(UserId(5)), Some("Great point"));

        assert_eq!(
            state.messages.get(ChatId(42), MessageId(7)).as_deref(),
            Some("Great point")
        );
    }
}

//! Quote help text.

use crate::config::ReactionSettings;

/// Usage block for `!help quotes` (HTML).
pub fn get_text(reactions: &ReactionSettings) -> String {
    format!(
        "Usage:\n\
        <b>!q</b> | Show a random quote\n\
        <b>!q [quote id]</b> | Show a specific quote\n\
        <b>!q modify [quote id] [new quote text]</b> | Modify a quote\n\
        <b>!q delete [quote id]</b> | Remove a quote\n\
        <b>!q add [new quote text]</b> | Add a new quote\n\
        <b>!q search [search text]</b> | Search for a quote\n\
        <b>!q count</b> | Get total count of quotes\n\
        React to a message with {} to save it as a quote",
        reactions.save_emojis.join(" or ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_help_mentions_save_reactions() {
        let text = get_text(&ReactionSettings::default());

        assert!(text.starts_with("Usage:\n<b>!q</b> | Show a random quote\n"));
        assert!(text.ends_with("React to a message with 📝 or 🔖 to save it as a quote"));
        assert_eq!(text.lines().count(), 9);
    }
}

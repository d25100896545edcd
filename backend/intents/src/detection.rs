/// Phrase detection — map a spoken or typed phrase to an intent.
///
/// Accepts the suggested phrase, the identifier, or the command name,
/// ignoring case, whitespace, and punctuation ("Swipe up!", "swipe-up",
/// "SwipeUpIntent", "swipeUp").
use crate::types::Intent;

pub fn detect_intent(text: &str) -> Option<Intent> {
    let key = normalize(text);
    if key.is_empty() {
        return None;
    }
    Intent::ALL.into_iter().find(|intent| {
        key == normalize(intent.suggested_phrase())
            || key == normalize(intent.identifier())
            || key == normalize(intent.command_name())
    })
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

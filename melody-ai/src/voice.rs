//! Voice command parsing
//!
//! Maps a spoken transcript to a playback command using whole-word matching.

use serde::Serialize;

/// Playback action recognized in a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "parameters")]
pub enum VoiceCommand {
    Pause,
    Resume,
    Next,
    Previous,
    Stop,
    VolumeUp,
    VolumeDown,
    Play { query: String },
}

const PAUSE: &[&str] = &["pause", "hold", "wait", "stop playing"];
const RESUME: &[&str] = &["resume", "continue", "play"];
const NEXT: &[&str] = &["next", "skip"];
const PREVIOUS: &[&str] = &["previous", "back", "prev"];
const STOP: &[&str] = &["stop"];
const VOLUME_UP: &[&str] = &["volume up", "turn it up", "louder"];
const VOLUME_DOWN: &[&str] = &["volume down", "turn it down", "softer", "quieter"];

/// True when `phrase` occurs in `words` as a run of whole words
fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    words.windows(needle.len()).any(|window| window == needle.as_slice())
}

fn any_phrase(words: &[&str], phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(words, p))
}

/// Parse a transcript into a command, if it contains one
///
/// `play <query>` is recognized before the bare `play` resume verb.
pub fn parse_command(text: &str) -> Option<VoiceCommand> {
    let lower = text.trim().to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    if any_phrase(&words, PAUSE) {
        return Some(VoiceCommand::Pause);
    }
    if let Some(pos) = words.iter().position(|w| *w == "play") {
        let query = words[pos + 1..].join(" ");
        if !query.is_empty() {
            return Some(VoiceCommand::Play { query });
        }
    }
    if any_phrase(&words, RESUME) {
        return Some(VoiceCommand::Resume);
    }
    if any_phrase(&words, NEXT) {
        return Some(VoiceCommand::Next);
    }
    if any_phrase(&words, PREVIOUS) {
        return Some(VoiceCommand::Previous);
    }
    if any_phrase(&words, STOP) {
        return Some(VoiceCommand::Stop);
    }
    if any_phrase(&words, VOLUME_UP) {
        return Some(VoiceCommand::VolumeUp);
    }
    if any_phrase(&words, VOLUME_DOWN) {
        return Some(VoiceCommand::VolumeDown);
    }
    None
}

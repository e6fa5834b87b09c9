//! Emotion lexicon
//!
//! Static per-emotion stem lists in four weighted categories, plus a base
//! weight per emotion. Built once per process and read-only afterwards.

use melody_common::Emotion;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Word category within an emotion's lexicon entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Direct,
    Actions,
    Concepts,
    Intensifiers,
}

impl Category {
    /// Evaluation order
    pub const ALL: [Category; 4] = [
        Category::Direct,
        Category::Actions,
        Category::Concepts,
        Category::Intensifiers,
    ];

    /// Score multiplier applied to every match in this category
    pub fn multiplier(self) -> f64 {
        match self {
            Category::Direct => 2.0,
            Category::Actions => 1.8,
            Category::Concepts => 1.5,
            Category::Intensifiers => 1.2,
        }
    }
}

/// Tokens that negate the following word
pub const NEGATIONS: [&str; 6] = ["not", "no", "never", "dont", "wont", "cant"];

/// One emotion's stems and base weight
#[derive(Debug)]
pub struct LexiconEntry {
    pub direct: &'static [&'static str],
    pub actions: &'static [&'static str],
    pub concepts: &'static [&'static str],
    pub intensifiers: &'static [&'static str],
    pub weight: f64,
}

impl LexiconEntry {
    pub fn words(&self, category: Category) -> &'static [&'static str] {
        match category {
            Category::Direct => self.direct,
            Category::Actions => self.actions,
            Category::Concepts => self.concepts,
            Category::Intensifiers => self.intensifiers,
        }
    }
}

/// Full lexicon, indexed by [`Emotion`]
#[derive(Debug)]
pub struct Lexicon {
    entries: [LexiconEntry; Emotion::COUNT],
    /// Exact word → first emotion (lexicon order) listing it as direct or concept
    negation_targets: HashMap<&'static str, Emotion>,
}

impl Lexicon {
    fn build(entries: [LexiconEntry; Emotion::COUNT]) -> Self {
        let mut negation_targets = HashMap::new();
        for emotion in Emotion::ALL {
            let entry = &entries[emotion.index()];
            for word in entry.direct.iter().chain(entry.concepts) {
                negation_targets.entry(*word).or_insert(emotion);
            }
        }
        Self {
            entries,
            negation_targets,
        }
    }

    pub fn entry(&self, emotion: Emotion) -> &LexiconEntry {
        &self.entries[emotion.index()]
    }

    /// Emotion whose score a negated `word` reduces, if any
    pub fn negation_target(&self, word: &str) -> Option<Emotion> {
        self.negation_targets.get(word).copied()
    }
}

/// Process-wide default lexicon
pub static LEXICON: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::build([
        // Happy
        LexiconEntry {
            direct: &["happy", "joy", "joyful", "glad", "cheerful", "blissful", "ecstatic", "elated", "euphoric"],
            actions: &["smile", "laugh", "dance", "sing", "celebrate", "party", "cheer", "rejoice"],
            concepts: &[
                "love", "heart", "beautiful", "wonderful", "amazing", "fantastic", "great", "magical",
                "dreams", "hope", "freedom", "victory", "success", "bright", "sunshine", "light",
                "golden", "rainbow", "stars",
            ],
            intensifiers: &["yes", "yeah", "alright", "awesome", "brilliant", "perfect", "incredible"],
            weight: 1.0,
        },
        // Sad
        LexiconEntry {
            direct: &[
                "sad", "sorrowful", "melancholy", "depressed", "blue", "down", "low", "miserable",
                "heartbroken", "devastated",
            ],
            actions: &["cry", "weep", "mourn", "grieve", "sob", "sigh"],
            concepts: &[
                "pain", "hurt", "broken", "lonely", "empty", "dark", "night", "rain", "storm", "clouds",
                "grey", "cold", "alone", "miss", "gone", "lost", "death", "die", "goodbye", "farewell",
                "grief", "burden", "heavy",
            ],
            intensifiers: &["so", "very", "too", "deeply", "terribly", "horribly"],
            weight: 1.2,
        },
        // Angry
        LexiconEntry {
            direct: &["angry", "mad", "furious", "rage", "livid", "enraged", "irate", "incensed"],
            actions: &["fight", "scream", "shout", "yell", "explode", "rage", "attack"],
            concepts: &[
                "hate", "kill", "destroy", "break", "crash", "shatter", "violence", "blood", "hell",
                "devil", "evil", "wrong", "bad", "sick", "disgusted", "outraged",
            ],
            intensifiers: &["fucking", "damn", "hell", "pissed", "fuming"],
            weight: 1.3,
        },
        // Energetic
        LexiconEntry {
            direct: &["energetic", "powerful", "dynamic", "vibrant", "lively", "bouncy", "peppy", "intense"],
            actions: &["run", "jump", "dance", "move", "rock", "pump", "explode", "burst"],
            concepts: &[
                "energy", "power", "strong", "fast", "quick", "speed", "beat", "rhythm", "fire", "wild",
                "crazy", "loud", "boom", "bang", "explosive",
            ],
            intensifiers: &["so", "really", "super", "mega", "ultra"],
            weight: 1.1,
        },
        // Calm
        LexiconEntry {
            direct: &["calm", "peaceful", "serene", "tranquil", "relaxed", "content", "zen"],
            actions: &["breathe", "rest", "sleep", "meditate", "float", "drift"],
            concepts: &[
                "peace", "quiet", "soft", "gentle", "slow", "easy", "chill", "still", "silence",
                "whisper", "breeze", "flow", "smooth", "mellow", "soothing", "comfort", "warm", "cozy",
                "safe", "secure",
            ],
            intensifiers: &["so", "very", "deeply", "completely"],
            weight: 0.9,
        },
        // Anxious
        LexiconEntry {
            direct: &[
                "anxious", "worried", "nervous", "scared", "afraid", "fearful", "panic", "stressed",
                "troubled",
            ],
            actions: &["worry", "fret", "panic", "tremble", "shake", "hide"],
            concepts: &[
                "fear", "tension", "pressure", "overwhelmed", "uneasy", "restless", "apprehensive",
                "concerned", "distressed", "uncertain", "confused", "lost", "trapped", "stuck", "doubt",
            ],
            intensifiers: &["so", "very", "terribly", "extremely", "completely"],
            weight: 1.1,
        },
    ])
});

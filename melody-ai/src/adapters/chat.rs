//! Music assistant chat
//!
//! Tier order:
//! 1. Hosted LLM (OpenRouter) under the assistant persona, when an API key is configured
//! 2. Keyword reply (final): canned help text picked by topic keywords

use crate::clients::OpenRouterClient;
use crate::tiers::TierChain;
use crate::types::{FallbackTier, InferenceTier, TierError, Verdict};
use async_trait::async_trait;
use melody_common::{CanonicalMood, EngineConfig};
use serde::Serialize;
use std::sync::Arc;

const PERSONA: &str = "You are MelodyMind AI, a friendly music assistant. You help users with \
music recommendations based on mood, explaining MelodyMind features, mood detection technology, \
playlist creation, voice controls, and music genres. Keep responses helpful, musical, and engaging.";

/// Who wrote a chat reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSource {
    OpenRouter,
    Fallback,
}

/// Assistant reply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub message: String,
    pub source: ChatSource,
}

impl Verdict for ChatReply {
    /// Replies carry no mood of their own
    fn mood(&self) -> CanonicalMood {
        CanonicalMood::Neutral
    }
}

// ============================================================================
// LLM tier
// ============================================================================

/// Hosted LLM reply tier
pub struct LlmChatTier {
    client: OpenRouterClient,
}

impl LlmChatTier {
    pub fn new(client: OpenRouterClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InferenceTier<str, ChatReply> for LlmChatTier {
    fn name(&self) -> &'static str {
        "openrouter-chat"
    }

    async fn attempt(&self, message: &str) -> Result<ChatReply, TierError> {
        let reply = self.client.chat(PERSONA, message).await?;
        Ok(ChatReply {
            message: reply,
            source: ChatSource::OpenRouter,
        })
    }

    /// Any non-empty reply is an answer
    fn is_inconclusive(&self, _reply: &ChatReply) -> bool {
        false
    }
}

// ============================================================================
// Keyword tier
// ============================================================================

struct Topic {
    keywords: &'static [&'static str],
    reply: &'static str,
}

/// First topic with a matching keyword wins, so narrower topics come first
static TOPICS: [Topic; 7] = [
    Topic {
        keywords: &["smart playlist", "playlist"],
        reply: "🎼 **Smart Playlists in MelodyMind:**\n\n\
• **AI-Generated**: Creates playlists based on your mood and preferences\n\
• **Mood-Based**: Different playlists for different emotional states\n\
• **Personalized**: Learns from your listening habits\n\
• **Dynamic**: Updates based on your current mood\n\
• **Easy Creation**: Just click 'Smart Playlist' and let AI do the work\n\n\
Try the Smart Playlist feature to discover new music!",
    },
    Topic {
        keywords: &["recommend", "suggest", "sad songs", "happy songs"],
        reply: "🎶 **Music Recommendations:**\n\n\
**For Sad Mood:**\n\
• Someone Like You - Adele\n\
• The Sound of Silence - Simon & Garfunkel\n\
• Hurt - Johnny Cash\n\n\
**For Happy Mood:**\n\
• Happy - Pharrell Williams\n\
• Can't Stop the Feeling - Justin Timberlake\n\
• Walking on Sunshine - Katrina & The Waves\n\n\
**For Energetic Mood:**\n\
• Eye of the Tiger - Survivor\n\
• Lose Yourself - Eminem\n\
• Thunder - Imagine Dragons\n\n\
Use mood detection to get personalized recommendations!",
    },
    Topic {
        keywords: &["camera", "analysis", "face"],
        reply: "📸 **Camera Analysis in MelodyMind:**\n\n\
• **Facial Expression Detection**: Uses AI to analyze your facial expressions\n\
• **Emotion Recognition**: Detects emotions like happy, sad, angry, surprised\n\
• **Real-time Analysis**: Captures your current mood instantly\n\
• **Music Matching**: Recommends songs that match your detected emotion\n\
• **Privacy Focused**: Analysis happens locally, your images aren't stored\n\n\
Click 'Detect Your Mood' and allow camera access to try it!",
    },
    Topic {
        keywords: &["music", "play", "song"],
        reply: "🎵 **How to Play Music in MelodyMind:**\n\n\
1. **Mood Detection**: Use camera, text, or voice to detect your mood\n\
2. **Browse by Mood**: Select from happy, sad, energetic, or calm categories\n\
3. **Smart Recommendations**: AI suggests songs based on your emotional state\n\
4. **Click to Play**: Simply click any song to start playing\n\
5. **YouTube Integration**: All songs play through YouTube Music\n\n\
Try using the mood detection features to get personalized recommendations!",
    },
    Topic {
        keywords: &["mood", "emotion", "detection"],
        reply: "😊 **Mood Detection Technology:**\n\n\
**Three Methods:**\n\
1. **Camera Analysis**: Detects facial expressions and emotions\n\
2. **Text Input**: Analyzes how you describe your feelings\n\
3. **Voice Analysis**: Understands your emotional state from speech\n\n\
**How It Works:**\n\
• AI processes your input in real-time\n\
• Matches your mood with suitable music\n\
• Provides personalized recommendations\n\
• Updates as your mood changes\n\n\
Try all three methods to see which works best for you!",
    },
    Topic {
        keywords: &["melodymind", "what is", "app"],
        reply: "🎶 **Welcome to MelodyMind!**\n\n\
MelodyMind is your AI-powered music companion that:\n\n\
• **Detects Your Mood**: Through camera, text, or voice\n\
• **Recommends Music**: Based on your emotional state\n\
• **Creates Playlists**: AI-generated smart playlists\n\
• **Voice Controls**: Hands-free music control\n\
• **Mood Analytics**: Tracks your listening patterns\n\n\
**Get Started:**\n\
1. Try mood detection (camera, text, or voice)\n\
2. Browse songs by mood category\n\
3. Create smart playlists\n\
4. Use voice controls for hands-free operation\n\n\
What would you like to explore first?",
    },
    Topic {
        keywords: &["help", "how to use", "guide"],
        reply: "🤖 **MelodyMind User Guide:**\n\n\
**Main Features:**\n\
• **Mood Detection**: Camera, text, or voice input\n\
• **Music Player**: YouTube-integrated playback\n\
• **Smart Playlists**: AI-generated recommendations\n\
• **Voice Controls**: Hands-free operation\n\
• **Analytics**: Track your listening habits\n\n\
**Quick Start:**\n\
1. Click 'Detect Your Mood' to get started\n\
2. Browse songs by mood category\n\
3. Click any song to play\n\
4. Use voice controls for hands-free operation\n\
5. Create smart playlists for different moods\n\n\
Need help with a specific feature? Just ask!",
    },
];

const GREETING: &str = "🎵 **Hello! I'm MelodyMind AI** 🎵\n\n\
I'm here to help you with:\n\
• Music recommendations based on your mood\n\
• Explaining MelodyMind features\n\
• Mood detection technology\n\
• Playlist creation\n\
• Voice controls\n\
• And much more!\n\n\
**Try asking me:**\n\
• 'How to play music?'\n\
• 'How does camera analysis work?'\n\
• 'Recommend happy songs'\n\
• 'What is smart playlist?'\n\
• 'How does mood detection work?'\n\n\
What would you like to know about MelodyMind?";

/// Pick the canned reply for a message (substring match, case-insensitive)
pub fn keyword_reply(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    TOPICS
        .iter()
        .find(|topic| topic.keywords.iter().any(|k| lower.contains(k)))
        .map_or(GREETING, |topic| topic.reply)
}

/// Final chat tier
#[derive(Debug, Default)]
pub struct KeywordReplyTier;

impl FallbackTier<str, ChatReply> for KeywordReplyTier {
    fn name(&self) -> &'static str {
        "keyword-reply"
    }

    fn conclude(&self, message: &str, _fell_through: bool) -> ChatReply {
        ChatReply {
            message: keyword_reply(message).to_string(),
            source: ChatSource::Fallback,
        }
    }
}

// ============================================================================
// Assistant
// ============================================================================

/// Music assistant
pub struct ChatAssistant {
    chain: TierChain<str, ChatReply>,
}

impl ChatAssistant {
    pub fn from_config(config: &EngineConfig) -> Result<Self, TierError> {
        let fallback: Arc<dyn FallbackTier<str, ChatReply>> = Arc::new(KeywordReplyTier);
        let mut chain = TierChain::new(fallback).with_timeout(config.remote_timeout);

        if config.openrouter.api_key().is_some() {
            let client = OpenRouterClient::new(&config.openrouter, config.remote_timeout)?;
            chain = chain.with_tier(Arc::new(LlmChatTier::new(client)));
        }

        Ok(Self { chain })
    }

    pub async fn reply(&self, message: &str) -> ChatReply {
        self.chain.run(message).await
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.chain.tier_names()
    }
}

//! Curated mood catalog
//!
//! Static mood → genre lookup and a small curated song list per mood. Used
//! when no external song library is available.

use crate::adapters::HistoryEntry;
use melody_common::CanonicalMood;
use serde::Serialize;

/// History entries kept as recommendation seeds
const SEED_HISTORY_LIMIT: usize = 20;

struct CuratedSong {
    title: &'static str,
    artist: &'static str,
    album: &'static str,
    duration_secs: u32,
    genre: &'static str,
    video_id: &'static str,
    reason: &'static str,
}

const fn song(
    title: &'static str,
    artist: &'static str,
    album: &'static str,
    duration_secs: u32,
    genre: &'static str,
    video_id: &'static str,
    reason: &'static str,
) -> CuratedSong {
    CuratedSong {
        title,
        artist,
        album,
        duration_secs,
        genre,
        video_id,
        reason,
    }
}

static HAPPY: [CuratedSong; 3] = [
    song("Happy", "Pharrell Williams", "Girl", 233, "pop", "ZbZSe6N_BXs", "Perfect upbeat anthem to match your positive lyrics"),
    song("Can't Stop the Feeling", "Justin Timberlake", "Trolls", 237, "pop", "ru0K8uYEZWw", "Energetic pop song that radiates joy and positivity"),
    song("Good Vibrations", "The Beach Boys", "Smiley Smile", 175, "pop", "Eab_beh07HU", "Classic feel-good song with uplifting harmonies"),
];

static SAD: [CuratedSong; 3] = [
    song("Someone Like You", "Adele", "21", 285, "soul", "hLQl3WQQoQ0", "Emotional ballad that captures the depth of sadness"),
    song("Fix You", "Coldplay", "X&Y", 295, "rock", "k4V3Mo61fJM", "Comforting song that provides solace in difficult times"),
    song("Mad World", "Gary Jules", "Trading Snakeoil for Wolftickets", 203, "indie", "4N3N1MlvVc4", "Melancholic masterpiece that resonates with sorrow"),
];

static ENERGETIC: [CuratedSong; 3] = [
    song("Eye of the Tiger", "Survivor", "Eye of the Tiger", 245, "rock", "btPJPFnesV4", "High-energy anthem that matches your powerful lyrics"),
    song("Thunderstruck", "AC/DC", "The Razors Edge", 292, "rock", "v2AC41dglnM", "Electrifying rock song with intense energy"),
    song("Stronger", "Kanye West", "Graduation", 312, "hip-hop", "PsO6ZnUZI0g", "Empowering hip-hop track that builds momentum"),
];

static ANGRY: [CuratedSong; 3] = [
    song("Killing in the Name", "Rage Against the Machine", "Rage Against the Machine", 315, "metal", "bWXazVhlyx4", "Intense protest song that channels raw anger"),
    song("Break Stuff", "Limp Bizkit", "Significant Other", 167, "metal", "bWXazVhlyx4", "Aggressive nu-metal track that expresses frustration"),
    song("Smells Like Teen Spirit", "Nirvana", "Nevermind", 301, "grunge", "hTWKbfoikeg", "Grunge anthem that captures rebellious energy"),
];

static CALM: [CuratedSong; 3] = [
    song("Weightless", "Marconi Union", "Weightless", 485, "ambient", "UfcAVejslrU", "Scientifically designed to reduce anxiety and stress"),
    song("Clair de Lune", "Claude Debussy", "Suite Bergamasque", 295, "classical", "CvFH_6DNRCY", "Peaceful classical piece that soothes the soul"),
    song("Pure Shores", "All Saints", "Saints & Sinners", 268, "pop", "kO8x8eoU3L4", "Dreamy pop song with tranquil vibes"),
];

static ANXIOUS: [CuratedSong; 3] = [
    song("Breathe", "Pink Floyd", "The Dark Side of the Moon", 163, "progressive rock", "sUgoBb8m3eE", "Meditative song that helps with anxiety and breathing"),
    song("Weightless", "Marconi Union", "Weightless", 485, "ambient", "UfcAVejslrU", "The most relaxing song ever recorded, perfect for anxiety"),
    song("Mad World", "Gary Jules", "Trading Snakeoil for Wolftickets", 203, "indie", "4N3N1MlvVc4", "Gentle melody that acknowledges anxious feelings"),
];

/// Genres associated with a mood
pub fn genres_for_mood(mood: CanonicalMood) -> &'static [&'static str] {
    match mood {
        CanonicalMood::Happy => &["pop", "dance", "electronic", "upbeat"],
        CanonicalMood::Sad => &["indie", "acoustic", "soul", "ballad"],
        CanonicalMood::Energetic => &["rock", "metal", "hip-hop", "electronic"],
        CanonicalMood::Angry => &["metal", "punk", "grunge", "hard rock"],
        CanonicalMood::Calm => &["ambient", "classical", "chill", "acoustic"],
        CanonicalMood::Anxious => &["ambient", "chill", "meditation", "soft rock"],
        CanonicalMood::Neutral => &["pop"],
    }
}

/// One curated recommendation as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRecommendation {
    pub title: String,
    pub artist: String,
    pub mood: CanonicalMood,
    pub reason: String,
    pub youtube_id: String,
    pub url: String,
    pub cover: String,
    pub album: String,
    pub duration: u32,
    pub genre: String,
}

impl SongRecommendation {
    fn from_curated(song: &CuratedSong, mood: CanonicalMood) -> Self {
        Self {
            title: song.title.to_string(),
            artist: song.artist.to_string(),
            mood,
            reason: song.reason.to_string(),
            youtube_id: song.video_id.to_string(),
            url: format!("https://www.youtube.com/watch?v={}", song.video_id),
            cover: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", song.video_id),
            album: song.album.to_string(),
            duration: song.duration_secs,
            genre: song.genre.to_string(),
        }
    }
}

/// Curated songs for a mood; neutral uses the happy list
pub fn curated_songs(mood: CanonicalMood) -> Vec<SongRecommendation> {
    let (list, tagged) = match mood {
        CanonicalMood::Happy | CanonicalMood::Neutral => (&HAPPY, CanonicalMood::Happy),
        CanonicalMood::Sad => (&SAD, mood),
        CanonicalMood::Energetic => (&ENERGETIC, mood),
        CanonicalMood::Angry => (&ANGRY, mood),
        CanonicalMood::Calm => (&CALM, mood),
        CanonicalMood::Anxious => (&ANXIOUS, mood),
    };
    list.iter()
        .map(|song| SongRecommendation::from_curated(song, tagged))
        .collect()
}

/// Genre-level recommendation request result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreRecommendation {
    pub genres: Vec<&'static str>,
    pub limit: usize,
    pub seed_history: Vec<HistoryEntry>,
}

/// Pick seed genres for a mood and keep the most recent history as seeds
pub fn recommend(
    mood: CanonicalMood,
    history: &[HistoryEntry],
    limit: usize,
) -> GenreRecommendation {
    let genres = match mood {
        CanonicalMood::Happy => vec!["pop"],
        CanonicalMood::Energetic => vec!["rock"],
        CanonicalMood::Sad => vec!["acoustic", "indie"],
        _ => vec!["ambient"],
    };
    let start = history.len().saturating_sub(SEED_HISTORY_LIMIT);

    GenreRecommendation {
        genres,
        limit,
        seed_history: history[start..].to_vec(),
    }
}

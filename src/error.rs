//! Error types shared by the game core and its collaborators

use crate::assets::AssetId;

/// Errors that can occur while running the game
#[derive(Debug)]
pub enum LanderError {
    /// A collaborator could not allocate a drawable for this asset
    ResourceExhausted { asset: AssetId },
    /// No audio device could be opened (never fatal)
    AudioUnavailable(String),
    /// Terminal or file I/O failure
    Io(std::io::Error),
    /// Settings or leaderboard file could not be parsed or written
    Json(serde_json::Error),
}

impl From<std::io::Error> for LanderError {
    fn from(e: std::io::Error) -> Self {
        LanderError::Io(e)
    }
}

impl From<serde_json::Error> for LanderError {
    fn from(e: serde_json::Error) -> Self {
        LanderError::Json(e)
    }
}

impl std::fmt::Display for LanderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LanderError::ResourceExhausted { asset } => {
                write!(f, "could not allocate sprite for {:?}", asset)
            }
            LanderError::AudioUnavailable(reason) => write!(f, "audio unavailable: {}", reason),
            LanderError::Io(e) => write!(f, "IO error: {}", e),
            LanderError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for LanderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LanderError::Io(e) => Some(e),
            LanderError::Json(e) => Some(e),
            _ => None,
        }
    }
}

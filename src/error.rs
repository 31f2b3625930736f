use std::path::PathBuf;

/// Errors surfaced by the game core and the terminal front end.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode save: {0}")]
    Encode(#[from] bincode::Error),

    /// The save file exists but is not a player snapshot this build can use.
    #[error("corrupt save file {}: {reason}", path.display())]
    CorruptSave { path: PathBuf, reason: String },

    #[error("terminal too small: {width}x{height}, need at least {min_width}x{min_height}")]
    TerminalTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
}

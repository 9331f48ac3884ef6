use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while extracting pixel outlines.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OutlineError {
    #[error("pixel source is not readable")]
    UnreadablePixelSource,

    /// The boundary walk dead-ended before returning to its start corner.
    #[error("edge cycle broken at corner ({x}, {y}) after {walked} edges")]
    MalformedEdgeCycle { x: i32, y: i32, walked: usize },

    #[error(
        "invalid source scale: capped {capped_width}x{capped_height}, actual {actual_width}x{actual_height}"
    )]
    InvalidScale {
        capped_width: usize,
        capped_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("unsupported channel count: {0} (expected 1, 2, 3 or 4)")]
    UnsupportedChannels(usize),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// CityError: error type for the week -> document pipeline
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors surfaced while loading input or configuration for a render.
///
/// Projection, classification, geometry and sorting are total and never
/// produce one of these; only the edges of the pipeline (input validation,
/// files, configuration) do.
#[derive(Debug)]
pub enum CityError {
    /// The activity data could not be obtained or was malformed as a whole.
    /// Recoverable: the caller-supplied fallback week is used instead.
    DataUnavailable(String),
    /// A single day violated the upstream contract (negative count, weekday
    /// outside 0..=6, unparseable or out-of-order date). Never clamped.
    InvalidSample { index: usize, reason: String },
    /// A visual asset (glyph fragment) was absent. Logged, never fatal.
    MissingAsset(String),
    /// Configuration values that cannot produce a scene.
    Config(String),
    /// I/O error reading input or writing the document.
    Io(std::io::Error),
    /// JSON decoding failed (calendar payload or config file).
    Json(serde_json::Error),
}

impl CityError {
    /// Whether the renderer may continue with the fallback week.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CityError::DataUnavailable(_) | CityError::MissingAsset(_))
    }
}

impl fmt::Display for CityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CityError::DataUnavailable(msg) => write!(f, "Activity data unavailable: {msg}"),
            CityError::InvalidSample { index, reason } => {
                write!(f, "Invalid sample at day {index}: {reason}")
            }
            CityError::MissingAsset(name) => write!(f, "Missing asset: {name}"),
            CityError::Config(msg) => write!(f, "Invalid configuration: {msg}"),
            CityError::Io(e) => write!(f, "I/O error: {e}"),
            CityError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for CityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CityError::Io(e) => Some(e),
            CityError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CityError {
    fn from(e: std::io::Error) -> Self {
        CityError::Io(e)
    }
}

impl From<serde_json::Error> for CityError {
    fn from(e: serde_json::Error) -> Self {
        CityError::Json(e)
    }
}

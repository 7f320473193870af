use std::fmt;

/// Error types for the chartplotter core
///
/// Most variants are recoverable result states the presentation layer decides
/// how to display (`NotFound` renders as "offline", `AccessDenied` as
/// "private"). Only `Io`, `Csv` and `Json` come from export and file plumbing.
#[derive(Debug)]
pub enum ChartError {
    /// I/O errors
    Io(std::io::Error),
    /// CSV writer errors
    #[cfg(feature = "csv")]
    Csv(csv::Error),
    /// JSON decoding errors for drawings and preferences
    #[cfg(feature = "json")]
    Json(serde_json::Error),
    /// Callsign was empty or whitespace only
    InvalidCallsign,
    /// No presence entry for the callsign
    NotFound(String),
    /// Entry exists but its privacy rules hide it from the viewer
    AccessDenied(String),
    /// Leg index outside the current route
    LegOutOfRange { index: usize, len: usize },
    /// Latitude/longitude not finite or outside the WGS84 range
    InvalidCoordinate { lat: f64, lon: f64 },
    /// Export format error
    Export(String),
}

impl ChartError {
    /// Short label used by fleet-watch displays
    pub fn status_label(&self) -> &'static str {
        match self {
            ChartError::NotFound(_) => "offline",
            ChartError::AccessDenied(_) => "private",
            ChartError::InvalidCallsign => "invalid callsign",
            _ => "error",
        }
    }
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::Io(err) => write!(f, "I/O error: {}", err),
            #[cfg(feature = "csv")]
            ChartError::Csv(err) => write!(f, "CSV error: {}", err),
            #[cfg(feature = "json")]
            ChartError::Json(err) => write!(f, "JSON error: {}", err),
            ChartError::InvalidCallsign => write!(f, "Callsign must not be empty"),
            ChartError::NotFound(callsign) => write!(f, "Vessel '{}' is offline", callsign),
            ChartError::AccessDenied(callsign) => write!(f, "Vessel '{}' is private", callsign),
            ChartError::LegOutOfRange { index, len } => {
                write!(f, "Leg index {} out of range for route with {} legs", index, len)
            }
            ChartError::InvalidCoordinate { lat, lon } => {
                write!(f, "Invalid coordinate: lat {}, lon {}", lat, lon)
            }
            ChartError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for ChartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChartError::Io(err) => Some(err),
            #[cfg(feature = "csv")]
            ChartError::Csv(err) => Some(err),
            #[cfg(feature = "json")]
            ChartError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChartError {
    fn from(err: std::io::Error) -> Self {
        ChartError::Io(err)
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for ChartError {
    fn from(err: csv::Error) -> Self {
        ChartError::Csv(err)
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Json(err)
    }
}

impl From<anyhow::Error> for ChartError {
    fn from(err: anyhow::Error) -> Self {
        ChartError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_errors_map_to_status_labels() {
        assert_eq!(ChartError::NotFound("Goose".into()).status_label(), "offline");
        assert_eq!(ChartError::AccessDenied("Goose".into()).status_label(), "private");
        assert_eq!(ChartError::InvalidCallsign.status_label(), "invalid callsign");
    }

    #[test]
    fn test_display_includes_context() {
        let err = ChartError::LegOutOfRange { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "Leg index 4 out of range for route with 2 legs"
        );
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error;
        let err = ChartError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(err.source().is_some());
        assert!(ChartError::InvalidCallsign.source().is_none());
    }
}

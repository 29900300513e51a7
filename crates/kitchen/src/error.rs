// ---------------------------------------------------------------------------
// VizError: error type for loading and validating kitchen state files
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors that can occur while reading, decoding or validating state files.
#[derive(Debug)]
pub enum VizError {
    /// I/O error (file not found, permission denied, etc.)
    Io(std::io::Error),
    /// JSON was malformed or did not match the state schema.
    Json(serde_json::Error),
    /// Bitcode decoding failed (corrupt or truncated replay data).
    Decode(String),
    /// LZ4 payload could not be decompressed.
    Decompress(String),
    /// The static grid is not a well-formed `width` x `height` rectangle.
    InvalidLayout(String),
    /// A frame references positions outside the grid or is out of order.
    InvalidFrame { index: usize, reason: String },
    /// Binary replay does not start with the expected magic bytes.
    BadMagic,
    /// Binary replay payload does not hash to the checksum in its header.
    ChecksumMismatch { expected: u32, found: u32 },
    /// Binary replay was written by a newer build.
    VersionMismatch { expected_max: u32, found: u32 },
}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VizError::Io(e) => write!(f, "I/O error: {e}"),
            VizError::Json(e) => write!(f, "JSON error: {e}"),
            VizError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            VizError::Decompress(msg) => write!(f, "Decompression error: {msg}"),
            VizError::InvalidLayout(msg) => write!(f, "Invalid layout: {msg}"),
            VizError::InvalidFrame { index, reason } => {
                write!(f, "Invalid frame {index}: {reason}")
            }
            VizError::BadMagic => write!(f, "Not a kitchen replay file (bad magic bytes)"),
            VizError::ChecksumMismatch { expected, found } => write!(
                f,
                "Checksum mismatch: header says {expected:#010x}, payload hashes to {found:#010x}"
            ),
            VizError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: replay is v{found}, but this build only supports up to v{expected_max}"
            ),
        }
    }
}

impl std::error::Error for VizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VizError::Io(e) => Some(e),
            VizError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VizError {
    fn from(e: std::io::Error) -> Self {
        VizError::Io(e)
    }
}

impl From<serde_json::Error> for VizError {
    fn from(e: serde_json::Error) -> Self {
        VizError::Json(e)
    }
}

impl From<bitcode::Error> for VizError {
    fn from(e: bitcode::Error) -> Self {
        VizError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_io() {
        let err = VizError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let msg = format!("{err}");
        assert!(msg.contains("I/O error"), "got: {msg}");
        assert!(msg.contains("file not found"), "got: {msg}");
    }

    #[test]
    fn display_invalid_frame_names_index() {
        let err = VizError::InvalidFrame {
            index: 7,
            reason: "player 0 at (9, 9) is outside the grid".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("frame 7"), "got: {msg}");
        assert!(msg.contains("outside the grid"), "got: {msg}");
    }

    #[test]
    fn display_version_mismatch() {
        let err = VizError::VersionMismatch {
            expected_max: 1,
            found: 4,
        };
        let msg = format!("{err}");
        assert!(msg.contains("v4"), "got: {msg}");
        assert!(msg.contains("v1"), "got: {msg}");
    }

    #[test]
    fn json_error_converts_and_keeps_source() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: VizError = json_err.into();
        assert!(matches!(err, VizError::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn layout_error_has_no_source() {
        let err = VizError::InvalidLayout("row 2 has 4 cells, expected 5".to_string());
        assert!(std::error::Error::source(&err).is_none());
    }
}

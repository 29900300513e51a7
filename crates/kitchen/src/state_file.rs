// ---------------------------------------------------------------------------
// state_file – state schema JSON and the compact binary replay container
// ---------------------------------------------------------------------------
//
// JSON layout (camelCase, as produced by the game recorder):
//   { "staticInfo": { "width", "height", "grid" }, "frames": [ Frame, ... ] }
//
// Binary layout (20-byte header, little-endian), used for long recordings:
//   [0..4]   Magic bytes: "KVIZ"
//   [4..8]   Format version (u32)
//   [8..12]  Flags (u32: bit 0 = lz4-compressed payload)
//   [12..16] Uncompressed payload size (u32)
//   [16..20] xxHash32 checksum of the stored payload (everything after the header)
//   [20..]   bitcode-encoded StateFile, optionally lz4-compressed

use std::path::Path;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh32::xxh32;

use crate::error::VizError;
use crate::frame::Frame;
use crate::layout::StaticLayout;

/// Magic bytes identifying a binary kitchen replay.
pub const MAGIC: [u8; 4] = *b"KVIZ";

/// Size of the binary header in bytes.
pub const HEADER_SIZE: usize = 20;

/// Current binary format version.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// Header flag: payload is lz4 block-compressed.
pub const FLAG_COMPRESSED: u32 = 1;

/// File extension selecting the binary container in [`load_path`].
pub const BINARY_EXTENSION: &str = "kviz";

const XXHASH_SEED: u32 = 0;

/// One grid row: either a string (`"XXPXX"`) or an array of one-char cells.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode, PartialEq)]
#[serde(untagged)]
pub enum GridRow {
    Text(String),
    Cells(Vec<String>),
}

impl GridRow {
    fn symbols(&self, y: usize) -> Result<Vec<char>, VizError> {
        match self {
            GridRow::Text(text) => Ok(text.chars().collect()),
            GridRow::Cells(cells) => cells
                .iter()
                .enumerate()
                .map(|(x, cell)| {
                    let mut chars = cell.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(c),
                        _ => Err(VizError::InvalidLayout(format!(
                            "cell ({x}, {y}) must be exactly one character, got {cell:?}"
                        ))),
                    }
                })
                .collect(),
        }
    }
}

/// The fixed part of the state: grid dimensions and tile symbols.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaticInfo {
    pub width: u32,
    pub height: u32,
    pub grid: Vec<GridRow>,
}

/// A complete state file: the static layout plus zero or more frames.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StateFile {
    pub static_info: StaticInfo,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl StateFile {
    /// Deserialize from the state schema JSON.
    pub fn from_json(json: &str) -> Result<Self, VizError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, VizError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the validated tile grid described by `static_info`.
    pub fn layout(&self) -> Result<StaticLayout, VizError> {
        let info = &self.static_info;
        let rows = info
            .grid
            .iter()
            .enumerate()
            .map(|(y, row)| row.symbols(y))
            .collect::<Result<Vec<_>, _>>()?;
        StaticLayout::from_rows(info.width as usize, info.height as usize, rows)
    }

    /// Validate internal consistency:
    /// - the grid is a well-formed rectangle
    /// - frames are sorted by timestep (non-decreasing)
    /// - every frame's players and objects are inside the grid
    pub fn validate(&self) -> Result<StaticLayout, VizError> {
        let layout = self.layout()?;

        for (i, pair) in self.frames.windows(2).enumerate() {
            if pair[1].timestep < pair[0].timestep {
                return Err(VizError::InvalidFrame {
                    index: i + 1,
                    reason: format!(
                        "frames not sorted by timestep: {} followed by {}",
                        pair[0].timestep, pair[1].timestep
                    ),
                });
            }
        }

        for (i, frame) in self.frames.iter().enumerate() {
            frame.validate(i, &layout)?;
        }

        Ok(layout)
    }

    /// Encode into the binary replay container.
    pub fn to_bytes(&self, compress: bool) -> Vec<u8> {
        let encoded = bitcode::encode(self);
        let uncompressed_size = encoded.len() as u32;
        let (flags, payload) = if compress {
            (FLAG_COMPRESSED, lz4_flex::compress(&encoded))
        } else {
            (0, encoded)
        };

        let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&CURRENT_FORMAT_VERSION.to_le_bytes());
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&uncompressed_size.to_le_bytes());
        out.extend_from_slice(&xxh32(&payload, XXHASH_SEED).to_le_bytes());
        out.extend_from_slice(&payload);
        out
    }

    /// Decode the binary replay container, verifying magic, version and checksum.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VizError> {
        if bytes.len() < 4 || bytes[..4] != MAGIC {
            return Err(VizError::BadMagic);
        }
        if bytes.len() < HEADER_SIZE {
            return Err(VizError::Decode(format!(
                "file is too short ({} bytes, need at least {HEADER_SIZE} for header)",
                bytes.len()
            )));
        }

        let read_u32 = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };
        let format_version = read_u32(4);
        let flags = read_u32(8);
        let uncompressed_size = read_u32(12) as usize;
        let checksum = read_u32(16);

        if format_version > CURRENT_FORMAT_VERSION {
            return Err(VizError::VersionMismatch {
                expected_max: CURRENT_FORMAT_VERSION,
                found: format_version,
            });
        }

        let payload = &bytes[HEADER_SIZE..];
        let computed = xxh32(payload, XXHASH_SEED);
        if computed != checksum {
            return Err(VizError::ChecksumMismatch {
                expected: checksum,
                found: computed,
            });
        }

        if flags & FLAG_COMPRESSED != 0 {
            let decompressed = lz4_flex::decompress(payload, uncompressed_size)
                .map_err(|e| VizError::Decompress(e.to_string()))?;
            Ok(bitcode::decode(&decompressed)?)
        } else {
            Ok(bitcode::decode(payload)?)
        }
    }
}

/// Read a state file from disk, choosing the codec by extension
/// (`.kviz` is the binary container, anything else is JSON).
pub fn load_path(path: impl AsRef<Path>) -> Result<StateFile, VizError> {
    let path = path.as_ref();
    let is_binary = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BINARY_EXTENSION));
    if is_binary {
        let bytes = std::fs::read(path)?;
        StateFile::from_bytes(&bytes)
    } else {
        let text = std::fs::read_to_string(path)?;
        StateFile::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{HeldObject, ObjectState, PlayerState};
    use crate::layout::TileKind;

    const CRAMPED_ROOM: &str = r#"{
        "staticInfo": {
            "width": 5,
            "height": 4,
            "grid": ["XXPXX", "O  2O", "X1  X", "XDXSX"]
        },
        "frames": [
            {
                "timestep": 0, "score": 0,
                "players": [
                    {"position": [1, 2], "orientation": [0, -1], "heldObject": null},
                    {"position": [3, 1], "orientation": [0, -1], "heldObject": null}
                ],
                "objects": []
            },
            {
                "timestep": 1, "score": 0,
                "players": [
                    {"position": [1, 1], "orientation": [-1, 0], "heldObject": {"name": "onion"}},
                    {"position": [3, 1], "orientation": [1, 0], "heldObject": null}
                ],
                "objects": [
                    {"name": "soup", "position": [2, 0], "ingredients": ["onion"], "cookingTick": -1}
                ]
            }
        ]
    }"#;

    fn sample() -> StateFile {
        StateFile::from_json(CRAMPED_ROOM).expect("sample should parse")
    }

    #[test]
    fn parses_string_rows() {
        let file = sample();
        let layout = file.validate().expect("sample should validate");
        assert_eq!(layout.width(), 5);
        assert_eq!(layout.get(2, 0), Some(TileKind::Pot));
        assert_eq!(file.frames.len(), 2);
        assert_eq!(
            file.frames[1].players[0].held_object,
            Some(HeldObject {
                name: "onion".to_string(),
                ingredients: vec![],
                is_ready: false,
            })
        );
    }

    #[test]
    fn parses_cell_array_rows() {
        let json = r#"{
            "staticInfo": {"width": 3, "height": 2, "grid": [["X","P","X"], ["O"," ","S"]]}
        }"#;
        let file = StateFile::from_json(json).unwrap();
        assert!(file.frames.is_empty());
        let layout = file.layout().unwrap();
        assert_eq!(layout.get(1, 0), Some(TileKind::Pot));
        assert_eq!(layout.get(2, 1), Some(TileKind::ServingStation));
    }

    #[test]
    fn rejects_multi_char_cells() {
        let json = r#"{"staticInfo": {"width": 2, "height": 1, "grid": [["X", "PP"]]}}"#;
        let err = StateFile::from_json(json).unwrap().layout().unwrap_err();
        assert!(format!("{err}").contains("exactly one character"), "got: {err}");
    }

    #[test]
    fn huge_dimensions_with_empty_grid_are_invalid() {
        let json = r#"{"staticInfo": {"width": 4000000000, "height": 4000000000, "grid": []}}"#;
        let err = StateFile::from_json(json).unwrap().layout().unwrap_err();
        assert!(matches!(err, VizError::InvalidLayout(_)), "got: {err}");
    }

    #[test]
    fn missing_static_info_is_json_error() {
        let err = StateFile::from_json(r#"{"frames": []}"#).unwrap_err();
        assert!(matches!(err, VizError::Json(_)));
    }

    #[test]
    fn validate_catches_unsorted_timesteps() {
        let mut file = sample();
        file.frames.swap(0, 1);
        let err = file.validate().unwrap_err();
        assert!(format!("{err}").contains("not sorted by timestep"), "got: {err}");
    }

    #[test]
    fn validate_catches_player_outside_grid() {
        let mut file = sample();
        file.frames[1].players.push(PlayerState {
            position: [7, 0],
            orientation: [0, 1],
            held_object: None,
        });
        let err = file.validate().unwrap_err();
        assert!(matches!(err, VizError::InvalidFrame { index: 1, .. }));
    }

    #[test]
    fn json_roundtrip() {
        let original = sample();
        let json = original.to_json().unwrap();
        assert!(json.contains("staticInfo"));
        assert!(json.contains("heldObject"));
        assert_eq!(StateFile::from_json(&json).unwrap(), original);
    }

    #[test]
    fn binary_roundtrip_compressed_and_plain() {
        let mut original = sample();
        // Repeat frames so compression has something to chew on.
        for t in 2..200 {
            let mut frame = original.frames[1].clone();
            frame.timestep = t;
            frame.objects.push(ObjectState {
                name: "dish".to_string(),
                position: [1, 3],
                ingredients: vec![],
                cooking_tick: -1,
                cook_time: 20,
                is_ready: false,
            });
            original.frames.push(frame);
        }

        let compressed = original.to_bytes(true);
        let plain = original.to_bytes(false);
        assert_eq!(&compressed[..4], b"KVIZ");
        assert!(compressed.len() < plain.len());
        assert_eq!(StateFile::from_bytes(&compressed).unwrap(), original);
        assert_eq!(StateFile::from_bytes(&plain).unwrap(), original);
    }

    #[test]
    fn binary_rejects_bad_magic() {
        let err = StateFile::from_bytes(b"{\"staticInfo\": {}}").unwrap_err();
        assert!(matches!(err, VizError::BadMagic));
    }

    #[test]
    fn binary_rejects_truncated_header() {
        let err = StateFile::from_bytes(b"KVIZ\x01\x00").unwrap_err();
        assert!(format!("{err}").contains("too short"), "got: {err}");
    }

    #[test]
    fn binary_rejects_corruption() {
        let mut bytes = sample().to_bytes(true);
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        let err = StateFile::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, VizError::ChecksumMismatch { .. }));
    }

    #[test]
    fn binary_rejects_newer_version() {
        let mut bytes = sample().to_bytes(false);
        bytes[4..8].copy_from_slice(&99u32.to_le_bytes());
        let err = StateFile::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            VizError::VersionMismatch {
                expected_max: CURRENT_FORMAT_VERSION,
                found: 99
            }
        ));
    }

    #[test]
    fn load_path_picks_codec_by_extension() {
        let dir = std::env::temp_dir().join("kitchen_state_file_load_path");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let json_path = dir.join("state.json");
        std::fs::write(&json_path, CRAMPED_ROOM).unwrap();
        let bin_path = dir.join("state.kviz");
        std::fs::write(&bin_path, sample().to_bytes(true)).unwrap();

        assert_eq!(load_path(&json_path).unwrap(), sample());
        assert_eq!(load_path(&bin_path).unwrap(), sample());

        let missing = load_path(dir.join("nope.json")).unwrap_err();
        assert!(matches!(missing, VizError::Io(_)));

        let _ = std::fs::remove_dir_all(&dir);
    }
}

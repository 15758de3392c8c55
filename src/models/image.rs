//! Image metadata.

use serde::{Deserialize, Serialize};

/// MediaWiki media type of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Bitmap,
    Drawing,
    Video,
    Audio,
    Multimedia,
    Office,
    Text,
    Executable,
    Archive,
    ThreeD,
    Unknown,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Bitmap => "BITMAP",
            MediaType::Drawing => "DRAWING",
            MediaType::Video => "VIDEO",
            MediaType::Audio => "AUDIO",
            MediaType::Multimedia => "MULTIMEDIA",
            MediaType::Office => "OFFICE",
            MediaType::Text => "TEXT",
            MediaType::Executable => "EXECUTABLE",
            MediaType::Archive => "ARCHIVE",
            MediaType::ThreeD => "3D",
            MediaType::Unknown => "UNKNOWN",
        }
    }
}

impl From<&str> for MediaType {
    fn from(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "BITMAP" => MediaType::Bitmap,
            "DRAWING" => MediaType::Drawing,
            "VIDEO" => MediaType::Video,
            "AUDIO" => MediaType::Audio,
            "MULTIMEDIA" => MediaType::Multimedia,
            "OFFICE" => MediaType::Office,
            "TEXT" => MediaType::Text,
            "EXECUTABLE" => MediaType::Executable,
            "ARCHIVE" => MediaType::Archive,
            "3D" => MediaType::ThreeD,
            _ => MediaType::Unknown,
        }
    }
}

impl From<String> for MediaType {
    fn from(s: String) -> Self {
        MediaType::from(s.as_str())
    }
}

impl From<MediaType> for String {
    fn from(media_type: MediaType) -> Self {
        media_type.as_str().to_string()
    }
}

/// Resolved dimensions and type of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Name the metadata was resolved under
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub media_type: MediaType,
}

impl ImageMetadata {
    pub fn new(name: impl Into<String>, width: u32, height: u32, media_type: MediaType) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            media_type,
        }
    }

    /// Taller than wide.
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

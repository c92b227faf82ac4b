//! Media types for uploaded asset payloads.

/// Media type of an asset payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Png,
    Jpeg,
    WebP,
    Gif,
    Svg,
    Mp4,
    WebM,
    /// Anything we do not recognise; served as raw bytes.
    Binary,
}

impl MediaType {
    /// Get MIME type for this media type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
            MediaType::WebP => "image/webp",
            MediaType::Gif => "image/gif",
            MediaType::Svg => "image/svg+xml",
            MediaType::Mp4 => "video/mp4",
            MediaType::WebM => "video/webm",
            MediaType::Binary => "application/octet-stream",
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Png => "png",
            MediaType::Jpeg => "jpg",
            MediaType::WebP => "webp",
            MediaType::Gif => "gif",
            MediaType::Svg => "svg",
            MediaType::Mp4 => "mp4",
            MediaType::WebM => "webm",
            MediaType::Binary => "bin",
        }
    }

    /// Parse a MIME type, ignoring parameters such as `;charset=utf-8`.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Some(MediaType::Png),
            "image/jpeg" | "image/jpg" => Some(MediaType::Jpeg),
            "image/webp" => Some(MediaType::WebP),
            "image/gif" => Some(MediaType::Gif),
            "image/svg+xml" => Some(MediaType::Svg),
            "video/mp4" => Some(MediaType::Mp4),
            "video/webm" => Some(MediaType::WebM),
            "application/octet-stream" => Some(MediaType::Binary),
            _ => None,
        }
    }

    /// Detect media type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(MediaType::Png),
            "jpg" | "jpeg" => Some(MediaType::Jpeg),
            "webp" => Some(MediaType::WebP),
            "gif" => Some(MediaType::Gif),
            "svg" => Some(MediaType::Svg),
            "mp4" => Some(MediaType::Mp4),
            "webm" => Some(MediaType::WebM),
            "bin" => Some(MediaType::Binary),
            _ => None,
        }
    }

    /// Detect media type from the extension of an object or file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        name.rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
    }

    /// Detect media type from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(MediaType::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(MediaType::Jpeg);
        }

        if data.starts_with(b"GIF8") {
            return Some(MediaType::Gif);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(MediaType::WebP);
        }

        // MP4: ....ftyp
        if data.len() >= 8 && &data[4..8] == b"ftyp" {
            return Some(MediaType::Mp4);
        }

        // WebM (Matroska EBML header)
        if data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
            return Some(MediaType::WebM);
        }

        None
    }
}

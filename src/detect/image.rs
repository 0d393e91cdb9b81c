use bytes::Bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Unknown,
}

/// A fetched image: the sniffed format plus the raw encoded bytes. The
/// engine never re-encodes; rendering is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub format: ImageFormat,
    pub bytes: Bytes,
}

/// Detect image format from the leading magic bytes.
pub fn detect_image(header: &[u8]) -> ImageFormat {
    // PNG: fixed 8-byte signature
    if header.len() >= 8 && header[0..8] == [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A] {
        return ImageFormat::Png;
    }

    // JPEG: SOI marker followed by another marker byte
    if header.len() >= 3 && header[0..3] == [0xFF, 0xD8, 0xFF] {
        return ImageFormat::Jpeg;
    }

    // GIF: "GIF87a" or "GIF89a"
    if header.len() >= 6 && (&header[0..6] == b"GIF87a" || &header[0..6] == b"GIF89a") {
        return ImageFormat::Gif;
    }

    // WebP: RIFF container with "WEBP" fourcc at offset 8
    if header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"WEBP" {
        return ImageFormat::WebP;
    }

    ImageFormat::Unknown
}

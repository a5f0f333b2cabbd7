//! Magic-byte content sniffing.
//!
//! Only the first [`HEADER_LEN`] bytes of a file are inspected. MIME names
//! follow the freedesktop shared-mime-info database, so they line up with
//! what users find in their device documentation.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::traits::ContentSniffer;
use super::types::ContentType;

/// Number of leading bytes read from each file.
pub const HEADER_LEN: usize = 64;

const ASF_GUID: [u8; 8] = [0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11];
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const EBML_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];

/// Sniffer backed by [`detect_mime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicSniffer;

impl MagicSniffer {
    pub fn new() -> Self {
        Self
    }

    fn read_header(path: &Path) -> io::Result<Vec<u8>> {
        let mut header = Vec::with_capacity(HEADER_LEN);
        File::open(path)?
            .take(HEADER_LEN as u64)
            .read_to_end(&mut header)?;
        Ok(header)
    }
}

impl ContentSniffer for MagicSniffer {
    fn name(&self) -> &str {
        "magic"
    }

    fn sniff(&self, path: &Path) -> io::Result<Option<ContentType>> {
        let header = Self::read_header(path)?;
        Ok(detect_mime(&header).map(ContentType::new))
    }
}

/// Detect a MIME type from the first bytes of a file.
///
/// Returns `None` when the header does not match any known signature.
pub fn detect_mime(header: &[u8]) -> Option<&'static str> {
    if header.starts_with(b"fLaC") {
        return Some("audio/flac");
    }

    // MP3 with ID3v2 tag
    if header.starts_with(b"ID3") {
        return Some("audio/mpeg");
    }

    if header.starts_with(b"OggS") {
        return Some(detect_ogg(header));
    }

    if header.starts_with(b"RIFF") {
        return match header.get(8..12) {
            Some(b"WAVE") => Some("audio/x-wav"),
            Some(b"AVI ") => Some("video/x-msvideo"),
            Some(b"WEBP") => Some("image/webp"),
            _ => None,
        };
    }

    if header.starts_with(b"FORM") {
        return match header.get(8..12) {
            Some(b"AIFF") | Some(b"AIFC") => Some("audio/x-aiff"),
            _ => None,
        };
    }

    if header.get(4..8) == Some(&b"ftyp"[..]) {
        return Some(match header.get(8..12) {
            Some(b"M4A ") | Some(b"M4B ") | Some(b"M4P ") | Some(b"F4A ") => "audio/mp4",
            Some(b"qt  ") => "video/quicktime",
            _ => "video/mp4",
        });
    }

    if header.starts_with(b"MAC ") {
        return Some("audio/x-ape");
    }
    if header.starts_with(b"wvpk") {
        return Some("audio/x-wavpack");
    }
    if header.starts_with(b"MPCK") || header.starts_with(b"MP+") {
        return Some("audio/x-musepack");
    }
    if header.starts_with(b"#!AMR") {
        return Some("audio/AMR");
    }
    if header.starts_with(b"MThd") {
        return Some("audio/midi");
    }

    if header.starts_with(&EBML_MAGIC) {
        let is_webm = header.windows(4).any(|w| w == b"webm");
        return Some(if is_webm { "video/webm" } else { "video/x-matroska" });
    }

    if header.starts_with(&ASF_GUID) {
        return Some("application/vnd.ms-asf");
    }

    if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if header.starts_with(&PNG_SIGNATURE) {
        return Some("image/png");
    }
    if header.starts_with(b"GIF87a") || header.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if header.starts_with(b"%PDF-") {
        return Some("application/pdf");
    }
    if header.starts_with(b"PK\x03\x04") {
        return Some("application/zip");
    }

    detect_frame_sync(header)
}

/// Identify the codec of an Ogg stream from its first page.
fn detect_ogg(header: &[u8]) -> &'static str {
    // First page header is 27 bytes plus a one-entry segment table.
    let payload = header.get(28..).unwrap_or_default();
    if payload.starts_with(b"\x01vorbis") {
        "audio/x-vorbis+ogg"
    } else if payload.starts_with(b"OpusHead") {
        "audio/x-opus+ogg"
    } else if payload.starts_with(b"\x7fFLAC") {
        "audio/x-flac+ogg"
    } else if payload.starts_with(b"Speex   ") {
        "audio/x-speex+ogg"
    } else if payload.starts_with(b"\x80theora") {
        "video/x-theora+ogg"
    } else {
        "audio/ogg"
    }
}

/// Raw MPEG audio frames (MP3 without ID3) and ADTS AAC.
fn detect_frame_sync(header: &[u8]) -> Option<&'static str> {
    let (b0, b1) = match header {
        [b0, b1, ..] => (*b0, *b1),
        _ => return None,
    };
    if b0 != 0xFF || b1 & 0xE0 != 0xE0 {
        return None;
    }

    let version = (b1 >> 3) & 0b11;
    let layer = (b1 >> 1) & 0b11;
    match (version, layer) {
        // ADTS: MPEG-4/MPEG-2 with the layer field fixed at zero
        (0b10 | 0b11, 0b00) if b1 & 0xF6 == 0xF0 => Some("audio/aac"),
        (0b01, _) | (_, 0b00) => None,
        _ => Some("audio/mpeg"),
    }
}

//! Testing utilities and mock implementations.
//!
//! This module provides a mock [`Transcoder`](crate::transcoder::Transcoder)
//! and sample file headers, so the pipeline can be exercised without ffmpeg
//! or real media files.
//!
//! # Example
//!
//! ```rust,ignore
//! use tracksync_core::testing::{fixtures, MockTranscoder};
//!
//! let transcoder = MockTranscoder::new("mp3");
//! transcoder.fail_on("/music/broken.flac").await;
//! std::fs::write(source.join("a.flac"), fixtures::flac())?;
//! ```

mod mock_transcoder;

pub use mock_transcoder::{MockTranscoder, RecordedTranscode};

/// Sample file headers for content sniffing.
pub mod fixtures {
    /// Plain text, unknown to the sniffer.
    pub const TEXT: &[u8] = b"Track listing\n1. Intro\n2. Outro\n";

    /// FLAC stream marker followed by a STREAMINFO block header.
    pub fn flac() -> Vec<u8> {
        let mut bytes = b"fLaC\x00\x00\x00\x22".to_vec();
        bytes.resize(64, 0);
        bytes
    }

    /// MP3 with an ID3v2.4 tag.
    pub fn mp3() -> Vec<u8> {
        let mut bytes = b"ID3\x04\x00\x00\x00\x00\x00\x00".to_vec();
        bytes.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        bytes.resize(64, 0);
        bytes
    }

    /// RIFF/WAVE header.
    pub fn wav() -> Vec<u8> {
        let mut bytes = b"RIFF\x24\x00\x00\x00WAVEfmt \x10\x00\x00\x00".to_vec();
        bytes.resize(44, 0);
        bytes
    }

    /// MPEG-4 audio with an `M4A ` major brand.
    pub fn m4a() -> Vec<u8> {
        let mut bytes = vec![0x00, 0x00, 0x00, 0x20];
        bytes.extend_from_slice(b"ftypM4A \x00\x00\x00\x00M4A mp42isom");
        bytes.resize(64, 0);
        bytes
    }

    /// JFIF image.
    pub fn jpeg() -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        bytes.extend_from_slice(b"JFIF\x00");
        bytes.resize(64, 0);
        bytes
    }

    /// First page of an Ogg stream whose single packet starts with `codec`.
    pub fn ogg_page(codec: &[u8]) -> Vec<u8> {
        let mut bytes = b"OggS".to_vec();
        bytes.push(0); // version
        bytes.push(0x02); // beginning of stream
        bytes.extend_from_slice(&[0; 8]); // granule position
        bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]); // serial
        bytes.extend_from_slice(&[0; 4]); // page sequence
        bytes.extend_from_slice(&[0; 4]); // checksum
        bytes.push(1); // segment count
        bytes.push(30); // segment length
        bytes.extend_from_slice(codec);
        bytes.resize(64, 0);
        bytes
    }

    /// Ogg Vorbis identification page.
    pub fn ogg_vorbis() -> Vec<u8> {
        ogg_page(b"\x01vorbis")
    }
}

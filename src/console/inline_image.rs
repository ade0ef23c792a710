//! Inline image escape sequences.
//!
//! Two protocols are supported:
//! - `iterm` - OSC 1337 `File=` (iTerm2, WezTerm, mintty, Konsole)
//! - `kitty` - APC `_G` graphics commands (kitty, Ghostty, WezTerm)

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use super::InlineImage;

/// Maximum base64 payload per kitty graphics command.
pub const KITTY_CHUNK_SIZE: usize = 4096;

/// Terminal graphics protocol used for Image mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageProtocol {
    #[default]
    Iterm,
    Kitty,
}

impl ImageProtocol {
    /// Escape sequence that displays `image` at the cursor.
    pub fn encode(self, image: &InlineImage) -> String {
        match self {
            ImageProtocol::Iterm => iterm_sequence(image),
            ImageProtocol::Kitty => kitty_sequence(image),
        }
    }

    /// Sequence removing every image this protocol placed, if it keeps them
    /// apart from the text grid.
    pub fn erase_all(self) -> &'static str {
        match self {
            ImageProtocol::Iterm => "",
            ImageProtocol::Kitty => "\x1b_Ga=d\x1b\\",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ImageProtocol::Iterm => "iterm",
            ImageProtocol::Kitty => "kitty",
        }
    }
}

/// iTerm2 inline image: `ESC ] 1337 ; File=... : <base64> BEL`.
pub fn iterm_sequence(image: &InlineImage) -> String {
    format!(
        "\x1b]1337;File=inline=1;size={};width={};height={};preserveAspectRatio=1:{}\x07",
        image.png.len(),
        image.columns,
        image.rows,
        BASE64.encode(&image.png)
    )
}

/// kitty graphics: transmit-and-display a PNG, split into chunks.
pub fn kitty_sequence(image: &InlineImage) -> String {
    let payload = BASE64.encode(&image.png);
    let chunks: Vec<&[u8]> = payload.as_bytes().chunks(KITTY_CHUNK_SIZE).collect();
    let mut out = String::with_capacity(payload.len() + chunks.len() * 32);

    if chunks.is_empty() {
        return out;
    }

    let last = chunks.len() - 1;
    for (i, chunk) in chunks.iter().enumerate() {
        let more = if i < last { 1 } else { 0 };
        // base64 output is ASCII
        let chunk = String::from_utf8_lossy(chunk);
        if i == 0 {
            out.push_str(&format!(
                "\x1b_Ga=T,f=100,c={},r={},m={};{}\x1b\\",
                image.columns, image.rows, more, chunk
            ));
        } else {
            out.push_str(&format!("\x1b_Gm={};{}\x1b\\", more, chunk));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with_png(png: Vec<u8>) -> InlineImage {
        InlineImage {
            png,
            pixel_width: 16,
            pixel_height: 8,
            columns: 64,
            rows: 16,
            leading_newlines: 3,
        }
    }

    #[test]
    fn test_iterm_sequence() {
        let seq = iterm_sequence(&image_with_png(b"abc".to_vec()));
        assert!(seq.starts_with("\x1b]1337;File=inline=1;size=3;width=64;height=16"));
        assert!(seq.ends_with(":YWJj\x07"));
    }

    #[test]
    fn test_kitty_sequence_single_chunk() {
        let seq = kitty_sequence(&image_with_png(b"abc".to_vec()));
        assert_eq!(seq, "\x1b_Ga=T,f=100,c=64,r=16,m=0;YWJj\x1b\\");
    }

    #[test]
    fn test_kitty_sequence_chunked() {
        // 6000 bytes -> 8000 base64 chars -> 2 chunks
        let seq = kitty_sequence(&image_with_png(vec![0u8; 6000]));
        assert_eq!(seq.matches("\x1b_G").count(), 2);
        assert!(seq.contains("m=1;"));
        assert!(seq.contains("\x1b_Gm=0;"));
    }

    #[test]
    fn test_kitty_sequence_empty() {
        assert_eq!(kitty_sequence(&image_with_png(Vec::new())), "");
    }

    #[test]
    fn test_protocol_encode_dispatch() {
        let image = image_with_png(b"abc".to_vec());
        assert!(ImageProtocol::Iterm.encode(&image).starts_with("\x1b]1337"));
        assert!(ImageProtocol::Kitty.encode(&image).starts_with("\x1b_G"));
    }

    #[test]
    fn test_protocol_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            protocol: ImageProtocol,
        }
        let w: Wrapper = toml::from_str("protocol = \"kitty\"").unwrap();
        assert_eq!(w.protocol, ImageProtocol::Kitty);
    }
}

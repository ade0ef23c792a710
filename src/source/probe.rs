//! Stream metadata lookup via `ffprobe`.

use serde::Deserialize;
use std::process::{Command, Stdio};

use super::types::{SourceError, VideoInfo};

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    /// Display matrix side data (current ffprobe)
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    /// `rotate` tag (older ffprobe)
    #[serde(default)]
    tags: ProbeTags,
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct ProbeTags {
    rotate: Option<String>,
}

impl ProbeStream {
    /// Rotation in degrees, from side data or the legacy tag.
    fn rotation(&self) -> f64 {
        self.side_data_list
            .iter()
            .find_map(|d| d.rotation)
            .or_else(|| self.tags.rotate.as_deref().and_then(|r| r.trim().parse().ok()))
            .unwrap_or(0.0)
    }
}

/// Run ffprobe against `input` and return the first video stream's metadata.
pub fn probe_video(input: &str) -> Result<VideoInfo, SourceError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,avg_frame_rate,r_frame_rate:stream_side_data=rotation:stream_tags=rotate",
            "-of",
            "json",
            input,
        ])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::FfmpegNotFound
            } else {
                SourceError::Io(e)
            }
        })?;

    if !output.status.success() {
        return Err(SourceError::ProbeFailed {
            input: input.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    parse_probe_output(input, &String::from_utf8_lossy(&output.stdout))
}

/// Parse ffprobe's JSON output.
///
/// ffprobe reports coded dimensions, while ffmpeg autorotates when decoding,
/// so width and height are swapped for streams rotated by ±90°.
pub fn parse_probe_output(input: &str, json: &str) -> Result<VideoInfo, SourceError> {
    let parsed: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| SourceError::InvalidMetadata(format!("unreadable ffprobe output: {}", e)))?;

    let stream = parsed
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::NoVideoStream(input.to_string()))?;

    let quarter_turns = (stream.rotation() / 90.0).round() as i64;
    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 && quarter_turns % 2 != 0 => (h, w),
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        (w, h) => {
            return Err(SourceError::InvalidMetadata(format!(
                "bad dimensions {:?}x{:?}",
                w, h
            )))
        }
    };

    // avg_frame_rate is 0/0 for some containers; fall back to r_frame_rate
    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_rational)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_rational))
        .ok_or_else(|| SourceError::InvalidMetadata("missing frame rate".to_string()))?;

    Ok(VideoInfo { width, height, fps })
}

/// Parse an ffprobe rational like `30000/1001`. Zero or malformed rates yield `None`.
fn parse_rational(s: &str) -> Option<f64> {
    let (num, den) = match s.split_once('/') {
        Some((n, d)) => (n.trim().parse::<f64>().ok()?, d.trim().parse::<f64>().ok()?),
        None => (s.trim().parse::<f64>().ok()?, 1.0),
    };
    if num <= 0.0 || den <= 0.0 {
        return None;
    }
    let rate = num / den;
    rate.is_finite().then_some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rational() {
        assert_eq!(parse_rational("30/1"), Some(30.0));
        assert_eq!(parse_rational("25"), Some(25.0));
        let ntsc = parse_rational("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
        assert_eq!(parse_rational("0/0"), None);
        assert_eq!(parse_rational("abc"), None);
    }

    #[test]
    fn test_parse_probe_output() {
        let json = r#"{
            "programs": [],
            "streams": [
                { "width": 1920, "height": 1080, "r_frame_rate": "30/1", "avg_frame_rate": "30/1" }
            ]
        }"#;
        let info = parse_probe_output("clip.mp4", json).unwrap();
        assert_eq!(info.width, 1920);
        assert_eq!(info.height, 1080);
        assert_eq!(info.fps, 30.0);
    }

    #[test]
    fn test_parse_probe_output_falls_back_to_r_frame_rate() {
        let json = r#"{"streams": [{ "width": 640, "height": 480, "avg_frame_rate": "0/0", "r_frame_rate": "24/1" }]}"#;
        let info = parse_probe_output("clip.webm", json).unwrap();
        assert_eq!(info.fps, 24.0);
    }

    #[test]
    fn test_parse_probe_output_portrait_display_matrix() {
        let json = r#"{"streams": [{
            "width": 1920, "height": 1080, "avg_frame_rate": "30/1",
            "side_data_list": [{ "side_data_type": "Display Matrix", "displaymatrix": "...", "rotation": -90 }]
        }]}"#;
        let info = parse_probe_output("phone.mov", json).unwrap();
        assert_eq!((info.width, info.height), (1080, 1920));
    }

    #[test]
    fn test_parse_probe_output_rotate_tag() {
        let json = r#"{"streams": [{
            "width": 1280, "height": 720, "r_frame_rate": "25/1",
            "tags": { "rotate": "270" }
        }]}"#;
        let info = parse_probe_output("old.mp4", json).unwrap();
        assert_eq!((info.width, info.height), (720, 1280));
    }

    #[test]
    fn test_parse_probe_output_upside_down_keeps_dimensions() {
        let json = r#"{"streams": [{
            "width": 1920, "height": 1080, "r_frame_rate": "30/1",
            "side_data_list": [{ "rotation": 180 }]
        }]}"#;
        let info = parse_probe_output("flipped.mp4", json).unwrap();
        assert_eq!((info.width, info.height), (1920, 1080));
    }

    #[test]
    fn test_parse_probe_output_no_streams() {
        let json = r#"{"streams": []}"#;
        match parse_probe_output("song.mp3", json) {
            Err(SourceError::NoVideoStream(input)) => assert_eq!(input, "song.mp3"),
            other => panic!("Expected NoVideoStream, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_probe_output_zero_dimensions() {
        let json = r#"{"streams": [{ "width": 0, "height": 0, "r_frame_rate": "30/1" }]}"#;
        assert!(matches!(
            parse_probe_output("x.mp4", json),
            Err(SourceError::InvalidMetadata(_))
        ));
    }

    #[test]
    fn test_parse_probe_output_garbage() {
        assert!(matches!(
            parse_probe_output("x.mp4", "not json"),
            Err(SourceError::InvalidMetadata(_))
        ));
    }
}

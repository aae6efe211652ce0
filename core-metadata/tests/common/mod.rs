//! Shared fixtures for core-metadata integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// 100 ms of 8 kHz mono 16-bit silence
const SILENCE_BYTES: usize = 1600;

fn push_chunk(out: &mut Vec<u8>, id: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(id);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        out.push(0);
    }
}

/// Build a PCM WAV file carrying the given RIFF INFO tags
///
/// Passing no tags omits the LIST chunk entirely.
pub fn wav_with_info(tags: &[(&[u8; 4], &str)]) -> Vec<u8> {
    let mut fmt = Vec::new();
    fmt.extend_from_slice(&1u16.to_le_bytes()); // PCM
    fmt.extend_from_slice(&1u16.to_le_bytes()); // channels
    fmt.extend_from_slice(&8000u32.to_le_bytes()); // sample rate
    fmt.extend_from_slice(&16000u32.to_le_bytes()); // byte rate
    fmt.extend_from_slice(&2u16.to_le_bytes()); // block align
    fmt.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    let mut info = b"INFO".to_vec();
    for (id, value) in tags {
        let mut text = value.as_bytes().to_vec();
        text.push(0);
        push_chunk(&mut info, id, &text);
    }

    let mut body = b"WAVE".to_vec();
    push_chunk(&mut body, b"fmt ", &fmt);
    if !tags.is_empty() {
        push_chunk(&mut body, b"LIST", &info);
    }
    push_chunk(&mut body, b"data", &vec![0u8; SILENCE_BYTES]);

    let mut riff = b"RIFF".to_vec();
    riff.extend_from_slice(&(body.len() as u32).to_le_bytes());
    riff.extend_from_slice(&body);
    riff
}

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, joint stereo, no CRC or padding
const MPEG_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];
/// 144 * 128000 / 44100, rounded down
const MPEG_FRAME_LEN: usize = 417;

fn synchsafe(value: usize) -> [u8; 4] {
    let value = value as u32;
    [
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ]
}

/// Build an ID3v2.4 tag with UTF-8 text frames
pub fn id3v2_tag(frames: &[(&[u8; 4], &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (id, value) in frames {
        let mut content = vec![3u8]; // UTF-8
        content.extend_from_slice(value.as_bytes());
        body.extend_from_slice(*id);
        body.extend_from_slice(&synchsafe(content.len()));
        body.extend_from_slice(&[0, 0]);
        body.extend_from_slice(&content);
    }

    let mut tag = b"ID3".to_vec();
    tag.extend_from_slice(&[4, 0, 0]);
    tag.extend_from_slice(&synchsafe(body.len()));
    tag.extend_from_slice(&body);
    tag
}

/// Build an MP3 file: an ID3v2 tag followed by silent MPEG frames
pub fn mp3_with_id3(frames: &[(&[u8; 4], &str)]) -> Vec<u8> {
    let mut out = id3v2_tag(frames);
    for _ in 0..40 {
        let mut frame = vec![0u8; MPEG_FRAME_LEN];
        frame[..4].copy_from_slice(&MPEG_FRAME_HEADER);
        out.extend_from_slice(&frame);
    }
    out
}

fn push_flac_block(out: &mut Vec<u8>, block_type: u8, last: bool, payload: &[u8]) {
    out.push(if last { 0x80 | block_type } else { block_type });
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes()[1..]);
    out.extend_from_slice(payload);
}

/// Build a FLAC stream header: one second of 44.1 kHz 16-bit stereo
/// STREAMINFO followed by the given Vorbis comments
pub fn flac_with_comments(comments: &[(&str, &str)]) -> Vec<u8> {
    let mut streaminfo = Vec::new();
    streaminfo.extend_from_slice(&4096u16.to_be_bytes()); // min block size
    streaminfo.extend_from_slice(&4096u16.to_be_bytes()); // max block size
    streaminfo.extend_from_slice(&[0; 3]); // min frame size
    streaminfo.extend_from_slice(&[0; 3]); // max frame size
    let packed: u64 = (44_100u64 << 44) | (1 << 41) | (15 << 36) | 44_100;
    streaminfo.extend_from_slice(&packed.to_be_bytes());
    streaminfo.extend_from_slice(&[0; 16]); // md5

    let vendor = b"songinfo";
    let mut vorbis = Vec::new();
    vorbis.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    vorbis.extend_from_slice(vendor);
    vorbis.extend_from_slice(&(comments.len() as u32).to_le_bytes());
    for (key, value) in comments {
        let field = format!("{}={}", key, value);
        vorbis.extend_from_slice(&(field.len() as u32).to_le_bytes());
        vorbis.extend_from_slice(field.as_bytes());
    }

    let mut out = b"fLaC".to_vec();
    push_flac_block(&mut out, 0, false, &streaminfo);
    push_flac_block(&mut out, 4, true, &vorbis);
    out
}

/// Provider transport routed by endpoint host
///
/// - `ok-<text>.test` answers with `<text>` as completion
/// - `malformed.test` answers 200 without a completions list
/// - `down.test` fails at the transport
/// - `slow.test` answers after ten seconds
/// - anything else answers 500
pub struct ScriptedProviders {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedProviders {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn host(url: &str) -> &str {
        url.trim_start_matches("https://")
            .split('/')
            .next()
            .unwrap_or_default()
    }
}

#[async_trait]
impl HttpClient for ScriptedProviders {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        // Hold every call open briefly so overlap is observable
        tokio::time::sleep(Duration::from_millis(50)).await;

        let host = Self::host(&request.url).to_string();
        let response = if let Some(text) = host
            .strip_prefix("ok-")
            .and_then(|rest| rest.strip_suffix(".test"))
        {
            let body = serde_json::json!({ "choices": [{ "text": text.replace('_', " ") }] });
            Ok(HttpResponse::new(200, body.to_string()))
        } else if host == "malformed.test" {
            Ok(HttpResponse::new(
                200,
                r#"{"id":"cmpl-1","object":"text_completion"}"#,
            ))
        } else if host == "down.test" {
            Err(BridgeError::OperationFailed("connection reset".to_string()))
        } else if host == "slow.test" {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(HttpResponse::new(
                200,
                r#"{"choices":[{"text":"too late"}]}"#,
            ))
        } else {
            Ok(HttpResponse::new(500, "internal error"))
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        response
    }
}

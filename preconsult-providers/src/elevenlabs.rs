use crate::request::{Body, HttpRequest};
use serde_json::json;

/// Default voice and model for spoken questions.
pub const DEFAULT_VOICE_ID: &str = "h061KGyOtpLYDxcoi8E3";
pub const DEFAULT_TTS_MODEL: &str = "eleven_multilingual_v2";

pub const STT_MODEL: &str = "scribe_v1";

#[derive(Clone, PartialEq, Eq)]
pub struct ElevenLabsTtsConfig {
    pub api_key: String,
    pub voice_id: String,
    pub model_id: String,
}

impl std::fmt::Debug for ElevenLabsTtsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevenLabsTtsConfig")
            .field("api_key", &"[REDACTED]")
            .field("voice_id", &self.voice_id)
            .field("model_id", &self.model_id)
            .finish()
    }
}

impl ElevenLabsTtsConfig {
    pub fn with_defaults(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            voice_id: DEFAULT_VOICE_ID.into(),
            model_id: DEFAULT_TTS_MODEL.into(),
        }
    }
}

/// Builds a synthesis request; the response body is MP3 audio.
pub fn build_tts_request(cfg: &ElevenLabsTtsConfig, text: &str) -> HttpRequest {
    let payload = json!({
        "text": text,
        "model_id": cfg.model_id,
    });

    HttpRequest {
        url: format!("https://api.elevenlabs.io/v1/text-to-speech/{}", cfg.voice_id),
        headers: vec![
            ("Content-Type".into(), "application/json".into()),
            ("Accept".into(), "audio/mpeg".into()),
            ("xi-api-key".into(), cfg.api_key.clone()),
        ],
        body: Body::Json(payload.to_string()),
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ElevenLabsSttConfig {
    pub api_key: String,
    pub model_id: String,
}

impl std::fmt::Debug for ElevenLabsSttConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevenLabsSttConfig")
            .field("api_key", &"[REDACTED]")
            .field("model_id", &self.model_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Builds a multipart transcription request for a captured answer clip.
pub fn build_stt_request(cfg: &ElevenLabsSttConfig, audio: &AudioFile) -> HttpRequest {
    let boundary = format!("Boundary-{}", uuid::Uuid::new_v4());

    let mut body: Vec<u8> = Vec::new();

    append_file(
        &mut body,
        &boundary,
        "file",
        &audio.filename,
        &audio.mime_type,
        &audio.bytes,
    );
    append_field(&mut body, &boundary, "model_id", &cfg.model_id);
    append_field(&mut body, &boundary, "temperature", "0.0");
    // Intake answers are short single-speaker utterances.
    append_field(&mut body, &boundary, "timestamps_granularity", "none");
    append_field(&mut body, &boundary, "diarize", "false");
    append_field(&mut body, &boundary, "tag_audio_events", "false");

    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    HttpRequest {
        url: "https://api.elevenlabs.io/v1/speech-to-text".into(),
        headers: vec![
            (
                "Content-Type".into(),
                format!("multipart/form-data; boundary={}", boundary),
            ),
            ("Accept".into(), "application/json".into()),
            ("xi-api-key".into(), cfg.api_key.clone()),
        ],
        body: Body::MultipartFormData {
            boundary,
            bytes: body,
        },
    }
}

fn append_field(body: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}

fn append_file(
    body: &mut Vec<u8>,
    boundary: &str,
    name: &str,
    filename: &str,
    mime_type: &str,
    bytes: &[u8],
) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
}

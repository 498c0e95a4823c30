use async_trait::async_trait;
use preconsult_core::answer::CaptureFailure;
use preconsult_engine::traits::SpeechInput;
use preconsult_providers::elevenlabs::{
    AudioFile, ElevenLabsSttConfig, STT_MODEL, build_stt_request,
};
use preconsult_providers::parse::parse_transcription;
use preconsult_providers::runtime::execute;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

/// A captured answer clip, ready for transcription upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Records one answer from the microphone.
#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Records within the listening `window`, capped at `max_phrase` per
    /// utterance. `Ok(None)` means nothing audible was heard.
    async fn record(
        &self,
        window: Duration,
        max_phrase: Duration,
    ) -> anyhow::Result<Option<AudioClip>>;
}

/// Turns a recorded clip into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, clip: &AudioClip) -> anyhow::Result<String>;
}

/// Picks the recording command for this platform: 16 kHz mono signed
/// 16-bit WAV, bounded to `secs` seconds.
pub fn recorder_command(os: &str, path: &Path, secs: u64) -> Option<(&'static str, Vec<String>)> {
    let path = path.display().to_string();
    match os {
        "linux" => Some((
            "arecord",
            vec![
                "-q".into(),
                "-f".into(),
                "S16_LE".into(),
                "-r".into(),
                "16000".into(),
                "-c".into(),
                "1".into(),
                "-d".into(),
                secs.to_string(),
                path,
            ],
        )),
        "macos" => Some((
            "sox",
            vec![
                "-q".into(),
                "-d".into(),
                "-r".into(),
                "16000".into(),
                "-c".into(),
                "1".into(),
                "-b".into(),
                "16".into(),
                path,
                "trim".into(),
                "0".into(),
                secs.to_string(),
            ],
        )),
        _ => None,
    }
}

// Peak threshold for "somebody actually spoke", on 16-bit samples.
const AUDIBLE_PEAK: i16 = 500;

/// Scans a 16-bit PCM WAV payload for any sample above the noise floor.
pub fn has_audible_signal(wav: &[u8]) -> bool {
    if wav.len() <= 44 {
        return false;
    }
    wav[44..]
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .any(|s| s.saturating_abs() > AUDIBLE_PEAK)
}

/// Microphone capture via the platform's recording command. The clip is
/// staged in a temp file that is removed when recording finishes.
#[derive(Debug, Default)]
pub struct CommandAudioSource;

#[async_trait]
impl AudioSource for CommandAudioSource {
    async fn record(
        &self,
        window: Duration,
        max_phrase: Duration,
    ) -> anyhow::Result<Option<AudioClip>> {
        let staging = tempfile::Builder::new().suffix(".wav").tempfile()?;
        let secs = window.min(max_phrase).as_secs().max(1);

        let (program, args) = recorder_command(std::env::consts::OS, staging.path(), secs)
            .ok_or_else(|| anyhow::anyhow!("no audio recorder for this platform"))?;

        let status = Command::new(program).args(&args).status().await?;
        if !status.success() {
            return Err(anyhow::anyhow!("{program} exited with {status}"));
        }

        let bytes = tokio::fs::read(staging.path()).await?;
        if !has_audible_signal(&bytes) {
            return Ok(None);
        }

        Ok(Some(AudioClip {
            filename: "answer.wav".into(),
            mime_type: "audio/wav".into(),
            bytes,
        }))
    }
}

/// Cloud transcription of answer clips.
pub struct ElevenLabsTranscriber {
    cfg: ElevenLabsSttConfig,
}

impl ElevenLabsTranscriber {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            cfg: ElevenLabsSttConfig {
                api_key: api_key.into(),
                model_id: STT_MODEL.into(),
            },
        }
    }
}

impl std::fmt::Debug for ElevenLabsTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevenLabsTranscriber")
            .field("cfg", &self.cfg)
            .finish()
    }
}

#[async_trait]
impl Transcriber for ElevenLabsTranscriber {
    async fn transcribe(&self, clip: &AudioClip) -> anyhow::Result<String> {
        let req = build_stt_request(
            &self.cfg,
            &AudioFile {
                filename: clip.filename.clone(),
                mime_type: clip.mime_type.clone(),
                bytes: clip.bytes.clone(),
            },
        );

        let resp = execute(&req).await?;
        if !(200..=299).contains(&resp.status) {
            return Err(anyhow::anyhow!(
                "transcription failed: status={} body={}",
                resp.status,
                String::from_utf8_lossy(&resp.body)
            ));
        }

        parse_transcription(&resp.body)
    }
}

// Ambient-noise settle before recording, and the per-utterance cap
// independent of the outer listening window.
const SETTLE_DELAY: Duration = Duration::from_millis(500);
const MAX_PHRASE: Duration = Duration::from_secs(8);

/// The live speech-input path: settle, record, then transcribe.
///
/// Each failure mode maps to its own capture failure so the record shows
/// whether the patient stayed silent, the microphone broke, or the service
/// was down. Empty transcripts pass through; normalization downstream
/// turns them into unrecognized answers.
pub struct MicSpeechInput {
    source: Arc<dyn AudioSource>,
    transcriber: Arc<dyn Transcriber>,
}

impl MicSpeechInput {
    pub fn new(source: Arc<dyn AudioSource>, transcriber: Arc<dyn Transcriber>) -> Self {
        Self {
            source,
            transcriber,
        }
    }
}

#[async_trait]
impl SpeechInput for MicSpeechInput {
    async fn listen(&self, timeout: Duration) -> Result<String, CaptureFailure> {
        tokio::time::sleep(SETTLE_DELAY).await;

        let clip = match self.source.record(timeout, MAX_PHRASE).await {
            Ok(Some(clip)) => clip,
            Ok(None) => return Err(CaptureFailure::NoResponseTimeout),
            Err(e) => {
                log::warn!("microphone capture failed: {e:#}");
                return Err(CaptureFailure::DeviceError);
            }
        };

        match self.transcriber.transcribe(&clip).await {
            Ok(text) => Ok(text),
            Err(e) => {
                log::warn!("transcription failed: {e:#}");
                Err(CaptureFailure::ServiceError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(anyhow::Result<Option<AudioClip>>);

    #[async_trait]
    impl AudioSource for FixedSource {
        async fn record(
            &self,
            _window: Duration,
            _max_phrase: Duration,
        ) -> anyhow::Result<Option<AudioClip>> {
            match &self.0 {
                Ok(clip) => Ok(clip.clone()),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    struct FixedTranscriber(anyhow::Result<String>);

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, _clip: &AudioClip) -> anyhow::Result<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    fn clip() -> AudioClip {
        AudioClip {
            filename: "answer.wav".into(),
            mime_type: "audio/wav".into(),
            bytes: vec![0; 64],
        }
    }

    fn input(
        source: FixedSource,
        transcriber: FixedTranscriber,
    ) -> MicSpeechInput {
        MicSpeechInput::new(Arc::new(source), Arc::new(transcriber))
    }

    #[tokio::test]
    async fn transcript_passes_through() {
        let mic = input(
            FixedSource(Ok(Some(clip()))),
            FixedTranscriber(Ok("about two weeks".into())),
        );
        assert_eq!(
            mic.listen(Duration::from_secs(8)).await,
            Ok("about two weeks".into())
        );
    }

    #[tokio::test]
    async fn silence_maps_to_no_response_timeout() {
        let mic = input(
            FixedSource(Ok(None)),
            FixedTranscriber(Ok("unused".into())),
        );
        assert_eq!(
            mic.listen(Duration::from_secs(8)).await,
            Err(CaptureFailure::NoResponseTimeout)
        );
    }

    #[tokio::test]
    async fn recorder_failure_maps_to_device_error() {
        let mic = input(
            FixedSource(Err(anyhow::anyhow!("no microphone"))),
            FixedTranscriber(Ok("unused".into())),
        );
        assert_eq!(
            mic.listen(Duration::from_secs(8)).await,
            Err(CaptureFailure::DeviceError)
        );
    }

    #[tokio::test]
    async fn transcriber_failure_maps_to_service_error() {
        let mic = input(
            FixedSource(Ok(Some(clip()))),
            FixedTranscriber(Err(anyhow::anyhow!("503"))),
        );
        assert_eq!(
            mic.listen(Duration::from_secs(8)).await,
            Err(CaptureFailure::ServiceError)
        );
    }

    #[test]
    fn silent_wav_has_no_audible_signal() {
        let mut wav = vec![0u8; 44];
        wav.extend(std::iter::repeat_n(0u8, 3200));
        assert!(!has_audible_signal(&wav));
    }

    #[test]
    fn loud_sample_is_audible() {
        let mut wav = vec![0u8; 44];
        wav.extend_from_slice(&2000i16.to_le_bytes());
        assert!(has_audible_signal(&wav));
    }

    #[test]
    fn recorder_commands_bound_the_duration() {
        let path = std::path::PathBuf::from("/tmp/answer.wav");
        let (program, args) = recorder_command("linux", &path, 8).unwrap();
        assert_eq!(program, "arecord");
        assert!(args.windows(2).any(|w| w == ["-d", "8"]));
        assert!(recorder_command("windows", &path, 8).is_none());
    }
}

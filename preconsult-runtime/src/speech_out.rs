use async_trait::async_trait;
use preconsult_engine::traits::SpeechBackend;
use preconsult_providers::elevenlabs::{ElevenLabsTtsConfig, build_tts_request};
use preconsult_providers::runtime::execute;
use std::path::Path;
use tokio::process::Command;

/// Picks the audio player for a synthesized MP3 on this platform.
pub fn player_command(os: &str, path: &Path) -> Option<(&'static str, Vec<String>)> {
    let path = path.display().to_string();
    match os {
        "macos" => Some(("afplay", vec![path])),
        "linux" => Some(("mpg123", vec!["-q".into(), path])),
        "windows" => Some((
            "powershell",
            vec![
                "-NoProfile".into(),
                "-Command".into(),
                format!("(New-Object Media.SoundPlayer '{path}').PlaySync()"),
            ],
        )),
        _ => None,
    }
}

/// Picks the built-in speech synthesizer command for this platform.
pub fn synth_command(os: &str, text: &str) -> Option<(&'static str, Vec<String>)> {
    match os {
        "macos" => Some(("say", vec![text.to_string()])),
        "linux" => Some(("espeak", vec![text.to_string()])),
        "windows" => {
            let escaped = text.replace('\'', "''");
            Some((
                "powershell",
                vec![
                    "-NoProfile".into(),
                    "-Command".into(),
                    format!(
                        "Add-Type -AssemblyName System.Speech; \
                         (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak('{escaped}')"
                    ),
                ],
            ))
        }
        _ => None,
    }
}

async fn run_to_completion(program: &str, args: &[String]) -> anyhow::Result<()> {
    let status = Command::new(program).args(args).status().await?;
    if !status.success() {
        return Err(anyhow::anyhow!("{program} exited with {status}"));
    }
    Ok(())
}

/// Primary speech tier: ElevenLabs synthesis played through a local audio
/// player. The MP3 lives in a temp file only for the duration of playback.
pub struct ElevenLabsSpeaker {
    cfg: ElevenLabsTtsConfig,
}

impl ElevenLabsSpeaker {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            cfg: ElevenLabsTtsConfig::with_defaults(api_key),
        }
    }
}

impl std::fmt::Debug for ElevenLabsSpeaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevenLabsSpeaker")
            .field("cfg", &self.cfg)
            .finish()
    }
}

#[async_trait]
impl SpeechBackend for ElevenLabsSpeaker {
    fn name(&self) -> &'static str {
        "elevenlabs"
    }

    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        let req = build_tts_request(&self.cfg, text);
        let resp = execute(&req).await?;
        if !(200..=299).contains(&resp.status) {
            return Err(anyhow::anyhow!(
                "TTS request failed: status={} body={}",
                resp.status,
                String::from_utf8_lossy(&resp.body)
            ));
        }

        let clip = tempfile::Builder::new().suffix(".mp3").tempfile()?;
        tokio::fs::write(clip.path(), &resp.body).await?;

        let (program, args) = player_command(std::env::consts::OS, clip.path())
            .ok_or_else(|| anyhow::anyhow!("no audio player for this platform"))?;
        run_to_completion(program, &args).await
    }
}

/// Secondary speech tier: the operating system's own synthesizer, no
/// network involved.
#[derive(Debug, Default)]
pub struct CommandSpeaker;

#[async_trait]
impl SpeechBackend for CommandSpeaker {
    fn name(&self) -> &'static str {
        "system-tts"
    }

    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        let (program, args) = synth_command(std::env::consts::OS, text)
            .ok_or_else(|| anyhow::anyhow!("no speech synthesizer for this platform"))?;
        run_to_completion(program, &args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn player_commands_cover_supported_platforms() {
        let path = PathBuf::from("/tmp/q.mp3");
        assert_eq!(player_command("macos", &path).unwrap().0, "afplay");
        assert_eq!(player_command("linux", &path).unwrap().0, "mpg123");
        assert_eq!(player_command("windows", &path).unwrap().0, "powershell");
        assert!(player_command("freebsd", &path).is_none());
    }

    #[test]
    fn synth_command_escapes_windows_quotes() {
        let (program, args) = synth_command("windows", "What's your age?").unwrap();
        assert_eq!(program, "powershell");
        assert!(args.last().unwrap().contains("What''s your age?"));
    }

    #[test]
    fn synth_command_passes_text_verbatim_on_unix() {
        let (_, args) = synth_command("macos", "How long?").unwrap();
        assert_eq!(args, vec!["How long?".to_string()]);
    }
}

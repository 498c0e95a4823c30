use preconsult_engine::orchestrator::{Orchestrator, OrchestratorConfig};
use preconsult_engine::traits::{InsightBackend, SpeechBackend, SpeechInput};
use preconsult_runtime::insight::GroqInsightBackend;
use preconsult_runtime::scripted::{ConsoleSpeaker, ScriptedSpeechInput};
use preconsult_runtime::secrets;
use preconsult_runtime::speech_in::{CommandAudioSource, ElevenLabsTranscriber, MicSpeechInput};
use preconsult_runtime::speech_out::{CommandSpeaker, ElevenLabsSpeaker};
use std::sync::Arc;
use std::time::Duration;

/// Pipe-separated scripted answers; setting it runs the consultation
/// without a microphone: PRECONSULT_ANSWERS="35|engineer|two weeks|..."
const ANSWERS_ENV: &str = "PRECONSULT_ANSWERS";

fn scripted_answers() -> Option<Vec<String>> {
    let raw = std::env::var(ANSWERS_ENV).ok()?;
    Some(raw.split('|').map(|s| s.trim().to_string()).collect())
}

struct Assembly {
    backends: Vec<Arc<dyn SpeechBackend>>,
    input: Arc<dyn SpeechInput>,
    cfg: OrchestratorConfig,
    mode: &'static str,
}

fn assemble() -> anyhow::Result<Assembly> {
    if let Some(answers) = scripted_answers() {
        return Ok(Assembly {
            backends: vec![Arc::new(ConsoleSpeaker)],
            input: Arc::new(ScriptedSpeechInput::new(answers)),
            cfg: OrchestratorConfig {
                prepare_delay: Duration::from_millis(200),
                listen_timeout: Duration::from_millis(200),
                between_questions: Duration::from_millis(200),
                ..OrchestratorConfig::default()
            },
            mode: "scripted",
        });
    }

    let Some(elevenlabs_key) = secrets::elevenlabs_api_key() else {
        anyhow::bail!(
            "live mode needs {} for speech capture; \
             set {} to run with scripted answers instead",
            secrets::ELEVENLABS_API_KEY_ENV,
            ANSWERS_ENV,
        );
    };

    let backends: Vec<Arc<dyn SpeechBackend>> = vec![
        Arc::new(ElevenLabsSpeaker::new(elevenlabs_key.clone())),
        Arc::new(CommandSpeaker),
    ];
    let input = Arc::new(MicSpeechInput::new(
        Arc::new(CommandAudioSource),
        Arc::new(ElevenLabsTranscriber::new(elevenlabs_key)),
    ));

    Ok(Assembly {
        backends,
        input,
        cfg: OrchestratorConfig::default(),
        mode: "live",
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let insight: Option<Arc<dyn InsightBackend>> = match secrets::groq_api_key() {
        Some(key) => Some(Arc::new(GroqInsightBackend::new(key))),
        None => None,
    };

    let assembly = assemble()?;

    println!("============================================");
    println!(" PRE-CONSULTATION MEDICAL ASSISTANT");
    println!("============================================");
    println!(
        " Speech:      {} ({} tier{})",
        assembly.mode,
        assembly.backends.len(),
        if assembly.backends.len() == 1 { "" } else { "s" },
    );
    println!(
        " AI analysis: {}",
        if insight.is_some() {
            "enabled"
        } else {
            "disabled (basic mode; set GROQ_API_KEY to enable)"
        },
    );
    println!("============================================\n");

    let orchestrator = Orchestrator::new(assembly.backends, assembly.input, insight, assembly.cfg);
    let total = orchestrator.question_count();
    log::info!("starting consultation with {total} questions");

    let started = orchestrator.start().await;
    println!("{}\n", started.body);

    let mut last_progress = String::new();
    loop {
        tokio::time::sleep(Duration::from_millis(500)).await;

        if orchestrator.status().await.is_terminal() {
            let view = orchestrator.poll().await;
            println!("\n{}\n", view.title);
            println!("{}", view.body);
            break;
        }

        let view = orchestrator.poll().await;
        if view.progress != last_progress {
            println!("  {}", view.progress);
            last_progress = view.progress.clone();
        }
    }

    Ok(())
}

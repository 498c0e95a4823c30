pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const ELEVENLABS_API_KEY_ENV: &str = "ELEVENLABS_API_KEY";

fn env_secret(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Key for the insight model. `None` puts the consultation in basic mode.
pub fn groq_api_key() -> Option<String> {
    env_secret(GROQ_API_KEY_ENV)
}

/// Key for ElevenLabs speech. `None` drops that tier from the fallback
/// chain.
pub fn elevenlabs_api_key() -> Option<String> {
    env_secret(ELEVENLABS_API_KEY_ENV)
}

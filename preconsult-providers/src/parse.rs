use anyhow::{Context, anyhow};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

pub fn parse_chat_completion(body: &[u8]) -> anyhow::Result<String> {
    let resp: ChatResponse = serde_json::from_slice(body).context("decode chat JSON")?;
    let content = resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| anyhow!("no content in chat completion response"))?;
    Ok(content)
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

pub fn parse_transcription(body: &[u8]) -> anyhow::Result<String> {
    let resp: TranscriptionResponse =
        serde_json::from_slice(body).context("decode transcription JSON")?;
    Ok(resp.text)
}

use crate::request::{Body, HttpRequest};
use anyhow::Context;
use std::time::Duration;

// The consultation loop depends on every network call having an upper
// bound; a stalled endpoint must not outlive the per-question budget.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

pub async fn execute(req: &HttpRequest) -> anyhow::Result<HttpResponse> {
    let client = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("build http client")?;

    let mut builder = client.post(&req.url);
    for (name, value) in &req.headers {
        builder = builder.header(name, value);
    }

    let payload = match &req.body {
        Body::Json(s) => s.clone().into_bytes(),
        Body::MultipartFormData { bytes, .. } => bytes.clone(),
    };

    let resp = builder
        .body(payload)
        .send()
        .await
        .with_context(|| format!("request to {} failed", req.url))?;

    let status = resp.status().as_u16();
    let body = resp
        .bytes()
        .await
        .context("failed reading response body")?
        .to_vec();

    Ok(HttpResponse { status, body })
}

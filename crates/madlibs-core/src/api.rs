//! HTTP client for the MadLibs backend.
//!
//! Three JSON-over-POST operations drive a session (template generation,
//! madlib submission, image generation), plus a health probe. The backend
//! owns all story/image generation; this client only moves JSON and resolves
//! the returned image path against the base address.

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

/// Standard User-Agent header for madlibs API requests.
pub const USER_AGENT: &str = concat!("madlibs/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Wire types
// ============================================================================

/// A fill-in-the-blank story skeleton returned by the backend.
///
/// `template` contains `{label}` blank markers; `word_types` lists the blank
/// labels in story order (duplicates allowed).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    pub template_id: String,
    pub template: String,
    pub word_types: Vec<String>,
    pub topic: String,
}

/// The completed story plus metadata for illustration generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletedMadLib {
    pub madlib_id: String,
    pub completed_text: String,
    pub comic_prompt: String,
    pub panel_suggestions: String,
}

/// Backend health report.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub api_key_configured: bool,
    pub templates_count: u64,
    pub madlibs_count: u64,
}

#[derive(Debug, Serialize)]
struct TopicRequest<'a> {
    topic: &'a str,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    template_id: &'a str,
    user_inputs: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    madlib_id: &'a str,
}

/// The backend also returns `madlib_id` and `status` here; only the URL is used.
#[derive(Debug, Deserialize)]
struct ImageResponse {
    image_url: String,
}

// ============================================================================
// Client
// ============================================================================

/// MadLibs backend client.
#[derive(Debug, Clone)]
pub struct MadLibsClient {
    base_url: String,
    http: reqwest::Client,
}

impl MadLibsClient {
    /// Creates a client for the given base address.
    ///
    /// The base address should not end with a slash (see
    /// `config::resolve_base_url`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Returns the configured base address.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests a fill-in-the-blank template for a topic.
    ///
    /// # Errors
    /// Returns an error if the call cannot complete or the response body
    /// does not have the expected shape.
    pub async fn generate_template(&self, topic: &str) -> Result<Template> {
        tracing::info!(topic, "requesting template");
        self.post_json("/api/generate-template", &TopicRequest { topic })
            .await
            .context("generate-template failed")
    }

    /// Submits user words for a template and returns the completed story.
    ///
    /// `inputs` maps blank labels to the user's words.
    ///
    /// # Errors
    /// Returns an error if the call cannot complete or the response body
    /// does not have the expected shape.
    pub async fn submit_madlib(
        &self,
        template_id: &str,
        inputs: impl IntoIterator<Item = (String, String)>,
    ) -> Result<CompletedMadLib> {
        let request = SubmitRequest {
            template_id,
            user_inputs: inputs.into_iter().collect(),
        };
        tracing::info!(template_id, "submitting madlib");
        self.post_json("/api/submit-madlib", &request)
            .await
            .context("submit-madlib failed")
    }

    /// Requests an illustration for a completed madlib.
    ///
    /// Returns the absolute URL of the generated image, resolved against the
    /// base address.
    ///
    /// # Errors
    /// Returns an error if the call cannot complete, the response body does
    /// not have the expected shape, or the returned path cannot be resolved.
    pub async fn generate_image(&self, madlib_id: &str) -> Result<String> {
        tracing::info!(madlib_id, "requesting image");
        let response: ImageResponse = self
            .post_json("/api/generate-image", &ImageRequest { madlib_id })
            .await
            .context("generate-image failed")?;
        resolve_image_url(&self.base_url, &response.image_url)
    }

    /// Probes the backend health endpoint.
    ///
    /// # Errors
    /// Returns an error if the call cannot complete or the response body
    /// does not have the expected shape.
    pub async fn health(&self) -> Result<Health> {
        let url = format!("{}/api/health", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        check_status(&response)?;
        response.json().await.context("malformed health response")
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(body)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        check_status(&response)?;
        let parsed = response
            .json()
            .await
            .with_context(|| format!("malformed response from {path}"))?;
        Ok(parsed)
    }
}

fn check_status(response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        tracing::warn!(%status, url = %response.url(), "backend returned error status");
        Err(anyhow!("backend returned {status}"))
    }
}

/// Resolves a server-relative image path against the backend base address.
///
/// Already-absolute URLs are passed through unchanged.
///
/// # Errors
/// Returns an error if the base address or the joined result is not a valid URL.
pub fn resolve_image_url(base_url: &str, image_url: &str) -> Result<String> {
    let base = url::Url::parse(base_url)
        .with_context(|| format!("invalid base URL: {base_url}"))?;
    let resolved = base
        .join(image_url)
        .with_context(|| format!("invalid image URL: {image_url}"))?;
    Ok(resolved.to_string())
}

//! Document-grounded PageIndex adapter.
//!
//! Same `/chat/completions` path as the web-search backend but a different
//! contract: the credential travels in an `api_key` header and the request
//! names the document set to ground the answer in (`doc_id` array). No
//! model or generation parameters are accepted.

use serde_json::Value;

use pc_domain::config::VariantConfig;
use pc_domain::error::{Error, Result};

use crate::traits::{ChatReply, ChatRequest, UpstreamClient};
use crate::util::{extract_content, extract_string_list, from_reqwest, resolve_api_key};

pub struct PageIndexClient {
    id: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl PageIndexClient {
    pub fn from_config(cfg: &VariantConfig) -> Result<Self> {
        let api_key = resolve_api_key(&cfg.api_key_env)?;
        let client = reqwest::Client::builder().build().map_err(from_reqwest)?;

        Ok(Self {
            id: cfg.id.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            api_key,
            client,
        })
    }

    fn build_body(req: &ChatRequest) -> Value {
        serde_json::json!({
            "doc_id": req.doc_ids,
            "messages": req.messages,
        })
    }
}

#[async_trait::async_trait]
impl UpstreamClient for PageIndexClient {
    async fn send(&self, req: &ChatRequest) -> Result<ChatReply> {
        if req.doc_ids.is_empty() {
            return Err(Error::BadRequest("no document ids provided".into()));
        }

        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::build_body(req);

        tracing::debug!(
            variant = %self.id,
            url = %url,
            docs = req.doc_ids.len(),
            turns = req.messages.len(),
            "pageindex request"
        );

        let resp = self
            .client
            .post(&url)
            .header("api_key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            return Err(Error::Upstream {
                status: status.as_u16(),
                body: resp_text,
            });
        }

        let resp_json: Value = serde_json::from_str(&resp_text)
            .map_err(|e| Error::MalformedResponse(format!("invalid JSON body: {e}")))?;
        parse_reply(&resp_json)
    }

    fn variant_id(&self) -> &str {
        &self.id
    }
}

fn parse_reply(body: &Value) -> Result<ChatReply> {
    Ok(ChatReply {
        text: extract_content(body)?,
        citations: extract_string_list(body, "citations"),
        documents: extract_string_list(body, "documents"),
    })
}

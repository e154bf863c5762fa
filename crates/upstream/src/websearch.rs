//! Web-search chat adapter.
//!
//! Talks to any OpenAI-style `/chat/completions` endpoint that authenticates
//! with `Authorization: Bearer` — the shipped default is the Perplexity
//! `sonar` search model.

use serde_json::Value;

use pc_domain::config::VariantConfig;
use pc_domain::error::{Error, Result};

use crate::traits::{ChatReply, ChatRequest, UpstreamClient};
use crate::util::{extract_content, extract_string_list, from_reqwest, resolve_api_key};

pub struct WebSearchClient {
    id: String,
    base_url: String,
    api_key: String,
    default_model: String,
    client: reqwest::Client,
}

impl WebSearchClient {
    /// Create a client from the variant table, resolving the credential
    /// from the configured environment variable.
    pub fn from_config(cfg: &VariantConfig) -> Result<Self> {
        let api_key = resolve_api_key(&cfg.api_key_env)?;
        let default_model = cfg
            .model
            .clone()
            .ok_or_else(|| Error::Config(format!("variant '{}' has no model", cfg.id)))?;
        let client = reqwest::Client::builder().build().map_err(from_reqwest)?;

        Ok(Self {
            id: cfg.id.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            api_key,
            default_model,
            client,
        })
    }

    fn build_body(&self, req: &ChatRequest) -> Value {
        let model = req.model.clone().unwrap_or_else(|| self.default_model.clone());
        let mut body = serde_json::json!({
            "model": model,
            "messages": req.messages,
        });
        if let Some(max) = req.max_tokens {
            body["max_tokens"] = serde_json::json!(max);
        }
        if let Some(temp) = req.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        body
    }
}

#[async_trait::async_trait]
impl UpstreamClient for WebSearchClient {
    async fn send(&self, req: &ChatRequest) -> Result<ChatReply> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_body(req);

        tracing::debug!(variant = %self.id, url = %url, turns = req.messages.len(), "websearch request");

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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
        documents: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_domain::turn::Turn;
    use serde_json::json;

    fn test_config() -> VariantConfig {
        let var = "PC_TEST_WS_KEY";
        std::env::set_var(var, "sk-ws");
        let mut cfg = pc_domain::config::Config::default()
            .variant("websearch")
            .unwrap()
            .clone();
        cfg.api_key_env = var.into();
        cfg
    }

    #[test]
    fn body_carries_model_and_generation_params() {
        let client = WebSearchClient::from_config(&test_config()).unwrap();
        let req = ChatRequest {
            messages: vec![Turn::system("sys"), Turn::user("hi")],
            temperature: Some(0.7),
            max_tokens: Some(400),
            ..Default::default()
        };
        let body = client.build_body(&req);
        assert_eq!(body["model"], "sonar");
        assert_eq!(body["max_tokens"], 400);
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
    }

    #[test]
    fn body_omits_unset_params() {
        let client = WebSearchClient::from_config(&test_config()).unwrap();
        let body = client.build_body(&ChatRequest::default());
        assert!(body.get("temperature").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn request_model_overrides_default() {
        let client = WebSearchClient::from_config(&test_config()).unwrap();
        let req = ChatRequest { model: Some("sonar-pro".into()), ..Default::default() };
        assert_eq!(client.build_body(&req)["model"], "sonar-pro");
    }

    #[test]
    fn parse_reply_extracts_text_and_citations() {
        let body = json!({
            "choices": [{"message": {"content": "SCADA is a control architecture."}}],
            "citations": ["https://example.com/scada"],
        });
        let reply = parse_reply(&body).unwrap();
        assert_eq!(reply.text, "SCADA is a control architecture.");
        assert_eq!(reply.citations, vec!["https://example.com/scada"]);
        assert!(reply.documents.is_empty());
    }

    #[test]
    fn parse_reply_without_choices_is_malformed() {
        let err = parse_reply(&json!({"usage": {}})).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }
}

use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid chat request: {0}")]
    Request(#[from] OpenAIError),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

/// Status and body exactly as the gateway returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayReply {
    pub status: u16,
    pub body: String,
}

impl GatewayReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport to an OpenAI-compatible chat-completions endpoint.
///
/// Implementations send exactly one request and never retry; status
/// classification is left to the caller.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(
        &self,
        api_key: &str,
        request: &CreateChatCompletionRequest,
    ) -> Result<GatewayReply, GatewayError>;
}

pub struct HttpChatBackend {
    client: reqwest::Client,
    url: String,
}

impl HttpChatBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(
        &self,
        api_key: &str,
        request: &CreateChatCompletionRequest,
    ) -> Result<GatewayReply, GatewayError> {
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(GatewayReply { status, body })
    }
}

/// Single-turn request: one system message, one user message.
pub fn chat_request(
    model: &str,
    system_prompt: &str,
    user_prompt: String,
) -> Result<CreateChatCompletionRequest, OpenAIError> {
    let messages: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt)
            .build()?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(user_prompt)
            .build()?
            .into(),
    ];

    CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages(messages)
        .build()
}

/// `choices[0].message.content` of a completion body, if it is a non-empty string.
pub fn first_choice_content(body: &str) -> Result<Option<String>, serde_json::Error> {
    let json: serde_json::Value = serde_json::from_str(body)?;
    Ok(json
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .filter(|content| !content.is_empty())
        .map(|content| content.to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_shape() {
        let request = chat_request("test-model", "be brief", "hello".to_string()).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be brief");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_ne!(json["stream"], true);
    }

    #[test]
    fn test_first_choice_content() {
        let body = serde_json::json!({ "choices": [{ "message": { "content": "## Plan" } }] }).to_string();
        assert_eq!(first_choice_content(&body).unwrap(), Some("## Plan".to_string()));

        assert_eq!(first_choice_content(r#"{"choices":[]}"#).unwrap(), None);
        assert_eq!(first_choice_content(r#"{"choices":[{}]}"#).unwrap(), None);
        assert_eq!(first_choice_content(r#"{"id":"x"}"#).unwrap(), None);
        assert_eq!(
            first_choice_content(r#"{"choices":[{"message":{"content":""}}]}"#).unwrap(),
            None
        );
        assert!(first_choice_content("<html>").is_err());
    }

    #[test]
    fn test_reply_success_range() {
        let ok = GatewayReply {
            status: 200,
            body: String::new(),
        };
        let throttled = GatewayReply {
            status: 429,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!throttled.is_success());
    }
}

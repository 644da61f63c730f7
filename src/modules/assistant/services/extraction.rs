use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ExtractionConfig;
use crate::core::{AppError, Result};
use crate::modules::assistant::models::{ChatMessage, ExtractedEntry};

/// Instructions sent ahead of every transcript
pub const SYSTEM_PROMPT: &str = r#"Você é o assistente financeiro da Atlas Fibra. Sua missão é extrair 4 dados de cada frase do usuário:
1. Valor (número, em reais)
2. Descrição (texto do gasto/receita)
3. Quem Pagou (exatamente "Allyson" ou "Gabriel")
4. Tipo de Caixa (exatamente "Atlas", "Franquia" ou "Pessoal")

Se faltar algum dado, pergunte educadamente em uma frase curta.
Se tiver tudo, retorne APENAS um objeto JSON válido, sem markdown e sem texto antes ou depois, no formato:
{"valor": número, "descricao": "string", "quemPagou": "Allyson" ou "Gabriel", "tipoCaixa": "Atlas" ou "Franquia" ou "Pessoal"}

Exemplo de resposta quando completo:
{"valor": 45.50, "descricao": "Mercado", "quemPagou": "Allyson", "tipoCaixa": "Pessoal"}"#;

/// Reply used when the model returns no content
pub const EMPTY_REPLY: &str = "Desculpe, não consegui processar.";

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 256;

/// Hosted language model that turns free text into ledger entries
#[async_trait]
pub trait ExtractionGateway: Send + Sync {
    /// Assistant reply to `transcript`, oldest turn first
    async fn complete(&self, transcript: &[ChatMessage]) -> Result<String>;

    fn name(&self) -> &str;
}

/// OpenAI-compatible chat-completions client
pub struct ChatCompletionsClient {
    client: ClientWithMiddleware,
    api_key: String,
    endpoint: String,
    model: String,
}

impl ChatCompletionsClient {
    pub fn new(config: &ExtractionConfig) -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(reqwest::Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: format!(
                "{}/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            model: config.model.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl ExtractionGateway for ChatCompletionsClient {
    async fn complete(&self, transcript: &[ChatMessage]) -> Result<String> {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend(transcript.iter().cloned());

        let body = serde_json::to_vec(&CompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        })?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(AppError::gateway(format!(
                "Extraction API error {}: {}",
                status, error_body
            )));
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            AppError::gateway(format!("Failed to parse extraction response: {}", e))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty());

        match content {
            Some(content) => {
                debug!(model = %self.model, chars = content.len(), "Extraction reply received");
                Ok(content)
            }
            None => {
                warn!(model = %self.model, "Extraction reply had no content");
                Ok(EMPTY_REPLY.to_string())
            }
        }
    }

    fn name(&self) -> &str {
        "chat-completions"
    }
}

/// Structured entry inside a model reply, if there is a usable one
///
/// The object may be wrapped in prose or a markdown fence; the span from the
/// first `{` to the last `}` is parsed. Anything else is plain text.
pub fn parse_extracted_entry(reply: &str) -> Option<ExtractedEntry> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }

    serde_json::from_str::<ExtractedEntry>(&reply[start..=end])
        .ok()
        .filter(ExtractedEntry::is_usable)
}

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use log::info;

pub const MESSAGE_PLACEHOLDER: &str = "{message}";

pub const DEFAULT_TEMPLATE: &str =
    "I received: \"{message}\". Connect to your AI service for intelligent responses!";

const BUILTIN_RESPONSES: &[(&str, &str)] = &[
    ("hello", "Hello! 👋 How can I help you today?"),
    ("how are you", "I'm doing great! Thanks for asking. How can I assist you?"),
    ("what is ai", "AI is the simulation of human intelligence by machines."),
    ("help", "I'm here to help! Ask me anything!"),
    ("thank you", "You're welcome! 😊"),
    ("bye", "Goodbye! See you next time! 👋"),
];

#[derive(Debug, Error)]
pub enum ResponsesError {
    #[error("Failed to read responses file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse responses file '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Response entry #{0} has an empty keyword")]
    EmptyKeyword(usize),
    #[error("Response entry #{0} has an empty response")]
    EmptyResponse(usize),
    #[error("Default template must contain the {{message}} placeholder")]
    MissingPlaceholder,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeywordResponse {
    pub keyword: String,
    pub response: String,
}

#[derive(Deserialize, Debug)]
struct ResponsesFile {
    responses: Vec<KeywordResponse>,
    #[serde(default)]
    default_template: Option<String>,
}

/// Ordered keyword table. Lookup walks `entries` front to back and the
/// first keyword contained in the lowercased message wins, so order here
/// is part of the contract.
#[derive(Debug, Clone)]
pub struct KeywordResponses {
    entries: Vec<KeywordResponse>,
    default_template: String,
}

impl Default for KeywordResponses {
    fn default() -> Self {
        Self {
            entries: BUILTIN_RESPONSES.iter()
                .map(|(keyword, response)| KeywordResponse {
                    keyword: keyword.to_string(),
                    response: response.to_string(),
                })
                .collect(),
            default_template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl KeywordResponses {
    pub fn new(
        entries: Vec<KeywordResponse>,
        default_template: Option<String>
    ) -> Result<Self, ResponsesError> {
        let default_template = default_template.unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());
        if !default_template.contains(MESSAGE_PLACEHOLDER) {
            return Err(ResponsesError::MissingPlaceholder);
        }

        let mut normalized = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.into_iter().enumerate() {
            // Messages are lowercased before matching, so keywords must be too.
            let keyword = entry.keyword.trim().to_lowercase();
            if keyword.is_empty() {
                return Err(ResponsesError::EmptyKeyword(idx));
            }
            if entry.response.trim().is_empty() {
                return Err(ResponsesError::EmptyResponse(idx));
            }
            normalized.push(KeywordResponse { keyword, response: entry.response });
        }

        Ok(Self { entries: normalized, default_template })
    }

    pub fn entries(&self) -> &[KeywordResponse] {
        &self.entries
    }

    pub fn default_template(&self) -> &str {
        &self.default_template
    }

    pub fn reply_for(&self, message: &str) -> String {
        let lower = message.to_lowercase();
        self.entries
            .iter()
            .find(|entry| lower.contains(entry.keyword.as_str()))
            .map(|entry| entry.response.clone())
            .unwrap_or_else(|| self.default_template.replace(MESSAGE_PLACEHOLDER, message))
    }
}

pub fn load_responses<P: AsRef<Path>>(path: P) -> Result<Arc<KeywordResponses>, ResponsesError> {
    let path_str = path.as_ref().display().to_string();
    let file_content = fs::read_to_string(&path).map_err(|source| ResponsesError::Io {
        path: path_str.clone(),
        source,
    })?;
    let file: ResponsesFile = serde_json::from_str(&file_content).map_err(|source| {
        ResponsesError::Json { path: path_str.clone(), source }
    })?;
    let responses = KeywordResponses::new(file.responses, file.default_template)?;
    info!("Loaded {} keyword responses from {}", responses.entries().len(), path_str);
    Ok(Arc::new(responses))
}

/// Uses the file at `path` when given, otherwise the built-in table.
pub fn resolve_responses(path: Option<&str>) -> Result<Arc<KeywordResponses>, ResponsesError> {
    match path {
        Some(p) if !p.trim().is_empty() => load_responses(p),
        _ => {
            info!("Using built-in keyword responses");
            Ok(Arc::new(KeywordResponses::default()))
        }
    }
}

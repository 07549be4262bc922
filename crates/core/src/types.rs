use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Alias name to expansion (command word plus leading arguments).
pub type AliasTable = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CommandResult {
    Empty,
    Clear,
    Text { content: String },
    Error { message: String },
    SetAlias { key: String, value: String },
    RemoveAlias { key: String },
    Async { command: AsyncCommand },
}

impl CommandResult {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Work the caller has to finish asynchronously before anything is shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum AsyncCommand {
    Scan { url: String },
    Monitor { request: MonitorRequest },
}

impl AsyncCommand {
    /// The resolved command word this follow-up belongs to.
    pub fn word(&self) -> &'static str {
        match self {
            AsyncCommand::Scan { .. } => "scan",
            AsyncCommand::Monitor { .. } => "monitor",
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            AsyncCommand::Scan { url } => url,
            AsyncCommand::Monitor { request } => request.payload(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonitorRequest {
    Start(String),
    Stop,
    List,
}

impl MonitorRequest {
    pub fn parse(arg: &str) -> Self {
        match arg {
            "--stop" => MonitorRequest::Stop,
            "--list" => MonitorRequest::List,
            url => MonitorRequest::Start(url.to_string()),
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            MonitorRequest::Start(url) => url,
            MonitorRequest::Stop => "--stop",
            MonitorRequest::List => "--list",
        }
    }
}

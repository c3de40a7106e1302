use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;

use lv_base::error::TransportError;
use lv_base::types::{OverrideEntry, Parameter};
use lv_mod_tree::RawTree;

/// The launch-file analyzer service.
pub trait AnalyzerClient: Send + Sync {
    /// Declared parameters of `file_path`, in declaration order.
    fn get_parameters(&self, file_path: &str) -> Result<Vec<Parameter>, TransportError>;

    /// Evaluate `file_path` with `overrides` applied and return its launch tree.
    fn parse_launch_file(&self, file_path: &str, overrides: &[OverrideEntry]) -> Result<RawTree, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerRequest {
    GetParameters { file_path: String },
    ParseLaunchFile { file_path: String, overrides: Vec<OverrideEntry> },
}

/// Settled analyzer round trip, delivered to the main loop.
#[derive(Debug)]
pub enum AnalyzerEvent {
    Parameters { file_path: String, result: Result<Vec<Parameter>, TransportError> },
    Tree { file_path: String, result: Result<RawTree, TransportError> },
}

/// Run `request` on a short-lived thread and send the outcome to `tx`.
pub fn spawn_request(client: Arc<dyn AnalyzerClient>, request: AnalyzerRequest, tx: Sender<AnalyzerEvent>) {
    std::thread::spawn(move || {
        let event = match request {
            AnalyzerRequest::GetParameters { file_path } => {
                let result = client.get_parameters(&file_path);
                AnalyzerEvent::Parameters { file_path, result }
            }
            AnalyzerRequest::ParseLaunchFile { file_path, overrides } => {
                let result = client.parse_launch_file(&file_path, &overrides);
                AnalyzerEvent::Tree { file_path, result }
            }
        };
        // Receiver gone means the app is shutting down
        let _ = tx.send(event);
    });
}

#[derive(Serialize)]
struct GetParametersBody<'a> {
    file_path: &'a str,
}

#[derive(Serialize)]
struct ParseLaunchFileBody<'a> {
    file_path: &'a str,
    arguments: &'a [OverrideEntry],
}

/// JSON-over-HTTP client for a running analyzer.
pub struct HttpAnalyzer {
    client: Client,
    base_url: String,
}

impl HttpAnalyzer {
    pub fn new(host: &str, port: u16, timeout_secs: u64) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(Self { client, base_url: format!("http://{}:{}", host, port) })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<String, TransportError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, "analyzer request");
        let response = self.client.post(&url).json(body).send().map_err(|e| TransportError::Connect(e.to_string()))?;

        let status = response.status();
        let text = response.text().map_err(|e| TransportError::Connect(e.to_string()))?;
        if !status.is_success() {
            tracing::warn!(%url, %status, "analyzer rejected request");
            return Err(TransportError::Rejected(text));
        }
        Ok(text)
    }
}

impl AnalyzerClient for HttpAnalyzer {
    fn get_parameters(&self, file_path: &str) -> Result<Vec<Parameter>, TransportError> {
        let text = self.post("get_parameters", &GetParametersBody { file_path })?;
        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }

    fn parse_launch_file(&self, file_path: &str, overrides: &[OverrideEntry]) -> Result<RawTree, TransportError> {
        let text = self.post("parse_launch_file", &ParseLaunchFileBody { file_path, arguments: overrides })?;
        // Trees nest without bound
        RawTree::from_json(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

//! Host side of the view boundary.
//!
//! The host owns everything outside the rendered views: the analyzer client,
//! the override store and the file opener. Views hand it [`ViewMessage`]s; it
//! answers by issuing analyzer requests, committing overrides and settling the
//! form when a request comes back.

use std::sync::Arc;
use std::sync::mpsc::Sender;

use chrono::{DateTime, Local};

use lv_base::config::TreeConfig;
use lv_base::config::constants::OPEN_FILE_LINE;
use lv_base::protocol::{HostMessage, ViewMessage};
use lv_base::types::Parameter;
use lv_mod_params::{ParameterForm, ParameterStore, compute_diff};
use lv_mod_tree::{LaunchTree, RawTree, TreeView, VisibilityController, resolve_open_target};

use crate::infra::analyzer::{AnalyzerClient, AnalyzerEvent, AnalyzerRequest, spawn_request};
use crate::infra::opener::FileOpener;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Waiting for the declared parameters
    Loading,
    Parameters,
    Tree,
}

/// One-line message for the status bar.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    pub at: DateTime<Local>,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false, at: Local::now() }
    }

    fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true, at: Local::now() }
    }
}

pub struct Host {
    file_path: String,
    client: Arc<dyn AnalyzerClient>,
    tx: Sender<AnalyzerEvent>,
    store: ParameterStore,
    opener: Box<dyn FileOpener>,
    tree_config: TreeConfig,
    pub screen: Screen,
    pub form: Option<ParameterForm>,
    pub tree: Option<TreeView>,
    pub notice: Option<Notice>,
}

impl Host {
    pub fn new(
        file_path: impl Into<String>,
        client: Arc<dyn AnalyzerClient>,
        tx: Sender<AnalyzerEvent>,
        store: ParameterStore,
        opener: Box<dyn FileOpener>,
        tree_config: TreeConfig,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            client,
            tx,
            store,
            opener,
            tree_config,
            screen: Screen::Loading,
            form: None,
            tree: None,
            notice: None,
        }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    /// Ask the analyzer for the declared parameters.
    pub fn request_parameters(&mut self) {
        tracing::info!(file = %self.file_path, "requesting parameters");
        self.screen = Screen::Loading;
        self.notice = None;
        self.send(AnalyzerRequest::GetParameters { file_path: self.file_path.clone() });
    }

    fn send(&self, request: AnalyzerRequest) {
        spawn_request(Arc::clone(&self.client), request, self.tx.clone());
    }

    /// Handle a message produced by a view.
    pub fn dispatch(&mut self, message: ViewMessage) {
        tracing::debug!(message = %message.to_json(), "view message");
        match message {
            ViewMessage::UpdateParameters { parameters } => {
                let Some(form) = &self.form else { return };
                let declared: Vec<Parameter> = form.parameters();
                let diff = compute_diff(&declared, &parameters);
                tracing::info!(file = %self.file_path, overrides = diff.len(), "building tree");
                self.store.set(&self.file_path, diff.clone());
                self.send(AnalyzerRequest::ParseLaunchFile { file_path: self.file_path.clone(), overrides: diff });
            }
            ViewMessage::OpenFile { uri } => {
                let Some(request) = resolve_open_target(&uri, &self.tree_config.file_scheme_prefixes, OPEN_FILE_LINE)
                else {
                    return;
                };
                match self.opener.open(&request) {
                    Ok(()) => self.notice = Some(Notice::info(format!("Opened {}", request.path))),
                    Err(e) => {
                        tracing::warn!(path = %request.path, error = %e, "could not open file");
                        self.notice = Some(Notice::error(format!("Could not open {}: {}", request.path, e)));
                    }
                }
            }
        }
    }

    /// Settle an analyzer round trip.
    pub fn handle_analyzer_event(&mut self, event: AnalyzerEvent) {
        match event {
            AnalyzerEvent::Parameters { file_path, result } => match result {
                Ok(parameters) => {
                    tracing::info!(file = %file_path, count = parameters.len(), "parameters received");
                    let cached = self.store.get(&file_path);
                    self.form = Some(ParameterForm::new(file_path, parameters, cached));
                    self.screen = Screen::Parameters;
                }
                Err(e) => {
                    tracing::warn!(file = %file_path, error = %e, "getting parameters failed");
                    self.notice = Some(Notice::error(e.to_string()));
                }
            },
            AnalyzerEvent::Tree { file_path, result } => match result {
                Ok(raw) => self.install_tree(&file_path, raw),
                Err(e) => {
                    tracing::warn!(file = %file_path, error = %e, "parsing launch file failed");
                    if let Some(form) = &mut self.form {
                        form.receive(HostMessage::Error { error: e.to_string() });
                    }
                }
            },
        }
    }

    fn install_tree(&mut self, file_path: &str, raw: RawTree) {
        let tree = LaunchTree::build(raw.into_roots(), &self.tree_config.fallback_type);
        tracing::info!(file = file_path, nodes = tree.len(), "tree built");
        let controller = VisibilityController::new(tree, self.tree_config.excluded_type.clone());
        self.tree = Some(TreeView::new(controller, file_path));
        if let Some(form) = &mut self.form {
            form.settle();
        }
        self.screen = Screen::Tree;
    }

    /// Go back to the form, keeping the current tree.
    pub fn show_parameters(&mut self) {
        if self.form.is_some() {
            self.screen = Screen::Parameters;
        }
    }

    pub fn show_tree(&mut self) {
        if self.tree.is_some() {
            self.screen = Screen::Tree;
        }
    }
}

//! Edit-form state for a launch file's declared parameters.
//!
//! The form owns one text field per parameter, tracks which field has focus,
//! and produces the `updateParameters` message on a valid submit. It never
//! talks to the analyzer or the store itself; the host does that and settles
//! the form afterwards.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use lv_base::config::constants::PAGE_ROWS;
use lv_base::error::ValidationError;
use lv_base::protocol::{HostMessage, ViewMessage};
use lv_base::types::{OverrideEntry, Parameter, ParameterValues};

/// Shown while a submitted form waits for the tree
pub const PENDING_MESSAGE: &str = "Wait, tree is being built...";

/// A single editable parameter.
#[derive(Debug, Clone)]
pub struct ParameterField {
    pub parameter: Parameter,
    pub value: String,
    /// Cursor position in chars
    pub cursor: usize,
    /// Flagged by the last failed submit
    pub invalid: bool,
}

impl ParameterField {
    fn new(parameter: Parameter, value: String) -> Self {
        let cursor = value.chars().count();
        Self { parameter, value, cursor, invalid: false }
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(self.value.len())
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_default(&self) -> bool {
        self.value == self.parameter.default_value
    }

    fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
        self.invalid = false;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.value.remove(at);
        self.cursor -= 1;
    }

    fn delete(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    fn set_value(&mut self, value: String) {
        self.value = value;
        self.cursor = self.char_len();
        self.invalid = false;
    }
}

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    /// Submitted, waiting for the analyzer
    Pending,
    /// Last submit was rejected; text shown verbatim
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    SelectPrev,
    SelectNext,
    SelectFirst,
    SelectLast,
    PageUp,
    PageDown,
    Insert(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    /// Put the focused field back to its declared default
    ResetField,
    /// Empty the focused field
    ClearField,
    Submit,
}

#[derive(Debug, Clone)]
pub struct ParameterForm {
    pub file_path: String,
    pub fields: Vec<ParameterField>,
    pub selected: usize,
    pub status: SubmitState,
    /// Set by the last blank-field submit, cleared on the next valid one
    pub validation: Option<ValidationError>,
}

impl ParameterForm {
    /// One field per parameter, pre-filled with the cached override for that
    /// name when there is one, otherwise with the declared default.
    pub fn new(file_path: impl Into<String>, parameters: Vec<Parameter>, cached: &[OverrideEntry]) -> Self {
        let fields = parameters
            .into_iter()
            .map(|p| {
                let value = cached
                    .iter()
                    .find(|e| e.name == p.name)
                    .map(|e| e.value.clone())
                    .unwrap_or_else(|| p.default_value.clone());
                ParameterField::new(p, value)
            })
            .collect();
        Self { file_path: file_path.into(), fields, selected: 0, status: SubmitState::Idle, validation: None }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SubmitState::Pending
    }

    /// The declared parameters, in declaration order
    pub fn parameters(&self) -> Vec<Parameter> {
        self.fields.iter().map(|f| f.parameter.clone()).collect()
    }

    pub fn focused(&self) -> Option<&ParameterField> {
        self.fields.get(self.selected)
    }

    fn focused_mut(&mut self) -> Option<&mut ParameterField> {
        self.fields.get_mut(self.selected)
    }

    /// Map a key to a form action. `None` means the form does not use the key.
    pub fn handle_key(&self, key: &KeyEvent) -> Option<FormAction> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Up | KeyCode::BackTab => FormAction::SelectPrev,
            KeyCode::Down | KeyCode::Tab => FormAction::SelectNext,
            KeyCode::PageUp => FormAction::PageUp,
            KeyCode::PageDown => FormAction::PageDown,
            KeyCode::Home if ctrl => FormAction::SelectFirst,
            KeyCode::End if ctrl => FormAction::SelectLast,
            KeyCode::Home => FormAction::CursorHome,
            KeyCode::End => FormAction::CursorEnd,
            KeyCode::Left => FormAction::CursorLeft,
            KeyCode::Right => FormAction::CursorRight,
            KeyCode::Backspace => FormAction::Backspace,
            KeyCode::Delete => FormAction::Delete,
            KeyCode::Enter => FormAction::Submit,
            KeyCode::Char('r') if ctrl => FormAction::ResetField,
            KeyCode::Char('u') if ctrl => FormAction::ClearField,
            KeyCode::Char('a') if ctrl => FormAction::CursorHome,
            KeyCode::Char('e') if ctrl => FormAction::CursorEnd,
            KeyCode::Char(_) if ctrl => return None,
            KeyCode::Char(c) => FormAction::Insert(c),
            _ => return None,
        };
        Some(action)
    }

    /// Apply an action. Returns the message to send to the host, if any.
    pub fn apply(&mut self, action: FormAction) -> Option<ViewMessage> {
        let last = self.fields.len().saturating_sub(1);
        match action {
            FormAction::SelectPrev => self.selected = self.selected.saturating_sub(1),
            FormAction::SelectNext => self.selected = (self.selected + 1).min(last),
            FormAction::SelectFirst => self.selected = 0,
            FormAction::SelectLast => self.selected = last,
            FormAction::PageUp => self.selected = self.selected.saturating_sub(PAGE_ROWS),
            FormAction::PageDown => self.selected = (self.selected + PAGE_ROWS).min(last),
            FormAction::Submit => return self.submit(),
            edit => {
                let field = self.focused_mut()?;
                match edit {
                    FormAction::Insert(c) => field.insert(c),
                    FormAction::Backspace => field.backspace(),
                    FormAction::Delete => field.delete(),
                    FormAction::CursorLeft => field.cursor = field.cursor.saturating_sub(1),
                    FormAction::CursorRight => field.cursor = (field.cursor + 1).min(field.char_len()),
                    FormAction::CursorHome => field.cursor = 0,
                    FormAction::CursorEnd => field.cursor = field.char_len(),
                    FormAction::ResetField => {
                        let default = field.parameter.default_value.clone();
                        field.set_value(default);
                    }
                    FormAction::ClearField => field.set_value(String::new()),
                    _ => {}
                }
            }
        }
        None
    }

    /// Current field values keyed by name, or the blank fields' names.
    pub fn validate(&self) -> Result<ParameterValues, ValidationError> {
        let blank: Vec<String> =
            self.fields.iter().filter(|f| f.value.is_empty()).map(|f| f.parameter.name.clone()).collect();
        if !blank.is_empty() {
            return Err(ValidationError::BlankFields { names: blank });
        }
        Ok(self.fields.iter().map(|f| (f.parameter.name.clone(), f.value.clone())).collect())
    }

    /// Validate and emit `updateParameters`. Ignored while pending.
    pub fn submit(&mut self) -> Option<ViewMessage> {
        if self.is_pending() {
            tracing::debug!("submit ignored, tree still building");
            return None;
        }
        match self.validate() {
            Ok(parameters) => {
                for field in &mut self.fields {
                    field.invalid = false;
                }
                self.validation = None;
                self.status = SubmitState::Pending;
                Some(ViewMessage::UpdateParameters { parameters })
            }
            Err(e) => {
                let ValidationError::BlankFields { names } = &e;
                for field in &mut self.fields {
                    field.invalid = names.contains(&field.parameter.name);
                }
                tracing::debug!(blank = names.len(), "submit rejected");
                self.validation = Some(e);
                None
            }
        }
    }

    /// The tree arrived; back to idle.
    pub fn settle(&mut self) {
        self.status = SubmitState::Idle;
    }

    /// Handle a host → view message.
    pub fn receive(&mut self, message: HostMessage) {
        match message {
            HostMessage::Error { error } => self.status = SubmitState::Failed(error),
        }
    }

    /// Line shown under the fields, if any
    pub fn status_line(&self) -> Option<String> {
        match (&self.status, &self.validation) {
            (SubmitState::Pending, _) => Some(PENDING_MESSAGE.to_string()),
            (_, Some(e)) => Some(e.to_string()),
            (SubmitState::Failed(error), None) => Some(error.clone()),
            (SubmitState::Idle, None) => None,
        }
    }
}

//! Messages crossing the boundary between the rendered view and the host.
//!
//! Both directions are JSON objects tagged by a `command` field. The terminal
//! view produces [`ViewMessage`]s from user gestures; the host answers failures
//! with [`HostMessage`]s.

use serde::{Deserialize, Serialize};

use crate::types::ParameterValues;

/// View → host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum ViewMessage {
    /// Submit the edited parameter form.
    UpdateParameters { parameters: ParameterValues },
    /// Open the file a tree node points at.
    OpenFile { uri: String },
}

/// Host → view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostMessage {
    /// A parse or transport call failed; `error` is shown verbatim.
    Error { error: String },
}

impl ViewMessage {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_parameters_wire_shape() {
        let mut parameters = ParameterValues::new();
        parameters.insert("use_sim_time".to_string(), "true".to_string());
        parameters.insert("robot".to_string(), "turtle".to_string());
        let msg = ViewMessage::UpdateParameters { parameters };
        assert_eq!(
            msg.to_json(),
            r#"{"command":"updateParameters","parameters":{"use_sim_time":"true","robot":"turtle"}}"#
        );
    }

    #[test]
    fn open_file_wire_shape() {
        let msg: ViewMessage = serde_json::from_str(r#"{"command":"openFile","uri":"file:///tmp/a.launch.py"}"#).unwrap();
        assert_eq!(msg, ViewMessage::OpenFile { uri: "file:///tmp/a.launch.py".to_string() });
    }

    #[test]
    fn error_wire_shape() {
        let msg = HostMessage::Error { error: "connection refused".to_string() };
        assert_eq!(serde_json::to_string(&msg).unwrap(), r#"{"command":"error","error":"connection refused"}"#);
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(serde_json::from_str::<ViewMessage>(r#"{"command":"hello","text":"hi"}"#).is_err());
    }
}

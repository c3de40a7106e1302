use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::actions::Action;
use crate::app::host::{Host, Screen};

/// Map a terminal event to an action. `None` means quit.
pub fn handle_event(event: &Event, host: &Host) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(key, host),
        Event::Mouse(mouse) if host.screen == Screen::Tree => {
            let action = host.tree.as_ref().and_then(|t| t.handle_mouse(mouse));
            Some(action.map(Action::Tree).unwrap_or(Action::None))
        }
        Event::Resize(_, _) => Some(Action::Redraw),
        _ => Some(Action::None),
    }
}

fn handle_key(key: &KeyEvent, host: &Host) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global shortcuts
    if ctrl {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') => return None,
            KeyCode::Char('p') => return Some(Action::ShowParameters),
            KeyCode::Char('t') => return Some(Action::ShowTree),
            _ => {}
        }
    }
    match key.code {
        KeyCode::F(2) => return Some(Action::ShowParameters),
        KeyCode::F(3) => return Some(Action::ShowTree),
        _ => {}
    }

    match host.screen {
        Screen::Loading => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => None,
            KeyCode::Char('r') => Some(Action::Retry),
            _ => Some(Action::None),
        },
        Screen::Parameters => {
            if key.code == KeyCode::Esc {
                return Some(if host.tree.is_some() { Action::ShowTree } else { Action::None });
            }
            let action = host.form.as_ref().and_then(|f| f.handle_key(key));
            Some(action.map(Action::Form).unwrap_or(Action::None))
        }
        Screen::Tree => {
            let tree = host.tree.as_ref()?;
            if let Some(action) = tree.handle_key(key) {
                return Some(Action::Tree(action));
            }
            match key.code {
                KeyCode::Char('q') => None,
                KeyCode::Char('p') | KeyCode::Esc => Some(Action::ShowParameters),
                _ => Some(Action::None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
    use std::sync::Arc;
    use std::sync::mpsc;

    use lv_base::config::AppConfig;
    use lv_base::error::TransportError;
    use lv_base::storage::MemoryStorage;
    use lv_base::types::{OverrideEntry, Parameter};
    use lv_mod_params::{FormAction, ParameterStore};
    use lv_mod_tree::{RawNode, RawTree, TreeAction};

    use crate::app::host::Host;
    use crate::infra::analyzer::{AnalyzerClient, AnalyzerEvent};
    use crate::infra::opener::FileOpener;

    struct Offline;

    impl AnalyzerClient for Offline {
        fn get_parameters(&self, _: &str) -> Result<Vec<Parameter>, TransportError> {
            Err(TransportError::Connect("offline".into()))
        }
        fn parse_launch_file(&self, _: &str, _: &[OverrideEntry]) -> Result<RawTree, TransportError> {
            Err(TransportError::Connect("offline".into()))
        }
    }

    struct NoOpener;

    impl FileOpener for NoOpener {
        fn open(&self, _: &lv_mod_tree::OpenRequest) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn host() -> Host {
        let (tx, _rx) = mpsc::channel();
        let store = ParameterStore::new(Box::new(MemoryStorage::new()));
        let tree = AppConfig::defaults().unwrap().tree;
        Host::new("/ws/a.launch.py", Arc::new(Offline), tx, store, Box::new(NoOpener), tree)
    }

    fn host_with_tree() -> Host {
        let mut h = host();
        h.handle_analyzer_event(AnalyzerEvent::Parameters {
            file_path: "/ws/a.launch.py".into(),
            result: Ok(vec![Parameter::new("robot", "turtle")]),
        });
        h.handle_analyzer_event(AnalyzerEvent::Tree {
            file_path: "/ws/a.launch.py".into(),
            result: Ok(RawTree::Single(RawNode::new("root").with_children(vec![RawNode::new("child")]))),
        });
        h
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn ctrl_q_quits_everywhere() {
        let h = host_with_tree();
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(handle_event(&ev, &h).is_none());
    }

    #[test]
    fn loading_screen_retries_on_r() {
        let h = host();
        assert_eq!(handle_event(&key(KeyCode::Char('r')), &h), Some(Action::Retry));
        assert!(handle_event(&key(KeyCode::Esc), &h).is_none());
    }

    #[test]
    fn form_receives_typing() {
        let mut h = host_with_tree();
        h.show_parameters();
        assert_eq!(handle_event(&key(KeyCode::Char('q')), &h), Some(Action::Form(FormAction::Insert('q'))));
        assert_eq!(handle_event(&key(KeyCode::Esc), &h), Some(Action::ShowTree));
    }

    #[test]
    fn tree_keys_route_to_tree() {
        let h = host_with_tree();
        assert_eq!(handle_event(&key(KeyCode::Down), &h), Some(Action::Tree(TreeAction::CursorDown)));
        assert_eq!(handle_event(&key(KeyCode::Char('p')), &h), Some(Action::ShowParameters));
        assert!(handle_event(&key(KeyCode::Char('q')), &h).is_none());
    }

    #[test]
    fn mouse_outside_tree_screen_is_ignored() {
        let mut h = host_with_tree();
        h.show_parameters();
        let ev = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 3,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(handle_event(&ev, &h), Some(Action::None));
    }
}

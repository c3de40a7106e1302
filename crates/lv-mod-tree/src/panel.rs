use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use lv_base::config::constants::PAGE_ROWS;
use lv_base::config::theme;
use lv_base::protocol::ViewMessage;
use lv_base::ui::{panel_block, truncate_string};

use crate::model::{LaunchTree, NodeId};
use crate::visibility::{Gesture, VisibilityController, VisibleRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeAction {
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    Home,
    End,
    /// Activate the cursor row
    Activate(Gesture),
    /// Activate a visible row by index (mouse)
    ActivateRow(usize, Gesture),
    Expand,
    Collapse,
    ToggleFilter,
    SearchStart,
    SearchInput(char),
    SearchBackspace,
    SearchCommit,
    SearchCancel,
    NextMatch,
    PrevMatch,
}

/// Interactive tree panel: a cursor, a scroll offset and a search line on top
/// of a [`VisibilityController`].
pub struct TreeView {
    controller: VisibilityController,
    file_path: String,
    cursor: Option<NodeId>,
    scroll: usize,
    query: String,
    typing: bool,
    match_focus: Option<usize>,
    /// Where the rows were last drawn, for mouse hit-testing
    list_area: Rect,
}

impl TreeView {
    pub fn new(controller: VisibilityController, file_path: impl Into<String>) -> Self {
        let cursor = controller.tree().roots().first().copied();
        Self {
            controller,
            file_path: file_path.into(),
            cursor,
            scroll: 0,
            query: String::new(),
            typing: false,
            match_focus: None,
            list_area: Rect::default(),
        }
    }

    pub fn controller(&self) -> &VisibilityController {
        &self.controller
    }

    pub fn cursor(&self) -> Option<NodeId> {
        self.cursor
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn matches(&self) -> Vec<NodeId> {
        self.controller.search(&self.query)
    }

    pub fn focused_match(&self) -> Option<NodeId> {
        let idx = self.match_focus?;
        self.matches().get(idx).copied()
    }

    pub fn handle_key(&self, key: &KeyEvent) -> Option<TreeAction> {
        if self.typing {
            return match key.code {
                KeyCode::Esc => Some(TreeAction::SearchCancel),
                KeyCode::Enter => Some(TreeAction::SearchCommit),
                KeyCode::Backspace => Some(TreeAction::SearchBackspace),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(TreeAction::SearchInput(c))
                }
                _ => None,
            };
        }
        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => TreeAction::CursorUp,
            KeyCode::Down | KeyCode::Char('j') => TreeAction::CursorDown,
            KeyCode::PageUp => TreeAction::PageUp,
            KeyCode::PageDown => TreeAction::PageDown,
            KeyCode::Home | KeyCode::Char('g') => TreeAction::Home,
            KeyCode::End | KeyCode::Char('G') => TreeAction::End,
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::CONTROL) => TreeAction::Activate(Gesture::Modified),
            KeyCode::Enter | KeyCode::Char(' ') => TreeAction::Activate(Gesture::Plain),
            KeyCode::Char('o') => TreeAction::Activate(Gesture::Modified),
            KeyCode::Right | KeyCode::Char('l') => TreeAction::Expand,
            KeyCode::Left | KeyCode::Char('h') => TreeAction::Collapse,
            KeyCode::Char('t') => TreeAction::ToggleFilter,
            KeyCode::Char('/') => TreeAction::SearchStart,
            KeyCode::Char('n') => TreeAction::NextMatch,
            KeyCode::Char('N') => TreeAction::PrevMatch,
            KeyCode::Esc if !self.query.is_empty() => TreeAction::SearchCancel,
            _ => return None,
        };
        Some(action)
    }

    pub fn handle_mouse(&self, mouse: &MouseEvent) -> Option<TreeAction> {
        let gesture = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if mouse.modifiers.contains(KeyModifiers::CONTROL) => {
                Gesture::Modified
            }
            MouseEventKind::Down(MouseButton::Left) => Gesture::Plain,
            MouseEventKind::Down(MouseButton::Right) => Gesture::Modified,
            MouseEventKind::ScrollUp => return Some(TreeAction::CursorUp),
            MouseEventKind::ScrollDown => return Some(TreeAction::CursorDown),
            _ => return None,
        };
        let area = self.list_area;
        if mouse.row < area.y || mouse.row >= area.y + area.height || mouse.column < area.x {
            return None;
        }
        let row = self.scroll + (mouse.row - area.y) as usize;
        Some(TreeAction::ActivateRow(row, gesture))
    }

    /// Apply an action. Returns the message for the host, if any.
    pub fn apply(&mut self, action: TreeAction) -> Option<ViewMessage> {
        match action {
            TreeAction::CursorUp => self.move_cursor(-1),
            TreeAction::CursorDown => self.move_cursor(1),
            TreeAction::PageUp => self.move_cursor(-(PAGE_ROWS as isize)),
            TreeAction::PageDown => self.move_cursor(PAGE_ROWS as isize),
            TreeAction::Home => self.cursor = self.controller.visible_rows().first().map(|r| r.id),
            TreeAction::End => self.cursor = self.controller.visible_rows().last().map(|r| r.id),
            TreeAction::Activate(gesture) => {
                let id = self.cursor?;
                return self.controller.click(id, gesture);
            }
            TreeAction::ActivateRow(row, gesture) => {
                let id = self.controller.visible_rows().get(row)?.id;
                self.cursor = Some(id);
                return self.controller.click(id, gesture);
            }
            TreeAction::Expand => {
                if let Some(id) = self.cursor {
                    self.controller.set_expanded(id, true);
                }
            }
            TreeAction::Collapse => self.collapse_or_parent(),
            TreeAction::ToggleFilter => {
                let exclude = !self.controller.excludes_type();
                self.controller.filter_by_type(exclude);
                self.cursor = self.controller.tree().roots().first().copied();
                self.match_focus = None;
                self.scroll = 0;
            }
            TreeAction::SearchStart => self.typing = true,
            TreeAction::SearchInput(c) => {
                self.query.push(c);
                self.focus_match(0);
            }
            TreeAction::SearchBackspace => {
                self.query.pop();
                self.focus_match(0);
            }
            TreeAction::SearchCommit => self.typing = false,
            TreeAction::SearchCancel => {
                self.typing = false;
                self.query.clear();
                self.match_focus = None;
            }
            TreeAction::NextMatch => self.step_match(1),
            TreeAction::PrevMatch => self.step_match(-1),
        }
        None
    }

    fn move_cursor(&mut self, delta: isize) {
        let rows = self.controller.visible_rows();
        if rows.is_empty() {
            self.cursor = None;
            return;
        }
        let current = self.cursor_row(&rows);
        let target = (current as isize + delta).clamp(0, rows.len() as isize - 1) as usize;
        self.cursor = Some(rows[target].id);
    }

    /// Row index of the cursor, falling back to the row that hides it.
    fn cursor_row(&self, rows: &[VisibleRow]) -> usize {
        let Some(cursor) = self.cursor else { return 0 };
        let anchor = visible_anchor(self.controller.tree(), cursor);
        rows.iter().position(|r| r.id == anchor).unwrap_or(0)
    }

    fn collapse_or_parent(&mut self) {
        let Some(id) = self.cursor else { return };
        let tree = self.controller.tree();
        let Some(node) = tree.get(id) else { return };
        if node.expanded && !node.is_leaf() {
            self.controller.set_expanded(id, false);
        } else if let Some(parent) = node.parent {
            self.cursor = Some(parent);
        }
    }

    fn focus_match(&mut self, idx: usize) {
        let matches = self.matches();
        let Some(id) = matches.get(idx).copied() else {
            self.match_focus = None;
            return;
        };
        self.match_focus = Some(idx);
        self.cursor = Some(visible_anchor(self.controller.tree(), id));
    }

    fn step_match(&mut self, delta: isize) {
        let count = self.matches().len();
        if count == 0 {
            return;
        }
        let next = match self.match_focus {
            Some(i) => (i as isize + delta).rem_euclid(count as isize) as usize,
            None if delta < 0 => count - 1,
            None => 0,
        };
        self.focus_match(next);
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let filter_note = if self.controller.excludes_type() {
            format!(" · hiding {}", self.controller.excluded_type())
        } else {
            String::new()
        };
        let block = panel_block(&format!("Launch tree · {}{}", self.file_path, filter_note));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let show_footer = self.typing || !self.query.is_empty();
        let footer_height = if show_footer { 2 } else { 0 };
        let list_area = Rect { height: inner.height.saturating_sub(footer_height), ..inner };
        self.list_area = list_area;

        let rows = self.controller.visible_rows();
        let viewport = list_area.height as usize;
        let cursor_row = self.cursor_row(&rows);
        if cursor_row < self.scroll {
            self.scroll = cursor_row;
        } else if viewport > 0 && cursor_row >= self.scroll + viewport {
            self.scroll = cursor_row + 1 - viewport;
        }

        let lines = self.row_lines(&rows, cursor_row, list_area.width as usize);
        frame.render_widget(Paragraph::new(lines).scroll((self.scroll as u16, 0)), list_area);

        if show_footer {
            let footer = Rect { y: list_area.y + list_area.height, height: footer_height, ..inner };
            frame.render_widget(Paragraph::new(self.footer_lines()), footer);
        }
    }

    fn row_lines(&self, rows: &[VisibleRow], cursor_row: usize, width: usize) -> Vec<Line<'static>> {
        let tree = self.controller.tree();
        let focused = self.focused_match();
        rows.iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let node = tree.get(row.id)?;
                let triangle = match (node.is_leaf(), node.expanded) {
                    (true, _) => "  ",
                    (false, true) => "▼ ",
                    (false, false) => "▶ ",
                };
                let mut style = if node.selected {
                    Style::default().fg(theme::selected()).bold()
                } else if node.node_type == self.controller.excluded_type() {
                    Style::default().fg(theme::node())
                } else {
                    Style::default().fg(theme::text_muted())
                };
                if self.controller.is_match(row.id, &self.query) {
                    style = style.bg(theme::match_bg());
                    if focused == Some(row.id) {
                        style = style.underlined();
                    }
                }
                let guide = format!("{}{}{}", row.prefix, row.connector, triangle);
                let title_width = width.saturating_sub(guide.chars().count() + 1);
                let mut spans = vec![
                    Span::styled(guide, Style::default().fg(theme::border())),
                    Span::styled(truncate_string(&node.title, title_width), style),
                ];
                if i == cursor_row {
                    spans.iter_mut().for_each(|s| s.style = s.style.bg(theme::bg_elevated()));
                }
                Some(Line::from(spans))
            })
            .collect()
    }

    fn footer_lines(&self) -> Vec<Line<'static>> {
        let count = self.matches().len();
        let position = match self.match_focus {
            Some(i) if count > 0 => format!("{}/{}", i + 1, count),
            _ => format!("0/{}", count),
        };
        let caret = if self.typing { "▏" } else { "" };
        let mut lines = vec![Line::from(vec![
            Span::styled(" / ", Style::default().fg(theme::accent()).bold()),
            Span::styled(format!("{}{}", self.query, caret), Style::default().fg(theme::text())),
            Span::styled(format!("  {}", position), Style::default().fg(theme::text_muted())),
        ])];
        let crumb = self
            .focused_match()
            .map(|id| self.controller.tree().breadcrumb(id).join(" › "))
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(format!(" {}", crumb), Style::default().fg(theme::text_muted()))));
        lines
    }
}

/// `id` itself when all its ancestors are expanded, otherwise the topmost
/// collapsed ancestor (the row that currently hides it).
pub fn visible_anchor(tree: &LaunchTree, id: NodeId) -> NodeId {
    let ancestors = tree.ancestors(id);
    ancestors
        .iter()
        .rev()
        .find(|a| tree.get(**a).is_some_and(|n| !n.expanded))
        .copied()
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawNode;

    /// root(0) -> [launch_a(1) -> [talker(2) Node], launch_b(3) -> [listener(4) Node]]
    fn view() -> TreeView {
        let raw = RawNode::new("root").with_path("/ws/root.launch.py").with_children(vec![
            RawNode::new("launch_a").with_children(vec![RawNode::new("talker").with_type("Node")]),
            RawNode::new("launch_b")
                .with_path("file:///ws/b.launch.py")
                .with_children(vec![RawNode::new("listener").with_type("Node")]),
        ]);
        let tree = LaunchTree::build(vec![raw], "IncludeLaunchDescription");
        TreeView::new(VisibilityController::new(tree, "Node"), "/ws/root.launch.py")
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(view: &mut TreeView, code: KeyCode) -> Option<ViewMessage> {
        let action = view.handle_key(&key(code))?;
        view.apply(action)
    }

    #[test]
    fn cursor_moves_over_visible_rows() {
        let mut v = view();
        assert_eq!(v.cursor(), Some(NodeId(0)));
        press(&mut v, KeyCode::Down);
        press(&mut v, KeyCode::Down);
        assert_eq!(v.cursor(), Some(NodeId(2)));
        press(&mut v, KeyCode::End);
        assert_eq!(v.cursor(), Some(NodeId(4)));
        press(&mut v, KeyCode::PageUp);
        assert_eq!(v.cursor(), Some(NodeId(0)));
        press(&mut v, KeyCode::Up);
        assert_eq!(v.cursor(), Some(NodeId(0)));
    }

    #[test]
    fn enter_selects_and_deselects() {
        let mut v = view();
        press(&mut v, KeyCode::Down);
        press(&mut v, KeyCode::Enter);
        assert_eq!(v.controller().selected(), Some(NodeId(1)));
        press(&mut v, KeyCode::Char(' '));
        assert_eq!(v.controller().selected(), None);
    }

    #[test]
    fn open_key_emits_open_file() {
        let mut v = view();
        press(&mut v, KeyCode::Down);
        press(&mut v, KeyCode::Down);
        press(&mut v, KeyCode::Down);
        let msg = press(&mut v, KeyCode::Char('o'));
        assert_eq!(msg, Some(ViewMessage::OpenFile { uri: "file:///ws/b.launch.py".to_string() }));
        let ctrl_enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL);
        let action = v.handle_key(&ctrl_enter).unwrap();
        assert!(v.apply(action).is_some());
        assert_eq!(v.controller().selected(), None);
    }

    #[test]
    fn search_focuses_nearest_visible_ancestor() {
        let mut v = view();
        v.apply(TreeAction::Activate(Gesture::Plain));
        // root selected: everything but root collapsed
        press(&mut v, KeyCode::Char('/'));
        assert!(v.is_typing());
        for c in "listen".chars() {
            press(&mut v, KeyCode::Char(c));
        }
        assert_eq!(v.focused_match(), Some(NodeId(4)));
        assert_eq!(v.cursor(), Some(NodeId(3)));
        assert!(!v.controller().node(NodeId(3)).unwrap().expanded);
        press(&mut v, KeyCode::Enter);
        assert!(!v.is_typing());
        assert_eq!(v.query(), "listen");
    }

    #[test]
    fn n_cycles_through_matches() {
        let mut v = view();
        v.apply(TreeAction::SearchStart);
        for c in "launch".chars() {
            v.apply(TreeAction::SearchInput(c));
        }
        v.apply(TreeAction::SearchCommit);
        assert_eq!(v.matches(), vec![NodeId(1), NodeId(3)]);
        assert_eq!(v.focused_match(), Some(NodeId(1)));
        press(&mut v, KeyCode::Char('n'));
        assert_eq!(v.focused_match(), Some(NodeId(3)));
        press(&mut v, KeyCode::Char('n'));
        assert_eq!(v.focused_match(), Some(NodeId(1)));
        press(&mut v, KeyCode::Char('N'));
        assert_eq!(v.focused_match(), Some(NodeId(3)));
        press(&mut v, KeyCode::Esc);
        assert!(v.matches().is_empty());
    }

    #[test]
    fn filter_toggle_resets_cursor() {
        let mut v = view();
        press(&mut v, KeyCode::End);
        press(&mut v, KeyCode::Char('t'));
        assert!(v.controller().excludes_type());
        assert_eq!(v.controller().tree().len(), 3);
        assert_eq!(v.cursor(), Some(NodeId(0)));
        press(&mut v, KeyCode::Char('t'));
        assert_eq!(v.controller().tree().len(), 5);
    }

    #[test]
    fn left_collapses_then_climbs() {
        let mut v = view();
        press(&mut v, KeyCode::Down);
        press(&mut v, KeyCode::Left);
        assert!(!v.controller().node(NodeId(1)).unwrap().expanded);
        press(&mut v, KeyCode::Left);
        assert_eq!(v.cursor(), Some(NodeId(0)));
        press(&mut v, KeyCode::Down);
        press(&mut v, KeyCode::Down);
        assert_eq!(v.cursor(), Some(NodeId(3)));
    }

    #[test]
    fn mouse_clicks_map_to_rows() {
        let mut v = view();
        v.list_area = Rect::new(1, 1, 40, 10);
        let click = |kind, modifiers, row| MouseEvent { kind, column: 5, row, modifiers };

        let plain = v.handle_mouse(&click(MouseEventKind::Down(MouseButton::Left), KeyModifiers::NONE, 3));
        assert_eq!(plain, Some(TreeAction::ActivateRow(2, Gesture::Plain)));
        let right = v.handle_mouse(&click(MouseEventKind::Down(MouseButton::Right), KeyModifiers::NONE, 4));
        assert_eq!(right, Some(TreeAction::ActivateRow(3, Gesture::Modified)));
        let ctrl = v.handle_mouse(&click(MouseEventKind::Down(MouseButton::Left), KeyModifiers::CONTROL, 1));
        assert_eq!(ctrl, Some(TreeAction::ActivateRow(0, Gesture::Modified)));
        assert!(v.handle_mouse(&click(MouseEventKind::Down(MouseButton::Left), KeyModifiers::NONE, 0)).is_none());

        v.apply(TreeAction::ActivateRow(2, Gesture::Plain));
        assert_eq!(v.controller().selected(), Some(NodeId(2)));
        assert!(v.apply(TreeAction::ActivateRow(99, Gesture::Plain)).is_none());
    }

    #[test]
    fn anchor_is_topmost_collapsed_ancestor() {
        let v = view();
        let mut tree = v.controller().tree().clone();
        tree.get_mut(NodeId(0)).unwrap().expanded = false;
        tree.get_mut(NodeId(3)).unwrap().expanded = false;
        assert_eq!(visible_anchor(&tree, NodeId(4)), NodeId(0));
        tree.get_mut(NodeId(0)).unwrap().expanded = true;
        assert_eq!(visible_anchor(&tree, NodeId(4)), NodeId(3));
        assert_eq!(visible_anchor(&tree, NodeId(2)), NodeId(2));
    }
}

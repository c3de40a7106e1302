use lv_mod_params::FormAction;
use lv_mod_tree::TreeAction;

use crate::app::host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Form(FormAction),
    Tree(TreeAction),
    ShowParameters,
    ShowTree,
    /// Ask the analyzer for parameters again after a failure
    Retry,
    /// Terminal resized, just redraw
    Redraw,
}

pub fn apply_action(host: &mut Host, action: Action) {
    match action {
        Action::None | Action::Redraw => {}
        Action::Form(a) => {
            let message = host.form.as_mut().and_then(|form| form.apply(a));
            if let Some(message) = message {
                host.dispatch(message);
            }
        }
        Action::Tree(a) => {
            let message = host.tree.as_mut().and_then(|tree| tree.apply(a));
            if let Some(message) = message {
                host.dispatch(message);
            }
        }
        Action::ShowParameters => host.show_parameters(),
        Action::ShowTree => host.show_tree(),
        Action::Retry => host.request_parameters(),
    }
}

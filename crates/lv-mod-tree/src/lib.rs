pub mod model;
pub mod panel;
pub mod visibility;

pub use model::{LaunchTree, NodeId, RawNode, RawTree, TreeNode};
pub use panel::{TreeAction, TreeView};
pub use visibility::{Gesture, OpenRequest, VisibilityController, VisibleRow, resolve_open_target};

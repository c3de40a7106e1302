pub mod actions;
mod app;
pub mod events;
pub mod host;

pub use app::App;

pub mod analyzer;
pub mod opener;
pub mod server;

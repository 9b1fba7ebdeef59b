//! Interactive branch list for gittree.
//!
//! Shows the flattened branch tree with a cursor; Enter checks out the
//! selected branch and exits.

pub mod app;
pub mod config;

pub use app::{restore_terminal, run_ui, setup_terminal, App, Checkout};
pub use config::{Config, ConfigError, ListConfig, UiConfig};

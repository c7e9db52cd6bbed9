pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod schema;
pub mod transform;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{ErrorKind, EtlError, Result};
pub use ui::{ConsoleUi, Phase, SilentUi, Ui};

pub mod api;
pub mod cli;
pub mod config;
pub mod names;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod summary;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use normalize::{Normalizer, Record, Value};
pub use pipeline::{run_batch, BatchReport};
pub use ui::{ConsoleUi, Outcome, Phase, SilentUi, Tally, Ui, UiApp};

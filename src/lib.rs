pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod counts;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod logging;
pub mod output;
pub mod payload;
pub mod scheduler;
pub mod source;
pub mod tui;
pub mod view;

pub use config::Config;
pub use counts::{counts, Counts};
pub use dashboard::{ClientState, Dashboard, FetchTicket, RefreshOutcome};
pub use error::{DashError, Result};
pub use filter::{filter_tests, FilterTab, TestFilter};
pub use payload::{normalize, parse_body, Challenge, ResultPayload, RunPhase, TestCase, TestStatus};
pub use scheduler::{PollingScheduler, RefreshKind};
pub use source::{FileSource, HttpSource, ResultSource};
pub use view::{classify, select, RenderState, ViewModel};

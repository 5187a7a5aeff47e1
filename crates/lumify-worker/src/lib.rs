//! Lumify web worker services
//!
//! Runs next to the UI and owns the workspace store:
//! - Workspace switching ([`SwitchWorkspaceHandler`])
//! - Response interception that populates the store ([`AjaxInterceptor`])
//! - Workspace endpoints over a pluggable [`Transport`]
//! - Socket messages to the server ([`SocketSink`])
//! - View-side reconciliation of store updates ([`TrackedObject`])

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod context;
pub mod error;
pub mod interceptor;
pub mod replay;
pub mod service;
pub mod session;
pub mod socket;
pub mod switch;
pub mod transport;
pub mod view;

pub use config::WorkerConfig;
pub use context::{WorkerChannels, WorkerContext};
pub use error::WorkerError;
pub use interceptor::{AjaxInterceptor, SharedStore};
pub use replay::{replay_file, replay_reader, ReplaySummary};
pub use service::{WorkspaceApi, WorkspaceService};
pub use session::Session;
pub use socket::{ChannelSocket, SocketMessage, SocketSink};
pub use switch::{SwitchOutcome, SwitchWorkspace, SwitchWorkspaceHandler};
pub use transport::{HttpTransport, Transport};
pub use view::{Comment, CommentThread, TrackedObject};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

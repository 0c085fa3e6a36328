//! cloudctl Exec
//!
//! Remote command execution: submit a command to a target instance and poll
//! the resulting job until it reaches a terminal state.
//!
//! Architecture:
//! - Capabilities: the two remote calls the poller consumes (submit, query status)
//! - Job types: handle, payload, status and result of one remote job
//! - Configuration: poll interval, attempt limit, settle delay
//! - Poller: the poll-until-terminal loop
//!
//! The poller is transport-agnostic. Any type implementing
//! [`CommandSubmitter`] and [`StatusSource`] can drive it.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cloudctl_exec::{CommandPayload, CommandSubmitter, JobPoller, PollPolicy, StatusSource};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn run_uptime<C>(client: Arc<C>) -> cloudctl_exec::Result<()>
//! where
//!     C: CommandSubmitter + StatusSource + 'static,
//! {
//!     let poller = JobPoller::from_client(client);
//!     let result = poller
//!         .run(
//!             "i-0123456789abcdef0",
//!             &CommandPayload::shell("uptime"),
//!             &PollPolicy::default(),
//!             &CancellationToken::new(),
//!         )
//!         .await?;
//!     println!("{}", result.status);
//!     Ok(())
//! }
//! ```

pub mod capability;
pub mod config;
pub mod error;
pub mod job;
pub mod poller;

pub use capability::{CommandSubmitter, StatusReport, StatusSource};
pub use config::{AttemptLimit, PollPolicy};
pub use error::{BoxError, PollerError, Result};
pub use job::{CommandPayload, JobHandle, JobOutput, JobResult, JobStatus};
pub use poller::{JobPoller, NoopObserver, PollObserver};

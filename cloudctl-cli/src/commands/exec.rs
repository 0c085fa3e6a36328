//! Remote command execution
//!
//! Submits a shell command, prints progress while it runs and shows its
//! output once it finishes. An interrupt cancels the wait.

use anyhow::Result;
use cloudctl_client::ControlPlaneClient;
use cloudctl_exec::{
    CommandPayload, JobHandle, JobPoller, JobResult, JobStatus, PollObserver, PollPolicy,
    PollerError,
};
use colored::*;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::interrupt::Interrupts;

/// Prints poll progress to the terminal
struct ProgressPrinter;

impl PollObserver for ProgressPrinter {
    fn on_submitted(&self, handle: &JobHandle, target: &str) {
        println!(
            "Command sent to {}. Command ID: {}",
            target.cyan(),
            handle.as_str().cyan()
        );
        println!("{}", "Fetching result...".dimmed());
    }

    fn on_status(&self, _handle: &JobHandle, attempt: u32, status: JobStatus) {
        if !status.is_terminal() {
            println!(
                "  {} command running... ({}, attempt {})",
                "⋯".dimmed(),
                status,
                attempt
            );
        }
    }
}

/// Run `command` on `instance_id` and print its outcome
pub async fn run_command(
    client: ControlPlaneClient,
    policy: &PollPolicy,
    instance_id: &str,
    command: &str,
    interrupts: &Interrupts,
) -> Result<()> {
    let poller = JobPoller::from_client(Arc::new(client)).with_observer(Arc::new(ProgressPrinter));
    let payload = CommandPayload::shell(command);

    let cancel = CancellationToken::new();
    let run = poller.run(instance_id, &payload, policy, &cancel);
    tokio::pin!(run);

    let outcome = tokio::select! {
        outcome = &mut run => outcome,
        _ = interrupts.wait() => {
            cancel.cancel();
            run.await
        }
    };

    match outcome {
        Ok(result) => {
            print_result(&result);
            Ok(())
        }
        Err(PollerError::Cancelled { handle, attempts }) => {
            println!(
                "{}",
                format!(
                    "Stopped waiting for command {} after {} status checks.",
                    handle, attempts
                )
                .yellow()
            );
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn print_result(result: &JobResult) {
    match result.status {
        JobStatus::Success => println!("{} Command finished.", "✓".green()),
        JobStatus::TimedOut => {
            println!(
                "{}",
                format!(
                    "Command {} did not finish after {} status checks.",
                    result.handle, result.attempts
                )
                .yellow()
            );
            return;
        }
        status => println!("{} Command ended with status {}.", "✗".red(), status),
    }

    if let Some(output) = &result.output {
        println!("{}", "Output:".bold());
        println!("{}", output.stdout.trim_end());
        println!("{}", "Error:".bold());
        println!("{}", output.stderr.trim_end());
    }
}

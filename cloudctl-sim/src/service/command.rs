//! Command Service
//!
//! Accepts shell-script commands and answers invocation status queries.
//! Every query advances an invocation one step:
//! `Pending -> InProgress -> Success` (or `Failed` when the target was not
//! running at submission time). Terminal invocations stay terminal.

use cloudctl_core::domain::command::{
    COMMANDS_PARAMETER, CommandInvocation, InvocationStatus, RUN_SHELL_SCRIPT_DOCUMENT,
};
use cloudctl_core::dto::command::{CommandSummary, SendCommandRequest, SendCommandResponse};
use uuid::Uuid;

use crate::service::{ServiceError, ServiceResult, region_mut};
use crate::store::{InvocationRecord, Store};

/// Accept a command for every listed instance
pub async fn send_command(
    store: &Store,
    region_name: &str,
    req: SendCommandRequest,
) -> ServiceResult<SendCommandResponse> {
    if req.document_name != RUN_SHELL_SCRIPT_DOCUMENT {
        return Err(ServiceError::ValidationError(format!(
            "Unsupported document {}",
            req.document_name
        )));
    }
    if req.instance_ids.is_empty() {
        return Err(ServiceError::ValidationError(
            "At least one instance id is required".to_string(),
        ));
    }

    let commands: Vec<String> = req
        .parameters
        .get(COMMANDS_PARAMETER)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|c| !c.trim().is_empty())
        .collect();
    if commands.is_empty() {
        return Err(ServiceError::ValidationError(format!(
            "Parameter '{}' must contain a command",
            COMMANDS_PARAMETER
        )));
    }

    let mut inventory = store.write().await;
    let region = region_mut(&mut inventory, region_name)?;

    let mut failures = Vec::with_capacity(req.instance_ids.len());
    for instance_id in &req.instance_ids {
        let instance = region
            .instances
            .get(instance_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Instance {} not found", instance_id)))?;
        failures.push((!instance.state.accepts_commands()).then(|| {
            format!(
                "Instance {} is not running (state: {})",
                instance_id, instance.state
            )
        }));
    }

    let command_id = Uuid::new_v4().to_string();
    for (instance_id, failure) in req.instance_ids.iter().zip(failures) {
        region.invocations.insert(
            (command_id.clone(), instance_id.clone()),
            InvocationRecord {
                invocation: CommandInvocation {
                    command_id: command_id.clone(),
                    instance_id: instance_id.clone(),
                    status: InvocationStatus::Pending,
                    standard_output_content: String::new(),
                    standard_error_content: String::new(),
                },
                commands: commands.clone(),
                failure,
                queries: 0,
            },
        );
    }

    tracing::info!(
        "Command {} accepted for {} instance(s)",
        command_id,
        req.instance_ids.len()
    );

    Ok(SendCommandResponse {
        command: Some(CommandSummary {
            command_id,
            document_name: req.document_name,
            instance_ids: req.instance_ids,
        }),
    })
}

/// Report an invocation and advance it one step
pub async fn get_invocation(
    store: &Store,
    region_name: &str,
    command_id: &str,
    instance_id: &str,
) -> ServiceResult<CommandInvocation> {
    let mut inventory = store.write().await;
    let region = region_mut(&mut inventory, region_name)?;
    let record = region
        .invocations
        .get_mut(&(command_id.to_string(), instance_id.to_string()))
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "Invocation of command {} on {} not found",
                command_id, instance_id
            ))
        })?;

    advance(record);
    record.queries += 1;

    tracing::debug!(
        "Invocation {} on {} is {} after {} queries",
        command_id,
        instance_id,
        record.invocation.status,
        record.queries
    );

    Ok(record.invocation.clone())
}

fn advance(record: &mut InvocationRecord) {
    let invocation = &mut record.invocation;
    match record.queries {
        0 => invocation.status = InvocationStatus::Pending,
        1 => invocation.status = InvocationStatus::InProgress,
        _ if invocation.status.is_terminal() => {}
        _ => match &record.failure {
            Some(reason) => {
                invocation.status = InvocationStatus::Failed;
                invocation.standard_error_content = format!("{}\n", reason);
            }
            None => {
                invocation.status = InvocationStatus::Success;
                invocation.standard_output_content = simulate_output(&record.commands);
            }
        },
    }
}

/// Output the emulator pretends the commands printed
///
/// `echo` commands print their arguments; anything else prints a marker line.
fn simulate_output(commands: &[String]) -> String {
    commands
        .iter()
        .map(|command| match command.trim().strip_prefix("echo ") {
            Some(text) => format!("{}\n", text.trim_matches(|c| c == '"' || c == '\'')),
            None => format!("[simulated] {}\n", command.trim()),
        })
        .collect()
}

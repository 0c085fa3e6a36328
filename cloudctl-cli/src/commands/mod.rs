//! Commands module
//!
//! Defines all CLI commands and their handlers. Subcommands and menu entries
//! both resolve to an [`Action`], so the two front ends behave the same.

mod exec;
mod images;
mod instances;
mod regions;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::Config;
use crate::interrupt::Interrupts;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Interactive numbered menu (default)
    Menu,
    /// Instance management
    Instances {
        #[command(subcommand)]
        command: InstanceCommands,
    },
    /// List availability zones of the region
    Zones,
    /// List available regions
    Regions,
    /// Image management
    Images {
        #[command(subcommand)]
        command: ImageCommands,
    },
    /// Run a shell command on an instance and wait for its output
    Exec {
        /// Target instance ID
        #[arg(long)]
        instance: String,

        /// Command line to run
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

/// Instance subcommands
#[derive(Subcommand)]
pub enum InstanceCommands {
    /// List instances
    List,
    /// Start an instance
    Start { id: String },
    /// Stop an instance
    Stop { id: String },
    /// Reboot an instance
    Reboot { id: String },
    /// Launch an instance and tag it with a name
    Create {
        /// Image to launch from
        #[arg(long)]
        image: String,

        /// Value of the Name tag
        #[arg(long)]
        name: String,

        /// Key pair to install
        #[arg(long)]
        key: Option<String>,
    },
}

/// Image subcommands
#[derive(Subcommand)]
pub enum ImageCommands {
    /// List images owned by this account
    List,
    /// Capture an image from an instance
    Create {
        /// Source instance ID
        #[arg(long)]
        instance: String,

        /// Image name
        #[arg(long)]
        name: String,

        /// Image description
        #[arg(long)]
        description: Option<String>,
    },
}

/// One user-level operation with its collected arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ListInstances,
    ListZones,
    StartInstance {
        instance_id: String,
    },
    ListRegions,
    StopInstance {
        instance_id: String,
    },
    CreateInstance {
        image_id: String,
        name: String,
        key_name: Option<String>,
    },
    RebootInstance {
        instance_id: String,
    },
    ListImages,
    RunCommand {
        instance_id: String,
        command: String,
    },
    CreateImage {
        instance_id: String,
        name: String,
        description: Option<String>,
    },
}

impl Action {
    /// What the action was doing, for error lines ("Error starting instance: ...")
    pub fn failure_label(&self) -> &'static str {
        match self {
            Action::ListInstances => "fetching instances",
            Action::ListZones => "fetching availability zones",
            Action::StartInstance { .. } => "starting instance",
            Action::ListRegions => "fetching regions",
            Action::StopInstance { .. } => "stopping instance",
            Action::CreateInstance { .. } => "creating instance",
            Action::RebootInstance { .. } => "rebooting instance",
            Action::ListImages => "fetching images",
            Action::RunCommand { .. } => "executing command",
            Action::CreateImage { .. } => "creating image",
        }
    }

    /// Run the action with a client scoped to this call
    ///
    /// An interrupt abandons a pending request. A running remote command is
    /// cancelled instead, so its handle can still be reported.
    pub async fn perform(self, config: &Config, interrupts: &Interrupts) -> Result<()> {
        let client = config.client();

        match self {
            Action::ListInstances => interrupts.guard(instances::list_instances(&client)).await,
            Action::ListZones => interrupts.guard(regions::list_zones(&client)).await,
            Action::StartInstance { instance_id } => {
                interrupts
                    .guard(instances::start_instance(&client, &instance_id))
                    .await
            }
            Action::ListRegions => interrupts.guard(regions::list_regions(&client)).await,
            Action::StopInstance { instance_id } => {
                interrupts
                    .guard(instances::stop_instance(&client, &instance_id))
                    .await
            }
            Action::CreateInstance {
                image_id,
                name,
                key_name,
            } => {
                interrupts
                    .guard(instances::create_instance(&client, &image_id, &name, key_name))
                    .await
            }
            Action::RebootInstance { instance_id } => {
                interrupts
                    .guard(instances::reboot_instance(&client, &instance_id))
                    .await
            }
            Action::ListImages => interrupts.guard(images::list_images(&client)).await,
            Action::RunCommand {
                instance_id,
                command,
            } => exec::run_command(client, &config.poll, &instance_id, &command, interrupts).await,
            Action::CreateImage {
                instance_id,
                name,
                description,
            } => {
                interrupts
                    .guard(images::create_image(&client, &instance_id, &name, description))
                    .await
            }
        }
    }
}

impl From<InstanceCommands> for Action {
    fn from(command: InstanceCommands) -> Self {
        match command {
            InstanceCommands::List => Action::ListInstances,
            InstanceCommands::Start { id } => Action::StartInstance { instance_id: id },
            InstanceCommands::Stop { id } => Action::StopInstance { instance_id: id },
            InstanceCommands::Reboot { id } => Action::RebootInstance { instance_id: id },
            InstanceCommands::Create { image, name, key } => Action::CreateInstance {
                image_id: image,
                name,
                key_name: key,
            },
        }
    }
}

impl From<ImageCommands> for Action {
    fn from(command: ImageCommands) -> Self {
        match command {
            ImageCommands::List => Action::ListImages,
            ImageCommands::Create {
                instance,
                name,
                description,
            } => Action::CreateImage {
                instance_id: instance,
                name,
                description,
            },
        }
    }
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
/// * `interrupts` - Ctrl-C notifications of the process
pub async fn handle_command(
    command: Commands,
    config: &Config,
    interrupts: &Interrupts,
) -> Result<()> {
    let action = match command {
        Commands::Menu => {
            crate::menu::run_interactive(config, interrupts).await?;
            return Ok(());
        }
        Commands::Instances { command } => Action::from(command),
        Commands::Zones => Action::ListZones,
        Commands::Regions => Action::ListRegions,
        Commands::Images { command } => Action::from(command),
        Commands::Exec { instance, command } => Action::RunCommand {
            instance_id: instance,
            command: command.join(" "),
        },
    };

    let label = action.failure_label();
    action
        .perform(config, interrupts)
        .await
        .with_context(|| format!("Error {}", label))
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::{collections::HashMap, path::PathBuf};
use sudo_notification_client::{
    NotificationClient,
    api::gateway::GraphQLGateway,
    configuration::{
        NotificationFilterItem, NotificationSettingsInput, NotificationStatus,
        UserNotificationSettingsInput,
    },
    device::DeviceInfo,
    handler::{PLATFORM_DATA_KEY, PushMessage},
    session::SessionProvider,
    settings::Settings,
    startup::{start_http_client, start_offline_client},
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sudo-notify", about = "Manage push notification registration and filters")]
struct Cli {
    /// Settings file; defaults to `settings.*` in the working directory
    #[arg(long, short)]
    settings: Option<PathBuf>,

    /// Access token of the signed-in user
    #[arg(long, env = "SUDO_NOTIFY_TOKEN")]
    token: Option<String>,

    /// Use the in-memory notification service instead of the configured API
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register the device for push notifications
    Register {
        #[arg(long)]
        device: PathBuf,
    },
    /// Remove the device's registration
    Deregister {
        #[arg(long)]
        device: PathBuf,
    },
    /// Update the registered device's token, locale and version
    Update {
        #[arg(long)]
        device: PathBuf,
    },
    /// Show the device's filter configuration
    GetConfig {
        #[arg(long)]
        device: PathBuf,
    },
    /// Show the user's filter configuration
    GetUserConfig,
    /// Show both the user's and the device's filter configuration
    GetAllConfig {
        #[arg(long)]
        device: PathBuf,
    },
    /// Replace the device's filters with the ones in FILE
    SetConfig {
        #[arg(long)]
        device: PathBuf,
        file: PathBuf,
    },
    /// Replace the user's filters with the ones in FILE
    SetUserConfig { file: PathBuf },
    /// Route a `sudoplatform` payload to its handler
    Process { payload: String },
}

/// A filter as written in a filter file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterEntry {
    service_name: String,
    status: NotificationStatus,
    #[serde(default)]
    rule: String,
    #[serde(default)]
    meta: String,
}

impl From<FilterEntry> for NotificationFilterItem {
    fn from(entry: FilterEntry) -> Self {
        NotificationFilterItem::new(entry.service_name, entry.status, entry.rule, entry.meta)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("RUST_LOG"))
        .init();

    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::load_from_path(path)?,
        None => Settings::load()?,
    };

    if cli.offline {
        debug!("using in-memory notification service");
        let client = start_offline_client(&settings, cli.token)?;
        run(&client, &settings, cli.command).await
    } else {
        let client = start_http_client(&settings, cli.token)?;
        run(&client, &settings, cli.command).await
    }
}

async fn run<G: GraphQLGateway, S: SessionProvider>(
    client: &NotificationClient<G, S>,
    settings: &Settings,
    command: Command,
) -> Result<()> {
    match command {
        Command::Register { device } => {
            client.register_notification(&read_device(&device)?).await?;
            println!("Device registered");
        }
        Command::Deregister { device } => {
            client.deregister_notification(&read_device(&device)?).await?;
            println!("Device deregistered");
        }
        Command::Update { device } => {
            client
                .update_notification_registration(&read_device(&device)?)
                .await?;
            println!("Device registration updated");
        }
        Command::GetConfig { device } => {
            let config = client
                .get_notification_configuration(&read_device(&device)?)
                .await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::GetUserConfig => {
            let config = client.get_user_notification_configuration().await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::GetAllConfig { device } => {
            let config = client
                .get_user_and_device_notification_configuration(&read_device(&device)?)
                .await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::SetConfig { device, file } => {
            let device = read_device(&device)?;
            let config = client
                .set_notification_configuration(NotificationSettingsInput {
                    bundle_id: device.bundle_id,
                    device_id: device.device_id,
                    filter: read_filters(&file)?,
                    services: client.schemas(),
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::SetUserConfig { file } => {
            let bundle_id = settings
                .notification_service
                .as_ref()
                .map(|notification| notification.bundle_id.clone())
                .unwrap_or_default();
            let config = client
                .set_user_notification_configuration(UserNotificationSettingsInput {
                    bundle_id,
                    filter: read_filters(&file)?,
                    services: client.schemas(),
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Process { payload } => {
            let message = PushMessage::new(HashMap::from([(
                PLATFORM_DATA_KEY.to_string(),
                payload,
            )]));
            client.process(&message)?;
        }
    }

    Ok(())
}

fn read_device(path: &PathBuf) -> Result<DeviceInfo> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read device file {}", path.display()))?;
    Ok(serde_json::from_str(&contents)?)
}

fn read_filters(path: &PathBuf) -> Result<Vec<NotificationFilterItem>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read filter file {}", path.display()))?;
    let entries: Vec<FilterEntry> = serde_json::from_str(&contents)?;
    Ok(entries.into_iter().map(NotificationFilterItem::from).collect())
}

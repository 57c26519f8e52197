//! Command handlers. Results go to stdout as pretty JSON.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use huddle_api_client::{ApiClient, ClientConfig};
use huddle_core::models::{CreateEvent, EventFilter, ParticipantDecision, RegisterRequest};
use huddle_core::session::{FileTokenStore, SessionManager};
use serde::Serialize;
use serde_json::json;

use crate::cli::{Cli, Commands, CreateEventArgs, EventCommands, GlobalArgs};
use crate::Result;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionStatus {
    authenticated: bool,
    expired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    session_file: PathBuf,
}

pub async fn dispatch(cli: Cli) -> Result<()> {
    let store = open_store(&cli.global)?;
    let session_file = store.path().to_path_buf();
    let session = Arc::new(SessionManager::new(store));

    if let Commands::Status = cli.command {
        return print(&SessionStatus {
            authenticated: session.is_authenticated(),
            expired: session.is_expired(),
            expires_at: session.expires_at(),
            session_file,
        });
    }

    let client = build_client(&cli.global, session)?;

    match cli.command {
        // Handled before a client exists.
        Commands::Version | Commands::Status => Ok(()),
        Commands::Login { email, password } => {
            client.login(&email, &password).await?;
            print(&json!({
                "authenticated": true,
                "expiresAt": client.session().expires_at(),
            }))
        }
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
            phone,
        } => {
            let response = client
                .register(&RegisterRequest {
                    email,
                    password,
                    first_name,
                    last_name,
                    phone,
                })
                .await?;
            print(&response)
        }
        Commands::Logout => {
            client.logout().await?;
            print(&json!({ "authenticated": false }))
        }
        Commands::Refresh => {
            client.refresh_session().await?;
            print(&json!({
                "authenticated": true,
                "expiresAt": client.session().expires_at(),
            }))
        }
        Commands::Categories => print(&client.categories().await?),
        Commands::MyEvents => print(&client.my_events().await?),
        Commands::Events(command) => events(&client, command).await,
    }
}

async fn events(client: &ApiClient, command: EventCommands) -> Result<()> {
    match command {
        EventCommands::List {
            lat,
            lon,
            radius,
            category,
        } => {
            let filter = EventFilter {
                lat,
                lon,
                radius,
                category,
            };
            print(&client.list_events(&filter).await?)
        }
        EventCommands::Show { id } => print(&client.event(&id).await?),
        EventCommands::Participants { id } => print(&client.event_participants(&id).await?),
        EventCommands::Create(args) => print(&client.create_event(&create_payload(args)).await?),
        EventCommands::Join { id } => {
            client.join_event(&id).await?;
            print(&json!({ "joined": id }))
        }
        EventCommands::Leave { id } => {
            client.leave_event(&id).await?;
            print(&json!({ "left": id }))
        }
        EventCommands::Decide {
            id,
            user_id,
            status,
        } => {
            let decision: ParticipantDecision = status.into();
            client.decide_participant(&id, &user_id, decision).await?;
            print(&json!({ "eventId": id, "userId": user_id, "status": decision }))
        }
        EventCommands::Delete { id } => {
            client.delete_event(&id).await?;
            print(&json!({ "deleted": id }))
        }
    }
}

fn open_store(global: &GlobalArgs) -> Result<FileTokenStore> {
    match &global.session_file {
        Some(path) => Ok(FileTokenStore::new(path.clone())),
        None => Ok(FileTokenStore::at_default_path()?),
    }
}

fn build_client(global: &GlobalArgs, session: Arc<SessionManager>) -> Result<ApiClient> {
    let config = ClientConfig {
        base_url: global.api_url.clone(),
        request_timeout: Duration::from_secs(global.timeout_secs),
        ..ClientConfig::from_env()
    };
    Ok(ApiClient::new(config, session)?)
}

fn create_payload(args: CreateEventArgs) -> CreateEvent {
    CreateEvent {
        category_id: args.category_id,
        title: args.title,
        description: args.description,
        lat: args.lat,
        lon: args.lon,
        start_time: args.start_time,
        max_participants: args.max_participants,
        price: args.price,
        requires_approval: args.requires_approval,
    }
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// Connectivity event commands

use crate::client::{Client, ClientError};
use crate::output::{print_field, print_table_header, print_table_row, OutputFormat};
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::Subcommand;
use netmon_core::{timestamp, Event, EventFilter, EventId};
use serde::{Deserialize, Serialize};

#[derive(Subcommand)]
pub enum EventsCommand {
    /// List events, most recent first
    List {
        /// Maximum number of events (0 lists everything)
        #[arg(long, short, default_value_t = 0)]
        limit: i64,

        /// Only disconnected events: disconnected, wifi or internet
        #[arg(long, short)]
        filter: Option<EventFilter>,
    },

    /// Get event by ID
    Get {
        /// Event ID
        event_id: EventId,
    },

    /// Log a single event
    Log {
        /// Whether WiFi was connected
        #[arg(long, action = clap::ArgAction::Set)]
        wifi: bool,

        /// Whether the internet was reachable
        #[arg(long, action = clap::ArgAction::Set)]
        internet: bool,

        /// Event time (RFC 3339; defaults to the server's current time)
        #[arg(long, value_parser = timestamp::parse)]
        timestamp: Option<DateTime<Utc>>,

        /// Free-form note
        #[arg(long, short)]
        message: Option<String>,
    },

    /// Log a batch of events from a JSON or YAML file
    Import {
        /// File containing an array of events
        #[arg(short, long)]
        file: String,
    },

    /// Replace every field of an event
    Update {
        /// Event ID
        event_id: EventId,

        /// Whether WiFi was connected
        #[arg(long, action = clap::ArgAction::Set)]
        wifi: bool,

        /// Whether the internet was reachable
        #[arg(long, action = clap::ArgAction::Set)]
        internet: bool,

        /// Event time (RFC 3339)
        #[arg(long, value_parser = timestamp::parse)]
        timestamp: DateTime<Utc>,

        /// Free-form note (omitted clears it)
        #[arg(long, short)]
        message: Option<String>,
    },

    /// Delete an event
    Delete {
        /// Event ID
        event_id: EventId,
    },
}

/// Event body sent to the API, also the shape of each entry in an import file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventPayload {
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    timestamp: Option<DateTime<Utc>>,
    wifi_connected: bool,
    internet_connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

pub async fn run(
    command: EventsCommand,
    client: &Client,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        EventsCommand::List { limit, filter } => list(client, output, filter, limit).await,
        EventsCommand::Get { event_id } => get(client, output, event_id).await,
        EventsCommand::Log {
            wifi,
            internet,
            timestamp,
            message,
        } => {
            let payload = EventPayload {
                timestamp,
                wifi_connected: wifi,
                internet_connected: internet,
                message,
            };
            log(client, output, quiet, payload).await
        }
        EventsCommand::Import { file } => import(client, output, quiet, &file).await,
        EventsCommand::Update {
            event_id,
            wifi,
            internet,
            timestamp,
            message,
        } => {
            let payload = EventPayload {
                timestamp: Some(timestamp),
                wifi_connected: wifi,
                internet_connected: internet,
                message,
            };
            update(client, output, quiet, event_id, payload).await
        }
        EventsCommand::Delete { event_id } => delete(client, output, quiet, event_id).await,
    }
}

/// API path for a listing
fn list_path(filter: Option<EventFilter>, limit: i64) -> String {
    let base = match filter {
        None => "/api/events",
        Some(EventFilter::Disconnected) => "/api/events/failed",
        Some(EventFilter::WifiDisconnected) => "/api/events/failed/wifi",
        Some(EventFilter::InternetDisconnected) => "/api/events/failed/internet",
    };
    if limit > 0 {
        format!("{}?limit={}", base, limit)
    } else {
        base.to_string()
    }
}

fn event_path(event_id: EventId) -> String {
    format!("/api/events/{}", event_id)
}

/// Parse an import file by extension, trying YAML then JSON otherwise
fn parse_import(path: &str, content: &str) -> Result<Vec<EventPayload>> {
    let events = if path.ends_with(".json") {
        serde_json::from_str(content).with_context(|| format!("Failed to parse JSON: {}", path))?
    } else if path.ends_with(".yaml") || path.ends_with(".yml") {
        serde_yaml::from_str(content).with_context(|| format!("Failed to parse YAML: {}", path))?
    } else {
        serde_yaml::from_str(content)
            .or_else(|_| serde_json::from_str(content))
            .with_context(|| format!("Failed to parse file (tried YAML and JSON): {}", path))?
    };
    Ok(events)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn up_down(flag: bool) -> &'static str {
    if flag {
        "up"
    } else {
        "down"
    }
}

fn print_event(event: &Event) {
    print_field("ID", &event.id.to_string());
    print_field("Time", &format_timestamp(&event.timestamp));
    print_field("WiFi", up_down(event.wifi_connected));
    print_field("Internet", up_down(event.internet_connected));
    if let Some(message) = &event.message {
        print_field("Message", message);
    }
}

fn print_events(events: &[Event]) {
    print_table_header(&[
        ("ID", 8),
        ("TIME", 20),
        ("WIFI", 4),
        ("INTERNET", 8),
        ("MESSAGE", 40),
    ]);
    for event in events {
        print_table_row(&[
            (&event.id.to_string(), 8),
            (&format_timestamp(&event.timestamp), 20),
            (up_down(event.wifi_connected), 4),
            (up_down(event.internet_connected), 8),
            (event.message.as_deref().unwrap_or("-"), 40),
        ]);
    }
}

fn not_found(event_id: EventId) -> impl FnOnce(ClientError) -> anyhow::Error {
    move |e| match e {
        ClientError::NotFound(_) => anyhow::anyhow!("Event not found: {}", event_id),
        e => e.into(),
    }
}

async fn list(
    client: &Client,
    output: OutputFormat,
    filter: Option<EventFilter>,
    limit: i64,
) -> Result<()> {
    let events: Vec<Event> = client.get(&list_path(filter, limit)).await?;

    if output.is_text() {
        if events.is_empty() {
            println!("No events found");
            return Ok(());
        }
        print_events(&events);
    } else {
        output.print_value(&events)?;
    }

    Ok(())
}

async fn get(client: &Client, output: OutputFormat, event_id: EventId) -> Result<()> {
    let event: Event = client
        .get(&event_path(event_id))
        .await
        .map_err(not_found(event_id))?;

    if output.is_text() {
        print_event(&event);
    } else {
        output.print_value(&event)?;
    }

    Ok(())
}

async fn log(
    client: &Client,
    output: OutputFormat,
    quiet: bool,
    payload: EventPayload,
) -> Result<()> {
    let event: Event = client.post("/api/events", &payload).await?;

    if output.is_text() {
        if quiet {
            println!("{}", event.id);
        } else {
            println!("Logged event: {}", event.id);
            print_event(&event);
        }
    } else {
        output.print_value(&event)?;
    }

    Ok(())
}

async fn import(client: &Client, output: OutputFormat, quiet: bool, path: &str) -> Result<()> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))?;
    let payloads = parse_import(path, &content)?;

    if payloads.is_empty() {
        if output.is_text() && !quiet {
            println!("No events in {}", path);
        }
        return Ok(());
    }

    let events: Vec<Event> = client.post("/api/events/multiple", &payloads).await?;

    if output.is_text() {
        if quiet {
            for event in &events {
                println!("{}", event.id);
            }
        } else {
            println!("Imported {} events", events.len());
            print_events(&events);
        }
    } else {
        output.print_value(&events)?;
    }

    Ok(())
}

async fn update(
    client: &Client,
    output: OutputFormat,
    quiet: bool,
    event_id: EventId,
    payload: EventPayload,
) -> Result<()> {
    let event: Event = client.put(&event_path(event_id), &payload).await?;

    if output.is_text() {
        if !quiet {
            println!("Updated event: {}", event.id);
            print_event(&event);
        }
    } else {
        output.print_value(&event)?;
    }

    Ok(())
}

async fn delete(client: &Client, output: OutputFormat, quiet: bool, event_id: EventId) -> Result<()> {
    client
        .delete(&event_path(event_id))
        .await
        .map_err(not_found(event_id))?;

    if output.is_text() && !quiet {
        println!("Deleted event: {}", event_id);
    } else if !output.is_text() {
        output.print_value(&serde_json::json!({ "id": event_id, "status": "deleted" }))?;
    }

    Ok(())
}

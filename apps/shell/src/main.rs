//! traybell — tray notification client for the notice service.
//!
//! Connects to the configured service, logs incoming notices, and
//! drives the alert surface through a terminal-backed tray shell.

mod commands;
mod settings;
mod terminal;

use std::sync::Arc;

use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tracing::{error, info};

use traybell_connection::{
    ConnectionEvent, ConnectionManager, ConnectionState, Endpoint, HeartbeatConfig,
};
use traybell_identity::machine_id;
use traybell_notify::NoticeSink;

use crate::commands::Command;
use crate::settings::{Settings, default_settings_path};
use crate::terminal::TerminalShell;

#[derive(Debug, Parser)]
#[command(name = "traybell", about = "Tray notification client for the notice service")]
struct Args {
    /// Path to the settings file (JSON with a "url" key).
    #[arg(long)]
    settings: Option<std::path::PathBuf>,

    /// Service URL override; skips the settings file.
    #[arg(long)]
    url: Option<String>,
}

/// Top-level errors of the shell binary.
#[derive(Debug, thiserror::Error)]
enum ShellError {
    #[error("no settings file found; pass --settings or --url")]
    NoSettings,

    #[error(transparent)]
    Settings(#[from] settings::SettingsError),

    /// Identity failure is fatal by design: there is nothing to retry.
    #[error("machine identity unavailable, not connecting: {0}")]
    Identity(#[from] traybell_identity::IdentityError),

    #[error("invalid service url: {0}")]
    Url(#[from] url::ParseError),
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), ShellError> {
    let url = match args.url {
        Some(url) => url,
        None => {
            let path = args
                .settings
                .or_else(default_settings_path)
                .ok_or(ShellError::NoSettings)?;
            Settings::load(&path)?.url
        }
    };

    let machine_id = machine_id()?;
    let endpoint = Endpoint::new(&url, &machine_id)?;
    info!(url = %endpoint.url(), "starting notice client");

    let shell = Arc::new(TerminalShell);
    let sink = NoticeSink::new(shell);

    let manager = ConnectionManager::new(endpoint, HeartbeatConfig::default());
    let Some(mut events) = manager.take_events().await else {
        return Ok(());
    };
    manager.start().await;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut pending_clear = false;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }

            ev = events.recv() => match ev {
                Some(ConnectionEvent::StateChanged(state)) => {
                    let online = state == ConnectionState::Connected;
                    info!(?state, online, "connection state");
                }
                Some(ConnectionEvent::Notice(notice)) => {
                    sink.receive(&notice.message);
                }
                None => break,
            },

            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                match Command::parse(&line) {
                    Some(cmd) => {
                        if handle_command(cmd, &sink, &mut pending_clear) {
                            break;
                        }
                    }
                    None => println!("commands: list, delete <id>, clear, ack, quit"),
                }
            }
        }
    }

    manager.shutdown().await;
    sink.acknowledge();
    Ok(())
}

/// Applies one user command. Returns `true` on quit.
fn handle_command(cmd: Command, sink: &NoticeSink, pending_clear: &mut bool) -> bool {
    match cmd {
        Command::List => {
            if sink.is_empty() {
                println!("no notices");
            }
            for record in sink.records() {
                println!(
                    "{:>4}  {}  {}",
                    record.id,
                    record.received_at.format("%Y-%m-%d %H:%M:%S"),
                    record.text
                );
            }
            // Viewing the log acknowledges the alert.
            sink.acknowledge();
            *pending_clear = false;
        }
        Command::Delete(id) => {
            if sink.delete(id) {
                println!("deleted {id}");
            } else {
                println!("no notice {id}");
            }
            *pending_clear = false;
        }
        Command::Clear => {
            if sink.is_empty() {
                println!("log already empty");
            } else {
                println!("clear {} notices? (y to confirm)", sink.len());
                *pending_clear = true;
            }
        }
        Command::Yes => {
            if *pending_clear {
                sink.clear();
                *pending_clear = false;
                println!("cleared");
            }
        }
        Command::Ack => {
            sink.acknowledge();
            *pending_clear = false;
        }
        Command::Quit => return true,
    }
    false
}

//! Bitflip CLI - binary entry point and line-driven shell.
//!
//! Wires configuration, logging, an in-memory profile store and the
//! [`ProfileSync`] controller together.
//!
//! # Event Loop
//!
//! A fixed 25ms cadence drives the controller:
//!
//! 1. Wait for either a tick or an input line
//! 2. Apply the parsed command (non-blocking)
//! 3. Advance controller state (`sync.tick(now)`)
//! 4. Print any queued notifications
//!
//! On quit or end of input the pending appearance write is flushed and the
//! shell waits briefly for outstanding store calls.
//!
//! # Logging
//!
//! Logs go to `$BITFLIP_LOG_FILE`, else `~/.bitflip/logs/bitflip.log`, else
//! `./.bitflip/logs/bitflip.log`. If none opens, warnings go to stderr.

mod commands;

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use bitflip_config::BitflipConfig;
use bitflip_engine::{FlipPhase, MemoryProfileStore, ProfileSync, Session, UserId};

use commands::{HELP, ShellCommand};

const TICK_INTERVAL: Duration = Duration::from_millis(25);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Overrides the log filter; falls back to `RUST_LOG`, then `info`.
const LOG_FILTER_ENV: &str = "BITFLIP_LOG";
/// Overrides where the log file is written.
const LOG_FILE_ENV: &str = "BITFLIP_LOG_FILE";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match open_log_file(log_file_candidates()) {
        Ok((log_path, file)) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::info!(path = %log_path.display(), "Logging initialized");
        }
        Err(failures) => {
            // Shell output owns stdout; only warnings go to stderr.
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(EnvFilter::new("warn"))
                .init();
            for failure in failures {
                tracing::warn!("{failure}");
            }
        }
    }
}

/// First candidate that opens for appending, or why each one failed.
fn open_log_file(candidates: Vec<PathBuf>) -> Result<(PathBuf, fs::File), Vec<String>> {
    let mut failures = Vec::new();
    for candidate in candidates {
        let opened = candidate
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| OpenOptions::new().create(true).append(true).open(&candidate));
        match opened {
            Ok(file) => return Ok((candidate, file)),
            Err(e) => failures.push(format!("No log file at {}: {e}", candidate.display())),
        }
    }
    Err(failures)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::env::var_os(LOG_FILE_ENV)
        .map(PathBuf::from)
        .into_iter()
        .collect();
    if let Some(dir) = BitflipConfig::path().as_deref().and_then(Path::parent) {
        candidates.push(dir.join("logs").join("bitflip.log"));
    }
    candidates.push(PathBuf::from(".bitflip").join("logs").join("bitflip.log"));
    candidates
}

fn guest_user() -> Result<UserId> {
    Ok(UserId::new(format!("guest-{}", uuid::Uuid::new_v4()))?)
}

fn print_notifications(sync: &mut ProfileSync) {
    for notification in sync.take_notifications() {
        println!("! {}", notification.message());
    }
}

fn print_view(sync: &ProfileSync) -> Result<()> {
    let user = match sync.session() {
        Session::Anonymous => "(signed out)".to_string(),
        Session::Authenticated(user) => user.to_string(),
    };
    let flip = sync.flip_state();
    println!("user:       {user}");
    println!(
        "bit:        {} ({} flips, {})",
        if flip.status { "on" } else { "off" },
        flip.counter,
        sync.phase().as_str()
    );
    println!("unlocks:    [{}]", sync.unlocks().to_ids().join(", "));
    println!(
        "appearance: {}",
        serde_json::to_string_pretty(sync.appearance())?
    );
    if sync.has_pending_write() {
        println!("(appearance changes not saved yet)");
    }
    Ok(())
}

/// Apply one command. Returns `false` when the shell should exit.
fn run_command(
    sync: &mut ProfileSync,
    store: &MemoryProfileStore,
    command: ShellCommand,
) -> Result<bool> {
    let now = Instant::now();
    match command {
        ShellCommand::Flip => {
            let was_pending = sync.phase() == FlipPhase::Pending;
            sync.request_flip(now);
            if was_pending && sync.phase() == FlipPhase::Pending {
                println!("(cooling down)");
            }
        }
        ShellCommand::Change(change) => {
            let before = *sync.appearance();
            sync.request_appearance_change(&change, now);
            if *sync.appearance() == before {
                println!("(no change: locked or already set)");
            }
        }
        ShellCommand::Show => print_view(sync)?,
        ShellCommand::Resync => sync.resync(),
        ShellCommand::SignIn(user) => {
            store.create_account(&user);
            sync.sign_in(user);
        }
        ShellCommand::SignOut => sync.sign_out(),
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Give outstanding store calls a bounded window to report back.
async fn drain(sync: &mut ProfileSync) {
    let give_up = Instant::now() + SHUTDOWN_GRACE;
    while sync.has_outstanding() && Instant::now() < give_up {
        tokio::time::sleep(TICK_INTERVAL).await;
        sync.tick(Instant::now());
    }
    if sync.has_outstanding() {
        tracing::warn!("Exiting with store calls still outstanding");
    }
    print_notifications(sync);
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = BitflipConfig::load().unwrap_or_default();
    let user = match config.user_id() {
        Some(user) => user,
        None => guest_user()?,
    };

    let store = MemoryProfileStore::new();
    store.create_account(&user);

    let mut sync = ProfileSync::new(Arc::new(store.clone()), config.sync_settings());
    sync.sign_in(user.clone());
    println!("bitflip: signed in as {user}. Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                sync.tick(Instant::now());
                print_notifications(&mut sync);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match ShellCommand::parse(&line) {
                    Ok(Some(command)) => {
                        if !run_command(&mut sync, &store, command)? {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => println!("error: {err:#}"),
                }
            }
        }
    }

    sync.shutdown();
    drain(&mut sync).await;
    tracing::info!("Shell exited");
    Ok(())
}

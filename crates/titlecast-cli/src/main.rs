//! Titlecast CLI
//!
//! Loads a station list, monitors the selected stream for title changes,
//! prints them as they happen, and takes commands over a TCP remote
//! socket.

mod app;
mod config;
mod error;
mod remote;
mod stations;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use app::controller::AppController;
use app::state::{AppCommand, AppSnapshot};
use stations::Station;

/// Watch internet radio streams and print the track titles they carry
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Station number to start with (1-based, as in the remote protocol)
    station: Option<usize>,

    /// Path to the station file
    #[arg(long, default_value = config::app::STATIONS_FILE)]
    stations: PathBuf,

    /// Monitor a single stream URL instead of a station file
    #[arg(long, conflicts_with = "station")]
    url: Option<String>,

    /// Bind address for the remote-control socket
    #[arg(long, default_value = config::remote::DEFAULT_ADDR)]
    remote_addr: SocketAddr,

    /// Run without the remote-control socket
    #[arg(long)]
    no_remote: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> error::Result<()> {
    let stations: Arc<[Station]> = match &args.url {
        Some(url) => Arc::from(vec![Station {
            title: url.clone(),
            url: url.clone(),
        }]),
        None => Arc::from(stations::load_stations(&args.stations)?),
    };

    let (cmd_tx, cmd_rx) = crossbeam_channel::bounded(64);
    let shared_state = Arc::new(Mutex::new(AppSnapshot::default()));

    let controller = {
        let state = shared_state.clone();
        let stations = stations.clone();
        thread::Builder::new()
            .name("controller".into())
            .spawn(move || AppController::new(cmd_rx, state, stations).run())
            .expect("Failed to spawn controller thread")
    };

    if !args.no_remote {
        let server = remote::RemoteServer::bind(
            args.remote_addr,
            cmd_tx.clone(),
            shared_state.clone(),
            stations.clone(),
        )?;
        info!(addr = %server.local_addr()?, "remote control ready");
        thread::Builder::new()
            .name("remote".into())
            .spawn(move || server.run())
            .expect("Failed to spawn remote thread");
    }

    if let Some(n) = args.station {
        if n >= 1 {
            let _ = cmd_tx.send(AppCommand::Play(n - 1));
        } else {
            warn!("station numbers start at 1");
        }
    } else if args.url.is_some() {
        let _ = cmd_tx.send(AppCommand::Play(0));
    }

    print_stations(&stations);

    // Print now-playing changes until the controller exits
    let mut last_line = String::new();
    loop {
        thread::sleep(Duration::from_secs(config::display::POLL_INTERVAL_SECS));
        if controller.is_finished() {
            break;
        }
        let line = {
            let state = shared_state.lock().unwrap_or_else(|e| e.into_inner());
            match &state.station_title {
                Some(title) => format!("{} | {}", station_label(title), state.now_playing),
                None => state.now_playing.clone(),
            }
        };
        if line != last_line {
            println!("{line}");
            last_line = line;
        }
    }
    let _ = controller.join();
    Ok(())
}

fn print_stations(stations: &[Station]) {
    println!("Stations:");
    for (i, station) in stations.iter().enumerate() {
        println!("{:>3}. {}", i + 1, station.title);
    }
}

/// Station name shortened for a one-line display
fn station_label(title: &str) -> String {
    let chars = title.chars().count();
    if chars > config::display::MAX_STATION_CHARS {
        let kept: String = title
            .chars()
            .take(config::display::STATION_TRUNCATE_TO)
            .collect();
        format!("{kept}...")
    } else {
        title.to_string()
    }
}

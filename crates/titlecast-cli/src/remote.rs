//! Remote-control server
//!
//! Accepts plain-text commands over TCP, one request per connection, and
//! forwards them to the controller. The wire protocol is line-free: the
//! client writes a short command, reads an optional response, and the
//! connection closes.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::Sender;
use tracing::{debug, info, warn};

use crate::app::state::{AppCommand, AppSnapshot};
use crate::config::remote::{ACCEPT_POLL_MS, CLIENT_TIMEOUT_SECS};
use crate::stations::Station;

pub struct RemoteServer {
    listener: TcpListener,
    cmd_tx: Sender<AppCommand>,
    shared_state: Arc<Mutex<AppSnapshot>>,
    stations: Arc<[Station]>,
    shutdown: Arc<AtomicBool>,
}

impl RemoteServer {
    /// Bind the remote-control listener
    pub fn bind(
        addr: SocketAddr,
        cmd_tx: Sender<AppCommand>,
        shared_state: Arc<Mutex<AppSnapshot>>,
        stations: Arc<[Station]>,
    ) -> crate::error::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            cmd_tx,
            shared_state,
            stations,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Flag that stops the accept loop when raised
    #[allow(dead_code)] // the listener runs until process exit; tests use this
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// Accept loop. Blocks until the shutdown flag is raised; call from a
    /// dedicated thread.
    pub fn run(&self) {
        info!("remote control listening");
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                debug!("remote control shutting down");
                return;
            }
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    debug!(%peer, "remote client connected");
                    if let Err(e) = self.handle_client(stream) {
                        debug!(error = %e, "remote client error");
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(ACCEPT_POLL_MS));
                }
                Err(e) => {
                    warn!(error = %e, "remote accept failed");
                    return;
                }
            }
        }
    }

    fn handle_client(&self, mut stream: TcpStream) -> std::io::Result<()> {
        // Accepted sockets do not inherit the listener's nonblocking mode
        // on every platform
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(Duration::from_secs(CLIENT_TIMEOUT_SECS)))?;

        let mut buf = [0u8; 1024];
        let n = stream.read(&mut buf)?;
        let raw = String::from_utf8_lossy(&buf[..n]);
        let msg = raw.trim_end();
        debug!(command = msg, "remote command received");

        if let Some(response) = self.dispatch(msg) {
            stream.write_all(response.as_bytes())?;
        }
        Ok(())
    }

    /// Map a command string to a controller action and optional response
    fn dispatch(&self, msg: &str) -> Option<String> {
        match msg {
            "" => {
                self.send(AppCommand::TogglePause);
                None
            }
            "off" => {
                self.send(AppCommand::Stop);
                Some("Off".to_string())
            }
            "on" | "resume" => self.toggle_if_active("On"),
            "pause" => self.toggle_if_active("Pause"),
            "nowplaying" => Some(self.now_playing()),
            "show" => {
                let now = self.now_playing();
                info!(now_playing = %now, "show requested");
                Some(now)
            }
            "toggle" => {
                let title = {
                    let state = self.shared_state.lock().unwrap_or_else(|e| e.into_inner());
                    state.station_title.clone().unwrap_or_default()
                };
                self.send(AppCommand::TogglePause);
                Some(format!("Toggle {title}"))
            }
            _ => match msg.parse::<usize>() {
                Ok(n) if n >= 1 && n <= self.stations.len() => {
                    self.send(AppCommand::Play(n - 1));
                    Some(format!("Listening to {}", self.stations[n - 1].title))
                }
                _ => Some("Unknown input".to_string()),
            },
        }
    }

    /// Toggle and acknowledge, but only when a station is selected
    fn toggle_if_active(&self, ack: &str) -> Option<String> {
        let active = {
            let state = self.shared_state.lock().unwrap_or_else(|e| e.into_inner());
            state.active_station
        };
        if active.is_some() {
            self.send(AppCommand::TogglePause);
            Some(ack.to_string())
        } else {
            None
        }
    }

    fn now_playing(&self) -> String {
        let state = self.shared_state.lock().unwrap_or_else(|e| e.into_inner());
        state.now_playing.clone()
    }

    fn send(&self, cmd: AppCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("controller is gone; dropping remote command");
        }
    }
}

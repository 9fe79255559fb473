//! Application controller
//!
//! Owns the title monitor and the station selection, and processes
//! commands from all frontends through a single channel. Runs on its own
//! thread; everything it learns is published into the shared snapshot.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::{debug, info};

use titlecast::monitor::TitleMonitor;

use super::state::{AppCommand, AppSnapshot};
use crate::config::labels;
use crate::stations::Station;

pub struct AppController {
    cmd_rx: Receiver<AppCommand>,
    shared_state: Arc<Mutex<AppSnapshot>>,
    stations: Arc<[Station]>,
    monitor: TitleMonitor,
}

impl AppController {
    pub fn new(
        cmd_rx: Receiver<AppCommand>,
        shared_state: Arc<Mutex<AppSnapshot>>,
        stations: Arc<[Station]>,
    ) -> Self {
        Self {
            cmd_rx,
            shared_state,
            stations,
            monitor: TitleMonitor::new(),
        }
    }

    /// Run the controller event loop. Blocks until shutdown; call from a
    /// dedicated thread.
    pub fn run(&mut self) {
        info!("controller started");
        loop {
            match self.cmd_rx.recv_timeout(Duration::from_millis(50)) {
                Ok(cmd) => {
                    if self.handle_command(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.refresh_now_playing();
        }
        self.monitor.stop();
        info!("controller stopped");
    }

    /// Handle a single command. Returns true when the loop should exit.
    fn handle_command(&mut self, cmd: AppCommand) -> bool {
        debug!(?cmd, "handling command");
        match cmd {
            AppCommand::Play(index) => self.play(index),
            AppCommand::TogglePause => self.toggle(),
            AppCommand::Pause => self.pause_if_playing(),
            AppCommand::Resume => self.resume_if_paused(),
            AppCommand::Stop => self.stop(),
            AppCommand::Shutdown => return true,
        }
        false
    }

    fn play(&mut self, index: usize) {
        let station = match self.stations.get(index) {
            Some(s) => s.clone(),
            None => {
                debug!(index, "ignoring play for unknown station");
                return;
            }
        };
        info!(station = %station.title, "switching to station");
        self.monitor.listen(&station.url);

        let mut state = self.shared_state.lock().unwrap_or_else(|e| e.into_inner());
        state.active_station = Some(index);
        state.station_title = Some(station.title);
        state.playing = true;
        state.now_playing = self.monitor.current_title();
    }

    fn toggle(&mut self) {
        let (active, playing) = {
            let state = self.shared_state.lock().unwrap_or_else(|e| e.into_inner());
            (state.active_station, state.playing)
        };
        match active {
            Some(_) if playing => self.pause(),
            Some(index) => self.play(index),
            None => debug!("toggle with no station selected"),
        }
    }

    fn pause(&mut self) {
        info!("paused");
        let mut state = self.shared_state.lock().unwrap_or_else(|e| e.into_inner());
        state.playing = false;
        // The monitor keeps running; titles pick up again on resume
        state.now_playing = labels::PAUSED.to_string();
    }

    fn pause_if_playing(&mut self) {
        let playing = {
            let state = self.shared_state.lock().unwrap_or_else(|e| e.into_inner());
            state.playing
        };
        if playing {
            self.pause();
        }
    }

    fn resume_if_paused(&mut self) {
        let (active, playing) = {
            let state = self.shared_state.lock().unwrap_or_else(|e| e.into_inner());
            (state.active_station, state.playing)
        };
        if let Some(index) = active {
            if !playing {
                self.play(index);
            }
        }
    }

    fn stop(&mut self) {
        info!("stopped");
        self.monitor.stop();
        let mut state = self.shared_state.lock().unwrap_or_else(|e| e.into_inner());
        *state = AppSnapshot::default();
    }

    /// Copy the monitor's latest title into the snapshot while playing
    fn refresh_now_playing(&self) {
        let mut state = self.shared_state.lock().unwrap_or_else(|e| e.into_inner());
        if state.active_station.is_some() && state.playing {
            state.now_playing = self.monitor.current_title();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::Sender;
    use std::thread;
    use std::time::Instant;
    use titlecast::config::titles::LOADING;

    // --- Test harness ---

    struct TestApp {
        cmd_tx: Sender<AppCommand>,
        state: Arc<Mutex<AppSnapshot>>,
        handle: thread::JoinHandle<()>,
    }

    /// Controller over stations whose URLs refuse connections, so the
    /// monitor's placeholder is the only title ever seen.
    fn spawn_controller() -> TestApp {
        let (cmd_tx, cmd_rx) = crossbeam_channel::bounded(64);
        let state = Arc::new(Mutex::new(AppSnapshot::default()));
        let stations: Arc<[Station]> = Arc::from(vec![
            Station {
                title: "First Station".to_string(),
                url: "http://127.0.0.1:1/a".to_string(),
            },
            Station {
                title: "Second Station".to_string(),
                url: "http://127.0.0.1:1/b".to_string(),
            },
        ]);
        let ctrl_state = state.clone();
        let handle = thread::spawn(move || {
            let mut controller = AppController::new(cmd_rx, ctrl_state, stations);
            controller.run();
        });
        TestApp {
            cmd_tx,
            state,
            handle,
        }
    }

    fn snapshot(app: &TestApp) -> AppSnapshot {
        app.state.lock().unwrap().clone()
    }

    fn wait_for(app: &TestApp, cond: impl Fn(&AppSnapshot) -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if cond(&snapshot(app)) {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }
        false
    }

    // --- Commands ---

    #[test]
    fn play_selects_station_and_marks_playing() {
        let app = spawn_controller();
        app.cmd_tx.send(AppCommand::Play(0)).unwrap();

        assert!(wait_for(&app, |s| {
            s.active_station == Some(0)
                && s.station_title.as_deref() == Some("First Station")
                && s.playing
                && s.now_playing == LOADING
        }));

        app.cmd_tx.send(AppCommand::Shutdown).unwrap();
        app.handle.join().unwrap();
    }

    #[test]
    fn play_out_of_range_is_ignored() {
        let app = spawn_controller();
        app.cmd_tx.send(AppCommand::Play(7)).unwrap();

        thread::sleep(Duration::from_millis(150));
        let state = snapshot(&app);
        assert_eq!(state.active_station, None);
        assert!(!state.playing);

        app.cmd_tx.send(AppCommand::Shutdown).unwrap();
        app.handle.join().unwrap();
    }

    #[test]
    fn switching_stations_updates_the_selection() {
        let app = spawn_controller();
        app.cmd_tx.send(AppCommand::Play(0)).unwrap();
        assert!(wait_for(&app, |s| s.active_station == Some(0)));

        app.cmd_tx.send(AppCommand::Play(1)).unwrap();
        assert!(wait_for(&app, |s| {
            s.active_station == Some(1) && s.station_title.as_deref() == Some("Second Station")
        }));

        app.cmd_tx.send(AppCommand::Shutdown).unwrap();
        app.handle.join().unwrap();
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let app = spawn_controller();
        app.cmd_tx.send(AppCommand::Play(0)).unwrap();
        assert!(wait_for(&app, |s| s.playing));

        app.cmd_tx.send(AppCommand::TogglePause).unwrap();
        assert!(wait_for(&app, |s| {
            !s.playing && s.now_playing == labels::PAUSED && s.active_station == Some(0)
        }));

        app.cmd_tx.send(AppCommand::TogglePause).unwrap();
        assert!(wait_for(&app, |s| s.playing && s.active_station == Some(0)));

        app.cmd_tx.send(AppCommand::Shutdown).unwrap();
        app.handle.join().unwrap();
    }

    #[test]
    fn toggle_without_selection_is_ignored() {
        let app = spawn_controller();
        app.cmd_tx.send(AppCommand::TogglePause).unwrap();

        thread::sleep(Duration::from_millis(150));
        let state = snapshot(&app);
        assert_eq!(state.active_station, None);
        assert!(!state.playing);

        app.cmd_tx.send(AppCommand::Shutdown).unwrap();
        app.handle.join().unwrap();
    }

    #[test]
    fn directional_pause_and_resume_do_not_flip() {
        let app = spawn_controller();
        app.cmd_tx.send(AppCommand::Play(0)).unwrap();
        assert!(wait_for(&app, |s| s.playing));

        app.cmd_tx.send(AppCommand::Pause).unwrap();
        assert!(wait_for(&app, |s| !s.playing));

        // A second pause stays paused
        app.cmd_tx.send(AppCommand::Pause).unwrap();
        thread::sleep(Duration::from_millis(150));
        assert!(!snapshot(&app).playing);

        app.cmd_tx.send(AppCommand::Resume).unwrap();
        assert!(wait_for(&app, |s| s.playing));

        // A second resume stays playing
        app.cmd_tx.send(AppCommand::Resume).unwrap();
        thread::sleep(Duration::from_millis(150));
        assert!(snapshot(&app).playing);

        app.cmd_tx.send(AppCommand::Shutdown).unwrap();
        app.handle.join().unwrap();
    }

    #[test]
    fn stop_resets_to_idle() {
        let app = spawn_controller();
        app.cmd_tx.send(AppCommand::Play(1)).unwrap();
        assert!(wait_for(&app, |s| s.active_station == Some(1)));

        app.cmd_tx.send(AppCommand::Stop).unwrap();
        assert!(wait_for(&app, |s| {
            s.active_station.is_none() && !s.playing && s.now_playing == labels::IDLE
        }));

        app.cmd_tx.send(AppCommand::Shutdown).unwrap();
        app.handle.join().unwrap();
    }

    #[test]
    fn shutdown_exits_the_loop() {
        let app = spawn_controller();
        app.cmd_tx.send(AppCommand::Shutdown).unwrap();
        app.handle.join().unwrap();
    }

    #[test]
    fn dropping_all_senders_exits_the_loop() {
        let app = spawn_controller();
        drop(app.cmd_tx);
        app.handle.join().unwrap();
    }
}

//! Session controller.
//!
//! Owns every piece of mutable session state and runs the interpreter
//! against it. Timer jobs never reach into the session; each one gets
//! explicit handles to the state it reads (`LineHandle`, `BusyFlag`, the
//! surface) when it is spawned.

use parking_lot::{Mutex, RwLock};
use rand::seq::SliceRandom;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use vanguard_core::{ansi, commands, AliasTable, AsyncCommand, CommandResult, History, MonitorRequest};
use vanguard_interfaces::{KeyInput, Surface};
use vanguard_memory::{KeyValueStore, SessionRecords};
use vanguard_providers::ScanBackend;
use vanguard_tasks::JobManager;

use crate::config::{Config, DEFAULT_PROMPT};
use crate::report;

const MONITOR_GROUP: &str = "monitor";
const SYSTEM_GROUP: &str = "system";
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

const TIPS: &[&str] = &[
    "TIP: Use 'alias s=scan' to shorten frequent scans.",
    "TIP: 'monitor --list' shows every URL being watched.",
    "TIP: Press the up arrow to recall previous commands.",
    "TIP: Monitors survive restarts. Stop them with 'monitor --stop'.",
    "TIP: An LCP under 2.5s is considered good.",
    "TIP: Keep CLS below 0.1 for a stable layout.",
];

#[derive(Debug, Clone)]
pub struct Timings {
    pub spinner_total: Duration,
    pub spinner_frame: Duration,
    pub monitor_period: Duration,
    pub tip_period: Duration,
    pub clock_period: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            spinner_total: Duration::from_millis(2000),
            spinner_frame: Duration::from_millis(100),
            monitor_period: Duration::from_millis(60_000),
            tip_period: Duration::from_millis(300_000),
            clock_period: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub prompt: String,
    pub timings: Timings,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            timings: Timings::default(),
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            prompt: config.prompt.clone(),
            timings: Timings::default(),
        }
    }
}

/// The line the user is currently typing, shared with timer jobs so they
/// can redraw it after printing.
#[derive(Debug, Clone, Default)]
pub struct LineHandle(Arc<Mutex<String>>);

impl LineHandle {
    pub fn get(&self) -> String {
        self.0.lock().clone()
    }

    pub fn set(&self, text: &str) {
        *self.0.lock() = text.to_string();
    }

    pub fn push(&self, c: char) {
        self.0.lock().push(c);
    }

    pub fn pop(&self) -> Option<char> {
        self.0.lock().pop()
    }

    pub fn take(&self) -> String {
        std::mem::take(&mut *self.0.lock())
    }
}

/// Set while an animated wait is on screen; keystrokes are dropped.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Marks busy, failing if an animation already holds the flag.
    pub fn try_begin(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn finish(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Exit,
}

/// Writes `text` above the in-progress input line, then redraws the prompt
/// and whatever has been typed so far.
pub fn print_above_line(surface: &dyn Surface, line: &LineHandle, prompt: &str, text: &str) {
    surface.write("\r\x1b[K");
    surface.writeln(text);
    surface.write(&format!("{}{}", prompt, line.get()));
}

pub struct Session {
    surface: Arc<dyn Surface>,
    backend: Arc<dyn ScanBackend>,
    records: SessionRecords<dyn KeyValueStore>,
    jobs: JobManager,
    options: SessionOptions,
    history: History,
    aliases: AliasTable,
    line: LineHandle,
    busy: BusyFlag,
    clock: Arc<RwLock<String>>,
    scan_tasks: Vec<JoinHandle<()>>,
}

impl Session {
    pub fn new(
        surface: Arc<dyn Surface>,
        store: Arc<dyn KeyValueStore>,
        backend: Arc<dyn ScanBackend>,
        options: SessionOptions,
    ) -> Self {
        Self {
            surface,
            backend,
            records: SessionRecords::new(store),
            jobs: JobManager::new(),
            options,
            history: History::new(),
            aliases: AliasTable::new(),
            line: LineHandle::default(),
            busy: BusyFlag::default(),
            clock: Arc::new(RwLock::new(String::new())),
            scan_tasks: Vec::new(),
        }
    }

    /// Prints the banner, reloads persisted aliases and monitors, starts the
    /// tip and clock jobs and shows the first prompt.
    pub async fn restore(&mut self) {
        self.surface
            .writeln(&ansi::banner("VANGUARD TERMINAL [Version 1.0.0]"));
        self.surface
            .writeln("(c) 2026 Vanguard Corp. All rights reserved.\n");
        self.surface
            .writeln("Type \"help\" to list available commands.\n");

        self.aliases = self.records.load_aliases().await;
        if !self.aliases.is_empty() {
            self.surface
                .writeln(&ansi::cyan(&format!("Loaded {} alias(es).", self.aliases.len())));
        }

        let urls = self.records.load_monitored_urls().await;
        let mut armed = 0;
        for url in urls {
            if self.arm_monitor(&url).await {
                armed += 1;
            }
        }
        if armed > 0 {
            self.surface
                .writeln(&ansi::cyan(&format!("Restored {} monitor(s).", armed)));
        }

        self.start_tips().await;
        self.start_clock().await;
        tracing::info!(
            "Session restored: {} alias(es), {} monitor(s)",
            self.aliases.len(),
            armed
        );

        self.surface.write(&self.options.prompt);
    }

    /// Stops every job and in-flight scan. Persisted monitors are kept for
    /// the next session.
    pub async fn shutdown(&mut self) {
        let cancelled = self.jobs.cancel_all().await;
        let scans = self.scan_tasks.len();
        for task in self.scan_tasks.drain(..) {
            task.abort();
            // Wait for the abort so nothing renders after shutdown returns.
            let _ = task.await;
        }
        tracing::info!(
            "Session shut down, {} job(s) and {} scan(s) stopped",
            cancelled,
            scans
        );
    }

    pub async fn handle_key(&mut self, key: KeyInput) -> KeyOutcome {
        if key == KeyInput::Interrupt {
            return KeyOutcome::Exit;
        }
        if self.busy.is_busy() {
            return KeyOutcome::Continue;
        }

        match key {
            KeyInput::Enter => self.submit().await,
            KeyInput::Backspace => {
                if self.line.pop().is_some() {
                    self.surface.write("\x08 \x08");
                }
            }
            KeyInput::Up => {
                if let Some(entry) = self.history.recall_previous().map(str::to_string) {
                    self.replace_line(&entry);
                }
            }
            KeyInput::Down => {
                if let Some(entry) = self.history.recall_next().map(str::to_string) {
                    self.replace_line(&entry);
                }
            }
            KeyInput::Char(c) => {
                self.line.push(c);
                let mut buf = [0u8; 4];
                self.surface.write(c.encode_utf8(&mut buf));
            }
            KeyInput::Interrupt | KeyInput::Ignored => {}
        }
        KeyOutcome::Continue
    }

    /// Feeds every key in `data` through [`Session::handle_key`].
    pub async fn handle_input(&mut self, data: &str) -> KeyOutcome {
        for key in vanguard_interfaces::decode(data) {
            if self.handle_key(key).await == KeyOutcome::Exit {
                return KeyOutcome::Exit;
            }
        }
        KeyOutcome::Continue
    }

    async fn submit(&mut self) {
        self.surface.write("\r\n");
        let line = self.line.take();
        if !line.trim().is_empty() {
            self.history.push(line.clone());
        }

        let result = commands::execute(&line, &self.aliases);
        tracing::debug!("Command {:?} -> {:?}", line, result);
        if self.apply(result).await {
            self.surface.write(&self.options.prompt);
        }
    }

    /// Renders or performs one interpreter result. Returns `false` when a
    /// background step took over drawing the next prompt.
    async fn apply(&mut self, result: CommandResult) -> bool {
        match result {
            CommandResult::Empty => {}
            CommandResult::Clear => self.surface.clear(),
            CommandResult::Text { content } => {
                if !content.is_empty() {
                    self.surface.writeln(&content);
                }
            }
            CommandResult::Error { message } => self.surface.writeln(&ansi::red(&message)),
            CommandResult::SetAlias { key, value } => {
                self.surface
                    .writeln(&ansi::green(&format!("Alias set: {} = '{}'", key, value)));
                self.aliases.insert(key, value);
                self.records.save_aliases(&self.aliases).await;
            }
            CommandResult::RemoveAlias { key } => {
                if self.aliases.remove(&key).is_some() {
                    self.records.save_aliases(&self.aliases).await;
                    self.surface
                        .writeln(&ansi::green(&format!("Alias removed: {}", key)));
                } else {
                    self.surface
                        .writeln(&ansi::red(&format!("unalias: {}: not found", key)));
                }
            }
            CommandResult::Async { command } => return self.run_async(command).await,
        }
        true
    }

    async fn run_async(&mut self, command: AsyncCommand) -> bool {
        match command {
            AsyncCommand::Scan { url } => return !self.start_scan(url),
            AsyncCommand::Monitor { request } => match request {
                MonitorRequest::Stop => self.stop_monitors().await,
                MonitorRequest::List => self.list_monitors().await,
                MonitorRequest::Start(url) => self.start_monitor(url).await,
            },
        }
        true
    }

    fn start_scan(&mut self, url: String) -> bool {
        if !self.busy.try_begin() {
            self.surface
                .writeln(&ansi::red("A scan is already in progress."));
            return false;
        }

        let scan = ScanJob {
            surface: Arc::clone(&self.surface),
            backend: Arc::clone(&self.backend),
            line: self.line.clone(),
            busy: self.busy.clone(),
            prompt: self.options.prompt.clone(),
            timings: self.options.timings.clone(),
        };
        tracing::info!("Starting scan of {}", url);
        self.scan_tasks.retain(|task| !task.is_finished());
        self.scan_tasks.push(tokio::spawn(scan.run(url)));
        true
    }

    /// Waits for every started scan to finish rendering.
    pub async fn wait_for_scan(&mut self) {
        for task in self.scan_tasks.drain(..) {
            if let Err(e) = task.await {
                tracing::warn!("Scan task ended abnormally: {}", e);
            }
        }
    }

    /// Scans whose fetch or rendering has not finished yet.
    pub fn pending_scans(&self) -> usize {
        self.scan_tasks.iter().filter(|task| !task.is_finished()).count()
    }

    async fn stop_monitors(&mut self) {
        let stopped = self
            .jobs
            .cancel_where(|job| job.group == MONITOR_GROUP)
            .await;
        self.records.save_monitored_urls(&[]).await;
        tracing::info!("Stopped {} monitor(s)", stopped.len());
        self.surface
            .writeln(&ansi::yellow("All monitors stopped. Active monitors: 0"));
    }

    async fn list_monitors(&self) {
        let urls = self.monitored_urls().await;
        if urls.is_empty() {
            self.surface.writeln("No active monitors.");
            return;
        }
        self.surface.writeln(&ansi::bold("ACTIVE MONITORS:"));
        for url in urls {
            self.surface.writeln(&format!("  - {}", url));
        }
    }

    async fn start_monitor(&mut self, url: String) {
        if !self.arm_monitor(&url).await {
            self.surface
                .writeln(&ansi::yellow(&format!("Already monitoring {}.", url)));
            return;
        }
        let urls = self.monitored_urls().await;
        self.records.save_monitored_urls(&urls).await;
        self.surface.writeln(&ansi::green(&format!(
            "Monitoring {} every {}s.",
            url,
            self.options.timings.monitor_period.as_secs()
        )));
    }

    /// Starts the recurring check for `url`. Returns `false` if it was
    /// already being monitored.
    async fn arm_monitor(&self, url: &str) -> bool {
        let id = monitor_id(url);
        if self.jobs.contains(&id).await {
            return false;
        }

        let surface = Arc::clone(&self.surface);
        let backend = Arc::clone(&self.backend);
        let line = self.line.clone();
        let prompt = self.options.prompt.clone();
        let url = url.to_string();

        let spawned = self
            .jobs
            .spawn_recurring(id, MONITOR_GROUP, self.options.timings.monitor_period, move || {
                let surface = Arc::clone(&surface);
                let backend = Arc::clone(&backend);
                let line = line.clone();
                let prompt = prompt.clone();
                let url = url.clone();
                async move {
                    let up = backend.ping(&url).await;
                    let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
                    tracing::debug!("Monitor {} is {}", url, if up { "up" } else { "down" });
                    print_above_line(
                        surface.as_ref(),
                        &line,
                        &prompt,
                        &report::render_monitor_tick(&timestamp, &url, up),
                    );
                }
            })
            .await;

        match spawned {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to start monitor: {}", e);
                false
            }
        }
    }

    async fn start_tips(&self) {
        let surface = Arc::clone(&self.surface);
        let line = self.line.clone();
        let busy = self.busy.clone();
        let prompt = self.options.prompt.clone();

        let spawned = self
            .jobs
            .spawn_recurring("tips", SYSTEM_GROUP, self.options.timings.tip_period, move || {
                if !busy.is_busy() {
                    let tip = TIPS.choose(&mut rand::thread_rng()).copied().unwrap_or(TIPS[0]);
                    print_above_line(surface.as_ref(), &line, &prompt, &ansi::cyan(tip));
                }
                std::future::ready(())
            })
            .await;
        if let Err(e) = spawned {
            tracing::warn!("Failed to start tips: {}", e);
        }
    }

    async fn start_clock(&self) {
        let surface = Arc::clone(&self.surface);
        let clock = Arc::clone(&self.clock);

        let spawned = self
            .jobs
            .spawn_recurring("clock", SYSTEM_GROUP, self.options.timings.clock_period, move || {
                let now = chrono::Local::now().format("%H:%M:%S").to_string();
                surface.show_status(&format!("VANGUARD TERMINAL | {}", now));
                *clock.write() = now;
                std::future::ready(())
            })
            .await;
        if let Err(e) = spawned {
            tracing::warn!("Failed to start clock: {}", e);
        }
    }

    fn replace_line(&self, text: &str) {
        self.line.set(text);
        self.surface
            .write(&format!("\r\x1b[K{}{}", self.options.prompt, text));
    }

    pub async fn monitored_urls(&self) -> Vec<String> {
        self.jobs
            .list(Some(MONITOR_GROUP))
            .await
            .into_iter()
            .filter_map(|job| job.id.strip_prefix("monitor:").map(str::to_string))
            .collect()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn line(&self) -> String {
        self.line.get()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Time of day last written by the clock job, empty before its first tick.
    pub fn clock(&self) -> String {
        self.clock.read().clone()
    }
}

fn monitor_id(url: &str) -> String {
    format!("monitor:{}", url)
}

/// Everything a running scan needs, handed over when it starts.
struct ScanJob {
    surface: Arc<dyn Surface>,
    backend: Arc<dyn ScanBackend>,
    line: LineHandle,
    busy: BusyFlag,
    prompt: String,
    timings: Timings,
}

impl ScanJob {
    async fn run(self, url: String) {
        self.surface
            .writeln(&format!("Initializing Vanguard Scan on {}...", url));

        let frame = self.timings.spinner_frame.max(Duration::from_millis(1));
        let frames = (self.timings.spinner_total.as_millis() / frame.as_millis()).max(1) as usize;
        for i in 0..frames {
            let glyph = SPINNER[i % SPINNER.len()];
            self.surface.write(&format!("\r{} Scanning {}...", glyph, url));
            tokio::time::sleep(frame).await;
        }
        self.surface.write("\r\x1b[K");
        self.busy.finish();

        let lines = match self.backend.scan(&url).await {
            Ok(scan) => report::render_report(&url, &scan),
            Err(e) => {
                tracing::warn!("Scan of {} failed: {}", url, e);
                vec![report::render_scan_error(&e)]
            }
        };

        self.surface.write("\r\x1b[K");
        for line in &lines {
            self.surface.writeln(line);
        }
        self.surface
            .write(&format!("{}{}", self.prompt, self.line.get()));
    }
}

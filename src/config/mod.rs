mod types;

pub use types::{AutoCollapseDelay, Config, ConfigIssue, HotkeyConfig, StatusBarConfig};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

pub type SharedConfig = Arc<RwLock<Config>>;

const CONFIG_FILE_NAME: &str = "config.toml";

pub fn shared(config: Config) -> SharedConfig {
    Arc::new(RwLock::new(config))
}

/// Snapshot of the status bar preferences. Every call reads the shared
/// config again so edits on disk apply to the next decision.
pub fn status_bar_prefs(config: &SharedConfig) -> StatusBarConfig {
    config
        .read()
        .map(|c| c.status_bar.clone())
        .unwrap_or_default()
}

pub fn load_config() -> Config {
    load_config_from(&get_config_path())
}

pub fn load_config_from(config_path: &Path) -> Config {
    let config = if config_path.exists() {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", config_path);
                    config
                }
                Err(e) => {
                    log::error!("Failed to parse config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                log::error!("Failed to read config file: {}", e);
                Config::default()
            }
        }
    } else {
        log::info!("No config file found at {:?}, using defaults", config_path);
        Config::default()
    };

    let issues = config.validate();
    let errors: Vec<_> = issues.iter().filter(|i| i.is_error).collect();
    let warnings: Vec<_> = issues.iter().filter(|i| !i.is_error).collect();

    for warning in &warnings {
        log::warn!("Config: {}", warning);
    }
    for error in &errors {
        log::error!("Config: {}", error);
    }

    if !errors.is_empty() {
        log::error!("Config has errors; falling back to defaults.");
        return Config::default();
    }

    config
}

pub fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("stowbar")
        .join(CONFIG_FILE_NAME)
}

/// The default config as TOML, for `stowbar --default-config`.
pub fn default_config_toml() -> String {
    toml::to_string_pretty(&Config::default()).unwrap_or_default()
}

pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<Result<Event, notify::Error>>,
    config: SharedConfig,
    config_path: PathBuf,
    last_reload: Mutex<Instant>,
}

impl ConfigWatcher {
    pub fn new(config: SharedConfig) -> Result<Self, notify::Error> {
        let (tx, rx) = channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;

        let config_path = get_config_path();

        // Watch the directory so the file can be created after launch
        let config_dir = config_path.parent().unwrap_or(&config_path);
        if !config_dir.exists() {
            let _ = std::fs::create_dir_all(config_dir);
        }

        watcher.watch(config_dir, RecursiveMode::NonRecursive)?;
        log::info!("Watching config directory: {:?}", config_dir);

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            config,
            config_path,
            last_reload: Mutex::new(Instant::now()),
        })
    }

    /// Check for config changes and reload if needed. Returns true if config was reloaded.
    pub fn check_and_reload(&self) -> bool {
        let mut should_reload = false;

        while let Ok(event) = self.receiver.try_recv() {
            match event {
                Ok(event) => {
                    if is_config_event(&event) {
                        should_reload = true;
                    }
                }
                Err(e) => {
                    log::error!("Config watch error: {}", e);
                }
            }
        }

        // Debounce: editors write several events per save
        if should_reload {
            let now = Instant::now();
            let elapsed = self
                .last_reload
                .lock()
                .map(|t| now.duration_since(*t))
                .unwrap_or(Duration::ZERO);
            if elapsed > Duration::from_millis(500) {
                log::info!("Config file changed, reloading...");
                let new_config = load_config_from(&self.config_path);
                if let Ok(mut cfg) = self.config.write() {
                    *cfg = new_config;
                    if let Ok(mut t) = self.last_reload.lock() {
                        *t = now;
                    }
                    return true;
                }
            }
        }

        false
    }

    /// Polls for changes on a background thread for the rest of the process.
    pub fn spawn_polling(self) {
        std::thread::spawn(move || loop {
            std::thread::sleep(Duration::from_millis(500));
            if self.check_and_reload() {
                log::info!("Config reloaded");
            }
        });
    }
}

fn is_config_event(event: &Event) -> bool {
    let touches_config = event
        .paths
        .iter()
        .any(|p| p.file_name().map(|n| n == CONFIG_FILE_NAME).unwrap_or(false));
    touches_config && (event.kind.is_modify() || event.kind.is_create())
}

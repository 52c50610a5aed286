//! Logging setup: `logs/vertex-chat.log`, or stderr if the file can't be opened.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "vertex-chat.log";

/// GUI and HTTP stacks that flood the log at info.
const QUIET_MODULES: &[&str] = &["eframe", "egui", "egui_glow", "wgpu", "winit", "reqwest", "hyper"];

pub fn init() {
    let explicit_filter = std::env::var_os("RUST_LOG").is_some();

    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if !explicit_filter {
        for module in QUIET_MODULES {
            builder.filter_module(module, LevelFilter::Warn);
        }
    }
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{} {:<5}] {} - {}",
            chrono::Local::now().format("%H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    let log_path = Path::new(LOG_DIR).join(LOG_FILE);
    let file_error = match open_log_file(&log_path) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
            None
        }
        Err(e) => {
            builder.target(Target::Stderr);
            Some(e)
        }
    };

    // a second init (tests, embedding) keeps the first logger
    if builder.try_init().is_err() {
        return;
    }

    match file_error {
        Some(e) => log::warn!("⚠️ Cannot open {}: {}, logging to stderr", log_path.display(), e),
        None => log::info!("📝 Logging to {}", log_path.display()),
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(LOG_FILE);
        let mut file = open_log_file(&path).unwrap();
        writeln!(file, "line").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_location_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        assert!(open_log_file(&blocker.join(LOG_FILE)).is_err());
    }
}

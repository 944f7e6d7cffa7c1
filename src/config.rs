//! Command-line and environment configuration
//!
//! Priority (highest first): CLI flags, environment variables, defaults.

use crate::persistence::{db_file, ensure_dir, get_data_dir, log_file, pointer_file};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "focusly")]
#[command(version, about = "A terminal task list with a focused countdown timer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (default: nearest .focusly, else ~/.focusly)
    #[arg(long, env = "FOCUSLY_DIR", global = true)]
    pub dir: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "FOCUSLY_LOG", global = true)]
    pub log_level: String,

    /// Log file path (default: <data dir>/focusly.log)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Use ASCII glyphs instead of emoji
    #[arg(long, global = true)]
    pub ascii: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Initialize a local .focusly directory in the current directory
    Init,
    /// Print the task list and exit
    List,
    /// Keep the running task counting down without the interface
    Host,
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub pointer_path: PathBuf,
    pub log_path: PathBuf,
    pub log_level: String,
    pub use_emoji: bool,
}

impl Config {
    /// Resolve paths from the CLI and make sure the data directory exists
    pub fn load(cli: &Cli) -> Result<Self> {
        let data_dir = match &cli.dir {
            Some(dir) => dir.clone(),
            None => get_data_dir()?,
        };
        ensure_dir(&data_dir)?;
        Ok(Self::resolve(cli, data_dir))
    }

    fn resolve(cli: &Cli, data_dir: PathBuf) -> Self {
        Self {
            db_path: db_file(&data_dir),
            pointer_path: pointer_file(&data_dir),
            log_path: cli.log_file.clone().unwrap_or_else(|| log_file(&data_dir)),
            log_level: cli.log_level.clone(),
            use_emoji: !cli.ascii,
            data_dir,
        }
    }
}

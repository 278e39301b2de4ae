use anyhow::{anyhow, Context, Result};
use chrono::Local;
use directories::ProjectDirs;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

pub const UID_CACHE_FILE: &str = "uniqueuids.txt";
pub const DEFAULT_CSV_FILE: &str = "wbuserdata_ts.csv";
pub const DEFAULT_DATE_FORMAT: &str = "%d%m%Y";

/// Working directory for the UID cache and default outputs
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(custom_dir: Option<PathBuf>) -> Result<Self> {
        let root = match custom_dir {
            Some(dir) => dir,
            None => {
                let proj_dirs = ProjectDirs::from("", "", "wb-stats-normalizer")
                    .context("Could not determine data directory")?;
                proj_dirs.data_dir().to_path_buf()
            }
        };

        fs::create_dir_all(&root).context("Failed to create data directory")?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn uid_cache_path(&self) -> PathBuf {
        self.root.join(UID_CACHE_FILE)
    }

    pub fn default_csv_path(&self) -> PathBuf {
        self.root.join(DEFAULT_CSV_FILE)
    }
}

/// Today's date rendered for the `Date` column
pub fn run_date(format: &str) -> Result<String> {
    let mut date = String::new();
    write!(date, "{}", Local::now().format(format))
        .map_err(|_| anyhow!("Invalid date format: {}", format))?;
    Ok(date)
}

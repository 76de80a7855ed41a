// Command-line arguments.

use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "tierboard")]
#[command(about = "Fantasy football tier rankings and draft board")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory holding config/, defaults/ and logs/ (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Skip the headshot id lookup fetch
    #[arg(long)]
    pub no_headshots: bool,

    /// Read commands from a file instead of stdin
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

impl Args {
    /// The base directory, falling back to `cwd`.
    pub fn base_dir_or(&self, cwd: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd.to_path_buf(),
        }
    }
}

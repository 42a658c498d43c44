pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::core::errors::Result;
use crate::core::models::key_request::KeyRequest;
use crate::core::models::key_role::KeyRole;
use output::Verbosity;

/// Re-sign the APKs of an Android firmware image with new keys.
///
/// Every package signed with the same key as the role's reference package
/// (Settings, ContactsProvider, DownloadProvider, HTMLViewer) is re-signed
/// with the new key, so packages that shared a key still share one.
#[derive(Parser, Debug)]
#[command(name = "romsign", version, about, long_about = None)]
#[command(group(
    ArgGroup::new("keys")
        .required(true)
        .multiple(true)
        .args(["platform", "shared", "media", "release"])
))]
pub struct Cli {
    /// ROM directory to scan for APKs
    #[arg(short, long, value_name = "DIR")]
    pub dir: PathBuf,

    /// New platform key (currently signing Settings.apk)
    #[arg(short, long, value_name = "KEY")]
    pub platform: Option<String>,

    /// New shared key (currently signing ContactsProvider.apk)
    #[arg(short, long, value_name = "KEY")]
    pub shared: Option<String>,

    /// New media key (currently signing DownloadProvider.apk)
    #[arg(short, long, value_name = "KEY")]
    pub media: Option<String>,

    /// New release key (currently signing HTMLViewer.apk)
    #[arg(short, long, value_name = "KEY")]
    pub release: Option<String>,

    /// Path to a romsign.toml configuration file
    #[arg(short, long, env = "ROMSIGN_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show what would be re-signed without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Key requests in processing order: platform, shared, media, release.
    pub fn key_requests(&self) -> Result<Vec<KeyRequest>> {
        KeyRole::ALL
            .into_iter()
            .filter_map(|role| self.key_arg(role).map(|raw| (role, raw)))
            .map(|(role, raw)| KeyRequest::from_arg(role, raw))
            .collect()
    }

    fn key_arg(&self, role: KeyRole) -> Option<&str> {
        match role {
            KeyRole::Platform => self.platform.as_deref(),
            KeyRole::Shared => self.shared.as_deref(),
            KeyRole::Media => self.media.as_deref(),
            KeyRole::Release => self.release.as_deref(),
        }
    }
}

//! Scan settings and the command-line interface that produces them.

use crate::matcher::{UrlMatcher, DEFAULT_HOST_SUBSTRING};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

const USER_AGENT: &str = concat!("imgusage/", env!("CARGO_PKG_VERSION"));

/// Knobs shared by the collector, the size resolver and the replacer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanControls {
    host_substring: String,
    user_agent: String,
    request_timeout: Option<Duration>,
    max_redirects: usize,
}

impl ScanControls {
    /// Constructs controls for the given host fragment with default HTTP settings.
    pub fn new(host_substring: impl Into<String>) -> Self {
        Self {
            host_substring: host_substring.into(),
            ..Self::default()
        }
    }

    /// Sets an upper bound on each size lookup request.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Fragment a URL must contain to be tracked.
    pub fn host_substring(&self) -> &str {
        &self.host_substring
    }

    /// User agent sent with size lookups.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Per-request timeout; `None` waits indefinitely.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Redirects followed by a single size lookup.
    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Matcher for the configured host fragment.
    pub fn matcher(&self) -> UrlMatcher {
        UrlMatcher::new(self.host_substring.clone())
    }
}

impl Default for ScanControls {
    fn default() -> Self {
        Self {
            host_substring: DEFAULT_HOST_SUBSTRING.to_string(),
            user_agent: USER_AGENT.to_string(),
            request_timeout: None,
            max_redirects: 20,
        }
    }
}

/// Command-line interface for the `imgusage` binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "imgusage",
    about = "Inventory image URLs in a project and bulk-replace them"
)]
pub struct Cli {
    /// Shared project and HTTP settings.
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Action to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project document (JSON) holding canvas nodes and collections
    #[arg(long, env = "IMGUSAGE_PROJECT", default_value = "project.json")]
    pub project: PathBuf,

    /// Domain fragment that marks a URL as a tracked image
    #[arg(long, env = "IMGUSAGE_HOST_SUBSTRING", default_value = DEFAULT_HOST_SUBSTRING)]
    pub host_substring: String,

    /// Milliseconds before a size lookup gives up (0 = wait indefinitely)
    #[arg(long, env = "IMGUSAGE_TIMEOUT_MS", default_value_t = 0)]
    pub timeout_ms: u64,

    /// Output format for the usage report
    #[arg(long, env = "IMGUSAGE_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Subcommands of the binary.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scan the project and print every tracked URL with its count and size
    Scan,
    /// Replace the selected URLs with a new one, then rescan
    Replace {
        /// URL to replace; repeat for several
        #[arg(long = "select", required = true)]
        selected: Vec<String>,

        /// Replacement URL
        #[arg(long = "with")]
        replacement: String,

        /// Apply the replacement in memory only; the project file is left untouched
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

/// Report rendering choices.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text table.
    Text,
    /// JSON array of records.
    Json,
}

impl ProjectArgs {
    /// Converts the parsed arguments into `ScanControls`.
    pub fn build_controls(&self) -> ScanControls {
        let timeout = (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms));
        ScanControls::new(self.host_substring.trim()).with_request_timeout(timeout)
    }
}

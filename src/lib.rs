#![warn(missing_docs)]
//! Core library entry points for the imgusage image inventory.

pub mod collector;
pub mod controls;
pub mod host;
pub mod matcher;
pub mod replacer;
pub mod report;
pub mod scanner;
pub mod sizer;
pub mod snapshot;
pub mod state;

pub use collector::{collect_usage, UsageCounts};
pub use controls::{Cli, ScanControls};
pub use host::{CanvasNode, CollectionItem, CollectionRef, FieldMap, Host, HostError};
pub use matcher::{UrlMatcher, DEFAULT_HOST_SUBSTRING};
pub use replacer::{replace_references, ReplaceOutcome, ReplaceRequest};
pub use scanner::{scan_usage, UsageScanner};
pub use sizer::{SizeMap, SizeResolver};
pub use snapshot::{ProjectDocument, ProjectSnapshot};
pub use state::{ImageUsage, Phase, ScanState};

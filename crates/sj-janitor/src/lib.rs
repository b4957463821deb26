//! # sj-janitor
//!
//! The moderation layer: coordinates the flow between the pure statement
//! engines in `sj-core` and the collaborator ports.

pub mod auto_label;
pub mod dry_run;
pub mod janitor;
pub mod select;

pub use auto_label::should_auto_label;
pub use dry_run::DryRunPlatform;
pub use janitor::{CommunityReport, Janitor, DEFAULT_PERMALINK_BASE};
pub use select::select_statement;

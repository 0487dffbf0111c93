// Clippy allows for the whole crate
#![allow(clippy::type_complexity)]

//! GCT: Gene Cluster Toolkit
//!
//! This library joins per-gene data against a gene clustering and writes
//! the result grouped by cluster.
//!
//! # Features
//!
//! - **Many-to-many membership**: a gene listed under several clusters is
//!   routed to all of them
//! - **Name or position keys**: secondary sources are joined on the gene
//!   name or on the 1-based record number
//! - **All-or-nothing output**: malformed input aborts before any cluster
//!   file is committed
//!
//! # Example
//!
//! ```rust,no_run
//! use gct_genomics::commands::{GenesCommand, OutputTarget};
//! use gct_genomics::filter::SizeBounds;
//!
//! let cmd = GenesCommand::new().with_bounds(SizeBounds::at_least(5));
//! let stats = cmd
//!     .run("clusters.tsv", "catalog.fna", &OutputTarget::directory("out"))
//!     .unwrap();
//! println!("{} clusters written", stats.clusters_kept);
//! ```

pub mod breakdown;
pub mod commands;
pub mod compare;
pub mod config;
pub mod dispatch;
pub mod fasta;
pub mod filter;
pub mod gene;
pub mod groups;
pub mod index;
pub mod membership;
pub mod output;
pub mod payload;
pub mod sources;

// Re-export commonly used types
pub use gene::{ClusterId, GeneId, KeyMode};
pub use groups::ClusterGroups;
pub use index::MembershipIndex;
pub use membership::{ClusterError, MembershipReader, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::commands::{
        AnnotationCommand, CompareCommand, ConnectionsCommand, GenesCommand, MotusCommand,
        OutputTarget, ProfileCommand,
    };
    pub use crate::filter::SizeBounds;
    pub use crate::gene::{GeneId, KeyMode};
    pub use crate::groups::ClusterGroups;
    pub use crate::index::MembershipIndex;
    pub use crate::membership::{ClusterError, Result};
}

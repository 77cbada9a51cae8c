// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Email Network Analysis
//!
//! Reads a folder of `.eml` files, keeps the messages inside a date range,
//! builds a directed sender → recipient graph keyed by address and computes
//! degree rankings and betweenness centrality over it.
//!
//! # Components
//!
//! - [`parse_message`]: raw bytes to a [`Message`], degrading instead of failing
//! - [`load_corpus`]: directory scan, inclusive date filter, stable ordering
//! - [`CommunicationGraph`]: one node per address, one edge per ordered pair
//! - [`analyze`]: counts, top senders/recipients, top connectors
//! - [`CorpusSummary`]: plain-text digest for a summarization layer
//!
//! # Example
//!
//! ```rust
//! use email_network::{CommunicationGraph, analyze};
//!
//! let raw = b"From: Alice <alice@example.com>\r\nTo: bob@example.com\r\n\r\nHi";
//! let graph = CommunicationGraph::from_raw([&raw[..]]);
//! let stats = analyze(&graph, 5);
//!
//! assert_eq!(stats.nodes, 2);
//! assert_eq!(stats.edges, 1);
//! assert_eq!(stats.top_senders[0].address, "alice@example.com");
//! ```

mod analyzer;
mod config;
mod error;
mod graph;
mod loader;
mod parser;
mod pipeline;
mod summary;
mod types;

pub use analyzer::{CentralityRank, DegreeRank, NetworkStats, analyze, betweenness_centrality};
pub use config::AnalysisConfig;
pub use error::{CentralityError, ConfigError, LoadError, ParseError, RunError};
pub use graph::{
    CommunicationEdge, CommunicationGraph, EdgeSnapshot, GraphSnapshot, NodeRole, NodeSnapshot,
    ParticipantNode,
};
pub use loader::{Corpus, DateRange, LoadReport, load_corpus};
pub use parser::{parse_date, parse_message};
pub use pipeline::AnalysisRun;
pub use summary::{
    CorpusSummary, DomainCount, MessageSample, format_corpus_content, format_network_stats,
};
pub use types::{Message, ParseOutcome, Participant};

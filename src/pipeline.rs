//! One analysis run: load, build the graph, compute statistics, summarize

use crate::analyzer::{NetworkStats, analyze};
use crate::config::AnalysisConfig;
use crate::error::RunError;
use crate::graph::CommunicationGraph;
use crate::loader::{Corpus, DateRange, load_corpus};
use crate::summary::{CorpusSummary, format_network_stats};
use std::path::Path;
use tracing::info;

/// Everything produced by one run. Owned by the caller, nothing is shared
/// between runs.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub corpus: Corpus,
    pub graph: CommunicationGraph,
    pub stats: NetworkStats,
    pub summary: CorpusSummary,
}

impl AnalysisRun {
    /// Validate `config`, load `directory` within `range` and analyze the
    /// retained messages
    pub fn execute(
        directory: &Path,
        range: &DateRange,
        config: &AnalysisConfig,
    ) -> Result<Self, RunError> {
        config.validate()?;
        info!(
            "Analyzing {} from {} to {}",
            directory.display(),
            range.start(),
            range.end()
        );
        let corpus = load_corpus(directory, range, config)?;
        Ok(Self::from_corpus(corpus, config))
    }

    /// Analyze an already loaded corpus
    #[must_use]
    pub fn from_corpus(corpus: Corpus, config: &AnalysisConfig) -> Self {
        let graph = CommunicationGraph::from_messages(&corpus.messages);
        let stats = analyze(&graph, config.top_n);
        let summary = CorpusSummary::from_messages(&corpus.messages, config);

        Self {
            corpus,
            graph,
            stats,
            summary,
        }
    }

    /// Corpus digest followed by the network digest
    #[must_use]
    pub fn digest(&self) -> String {
        format!(
            "{}\n\n{}",
            self.summary.render(),
            format_network_stats(&self.stats)
        )
    }
}

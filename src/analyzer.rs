//! Network statistics over a [`CommunicationGraph`]

use crate::error::CentralityError;
use crate::graph::CommunicationGraph;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// A participant ranked by degree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeRank {
    pub address: String,
    pub degree: usize,
}

/// A participant ranked by betweenness centrality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralityRank {
    pub address: String,
    pub betweenness: f64,
}

/// Snapshot of graph statistics for reporting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub nodes: usize,
    pub edges: usize,

    /// Highest out-degree first
    pub top_senders: Vec<DegreeRank>,

    /// Highest in-degree first
    pub top_recipients: Vec<DegreeRank>,

    /// Highest betweenness first
    pub top_connectors: Vec<CentralityRank>,
}

/// Compute node and edge counts, degree rankings and top connectors.
///
/// Rankings hold at most `top_n` entries with a non-zero score; ties are
/// broken by address. A failed centrality computation leaves
/// `top_connectors` empty.
#[must_use]
pub fn analyze(graph: &CommunicationGraph, top_n: usize) -> NetworkStats {
    if graph.is_empty() {
        return NetworkStats::default();
    }

    let inner = graph.inner();
    let mut out_degrees = Vec::with_capacity(graph.node_count());
    let mut in_degrees = Vec::with_capacity(graph.node_count());

    for idx in inner.node_indices() {
        let address = inner[idx].address.as_str();
        out_degrees.push((address, graph.degree(idx, Direction::Outgoing)));
        in_degrees.push((address, graph.degree(idx, Direction::Incoming)));
    }

    let top_connectors = match betweenness_centrality(graph) {
        Ok(scores) => rank_connectors(scores, top_n),
        Err(e) => {
            warn!(error = %e, "Could not calculate betweenness centrality");
            Vec::new()
        }
    };

    let stats = NetworkStats {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        top_senders: rank_degrees(out_degrees, top_n),
        top_recipients: rank_degrees(in_degrees, top_n),
        top_connectors,
    };

    info!(
        nodes = stats.nodes,
        edges = stats.edges,
        "Analyzed communication network"
    );
    stats
}

fn rank_degrees(mut degrees: Vec<(&str, usize)>, top_n: usize) -> Vec<DegreeRank> {
    degrees.retain(|&(_, degree)| degree > 0);
    degrees.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    degrees
        .into_iter()
        .take(top_n)
        .map(|(address, degree)| DegreeRank {
            address: address.to_string(),
            degree,
        })
        .collect()
}

fn rank_connectors(scores: BTreeMap<String, f64>, top_n: usize) -> Vec<CentralityRank> {
    let mut ranked: Vec<CentralityRank> = scores
        .into_iter()
        .filter(|&(_, betweenness)| betweenness > 0.0)
        .map(|(address, betweenness)| CentralityRank {
            address,
            betweenness,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.betweenness
            .total_cmp(&a.betweenness)
            .then_with(|| a.address.cmp(&b.address))
    });
    ranked.truncate(top_n);
    ranked
}

/// Graphs with at least this many nodes are scored on the rayon pool
const PARALLEL_THRESHOLD: usize = 50;

/// Normalized directed betweenness centrality for every node.
///
/// Scores are scaled by `1 / ((n - 1)(n - 2))`; graphs with two or fewer
/// nodes are left unscaled, where every score is zero.
pub fn betweenness_centrality(
    graph: &CommunicationGraph,
) -> Result<BTreeMap<String, f64>, CentralityError> {
    let inner = graph.inner();
    if inner.node_count() == 0 {
        return Err(CentralityError::EmptyGraph);
    }

    let scores = rustworkx_core::centrality::betweenness_centrality(
        inner,
        false,
        true,
        PARALLEL_THRESHOLD,
    );

    inner
        .node_indices()
        .map(|idx| match scores.get(idx.index()).copied().flatten() {
            Some(score) if score.is_finite() => Ok((inner[idx].address.clone(), score)),
            _ => Err(CentralityError::NonFinite),
        })
        .collect()
}

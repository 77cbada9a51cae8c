//! Directed communication graph between senders and recipients

use crate::parser::parse_message;
use crate::types::{Message, Participant};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// A participant in the graph, keyed by address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantNode {
    pub address: String,

    /// First non-empty display name seen for this address
    pub name: String,
}

/// Edge payload: how many messages addressed this ordered pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationEdge {
    pub messages: u32,
}

/// Dominant role of a participant, from comparing out- and in-degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Sender,
    Recipient,
    Both,
}

impl NodeRole {
    #[must_use]
    pub const fn from_degrees(out_degree: usize, in_degree: usize) -> Self {
        if out_degree > in_degree {
            Self::Sender
        } else if in_degree > out_degree {
            Self::Recipient
        } else {
            Self::Both
        }
    }
}

/// Directed graph with one node per address and one edge per ordered pair.
///
/// Built in one pass from a message collection and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct CommunicationGraph {
    graph: DiGraph<ParticipantNode, CommunicationEdge>,
    index: HashMap<String, NodeIndex>,
    skipped: usize,
}

impl CommunicationGraph {
    /// Build from parsed messages.
    ///
    /// Messages without a known sender or without any known recipient add
    /// nothing to the graph.
    pub fn from_messages<'a>(messages: impl IntoIterator<Item = &'a Message>) -> Self {
        let mut graph = Self::default();
        let mut total = 0usize;

        for message in messages {
            total += 1;
            if !graph.add_message(message) {
                graph.skipped += 1;
            }
        }

        info!(
            "Created communication graph with {} nodes and {} edges from {} messages",
            graph.node_count(),
            graph.edge_count(),
            total
        );
        graph
    }

    /// Build from raw message contents, parsing each first
    pub fn from_raw<I, B>(raw_messages: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let messages: Vec<Message> = raw_messages
            .into_iter()
            .enumerate()
            .filter_map(|(i, raw)| {
                parse_message(&format!("message-{}", i + 1), raw.as_ref()).into_message()
            })
            .collect();

        Self::from_messages(&messages)
    }

    fn add_message(&mut self, message: &Message) -> bool {
        let recipients = message.recipients();
        if !message.from.is_known() || recipients.is_empty() {
            debug!(source = %message.source, "Skipping message without sender or recipients");
            return false;
        }

        let sender = self.ensure_node(&message.from);
        for recipient in recipients {
            let target = self.ensure_node(recipient);
            match self.graph.find_edge(sender, target) {
                Some(edge) => self.graph[edge].messages += 1,
                None => {
                    self.graph.add_edge(sender, target, CommunicationEdge { messages: 1 });
                }
            }
        }
        true
    }

    fn ensure_node(&mut self, participant: &Participant) -> NodeIndex {
        if let Some(&idx) = self.index.get(&participant.address) {
            let node = &mut self.graph[idx];
            if node.name.is_empty() && !participant.name.is_empty() {
                node.name.clone_from(&participant.name);
            }
            return idx;
        }

        let idx = self.graph.add_node(ParticipantNode {
            address: participant.address.clone(),
            name: participant.name.clone(),
        });
        self.index.insert(participant.address.clone(), idx);
        idx
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Messages that contributed nothing for lack of sender or recipients
    #[must_use]
    pub const fn skipped_messages(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn node(&self, address: &str) -> Option<&ParticipantNode> {
        self.index.get(address).map(|&idx| &self.graph[idx])
    }

    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edge(from, to).is_some()
    }

    #[must_use]
    pub fn edge(&self, from: &str, to: &str) -> Option<&CommunicationEdge> {
        let source = *self.index.get(from)?;
        let target = *self.index.get(to)?;
        self.graph
            .find_edge(source, target)
            .map(|edge| &self.graph[edge])
    }

    /// Number of distinct participants this address wrote to
    #[must_use]
    pub fn out_degree(&self, address: &str) -> Option<usize> {
        self.index
            .get(address)
            .map(|&idx| self.degree(idx, Direction::Outgoing))
    }

    /// Number of distinct participants that wrote to this address
    #[must_use]
    pub fn in_degree(&self, address: &str) -> Option<usize> {
        self.index
            .get(address)
            .map(|&idx| self.degree(idx, Direction::Incoming))
    }

    #[must_use]
    pub fn role(&self, address: &str) -> Option<NodeRole> {
        let idx = *self.index.get(address)?;
        Some(NodeRole::from_degrees(
            self.degree(idx, Direction::Outgoing),
            self.degree(idx, Direction::Incoming),
        ))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ParticipantNode> {
        self.graph.node_weights()
    }

    pub(crate) fn degree(&self, idx: NodeIndex, direction: Direction) -> usize {
        self.graph.edges_directed(idx, direction).count()
    }

    pub(crate) const fn inner(&self) -> &DiGraph<ParticipantNode, CommunicationEdge> {
        &self.graph
    }

    /// Serializable view of nodes and edges, sorted by address
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<NodeSnapshot> = self
            .graph
            .node_indices()
            .map(|idx| {
                let node = &self.graph[idx];
                let out_degree = self.degree(idx, Direction::Outgoing);
                let in_degree = self.degree(idx, Direction::Incoming);
                NodeSnapshot {
                    address: node.address.clone(),
                    name: node.name.clone(),
                    role: NodeRole::from_degrees(out_degree, in_degree),
                    out_degree,
                    in_degree,
                }
            })
            .collect();
        nodes.sort_by(|a, b| a.address.cmp(&b.address));

        let mut edges: Vec<EdgeSnapshot> = self
            .graph
            .edge_references()
            .map(|edge| EdgeSnapshot {
                source: self.graph[edge.source()].address.clone(),
                target: self.graph[edge.target()].address.clone(),
                messages: edge.weight().messages,
            })
            .collect();
        edges.sort_by(|a, b| a.source.cmp(&b.source).then_with(|| a.target.cmp(&b.target)));

        GraphSnapshot { nodes, edges }
    }
}

/// Node and edge lists for a rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub address: String,
    pub name: String,
    pub role: NodeRole,
    pub out_degree: usize,
    pub in_degree: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub source: String,
    pub target: String,
    pub messages: u32,
}

impl GraphSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

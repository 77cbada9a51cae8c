//! Plain-text digests of a corpus and its network statistics for the
//! reporting layer

use crate::analyzer::NetworkStats;
use crate::config::AnalysisConfig;
use crate::types::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const CONTENT_RULE_WIDTH: usize = 80;

/// Number of messages sent from one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: usize,
}

/// Short preview of one message chosen as representative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSample {
    /// 1-based position in the corpus
    pub position: usize,
    pub date: Option<DateTime<Utc>>,
    pub source: String,
    pub preview: String,
}

/// Corpus-level facts handed to the summarization layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub total_messages: usize,
    pub first_date: Option<DateTime<Utc>>,
    pub last_date: Option<DateTime<Utc>>,

    /// Most frequent first, ties by domain
    pub sender_domains: Vec<DomainCount>,

    /// Distinct sender addresses in corpus order
    pub sender_addresses: Vec<String>,

    pub subjects: Vec<String>,
    pub samples: Vec<MessageSample>,
}

impl CorpusSummary {
    /// Aggregate a date-ordered message list
    #[must_use]
    pub fn from_messages(messages: &[Message], config: &AnalysisConfig) -> Self {
        let mut domain_counts: HashMap<&str, usize> = HashMap::new();
        let mut seen_senders = HashSet::new();
        let mut sender_addresses = Vec::new();

        for message in messages {
            if let Some(domain) = message.sender_domain() {
                *domain_counts.entry(domain).or_insert(0) += 1;
            }
            let address = message.from.address.as_str();
            if !address.is_empty() && seen_senders.insert(address) {
                sender_addresses.push(address.to_string());
            }
        }

        let mut sender_domains: Vec<DomainCount> = domain_counts
            .into_iter()
            .map(|(domain, count)| DomainCount {
                domain: domain.to_string(),
                count,
            })
            .collect();
        sender_domains.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.domain.cmp(&b.domain)));
        sender_domains.truncate(config.max_domains);

        let subjects = messages
            .iter()
            .map(|m| m.subject.trim())
            .filter(|s| !s.is_empty())
            .take(config.max_subjects)
            .map(str::to_string)
            .collect();

        let samples = sample_indices(messages.len(), config.max_samples)
            .into_iter()
            .map(|idx| {
                let message = &messages[idx];
                MessageSample {
                    position: idx + 1,
                    date: message.date,
                    source: message.source.clone(),
                    preview: preview(message, config.preview_lines),
                }
            })
            .collect();

        Self {
            total_messages: messages.len(),
            first_date: messages.first().and_then(|m| m.date),
            last_date: messages.last().and_then(|m| m.date),
            sender_domains,
            sender_addresses,
            subjects,
            samples,
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => lines.push(format!(
                "TOTAL EMAILS: {} ({} to {})",
                self.total_messages,
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            )),
            _ => lines.push(format!("TOTAL EMAILS: {}", self.total_messages)),
        }

        lines.push("\nSENDER DOMAINS:".to_string());
        for entry in &self.sender_domains {
            lines.push(format!("- {}: {} emails", entry.domain, entry.count));
        }

        lines.push("\nSENDER EMAILS:".to_string());
        for address in &self.sender_addresses {
            lines.push(format!("- {address}"));
        }

        lines.push("\nSAMPLE SUBJECTS:".to_string());
        for subject in &self.subjects {
            lines.push(format!("- {subject}"));
        }

        if !self.samples.is_empty() {
            lines.push("\nEMAIL SAMPLES:".to_string());
            for sample in &self.samples {
                let date = sample.date.map_or_else(
                    || "unknown".to_string(),
                    |d| d.format("%Y-%m-%d %H:%M").to_string(),
                );
                lines.push(format!(
                    "\nEMAIL {}/{} (Date: {date}):",
                    sample.position, self.total_messages
                ));
                lines.push(sample.preview.clone());
            }
        }

        lines.join("\n")
    }
}

/// First, last and middle, then evenly spaced positions, in corpus order
fn sample_indices(total: usize, limit: usize) -> Vec<usize> {
    if total == 0 || limit == 0 {
        return Vec::new();
    }

    let mut indices = vec![0];
    for idx in [total - 1, total / 2] {
        if indices.len() < limit && !indices.contains(&idx) {
            indices.push(idx);
        }
    }

    let step = (total / 10).max(1);
    for idx in (step..total).step_by(step) {
        if indices.len() >= limit {
            break;
        }
        if !indices.contains(&idx) {
            indices.push(idx);
        }
    }

    indices.sort_unstable();
    indices
}

fn preview(message: &Message, max_lines: usize) -> String {
    let text = message_text(message);
    let lines: Vec<&str> = text.lines().collect();
    let mut preview = lines
        .iter()
        .take(max_lines)
        .copied()
        .collect::<Vec<_>>()
        .join("\n");
    if lines.len() > max_lines {
        preview.push_str("\n[...]");
    }
    preview
}

fn message_text(message: &Message) -> String {
    format!(
        "Subject: {}\n\nFrom: {}\n\n{}",
        message.subject, message.from, message.body
    )
}

/// Every message in full, numbered and separated by rules
#[must_use]
pub fn format_corpus_content(messages: &[Message]) -> String {
    let mut blocks = Vec::with_capacity(messages.len() * 4);

    for (i, message) in messages.iter().enumerate() {
        let date = message.date.map_or_else(
            || "unknown".to_string(),
            |d| d.format("%Y-%m-%d %H:%M:%S").to_string(),
        );
        blocks.push(format!(
            "\nEMAIL #{} ({date}) - File: {}",
            i + 1,
            message.source
        ));
        blocks.push("=".repeat(CONTENT_RULE_WIDTH));
        blocks.push(message_text(message));
        blocks.push("-".repeat(CONTENT_RULE_WIDTH));
    }

    blocks.join("\n")
}

/// Counts and ranked lists from a network snapshot
#[must_use]
pub fn format_network_stats(stats: &NetworkStats) -> String {
    let mut lines = vec![format!(
        "NETWORK: {} participants, {} connections",
        stats.nodes, stats.edges
    )];

    lines.push("\nTOP SENDERS:".to_string());
    for rank in &stats.top_senders {
        lines.push(format!("- {}: {} recipients", rank.address, rank.degree));
    }

    lines.push("\nTOP RECIPIENTS:".to_string());
    for rank in &stats.top_recipients {
        lines.push(format!("- {}: {} senders", rank.address, rank.degree));
    }

    lines.push("\nKEY CONNECTORS:".to_string());
    for rank in &stats.top_connectors {
        lines.push(format!("- {}: {:.4}", rank.address, rank.betweenness));
    }

    lines.join("\n")
}

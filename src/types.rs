//! Core types for parsed messages

use crate::error::ParseError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A communication endpoint: normalized address plus advisory display name
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Participant {
    /// Display name (e.g., "John Doe"), empty when absent
    pub name: String,

    /// Lowercased address (e.g., "john@example.com"), empty when unknown
    pub address: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, address: &str) -> Self {
        Self {
            name: name.into(),
            address: address.trim().to_lowercase(),
        }
    }

    /// Parse a single address segment.
    ///
    /// `"Name" <addr>` splits into name and address; anything without brackets
    /// is taken whole as the address. Unbalanced brackets yield an unknown
    /// participant.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let s = s.trim();

        match (s.find('<'), s.rfind('>')) {
            (Some(start), Some(end)) if start < end => {
                let name = s[..start].trim().trim_matches('"').trim();
                Self::new(name, &s[start + 1..end])
            }
            (None, None) => Self::new("", s),
            _ => Self::default(),
        }
    }

    /// Parse a comma-separated address list, skipping empty segments.
    ///
    /// Commas inside double quotes belong to the display name.
    #[must_use]
    pub fn parse_list(s: &str) -> Vec<Self> {
        split_address_list(s)
            .into_iter()
            .filter(|segment| !segment.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    #[must_use]
    pub const fn is_known(&self) -> bool {
        !self.address.is_empty()
    }

    /// Domain after the last `@`, if any
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.address
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .filter(|domain| !domain.is_empty())
    }

    /// Display name when present, otherwise the address
    #[must_use]
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.address
        } else {
            &self.name
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{} <{}>", self.name, self.address)
        }
    }
}

fn split_address_list(s: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                segments.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&s[start..]);

    segments
}

/// A parsed message. Immutable once produced by the parser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// File name the message was read from
    pub source: String,

    /// Date sent, normalized to UTC; `None` when missing or unparseable
    pub date: Option<DateTime<Utc>>,

    pub subject: String,

    /// Sender; unknown when the From header is missing or malformed
    pub from: Participant,

    /// To recipients as they appear, duplicates kept
    pub to: Vec<Participant>,

    /// Cc recipients as they appear, duplicates kept
    pub cc: Vec<Participant>,

    /// Concatenated plain-text parts, attachments excluded
    pub body: String,
}

impl Message {
    /// Union of To and Cc, first occurrence wins, unknown addresses dropped
    #[must_use]
    pub fn recipients(&self) -> Vec<&Participant> {
        let mut seen = HashSet::new();
        self.to
            .iter()
            .chain(&self.cc)
            .filter(|&p| p.is_known() && seen.insert(p.address.as_str()))
            .collect()
    }

    /// Number of To and Cc entries before de-duplication
    #[must_use]
    pub const fn raw_recipient_count(&self) -> usize {
        self.to.len() + self.cc.len()
    }

    /// Lowercased sender domain, if the sender address has one
    #[must_use]
    pub fn sender_domain(&self) -> Option<&str> {
        self.from.domain()
    }
}

/// Result of parsing one raw message
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    /// Every field parsed cleanly
    Parsed(Message),

    /// Parsed, but some fields fell back to defaults
    Degraded {
        message: Message,
        issues: Vec<ParseError>,
    },

    /// Nothing usable could be recovered
    Unreadable(ParseError),
}

impl ParseOutcome {
    #[must_use]
    pub const fn message(&self) -> Option<&Message> {
        match self {
            Self::Parsed(message) | Self::Degraded { message, .. } => Some(message),
            Self::Unreadable(_) => None,
        }
    }

    #[must_use]
    pub fn into_message(self) -> Option<Message> {
        match self {
            Self::Parsed(message) | Self::Degraded { message, .. } => Some(message),
            Self::Unreadable(_) => None,
        }
    }

    /// Data-quality problems recorded for this message
    #[must_use]
    pub fn issues(&self) -> &[ParseError] {
        match self {
            Self::Parsed(_) => &[],
            Self::Degraded { issues, .. } => issues,
            Self::Unreadable(err) => std::slice::from_ref(err),
        }
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

//! Conversation — append-only log of session messages.
//!
//! DESIGN
//! ======
//! Entries are built once through the `MessageEntry` constructors and never
//! change afterwards: fields are private and only read accessors are
//! exposed. `ConversationStore` only appends, so `all()` always returns
//! entries in creation order.
//!
//! Reply entries always carry a table slot (possibly empty) while the
//! series slot stays optional. User, welcome, and error entries carry
//! neither.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::analysis::DataRow;
use crate::series::ChartSeries;

/// Text of the assistant entry every session starts with.
pub const WELCOME_TEXT: &str = "Hello! I'm your Real Estate Analysis Assistant. Ask me about localities like Wakad, \
                                Aundh, Ambegaon Budruk, or Akurdi.";

// =============================================================================
// MESSAGE ENTRY
// =============================================================================

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One immutable conversation message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageEntry {
    id: Uuid,
    role: Role,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    series: Option<ChartSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<Vec<DataRow>>,
    is_comparison: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart_type: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl MessageEntry {
    fn new(role: Role, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text,
            series: None,
            table: None,
            is_comparison: false,
            chart_type: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// A user submission.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text.into())
    }

    /// A prose-only assistant message (welcome, errors).
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text.into())
    }

    /// The fixed greeting a session opens with.
    #[must_use]
    pub fn welcome() -> Self {
        Self::assistant(WELCOME_TEXT)
    }

    /// An assistant answer built from an analysis result.
    #[must_use]
    pub fn reply(
        summary: impl Into<String>,
        series: Option<ChartSeries>,
        table: Vec<DataRow>,
        is_comparison: bool,
        chart_type: impl Into<String>,
    ) -> Self {
        Self {
            series,
            table: Some(table),
            is_comparison,
            chart_type: Some(chart_type.into()),
            ..Self::new(Role::Assistant, summary.into())
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn series(&self) -> Option<&ChartSeries> {
        self.series.as_ref()
    }

    /// Table rows; empty when the entry has no table slot.
    #[must_use]
    pub fn table(&self) -> &[DataRow] {
        self.table.as_deref().unwrap_or_default()
    }

    /// Whether the entry carries a table slot, even an empty one.
    #[must_use]
    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    /// Only meaningful when a series is present.
    #[must_use]
    pub fn is_comparison(&self) -> bool {
        self.is_comparison
    }

    #[must_use]
    pub fn chart_type(&self) -> Option<&str> {
        self.chart_type.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Ordered, append-only message log for one session.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    entries: Vec<MessageEntry>,
}

impl ConversationStore {
    /// A store holding only the welcome message.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: vec![MessageEntry::welcome()] }
    }

    pub fn append(&mut self, entry: MessageEntry) {
        self.entries.push(entry);
    }

    /// All entries in append order.
    #[must_use]
    pub fn all(&self) -> &[MessageEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: a store opens with the welcome entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&MessageEntry> {
        self.entries.last()
    }

    /// Rows of the most recent entry with a non-empty table.
    #[must_use]
    pub fn latest_table(&self) -> Option<&[DataRow]> {
        self.entries
            .iter()
            .rev()
            .map(MessageEntry::table)
            .find(|table| !table.is_empty())
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

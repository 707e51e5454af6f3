use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::priority::Priority;

/// Lifecycle of an agent session attached to a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

impl AgentState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Review state of a pull request linked to a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    #[default]
    Open,
    Draft,
    Merged,
    Closed,
}

impl PrState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Draft => "draft",
            Self::Merged => "merged",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Agent currently (or previously) working an item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSession {
    pub name: String,
    pub state: AgentState,
}

/// Pull request linked to an item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    pub number: u64,
    pub url: Option<String>,
    pub state: PrState,
}

/// One work item as supplied by the board layer.
///
/// Items are an immutable snapshot: query evaluation and triage read them
/// but never write back. `ready` and `critical_path` are carried through as
/// data; triage recomputes its own classification from the graph.
///
/// Unknown JSON properties are kept in [`WorkItem::extra`] so queries can
/// still address them by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Priority,
    pub labels: Vec<String>,
    pub blocked_by: Option<Vec<String>>,
    pub blocking: Option<Vec<String>>,
    pub assignee: Option<String>,
    pub branch: Option<String>,
    pub pr: Option<PullRequest>,
    pub agent: Option<AgentSession>,
    pub ready: bool,
    pub critical_path: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl WorkItem {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_blocked_by<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocked_by = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_blocking<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocking = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Ids of items that block this one (empty when absent).
    #[must_use]
    pub fn blockers(&self) -> &[String] {
        self.blocked_by.as_deref().unwrap_or_default()
    }

    /// Ids of items this one blocks (empty when absent).
    #[must_use]
    pub fn blocked_items(&self) -> &[String] {
        self.blocking.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn is_blocked(&self) -> bool {
        !self.blockers().is_empty()
    }

    #[must_use]
    pub fn has_running_agent(&self) -> bool {
        self.agent
            .as_ref()
            .is_some_and(|agent| agent.state == AgentState::Running)
    }
}

//! Built-in saved queries.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryPreset {
    pub id: &'static str,
    pub label: &'static str,
    pub query: &'static str,
    pub description: &'static str,
}

pub const QUERY_PRESETS: &[QueryPreset] = &[
    QueryPreset {
        id: "high-priority",
        label: "High priority",
        query: "priority:1-2",
        description: "Urgent and high priority items",
    },
    QueryPreset {
        id: "blocked",
        label: "Blocked",
        query: "blocked:true",
        description: "Items waiting on another item",
    },
    QueryPreset {
        id: "ready",
        label: "Ready",
        query: "ready:true",
        description: "Items with no open blockers",
    },
    QueryPreset {
        id: "mine",
        label: "Assigned",
        query: "assignee:@me",
        description: "Items that have an assignee",
    },
    QueryPreset {
        id: "unassigned",
        label: "Unassigned",
        query: "assignee:!@me",
        description: "Items nobody has picked up",
    },
    QueryPreset {
        id: "in-progress",
        label: "In progress",
        query: "status:in_progress",
        description: "Items currently being worked on",
    },
    QueryPreset {
        id: "agent-running",
        label: "Agent running",
        query: "agent:running",
        description: "Items with a running agent session",
    },
    QueryPreset {
        id: "has-pr",
        label: "Has PR",
        query: "pr:!none",
        description: "Items with an attached pull request",
    },
    QueryPreset {
        id: "bugs",
        label: "Bugs",
        query: "labels:bug",
        description: "Items labelled as bugs",
    },
    QueryPreset {
        id: "urgent",
        label: "Urgent",
        query: "priority:1",
        description: "Urgent items only",
    },
];

/// Look up a preset by id (case-insensitive).
#[must_use]
pub fn find_preset(id: &str) -> Option<&'static QueryPreset> {
    QUERY_PRESETS
        .iter()
        .find(|preset| preset.id.eq_ignore_ascii_case(id.trim()))
}

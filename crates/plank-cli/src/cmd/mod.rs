pub mod filter;
pub mod presets;
pub mod triage;
pub mod validate;

use std::path::Path;

use plank_core::error::ErrorCode;
use plank_core::model::item::WorkItem;
use tracing::debug;

use crate::output::{OutputMode, fail};

/// Read the board snapshot: a JSON array of work items.
///
/// # Errors
///
/// Reports `items_file_unreadable` when the file cannot be read and
/// `items_file_invalid` when it is not an array of items.
pub fn load_items(path: &Path, output: OutputMode) -> anyhow::Result<Vec<WorkItem>> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        fail(
            output,
            ErrorCode::ItemsFileUnreadable,
            format!("cannot read {}: {err}", path.display()),
        )
    })?;

    let items: Vec<WorkItem> = serde_json::from_str(&content).map_err(|err| {
        fail(
            output,
            ErrorCode::ItemsFileInvalid,
            format!("{}: {err}", path.display()),
        )
    })?;

    debug!(path = %path.display(), count = items.len(), "loaded items");
    Ok(items)
}

/// One-line status/priority summary shared by the list-style commands.
pub fn item_row(item: &WorkItem) -> String {
    format!(
        "{}  {}  {}  {}",
        item.id,
        plank_query::fields::effective_status(item),
        item.priority,
        item.title
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use plank_core::model::priority::Priority;

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_items(&dir.path().join("nope.json"), OutputMode::Text)
            .expect_err("missing file");
        assert!(err.to_string().starts_with("E2001"), "{err}");
    }

    #[test]
    fn object_instead_of_array_is_invalid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("items.json");
        std::fs::write(&path, r#"{"id": "a"}"#).expect("write");
        let err = load_items(&path, OutputMode::Text).expect_err("not an array");
        assert!(err.to_string().starts_with("E2002"), "{err}");
    }

    #[test]
    fn loads_sparse_items() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("items.json");
        std::fs::write(&path, r#"[{"id": "a", "priority": "high"}, {"id": "b"}]"#)
            .expect("write");
        let items = load_items(&path, OutputMode::Text).expect("load");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].priority, Priority::High);
        assert_eq!(item_row(&items[1]), "b  open  medium  ");
    }
}

//! Tabular export of history lists.

use shared::models::{ImageHistoryItem, SearchHistoryItem};

/// Placeholder for cells with nothing to show.
pub const MISSING: &str = "N/A";

/// Length at which previews are cut.
pub const PREVIEW_CHARS: usize = 160;

/// Header row plus data rows, ready for [`to_csv`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTable {
    /// Column names.
    pub headers: Vec<String>,
    /// One entry per exported item, in column order.
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    /// Whether there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn fallback_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Search history as `ID, Query, Snippet, Timestamp`.
#[must_use]
pub fn search_rows(items: &[SearchHistoryItem]) -> ExportTable {
    let mut table = ExportTable::new(&["ID", "Query", "Snippet", "Timestamp"]);
    table.rows = items
        .iter()
        .map(|item| {
            vec![
                item.id.to_string(),
                item.query.clone(),
                item.first_snippet()
                    .filter(|snippet| !snippet.is_empty())
                    .unwrap_or_else(|| MISSING.to_string()),
                item.timestamp.clone().unwrap_or_else(fallback_timestamp),
            ]
        })
        .collect();
    table
}

/// Image history as `ID, Prompt, Image URL, Timestamp`.
#[must_use]
pub fn image_rows(items: &[ImageHistoryItem]) -> ExportTable {
    let mut table = ExportTable::new(&["ID", "Prompt", "Image URL", "Timestamp"]);
    table.rows = items
        .iter()
        .map(|item| {
            vec![
                item.id.to_string(),
                item.prompt().unwrap_or(MISSING).to_string(),
                item.source().unwrap_or(MISSING).to_string(),
                item.timestamp.clone().unwrap_or_else(fallback_timestamp),
            ]
        })
        .collect();
    table
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render `table` as CSV, or `None` when it has no rows to export.
#[must_use]
pub fn to_csv(table: &ExportTable) -> Option<String> {
    if table.is_empty() {
        return None;
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .map(|cell| escape_field(cell))
            .collect::<Vec<_>>()
            .join(",")
    };

    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(line(&table.headers));
    lines.extend(table.rows.iter().map(|row| line(row)));
    Some(lines.join("\n"))
}

/// Cut `text` to at most `max` characters, marking the cut with `…`.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((index, _)) => format!("{}…", &text[..index]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search_item(value: serde_json::Value) -> SearchHistoryItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn search_rows_use_first_snippet() {
        let items = vec![
            search_item(json!({
                "id": 1,
                "query": "rust",
                "results": [{"title": "The Book"}, {"text": "ignored"}],
                "timestamp": "2024-01-01T00:00:00"
            })),
            search_item(json!({"id": 2, "query": "empty", "results": [], "timestamp": "t"})),
        ];

        let table = search_rows(&items);
        assert_eq!(table.headers, ["ID", "Query", "Snippet", "Timestamp"]);
        assert_eq!(table.rows[0], ["1", "rust", "The Book", "2024-01-01T00:00:00"]);
        assert_eq!(table.rows[1][2], MISSING);
    }

    #[test]
    fn missing_timestamp_is_filled_in() {
        let table = search_rows(&[search_item(json!({"id": 3, "query": "q"}))]);
        assert!(!table.rows[0][3].is_empty());
        assert_ne!(table.rows[0][3], MISSING);
    }

    #[test]
    fn image_rows_fill_missing_values() {
        let items: Vec<ImageHistoryItem> = serde_json::from_value(json!([
            {"id": 1, "prompt": "a cat", "image_url": "https://img/1.png", "timestamp": "t1"},
            {"id": 2, "url": "https://img/2.png", "timestamp": "t2"},
            {"id": 3, "prompt": "", "timestamp": "t3"}
        ]))
        .unwrap();

        let table = image_rows(&items);
        assert_eq!(table.headers, ["ID", "Prompt", "Image URL", "Timestamp"]);
        assert_eq!(table.rows[0], ["1", "a cat", "https://img/1.png", "t1"]);
        assert_eq!(table.rows[1], ["2", MISSING, "https://img/2.png", "t2"]);
        assert_eq!(table.rows[2], ["3", MISSING, MISSING, "t3"]);
    }

    #[test]
    fn empty_table_has_nothing_to_export() {
        assert_eq!(to_csv(&search_rows(&[])), None);
        assert_eq!(to_csv(&image_rows(&[])), None);
    }

    #[test]
    fn csv_quotes_special_fields() {
        let table = ExportTable {
            headers: vec!["ID".into(), "Query".into()],
            rows: vec![
                vec!["1".into(), "plain".into()],
                vec!["2".into(), "a, b".into()],
                vec!["3".into(), "say \"hi\"".into()],
                vec!["4".into(), "two\nlines".into()],
            ],
        };

        assert_eq!(
            to_csv(&table).unwrap(),
            "ID,Query\n1,plain\n2,\"a, b\"\n3,\"say \"\"hi\"\"\"\n4,\"two\nlines\""
        );
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("héllo wörld", 5), "héllo…");
        assert_eq!(truncate("", PREVIEW_CHARS), "");
        assert_eq!(truncate(&"x".repeat(200), PREVIEW_CHARS).chars().count(), 161);
    }
}

//! Report rendering: SQL-commented text sections.
//!
//! The report is a human-diffable format with fixed rule widths, so the
//! constants here are load-bearing: changing them changes every byte of
//! output downstream consumers compare against.

use crate::extract::{ConnectionInfo, DatasourceInfo, QueryIndex, WorksheetIndex};
use std::path::Path;

/// Width of section rule lines.
pub const LINE_BIG: usize = 77;

/// Target width of per-query title lines.
pub const LINE_SMALL: usize = 50;

/// Literal used for connection attributes absent from the workbook.
const ABSENT: &str = "None";

fn rule(width: usize) -> String {
    "-".repeat(width)
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(ABSENT)
}

/// Render the audit header.
///
/// `created_by` and `created_on` are injected by the caller so rendering
/// stays deterministic under test; the CLI passes the invoking user and a
/// `YYYY-MM-DD hh:mmAM/PM` local timestamp. `source` is expected to already
/// be absolute.
pub fn format_header(source: &Path, created_by: &str, created_on: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", rule(LINE_BIG)));
    out.push_str(&format!("-- Created by: {created_by}\n"));
    out.push_str(&format!("-- Created on: {created_on}\n"));
    out.push_str(&format!("-- Source: {}\n", source.display()));
    out.push_str(&format!("{}{}", rule(LINE_BIG), "\n".repeat(3)));
    out
}

/// Render the worksheets section: each worksheet followed by the captions it
/// references, indented.
pub fn format_worksheets(worksheets: &WorksheetIndex) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "-- Worksheets w/ Datasources {}\n",
        rule(LINE_BIG - 29)
    ));
    for (name, captions) in worksheets {
        out.push_str(&format!("-- {name}\n"));
        for caption in captions {
            out.push_str(&format!("  -- {caption}\n"));
        }
        out.push('\n');
    }
    out.push_str("\n\n");
    out
}

/// Render the datasources section: one block of connection details per
/// captioned datasource, fields in fixed order.
pub fn format_datasources(datasources: &DatasourceInfo) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "-- Datasources & Connections {}\n",
        rule(LINE_BIG - 29)
    ));
    for (caption, connection) in datasources {
        let ConnectionInfo {
            engine,
            database,
            server,
            user,
        } = connection;
        out.push_str(&format!("-- {caption}\n"));
        out.push_str(&format!("  -- Server: {}\n", opt(server)));
        out.push_str(&format!("  -- Engine: {}\n", opt(engine)));
        out.push_str(&format!("  -- Database: {}\n", opt(database)));
        out.push_str(&format!("  -- Username: {}\n", opt(user)));
        out.push_str("\n\n");
    }
    out
}

/// Render the queries section: a dash-padded title per datasource, the SQL
/// (or linked-table placeholder) verbatim, and a statement terminator.
pub fn format_queries(queries: &QueryIndex) -> String {
    let mut out = String::new();
    out.push_str(&format!("-- Queries {}\n", rule(LINE_BIG - 11)));
    for (caption, query) in queries {
        let pad = LINE_SMALL.saturating_sub(4 + caption.len());
        out.push_str(&format!("-- {caption} {}\n", rule(pad)));
        out.push_str(query);
        out.push_str(&format!("\n;{}", "\n".repeat(3)));
    }
    out
}

/// Concatenate the four report parts in fixed order.
///
/// No separators are added; each section already carries its trailing blank
/// lines.
pub fn assemble(header: &str, worksheets: &str, datasources: &str, queries: &str) -> String {
    let mut report = String::with_capacity(
        header.len() + worksheets.len() + datasources.len() + queries.len(),
    );
    report.push_str(header);
    report.push_str(worksheets);
    report.push_str(datasources);
    report.push_str(queries);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use std::path::PathBuf;

    #[test]
    fn test_header_layout() {
        let source = PathBuf::from("/data/book.twb");
        let header = format_header(&source, "analyst", "2016-08-02 03:45PM");

        let lines: Vec<_> = header.lines().collect();
        assert_eq!(lines[0], rule(77));
        assert_eq!(lines[1], "-- Created by: analyst");
        assert_eq!(lines[2], "-- Created on: 2016-08-02 03:45PM");
        assert_eq!(lines[3], "-- Source: /data/book.twb");
        assert_eq!(lines[4], rule(77));
        assert!(header.ends_with("\n\n\n"));
    }

    #[test]
    fn test_worksheets_section() {
        let mut worksheets = WorksheetIndex::new();
        worksheets.insert("Overview".to_string(), vec!["Sales".to_string()]);

        let section = format_worksheets(&worksheets);
        assert_eq!(
            section,
            format!(
                "-- Worksheets w/ Datasources {}\n-- Overview\n  -- Sales\n\n\n\n",
                rule(48)
            )
        );
        // Title line is exactly the big rule width.
        assert_eq!(section.lines().next().unwrap().len(), LINE_BIG);
    }

    #[test]
    fn test_datasources_section_renders_absent_fields() {
        let mut datasources = DatasourceInfo::new();
        datasources.insert(
            "Sales".to_string(),
            ConnectionInfo {
                engine: Some("postgres".to_string()),
                database: None,
                server: Some("db.local".to_string()),
                user: None,
            },
        );

        let section = format_datasources(&datasources);
        let lines: Vec<_> = section.lines().collect();
        assert_eq!(lines[1], "-- Sales");
        assert_eq!(lines[2], "  -- Server: db.local");
        assert_eq!(lines[3], "  -- Engine: postgres");
        assert_eq!(lines[4], "  -- Database: None");
        assert_eq!(lines[5], "  -- Username: None");
    }

    #[test]
    fn test_queries_section() {
        let mut queries = QueryIndex::new();
        queries.insert("Sales".to_string(), "SELECT 1\nFROM t".to_string());

        let section = format_queries(&queries);
        assert_eq!(
            section,
            format!(
                "-- Queries {}\n-- Sales {}\nSELECT 1\nFROM t\n;\n\n\n",
                rule(66),
                rule(41)
            )
        );
        // Query title pads out to the small rule width.
        assert_eq!(section.lines().nth(1).unwrap().len(), LINE_SMALL);
    }

    #[test]
    fn test_query_title_padding_saturates() {
        let long = "A caption much longer than the small rule width is";
        let mut queries = QueryIndex::new();
        queries.insert(long.to_string(), "SELECT 1".to_string());

        let section = format_queries(&queries);
        assert!(section.contains(&format!("-- {long} \n")));
    }

    #[test]
    fn test_assemble_is_plain_concatenation() {
        let report = assemble("H", "W", "D", "Q");
        assert_eq!(report, "HWDQ");
    }

    #[test]
    fn test_empty_sections() {
        let worksheets: WorksheetIndex = IndexMap::new();
        assert_eq!(
            format_worksheets(&worksheets),
            format!("-- Worksheets w/ Datasources {}\n\n\n", rule(48))
        );

        let queries: QueryIndex = IndexMap::new();
        assert_eq!(format_queries(&queries), format!("-- Queries {}\n", rule(66)));
    }
}

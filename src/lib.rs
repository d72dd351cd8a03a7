//! # tabsql
//!
//! Extract worksheets, connection details and custom SQL from Tableau
//! workbooks (`.twb` and zip-packaged `.twbx`) and render them as a
//! SQL-commented text report.
//!
//! The pipeline is four fixed stages: load the workbook XML into a tree,
//! run three ordered extraction walks over it, render each result as a
//! comment-prefixed section, and concatenate the sections behind an audit
//! header.
//!
//! ## Quick Start
//!
//! ```no_run
//! let report = tabsql::convert("dashboard.twbx", "analyst", "2016-08-02 03:45PM")?;
//! std::fs::write("dashboard.sql", report)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Stage-level API
//!
//! ```no_run
//! use tabsql::{extract, loader, render};
//!
//! let doc = loader::load("dashboard.twb")?;
//! let datasources = doc.root().child("datasources").unwrap();
//! let queries = extract::queries(datasources)?;
//! print!("{}", render::format_queries(&queries));
//! # Ok::<(), tabsql::Error>(())
//! ```

pub mod document;
pub mod error;
pub mod extract;
pub mod loader;
pub mod render;

// Re-exports
pub use document::{WorkbookDocument, XmlNode};
pub use error::{Error, Result};
pub use extract::{ConnectionInfo, DatasourceInfo, QueryIndex, WorksheetIndex};

use std::path::Path;

/// Run the full pipeline and return the report text.
///
/// `created_by` and `created_on` feed the audit header; the core never reads
/// the clock or process identity itself, so callers own those values (the CLI
/// supplies the invoking user and the current local time). Any failure aborts
/// before anything is produced — there is no partial report.
pub fn convert(
    path: impl AsRef<Path>,
    created_by: &str,
    created_on: &str,
) -> Result<String> {
    let path = path.as_ref();
    let doc = loader::load(path)?;
    let root = doc.root();

    let worksheets_node = root
        .child("worksheets")
        .ok_or_else(|| Error::missing_element("workbook/worksheets"))?;
    let datasources_node = root
        .child("datasources")
        .ok_or_else(|| Error::missing_element("workbook/datasources"))?;

    let worksheets = extract::worksheets(worksheets_node)?;
    let datasources = extract::datasources(datasources_node)?;
    let queries = extract::queries(datasources_node)?;

    let source = std::path::absolute(path)?;
    let header = render::format_header(&source, created_by, created_on);

    Ok(render::assemble(
        &header,
        &render::format_worksheets(&worksheets),
        &render::format_datasources(&datasources),
        &render::format_queries(&queries),
    ))
}

//! Extraction passes over the workbook tree.
//!
//! Three independent walks, each keyed by strings from the same document and
//! each preserving first-appearance order: worksheet names to the datasource
//! captions they reference, datasource captions to connection details, and
//! datasource captions to normalized custom SQL.

use crate::document::XmlNode;
use crate::error::{Error, Result};
use indexmap::IndexMap;

/// Worksheet name to referenced datasource captions, in document order.
pub type WorksheetIndex = IndexMap<String, Vec<String>>;

/// Datasource caption to connection details, in document order.
pub type DatasourceInfo = IndexMap<String, ConnectionInfo>;

/// Datasource caption to normalized SQL (or linked-table placeholder).
pub type QueryIndex = IndexMap<String, String>;

/// Connection attributes of one datasource.
///
/// Each field is `None` when the attribute is absent from the workbook, which
/// is distinct from an attribute present with an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionInfo {
    /// Connection class, e.g. `postgres` or `sqlserver`.
    pub engine: Option<String>,
    /// Database name.
    pub database: Option<String>,
    /// Server host.
    pub server: Option<String>,
    /// Login user.
    pub user: Option<String>,
}

/// Collect worksheet names and the datasource captions each references.
///
/// Takes the `worksheets` child of the workbook root. Every worksheet must
/// carry a `name` attribute; its captions come from the children of the nested
/// `table/view/datasources` node, skipping children without a caption.
pub fn worksheets(worksheets: &XmlNode) -> Result<WorksheetIndex> {
    let mut results = WorksheetIndex::new();

    for worksheet in worksheets.children() {
        let name = worksheet
            .attr("name")
            .ok_or_else(|| Error::missing_attribute("worksheet", "name"))?;

        let captions = match worksheet.descend("table/view/datasources") {
            Some(node) => node
                .children()
                .iter()
                .filter_map(|child| child.attr("caption"))
                .map(String::from)
                .collect(),
            None => Vec::new(),
        };

        results.insert(name.to_string(), captions);
    }

    Ok(results)
}

/// Collect connection details per captioned datasource.
///
/// Takes the `datasources` child of the workbook root. Datasources without a
/// caption (parameter/internal datasources) are excluded. Each retained
/// datasource must have a `connection` child; its four attributes are all
/// optional.
pub fn datasources(datasources: &XmlNode) -> Result<DatasourceInfo> {
    let mut results = DatasourceInfo::new();

    for (caption, datasource) in captioned(datasources) {
        let connection = datasource
            .child("connection")
            .ok_or_else(|| Error::missing_element("datasource/connection"))?;

        results.insert(
            caption.to_string(),
            ConnectionInfo {
                engine: connection.attr("class").map(String::from),
                database: connection.attr("dbname").map(String::from),
                server: connection.attr("server").map(String::from),
                user: connection.attr("username").map(String::from),
            },
        );
    }

    Ok(results)
}

/// Collect custom SQL (or a linked-table placeholder) per captioned datasource.
///
/// Takes the `datasources` child of the workbook root, with the same caption
/// filter as [`datasources`]. A relation with text is custom SQL and gets
/// normalized; a relation without text is a direct table reference and must
/// carry a `table` attribute.
pub fn queries(datasources: &XmlNode) -> Result<QueryIndex> {
    let mut results = QueryIndex::new();

    for (caption, datasource) in captioned(datasources) {
        let relation = datasource
            .descend("connection/relation")
            .ok_or_else(|| Error::missing_element("datasource/connection/relation"))?;

        let query = match relation.text() {
            Some(sql) => normalize_sql(sql),
            None => {
                let table = relation
                    .attr("table")
                    .ok_or_else(|| Error::missing_attribute("relation", "table"))?;
                format!("-- LINKED TO: {table}")
            }
        };

        results.insert(caption.to_string(), query);
    }

    Ok(results)
}

/// Datasource children that carry a `caption`, in document order.
fn captioned(datasources: &XmlNode) -> impl Iterator<Item = (&str, &XmlNode)> {
    datasources
        .children()
        .iter()
        .filter_map(|node| node.attr("caption").map(|caption| (caption, node)))
}

/// Normalize raw custom SQL pulled out of the workbook XML.
///
/// Tableau doubles comparison operators for XML safety, so `<<`/`>>` collapse
/// back to `<`/`>` first; CRLF pairs then normalize to bare linefeeds.
fn normalize_sql(raw: &str) -> String {
    raw.replace("<<", "<").replace(">>", ">").replace("\r\n", "\n")
}

//! Workbook loading: path validation, .twbx unpacking, XML parsing.

use crate::document::WorkbookDocument;
use crate::error::{Error, Result};
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

/// Extension of a raw XML workbook.
pub const TWB_EXT: &str = ".twb";

/// Extension of a zip-packaged workbook.
pub const TWBX_EXT: &str = ".twbx";

/// Load a workbook file into a parsed document tree.
///
/// `.twb` files are parsed directly; `.twbx` packages are opened as a ZIP
/// archive and the first inner `.twb` entry is parsed. Validation happens
/// before any bytes are read, so a bad path or extension never reaches the
/// XML parser.
///
/// # Example
///
/// ```no_run
/// use tabsql::loader;
///
/// let doc = loader::load("dashboard.twbx")?;
/// # Ok::<(), tabsql::Error>(())
/// ```
pub fn load(path: impl AsRef<Path>) -> Result<WorkbookDocument> {
    let path = path.as_ref();
    validate(path)?;

    if path_str(path).ends_with(TWBX_EXT) {
        return load_packaged(path);
    }

    let xml = fs::read_to_string(path)?;
    WorkbookDocument::parse(&xml)
}

/// Reject paths that are not existing regular files with a workbook extension.
fn validate(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::InvalidPath(path.to_path_buf()));
    }
    let name = path_str(path);
    if !name.ends_with(TWB_EXT) && !name.ends_with(TWBX_EXT) {
        return Err(Error::UnsupportedExtension(path.to_path_buf()));
    }
    Ok(())
}

/// Pull the first `.twb` entry out of a `.twbx` package and parse it.
fn load_packaged(path: &Path) -> Result<WorkbookDocument> {
    let data = fs::read(path)?;
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if !entry.name().ends_with(TWB_EXT) {
            continue;
        }
        let mut xml = String::new();
        entry.read_to_string(&mut xml)?;
        return WorkbookDocument::parse(&xml);
    }

    Err(Error::EmptyArchive(path.to_path_buf()))
}

fn path_str(path: &Path) -> std::borrow::Cow<'_, str> {
    path.to_string_lossy()
}

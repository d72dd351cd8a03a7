//! Owned XML tree for parsed workbooks.
//!
//! Tableau workbooks are walked by fixed relative paths (`table/view/datasources`,
//! `connection/relation`), so the loader materializes the document into a small
//! owned tree instead of re-streaming events for every extraction pass.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};

/// A single element in the parsed workbook tree.
///
/// Attributes and children keep document order. `text` holds only the
/// character data that appears before the first child element, which is the
/// position Tableau stores custom SQL in.
#[derive(Debug, Clone, Default)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: String,
}

impl XmlNode {
    /// Element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Walk a `/`-separated path of child names, first match at each hop.
    pub fn descend(&self, path: &str) -> Option<&XmlNode> {
        path.split('/')
            .try_fold(self, |node, name| node.child(name))
    }

    /// Leading character data, or `None` when the element carries none.
    pub fn text(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::MalformedDocument(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::MalformedDocument(e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }
}

/// The in-memory tree of one workbook's XML, owned and read-only.
#[derive(Debug, Clone)]
pub struct WorkbookDocument {
    root: XmlNode,
}

impl WorkbookDocument {
    /// Parse well-formed XML into a tree.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut buf = Vec::new();
        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push(XmlNode::from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let node = XmlNode::from_start(e)?;
                    Self::attach(&mut stack, &mut root, node)?;
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(open) = stack.last_mut() {
                        // Only text ahead of the first child element counts.
                        if open.children.is_empty() {
                            let text = e
                                .unescape()
                                .map_err(|e| Error::MalformedDocument(e.to_string()))?;
                            open.text.push_str(&text);
                        }
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(open) = stack.last_mut() {
                        if open.children.is_empty() {
                            open.text.push_str(&String::from_utf8_lossy(e));
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    let node = stack.pop().ok_or_else(|| {
                        Error::MalformedDocument("unmatched closing tag".to_string())
                    })?;
                    Self::attach(&mut stack, &mut root, node)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::MalformedDocument(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::MalformedDocument(
                "unexpected end of document".to_string(),
            ));
        }

        root.map(|root| Self { root }).ok_or_else(|| {
            Error::MalformedDocument("document has no root element".to_string())
        })
    }

    fn attach(stack: &mut Vec<XmlNode>, root: &mut Option<XmlNode>, node: XmlNode) -> Result<()> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None if root.is_none() => *root = Some(node),
            None => {
                return Err(Error::MalformedDocument(
                    "multiple root elements".to_string(),
                ))
            }
        }
        Ok(())
    }

    /// Root element of the workbook.
    pub fn root(&self) -> &XmlNode {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree_shape() {
        let doc = WorkbookDocument::parse(
            r#"<workbook version="10.0">
                 <worksheets>
                   <worksheet name="Sales"/>
                   <worksheet name="Margins"/>
                 </worksheets>
               </workbook>"#,
        )
        .unwrap();

        let root = doc.root();
        assert_eq!(root.name(), "workbook");
        assert_eq!(root.attr("version"), Some("10.0"));

        let worksheets = root.child("worksheets").unwrap();
        assert_eq!(worksheets.children().len(), 2);
        assert_eq!(worksheets.children()[0].attr("name"), Some("Sales"));
        assert_eq!(worksheets.children()[1].attr("name"), Some("Margins"));
    }

    #[test]
    fn test_descend_path() {
        let doc = WorkbookDocument::parse(
            "<worksheet><table><view><datasources><datasource caption='a'/></datasources></view></table></worksheet>",
        )
        .unwrap();

        let ds = doc.root().descend("table/view/datasources").unwrap();
        assert_eq!(ds.children().len(), 1);
        assert!(doc.root().descend("table/view/missing").is_none());
    }

    #[test]
    fn test_leading_text_only() {
        let doc =
            WorkbookDocument::parse("<relation>SELECT 1<r/>trailing</relation>").unwrap();
        assert_eq!(doc.root().text(), Some("SELECT 1"));

        let doc = WorkbookDocument::parse("<relation table='[orders]'/>").unwrap();
        assert_eq!(doc.root().text(), None);
        assert_eq!(doc.root().attr("table"), Some("[orders]"));
    }

    #[test]
    fn test_entities_unescaped() {
        let doc = WorkbookDocument::parse(
            "<relation name='A &amp; B'>x &lt;&lt; 5</relation>",
        )
        .unwrap();
        assert_eq!(doc.root().attr("name"), Some("A & B"));
        assert_eq!(doc.root().text(), Some("x << 5"));
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(matches!(
            WorkbookDocument::parse("<a><b></a>"),
            Err(Error::MalformedDocument(_))
        ));
        assert!(matches!(
            WorkbookDocument::parse("   "),
            Err(Error::MalformedDocument(_))
        ));
    }
}

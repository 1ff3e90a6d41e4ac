use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::core::{CfdiError, ParseLimits};

type NodeId = usize;

/// An element with its attributes and ordered children. Text content is
/// not kept: CFDI carries its data in attributes.
#[derive(Debug)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<NodeId>,
}

/// Arena tree of the elements in one XML document.
#[derive(Debug)]
pub struct XmlTree {
    elements: Vec<Element>,
    top_level: Vec<NodeId>,
}

impl XmlTree {
    /// Build the tree, enforcing `limits`. Malformed input is reported as
    /// [`CfdiError::Xml`].
    pub fn parse(xml: &str, limits: &ParseLimits) -> Result<Self, CfdiError> {
        if xml.len() > limits.max_bytes {
            return Err(CfdiError::TooLarge {
                size: xml.len(),
                limit: limits.max_bytes,
            });
        }

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut tree = XmlTree {
            elements: Vec::new(),
            top_level: Vec::new(),
        };
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let id = tree.push(e, &open, limits)?;
                    open.push(id);
                }
                Ok(Event::Empty(ref e)) => {
                    tree.push(e, &open, limits)?;
                }
                Ok(Event::End(_)) => {
                    if open.pop().is_none() {
                        return Err(CfdiError::Xml("closing tag without opening tag".into()));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(CfdiError::Xml(format!(
                        "XML parse error at byte {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
        }

        if let Some(&unclosed) = open.last() {
            return Err(CfdiError::Xml(format!(
                "unexpected end of input inside <{}>",
                tree.elements[unclosed].name
            )));
        }

        Ok(tree)
    }

    fn push(
        &mut self,
        start: &BytesStart<'_>,
        open: &[NodeId],
        limits: &ParseLimits,
    ) -> Result<NodeId, CfdiError> {
        if open.len() >= limits.max_depth {
            return Err(CfdiError::TooDeep {
                limit: limits.max_depth,
            });
        }
        if self.elements.len() >= limits.max_elements {
            return Err(CfdiError::TooManyElements {
                limit: limits.max_elements,
            });
        }

        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let attributes = start
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = match attr.unescape_value() {
                    Ok(v) => v.into_owned(),
                    Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
                };
                (key, value)
            })
            .collect();

        let id = self.elements.len();
        self.elements.push(Element {
            name,
            attributes,
            children: Vec::new(),
        });
        match open.last() {
            Some(&parent) => self.elements[parent].children.push(id),
            None => self.top_level.push(id),
        }
        Ok(id)
    }

    /// Top-level elements in document order. Well-formed XML has exactly one.
    pub fn top_level(&self) -> impl Iterator<Item = Node<'_>> {
        self.top_level.iter().map(|&id| Node { tree: self, id })
    }

    /// Every element in document (pre-)order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: self.top_level.iter().rev().copied().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Borrowed handle to one element of an [`XmlTree`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'t> {
    tree: &'t XmlTree,
    id: NodeId,
}

impl<'t> Node<'t> {
    fn element(self) -> &'t Element {
        &self.tree.elements[self.id]
    }

    /// Qualified name as written, e.g. "cfdi:Concepto".
    pub fn name(self) -> &'t str {
        &self.element().name
    }

    /// Attribute value by exact qualified name.
    pub fn attribute(self, name: &str) -> Option<&'t str> {
        self.element()
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Direct child elements in document order.
    pub fn children(self) -> impl Iterator<Item = Node<'t>> + Clone + 't {
        let tree = self.tree;
        self.element()
            .children
            .iter()
            .map(move |&id| Node { tree, id })
    }

    /// All elements below this one in document order, excluding itself.
    pub fn descendants(self) -> Descendants<'t> {
        Descendants {
            tree: self.tree,
            stack: self.element().children.iter().rev().copied().collect(),
        }
    }
}

/// Depth-first, pre-order walk over elements.
#[derive(Debug, Clone)]
pub struct Descendants<'t> {
    tree: &'t XmlTree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.elements[id].children.iter().rev().copied());
        Some(Node {
            tree: self.tree,
            id,
        })
    }
}

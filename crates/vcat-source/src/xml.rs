//! Generic XML element tree built with `quick-xml`.
//!
//! Only structure and text are kept: attributes, comments, processing
//! instructions and the XML declaration are dropped. Schema checks live in
//! [`crate::records`].

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::SourceError;

/// One element of a decoded document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parse `raw` into its root element.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Decode`] when the input is not well-formed:
    /// syntax errors, mismatched or unclosed tags, text outside the root
    /// element, more than one root, or no root at all.
    pub fn parse(raw: &str) -> Result<Self, SourceError> {
        let mut reader = Reader::from_str(raw);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Self> = Vec::new();
        let mut root: Option<Self> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                SourceError::Decode(format!("at byte {}: {e}", reader.buffer_position()))
            })?;

            match event {
                Event::Start(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(SourceError::Decode(
                            "document has more than one root element".to_string(),
                        ));
                    }
                    stack.push(Self::named(element_name(start.name().as_ref())?));
                }
                Event::Empty(start) => {
                    let element = Self::named(element_name(start.name().as_ref())?);
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        SourceError::Decode("closing tag without matching opening tag".to_string())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| SourceError::Decode(e.to_string()))?;
                    push_text(&mut stack, &text)?;
                }
                Event::CData(cdata) => {
                    push_text(&mut stack, &String::from_utf8_lossy(&cdata))?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(SourceError::Decode(format!(
                "unexpected end of document: <{}> is not closed",
                open.name
            )));
        }

        root.ok_or_else(|| SourceError::Decode("document has no root element".to_string()))
    }

    fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content with surrounding whitespace removed.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// First child element called `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Every child element called `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

fn element_name(raw: &[u8]) -> Result<String, SourceError> {
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|e| SourceError::Decode(format!("element name is not UTF-8: {e}")))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), SourceError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(SourceError::Decode(
            "document has more than one root element".to_string(),
        ));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<(), SourceError> {
    if text.trim().is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None => Err(SourceError::Decode(
            "text content outside the root element".to_string(),
        )),
    }
}

//! Árbol XML mínimo para los cuerpos AXL
//!
//! AXL solo necesita elementos anidados con texto, algunos atributos (`uuid`)
//! y etiquetas vacías para `returnedTags`. La serialización y el parseo usan
//! `quick-xml`; los prefijos de namespace se descartan al parsear.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt;
use std::io::Cursor;

use super::client::AxlError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = XmlElement>,
    {
        self.children.extend(children);
        self
    }

    /// Appends `<name>text</name>`.
    pub fn text_child(self, name: &str, text: impl Into<String>) -> Self {
        self.child(XmlElement::with_text(name, text))
    }

    /// Appends `<name>text</name>` only when a value is present.
    pub fn opt_text_child(self, name: &str, text: Option<impl Into<String>>) -> Self {
        match text {
            Some(t) => self.text_child(name, t),
            None => self,
        }
    }

    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Walks down the tree by child names.
    pub fn path(&self, names: &[&str]) -> Option<&XmlElement> {
        names.iter().try_fold(self, |node, name| node.find(name))
    }

    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.find(name).and_then(|c| c.text.as_deref())
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Serializa el elemento (sin declaración XML).
    pub fn to_xml(&self) -> Result<String, AxlError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        self.write(&mut writer)?;
        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| AxlError::Xml(e.to_string()))
    }

    pub fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<(), AxlError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.text.is_none() && self.children.is_empty() {
            return writer
                .write_event(Event::Empty(start))
                .map_err(|e| AxlError::Xml(e.to_string()));
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| AxlError::Xml(e.to_string()))?;

        if let Some(text) = &self.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| AxlError::Xml(e.to_string()))?;
        }

        for child in &self.children {
            child.write(writer)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(|e| AxlError::Xml(e.to_string()))
    }

    /// Parsea un documento y devuelve el elemento raíz.
    pub fn parse(xml: &str) -> Result<XmlElement, AxlError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    stack.push(Self::from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = Self::from_start(e)?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| AxlError::Xml("unbalanced end tag".to_string()))?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(ref t)) => {
                    let text = t.unescape().map_err(|e| AxlError::Xml(e.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Ok(Event::CData(ref c)) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .get_or_insert_with(String::new)
                            .push_str(&String::from_utf8_lossy(c));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(AxlError::Xml(format!(
                        "error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
            }
        }

        if !stack.is_empty() {
            return Err(AxlError::Xml("unexpected end of document".to_string()));
        }

        root.ok_or_else(|| AxlError::Xml("document has no root element".to_string()))
    }

    fn from_start(e: &BytesStart<'_>) -> Result<XmlElement, AxlError> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
        let mut element = XmlElement::new(name);

        for attr in e.attributes() {
            let attr = attr.map_err(|err| AxlError::Xml(err.to_string()))?;
            let key = attr.key.as_ref();
            // Namespace declarations carry no data for us.
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let value = attr
                .unescape_value()
                .map_err(|err| AxlError::Xml(err.to_string()))?;
            element.attributes.push((
                String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string(),
                value.to_string(),
            ));
        }

        Ok(element)
    }

    fn attach(
        stack: &mut [XmlElement],
        root: &mut Option<XmlElement>,
        element: XmlElement,
    ) -> Result<(), AxlError> {
        match stack.last_mut() {
            Some(parent) => {
                parent.children.push(element);
                Ok(())
            }
            None if root.is_none() => {
                *root = Some(element);
                Ok(())
            }
            None => Err(AxlError::Xml("multiple root elements".to_string())),
        }
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_xml() {
            Ok(xml) => f.write_str(&xml),
            Err(_) => write!(f, "<{}/>", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_nested_and_empty() {
        let element = XmlElement::new("listRegion")
            .child(XmlElement::new("searchCriteria").text_child("name", "%"))
            .child(XmlElement::new("returnedTags").child(XmlElement::new("name")));

        assert_eq!(
            element.to_xml().unwrap(),
            "<listRegion><searchCriteria><name>%</name></searchCriteria>\
             <returnedTags><name/></returnedTags></listRegion>"
        );
    }

    #[test]
    fn test_write_escapes_text_and_attributes() {
        let element = XmlElement::with_text("description", "R&D <lab>").attr("uuid", "a\"b");
        let xml = element.to_xml().unwrap();

        assert!(xml.contains("R&amp;D &lt;lab&gt;"));
        assert!(xml.contains("uuid=\"a&quot;b\""));
    }

    #[test]
    fn test_parse_strips_prefixes_and_keeps_attributes() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
              <soapenv:Body>
                <ns:getSipTrunkResponse xmlns:ns="http://www.cisco.com/AXL/API/12.5">
                  <return>
                    <sipTrunk uuid="{1B1B9EB6-7803-11D3-BDF0-00108302EAD1}">
                      <name>Ottawa-GW</name>
                      <description>R&amp;D</description>
                    </sipTrunk>
                  </return>
                </ns:getSipTrunkResponse>
              </soapenv:Body>
            </soapenv:Envelope>"#;

        let root = XmlElement::parse(xml).unwrap();
        assert_eq!(root.name, "Envelope");

        let trunk = root
            .path(&["Body", "getSipTrunkResponse", "return", "sipTrunk"])
            .unwrap();
        assert_eq!(trunk.text_of("name"), Some("Ottawa-GW"));
        assert_eq!(trunk.text_of("description"), Some("R&D"));
        assert_eq!(
            trunk.attribute("uuid"),
            Some("{1B1B9EB6-7803-11D3-BDF0-00108302EAD1}")
        );
        assert!(root.attribute("soapenv").is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(XmlElement::parse("").is_err());
        assert!(XmlElement::parse("<a><b></a>").is_err());
    }

    #[test]
    fn test_find_all() {
        let element = XmlElement::new("members")
            .child(XmlElement::new("member").text_child("deviceName", "A"))
            .child(XmlElement::new("member").text_child("deviceName", "B"));

        let names: Vec<_> = element
            .find_all("member")
            .filter_map(|m| m.text_of("deviceName"))
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}

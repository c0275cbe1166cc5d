//! XML helpers shared by the package and body parsers

use quick_xml::events::BytesStart;
use quick_xml::Reader;

/// XML reader utilities for DOCX parts
pub struct XmlParser;

impl XmlParser {
    /// Create a reader over a part's content.
    ///
    /// Text is never trimmed: whitespace inside `w:t` is document content.
    pub fn from_string(content: &str) -> Reader<&[u8]> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);
        reader
    }

    /// Get an attribute value from an event
    pub fn get_attribute(event: &BytesStart, name: &[u8]) -> Option<String> {
        event
            .attributes()
            .filter_map(|a| a.ok())
            .find(|a| a.key.as_ref() == name)
            .map(|a| String::from_utf8_lossy(&a.value).to_string())
    }

    /// Check if an element name matches with optional namespace prefix
    pub fn matches_element(name: &[u8], expected: &str) -> bool {
        let name_str = std::str::from_utf8(name).unwrap_or("");
        name_str == expected || name_str.ends_with(&format!(":{}", expected))
    }

    /// Check for `<prefix>:<local>` or an unprefixed `<local>`.
    ///
    /// Stricter than [`XmlParser::matches_element`] so that `m:r`/`m:t`
    /// (OMML math runs) are not mistaken for text runs.
    pub fn is_qualified(name: &[u8], prefix: &str, local: &str) -> bool {
        match name
            .strip_prefix(prefix.as_bytes())
            .and_then(|rest| rest.strip_prefix(b":"))
        {
            Some(rest) => rest == local.as_bytes(),
            None => name == local.as_bytes(),
        }
    }

    /// The prefix an element declares for `namespace`: `Some("")` for a
    /// default namespace declaration, `None` if it declares neither
    pub fn declared_prefix(event: &BytesStart, namespace: &str) -> Option<String> {
        event
            .attributes()
            .filter_map(|a| a.ok())
            .filter(|a| a.value.as_ref() == namespace.as_bytes())
            .find_map(|a| {
                let key = std::str::from_utf8(a.key.as_ref()).ok()?;
                match key.strip_prefix("xmlns") {
                    Some("") => Some(String::new()),
                    Some(rest) => rest.strip_prefix(':').map(str::to_string),
                    None => None,
                }
            })
    }

    /// The namespace prefix of a qualified name, if any
    pub fn prefix(name: &[u8]) -> Option<&str> {
        let name_str = std::str::from_utf8(name).ok()?;
        name_str.split_once(':').map(|(prefix, _)| prefix)
    }
}

/// Whether a character may appear in an XML 1.0 document
pub fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_element() {
        assert!(XmlParser::matches_element(b"Relationship", "Relationship"));
        assert!(XmlParser::matches_element(b"pr:Relationship", "Relationship"));
        assert!(!XmlParser::matches_element(b"w:r", "p"));
    }

    #[test]
    fn test_is_qualified() {
        assert!(XmlParser::is_qualified(b"w:p", "w", "p"));
        assert!(XmlParser::is_qualified(b"p", "w", "p"));
        assert!(XmlParser::is_qualified(b"ns0:p", "ns0", "p"));
        assert!(!XmlParser::is_qualified(b"m:r", "w", "r"));
        assert!(!XmlParser::is_qualified(b"w:rPr", "w", "r"));
        assert!(!XmlParser::is_qualified(b"w:p", "ns0", "p"));
        assert!(!XmlParser::is_qualified(b"wx:p", "w", "p"));
    }

    #[test]
    fn test_declared_prefix() {
        const NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
        let read_root = |xml: &str| match XmlParser::from_string(xml).read_event().unwrap() {
            quick_xml::events::Event::Start(e) => XmlParser::declared_prefix(&e, NS),
            other => panic!("unexpected event {:?}", other),
        };

        assert_eq!(
            read_root(&format!(r#"<ns0:document xmlns:ns0="{}" xmlns:r="x">"#, NS)),
            Some("ns0".to_string())
        );
        assert_eq!(read_root(&format!(r#"<document xmlns="{}">"#, NS)), Some(String::new()));
        assert_eq!(read_root(r#"<w:document xmlns:w="urn:other">"#), None);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(XmlParser::prefix(b"w:r"), Some("w"));
        assert_eq!(XmlParser::prefix(b"r"), None);
    }

    #[test]
    fn test_is_xml_char() {
        assert!(is_xml_char('a'));
        assert!(is_xml_char('ã'));
        assert!(is_xml_char('\t'));
        assert!(!is_xml_char('\u{0}'));
        assert!(!is_xml_char('\u{1B}'));
        assert!(!is_xml_char('\u{FFFE}'));
    }
}

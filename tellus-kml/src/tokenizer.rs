//! Forward-only lexer turning a text source into markup tokens.
//!
//! A thin adapter over [`quick_xml::Reader`]: XML events are mapped onto the
//! small [`Token`] vocabulary the geometry parser works with. Tokens are
//! pulled one at a time and the source is never seeked backwards, so
//! arbitrarily large documents stream in constant memory.

use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::TellusKmlError;

/// One lexical unit of a KML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Start of an element. Attributes, if any, are dropped.
    OpenTag(String),
    /// End of an element.
    CloseTag(String),
    /// Trimmed character data between tags, entities resolved.
    Text(String),
}

/// Pull-based token cursor over a text source.
///
/// End of input is reported as `Ok(None)`. Declarations, processing
/// instructions and comments are skipped, whitespace-only character data is
/// not reported. A self-closing element produces an `OpenTag` immediately
/// followed by its `CloseTag`. CDATA sections are reported as ordinary text.
pub struct Tokenizer<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    queued: Option<Token>,
}

impl<R: BufRead> Tokenizer<R> {
    /// Wraps the given source.
    pub fn new(reader: R) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            queued: None,
        }
    }

    /// Returns the next token, or `None` once the source is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>, TellusKmlError> {
        if let Some(token) = self.queued.take() {
            return Ok(Some(token));
        }

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(start) => {
                    return Ok(Some(Token::OpenTag(into_utf8(start.name().as_ref())?)));
                }
                Event::Empty(start) => {
                    let name = into_utf8(start.name().as_ref())?;
                    self.queued = Some(Token::CloseTag(name.clone()));
                    return Ok(Some(Token::OpenTag(name)));
                }
                Event::End(end) => {
                    return Ok(Some(Token::CloseTag(into_utf8(end.name().as_ref())?)));
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        return Ok(Some(Token::Text(trimmed.to_string())));
                    }
                }
                Event::CData(data) => {
                    let text = into_utf8(data.as_ref())?;
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        return Ok(Some(Token::Text(trimmed.to_string())));
                    }
                }
                Event::Eof => return Ok(None),
                // Declarations, comments, processing instructions, doctypes.
                _ => {}
            }
        }
    }
}

fn into_utf8(raw: &[u8]) -> Result<String, TellusKmlError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| TellusKmlError::Malformed(format!("invalid UTF-8 in source: {e}")))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use assert_matches::assert_matches;

    use super::*;

    fn collect(input: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(Cursor::new(input.as_bytes()));
        let mut tokens = vec![];
        while let Some(token) = tokenizer.next_token().expect("tokenization must succeed") {
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn tokenizes_simple_element() {
        let tokens = collect("<Point>\n  <coordinates>1,2</coordinates>\n</Point>");
        assert_eq!(
            tokens,
            vec![
                Token::OpenTag("Point".into()),
                Token::OpenTag("coordinates".into()),
                Token::Text("1,2".into()),
                Token::CloseTag("coordinates".into()),
                Token::CloseTag("Point".into()),
            ]
        );
    }

    #[test]
    fn drops_attributes_from_tag_names() {
        let tokens = collect(r#"<kml xmlns="http://www.opengis.net/kml/2.2"></kml>"#);
        assert_eq!(
            tokens,
            vec![Token::OpenTag("kml".into()), Token::CloseTag("kml".into())]
        );
    }

    #[test]
    fn self_closing_tag_produces_open_and_close() {
        let tokens = collect("<Placemark/>");
        assert_eq!(
            tokens,
            vec![
                Token::OpenTag("Placemark".into()),
                Token::CloseTag("Placemark".into()),
            ]
        );
    }

    #[test]
    fn skips_declaration_and_comments() {
        let tokens = collect("<?xml version=\"1.0\"?><!-- a > b --><Point></Point>");
        assert_eq!(
            tokens,
            vec![
                Token::OpenTag("Point".into()),
                Token::CloseTag("Point".into()),
            ]
        );
    }

    #[test]
    fn whitespace_between_tags_is_not_reported() {
        let tokens = collect("<a>\n\t \n</a>");
        assert_eq!(
            tokens,
            vec![Token::OpenTag("a".into()), Token::CloseTag("a".into())]
        );
    }

    #[test]
    fn cdata_is_reported_as_text() {
        let tokens = collect("<description><![CDATA[a > b <LineString>]]></description>");
        assert_eq!(
            tokens,
            vec![
                Token::OpenTag("description".into()),
                Token::Text("a > b <LineString>".into()),
                Token::CloseTag("description".into()),
            ]
        );
    }

    #[test]
    fn entities_are_resolved_in_text() {
        let tokens = collect("<name>a &amp; b &gt; c</name>");
        assert_eq!(
            tokens,
            vec![
                Token::OpenTag("name".into()),
                Token::Text("a & b > c".into()),
                Token::CloseTag("name".into()),
            ]
        );
    }

    #[test]
    fn empty_input_is_end_of_input() {
        let mut tokenizer = Tokenizer::new(Cursor::new(b"" as &[u8]));
        assert_eq!(tokenizer.next_token().expect("must not fail"), None);
    }

    #[test]
    fn mismatched_close_tag_is_malformed() {
        let mut tokenizer = Tokenizer::new(Cursor::new(b"<a></b>" as &[u8]));
        assert_eq!(
            tokenizer.next_token().expect("open tag must lex"),
            Some(Token::OpenTag("a".into()))
        );
        assert_matches!(tokenizer.next_token(), Err(TellusKmlError::Malformed(_)));
    }
}

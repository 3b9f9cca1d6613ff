// Copyright 2023 Bryant Luk
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Reads a document from a `BufRead` input source and pushes events to a [`Handler`].

use std::{
    borrow::Cow,
    io::{BufRead, ErrorKind},
};

use maybe_xml::{
    token::{prop::Attributes, Ty},
    Reader,
};

use crate::{
    event::{Attribute, Handler},
    Error, ReadError, SyntaxError, SyntaxErrorKind,
};

/// Reads and buffers bytes from a `BufRead` input source and pushes events
/// for complete tokens to a [`Handler`].
///
/// Tokens are identified with a [`maybe_xml::Reader`]. The evaluator also
/// verifies that the document is well-formed: elements must nest and close
/// properly, there must be exactly one root element, and only whitespace may
/// appear outside of it. Entity and character references in text and
/// attribute values are decoded.
///
/// # Example
///
/// ```
/// use maybe_xml_rules::{event::{Attribute, Handler}, reader::EventReader, Error};
///
/// #[derive(Default)]
/// struct Names(Vec<String>);
///
/// impl Handler for Names {
///     type Error = Error;
///
///     fn start_element(&mut self, name: &str, _: &[Attribute<'_>]) -> Result<(), Error> {
///         self.0.push(name.to_string());
///         Ok(())
///     }
///
///     fn characters(&mut self, _: &str) -> Result<(), Error> {
///         Ok(())
///     }
///
///     fn end_element(&mut self, _: &str) -> Result<(), Error> {
///         Ok(())
///     }
/// }
///
/// let input = std::io::BufReader::new(r#"<a><b/><c>text</c></a>"#.as_bytes());
/// let mut names = Names::default();
/// EventReader::from_reader(input).read_to_end(&mut names)?;
/// assert_eq!(names.0, ["a", "b", "c"]);
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug)]
pub struct EventReader<B>
where
    B: BufRead,
{
    reader: B,
    buffer: Vec<u8>,
    is_eof: bool,
    document: Document,
}

/// Well-formedness state of the document read so far.
#[derive(Debug, Default)]
struct Document {
    open: Vec<String>,
    seen_root: bool,
    position: u64,
}

impl<B> EventReader<B>
where
    B: BufRead,
{
    /// Returns an `EventReader` from a `BufRead` instance.
    pub fn from_reader(reader: B) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            is_eof: false,
            document: Document::default(),
        }
    }

    /// Returns the number of bytes which have been evaluated.
    ///
    /// The position is mostly useful for debugging.
    pub fn position(&self) -> u64 {
        self.document.position
    }

    /// Returns the underlying `BufRead`.
    pub fn into_inner(self) -> B {
        self.reader
    }

    /// Reads the entire input and pushes every event to the handler.
    ///
    /// # Errors
    ///
    /// If the input source fails or the document is malformed, an
    /// [`Error::Read`] is converted into the handler's error type. Errors
    /// from the handler are returned unmodified. In either case, no further
    /// input is read.
    pub fn read_to_end<H>(&mut self, handler: &mut H) -> Result<(), H::Error>
    where
        H: Handler,
        H::Error: From<Error>,
    {
        loop {
            if !self.is_eof {
                // A token which is still incomplete is retried once the buffer has doubled.
                let target = self.buffer.len().saturating_mul(2);
                self.fill::<H::Error>(target)?;
            }

            let consumed = self
                .document
                .dispatch(&self.buffer, self.is_eof, handler)?;
            self.buffer.drain(..consumed);

            if self.is_eof {
                return self.document.finish(&self.buffer).map_err(read_error);
            }
        }
    }

    /// Reads until the buffer holds more than `target` bytes or the input is exhausted.
    fn fill<E>(&mut self, target: usize) -> Result<(), E>
    where
        E: From<Error>,
    {
        loop {
            match self.reader.fill_buf() {
                Ok(available) => {
                    let len = available.len();
                    if len == 0 {
                        self.is_eof = true;
                        return Ok(());
                    }
                    self.buffer.extend_from_slice(available);
                    self.reader.consume(len);
                    if self.buffer.len() > target {
                        return Ok(());
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(read_error(ReadError::Io(e))),
            }
        }
    }
}

fn read_error<E, R>(err: R) -> E
where
    E: From<Error>,
    R: Into<ReadError>,
{
    let err = err.into();
    tracing::debug!(error = %err, "failed to read document");
    E::from(Error::Read(err))
}

impl Document {
    /// Pushes events for all of the complete tokens in the buffer.
    ///
    /// Returns the number of bytes evaluated.
    fn dispatch<H>(&mut self, buffer: &[u8], is_eof: bool, handler: &mut H) -> Result<usize, H::Error>
    where
        H: Handler,
        H::Error: From<Error>,
    {
        let input = match core::str::from_utf8(buffer) {
            Ok(input) => input,
            Err(e) if e.error_len().is_none() && !is_eof => {
                let (valid, _) = buffer.split_at(e.valid_up_to());
                core::str::from_utf8(valid)
                    .map_err(|_| self.invalid_utf8::<H::Error>(e.valid_up_to()))?
            }
            Err(e) => return Err(self.invalid_utf8(e.valid_up_to())),
        };

        let reader = Reader::from_str(input);
        let mut pos = 0;
        loop {
            let mut end = pos;
            let Some(token) = reader.tokenize(&mut end) else {
                break;
            };

            let ty = token.ty();
            if let Ty::Characters(chars) = &ty {
                // Text at the end of the buffer may continue in the next read.
                if end == input.len() && !is_eof {
                    let content = chars.content().as_str();
                    let len = complete_text_len(content);
                    if len > 0 {
                        self.characters(&content[..len], handler)?;
                        self.position += len as u64;
                        pos += len;
                    }
                    break;
                }
            }

            self.handle(ty, handler)?;
            self.position += (end - pos) as u64;
            pos = end;
        }

        Ok(pos)
    }

    fn handle<H>(&mut self, ty: Ty<'_>, handler: &mut H) -> Result<(), H::Error>
    where
        H: Handler,
        H::Error: From<Error>,
    {
        match ty {
            Ty::StartTag(tag) => {
                let name = tag.name().as_str();
                let attributes = self.open_element::<H::Error>(name, tag.attributes())?;
                handler.start_element(name, &attributes)
            }
            Ty::EmptyElementTag(tag) => {
                let name = tag.name().as_str();
                let attributes = self.open_element::<H::Error>(name, tag.attributes())?;
                handler.start_element(name, &attributes)?;
                self.open.pop();
                handler.end_element(name)
            }
            Ty::EndTag(tag) => {
                let name = tag.name().as_str();
                match self.open.last() {
                    Some(open) if open == name => {}
                    Some(open) => {
                        let kind = SyntaxErrorKind::MismatchedEndTag {
                            expected: open.clone(),
                            found: name.to_string(),
                        };
                        return Err(self.syntax_error(kind));
                    }
                    None => {
                        let kind = SyntaxErrorKind::UnexpectedEndTag(name.to_string());
                        return Err(self.syntax_error(kind));
                    }
                }
                self.open.pop();
                handler.end_element(name)
            }
            Ty::Characters(chars) => self.characters(chars.content().as_str(), handler),
            Ty::Cdata(cdata) => {
                if self.open.is_empty() {
                    return Err(self.syntax_error(SyntaxErrorKind::TextOutsideRoot));
                }
                handler.characters(cdata.content().as_str())
            }
            Ty::ProcessingInstruction(_) | Ty::Declaration(_) | Ty::Comment(_) => {
                tracing::trace!(position = self.position, "skipped markup");
                Ok(())
            }
        }
    }

    fn characters<H>(&self, content: &str, handler: &mut H) -> Result<(), H::Error>
    where
        H: Handler,
        H::Error: From<Error>,
    {
        if self.open.is_empty() {
            if content.chars().all(is_space) {
                return Ok(());
            }
            return Err(self.syntax_error(SyntaxErrorKind::TextOutsideRoot));
        }
        let text = unescape(content).map_err(|kind| self.syntax_error::<H::Error>(kind))?;
        handler.characters(&text)
    }

    fn open_element<'a, E>(
        &mut self,
        name: &str,
        attributes: Option<Attributes<'a>>,
    ) -> Result<Vec<Attribute<'a>>, E>
    where
        E: From<Error>,
    {
        if !is_name(name) {
            return Err(self.syntax_error(SyntaxErrorKind::InvalidName(name.to_string())));
        }
        if self.open.is_empty() && self.seen_root {
            return Err(self.syntax_error(SyntaxErrorKind::MultipleRootElements));
        }

        let mut decoded: Vec<Attribute<'a>> = Vec::new();
        for attr in attributes.into_iter().flatten() {
            let attr_name = attr.name().as_str();
            if !is_name(attr_name) {
                let kind = SyntaxErrorKind::InvalidName(attr_name.to_string());
                return Err(self.syntax_error(kind));
            }
            let Some(value) = attr.value() else {
                let kind = SyntaxErrorKind::AttributeWithoutValue(attr_name.to_string());
                return Err(self.syntax_error(kind));
            };
            if decoded.iter().any(|a| a.name() == attr_name) {
                let kind = SyntaxErrorKind::DuplicateAttribute(attr_name.to_string());
                return Err(self.syntax_error(kind));
            }
            let value =
                attribute_value(value.as_str()).map_err(|kind| self.syntax_error::<E>(kind))?;
            decoded.push(Attribute::new(attr_name, value));
        }

        self.open.push(name.to_string());
        self.seen_root = true;
        Ok(decoded)
    }

    /// Verifies the document is complete once the input is exhausted.
    fn finish(&self, remaining: &[u8]) -> Result<(), SyntaxError> {
        let kind = if !remaining.is_empty() {
            SyntaxErrorKind::UnexpectedEof
        } else if let Some(name) = self.open.last() {
            SyntaxErrorKind::UnclosedElement(name.clone())
        } else if !self.seen_root {
            SyntaxErrorKind::NoRootElement
        } else {
            return Ok(());
        };
        Err(SyntaxError::new(kind, self.position))
    }

    fn syntax_error<E>(&self, kind: SyntaxErrorKind) -> E
    where
        E: From<Error>,
    {
        read_error(SyntaxError::new(kind, self.position))
    }

    fn invalid_utf8<E>(&self, valid_up_to: usize) -> E
    where
        E: From<Error>,
    {
        read_error(SyntaxError::new(
            SyntaxErrorKind::InvalidUtf8,
            self.position + valid_up_to as u64,
        ))
    }
}

#[inline]
fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

fn is_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_' || first == ':') {
        return false;
    }
    chars.all(|ch| !is_space(ch) && !matches!(ch, '<' | '>' | '&' | '"' | '\'' | '=' | '/'))
}

/// The longest reference which is held back until more input arrives.
const MAX_REFERENCE_LEN: usize = 32;

/// Returns the length of the leading text which does not end inside a reference.
///
/// A trailing `&` followed only by characters which may still form a
/// reference is held back. Anything else is returned as complete so that it
/// is either delivered or rejected without waiting for more input.
fn complete_text_len(text: &str) -> usize {
    match text.rfind('&') {
        Some(begin) => {
            let rest = &text[begin + 1..];
            let is_partial = rest.len() < MAX_REFERENCE_LEN
                && rest
                    .chars()
                    .all(|ch| ch.is_alphanumeric() || matches!(ch, '#' | '_' | '-' | '.' | ':'));
            if is_partial {
                begin
            } else {
                text.len()
            }
        }
        None => text.len(),
    }
}

/// Normalizes whitespace in an attribute value and decodes references.
///
/// Literal tabs and line breaks become spaces, with `\r\n` counted as one
/// line break. Whitespace from character references is kept.
fn attribute_value(raw: &str) -> Result<Cow<'_, str>, SyntaxErrorKind> {
    if !raw.contains(['\t', '\r', '\n']) {
        return unescape(raw);
    }

    let mut normalized = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                chars.next_if_eq(&'\n');
                normalized.push(' ');
            }
            '\t' | '\n' => normalized.push(' '),
            ch => normalized.push(ch),
        }
    }

    let decoded = unescape(&normalized)?.into_owned();
    Ok(Cow::Owned(decoded))
}

/// Decodes the predefined entities and character references.
fn unescape(raw: &str) -> Result<Cow<'_, str>, SyntaxErrorKind> {
    if !raw.contains('&') {
        return Ok(Cow::Borrowed(raw));
    }

    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(begin) = rest.find('&') {
        decoded.push_str(&rest[..begin]);
        rest = &rest[begin..];

        let Some(end) = rest.find(';') else {
            return Err(SyntaxErrorKind::InvalidReference(truncate(rest)));
        };
        let reference = &rest[1..end];
        let ch = match reference {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "apos" => '\'',
            "quot" => '"',
            _ => char_ref(reference)
                .ok_or_else(|| SyntaxErrorKind::InvalidReference(rest[..=end].to_string()))?,
        };
        decoded.push(ch);
        rest = &rest[end + 1..];
    }
    decoded.push_str(rest);

    Ok(Cow::Owned(decoded))
}

fn char_ref(reference: &str) -> Option<char> {
    let digits = reference.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix('x') {
        if hex.is_empty() || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok()?
    } else {
        if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()?
    };
    char::from_u32(code).filter(|ch| *ch != '\0')
}

fn truncate(reference: &str) -> String {
    reference.chars().take(16).collect()
}

#[cfg(test)]
mod tests {
    use std::io::BufReader;

    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Start(String, Vec<(String, String)>),
        Text(String),
        End(String),
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl Handler for Recorder {
        type Error = Error;

        fn start_element(&mut self, name: &str, attributes: &[Attribute<'_>]) -> Result<(), Error> {
            let attributes = attributes
                .iter()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect();
            self.events.push(Event::Start(name.to_string(), attributes));
            Ok(())
        }

        fn characters(&mut self, text: &str) -> Result<(), Error> {
            // Adjacent fragments are merged to compare independent of buffer size.
            if let Some(Event::Text(prev)) = self.events.last_mut() {
                prev.push_str(text);
            } else {
                self.events.push(Event::Text(text.to_string()));
            }
            Ok(())
        }

        fn end_element(&mut self, name: &str) -> Result<(), Error> {
            self.events.push(Event::End(name.to_string()));
            Ok(())
        }
    }

    fn read_with_capacity(input: &str, capacity: usize) -> Result<Vec<Event>, Error> {
        let mut recorder = Recorder::default();
        let mut reader =
            EventReader::from_reader(BufReader::with_capacity(capacity, input.as_bytes()));
        reader.read_to_end(&mut recorder)?;
        assert_eq!(reader.position(), input.len() as u64);
        Ok(recorder.events)
    }

    fn read(input: &str) -> Result<Vec<Event>, Error> {
        read_with_capacity(input, 8 * 1024)
    }

    fn syntax_kind(input: &str) -> SyntaxErrorKind {
        match read(input) {
            Err(Error::Read(ReadError::Syntax(e))) => e.kind().clone(),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    fn start(name: &str, attributes: &[(&str, &str)]) -> Event {
        Event::Start(
            name.to_string(),
            attributes
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn text(text: &str) -> Event {
        Event::Text(text.to_string())
    }

    fn end(name: &str) -> Event {
        Event::End(name.to_string())
    }

    const BOOK: &str = r#"<?xml version="1.0"?>
<!-- catalog -->
<catalog>
  <book id="bk101" lang='en'>
    <title>XML &amp; You</title>
    <note><![CDATA[<raw>]]></note>
    <empty/>
  </book>
</catalog>
"#;

    fn book_events() -> Vec<Event> {
        vec![
            start("catalog", &[]),
            text("\n  "),
            start("book", &[("id", "bk101"), ("lang", "en")]),
            text("\n    "),
            start("title", &[]),
            text("XML & You"),
            end("title"),
            text("\n    "),
            start("note", &[]),
            text("<raw>"),
            end("note"),
            text("\n    "),
            start("empty", &[]),
            end("empty"),
            text("\n  "),
            end("book"),
            text("\n"),
            end("catalog"),
        ]
    }

    #[test]
    fn events_in_document_order() {
        assert_eq!(read(BOOK).unwrap(), book_events());
    }

    #[test]
    fn events_independent_of_buffer_size() {
        for capacity in [1, 2, 3, 5, 7, 16] {
            assert_eq!(read_with_capacity(BOOK, capacity).unwrap(), book_events());
        }
    }

    #[test]
    fn multibyte_characters_split_across_reads() {
        let input = "<a k=\"é\">€uro 😀</a>";
        let expected = vec![start("a", &[("k", "é")]), text("€uro 😀"), end("a")];
        for capacity in [1, 2, 3] {
            assert_eq!(read_with_capacity(input, capacity).unwrap(), expected);
        }
    }

    #[test]
    fn references_split_across_reads() {
        let input = "<a>x &lt;&#65;&#x42;&gt; y</a>";
        assert_eq!(
            read_with_capacity(input, 1).unwrap(),
            vec![start("a", &[]), text("x <AB> y"), end("a")]
        );
    }

    #[test]
    fn attribute_references_are_decoded() {
        let input = r#"<a title="&quot;A&quot; &apos;B&apos;"/>"#;
        assert_eq!(
            read(input).unwrap(),
            vec![start("a", &[("title", "\"A\" 'B'")]), end("a")]
        );
    }

    #[test]
    fn doctype_and_trailing_whitespace_are_skipped() {
        let input = "<!DOCTYPE a>\n<a/>\n\n<!-- end -->\n";
        assert_eq!(read(input).unwrap(), vec![start("a", &[]), end("a")]);
    }

    #[test]
    fn text_outside_root() {
        assert_eq!(syntax_kind("12345"), SyntaxErrorKind::TextOutsideRoot);
        assert_eq!(syntax_kind("<a/>tail"), SyntaxErrorKind::TextOutsideRoot);
    }

    #[test]
    fn no_root_element() {
        assert_eq!(syntax_kind(""), SyntaxErrorKind::NoRootElement);
        assert_eq!(syntax_kind("  \n"), SyntaxErrorKind::NoRootElement);
        assert_eq!(syntax_kind("<?xml version=\"1.0\"?>"), SyntaxErrorKind::NoRootElement);
    }

    #[test]
    fn incomplete_token() {
        assert_eq!(syntax_kind("<a></a"), SyntaxErrorKind::UnexpectedEof);
        assert_eq!(syntax_kind("<a b=\"1>"), SyntaxErrorKind::UnexpectedEof);
    }

    #[test]
    fn unclosed_element() {
        assert_eq!(
            syntax_kind("<a><b></b>"),
            SyntaxErrorKind::UnclosedElement("a".to_string())
        );
    }

    #[test]
    fn mismatched_end_tag() {
        assert_eq!(
            syntax_kind("<a><b></a></b>"),
            SyntaxErrorKind::MismatchedEndTag {
                expected: "b".to_string(),
                found: "a".to_string(),
            }
        );
        assert_eq!(
            syntax_kind("</a>"),
            SyntaxErrorKind::UnexpectedEndTag("a".to_string())
        );
    }

    #[test]
    fn multiple_root_elements() {
        assert_eq!(syntax_kind("<a/><b/>"), SyntaxErrorKind::MultipleRootElements);
    }

    #[test]
    fn invalid_names() {
        assert_eq!(
            syntax_kind("<1a></1a>"),
            SyntaxErrorKind::InvalidName("1a".to_string())
        );
    }

    #[test]
    fn duplicate_attribute() {
        assert_eq!(
            syntax_kind(r#"<a id="1" id="2"/>"#),
            SyntaxErrorKind::DuplicateAttribute("id".to_string())
        );
    }

    #[test]
    fn attribute_without_value() {
        assert_eq!(
            syntax_kind("<a checked></a>"),
            SyntaxErrorKind::AttributeWithoutValue("checked".to_string())
        );
    }

    #[test]
    fn invalid_references() {
        assert_eq!(
            syntax_kind("<a>&nbsp;</a>"),
            SyntaxErrorKind::InvalidReference("&nbsp;".to_string())
        );
        assert_eq!(
            syntax_kind("<a>a & b</a>"),
            SyntaxErrorKind::InvalidReference("& b".to_string())
        );
        assert_eq!(
            syntax_kind("<a>&#xZZ;</a>"),
            SyntaxErrorKind::InvalidReference("&#xZZ;".to_string())
        );
    }

    #[test]
    fn invalid_utf8() {
        let mut recorder = Recorder::default();
        let input: &[u8] = b"<a>\xff</a>";
        let err = EventReader::from_reader(input)
            .read_to_end(&mut recorder)
            .unwrap_err();
        match err {
            Error::Read(ReadError::Syntax(e)) => {
                assert_eq!(e.kind(), &SyntaxErrorKind::InvalidUtf8);
                assert_eq!(e.position(), 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn handler_error_stops_reading() {
        struct Stop(usize);

        impl Handler for Stop {
            type Error = Error;

            fn start_element(&mut self, name: &str, _: &[Attribute<'_>]) -> Result<(), Error> {
                self.0 += 1;
                if name == "stop" {
                    return Err(Error::DuplicateValue(name.to_string()));
                }
                Ok(())
            }

            fn characters(&mut self, _: &str) -> Result<(), Error> {
                Ok(())
            }

            fn end_element(&mut self, _: &str) -> Result<(), Error> {
                Ok(())
            }
        }

        let mut handler = Stop(0);
        let input: &[u8] = b"<a><b/><stop/><c/></a>";
        let err = EventReader::from_reader(input)
            .read_to_end(&mut handler)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateValue(name) if name == "stop"));
        assert_eq!(handler.0, 3);
    }

    #[derive(Default)]
    struct Fragments {
        text: String,
        count: usize,
        longest: usize,
    }

    impl Handler for Fragments {
        type Error = Error;

        fn start_element(&mut self, _: &str, _: &[Attribute<'_>]) -> Result<(), Error> {
            Ok(())
        }

        fn characters(&mut self, text: &str) -> Result<(), Error> {
            self.text.push_str(text);
            self.count += 1;
            self.longest = self.longest.max(text.len());
            Ok(())
        }

        fn end_element(&mut self, _: &str) -> Result<(), Error> {
            Ok(())
        }
    }

    fn read_fragments(input: &str, capacity: usize) -> Fragments {
        let mut fragments = Fragments::default();
        let mut reader =
            EventReader::from_reader(BufReader::with_capacity(capacity, input.as_bytes()));
        reader.read_to_end(&mut fragments).unwrap();
        assert_eq!(reader.position(), input.len() as u64);
        fragments
    }

    #[test]
    fn long_text_is_delivered_as_it_arrives() {
        let content = "x".repeat(4 * 1024 * 1024);
        let input = format!("<a>{content}</a>");

        let fragments = read_fragments(&input, 64);
        assert_eq!(fragments.text, content);
        assert!(fragments.count >= content.len() / 64);
        assert!(fragments.longest <= 64, "{}", fragments.longest);
    }

    #[test]
    fn long_text_with_references_holds_back_only_the_reference() {
        let content = "ab&amp;&#x43;".repeat(64 * 1024);
        let input = format!("<a>{content}</a>");

        let fragments = read_fragments(&input, 64);
        assert_eq!(fragments.text, "ab&C".repeat(64 * 1024));
        assert!(fragments.longest <= 128, "{}", fragments.longest);
    }

    #[test]
    fn long_attribute_value() {
        let value = "v".repeat(1024 * 1024);
        let input = format!(r#"<a k="{value}">t</a>"#);

        let events = read_with_capacity(&input, 64).unwrap();
        assert_eq!(
            events,
            vec![start("a", &[("k", value.as_str())]), text("t"), end("a")]
        );
    }

    #[test]
    fn attribute_whitespace_is_normalized() {
        let input = "<a k=\"1\t2\r\n3\n4\r5\" r=\"&#9;&#10;\"/>";
        assert_eq!(
            read(input).unwrap(),
            vec![start("a", &[("k", "1 2 3 4 5"), ("r", "\t\n")]), end("a")]
        );
    }

    #[test]
    fn partial_references() {
        assert_eq!(complete_text_len("plain"), 5);
        assert_eq!(complete_text_len("a &am"), 2);
        assert_eq!(complete_text_len("a &#x4"), 2);
        assert_eq!(complete_text_len("&"), 0);
        assert_eq!(complete_text_len("a &amp; b"), 9);
        assert_eq!(complete_text_len("a & b"), 5);
        assert_eq!(complete_text_len(&format!("&{}", "a".repeat(64))), 65);
    }

    #[test]
    fn unescape_borrowed_without_references() {
        assert!(matches!(unescape("plain"), Ok(Cow::Borrowed("plain"))));
        assert_eq!(unescape("a&amp;b").unwrap(), "a&b");
    }

    #[test]
    fn names() {
        assert!(is_name("book"));
        assert!(is_name("ns:book"));
        assert!(is_name("_x-1.2"));
        assert!(is_name("café"));
        assert!(!is_name(""));
        assert!(!is_name("-x"));
        assert!(!is_name("a=b"));
    }
}

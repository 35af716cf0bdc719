//! Hand-rolled recursive-descent HOCON parser over a byte slice.

use crate::error::Error;
use crate::options::ConfigOptions;
use crate::parser::frame::{Separator, Value as FrameValue};
use crate::raw::field::ObjectField;
use crate::raw::include::{Inclusion, Location};
use crate::raw::raw_array::RawArray;
use crate::raw::raw_object::RawObject;
use crate::raw::raw_string::RawString;
use crate::raw::raw_value::RawValue;
use crate::raw::substitution::Substitution;
use crate::reader::{ReadError, Reader};
use crate::{Result, lex};

pub(crate) struct Parser<'a> {
    reader: Reader<'a>,
    options: &'a ConfigOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a [u8], options: &'a ConfigOptions) -> Self {
        Parser {
            reader: Reader::new(input),
            options,
            depth: 0,
        }
    }

    fn err(&self, e: ReadError) -> Error {
        e.into_error(self.reader.offset())
    }

    fn unexpected(&self, expected: &'static str) -> Error {
        let found = self.reader.peek_rune().ok().map(|(c, _)| c);
        Error::UnexpectedToken {
            offset: self.reader.offset(),
            expected,
            found,
        }
    }

    fn enter_nested(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(Error::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }

    fn exit_nested(&mut self) {
        self.depth -= 1;
    }

    pub(crate) fn parse(&mut self) -> Result<RawObject> {
        self.drop_whitespace_and_comments()?;
        let obj = match self.reader.peek() {
            Ok(b'{') => self.parse_object()?,
            Ok(_) => self.parse_root_object()?,
            Err(ReadError::Eof) => return Ok(RawObject::default()),
            Err(e) => return Err(self.err(e)),
        };
        self.drop_whitespace_and_comments()?;
        if self.reader.is_eof() {
            Ok(obj)
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    // -- whitespace / comments --------------------------------------------

    fn drop_whitespace(&mut self) -> Result<()> {
        while let Ok((c, size)) = self.reader.peek_rune() {
            if !lex::is_whitespace(c) {
                break;
            }
            self.reader.advance(size);
        }
        Ok(())
    }

    fn drop_horizontal_whitespace(&mut self) -> Result<()> {
        while let Ok((c, size)) = self.reader.peek_rune() {
            if !lex::is_horizontal_whitespace(c) {
                break;
            }
            self.reader.advance(size);
        }
        Ok(())
    }

    /// Captures horizontal whitespace verbatim; returns `None` for an empty run.
    fn capture_horizontal_whitespace(&mut self) -> Option<String> {
        let mut s = String::new();
        while let Ok((c, size)) = self.reader.peek_rune() {
            if !lex::is_horizontal_whitespace(c) {
                break;
            }
            s.push(c);
            self.reader.advance(size);
        }
        if s.is_empty() { None } else { Some(s) }
    }

    fn drop_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            self.drop_whitespace()?;
            if !self.drop_comment()? {
                return Ok(());
            }
        }
    }

    fn drop_comment(&mut self) -> Result<bool> {
        match self.reader.peek() {
            Ok(b'#') => {
                self.reader.advance(1);
                self.drop_until_newline();
                Ok(true)
            }
            Ok(b'/') if self.reader.starts_with(b"//") => {
                self.reader.advance(2);
                self.drop_until_newline();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn drop_until_newline(&mut self) {
        loop {
            match self.reader.consume() {
                Ok(b'\n') => return,
                Ok(b'\r') => {
                    if self.reader.peek() == Ok(b'\n') {
                        self.reader.advance(1);
                    }
                    return;
                }
                Ok(_) => continue,
                Err(_) => return,
            }
        }
    }

    // -- objects -------------------------------------------------------

    fn parse_object(&mut self) -> Result<RawObject> {
        if self.reader.peek() != Ok(b'{') {
            return Err(self.unexpected("{"));
        }
        self.reader.advance(1);
        let obj = self.parse_root_object()?;
        match self.reader.peek() {
            Ok(b'}') => {
                self.reader.advance(1);
                Ok(obj)
            }
            _ => Err(self.unexpected("}")),
        }
    }

    fn parse_root_object(&mut self) -> Result<RawObject> {
        let mut fields = Vec::new();
        loop {
            self.drop_whitespace_and_comments()?;
            match self.reader.peek() {
                Ok(b'}') | Err(ReadError::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(self.err(e)),
            }
            fields.push(self.parse_object_field()?);
            self.drop_whitespace_and_comments()?;
            match self.reader.peek() {
                Ok(b',') => self.reader.advance(1),
                _ => {}
            }
        }
        Ok(RawObject::new(fields))
    }

    fn parse_object_field(&mut self) -> Result<ObjectField> {
        if self.reader.starts_with(b"include")
            && !self
                .reader
                .peek_n(8)
                .map(|b| b[7].is_ascii_alphanumeric() || b[7] == b'_')
                .unwrap_or(false)
        {
            let inclusion = self.parse_include()?;
            return Ok(ObjectField::Inclusion(inclusion));
        }
        let (key, value) = self.parse_key_value()?;
        Ok(ObjectField::key_value(key, value))
    }

    fn parse_key_value(&mut self) -> Result<(RawString, RawValue)> {
        self.drop_whitespace()?;
        let key = self.parse_key()?;
        self.drop_horizontal_whitespace()?;
        let separator = self.parse_separator()?;
        self.drop_whitespace()?;
        let value = self.parse_value()?;
        let value = match separator {
            Some(Separator::AddAssign) => {
                RawValue::AddAssign(crate::raw::add_assign::AddAssign::new(value))
            }
            _ => value,
        };
        Ok((key, value))
    }

    /// `None` separator means the field used the implicit-object form
    /// (the value starts immediately with `{`).
    fn parse_separator(&mut self) -> Result<Option<Separator>> {
        match self.reader.peek() {
            Ok(b'+') if self.reader.starts_with(b"+=") => {
                self.reader.advance(2);
                Ok(Some(Separator::AddAssign))
            }
            Ok(b':') | Ok(b'=') => {
                self.reader.advance(1);
                Ok(Some(Separator::Assign))
            }
            Ok(b'{') => Ok(None),
            Ok(_) => Err(self.unexpected(": or = or {")),
            Err(e) => Err(self.err(e)),
        }
    }

    // -- arrays ----------------------------------------------------------

    fn parse_array(&mut self) -> Result<RawArray> {
        if self.reader.peek() != Ok(b'[') {
            return Err(self.unexpected("["));
        }
        self.reader.advance(1);
        let mut values = Vec::new();
        loop {
            self.drop_whitespace_and_comments()?;
            match self.reader.peek() {
                Ok(b']') => {
                    self.reader.advance(1);
                    break;
                }
                Err(ReadError::Eof) => return Err(Error::Eof),
                _ => {}
            }
            values.push(self.parse_value()?);
            self.drop_whitespace_and_comments()?;
            if self.reader.peek() == Ok(b',') {
                self.reader.advance(1);
            }
        }
        Ok(RawArray::new(values))
    }

    // -- values ------------------------------------------------------------

    fn parse_value(&mut self) -> Result<RawValue> {
        self.drop_horizontal_whitespace()?;
        let mut acc = FrameValue::default();
        loop {
            if !acc.values.is_empty() {
                acc.pre_space = self.capture_horizontal_whitespace();
            }
            if self.at_value_terminator() {
                break;
            }
            let item = self.parse_value_item()?;
            acc.push_value(item);
        }
        if acc.values.is_empty() {
            return Err(self.unexpected("value"));
        }
        Ok(RawValue::from_items(acc.values, acc.spaces))
    }

    fn at_value_terminator(&self) -> bool {
        match self.reader.peek() {
            Ok(b',' | b'}' | b']' | b'\n' | b'\r' | b'#') => true,
            Ok(_) => self.reader.starts_with(b"//"),
            Err(_) => true,
        }
    }

    fn parse_value_item(&mut self) -> Result<RawValue> {
        match self.reader.peek().map_err(|e| self.err(e))? {
            b'[' => {
                self.enter_nested()?;
                let arr = self.parse_array();
                self.exit_nested();
                Ok(RawValue::Array(arr?))
            }
            b'{' => {
                self.enter_nested()?;
                let obj = self.parse_object();
                self.exit_nested();
                Ok(RawValue::Object(obj?))
            }
            b'"' => self.parse_possible_multiline_string().map(RawValue::String),
            b'$' => self.parse_substitution().map(RawValue::Substitution),
            _ => self.parse_unquoted_item(),
        }
    }

    fn parse_unquoted_item(&mut self) -> Result<RawValue> {
        let token = self.scan_unquoted_run(lex::is_unquoted_string_terminator)?;
        Ok(Self::classify_unquoted(token))
    }

    fn classify_unquoted(token: String) -> RawValue {
        match token.to_ascii_lowercase().as_str() {
            "true" => return RawValue::Boolean(true),
            "false" => return RawValue::Boolean(false),
            "null" => return RawValue::Null,
            _ => {}
        }
        if let Some(number) = lex::classify_number(&token) {
            RawValue::Number(number)
        } else {
            RawValue::String(RawString::unquoted(token))
        }
    }

    /// Scans a run of runes, stopping at `is_terminator` or at the two-char
    /// `//` comment marker, which isn't otherwise in the terminator set.
    fn scan_unquoted_run(&mut self, is_terminator: impl Fn(char) -> bool) -> Result<String> {
        let mut s = String::new();
        loop {
            if self.reader.starts_with(b"//") {
                break;
            }
            match self.reader.peek_rune() {
                Ok((c, size)) => {
                    if is_terminator(c) {
                        break;
                    }
                    s.push(c);
                    self.reader.advance(size);
                }
                Err(_) => break,
            }
        }
        if s.is_empty() {
            return Err(self.unexpected("value"));
        }
        Ok(s)
    }

    // -- keys / paths --------------------------------------------------

    fn parse_key(&mut self) -> Result<RawString> {
        self.parse_path_expression()
    }

    fn parse_path_expression(&mut self) -> Result<RawString> {
        let mut segments = Vec::new();
        loop {
            self.drop_horizontal_whitespace()?;
            let segment = match self.reader.peek() {
                Ok(b'"') => self.parse_possible_multiline_text()?,
                Ok(_) => self.scan_unquoted_run(lex::is_path_segment_terminator)?,
                Err(ReadError::Eof) if !segments.is_empty() => break,
                Err(e) => return Err(self.err(e)),
            };
            segments.push(RawString::quoted(segment));
            self.drop_horizontal_whitespace()?;
            match self.reader.peek() {
                Ok(b'.') => {
                    self.reader.advance(1);
                    continue;
                }
                _ => break,
            }
        }
        if segments.is_empty() {
            return Err(self.unexpected("path"));
        }
        if segments.len() == 1 {
            Ok(segments.pop().unwrap())
        } else {
            Ok(RawString::path_expression(segments))
        }
    }

    // -- substitutions -------------------------------------------------

    fn parse_substitution(&mut self) -> Result<Substitution> {
        self.expect_byte(b'$')?;
        self.expect_byte(b'{')?;
        let optional = if self.reader.peek() == Ok(b'?') {
            self.reader.advance(1);
            true
        } else {
            false
        };
        let path = self.parse_path_expression()?;
        self.expect_byte(b'}')?;
        Ok(Substitution::new(path, optional))
    }

    fn expect_byte(&mut self, b: u8) -> Result<()> {
        match self.reader.peek() {
            Ok(actual) if actual == b => {
                self.reader.advance(1);
                Ok(())
            }
            _ => Err(self.unexpected_byte(b)),
        }
    }

    fn unexpected_byte(&self, expected: u8) -> Error {
        let found = self.reader.peek_rune().ok().map(|(c, _)| c);
        Error::UnexpectedToken {
            offset: self.reader.offset(),
            expected: byte_name(expected),
            found,
        }
    }

    // -- strings -----------------------------------------------------

    fn parse_possible_multiline_string(&mut self) -> Result<RawString> {
        if self.reader.starts_with(b"\"\"\"") {
            self.parse_multiline_string().map(RawString::multiline)
        } else {
            self.parse_quoted_string().map(RawString::quoted)
        }
    }

    /// Same dispatch, used for path segments (which discard the distinction
    /// between quoted and multiline -- both just contribute literal text).
    fn parse_possible_multiline_text(&mut self) -> Result<String> {
        if self.reader.starts_with(b"\"\"\"") {
            self.parse_multiline_string()
        } else {
            self.parse_quoted_string()
        }
    }

    fn parse_quoted_string(&mut self) -> Result<String> {
        self.expect_byte(b'"')?;
        let mut s = String::new();
        loop {
            let (c, size) = self.reader.peek_rune().map_err(|e| self.err(e))?;
            if c == '"' {
                self.reader.advance(1);
                break;
            }
            if c == '\\' {
                self.reader.advance(1);
                s.push(self.parse_escaped_char()?);
                continue;
            }
            s.push(c);
            self.reader.advance(size);
        }
        Ok(s)
    }

    fn parse_escaped_char(&mut self) -> Result<char> {
        let offset = self.reader.offset();
        let c = self.reader.consume().map_err(|e| self.err(e))?;
        match c {
            b'"' => Ok('"'),
            b'\\' => Ok('\\'),
            b'/' => Ok('/'),
            b'b' => Ok('\u{8}'),
            b'f' => Ok('\u{c}'),
            b'n' => Ok('\n'),
            b'r' => Ok('\r'),
            b't' => Ok('\t'),
            b'u' => self.parse_unicode_escape(),
            other => Err(Error::InvalidEscape {
                offset,
                reason: format!("unsupported escape `\\{}`", other as char),
            }),
        }
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let offset = self.reader.offset();
        let mut val: u32 = 0;
        for _ in 0..4 {
            let b = self.reader.consume().map_err(|e| self.err(e))?;
            let digit = match b {
                b'0'..=b'9' => (b - b'0') as u32,
                b'a'..=b'f' => (b - b'a' + 10) as u32,
                b'A'..=b'F' => (b - b'A' + 10) as u32,
                _ => {
                    return Err(Error::InvalidEscape {
                        offset,
                        reason: "expected 4 hex digits".to_string(),
                    });
                }
            };
            val = (val << 4) | digit;
        }
        Ok(val)
    }

    fn parse_unicode_escape(&mut self) -> Result<char> {
        let offset = self.reader.offset();
        let code = self.read_hex4()?;
        let scalar = if (0xD800..=0xDBFF).contains(&code) {
            if self.reader.consume().map_err(|e| self.err(e))? != b'\\'
                || self.reader.consume().map_err(|e| self.err(e))? != b'u'
            {
                return Err(Error::InvalidEscape {
                    offset,
                    reason: "high surrogate must be followed by a low surrogate escape".to_string(),
                });
            }
            let low = self.read_hex4()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(Error::InvalidEscape {
                    offset,
                    reason: "low surrogate out of range".to_string(),
                });
            }
            0x10000 + (((code - 0xD800) << 10) | (low - 0xDC00))
        } else {
            code
        };
        char::from_u32(scalar).ok_or_else(|| Error::InvalidEscape {
            offset,
            reason: "escape does not encode a valid code point".to_string(),
        })
    }

    fn parse_multiline_string(&mut self) -> Result<String> {
        if !self.reader.starts_with(b"\"\"\"") {
            return Err(self.unexpected("\"\"\""));
        }
        self.reader.advance(3);
        let mut s = String::new();
        loop {
            if self.reader.starts_with(b"\"\"\"") {
                self.reader.advance(3);
                break;
            }
            let (c, size) = self.reader.peek_rune().map_err(|e| self.err(e))?;
            s.push(c);
            self.reader.advance(size);
        }
        Ok(s)
    }

    // -- include directives ------------------------------------------

    fn parse_include(&mut self) -> Result<Inclusion> {
        self.reader.advance("include".len());
        self.drop_horizontal_whitespace()?;
        let required = if self.reader.starts_with(b"required(") {
            self.reader.advance("required(".len());
            true
        } else {
            false
        };
        self.drop_horizontal_whitespace()?;
        let location = self.parse_location_token()?;
        self.drop_horizontal_whitespace()?;
        let path = self.parse_quoted_string()?;
        if location.is_some() {
            self.drop_horizontal_whitespace()?;
            self.expect_byte(b')')?;
        }
        if required {
            self.drop_horizontal_whitespace()?;
            self.expect_byte(b')')?;
        }
        if path.trim().is_empty() {
            return Err(Error::EmptyPath);
        }
        Ok(Inclusion::new(path, required, location))
    }

    fn parse_location_token(&mut self) -> Result<Option<Location>> {
        if self.reader.starts_with(b"file(") {
            self.reader.advance("file(".len());
            Ok(Some(Location::File))
        } else if self.reader.starts_with(b"classpath(") {
            self.reader.advance("classpath(".len());
            Ok(Some(Location::Classpath))
        } else if self.reader.starts_with(b"url(") {
            self.reader.advance("url(".len());
            Ok(Some(Location::Url))
        } else if self.reader.peek() == Ok(b'"') {
            Ok(None)
        } else {
            Err(self.unexpected("file( or classpath( or url("))
        }
    }
}

fn byte_name(b: u8) -> &'static str {
    match b {
        b'{' => "{",
        b'}' => "}",
        b'[' => "[",
        b']' => "]",
        b'"' => "\"",
        b'$' => "$",
        b')' => ")",
        _ => "token",
    }
}

/// Parses a complete HOCON document from its source text.
pub(crate) fn parse(input: &str, options: &ConfigOptions) -> Result<RawObject> {
    Parser::new(input.as_bytes(), options).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(s: &str) -> RawObject {
        let opts = ConfigOptions::default();
        parse(s, &opts).unwrap()
    }

    #[test]
    fn empty_document_is_empty_object() {
        let obj = parse_str("");
        assert!(obj.fields().is_empty());
    }

    #[test]
    fn parses_simple_assignment() {
        let obj = parse_str("a = 1");
        assert_eq!(obj.fields().len(), 1);
    }

    #[test]
    fn parses_braces_object() {
        let obj = parse_str("{ a: 1, b: 2 }");
        assert_eq!(obj.fields().len(), 2);
    }

    #[test]
    fn implicit_object_separator() {
        let obj = parse_str("a { b = 1 }");
        match &obj.fields()[0] {
            ObjectField::KeyValue { value, .. } => {
                assert!(matches!(value, RawValue::Object(_)));
            }
            other => panic!("expected key-value field, got {other:?}"),
        }
    }

    #[test]
    fn string_concatenation_becomes_concat() {
        let obj = parse_str("a = hello world");
        match &obj.fields()[0] {
            ObjectField::KeyValue { value, .. } => {
                assert!(matches!(value, RawValue::Concat(_)));
            }
            other => panic!("expected key-value field, got {other:?}"),
        }
    }

    #[test]
    fn add_assign_wraps_value() {
        let obj = parse_str("a += 1");
        match &obj.fields()[0] {
            ObjectField::KeyValue { value, .. } => {
                assert!(matches!(value, RawValue::AddAssign(_)));
            }
            other => panic!("expected key-value field, got {other:?}"),
        }
    }

    #[test]
    fn dotted_key_becomes_path_expression() {
        let obj = parse_str("a.b = 1");
        match &obj.fields()[0] {
            ObjectField::KeyValue { key, .. } => {
                assert!(matches!(key, RawString::PathExpression(_)));
            }
            other => panic!("expected key-value field, got {other:?}"),
        }
    }

    #[test]
    fn substitution_parses_optional_flag() {
        let obj = parse_str("a = ${?x.y}");
        match &obj.fields()[0] {
            ObjectField::KeyValue { value, .. } => match value {
                RawValue::Substitution(s) => assert!(s.optional),
                other => panic!("expected substitution, got {other:?}"),
            },
            other => panic!("expected key-value field, got {other:?}"),
        }
    }

    #[test]
    fn multiline_string_has_no_escape_processing() {
        let obj = parse_str("a = \"\"\"hello\\nworld\"\"\"");
        match &obj.fields()[0] {
            ObjectField::KeyValue { value, .. } => match value {
                RawValue::String(RawString::MultilineString(s)) => {
                    assert_eq!(s, "hello\\nworld");
                }
                other => panic!("expected multiline string, got {other:?}"),
            },
            other => panic!("expected key-value field, got {other:?}"),
        }
    }

    #[test]
    fn include_directive_parses_required_and_location() {
        let obj = parse_str("include required(file(\"a.conf\"))");
        match &obj.fields()[0] {
            ObjectField::Inclusion(inclusion) => {
                assert!(inclusion.required);
                assert_eq!(inclusion.location, Some(Location::File));
                assert_eq!(inclusion.path, "a.conf");
            }
            other => panic!("expected inclusion field, got {other:?}"),
        }
    }

    #[test]
    fn depth_exceeded_is_reported() {
        let opts = ConfigOptions {
            max_depth: 2,
            ..ConfigOptions::default()
        };
        let nested = "a = { b = { c = 1 } }";
        let err = parse(nested, &opts).unwrap_err();
        assert!(matches!(err, Error::DepthExceeded { limit: 2 }));
    }
}

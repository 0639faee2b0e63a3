//! Dotted-path assignment parser for `--set`, `--set-string`, `--set-file`
//! and `--set-json`.

use serde_yaml::{Mapping, Value as YamlValue};

use super::{typed_value, ParseError};
use crate::defaults::{MAX_INDEX, MAX_NESTED_NAME_LEVEL};
use crate::values::{self, Values};

/// Character cursor over one assignment string.
pub(super) struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    pub(super) fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub(super) fn read_char(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        Some(c)
    }

    pub(super) fn unread(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub(super) fn rest(&self) -> String {
        self.chars[self.pos..].iter().collect()
    }

    pub(super) fn take_rest(&mut self) -> String {
        let rest = self.rest();
        self.pos = self.chars.len();
        rest
    }

    pub(super) fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.chars.len());
    }

    /// Read up to the first unescaped character in `stop`.
    ///
    /// Returns the text read (escapes resolved) and the stop character, or
    /// `None` if the input ran out first.
    pub(super) fn until(&mut self, stop: &[char]) -> (String, Option<char>) {
        let mut out = String::new();
        while let Some(c) = self.read_char() {
            if stop.contains(&c) {
                return (out, Some(c));
            }
            if c == '\\' {
                match self.read_char() {
                    Some(escaped) => out.push(escaped),
                    None => return (out, None),
                }
            } else {
                out.push(c);
            }
        }
        (out, None)
    }

    /// Like [`Scanner::until`] but without escape handling.
    pub(super) fn until_literal(&mut self, stop: &[char]) -> (String, Option<char>) {
        let mut out = String::new();
        while let Some(c) = self.read_char() {
            if stop.contains(&c) {
                return (out, Some(c));
            }
            out.push(c);
        }
        (out, None)
    }

    /// Skip blanks and at most one comma.
    ///
    /// Returns true when no value follows (a comma or the end of input).
    pub(super) fn empty_val(&mut self) -> bool {
        while let Some(c) = self.read_char() {
            if c == ',' {
                return true;
            }
            if !c.is_whitespace() {
                self.unread();
                return false;
            }
        }
        true
    }
}

/// How the text after `=` becomes a value.
pub(super) enum Mode<'r> {
    /// Scalars are typed: bools, null and decimal integers.
    Typed,
    /// Every scalar is a string.
    Strings,
    /// The value is one JSON document.
    Json,
    /// The value names a file whose content becomes a string.
    File(&'r mut dyn FnMut(&str) -> crate::error::Result<Vec<u8>>),
}

pub(super) struct Parser<'r> {
    sc: Scanner,
    mode: Mode<'r>,
}

impl<'r> Parser<'r> {
    pub(super) fn new(input: &str, mode: Mode<'r>) -> Self {
        Self {
            sc: Scanner::new(input),
            mode,
        }
    }

    pub(super) fn parse(mut self, data: &mut Values) -> Result<(), ParseError> {
        while !self.sc.is_eof() {
            self.key(data, 0)?;
        }
        Ok(())
    }

    fn key(&mut self, data: &mut Values, level: usize) -> Result<(), ParseError> {
        let (key, last) = self.sc.until(&['=', '[', ',', '.']);
        match last {
            None if key.is_empty() => Ok(()),
            None => Err(ParseError::NoValue { key }),
            Some('=') => {
                let value = self.value()?;
                set(data, key, value);
                Ok(())
            }
            Some('[') => {
                let index = self.index()?;
                let mut list = sequence_at(data, &key);
                self.list_item(&mut list, index, level)?;
                set(data, key, YamlValue::Sequence(list));
                Ok(())
            }
            Some(',') => Err(ParseError::NoValueBeforeComma { key }),
            Some('.') => {
                let level = nest(level)?;
                let mut inner = mapping_at(data, &key);
                self.key(&mut inner, level)?;
                if inner.is_empty() {
                    return Err(ParseError::EmptyMap { key });
                }
                set(data, key, YamlValue::Mapping(inner));
                Ok(())
            }
            Some(token) => Err(ParseError::UnexpectedToken { token }),
        }
    }

    fn list_item(
        &mut self,
        list: &mut Vec<YamlValue>,
        index: usize,
        level: usize,
    ) -> Result<(), ParseError> {
        let (data, last) = self.sc.until(&['[', '.', '=']);
        if !data.is_empty() {
            return Err(ParseError::UnexpectedData { data });
        }
        match last {
            None => Err(ParseError::UnexpectedEnd),
            Some('=') => {
                let value = self.value()?;
                set_index(list, index, value);
                Ok(())
            }
            Some('[') => {
                let next = self.index()?;
                let mut nested = list_sequence_at(list, index);
                self.list_item(&mut nested, next, level)?;
                set_index(list, index, YamlValue::Sequence(nested));
                Ok(())
            }
            Some('.') => {
                let mut inner = list_mapping_at(list, index);
                self.key(&mut inner, level)?;
                set_index(list, index, YamlValue::Mapping(inner));
                Ok(())
            }
            Some(token) => Err(ParseError::UnexpectedToken { token }),
        }
    }

    fn index(&mut self) -> Result<usize, ParseError> {
        let (raw, last) = self.sc.until(&[']']);
        if last.is_none() {
            return Err(ParseError::UnterminatedIndex);
        }
        parse_index(&raw)
    }

    /// The value following `=`.
    fn value(&mut self) -> Result<YamlValue, ParseError> {
        if matches!(self.mode, Mode::Json) {
            if self.sc.empty_val() {
                return Ok(YamlValue::Null);
            }
            let value = self.json_value()?;
            self.sc.empty_val();
            return Ok(value);
        }

        match self.sc.read_char() {
            None => Ok(YamlValue::String(String::new())),
            Some('{') => self.list().map(YamlValue::Sequence),
            Some(_) => {
                self.sc.unread();
                let (raw, _) = self.sc.until(&[',']);
                self.read_value(&raw)
            }
        }
    }

    /// A `{a,b,c}` list; the opening brace is already consumed.
    fn list(&mut self) -> Result<Vec<YamlValue>, ParseError> {
        let mut items = Vec::new();
        loop {
            let (raw, last) = self.sc.until(&[',', '}']);
            match last {
                Some('}') => {
                    if let Some(c) = self.sc.read_char() {
                        if c != ',' {
                            self.sc.unread();
                        }
                    }
                    if !(raw.is_empty() && items.is_empty()) {
                        items.push(self.read_value(&raw)?);
                    }
                    return Ok(items);
                }
                Some(_) => items.push(self.read_value(&raw)?),
                None => return Err(ParseError::UnterminatedList),
            }
        }
    }

    /// Decode exactly one JSON document from the remaining input.
    fn json_value(&mut self) -> Result<YamlValue, ParseError> {
        let rest = self.sc.rest();
        let mut stream = serde_json::Deserializer::from_str(&rest).into_iter::<serde_json::Value>();
        match stream.next() {
            Some(Ok(value)) => {
                let consumed = rest[..stream.byte_offset()].chars().count();
                self.sc.advance(consumed);
                Ok(values::from_json(value))
            }
            Some(Err(err)) => Err(ParseError::Json(err)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn read_value(&mut self, raw: &str) -> Result<YamlValue, ParseError> {
        match &mut self.mode {
            Mode::Typed | Mode::Json => Ok(typed_value(raw)),
            Mode::Strings => Ok(YamlValue::String(raw.to_string())),
            Mode::File(read) => {
                let bytes = (*read)(raw).map_err(|err| ParseError::ReadFile {
                    reference: raw.to_string(),
                    source: Box::new(err),
                })?;
                Ok(YamlValue::String(String::from_utf8_lossy(&bytes).into_owned()))
            }
        }
    }
}

/// Parse the text between `[` and `]` as a list index.
pub(super) fn parse_index(raw: &str) -> Result<usize, ParseError> {
    let index: i64 = raw.parse().map_err(|_| ParseError::InvalidIndex {
        raw: raw.to_string(),
    })?;
    if index < 0 {
        return Err(ParseError::NegativeIndex { index });
    }
    let index = usize::try_from(index).map_err(|_| ParseError::IndexTooLarge { index })?;
    if index > MAX_INDEX {
        return Err(ParseError::IndexTooLarge {
            index: index as i64,
        });
    }
    Ok(index)
}

/// Descend one dotted level, enforcing the nesting limit.
pub(super) fn nest(level: usize) -> Result<usize, ParseError> {
    let level = level + 1;
    if level > MAX_NESTED_NAME_LEVEL {
        return Err(ParseError::NestingTooDeep);
    }
    Ok(level)
}

pub(super) fn set(data: &mut Values, key: String, value: YamlValue) {
    if key.is_empty() {
        return;
    }
    data.insert(YamlValue::String(key), value);
}

pub(super) fn set_index(list: &mut Vec<YamlValue>, index: usize, value: YamlValue) {
    if list.len() <= index {
        list.resize(index + 1, YamlValue::Null);
    }
    list[index] = value;
}

/// A copy of the mapping stored at `key`, or a fresh one if there is none.
///
/// The original stays in place until the nested assignment succeeds.
pub(super) fn mapping_at(data: &Values, key: &str) -> Mapping {
    match data.get(key) {
        Some(YamlValue::Mapping(map)) => map.clone(),
        _ => Mapping::new(),
    }
}

/// A copy of the list stored at `key`, or a fresh one if there is none.
pub(super) fn sequence_at(data: &Values, key: &str) -> Vec<YamlValue> {
    match data.get(key) {
        Some(YamlValue::Sequence(list)) => list.clone(),
        _ => Vec::new(),
    }
}

pub(super) fn list_mapping_at(list: &[YamlValue], index: usize) -> Mapping {
    match list.get(index) {
        Some(YamlValue::Mapping(map)) => map.clone(),
        _ => Mapping::new(),
    }
}

pub(super) fn list_sequence_at(list: &[YamlValue], index: usize) -> Vec<YamlValue> {
    match list.get(index) {
        Some(YamlValue::Sequence(nested)) => nested.clone(),
        _ => Vec::new(),
    }
}

//! Parser for `--set-literal`: no escapes, and the value is everything after
//! the first `=`.

use serde_yaml::Value as YamlValue;

use super::parser::{
    list_mapping_at, list_sequence_at, mapping_at, nest, parse_index, sequence_at, set,
    set_index, Scanner,
};
use super::ParseError;
use crate::values::Values;

pub(super) struct LiteralParser {
    sc: Scanner,
}

impl LiteralParser {
    pub(super) fn new(input: &str) -> Self {
        Self {
            sc: Scanner::new(input),
        }
    }

    pub(super) fn parse(mut self, data: &mut Values) -> Result<(), ParseError> {
        while !self.sc.is_eof() {
            self.key(data, 0)?;
        }
        Ok(())
    }

    fn key(&mut self, data: &mut Values, level: usize) -> Result<(), ParseError> {
        let (key, last) = self.sc.until_literal(&['=', '[', '.']);
        match last {
            None if key.is_empty() => Ok(()),
            None => Err(ParseError::NoValue { key }),
            Some('=') => {
                let value = self.sc.take_rest();
                set(data, key, YamlValue::String(value));
                Ok(())
            }
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
            Some('[') => {
                let index = self.index()?;
                let mut list = sequence_at(data, &key);
                self.list_item(&mut list, index, level)?;
                set(data, key, YamlValue::Sequence(list));
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
        let (data, last) = self.sc.until_literal(&['[', '.', '=']);
        if !data.is_empty() {
            return Err(ParseError::UnexpectedData { data });
        }
        match last {
            None => Err(ParseError::UnexpectedEnd),
            Some('=') => {
                let value = self.sc.take_rest();
                set_index(list, index, YamlValue::String(value));
                Ok(())
            }
            Some('.') => {
                let level = nest(level)?;
                let mut inner = list_mapping_at(list, index);
                self.key(&mut inner, level)?;
                set_index(list, index, YamlValue::Mapping(inner));
                Ok(())
            }
            Some('[') => {
                let next = self.index()?;
                let mut nested = list_sequence_at(list, index);
                self.list_item(&mut nested, next, level)?;
                set_index(list, index, YamlValue::Sequence(nested));
                Ok(())
            }
            Some(token) => Err(ParseError::UnexpectedToken { token }),
        }
    }

    fn index(&mut self) -> Result<usize, ParseError> {
        let (raw, last) = self.sc.until_literal(&[']']);
        if last.is_none() {
            return Err(ParseError::UnterminatedIndex);
        }
        parse_index(&raw)
    }
}

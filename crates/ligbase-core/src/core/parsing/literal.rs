//! Reader for the literal notation produced by dynamic-language `repr`
//! output: quoted strings in either quote style, `None`/`True`/`False`,
//! numbers, lists, tuples and dictionaries.
//!
//! Tuples become JSON arrays and dictionary keys are rendered as strings.
//! Bare identifiers and calls are rejected.

use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Literal syntax error at position {pos}: {message}")]
pub struct LiteralError {
    pub pos: usize,
    pub message: String,
}

pub fn parse_literal(input: &str) -> Result<Value, LiteralError> {
    let mut reader = LiteralReader {
        chars: input.chars().collect(),
        pos: 0,
    };
    let value = reader.value()?;
    reader.skip_whitespace();
    if reader.pos < reader.chars.len() {
        return Err(reader.error("trailing characters after literal"));
    }
    Ok(value)
}

struct LiteralReader {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralReader {
    fn error(&self, message: &str) -> LiteralError {
        LiteralError {
            pos: self.pos,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, c: char) -> Result<(), LiteralError> {
        self.skip_whitespace();
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{c}'")))
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('\'' | '"') => self.string().map(Value::String),
            Some('[') => self.sequence('[', ']').map(|(items, _)| Value::Array(items)),
            Some('(') => {
                let (items, had_comma) = self.sequence('(', ')')?;
                // A parenthesized single value without a comma is just grouping.
                if items.len() == 1 && !had_comma {
                    Ok(items.into_iter().next().unwrap_or(Value::Null))
                } else {
                    Ok(Value::Array(items))
                }
            }
            Some('{') => self.dict(),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.keyword(),
            Some(_) => Err(self.error("unexpected character")),
        }
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "None" => Ok(Value::Null),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            _ => Err(LiteralError {
                pos: start,
                message: format!("bare identifier '{word}' is not a literal"),
            }),
        }
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '_'))
        {
            if matches!(self.peek(), Some('e' | 'E'))
                && matches!(self.chars.get(self.pos + 1), Some('-' | '+'))
            {
                self.pos += 1;
            }
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|&&c| c != '_')
            .collect();

        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Number(i.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(LiteralError {
                pos: start,
                message: format!("invalid number '{text}'"),
            })
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.peek().ok_or_else(|| self.error("expected string"))?;
        self.pos += 1;
        let mut out = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error("unterminated string"));
            };
            self.pos += 1;
            if c == quote {
                return Ok(out);
            }
            if c != '\\' {
                out.push(c);
                continue;
            }
            let Some(escaped) = self.peek() else {
                return Err(self.error("unterminated escape"));
            };
            self.pos += 1;
            match escaped {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '0' => out.push('\0'),
                '\\' | '\'' | '"' => out.push(escaped),
                'x' | 'u' => {
                    let width = if escaped == 'x' { 2 } else { 4 };
                    let hex: String = self.chars.iter().skip(self.pos).take(width).collect();
                    let code = u32::from_str_radix(&hex, 16)
                        .ok()
                        .filter(|_| hex.len() == width)
                        .and_then(char::from_u32)
                        .ok_or_else(|| self.error("invalid escape sequence"))?;
                    self.pos += width;
                    out.push(code);
                }
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
        }
    }

    /// Reads a comma-separated sequence, reporting whether any comma was seen.
    fn sequence(&mut self, open: char, close: char) -> Result<(Vec<Value>, bool), LiteralError> {
        self.expect(open)?;
        let mut items = Vec::new();
        let mut had_comma = false;
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok((items, had_comma));
            }
            items.push(self.value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    had_comma = true;
                    self.pos += 1;
                }
                Some(c) if c == close => {}
                _ => return Err(self.error(&format!("expected ',' or '{close}'"))),
            }
        }
    }

    fn dict(&mut self) -> Result<Value, LiteralError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Object(map));
            }
            let key = match self.value()? {
                Value::String(s) => s,
                other => other.to_string(),
            };
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {}
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_single_quoted_dicts_with_none_and_booleans() {
        let v = parse_literal("{'method': 'X-RAY DIFFRACTION', 'temperature': None, 'ok': True}")
            .unwrap();
        assert_eq!(
            v,
            json!({"method": "X-RAY DIFFRACTION", "temperature": null, "ok": true})
        );
    }

    #[test]
    fn tuples_become_arrays_and_grouping_parens_are_transparent() {
        assert_eq!(parse_literal("('H_ATP', 301, ' ')").unwrap(), json!(["H_ATP", 301, " "]));
        assert_eq!(parse_literal("(5,)").unwrap(), json!([5]));
        assert_eq!(parse_literal("(5)").unwrap(), json!(5));
        assert_eq!(parse_literal("()").unwrap(), json!([]));
    }

    #[test]
    fn strings_may_contain_the_other_quote_style() {
        let v = parse_literal(r#"["5'-nucleotidase", 'say "hi"']"#).unwrap();
        assert_eq!(v, json!(["5'-nucleotidase", "say \"hi\""]));
    }

    #[test]
    fn numbers_cover_signs_floats_and_exponents() {
        let v = parse_literal("[-1, 2.5, 1e-3, +4, 1_000]").unwrap();
        assert_eq!(v, json!([-1, 2.5, 0.001, 4, 1000]));
    }

    #[test]
    fn nested_structures_and_trailing_commas() {
        let v = parse_literal("[{'center': [1.0, -2.0, 3.5], 'ligand_id': ('H_HEM', 500, ' '),},]")
            .unwrap();
        assert_eq!(v[0]["ligand_id"][1], 500);
        assert_eq!(v[0]["center"][1], -2.0);
    }

    #[test]
    fn non_string_dict_keys_are_stringified() {
        let v = parse_literal("{1: 'a', None: 'b'}").unwrap();
        assert_eq!(v, json!({"1": "a", "null": "b"}));
    }

    #[test]
    fn rejects_bare_identifiers_and_garbage() {
        assert!(parse_literal("kinase").is_err());
        assert!(parse_literal("array([1, 2])").is_err());
        assert!(parse_literal("[1, 2").is_err());
        assert!(parse_literal("'unterminated").is_err());
        assert!(parse_literal("[1] extra").is_err());
        assert!(parse_literal("nan").is_err());
        assert!(parse_literal("").is_err());
    }
}

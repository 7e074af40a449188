use super::literal::parse_literal;
use serde_json::Value;
use thiserror::Error;

/// One way of turning a serialized table cell into structured data.
pub trait ParseStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn parse(&self, raw: &str) -> Result<Value, String>;
}

/// Standard JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictJson;

impl ParseStrategy for StrictJson {
    fn name(&self) -> &'static str {
        "strict-json"
    }

    fn parse(&self, raw: &str) -> Result<Value, String> {
        serde_json::from_str(raw).map_err(|e| e.to_string())
    }
}

/// JSON after every single quote has been replaced by a double quote.
///
/// Breaks on strings containing apostrophes; [`LiteralSyntax`] picks those up.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteNormalizedJson;

impl ParseStrategy for QuoteNormalizedJson {
    fn name(&self) -> &'static str {
        "quote-normalized-json"
    }

    fn parse(&self, raw: &str) -> Result<Value, String> {
        serde_json::from_str(&raw.replace('\'', "\"")).map_err(|e| e.to_string())
    }
}

/// Literal notation with `None`/`True`/`False`, tuples and either quote style.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralSyntax;

impl ParseStrategy for LiteralSyntax {
    fn name(&self) -> &'static str {
        "literal-syntax"
    }

    fn parse(&self, raw: &str) -> Result<Value, String> {
        parse_literal(raw).map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedField {
    pub value: Value,
    pub strategy: &'static str,
}

#[derive(Debug, Error)]
#[error("No parse strategy accepted the value (tried: {})", .attempts.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(", "))]
pub struct FieldParseError {
    pub attempts: Vec<(&'static str, String)>,
}

/// Ordered list of parse strategies; the first one that succeeds wins.
pub struct FieldParser {
    strategies: Vec<Box<dyn ParseStrategy>>,
}

impl Default for FieldParser {
    fn default() -> Self {
        Self::new(vec![
            Box::new(StrictJson),
            Box::new(QuoteNormalizedJson),
            Box::new(LiteralSyntax),
        ])
    }
}

impl FieldParser {
    pub fn new(strategies: Vec<Box<dyn ParseStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn parse(&self, raw: &str) -> Result<ParsedField, FieldParseError> {
        let raw = raw.trim();
        let mut attempts = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            match strategy.parse(raw) {
                Ok(value) => {
                    return Ok(ParsedField {
                        value,
                        strategy: strategy.name(),
                    });
                }
                Err(reason) => attempts.push((strategy.name(), reason)),
            }
        }
        Err(FieldParseError { attempts })
    }
}

/// True for cells that carry no value at all: blank, or a null marker
/// written by dataframe tooling.
pub fn is_missing_cell(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "" | "nan" | "none" | "null"
    )
}

//! This module provides the parser for delimited transition tables, utilizing the `pest` crate.
//! It defines the grammar for table files and functions to turn their records into a
//! `TransitionTable`.
//!
//! The first non-empty record is the header: its first field is a corner label and the
//! remaining fields name the alphabet in column order. Every following record starts
//! with a state name, and each further field is the cell for the alphabet symbol in the
//! same column, written as `write move next` (parts separated by commas or whitespace).

use crate::{
    table::TransitionTable,
    types::{Move, Symbol, Transition, TurtabError},
};
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser as PestParser;
use tracing::debug;

/// Derives a `PestParser` for the table grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct TableParser;

/// Parses the given table source into a `TransitionTable`.
///
/// Malformed cells (anything other than exactly three parts, or an unknown move
/// letter) are skipped rather than reported. So are empty rows, empty cells and
/// cells beyond the declared alphabet.
///
/// # Returns
///
/// * `Ok(TransitionTable)` if the source has a header row.
/// * `Err(TurtabError::ParseError)` if the grammar rejects the source.
/// * `Err(TurtabError::EmptyTable)` if the source contains no header row.
pub fn parse(input: &str) -> Result<TransitionTable, TurtabError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    let root = TableParser::parse(Rule::table, input)
        .map_err(|e| TurtabError::ParseError(Box::new(e)))?
        .next()
        .ok_or(TurtabError::EmptyTable)?;

    let mut records = root
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::record)
        .map(parse_record)
        .filter(|fields| !is_empty_record(fields));

    let header = records.next().ok_or(TurtabError::EmptyTable)?;
    let alphabet: Vec<Symbol> = header.into_iter().skip(1).collect();

    let mut entries = Vec::new();
    for (row, fields) in records.enumerate() {
        let mut fields = fields.into_iter();
        let Some(state) = fields.next() else {
            continue;
        };

        for (column, cell) in fields.enumerate() {
            if cell.is_empty() {
                continue;
            }

            let Some(symbol) = alphabet.get(column) else {
                debug!(row, column, "ignoring cell beyond the alphabet");
                continue;
            };

            match parse_cell(&cell) {
                Some(transition) => entries.push((state.clone(), symbol.clone(), transition)),
                None => debug!(%state, %symbol, cell = %cell, "skipping malformed cell"),
            }
        }
    }

    Ok(TransitionTable::from_entries(alphabet, entries))
}

/// Parses a single cell of the form `write move next`.
///
/// Commas and whitespace both separate the parts. The move letter is
/// case-insensitive.
pub fn parse_cell(cell: &str) -> Option<Transition> {
    let normalized = cell.replace(',', " ");
    let parts: Vec<&str> = normalized.split_whitespace().collect();

    let [write, action, next_state] = parts.as_slice() else {
        return None;
    };

    let action = Move::from_letter(action)?;

    Some(Transition::new(*write, action, *next_state))
}

/// Collects the trimmed, unquoted fields of a `Pair<Rule::record>`.
fn parse_record(pair: Pair<Rule>) -> Vec<String> {
    pair.into_inner().map(parse_field).collect()
}

/// Rule: field > (quoted ~ trailing? | bare). Text trailing a closing quote is
/// appended to the quoted content, so `"1 R q" x` reads as `1 R q x`.
fn parse_field(field: Pair<Rule>) -> String {
    let value: String = field
        .into_inner()
        .map(|part| match part.as_rule() {
            Rule::quoted => unquote(part.as_str()),
            _ => part.as_str().to_string(),
        })
        .collect();

    value.trim().to_string()
}

/// Strips the surrounding quotes of a quoted field and resolves `""` escapes.
fn unquote(input: &str) -> String {
    input[1..input.len() - 1].replace("\"\"", "\"")
}

fn is_empty_record(fields: &[String]) -> bool {
    fields.iter().all(|field| field.is_empty())
}

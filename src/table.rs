//! This module defines the `TransitionTable`, the immutable mapping from
//! `(state, symbol)` to the `Transition` that fires for it.

use crate::types::{Symbol, Transition};
use std::collections::HashMap;

/// An immutable, deterministic transition table.
///
/// Tables are built once (usually by [`crate::parse`]) and then only read.
/// Engines share a table through an `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTable {
    alphabet: Vec<Symbol>,
    states: Vec<String>,
    rules: HashMap<String, HashMap<Symbol, Transition>>,
}

impl TransitionTable {
    /// Creates an empty table. A machine driven by it halts on its first step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(state, symbol, transition)` entries. Later entries
    /// replace earlier ones for the same key.
    pub fn from_entries<I>(alphabet: Vec<Symbol>, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Symbol, Transition)>,
    {
        let mut states: Vec<String> = Vec::new();
        let mut rules: HashMap<String, HashMap<Symbol, Transition>> = HashMap::new();

        for (state, symbol, transition) in entries {
            if !states.contains(&state) {
                states.push(state.clone());
            }
            rules.entry(state).or_default().insert(symbol, transition);
        }

        Self {
            alphabet,
            states,
            rules,
        }
    }

    /// Returns the transition for `(state, symbol)`, if one exists.
    ///
    /// A missing entry is the normal halting condition, not a failure.
    pub fn lookup(&self, state: &str, symbol: &str) -> Option<&Transition> {
        self.rules.get(state)?.get(symbol)
    }

    /// Returns the alphabet declared by the table header, in column order.
    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    /// Returns the states that own at least one transition, in source order.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Returns the number of transitions.
    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    /// Returns `true` if the table has no transitions.
    pub fn is_empty(&self) -> bool {
        self.rules.values().all(HashMap::is_empty)
    }

    /// Iterates over all transitions in state order, then alphabet order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Transition)> + '_ {
        self.states.iter().flat_map(move |state| {
            self.symbols_for(state)
                .filter_map(move |symbol| {
                    self.lookup(state, symbol)
                        .map(|transition| (state.as_str(), symbol, transition))
                })
        })
    }

    /// Symbols to probe for `state`: the header alphabet followed by any symbol
    /// only present in the entries themselves.
    fn symbols_for<'a>(&'a self, state: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let mut extra: Vec<&str> = self
            .rules
            .get(state)
            .into_iter()
            .flat_map(HashMap::keys)
            .filter(|symbol| !self.alphabet.contains(symbol))
            .map(String::as_str)
            .collect();
        extra.sort_unstable();

        self.alphabet.iter().map(String::as_str).chain(extra)
    }
}

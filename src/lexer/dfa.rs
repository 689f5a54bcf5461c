//! A generic deterministic finite automaton with a two-phase lifecycle.
//!
//! A [`Dfa`] begins in the [`Building`](Phase::Building) phase, during
//! which transitions and final states may be registered but evaluation
//! is forbidden. Calling [`Dfa::release`] moves it irreversibly into the
//! [`Released`](Phase::Released) phase, deduplicating identical
//! transition rows along the way; from then on the automaton is a pure
//! recognizer driven one symbol at a time.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::token::TokenKind;

/// The error type for misusing a [`Dfa`].
///
/// These errors indicate configuration bugs at the point of misuse;
/// they cannot occur once a lexer has been constructed successfully.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DfaError {
    /// A state id outside `0..num_states` was supplied.
    #[error("state {0} is out of range")]
    InvalidState(usize),
    /// A symbol outside the automaton's alphabet was supplied while building.
    #[error("symbol {0:?} is not in the alphabet")]
    NotInAlphabet(char),
    /// A mutation was attempted after [`Dfa::release`].
    #[error("automaton is already released")]
    AlreadyReleased,
    /// An evaluation was attempted before [`Dfa::release`].
    #[error("automaton has not been released")]
    NotReleased,
}

/// The lifecycle phase of a [`Dfa`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Transitions and final states may be registered; evaluation is forbidden.
    Building,
    /// The automaton is frozen; only evaluation is permitted.
    Released,
}

/// A deterministic finite automaton recognizing one token kind.
///
/// The transition table is a dense `num_states x alphabet_size` matrix
/// of `Option<usize>` state ids, where `None` marks a missing
/// transition. State `0` is the initial state by convention.
#[derive(Debug, Clone)]
pub struct Dfa {
    /// The token kind this automaton recognizes.
    kind: TokenKind,
    /// The number of states, fixed at construction.
    num_states: usize,
    /// Maps each alphabet symbol to its dense column index.
    alphabet: HashMap<char, usize>,
    /// One transition row per state while building; drained on release.
    rows: Vec<Vec<Option<usize>>>,
    /// The deduplicated row storage, populated on release.
    unique_rows: Vec<Vec<Option<usize>>>,
    /// Maps each state to its row in `unique_rows`, populated on release.
    row_of_state: Vec<usize>,
    /// The set of accepting states.
    final_states: HashSet<usize>,
    /// The current state, or `None` once the automaton is dead.
    current: Option<usize>,
    /// The lifecycle phase.
    phase: Phase,
}

impl Dfa {
    /// Constructs a new automaton in the building phase with
    /// `num_states` states over the given `alphabet`, recognizing
    /// `kind`. Duplicate characters in `alphabet` share a column.
    pub fn new(num_states: usize, alphabet: &str, kind: TokenKind) -> Self {
        let mut columns = HashMap::new();
        for symbol in alphabet.chars() {
            let next = columns.len();
            columns.entry(symbol).or_insert(next);
        }
        let width = columns.len();

        Self {
            kind,
            num_states,
            alphabet: columns,
            rows: vec![vec![None; width]; num_states],
            unique_rows: Vec::new(),
            row_of_state: Vec::new(),
            final_states: HashSet::new(),
            current: Some(0),
            phase: Phase::Building,
        }
    }

    /// Returns the token kind this automaton recognizes.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Registers the transition `from --symbol--> to`.
    ///
    /// Fails with [`DfaError::AlreadyReleased`] after [`Dfa::release`],
    /// with [`DfaError::InvalidState`] if either state is out of range,
    /// and with [`DfaError::NotInAlphabet`] for unregistered symbols.
    pub fn add_transition(&mut self, from: usize, symbol: char, to: usize) -> Result<(), DfaError> {
        if self.phase == Phase::Released {
            return Err(DfaError::AlreadyReleased);
        }
        if from >= self.num_states {
            return Err(DfaError::InvalidState(from));
        }
        if to >= self.num_states {
            return Err(DfaError::InvalidState(to));
        }
        let column = *self
            .alphabet
            .get(&symbol)
            .ok_or(DfaError::NotInAlphabet(symbol))?;

        self.rows[from][column] = Some(to);
        Ok(())
    }

    /// Marks `state` as accepting.
    pub fn set_final_state(&mut self, state: usize) -> Result<(), DfaError> {
        if self.phase == Phase::Released {
            return Err(DfaError::AlreadyReleased);
        }
        if state >= self.num_states {
            return Err(DfaError::InvalidState(state));
        }
        self.final_states.insert(state);
        Ok(())
    }

    /// Irreversibly moves the automaton into the released phase.
    ///
    /// States with identical transition rows come to share a single row
    /// in the compacted storage; the compaction is observably
    /// transparent to evaluation.
    pub fn release(&mut self) {
        if self.phase == Phase::Released {
            return;
        }

        let mut pool: HashMap<Vec<Option<usize>>, usize> = HashMap::new();
        for row in self.rows.drain(..) {
            let next = self.unique_rows.len();
            let index = *pool.entry(row.clone()).or_insert(next);
            if index == next {
                self.unique_rows.push(row);
            }
            self.row_of_state.push(index);
        }
        self.phase = Phase::Released;
    }

    /// Resets the automaton to the initial state. Valid in any phase.
    pub fn init(&mut self) {
        self.current = Some(0);
    }

    /// Follows one transition on `symbol`, returning whether the
    /// automaton is still alive afterwards.
    ///
    /// A symbol outside the alphabet, or a missing transition, moves
    /// the automaton into a permanent dead state: every subsequent
    /// evaluation returns `false` until [`Dfa::init`] is called.
    pub fn evaluate(&mut self, symbol: char) -> Result<bool, DfaError> {
        if self.phase == Phase::Building {
            return Err(DfaError::NotReleased);
        }

        let Some(state) = self.current else {
            return Ok(false);
        };
        let Some(&column) = self.alphabet.get(&symbol) else {
            self.current = None;
            return Ok(false);
        };

        self.current = self.unique_rows[self.row_of_state[state]][column];
        Ok(self.current.is_some())
    }

    /// Returns `true` iff the current state is accepting. Side-effect-free.
    pub fn is_accepted(&self) -> bool {
        self.current
            .is_some_and(|state| self.final_states.contains(&state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds the released two-state digit recognizer used by the lexer.
    fn digit_dfa() -> Dfa {
        let mut dfa = Dfa::new(2, "0123456789", TokenKind::Number);
        for digit in '0'..='9' {
            dfa.add_transition(0, digit, 1).unwrap();
            dfa.add_transition(1, digit, 1).unwrap();
        }
        dfa.set_final_state(1).unwrap();
        dfa.release();
        dfa
    }

    #[test]
    fn accepts_digit_runs() {
        let mut dfa = digit_dfa();
        dfa.init();
        assert!(!dfa.is_accepted());

        for digit in "2026".chars() {
            assert!(dfa.evaluate(digit).unwrap());
            assert!(dfa.is_accepted());
        }
    }

    #[test]
    fn dies_on_foreign_symbol_until_init() {
        let mut dfa = digit_dfa();
        dfa.init();
        assert!(dfa.evaluate('7').unwrap());
        assert!(!dfa.evaluate('x').unwrap());
        assert!(!dfa.is_accepted());

        // dead state is permanent, even for alphabet symbols
        assert!(!dfa.evaluate('3').unwrap());
        assert!(!dfa.is_accepted());

        dfa.init();
        assert!(dfa.evaluate('3').unwrap());
        assert!(dfa.is_accepted());
    }

    #[test]
    fn dies_on_missing_transition() {
        let mut dfa = Dfa::new(2, "ab", TokenKind::Identifier);
        dfa.add_transition(0, 'a', 1).unwrap();
        dfa.set_final_state(1).unwrap();
        dfa.release();

        dfa.init();
        assert!(dfa.evaluate('a').unwrap());
        // state 1 has no outgoing transitions at all
        assert!(!dfa.evaluate('a').unwrap());
        assert!(!dfa.is_accepted());
    }

    #[test]
    fn building_phase_rejects_evaluation() {
        let mut dfa = Dfa::new(2, "ab", TokenKind::Identifier);
        assert_eq!(dfa.evaluate('a'), Err(DfaError::NotReleased));
    }

    #[test]
    fn released_phase_rejects_mutation() {
        let mut dfa = digit_dfa();
        assert_eq!(dfa.add_transition(0, '0', 1), Err(DfaError::AlreadyReleased));
        assert_eq!(dfa.set_final_state(0), Err(DfaError::AlreadyReleased));
    }

    #[test]
    fn rejects_out_of_range_states_and_symbols() {
        let mut dfa = Dfa::new(2, "ab", TokenKind::Identifier);
        assert_eq!(dfa.add_transition(5, 'a', 1), Err(DfaError::InvalidState(5)));
        assert_eq!(dfa.add_transition(0, 'a', 9), Err(DfaError::InvalidState(9)));
        assert_eq!(dfa.add_transition(0, 'z', 1), Err(DfaError::NotInAlphabet('z')));
        assert_eq!(dfa.set_final_state(3), Err(DfaError::InvalidState(3)));
    }

    #[test]
    fn release_deduplicates_identical_rows() {
        // states 1 and 2 get identical rows and must share storage
        let mut dfa = Dfa::new(3, "ab", TokenKind::Identifier);
        dfa.add_transition(0, 'a', 1).unwrap();
        dfa.add_transition(1, 'b', 2).unwrap();
        dfa.add_transition(2, 'b', 2).unwrap();

        // make rows 1 and 2 identical before releasing
        dfa.add_transition(1, 'a', 1).unwrap();
        dfa.add_transition(2, 'a', 1).unwrap();
        dfa.add_transition(1, 'b', 2).unwrap();
        dfa.set_final_state(2).unwrap();
        dfa.release();

        assert_eq!(dfa.unique_rows.len(), 2);
        assert_eq!(dfa.row_of_state[1], dfa.row_of_state[2]);

        // compaction is transparent to evaluation
        dfa.init();
        assert!(dfa.evaluate('a').unwrap());
        assert!(dfa.evaluate('b').unwrap());
        assert!(dfa.is_accepted());
        assert!(dfa.evaluate('a').unwrap());
        assert!(dfa.evaluate('b').unwrap());
        assert!(dfa.is_accepted());
    }

    #[test]
    fn release_is_idempotent() {
        let mut dfa = digit_dfa();
        let rows = dfa.unique_rows.len();
        dfa.release();
        assert_eq!(dfa.unique_rows.len(), rows);
    }
}

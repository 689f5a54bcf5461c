//! The fixed SCPL grammar and its parse tables.
//!
//! ```raw
//! Program        -> StatementList
//! StatementList  -> Statement StatementList | ε
//! Statement      -> identifier assign Expression semicolon
//! Expression     -> Expression plus Term | Term
//! Term           -> Term times Factor | Factor
//! Factor         -> identifier | number | string
//!                 | left_paren Expression right_paren
//! ```
//!
//! The predictive table works over the right-recursive refactoring of
//! the expression rules (`Expression -> Term Expression'` and so on);
//! the SLR tables encode the left-recursive form directly. Both live
//! behind narrow lookup interfaces so that the parsing loops never
//! see table construction, and a generated table could be substituted
//! without touching them.
//!
//! The tables are hand-written constants for this one language; there
//! is deliberately no FIRST/FOLLOW or LR-item-set machinery here.

use std::collections::HashMap;

/// The start symbol of the grammar.
pub const START_SYMBOL: &str = "Program";

/// The end-of-input marker used as a table key.
pub const END_MARKER: &str = "$";

/// The label given to the synthetic root of a parse tree.
pub const ROOT_LABEL: &str = "-";

/// The terminal symbols, in their textual table-key forms.
pub const TERMINALS: [&str; 10] = [
    "identifier",
    "number",
    "string",
    "plus",
    "times",
    "left_paren",
    "right_paren",
    "assign",
    "semicolon",
    END_MARKER,
];

/// Returns `true` iff `symbol` is one of the grammar's terminals.
pub fn is_terminal(symbol: &str) -> bool {
    TERMINALS.contains(&symbol)
}

/// One rewrite rule of the grammar. An empty `rhs` denotes epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Production {
    /// The nonterminal being rewritten.
    pub lhs: &'static str,
    /// The replacement symbols, in left-to-right order.
    pub rhs: &'static [&'static str],
}

/// `Program -> StatementList`
pub const PROGRAM: Production = Production {
    lhs: "Program",
    rhs: &["StatementList"],
};

/// `StatementList -> Statement StatementList`
pub const STATEMENT_LIST: Production = Production {
    lhs: "StatementList",
    rhs: &["Statement", "StatementList"],
};

/// `StatementList -> ε`
pub const STATEMENT_LIST_EMPTY: Production = Production {
    lhs: "StatementList",
    rhs: &[],
};

/// `Statement -> identifier assign Expression semicolon`
pub const STATEMENT: Production = Production {
    lhs: "Statement",
    rhs: &["identifier", "assign", "Expression", "semicolon"],
};

/// `Expression -> Expression plus Term`
pub const EXPRESSION_PLUS: Production = Production {
    lhs: "Expression",
    rhs: &["Expression", "plus", "Term"],
};

/// `Expression -> Term`
pub const EXPRESSION_TERM: Production = Production {
    lhs: "Expression",
    rhs: &["Term"],
};

/// `Term -> Term times Factor`
pub const TERM_TIMES: Production = Production {
    lhs: "Term",
    rhs: &["Term", "times", "Factor"],
};

/// `Term -> Factor`
pub const TERM_FACTOR: Production = Production {
    lhs: "Term",
    rhs: &["Factor"],
};

/// `Factor -> identifier`
pub const FACTOR_IDENTIFIER: Production = Production {
    lhs: "Factor",
    rhs: &["identifier"],
};

/// `Factor -> number`
pub const FACTOR_NUMBER: Production = Production {
    lhs: "Factor",
    rhs: &["number"],
};

/// `Factor -> string`
pub const FACTOR_STRING: Production = Production {
    lhs: "Factor",
    rhs: &["string"],
};

/// `Factor -> left_paren Expression right_paren`
pub const FACTOR_PAREN: Production = Production {
    lhs: "Factor",
    rhs: &["left_paren", "Expression", "right_paren"],
};

/// The predictive LL(1) table, mapping a nonterminal and a lookahead
/// terminal to the right-hand side to expand.
///
/// An empty rhs denotes an epsilon production.
#[derive(Debug, Clone)]
pub struct PredictiveTable {
    /// The table rows, one per nonterminal.
    rows: HashMap<&'static str, HashMap<&'static str, &'static [&'static str]>>,
}

impl Default for PredictiveTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictiveTable {
    /// Builds the table for the SCPL grammar.
    pub fn new() -> Self {
        let mut rows: HashMap<&'static str, HashMap<&'static str, &'static [&'static str]>> =
            HashMap::new();
        let mut cell = |nonterminal: &'static str,
                        terminal: &'static str,
                        rhs: &'static [&'static str]| {
            rows.entry(nonterminal).or_default().insert(terminal, rhs);
        };

        // Program -> StatementList
        cell("Program", "identifier", &["StatementList"]);
        cell("Program", END_MARKER, &["StatementList"]);

        // StatementList -> Statement StatementList | ε
        cell("StatementList", "identifier", &["Statement", "StatementList"]);
        cell("StatementList", END_MARKER, &[]);

        // Statement -> identifier assign Expression semicolon
        cell(
            "Statement",
            "identifier",
            &["identifier", "assign", "Expression", "semicolon"],
        );

        // Expression -> Term Expression'
        for lookahead in ["identifier", "number", "string", "left_paren"] {
            cell("Expression", lookahead, &["Term", "Expression'"]);
        }

        // Expression' -> plus Term Expression' | ε
        cell("Expression'", "plus", &["plus", "Term", "Expression'"]);
        cell("Expression'", "semicolon", &[]);
        cell("Expression'", "right_paren", &[]);

        // Term -> Factor Term'
        for lookahead in ["identifier", "number", "string", "left_paren"] {
            cell("Term", lookahead, &["Factor", "Term'"]);
        }

        // Term' -> times Factor Term' | ε
        cell("Term'", "times", &["times", "Factor", "Term'"]);
        cell("Term'", "plus", &[]);
        cell("Term'", "semicolon", &[]);
        cell("Term'", "right_paren", &[]);

        // Factor -> identifier | number | string
        //         | left_paren Expression right_paren
        cell("Factor", "identifier", &["identifier"]);
        cell("Factor", "number", &["number"]);
        cell("Factor", "string", &["string"]);
        cell(
            "Factor",
            "left_paren",
            &["left_paren", "Expression", "right_paren"],
        );

        Self { rows }
    }

    /// Looks up the production for expanding `nonterminal` on `terminal`.
    pub fn lookup(&self, nonterminal: &str, terminal: &str) -> Option<&'static [&'static str]> {
        self.rows.get(nonterminal)?.get(terminal).copied()
    }
}

/// One entry of the SLR action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Push the lookahead terminal and move to the given state.
    Shift(usize),
    /// Pop one production's worth of entries and rebuild its lhs.
    Reduce(Production),
    /// Parsing is complete.
    Accept,
}

/// The SLR(1) tables: an action per state and lookahead terminal,
/// and a goto state per state and nonterminal.
#[derive(Debug, Clone)]
pub struct SlrTables {
    /// The action table rows, one per state.
    actions: HashMap<usize, HashMap<&'static str, Action>>,
    /// The goto table rows, one per state.
    gotos: HashMap<usize, HashMap<&'static str, usize>>,
}

impl Default for SlrTables {
    fn default() -> Self {
        Self::new()
    }
}

impl SlrTables {
    /// Builds the tables for the SCPL grammar.
    pub fn new() -> Self {
        let mut gotos: HashMap<usize, HashMap<&'static str, usize>> = HashMap::new();
        let mut goto = |state: usize, nonterminal: &'static str, next: usize| {
            gotos.entry(state).or_default().insert(nonterminal, next);
        };

        goto(0, "Program", 1);
        goto(0, "StatementList", 2);
        goto(0, "Statement", 3);
        goto(2, "Statement", 4);
        goto(2, "StatementList", 5);
        goto(3, "Statement", 4);
        goto(3, "StatementList", 5);
        goto(4, "Statement", 4);
        goto(4, "StatementList", 5);
        goto(6, "Expression", 8);
        goto(6, "Term", 9);
        goto(6, "Factor", 10);
        goto(13, "Expression", 14);
        goto(13, "Term", 9);
        goto(13, "Factor", 10);
        goto(18, "Term", 11);
        goto(18, "Factor", 10);
        goto(19, "Factor", 12);

        let mut actions: HashMap<usize, HashMap<&'static str, Action>> = HashMap::new();
        let mut act = |state: usize, terminal: &'static str, action: Action| {
            actions.entry(state).or_default().insert(terminal, action);
        };

        // state 0: start
        act(0, "identifier", Action::Shift(7));
        act(0, END_MARKER, Action::Reduce(STATEMENT_LIST_EMPTY));

        // state 1: S' -> Program .
        act(1, END_MARKER, Action::Accept);

        // state 2: Program -> StatementList .
        act(2, END_MARKER, Action::Reduce(PROGRAM));

        // states 3 and 4: StatementList -> Statement . StatementList
        for state in [3, 4] {
            act(state, "identifier", Action::Shift(7));
            act(state, END_MARKER, Action::Reduce(STATEMENT_LIST_EMPTY));
        }

        // state 5: StatementList -> Statement StatementList .
        act(5, "identifier", Action::Reduce(STATEMENT_LIST));
        act(5, END_MARKER, Action::Reduce(STATEMENT_LIST));

        // states 6, 13, 18, 19: positions expecting the start of a Factor
        for state in [6, 13, 18, 19] {
            act(state, "identifier", Action::Shift(15));
            act(state, "number", Action::Shift(16));
            act(state, "string", Action::Shift(21));
            act(state, "left_paren", Action::Shift(13));
        }

        // state 7: Statement -> identifier . assign Expression semicolon
        act(7, "assign", Action::Shift(6));

        // state 8: Statement -> identifier assign Expression . semicolon
        act(8, "semicolon", Action::Shift(17));
        act(8, "plus", Action::Shift(18));

        // state 9: Expression -> Term . | Term -> Term . times Factor
        for lookahead in ["semicolon", "right_paren", "plus"] {
            act(9, lookahead, Action::Reduce(EXPRESSION_TERM));
        }
        act(9, "times", Action::Shift(19));

        // state 10: Term -> Factor .
        for lookahead in ["semicolon", "right_paren", "plus", "times"] {
            act(10, lookahead, Action::Reduce(TERM_FACTOR));
        }

        // state 11: Expression -> Expression plus Term .
        //         | Term -> Term . times Factor
        for lookahead in ["semicolon", "right_paren", "plus"] {
            act(11, lookahead, Action::Reduce(EXPRESSION_PLUS));
        }
        act(11, "times", Action::Shift(19));

        // state 12: Term -> Term times Factor .
        for lookahead in ["semicolon", "right_paren", "plus", "times"] {
            act(12, lookahead, Action::Reduce(TERM_TIMES));
        }

        // state 14: Factor -> left_paren Expression . right_paren
        //         | Expression -> Expression . plus Term
        act(14, "right_paren", Action::Shift(20));
        act(14, "plus", Action::Shift(18));

        // states 15, 16, 21: Factor -> identifier . | number . | string .
        for lookahead in ["semicolon", "right_paren", "plus", "times"] {
            act(15, lookahead, Action::Reduce(FACTOR_IDENTIFIER));
            act(16, lookahead, Action::Reduce(FACTOR_NUMBER));
            act(21, lookahead, Action::Reduce(FACTOR_STRING));
        }

        // state 17: Statement -> identifier assign Expression semicolon .
        act(17, "identifier", Action::Reduce(STATEMENT));
        act(17, END_MARKER, Action::Reduce(STATEMENT));

        // state 20: Factor -> left_paren Expression right_paren .
        for lookahead in ["semicolon", "right_paren", "plus", "times"] {
            act(20, lookahead, Action::Reduce(FACTOR_PAREN));
        }

        Self { actions, gotos }
    }

    /// Looks up the action for `state` on the lookahead `terminal`.
    pub fn action(&self, state: usize, terminal: &str) -> Option<Action> {
        self.actions.get(&state)?.get(terminal).copied()
    }

    /// Looks up the goto state for `state` on `nonterminal`.
    pub fn goto(&self, state: usize, nonterminal: &str) -> Option<usize> {
        self.gotos.get(&state)?.get(nonterminal).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_classification() {
        assert!(is_terminal("identifier"));
        assert!(is_terminal(END_MARKER));
        assert!(!is_terminal("Expression"));
        assert!(!is_terminal("Expression'"));
    }

    #[test]
    fn predictive_table_covers_every_factor_start() {
        let table = PredictiveTable::new();
        for lookahead in ["identifier", "number", "string", "left_paren"] {
            assert!(table.lookup("Expression", lookahead).is_some());
            assert!(table.lookup("Term", lookahead).is_some());
            assert!(table.lookup("Factor", lookahead).is_some());
        }
    }

    #[test]
    fn predictive_table_epsilon_entries_are_empty() {
        let table = PredictiveTable::new();
        assert_eq!(table.lookup("StatementList", END_MARKER), Some(&[][..]));
        assert_eq!(table.lookup("Expression'", "semicolon"), Some(&[][..]));
        assert_eq!(table.lookup("Term'", "plus"), Some(&[][..]));
    }

    #[test]
    fn predictive_table_rejects_impossible_pairs() {
        let table = PredictiveTable::new();
        assert_eq!(table.lookup("Statement", "plus"), None);
        assert_eq!(table.lookup("Factor", "assign"), None);
    }

    #[test]
    fn slr_tables_drive_a_minimal_statement() {
        let tables = SlrTables::new();
        assert_eq!(tables.action(0, "identifier"), Some(Action::Shift(7)));
        assert_eq!(tables.action(7, "assign"), Some(Action::Shift(6)));
        assert_eq!(
            tables.action(16, "semicolon"),
            Some(Action::Reduce(FACTOR_NUMBER))
        );
        assert_eq!(tables.goto(6, "Factor"), Some(10));
        assert_eq!(tables.action(1, END_MARKER), Some(Action::Accept));
    }

    #[test]
    fn slr_tables_reduce_the_empty_program() {
        let tables = SlrTables::new();
        assert_eq!(
            tables.action(0, END_MARKER),
            Some(Action::Reduce(STATEMENT_LIST_EMPTY))
        );
        assert_eq!(tables.goto(0, "StatementList"), Some(2));
        assert_eq!(tables.action(2, END_MARKER), Some(Action::Reduce(PROGRAM)));
    }

    #[test]
    fn slr_tables_have_no_entry_for_stray_input() {
        let tables = SlrTables::new();
        assert_eq!(tables.action(0, "plus"), None);
        assert_eq!(tables.action(7, "number"), None);
        assert_eq!(tables.goto(0, "Factor"), None);
    }
}

//! Diagnostics sidecar.
//!
//! After each node's handler runs, the handler reports which child kinds it
//! consumed; everything else on the node gets one warning naming the node's
//! structural path. Diagnostics never change emitted output or control flow.

use colored::Colorize;

use crate::yang::{Keyword, Statement};

#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<String>,
    quiet: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect without printing. Used by tests.
    pub fn quiet() -> Self {
        Self { warnings: Vec::new(), quiet: true }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.quiet {
            eprintln!("{}", format!("Warning: {message}").yellow());
        }
        self.warnings.push(message);
    }

    /// One warning per child whose kind the handler did not consume.
    pub fn check_substmts(&mut self, path: &str, stmt: &Statement, handled: &[Keyword]) {
        for sub in &stmt.substmts {
            if !handled.contains(&sub.keyword) {
                self.warn(format!("{path}: {}({}) not handled", sub.keyword, sub.arg));
            }
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yang::parse::{parse_module, IdGen};

    #[test]
    fn unhandled_children_warn_once_each() {
        let m = parse_module(
            "module demo { prefix d; namespace \"urn:d\"; rpc do-thing; }",
            &mut IdGen::new(),
        )
        .unwrap();
        let mut diags = Diagnostics::quiet();
        diags.check_substmts("/", &m, &[Keyword::Prefix, Keyword::Namespace]);
        assert_eq!(diags.warnings().len(), 1);
        assert_eq!(diags.warnings()[0], "/: rpc(do-thing) not handled");
    }

    #[test]
    fn handled_children_are_silent() {
        let m = parse_module("module demo { prefix d; }", &mut IdGen::new()).unwrap();
        let mut diags = Diagnostics::quiet();
        diags.check_substmts("/", &m, &[Keyword::Prefix]);
        assert!(diags.warnings().is_empty());
    }
}

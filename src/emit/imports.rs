//! Import and include emission.
//!
//! YANG `import` (cross-namespace, prefixed) and `include` (same namespace,
//! unprefixed) both become entries of one TOSCA `imports:` sequence. The
//! built-in IETF types import always comes first. When the referenced module
//! is loaded in the registry, its declared namespace is added as an
//! informational comment; lookup failure just drops the comment.

use super::Emitter;
use crate::yang::{Keyword, Statement};

/// TOSCA namespace for the built-in IETF types.
pub const IETF_NAMESPACE: &str = "org.ietf:1.0";
pub const IETF_NAMESPACE_PREFIX: &str = "inet";

impl Emitter<'_, '_> {
    pub(crate) fn emit_imports_and_includes(&mut self, stmt: &Statement, indent: usize) {
        self.doc.line(indent, "imports:");
        let indent = indent + 1;

        // Always import the built-in YANG types.
        self.doc.line(indent, format!("- file: {IETF_NAMESPACE}"));
        self.doc.line(indent + 1, format!("namespace_prefix: {IETF_NAMESPACE_PREFIX}"));

        for import in stmt.find_all(Keyword::Import) {
            self.emit_import_or_include(import, indent);
        }
        for include in stmt.find_all(Keyword::Include) {
            self.emit_import_or_include(include, indent);
        }
    }

    fn emit_import_or_include(&mut self, stmt: &Statement, indent: usize) {
        let file = format!("{}.yaml", stmt.arg);

        // TOSCA imports the module by its namespace name; recover it from the
        // registry when the module is loaded.
        let namespace = self
            .registry
            .get(&stmt.arg)
            .and_then(|m| m.arg_of(Keyword::Namespace))
            .map(str::to_owned);

        match stmt.arg_of(Keyword::Prefix) {
            Some(prefix) => {
                self.doc.line(indent, format!("- file: {file}"));
                self.doc.line(indent + 1, format!("namespace_prefix: {prefix}"));
            }
            None => {
                // Includes carry no prefix: a bare filename entry.
                self.doc.line(indent, format!("- {file}"));
            }
        }
        if let Some(ns) = namespace {
            self.doc.line(indent + 1, format!("# namespace: {ns}"));
        }

        self.check(stmt, &[Keyword::Prefix]);
    }
}

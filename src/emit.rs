//! TOSCA document emission.
//!
//! One [`Emitter`] per module translation. The emitter owns the output
//! document and the diagnostics, borrows the immutable context, resolved
//! links, and module registry, and walks the statement tree in a single
//! depth-first pass. Indentation is an explicit parameter on every handler.

pub mod data_type;
pub mod imports;
pub mod metadata;

use std::collections::HashSet;

use crate::check::Diagnostics;
use crate::context::TranslationContext;
use crate::sink::Doc;
use crate::text;
use crate::yang::resolve::{Links, ModuleRegistry};
use crate::yang::{Keyword, Statement, StmtId};

/// Top-level statement kinds the module handler consumes, directly or through
/// the metadata/import/data-type passes.
const HANDLED_MODULE: &[Keyword] = &[
    Keyword::Augment,
    Keyword::BelongsTo,
    Keyword::Choice,
    Keyword::Contact,
    Keyword::Container,
    Keyword::Description,
    Keyword::Feature,
    Keyword::Grouping,
    Keyword::Import,
    Keyword::Include,
    Keyword::List,
    Keyword::Namespace,
    Keyword::Organization,
    Keyword::Prefix,
    Keyword::Reference,
    Keyword::Revision,
    Keyword::Typedef,
    Keyword::Uses,
    Keyword::YangVersion,
];

pub struct Emitter<'a, 'c> {
    pub(crate) ctx: &'c TranslationContext<'c>,
    pub(crate) links: &'a Links<'a>,
    pub(crate) registry: &'a ModuleRegistry<'a>,
    pub(crate) doc: Doc,
    pub(crate) diags: Diagnostics,
    /// One warning per unresolved `uses`, even though the property and
    /// attribute passes both visit it.
    pub(crate) warned_uses: HashSet<StmtId>,
}

impl<'a, 'c> Emitter<'a, 'c> {
    pub fn new(
        ctx: &'c TranslationContext<'c>,
        links: &'a Links<'a>,
        registry: &'a ModuleRegistry<'a>,
        diags: Diagnostics,
    ) -> Self {
        Self { ctx, links, registry, doc: Doc::new(), diags, warned_uses: HashSet::new() }
    }

    pub fn finish(self) -> (String, Diagnostics) {
        (self.doc.into_string(), self.diags)
    }

    /// Emit one complete TOSCA definitions document for a module: version
    /// header, attribution comment, description, metadata, imports, and the
    /// recursively populated `data_types:` section.
    pub fn emit_module(&mut self, module: &Statement) {
        self.doc.line(0, "tosca_definitions_version: tosca_simple_yaml_1_3");
        self.doc.blank();

        let today = chrono::Local::now().format("%Y-%m-%d");
        self.doc.line(
            0,
            format!(
                "# This template was auto-generated by yang-tosca from the YANG module '{}' on {}",
                module.arg, today
            ),
        );
        self.doc.blank();

        if let Some(description) = module.find(Keyword::Description) {
            self.emit_description(description, 0);
            self.doc.blank();
        }

        self.emit_metadata(module, 0);
        self.doc.blank();

        self.emit_imports_and_includes(module, 0);
        self.doc.blank();

        self.doc.line(0, "data_types:");
        self.doc.blank();
        self.emit_data_types_in_stmt(module, 1);

        self.check(module, HANDLED_MODULE);
    }

    pub(crate) fn emit_description(&mut self, stmt: &Statement, indent: usize) {
        text::emit_text_value(&mut self.doc, indent, "description", &stmt.arg);
        self.check(stmt, &[]);
    }

    pub(crate) fn check(&mut self, stmt: &Statement, handled: &[Keyword]) {
        let path = self.links.path_of(stmt).to_string();
        self.diags.check_substmts(&path, stmt, handled);
    }
}

/// Translate one module into its document text. Callers translating several
/// modules build one context per module; the local-prefix field is write-once.
pub fn translate_module<'a>(
    module: &'a Statement,
    ctx: &TranslationContext<'_>,
    links: &'a Links<'a>,
    registry: &'a ModuleRegistry<'a>,
    diags: Diagnostics,
) -> (String, Diagnostics) {
    let mut emitter = Emitter::new(ctx, links, registry, diags);
    emitter.emit_module(module);
    emitter.finish()
}

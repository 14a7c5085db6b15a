//! Metadata emission.
//!
//! YANG statements with no structural equivalent in TOSCA are folded into one
//! nested `metadata:` block: yang-version, organization, contact, namespace,
//! prefix, belongs-to, revision history, reference text, and feature
//! declarations. The block is emitted only when at least one of them is
//! present. Emitting `prefix` is also where the context's local prefix is
//! recorded for later qualified-name resolution.

use super::Emitter;
use crate::text;
use crate::yang::{Keyword, Statement};

impl Emitter<'_, '_> {
    pub(crate) fn emit_metadata(&mut self, stmt: &Statement, indent: usize) {
        let yang_version = stmt.find(Keyword::YangVersion);
        let organization = stmt.find(Keyword::Organization);
        let contact = stmt.find(Keyword::Contact);
        let namespace = stmt.find(Keyword::Namespace);
        let prefix = stmt.find(Keyword::Prefix);
        let belongs_to = stmt.find(Keyword::BelongsTo);
        let revisions: Vec<&Statement> = stmt.find_all(Keyword::Revision).collect();
        let reference = stmt.find(Keyword::Reference);
        let features: Vec<&Statement> = stmt.find_all(Keyword::Feature).collect();

        let any_present = yang_version.is_some()
            || organization.is_some()
            || contact.is_some()
            || reference.is_some()
            || !revisions.is_empty()
            || !features.is_empty()
            || namespace.is_some()
            || prefix.is_some()
            || belongs_to.is_some();
        if !any_present {
            return;
        }

        self.doc.line(indent, "metadata:");
        let indent = indent + 1;
        if let Some(s) = yang_version {
            self.doc.line(indent, format!("yang-version: {}", s.arg));
            self.check(s, &[]);
        }
        if let Some(s) = organization {
            text::emit_text_value(&mut self.doc, indent, "organization", &s.arg);
            self.check(s, &[]);
        }
        if let Some(s) = contact {
            text::emit_text_value(&mut self.doc, indent, "contact", &s.arg);
            self.check(s, &[]);
        }
        if let Some(s) = namespace {
            self.doc.line(indent, format!("namespace: {}", s.arg));
        }
        if let Some(s) = prefix {
            self.emit_prefix(s, indent);
        }
        if let Some(s) = belongs_to {
            self.doc.line(indent, format!("belongs-to: {}", s.arg));
        }
        if !revisions.is_empty() {
            self.emit_revisions(&revisions, indent);
        }
        if let Some(s) = reference {
            self.emit_reference(s, indent);
        }
        if !features.is_empty() {
            self.emit_features(&features, indent);
        }
    }

    fn emit_prefix(&mut self, stmt: &Statement, indent: usize) {
        self.doc.line(indent, "# TOSCA does not support prefix for local namespaces");
        self.doc.line(indent, format!("prefix: {}", stmt.arg));
        // Needed later for qualified-name resolution.
        self.ctx.set_local_prefix(&stmt.arg);
    }

    fn emit_revisions(&mut self, revisions: &[&Statement], indent: usize) {
        self.doc.line(indent, "revisions:");
        for revision in revisions {
            self.emit_revision(revision, indent + 1);
        }
    }

    fn emit_revision(&mut self, stmt: &Statement, indent: usize) {
        let description = stmt.find(Keyword::Description);
        let reference = stmt.find(Keyword::Reference);
        self.check(stmt, &[Keyword::Description, Keyword::Reference]);

        if description.is_none() && reference.is_none() {
            return;
        }
        self.doc.line(indent, format!("'{}':", stmt.arg));
        let indent = indent + 1;
        if let Some(d) = description {
            self.emit_description(d, indent);
        }
        if let Some(r) = reference {
            self.emit_reference(r, indent);
        }
    }

    pub(crate) fn emit_reference(&mut self, stmt: &Statement, indent: usize) {
        text::emit_text_value(&mut self.doc, indent, "reference", &stmt.arg);
        self.check(stmt, &[]);
    }

    fn emit_features(&mut self, features: &[&Statement], indent: usize) {
        self.doc.line(indent, "features:");
        for feature in features {
            self.emit_feature(feature, indent + 1);
        }
    }

    fn emit_feature(&mut self, stmt: &Statement, indent: usize) {
        let description = stmt.find(Keyword::Description);
        let reference = stmt.find(Keyword::Reference);
        let status = stmt.find(Keyword::Status);
        self.check(stmt, &[Keyword::Description, Keyword::Reference, Keyword::Status]);

        if description.is_none() && reference.is_none() && status.is_none() {
            return;
        }
        self.doc.line(indent, format!("'{}':", stmt.arg));
        let indent = indent + 1;
        if let Some(d) = description {
            self.emit_description(d, indent);
        }
        if let Some(r) = reference {
            self.emit_reference(r, indent);
        }
        if let Some(s) = status {
            self.doc.line(indent, format!("status: {}", s.arg));
        }
    }
}

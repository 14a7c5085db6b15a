//! Recursive data-type and property emission. The core of the translator.
//!
//! Every typedef, grouping, container, list, and module-level augment becomes
//! one top-level TOSCA data type. Containers, lists, and groupings are
//! processed twice: once as a data type definition and once as a property
//! definition inside their parent's type. Nested definitions are recursed
//! before the enclosing type so every referenced name exists before or
//! alongside its use.
//!
//! Structure rules:
//! - a container/list whose only structural content is a single `uses` gets
//!   no type of its own; references name the grouping directly;
//! - the first `uses` of a node becomes `derived_from` (TOSCA is single
//!   inheritance); properties of any further `uses` are copied inline under a
//!   provenance comment;
//! - a child with `config false` is an attribute, emitted under a commented
//!   attributes marker because TOSCA data types have no attribute concept.

use super::Emitter;
use crate::config::UNION_MARKER;
use crate::constraints::{parse_length_expr, parse_range_expr, Bound};
use crate::text;
use crate::yang::{Keyword, Statement};

const HANDLED_TYPEDEF: &[Keyword] = &[
    Keyword::Default,
    Keyword::Description,
    Keyword::Reference,
    Keyword::Type,
    Keyword::Units,
];

const HANDLED_GROUPING: &[Keyword] = &[
    Keyword::Choice,
    Keyword::Container,
    Keyword::Description,
    Keyword::Grouping,
    Keyword::Leaf,
    Keyword::LeafList,
    Keyword::List,
    Keyword::Reference,
    Keyword::Typedef,
    Keyword::Uses,
];

const HANDLED_AUGMENTED: &[Keyword] = &[
    Keyword::Case,
    Keyword::Choice,
    Keyword::Container,
    Keyword::Description,
    Keyword::IfFeature,
    Keyword::Leaf,
    Keyword::LeafList,
    Keyword::List,
    Keyword::Reference,
    Keyword::Uses,
    Keyword::When,
];

const HANDLED_TYPE: &[Keyword] = &[
    Keyword::Bit,
    Keyword::Enum,
    Keyword::FractionDigits,
    Keyword::Length,
    Keyword::Range,
    Keyword::Pattern,
    Keyword::Path,
    Keyword::Type,
];

const HANDLED_LEAF: &[Keyword] = &[
    Keyword::Reference,
    Keyword::Description,
    Keyword::Type,
    Keyword::Units,
    Keyword::Config,
    Keyword::Mandatory,
    Keyword::Default,
    Keyword::Must,
    Keyword::When,
];

const HANDLED_LEAF_LIST: &[Keyword] = &[
    Keyword::Reference,
    Keyword::Description,
    Keyword::Type,
    Keyword::Units,
    Keyword::Config,
    Keyword::MinElements,
    Keyword::MaxElements,
    Keyword::Must,
    Keyword::When,
];

const HANDLED_LIST: &[Keyword] = &[
    Keyword::Reference,
    Keyword::Description,
    Keyword::Config,
    Keyword::OrderedBy,
    Keyword::Typedef,
    Keyword::Container,
    Keyword::Grouping,
    Keyword::List,
    Keyword::Uses,
    Keyword::Key,
    Keyword::Unique,
    Keyword::Leaf,
    Keyword::LeafList,
    Keyword::MinElements,
    Keyword::MaxElements,
    Keyword::When,
    Keyword::Must,
];

const HANDLED_CONTAINER: &[Keyword] = &[
    Keyword::Reference,
    Keyword::Description,
    Keyword::Config,
    Keyword::Presence,
    Keyword::Typedef,
    Keyword::Container,
    Keyword::Grouping,
    Keyword::List,
    Keyword::Uses,
    Keyword::Leaf,
    Keyword::LeafList,
    Keyword::When,
    Keyword::Must,
];

const HANDLED_CHOICE: &[Keyword] = &[
    Keyword::Case,
    Keyword::Config,
    Keyword::Default,
    Keyword::Description,
    Keyword::Leaf,
    Keyword::Mandatory,
];

const HANDLED_CASE: &[Keyword] = &[
    Keyword::Leaf,
    Keyword::LeafList,
    Keyword::List,
    Keyword::Container,
    Keyword::Choice,
    Keyword::Description,
];

const HANDLED_AUGMENT_PROPERTY: &[Keyword] = &[
    Keyword::Reference,
    Keyword::Description,
    Keyword::Container,
    Keyword::List,
    Keyword::Uses,
    Keyword::Leaf,
    Keyword::LeafList,
    Keyword::When,
    Keyword::Must,
];

/// An attribute is a statement carrying a `config false` substatement.
pub fn is_attribute(stmt: &Statement) -> bool {
    stmt.find(Keyword::Config).is_some_and(|c| c.arg == "false")
}

/// True when the statement's only structural content is exactly one `uses`:
/// no separate data type is generated for it.
pub fn has_single_uses_only(stmt: &Statement) -> bool {
    if stmt.find_all(Keyword::Uses).count() != 1 {
        return false;
    }
    !stmt.substmts.iter().any(|s| s.keyword.is_structural())
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit('/').find(|seg| !seg.is_empty()).unwrap_or(path)
}

impl Emitter<'_, '_> {
    /// Emit top-level data types for everything defined under `stmt`:
    /// typedefs, groupings, containers, lists, augments under `uses`,
    /// definitions inside choice cases, and module-level augments.
    pub(crate) fn emit_data_types_in_stmt(&mut self, stmt: &Statement, indent: usize) {
        for typedef in stmt.find_all(Keyword::Typedef) {
            self.emit_typedef(typedef, indent);
            self.doc.blank();
        }

        for grouping in stmt.find_all(Keyword::Grouping) {
            self.emit_grouping(grouping, indent);
            self.doc.blank();
        }

        // A container with a single 'uses' only needs no type of its own; the
        // grouping's type is referenced instead.
        for container in stmt.find_all(Keyword::Container) {
            if !has_single_uses_only(container) {
                self.emit_data_type(container, indent);
                self.doc.blank();
            }
        }

        for list in stmt.find_all(Keyword::List) {
            if !has_single_uses_only(list) {
                self.emit_data_type(list, indent);
                self.doc.blank();
            }
        }

        // An augment nested in a 'uses' is a deviation needing manual review,
        // but it goes through the same machinery.
        for uses in stmt.find_all(Keyword::Uses) {
            for augment in uses.find_all(Keyword::Augment) {
                self.diags
                    .warn(format!("review <{}> augments <{}>", augment.arg, uses.arg));
                self.emit_data_type(augment, indent);
                self.doc.blank();
            }
        }

        for choice in stmt.find_all(Keyword::Choice) {
            for case in choice.find_all(Keyword::Case) {
                self.emit_data_types_in_stmt(case, indent);
            }
        }

        for augment in stmt.find_all(Keyword::Augment) {
            self.emit_augmented_type(augment, indent);
            self.doc.blank();
        }
    }

    fn emit_typedef(&mut self, stmt: &Statement, indent: usize) {
        self.doc.line(indent, format!("{}:", stmt.arg));
        let indent = indent + 1;
        if let Some(d) = stmt.find(Keyword::Description) {
            self.emit_description(d, indent);
        }
        if let Some(t) = stmt.find(Keyword::Type) {
            self.emit_derived_from(t, indent);
        }
        if let Some(u) = stmt.find(Keyword::Units) {
            self.emit_units(u, indent);
        }
        if let Some(d) = stmt.find(Keyword::Default) {
            self.emit_commented_default(d, indent);
        }
        self.emit_metadata(stmt, indent);

        self.check(stmt, HANDLED_TYPEDEF);
    }

    /// Wrapper so grouping children are checked against the grouping's own
    /// allow-list; the emission itself is shared with container/list.
    fn emit_grouping(&mut self, stmt: &Statement, indent: usize) {
        self.emit_data_type(stmt, indent);
        self.check(stmt, HANDLED_GROUPING);
    }

    /// Shared data-type emission for container, list, grouping, and
    /// augment-under-uses statements. Children are recursed into top-level
    /// types first; the statement's own substatement check happens in the
    /// property-position handlers, which see these statements a second time.
    fn emit_data_type(&mut self, stmt: &Statement, indent: usize) {
        self.emit_data_types_in_stmt(stmt, indent);

        self.doc.line(indent, format!("{}:", stmt.arg));
        let indent = indent + 1;
        if let Some(d) = stmt.find(Keyword::Description) {
            self.emit_description(d, indent);
        }
        self.emit_metadata(stmt, indent);

        // The grouping named by the first 'uses' becomes the TOSCA parent
        // type; TOSCA only has single inheritance.
        let uses: Vec<&Statement> = stmt.find_all(Keyword::Uses).collect();
        if let Some(first) = uses.first() {
            self.emit_uses_derived_from(first, indent);
        }

        if let Some(w) = stmt.find(Keyword::When) {
            self.emit_when(w, indent);
        }
        if let Some(m) = stmt.find(Keyword::Must) {
            self.emit_must(m, indent);
        }

        let has_props = self.has_properties(stmt);
        if has_props {
            self.doc.line(indent, "properties:");
            self.emit_properties(stmt, indent + 1, true, None);

            // Properties of every remaining 'uses' are copied inline.
            if uses.len() > 1 {
                self.emit_uses_properties(stmt, &uses[1..], indent + 1);
            }
        }

        // TOSCA data types do not support attributes; mark which property
        // definitions become attributes once the type is promoted to a node
        // type (out of scope here).
        if self.has_attributes(stmt) {
            self.doc.line(indent, "# TOSCA data types do not support attributes");
            self.doc.line(indent, "# Enable attributes when converting to a node type");
            if !has_props {
                self.doc.line(indent, "properties:");
            }
            self.doc.line(indent, "# attributes:");
            self.emit_properties(stmt, indent + 1, false, None);
        }
        if uses.len() > 1 {
            self.emit_uses_attributes(stmt, &uses[1..], indent + 1);
        }
    }

    /// A module-level augment becomes a new type derived from the type of the
    /// node it extends.
    fn emit_augmented_type(&mut self, stmt: &Statement, indent: usize) {
        self.emit_data_types_in_stmt(stmt, indent);

        let name = match self.links.target_of(stmt) {
            Some(target) => target.arg.clone(),
            None => {
                let path = self.links.path_of(stmt).to_string();
                self.diags
                    .warn(format!("{path}: augment target <{}> not resolved", stmt.arg));
                last_path_segment(&stmt.arg).to_string()
            }
        };

        self.doc.line(indent, format!("{name}:"));
        let indent = indent + 1;
        if let Some(d) = stmt.find(Keyword::Description) {
            self.emit_description(d, indent);
        }
        if let Some(f) = stmt.find(Keyword::IfFeature) {
            self.emit_if_feature(f, indent);
        }

        if !stmt.arg.starts_with('/') {
            self.diags
                .warn(format!("augment <{}> does not specify an absolute path", stmt.arg));
        }
        let derived_from = self.ctx.qualified_name(last_path_segment(&stmt.arg), None);
        self.doc.line(indent, format!("derived_from: {derived_from}"));

        self.emit_metadata(stmt, indent);
        if let Some(w) = stmt.find(Keyword::When) {
            self.emit_when(w, indent);
        }
        if let Some(m) = stmt.find(Keyword::Must) {
            self.emit_must(m, indent);
        }

        self.doc.line(indent, "properties:");
        self.emit_properties(stmt, indent + 1, true, None);
        let uses: Vec<&Statement> = stmt.find_all(Keyword::Uses).collect();
        if !uses.is_empty() {
            self.emit_uses_properties(stmt, &uses, indent + 1);
        }

        if self.has_attributes(stmt) {
            self.doc.line(indent, "# TOSCA data types do not support attributes");
            self.doc.line(indent, "# Enable attributes when converting to a node type");
            self.doc.line(indent, "# attributes:");
            self.emit_properties(stmt, indent + 1, false, None);
        }
        if !uses.is_empty() {
            self.emit_uses_attributes(stmt, &uses, indent + 1);
        }

        self.check(stmt, HANDLED_AUGMENTED);
    }

    // ------------------------- type references ---------------------------- //

    /// `derived_from:` for a typedef's type statement.
    fn emit_derived_from(&mut self, stmt: &Statement, indent: usize) {
        let tosca_type = match self.ctx.type_map.lookup(&stmt.arg) {
            Some(mapped) => mapped.to_string(),
            // Not a built-in type: use the name as is, minus the local prefix.
            None => self.ctx.qualified_name(&stmt.arg, None),
        };

        if tosca_type == UNION_MARKER {
            // TOSCA has no union types. Write out every member and leave the
            // selection to the operator.
            self.doc.line(
                indent,
                "# The YANG type is a union. Select one of the following options:",
            );
            for (count, member) in stmt.find_all(Keyword::Type).enumerate() {
                self.doc.line(indent, format!("# Option {}", count + 1));
                self.emit_derived_from(member, indent);
            }
            self.doc.line(indent, "#");
        } else {
            self.doc.line(indent, format!("derived_from: {tosca_type}"));
            if let Some(fd) = stmt.find(Keyword::FractionDigits) {
                self.emit_fraction_digits(fd, indent);
            }
            self.emit_constraints(stmt, indent);
        }

        self.check(stmt, HANDLED_TYPE);
    }

    /// `type:` for a leaf's type statement; same resolution as
    /// `emit_derived_from` plus the leafref path comment.
    fn emit_type(&mut self, stmt: &Statement, indent: usize, qualifier: Option<&str>) {
        let tosca_type = match self.ctx.type_map.lookup(&stmt.arg) {
            Some(mapped) => mapped.to_string(),
            None => self.ctx.qualified_name(&stmt.arg, qualifier),
        };

        if tosca_type == UNION_MARKER {
            self.doc.line(
                indent,
                "# The YANG type is a union. Select one of the following options:",
            );
            for (count, member) in stmt.find_all(Keyword::Type).enumerate() {
                self.doc.line(indent, format!("# Option {}", count + 1));
                self.emit_type(member, indent, None);
            }
            self.doc.line(indent, "#");
        } else {
            self.doc.line(indent, format!("type: {tosca_type}"));
            if let Some(p) = stmt.find(Keyword::Path) {
                self.emit_path(p, indent);
            }
            if let Some(fd) = stmt.find(Keyword::FractionDigits) {
                self.emit_fraction_digits(fd, indent);
            }
            self.emit_constraints(stmt, indent);
        }

        self.check(stmt, HANDLED_TYPE);
    }

    fn emit_uses_derived_from(&mut self, uses: &Statement, indent: usize) {
        // TODO: grouping names are assumed to be defined at module scope;
        // groupings defined lower in the hierarchy would need qualified names.
        let tosca_type = self.ctx.qualified_name(&uses.arg, None);
        self.doc.line(indent, format!("derived_from: {tosca_type}"));
    }

    /// Type name a property position refers to: the grouping for a pure
    /// single-uses statement, the statement's own name otherwise.
    fn property_type_name(&self, stmt: &Statement) -> String {
        match stmt.find(Keyword::Uses) {
            Some(uses) if has_single_uses_only(stmt) => self.ctx.qualified_name(&uses.arg, None),
            _ => stmt.arg.clone(),
        }
    }

    // --------------------------- properties -------------------------------- //

    /// True when the statement contributes at least one property of its own,
    /// directly or through the groupings of its second and later `uses`.
    fn has_properties(&self, stmt: &Statement) -> bool {
        if stmt
            .substmts
            .iter()
            .any(|s| s.keyword.is_structural() && !is_attribute(s))
        {
            return true;
        }
        let uses: Vec<&Statement> = stmt.find_all(Keyword::Uses).collect();
        if uses.len() > 1 {
            for u in &uses[1..] {
                if let Some(grouping) = self.links.grouping_of(u) {
                    if self.has_properties(grouping) {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn has_attributes(&self, stmt: &Statement) -> bool {
        if stmt
            .substmts
            .iter()
            .any(|s| s.keyword.is_structural() && is_attribute(s))
        {
            return true;
        }
        let uses: Vec<&Statement> = stmt.find_all(Keyword::Uses).collect();
        if uses.len() > 1 {
            for u in &uses[1..] {
                if let Some(grouping) = self.links.grouping_of(u) {
                    if self.has_attributes(grouping) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Emit property (or attribute) definitions for the structural children
    /// of `stmt`, preserving their declaration order.
    fn emit_properties(
        &mut self,
        stmt: &Statement,
        indent: usize,
        prop: bool,
        qualifier: Option<&str>,
    ) {
        for sub in &stmt.substmts {
            match &sub.keyword {
                Keyword::Leaf => self.emit_leaf(sub, indent, prop, qualifier),
                Keyword::LeafList => self.emit_leaf_list(sub, indent, prop, qualifier),
                Keyword::List => self.emit_list_property(sub, indent, prop, qualifier),
                Keyword::Container => self.emit_container_property(sub, indent, prop, qualifier),
                Keyword::Choice => self.emit_choice(sub, indent, prop, qualifier),
                Keyword::Augment => self.emit_augment_property(sub, indent, prop, qualifier),
                _ => {} // not a property definition
            }
        }
    }

    fn emit_uses_properties(&mut self, stmt: &Statement, uses: &[&Statement], indent: usize) {
        for u in uses {
            self.emit_use(stmt, u, indent, true);
        }
    }

    fn emit_uses_attributes(&mut self, stmt: &Statement, uses: &[&Statement], indent: usize) {
        for u in uses {
            self.emit_use(stmt, u, indent, false);
        }
    }

    /// Copy the properties (or attributes) of a `uses`'d grouping inline,
    /// under a comment naming where they came from.
    fn emit_use(&mut self, stmt: &Statement, use_stmt: &Statement, indent: usize, prop: bool) {
        let Some(grouping) = self.links.grouping_of(use_stmt) else {
            if self.warned_uses.insert(use_stmt.id) {
                let path = self.links.path_of(stmt).to_string();
                self.diags.warn(format!("{path}: uses({}) not found", use_stmt.arg));
            }
            return;
        };

        if (prop && !self.has_properties(grouping)) || (!prop && !self.has_attributes(grouping)) {
            return;
        }

        // Keep the namespace prefix only when it names a foreign module.
        let qualifier = match use_stmt.arg.split_once(':') {
            Some((p, _)) if self.ctx.local_prefix() != Some(p) => Some(p.to_string()),
            _ => None,
        };

        let kind = if prop { "properties" } else { "attributes" };
        self.doc.line(indent, format!("# {kind} from '{}'", use_stmt.arg));
        if let Some(f) = use_stmt.find(Keyword::IfFeature) {
            self.doc.line(
                indent,
                format!("# Used only if the '{}' feature is enabled", f.arg),
            );
        }
        self.emit_properties(grouping, indent, prop, qualifier.as_deref());
    }

    fn emit_leaf(&mut self, stmt: &Statement, indent: usize, prop: bool, qualifier: Option<&str>) {
        let is_attr = is_attribute(stmt);
        if is_attr == prop {
            return;
        }

        let name = self.ctx.property_name(&stmt.arg);
        self.doc.line(indent, format!("{name}:"));
        let indent = indent + 1;
        if let Some(d) = stmt.find(Keyword::Description) {
            self.emit_description(d, indent);
        }
        self.emit_metadata(stmt, indent);
        if let Some(t) = stmt.find(Keyword::Type) {
            self.emit_type(t, indent, qualifier);
        }
        if !is_attr {
            self.emit_mandatory(stmt.find(Keyword::Mandatory), indent);
        }
        if let Some(d) = stmt.find(Keyword::Default) {
            self.emit_default(d, indent);
        }
        if let Some(u) = stmt.find(Keyword::Units) {
            self.emit_units(u, indent);
        }
        if let Some(w) = stmt.find(Keyword::When) {
            self.emit_when(w, indent);
        }
        if let Some(m) = stmt.find(Keyword::Must) {
            self.emit_must(m, indent);
        }

        self.check(stmt, HANDLED_LEAF);
    }

    fn emit_leaf_list(
        &mut self,
        stmt: &Statement,
        indent: usize,
        prop: bool,
        qualifier: Option<&str>,
    ) {
        if is_attribute(stmt) == prop {
            return;
        }

        let name = self.ctx.property_name(&stmt.arg);
        self.doc.line(indent, format!("{name}:"));
        let indent = indent + 1;
        if let Some(d) = stmt.find(Keyword::Description) {
            self.emit_description(d, indent);
        }
        self.emit_metadata(stmt, indent);
        self.doc.line(indent, "type: list");
        if let Some(t) = stmt.find(Keyword::Type) {
            self.doc.line(indent, "entry_schema:");
            self.emit_type(t, indent + 1, qualifier);
        }
        if let Some(u) = stmt.find(Keyword::Units) {
            self.emit_units(u, indent);
        }
        // min-elements/max-elements live on the leaf-list itself.
        self.emit_constraints(stmt, indent);
        if let Some(w) = stmt.find(Keyword::When) {
            self.emit_when(w, indent);
        }
        if let Some(m) = stmt.find(Keyword::Must) {
            self.emit_must(m, indent);
        }

        self.check(stmt, HANDLED_LEAF_LIST);
    }

    fn emit_list_property(
        &mut self,
        stmt: &Statement,
        indent: usize,
        prop: bool,
        qualifier: Option<&str>,
    ) {
        if is_attribute(stmt) == prop {
            return;
        }

        // A single-uses list references the grouping as its entry schema.
        let entry_schema = self.property_type_name(stmt);
        let entry_schema = match qualifier {
            Some(q) => format!("{q}:{entry_schema}"),
            None => entry_schema,
        };

        let name = self.ctx.property_name(&stmt.arg);
        self.doc.line(indent, format!("{name}:"));
        let indent = indent + 1;
        if let Some(d) = stmt.find(Keyword::Description) {
            self.emit_description(d, indent);
        }
        self.emit_metadata(stmt, indent);
        self.doc.line(indent, "type: list");
        self.doc.line(indent, format!("entry_schema: {entry_schema}"));
        self.emit_constraints(stmt, indent);
        if let Some(k) = stmt.find(Keyword::Key) {
            self.doc.line(indent, format!("# key: {}", k.arg));
        }
        if let Some(u) = stmt.find(Keyword::Unique) {
            self.doc.line(indent, format!("# unique: {}", u.arg));
        }
        if let Some(o) = stmt.find(Keyword::OrderedBy) {
            self.doc.line(indent, format!("# ordered-by: {}", o.arg));
        }

        self.check(stmt, HANDLED_LIST);
    }

    fn emit_container_property(
        &mut self,
        stmt: &Statement,
        indent: usize,
        prop: bool,
        qualifier: Option<&str>,
    ) {
        if is_attribute(stmt) == prop {
            return;
        }

        let type_name = self.property_type_name(stmt);
        let type_name = match qualifier {
            Some(q) => format!("{q}:{type_name}"),
            None => type_name,
        };

        let name = self.ctx.property_name(&stmt.arg);
        self.doc.line(indent, format!("{name}:"));
        let indent = indent + 1;
        if let Some(d) = stmt.find(Keyword::Description) {
            self.emit_description(d, indent);
        }
        self.emit_metadata(stmt, indent);
        self.doc.line(indent, format!("type: {type_name}"));
        if let Some(m) = stmt.find(Keyword::Must) {
            self.emit_must(m, indent);
        }
        if let Some(p) = stmt.find(Keyword::Presence) {
            self.doc.line(indent, format!("# presence: {}", p.arg));
        }

        self.check(stmt, HANDLED_CONTAINER);
    }

    /// TOSCA has no discriminated unions: a choice flattens into one
    /// string-typed selector property constrained to the option names,
    /// followed by a commented property block per option.
    fn emit_choice(
        &mut self,
        stmt: &Statement,
        indent: usize,
        prop: bool,
        qualifier: Option<&str>,
    ) {
        let is_attr = is_attribute(stmt);
        if is_attr == prop {
            return;
        }

        // Without explicit cases, each leaf stands for a single-leaf case.
        let cases: Vec<&Statement> = stmt.find_all(Keyword::Case).collect();
        let leafs: Vec<&Statement> = stmt.find_all(Keyword::Leaf).collect();
        let options: &[&Statement] = if !cases.is_empty() { &cases } else { &leafs };

        let name = self.ctx.property_name(&stmt.arg);
        self.doc.line(indent, format!("{name}:"));
        let orig_indent = indent;
        let indent = indent + 1;
        if let Some(d) = stmt.find(Keyword::Description) {
            self.emit_description(d, indent);
        }
        // The selector is always a string.
        self.doc.line(indent, "type: string");
        if !is_attr {
            self.emit_mandatory(stmt.find(Keyword::Mandatory), indent);
        }
        if let Some(d) = stmt.find(Keyword::Default) {
            self.emit_default(d, indent);
        }
        self.doc.line(indent, "constraints:");
        self.doc.line(indent + 1, "- valid_values:");
        for option in options {
            self.doc.line(indent + 2, format!("- {}", option.arg));
        }

        let indent = orig_indent;
        self.doc.line(indent, "# Select one of the following options");
        self.doc.line(indent, "#");
        for case in &cases {
            self.emit_case(case, indent, qualifier);
        }
        for leaf in &leafs {
            self.doc.line(
                indent,
                format!("# The following properties are used in case of '{}'", leaf.arg),
            );
            self.emit_leaf(leaf, indent, true, qualifier);
        }
        self.doc.line(indent, "# End of options");
        self.doc.line(indent, "#");

        self.check(stmt, HANDLED_CHOICE);
    }

    fn emit_case(&mut self, stmt: &Statement, indent: usize, qualifier: Option<&str>) {
        self.doc.line(
            indent,
            format!("# The following properties are used in case of '{}'", stmt.arg),
        );
        if let Some(d) = stmt.find(Keyword::Description) {
            for line in text::wrap_text(&d.arg) {
                self.doc.line(indent + 1, format!("# {line}"));
            }
        }
        self.emit_properties(stmt, indent, true, qualifier);

        self.check(stmt, HANDLED_CASE);
    }

    /// An augment in property position references the type generated for it.
    fn emit_augment_property(
        &mut self,
        stmt: &Statement,
        indent: usize,
        prop: bool,
        _qualifier: Option<&str>, // augment targets are never qualified
    ) {
        if is_attribute(stmt) == prop {
            return;
        }

        let name = self.ctx.property_name(&stmt.arg);
        self.doc.line(indent, format!("{name}:"));
        let indent = indent + 1;
        if let Some(d) = stmt.find(Keyword::Description) {
            self.emit_description(d, indent);
        }
        self.emit_metadata(stmt, indent);
        self.doc.line(indent, format!("type: {}", stmt.arg));
        if let Some(m) = stmt.find(Keyword::Must) {
            self.emit_must(m, indent);
        }

        self.check(stmt, HANDLED_AUGMENT_PROPERTY);
    }

    // --------------------------- constraints ------------------------------- //

    /// Collect every constraint-bearing substatement and write one
    /// `constraints:` list, in a fixed order: length, range, patterns, enums,
    /// bits, cardinality bounds.
    fn emit_constraints(&mut self, stmt: &Statement, indent: usize) {
        let length = stmt.find(Keyword::Length);
        let in_range = stmt.find(Keyword::Range);
        let patterns: Vec<&Statement> = stmt.find_all(Keyword::Pattern).collect();
        let enums: Vec<&Statement> = stmt.find_all(Keyword::Enum).collect();
        let bits: Vec<&Statement> = stmt.find_all(Keyword::Bit).collect();
        let min_elements = stmt.find(Keyword::MinElements);
        let max_elements = stmt.find(Keyword::MaxElements);

        let any_present = length.is_some()
            || in_range.is_some()
            || !patterns.is_empty()
            || !enums.is_empty()
            || !bits.is_empty()
            || min_elements.is_some()
            || max_elements.is_some();
        if !any_present {
            return;
        }

        self.doc.line(indent, "constraints:");
        let indent = indent + 1;
        if let Some(l) = length {
            self.emit_length(l, indent);
        }
        if let Some(r) = in_range {
            self.emit_in_range(r, indent);
        }
        for p in &patterns {
            self.emit_pattern(p, indent);
        }
        if !enums.is_empty() {
            self.emit_enums(&enums, indent);
        }
        if !bits.is_empty() {
            self.emit_bits(&bits, indent);
        }
        if let Some(m) = min_elements {
            self.doc.line(indent, format!("- min_length: {}", m.arg));
        }
        if let Some(m) = max_elements {
            self.doc.line(indent, format!("- max_length: {}", m.arg));
        }
    }

    fn emit_length(&mut self, stmt: &Statement, indent: usize) {
        let clauses = parse_length_expr(&stmt.arg);
        if clauses.is_empty() {
            let path = self.links.path_of(stmt).to_string();
            self.diags.warn(format!("{path}: length({}) could not be parsed", stmt.arg));
            self.check(stmt, &[]);
            return;
        }

        if clauses.len() > 1 {
            // A multi-clause length is a disjunction TOSCA cannot express.
            self.doc.line(indent, "# This is not (yet) valid TOSCA. FIX MANUALLY");
            self.doc.line(indent, "- or:");
            let indent = indent + 1;
            for clause in &clauses {
                match &clause.high {
                    Some(high) => {
                        if !clause.low.is_low_sentinel() && !high.is_high_sentinel() {
                            self.doc.line(indent, "- and:");
                            self.doc
                                .line(indent + 1, format!("- min_length: {}", clause.low.render()));
                            self.doc.line(indent + 1, format!("- max_length: {}", high.render()));
                        } else {
                            if !clause.low.is_low_sentinel() {
                                self.doc
                                    .line(indent, format!("- min_length: {}", clause.low.render()));
                            }
                            if !high.is_high_sentinel() {
                                self.doc.line(indent, format!("- max_length: {}", high.render()));
                            }
                        }
                    }
                    None => {
                        if !matches!(clause.low, Bound::Max) {
                            self.doc.line(indent, format!("- max_length: {}", clause.low.render()));
                        }
                    }
                }
            }
        } else {
            let clause = &clauses[0];
            match &clause.high {
                Some(high) => {
                    // A bound equal to its sentinel means "no explicit bound".
                    if !clause.low.is_low_sentinel() {
                        self.doc.line(indent, format!("- min_length: {}", clause.low.render()));
                    }
                    if !high.is_high_sentinel() {
                        self.doc.line(indent, format!("- max_length: {}", high.render()));
                    }
                }
                None => {
                    if !matches!(clause.low, Bound::Max) {
                        self.doc.line(indent, format!("- max_length: {}", clause.low.render()));
                    }
                }
            }
        }

        self.check(stmt, &[]);
    }

    fn emit_in_range(&mut self, stmt: &Statement, indent: usize) {
        let clauses = parse_range_expr(&stmt.arg);
        if clauses.is_empty() {
            let path = self.links.path_of(stmt).to_string();
            self.diags.warn(format!("{path}: range({}) could not be parsed", stmt.arg));
            self.check(stmt, &[]);
            return;
        }

        // A range clause without a high bound is a single admissible value,
        // not a bound.
        let num_values = clauses.iter().filter(|c| c.is_single_value()).count();
        let num_ranges = clauses.len() - num_values;

        let mut indent = indent;
        if (num_values > 0 && num_ranges > 0) || num_ranges > 1 {
            self.doc.line(indent, "# This is not (yet) valid TOSCA. FIX MANUALLY");
            self.doc.line(indent, "- or:");
            indent += 1;
        }

        if num_values > 0 {
            self.doc.line(indent, "- valid_values:");
            for clause in clauses.iter().filter(|c| c.is_single_value()) {
                self.doc.line(indent + 1, format!("- {}", clause.low.render()));
            }
        }

        for clause in &clauses {
            if let Some(high) = &clause.high {
                self.doc.line(
                    indent,
                    format!("- in_range: [{}, {}]", clause.low.render(), high.render()),
                );
            }
        }

        self.check(stmt, &[]);
    }

    fn emit_pattern(&mut self, stmt: &Statement, indent: usize) {
        self.doc.line(indent, format!("- pattern: '{}'", stmt.arg));
        self.check(stmt, &[]);
    }

    fn emit_enums(&mut self, enums: &[&Statement], indent: usize) {
        self.doc.line(indent, "- valid_values:");
        for e in enums {
            self.emit_enum(e, indent + 1);
        }
    }

    fn emit_enum(&mut self, stmt: &Statement, indent: usize) {
        let literal = text::quote_if_needed(&stmt.arg);
        match stmt.find(Keyword::Value) {
            Some(v) => self.doc.line(indent, format!("- {literal}  # Value: {}", v.arg)),
            None => self.doc.line(indent, format!("- {literal}")),
        }
        if let Some(d) = stmt.find(Keyword::Description) {
            for line in text::wrap_text(&d.arg) {
                self.doc.line(indent + 1, format!("# {line}"));
            }
        }
        self.check(stmt, &[Keyword::Value, Keyword::Description]);
    }

    fn emit_bits(&mut self, bits: &[&Statement], indent: usize) {
        self.doc.line(indent, "- valid_values:");
        for b in bits {
            self.emit_bit(b, indent + 1);
        }
    }

    fn emit_bit(&mut self, stmt: &Statement, indent: usize) {
        self.doc.line(indent, format!("- {}", text::quote_if_needed(&stmt.arg)));
        if let Some(d) = stmt.find(Keyword::Description) {
            for line in text::wrap_text(&d.arg) {
                self.doc.line(indent + 1, format!("# {line}"));
            }
        }
        self.check(stmt, &[Keyword::Description]);
    }

    // ------------------------ small leaf details --------------------------- //

    fn emit_mandatory(&mut self, stmt: Option<&Statement>, indent: usize) {
        let required = stmt.map(|s| s.arg.as_str()).unwrap_or("false");
        self.doc.line(indent, format!("required: {required}"));
    }

    fn emit_default(&mut self, stmt: &Statement, indent: usize) {
        self.doc.line(indent, format!("default: {}", stmt.arg));
    }

    fn emit_commented_default(&mut self, stmt: &Statement, indent: usize) {
        self.doc.line(indent, "# TOSCA doesn't support 'default' here");
        self.doc.line(indent, format!("# default: {}", stmt.arg));
    }

    fn emit_units(&mut self, stmt: &Statement, indent: usize) {
        self.doc.line(indent, "# TOSCA uses scalar unit types");
        self.doc.line(indent, format!("# units: {}", stmt.arg));
    }

    fn emit_when(&mut self, stmt: &Statement, indent: usize) {
        self.doc.line(indent, format!("# when: {}", stmt.arg));
    }

    fn emit_must(&mut self, stmt: &Statement, indent: usize) {
        self.doc.line(indent, "# must:");
        self.doc.line(indent, format!("#   {}", stmt.arg));
        if let Some(e) = stmt.find(Keyword::ErrorMessage) {
            self.doc.line(indent, format!("#   error-message: {}", e.arg));
        }
        self.check(stmt, &[Keyword::ErrorMessage]);
    }

    fn emit_if_feature(&mut self, stmt: &Statement, indent: usize) {
        self.doc.line(indent, format!("# if-feature: {}", stmt.arg));
    }

    fn emit_path(&mut self, stmt: &Statement, indent: usize) {
        self.doc.line(indent, format!("# path: {}", stmt.arg));
    }

    fn emit_fraction_digits(&mut self, stmt: &Statement, indent: usize) {
        self.doc.line(indent, format!("# fraction-digits: {}", stmt.arg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Diagnostics;
    use crate::config::TypeMap;
    use crate::context::{NameStyle, TranslationContext};
    use crate::emit::translate_module;
    use crate::yang::parse::{parse_module, IdGen};
    use crate::yang::resolve::{link_module, Links, ModuleRegistry};

    fn translate(src: &str) -> (String, Vec<String>) {
        translate_with_style(src, NameStyle::Preserve)
    }

    fn translate_with_style(src: &str, style: NameStyle) -> (String, Vec<String>) {
        let mut ids = IdGen::new();
        let module = parse_module(src, &mut ids).expect("fixture parses");
        let modules = vec![module];
        let registry = ModuleRegistry::new(&modules);
        let mut links = Links::default();
        link_module(&modules[0], &registry, &mut links);

        let type_map = TypeMap::builtin();
        let ctx = TranslationContext::new(&type_map, style);
        let (out, diags) =
            translate_module(&modules[0], &ctx, &links, &registry, Diagnostics::quiet());
        (out, diags.warnings().to_vec())
    }

    #[test]
    fn bare_typedef_gets_exactly_name_and_derived_from() {
        let (out, _) = translate(
            "module demo { prefix d; typedef percent { type uint8; } }",
        );
        let idx = out.find("  percent:\n").expect("typedef emitted");
        let body = &out[idx..];
        let mut lines = body.lines();
        assert_eq!(lines.next(), Some("  percent:"));
        assert_eq!(lines.next(), Some("    derived_from: integer"));
        assert_eq!(lines.next(), Some(""));
    }

    #[test]
    fn typedef_constraints_follow_derived_from() {
        let (out, _) = translate(
            "module demo { prefix d; typedef port { type uint16 { range \"1..65535\"; } } }",
        );
        assert!(out.contains("    derived_from: integer\n"));
        assert!(out.contains("    constraints:\n"));
        assert!(out.contains("      - in_range: [1, 65535]\n"));
    }

    #[test]
    fn single_uses_container_is_elided() {
        let (out, _) = translate(
            "module demo { prefix d; \
             grouping endpoint { leaf host { type string; } } \
             container server { uses endpoint; } \
             container farm { container primary { uses endpoint; } } }",
        );
        // No type definition for the elided containers.
        assert!(!out.contains("\n  server:\n"));
        assert!(out.contains("\n  farm:\n"));
        // The property position references the grouping directly.
        assert!(out.contains("      primary:\n        type: endpoint\n"));
    }

    #[test]
    fn config_false_leafs_are_attributes_not_properties() {
        let (out, _) = translate(
            "module demo { prefix d; container state { \
             leaf admin-name { type string; } \
             leaf oper-status { type string; config false; } } }",
        );
        let props = out.find("    properties:\n").unwrap();
        let attrs = out.find("    # attributes:\n").unwrap();
        assert!(props < attrs);
        let admin = out.find("      admin-name:\n").unwrap();
        let oper = out.find("      oper-status:\n").unwrap();
        assert!(props < admin && admin < attrs, "property stays in the properties block");
        assert!(attrs < oper, "attribute appears only after the attributes marker");
        assert!(out.contains("    # TOSCA data types do not support attributes\n"));
        // Attributes never get a required line.
        assert!(!out[oper..].contains("required:"));
    }

    #[test]
    fn attribute_only_container_still_opens_properties_block() {
        let (out, _) = translate(
            "module demo { prefix d; container counters { \
             leaf in-octets { type uint64; config false; } } }",
        );
        let idx = out.find("  counters:\n").unwrap();
        let body = &out[idx..];
        assert!(body.contains("    properties:\n"));
        assert!(body.contains("    # attributes:\n"));
    }

    #[test]
    fn first_uses_derives_remaining_uses_copy_inline() {
        let (out, _) = translate(
            "module demo { prefix d; \
             grouping base { leaf a { type string; } } \
             grouping extra { leaf b { type string; } } \
             container mixed { uses base; uses extra; leaf own { type string; } } }",
        );
        let idx = out.find("\n  mixed:\n").unwrap();
        let body = &out[idx..];
        assert!(body.contains("    derived_from: base\n"));
        // 'extra' is copied, not derived from.
        assert!(!body.contains("derived_from: extra"));
        assert!(body.contains("      # properties from 'extra'\n"));
        assert!(body.contains("      b:\n"));
    }

    #[test]
    fn choice_flattens_to_string_selector_plus_option_blocks() {
        let (out, _) = translate(
            "module demo { prefix d; container conn { choice transport { \
             case tcp { leaf tcp-port { type uint16; } } \
             case udp { leaf udp-port { type uint16; } } } } }",
        );
        let idx = out.find("      transport:\n").unwrap();
        let body = &out[idx..];
        assert!(body.contains("        type: string\n"));
        assert!(body.contains("        constraints:\n"));
        assert!(body.contains("          - valid_values:\n"));
        assert!(body.contains("            - tcp\n"));
        assert!(body.contains("            - udp\n"));
        assert!(body.contains("      # Select one of the following options\n"));
        assert!(body.contains("      # The following properties are used in case of 'tcp'\n"));
        assert!(body.contains("      tcp-port:\n"));
        assert!(body.contains("      udp-port:\n"));
        assert!(body.contains("      # End of options\n"));
    }

    #[test]
    fn union_type_is_enumerated_as_commented_options() {
        let (out, _) = translate(
            "module demo { prefix d; typedef host { type union { \
             type string; type uint32; } } }",
        );
        assert!(out.contains(
            "    # The YANG type is a union. Select one of the following options:\n"
        ));
        assert!(out.contains("    # Option 1\n"));
        assert!(out.contains("    derived_from: string\n"));
        assert!(out.contains("    # Option 2\n"));
        assert!(out.contains("    derived_from: integer\n"));
    }

    #[test]
    fn unresolved_uses_warns_once_and_emission_completes() {
        let (out, warnings) = translate(
            "module demo { prefix d; \
             grouping ok { leaf a { type string; } } \
             container c { uses ok; uses missing-grouping; leaf x { type string; } } \
             typedef t { type string; } }",
        );
        let unresolved: Vec<&String> =
            warnings.iter().filter(|w| w.contains("uses(missing-grouping) not found")).collect();
        assert_eq!(unresolved.len(), 1);
        // Everything else still comes out: the unresolved grouping simply
        // contributes nothing.
        assert!(out.contains("\n  t:\n"));
        assert!(out.contains("    derived_from: ok\n"));
        assert!(out.contains("      x:\n"));
    }

    #[test]
    fn multi_clause_range_is_marked_for_review() {
        let (out, _) = translate(
            "module demo { prefix d; typedef odd { type uint8 { range \"1..10|20..30\"; } } }",
        );
        assert!(out.contains("      # This is not (yet) valid TOSCA. FIX MANUALLY\n"));
        assert!(out.contains("      - or:\n"));
        assert!(out.contains("        - in_range: [1, 10]\n"));
        assert!(out.contains("        - in_range: [20, 30]\n"));
    }

    #[test]
    fn single_value_range_becomes_valid_values() {
        let (out, _) = translate(
            "module demo { prefix d; typedef five { type uint8 { range \"5\"; } } }",
        );
        assert!(out.contains("      - valid_values:\n"));
        assert!(out.contains("        - 5\n"));
        assert!(!out.contains("in_range"));
    }

    #[test]
    fn length_sentinels_drop_their_bound() {
        let (out, _) = translate(
            "module demo { prefix d; typedef name { type string { length \"min..64\"; } } }",
        );
        assert!(!out.contains("min_length"));
        assert!(out.contains("      - max_length: 64\n"));
    }

    #[test]
    fn range_sentinels_render_unbounded() {
        let (out, _) = translate(
            "module demo { prefix d; typedef temp { type int32 { range \"min..100\"; } } }",
        );
        assert!(out.contains("      - in_range: [UNBOUNDED, 100]\n"));
    }

    #[test]
    fn enum_values_are_escaped_when_yaml_would_mistype_them() {
        let (out, _) = translate(
            "module demo { prefix d; typedef tri { type enumeration { \
             enum up { value 1; } enum \"42\"; enum \"true\"; } } }",
        );
        assert!(out.contains("        - up  # Value: 1\n"));
        assert!(out.contains("        - '42'\n"));
        assert!(out.contains("        - 'true'\n"));
    }

    #[test]
    fn leaf_list_emits_list_with_entry_schema() {
        let (out, _) = translate(
            "module demo { prefix d; container c { leaf-list tags { \
             type string; max-elements 8; } } }",
        );
        let idx = out.find("      tags:\n").unwrap();
        let body = &out[idx..];
        assert!(body.contains("        type: list\n"));
        assert!(body.contains("        entry_schema:\n"));
        assert!(body.contains("          type: string\n"));
        assert!(body.contains("          - max_length: 8\n"));
    }

    #[test]
    fn list_property_references_itself_as_entry_schema() {
        let (out, _) = translate(
            "module demo { prefix d; container c { list rule { \
             key name; leaf name { type string; } } } }",
        );
        let idx = out.find("      rule:\n").unwrap();
        let body = &out[idx..];
        assert!(body.contains("        type: list\n"));
        assert!(body.contains("        entry_schema: rule\n"));
        assert!(body.contains("        # key: name\n"));
    }

    #[test]
    fn module_level_augment_derives_from_target() {
        let (out, warnings) = translate(
            "module demo { prefix d; \
             container interfaces { list interface { leaf name { type string; } } } \
             augment \"/d:interfaces/d:interface\" { leaf mtu { type uint16; } } }",
        );
        let idx = out.find("\n  interface:\n").expect("augmented type emitted");
        let body = &out[idx..];
        assert!(body.contains("    derived_from: interface\n"));
        assert!(body.contains("    properties:\n"));
        assert!(body.contains("      mtu:\n"));
        assert!(!warnings.iter().any(|w| w.contains("absolute")));
    }

    #[test]
    fn relative_augment_path_warns() {
        let (_, warnings) = translate(
            "module demo { prefix d; container c { leaf x { type string; } } \
             augment \"c\" { leaf y { type string; } } }",
        );
        assert!(warnings.iter().any(|w| w.contains("does not specify an absolute path")));
    }

    #[test]
    fn augment_under_uses_warns_for_review() {
        let (out, warnings) = translate(
            "module demo { prefix d; \
             grouping g { leaf a { type string; } } \
             container c { uses g { augment extras { leaf b { type string; } } } \
             leaf own { type string; } } }",
        );
        assert!(warnings.iter().any(|w| w.contains("review <extras> augments <g>")));
        assert!(out.contains("\n  extras:\n"));
    }

    #[test]
    fn leafref_keeps_its_path_as_comment() {
        let (out, _) = translate(
            "module demo { prefix d; container c { leaf ref { \
             type leafref { path \"/d:c/d:other\"; } } leaf other { type string; } } }",
        );
        assert!(out.contains("        type: string\n"));
        assert!(out.contains("        # path: /d:c/d:other\n"));
    }

    #[test]
    fn camel_case_applies_to_property_names_only() {
        let (out, _) = translate_with_style(
            "module demo { prefix d; container mgmt-config { \
             leaf mgmt-address { type my-type; } } \
             typedef my-type { type string; } }",
            NameStyle::CamelCase,
        );
        // Property name transformed; type names untouched.
        assert!(out.contains("      mgmtAddress:\n"));
        assert!(out.contains("        type: my-type\n"));
        assert!(out.contains("\n  mgmt-config:\n"));
        assert!(out.contains("\n  my-type:\n"));
    }

    #[test]
    fn local_prefix_is_stripped_from_type_references() {
        let (out, _) = translate(
            "module demo { prefix d; typedef base { type string; } \
             typedef derived { type d:base; } }",
        );
        let idx = out.find("\n  derived:\n").unwrap();
        assert!(out[idx..].contains("    derived_from: base\n"));
    }

    #[test]
    fn mandatory_maps_to_required_with_false_default() {
        let (out, _) = translate(
            "module demo { prefix d; container c { \
             leaf a { type string; mandatory true; } leaf b { type string; } } }",
        );
        let a = out.find("      a:\n").unwrap();
        let b = out.find("      b:\n").unwrap();
        assert!(out[a..b].contains("        required: true\n"));
        assert!(out[b..].contains("        required: false\n"));
    }

    #[test]
    fn nested_types_are_emitted_before_the_enclosing_type() {
        let (out, _) = translate(
            "module demo { prefix d; container outer { \
             typedef inner-type { type string; } leaf x { type inner-type; } } }",
        );
        let inner = out.find("  inner-type:\n").unwrap();
        let outer = out.find("  outer:\n").unwrap();
        assert!(inner < outer);
    }

    #[test]
    fn consistency_checker_reports_unhandled_top_level_statements() {
        let (_, warnings) = translate(
            "module demo { prefix d; namespace \"urn:demo\"; rpc reset; }",
        );
        assert!(warnings.iter().any(|w| w == "/: rpc(reset) not handled"));
    }
}

//! Per-translation context.
//!
//! Built once per module and immutable afterward, except for the local
//! namespace prefix: that is written exactly once, when the module's own
//! `prefix` statement is emitted, and read for every qualified-name decision
//! after that. Translating several modules means one context per module, not
//! a shared one.

use once_cell::unsync::OnceCell;

use crate::config::TypeMap;

/// Naming style for emitted property and attribute names. Type names are
/// never transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    #[default]
    Preserve,
    CamelCase,
}

#[derive(Debug)]
pub struct TranslationContext<'a> {
    pub type_map: &'a TypeMap,
    pub name_style: NameStyle,
    local_prefix: OnceCell<String>,
}

impl<'a> TranslationContext<'a> {
    pub fn new(type_map: &'a TypeMap, name_style: NameStyle) -> Self {
        Self { type_map, name_style, local_prefix: OnceCell::new() }
    }

    /// Record the module's own prefix. First write wins; later writes are
    /// ignored (the value is read-many after the metadata pass).
    pub fn set_local_prefix(&self, prefix: &str) {
        let _ = self.local_prefix.set(prefix.to_string());
    }

    pub fn local_prefix(&self) -> Option<&str> {
        self.local_prefix.get().map(String::as_str)
    }

    /// Property/attribute name under the active naming style.
    pub fn property_name(&self, raw: &str) -> String {
        match self.name_style {
            NameStyle::Preserve => raw.to_string(),
            NameStyle::CamelCase => crate::text::camel_case(raw),
        }
    }

    /// Qualified-name fallback for type references that are not in the type
    /// map. A token carrying the local prefix has it stripped (TOSCA has no
    /// per-document prefixes); any other prefix is kept untouched. The
    /// optional qualifier marks properties copied out of a foreign grouping.
    pub fn qualified_name(&self, token: &str, qualifier: Option<&str>) -> String {
        let name = match token.split_once(':') {
            Some((prefix, rest)) => {
                if self.local_prefix() != Some(prefix) {
                    // Foreign or unknown prefix: reference stays as written.
                    return token.to_string();
                }
                rest
            }
            None => token,
        };
        match qualifier {
            Some(q) => format!("{q}:{name}"),
            None => name.to_string(),
        }
    }
}

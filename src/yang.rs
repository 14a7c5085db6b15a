//! YANG statement tree.
//!
//! A parsed module is a tree of [`Statement`] values: a keyword, one raw text
//! argument, and ordered substatements. Statement order is preserved because
//! it drives property ordering in the emitted document. The emitter never
//! mutates a statement; cross-references (`uses` → grouping, `augment` →
//! target) are resolved up front in [`resolve`] and looked up by statement id.

pub mod parse;
pub mod resolve;

use serde::{Serialize, Serializer};

/// Statement kinds consumed by the translator. The set is closed so handlers
/// can match exhaustively; anything else (extensions, vendor statements) lands
/// in `Other` and is only ever reported by the consistency checker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Keyword {
    Module,
    Submodule,
    Typedef,
    Grouping,
    Container,
    List,
    Leaf,
    LeafList,
    Choice,
    Case,
    Augment,
    Uses,
    Type,
    Range,
    Length,
    Pattern,
    Enum,
    Bit,
    Config,
    Default,
    Units,
    Mandatory,
    Description,
    Reference,
    Organization,
    Contact,
    Namespace,
    Prefix,
    BelongsTo,
    Revision,
    RevisionDate,
    YangVersion,
    Feature,
    IfFeature,
    Status,
    When,
    Must,
    ErrorMessage,
    ErrorAppTag,
    Key,
    Unique,
    OrderedBy,
    Presence,
    MinElements,
    MaxElements,
    Path,
    FractionDigits,
    Value,
    Position,
    Import,
    Include,
    Base,
    RequireInstance,
    Identity,
    Extension,
    Argument,
    YinElement,
    Anydata,
    Anyxml,
    Refine,
    Rpc,
    Action,
    Input,
    Output,
    Notification,
    Deviation,
    Deviate,
    Modifier,
    Other(String),
}

impl Keyword {
    pub fn parse(token: &str) -> Keyword {
        use Keyword::*;
        match token {
            "module" => Module,
            "submodule" => Submodule,
            "typedef" => Typedef,
            "grouping" => Grouping,
            "container" => Container,
            "list" => List,
            "leaf" => Leaf,
            "leaf-list" => LeafList,
            "choice" => Choice,
            "case" => Case,
            "augment" => Augment,
            "uses" => Uses,
            "type" => Type,
            "range" => Range,
            "length" => Length,
            "pattern" => Pattern,
            "enum" => Enum,
            "bit" => Bit,
            "config" => Config,
            "default" => Default,
            "units" => Units,
            "mandatory" => Mandatory,
            "description" => Description,
            "reference" => Reference,
            "organization" => Organization,
            "contact" => Contact,
            "namespace" => Namespace,
            "prefix" => Prefix,
            "belongs-to" => BelongsTo,
            "revision" => Revision,
            "revision-date" => RevisionDate,
            "yang-version" => YangVersion,
            "feature" => Feature,
            "if-feature" => IfFeature,
            "status" => Status,
            "when" => When,
            "must" => Must,
            "error-message" => ErrorMessage,
            "error-app-tag" => ErrorAppTag,
            "key" => Key,
            "unique" => Unique,
            "ordered-by" => OrderedBy,
            "presence" => Presence,
            "min-elements" => MinElements,
            "max-elements" => MaxElements,
            "path" => Path,
            "fraction-digits" => FractionDigits,
            "value" => Value,
            "position" => Position,
            "import" => Import,
            "include" => Include,
            "base" => Base,
            "require-instance" => RequireInstance,
            "identity" => Identity,
            "extension" => Extension,
            "argument" => Argument,
            "yin-element" => YinElement,
            "anydata" => Anydata,
            "anyxml" => Anyxml,
            "refine" => Refine,
            "rpc" => Rpc,
            "action" => Action,
            "input" => Input,
            "output" => Output,
            "notification" => Notification,
            "deviation" => Deviation,
            "deviate" => Deviate,
            "modifier" => Modifier,
            other => Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        use Keyword::*;
        match self {
            Module => "module",
            Submodule => "submodule",
            Typedef => "typedef",
            Grouping => "grouping",
            Container => "container",
            List => "list",
            Leaf => "leaf",
            LeafList => "leaf-list",
            Choice => "choice",
            Case => "case",
            Augment => "augment",
            Uses => "uses",
            Type => "type",
            Range => "range",
            Length => "length",
            Pattern => "pattern",
            Enum => "enum",
            Bit => "bit",
            Config => "config",
            Default => "default",
            Units => "units",
            Mandatory => "mandatory",
            Description => "description",
            Reference => "reference",
            Organization => "organization",
            Contact => "contact",
            Namespace => "namespace",
            Prefix => "prefix",
            BelongsTo => "belongs-to",
            Revision => "revision",
            RevisionDate => "revision-date",
            YangVersion => "yang-version",
            Feature => "feature",
            IfFeature => "if-feature",
            Status => "status",
            When => "when",
            Must => "must",
            ErrorMessage => "error-message",
            ErrorAppTag => "error-app-tag",
            Key => "key",
            Unique => "unique",
            OrderedBy => "ordered-by",
            Presence => "presence",
            MinElements => "min-elements",
            MaxElements => "max-elements",
            Path => "path",
            FractionDigits => "fraction-digits",
            Value => "value",
            Position => "position",
            Import => "import",
            Include => "include",
            Base => "base",
            RequireInstance => "require-instance",
            Identity => "identity",
            Extension => "extension",
            Argument => "argument",
            YinElement => "yin-element",
            Anydata => "anydata",
            Anyxml => "anyxml",
            Refine => "refine",
            Rpc => "rpc",
            Action => "action",
            Input => "input",
            Output => "output",
            Notification => "notification",
            Deviation => "deviation",
            Deviate => "deviate",
            Modifier => "modifier",
            Other(s) => s.as_str(),
        }
    }

    /// Structural children are the ones that turn into property or attribute
    /// definitions. Everything in this set honors `config false`.
    pub fn is_structural(&self) -> bool {
        use Keyword::*;
        matches!(self, Leaf | LeafList | List | Container | Choice | Augment)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Keyword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Stable per-run statement identity. Assigned by the parser from a shared
/// counter; the resolver keys its link maps on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StmtId(pub u32);

#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub id: StmtId,
    pub keyword: Keyword,
    pub arg: String,
    pub substmts: Vec<Statement>,
}

impl Statement {
    /// The unique child of the given kind, if any. Mirrors the upstream
    /// processor's single-child query; on duplicates the first wins.
    pub fn find(&self, kw: Keyword) -> Option<&Statement> {
        self.substmts.iter().find(|s| s.keyword == kw)
    }

    /// All children of the given kind, in document order.
    pub fn find_all(&self, kw: Keyword) -> impl Iterator<Item = &Statement> {
        self.substmts.iter().filter(move |s| s.keyword == kw)
    }

    /// The raw text argument of the unique child of the given kind.
    pub fn arg_of(&self, kw: Keyword) -> Option<&str> {
        self.find(kw).map(|s| s.arg.as_str())
    }

    pub fn has_child(&self, kw: Keyword) -> bool {
        self.find(kw).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_round_trips_through_parse() {
        for token in ["leaf-list", "belongs-to", "typedef", "fraction-digits"] {
            assert_eq!(Keyword::parse(token).as_str(), token);
        }
    }

    #[test]
    fn unknown_keyword_lands_in_other() {
        let kw = Keyword::parse("ex:annotation");
        assert_eq!(kw, Keyword::Other("ex:annotation".to_string()));
        assert_eq!(kw.as_str(), "ex:annotation");
    }

    #[test]
    fn structural_set_is_exactly_the_property_bearing_kinds() {
        assert!(Keyword::Leaf.is_structural());
        assert!(Keyword::Choice.is_structural());
        assert!(!Keyword::Typedef.is_structural());
        assert!(!Keyword::Uses.is_structural());
    }
}

//! Cross-reference resolution.
//!
//! The emitter consumes pre-resolved links: every `uses` points at its
//! grouping, every `augment` at the node it extends. Resolution happens here,
//! once, before emission; the emitter never re-resolves. Links are keyed by
//! statement id so the statement tree itself stays immutable and
//! parent-pointer free.

use std::collections::HashMap;

use crate::yang::{Keyword, Statement, StmtId};

/// Loaded modules, addressable by name. Used by the import emitter to recover
/// a referenced module's declared namespace, and by the resolver for prefixed
/// grouping references.
pub struct ModuleRegistry<'a> {
    modules: Vec<&'a Statement>,
    by_name: HashMap<&'a str, &'a Statement>,
}

impl<'a> ModuleRegistry<'a> {
    pub fn new<I>(modules: I) -> Self
    where
        I: IntoIterator<Item = &'a Statement>,
    {
        let modules: Vec<&'a Statement> = modules.into_iter().collect();
        let by_name = modules.iter().map(|m| (m.arg.as_str(), *m)).collect();
        Self { modules, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&'a Statement> {
        self.by_name.get(name).copied()
    }

    pub fn modules(&self) -> &[&'a Statement] {
        &self.modules
    }
}

/// Resolved cross-references plus structural paths for diagnostics.
#[derive(Default)]
pub struct Links<'a> {
    groupings: HashMap<StmtId, &'a Statement>,
    targets: HashMap<StmtId, &'a Statement>,
    paths: HashMap<StmtId, String>,
}

impl<'a> Links<'a> {
    /// The grouping a `uses` statement refers to, if it resolved.
    pub fn grouping_of(&self, uses: &Statement) -> Option<&'a Statement> {
        self.groupings.get(&uses.id).copied()
    }

    /// The node a module-level `augment` extends, if it resolved.
    pub fn target_of(&self, augment: &Statement) -> Option<&'a Statement> {
        self.targets.get(&augment.id).copied()
    }

    /// Structural path of a statement, for warnings. "/" for the module.
    pub fn path_of(&self, stmt: &Statement) -> &str {
        self.paths.get(&stmt.id).map(String::as_str).unwrap_or("/")
    }
}

/// Resolve one module's cross-references against the registry.
pub fn link_module<'a>(
    module: &'a Statement,
    registry: &ModuleRegistry<'a>,
    links: &mut Links<'a>,
) {
    let own_prefix = module.arg_of(Keyword::Prefix).map(str::to_owned);

    // prefix -> imported module name
    let mut prefix_map: HashMap<String, String> = HashMap::new();
    for import in module.find_all(Keyword::Import) {
        if let Some(p) = import.arg_of(Keyword::Prefix) {
            prefix_map.insert(p.to_string(), import.arg.clone());
        }
    }

    let mut scope: Vec<&'a Statement> = Vec::new();
    walk(module, "/", &mut scope, &Ctx { module, registry, own_prefix, prefix_map }, links);
}

struct Ctx<'a, 'r> {
    module: &'a Statement,
    registry: &'r ModuleRegistry<'a>,
    own_prefix: Option<String>,
    prefix_map: HashMap<String, String>,
}

fn walk<'a>(
    stmt: &'a Statement,
    parent_path: &str,
    scope: &mut Vec<&'a Statement>,
    ctx: &Ctx<'a, '_>,
    links: &mut Links<'a>,
) {
    let path = if stmt.keyword == Keyword::Module || stmt.keyword == Keyword::Submodule {
        "/".to_string()
    } else if contributes_to_path(&stmt.keyword) {
        if parent_path == "/" {
            format!("/{}", stmt.arg)
        } else {
            format!("{parent_path}/{}", stmt.arg)
        }
    } else {
        parent_path.to_string()
    };
    links.paths.insert(stmt.id, path.clone());

    match stmt.keyword {
        Keyword::Uses => {
            if let Some(g) = resolve_grouping(&stmt.arg, scope, ctx) {
                links.groupings.insert(stmt.id, g);
            }
        }
        Keyword::Augment => {
            if let Some(t) = resolve_augment_target(&stmt.arg, ctx) {
                links.targets.insert(stmt.id, t);
            }
        }
        _ => {}
    }

    scope.push(stmt);
    for sub in &stmt.substmts {
        walk(sub, &path, scope, ctx, links);
    }
    scope.pop();
}

fn contributes_to_path(kw: &Keyword) -> bool {
    use Keyword::*;
    matches!(
        kw,
        Container
            | List
            | Leaf
            | LeafList
            | Choice
            | Case
            | Grouping
            | Typedef
            | Augment
            | Uses
            | Rpc
            | Notification
    )
}

fn resolve_grouping<'a>(
    name: &str,
    scope: &[&'a Statement],
    ctx: &Ctx<'a, '_>,
) -> Option<&'a Statement> {
    let (prefix, local) = match name.split_once(':') {
        Some((p, rest)) => (Some(p), rest),
        None => (None, name),
    };

    match prefix {
        Some(p) if ctx.own_prefix.as_deref() != Some(p) => {
            // Foreign prefix: top-level groupings of the imported module.
            let module_name = ctx.prefix_map.get(p)?;
            let module = ctx.registry.get(module_name)?;
            module.find_all(Keyword::Grouping).find(|g| g.arg == local)
        }
        _ => {
            // Local name: innermost enclosing scope first, module outermost.
            scope
                .iter()
                .rev()
                .find_map(|s| s.find_all(Keyword::Grouping).find(|g| g.arg == local))
        }
    }
}

fn resolve_augment_target<'a>(path: &str, ctx: &Ctx<'a, '_>) -> Option<&'a Statement> {
    let last = path.rsplit('/').find(|seg| !seg.is_empty())?;
    let name = last.split_once(':').map(|(_, n)| n).unwrap_or(last);

    find_data_node(ctx.module, name).or_else(|| {
        ctx.registry
            .modules()
            .iter()
            .copied()
            .filter(|m| !std::ptr::eq(*m, ctx.module))
            .find_map(|m| find_data_node(m, name))
    })
}

fn find_data_node<'a>(root: &'a Statement, name: &str) -> Option<&'a Statement> {
    use Keyword::*;
    for sub in &root.substmts {
        if matches!(sub.keyword, Container | List | Choice | Case | Leaf | LeafList)
            && sub.arg == name
        {
            return Some(sub);
        }
        if let Some(found) = find_data_node(sub, name) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yang::parse::{parse_module, IdGen};

    fn load(srcs: &[&str]) -> Vec<Statement> {
        let mut ids = IdGen::new();
        srcs.iter().map(|s| parse_module(s, &mut ids).unwrap()).collect()
    }

    #[test]
    fn uses_resolves_to_module_level_grouping() {
        let modules = load(&[
            "module demo { prefix d; grouping g { leaf x { type string; } } \
             container c { uses g; } }",
        ]);
        let registry = ModuleRegistry::new(&modules);
        let mut links = Links::default();
        link_module(&modules[0], &registry, &mut links);

        let container = modules[0].find(Keyword::Container).unwrap();
        let uses = container.find(Keyword::Uses).unwrap();
        let g = links.grouping_of(uses).expect("grouping should resolve");
        assert_eq!(g.arg, "g");
    }

    #[test]
    fn innermost_grouping_shadows_outer() {
        let modules = load(&[
            "module demo { prefix d; grouping g { leaf outer { type string; } } \
             container c { grouping g { leaf inner { type string; } } uses g; } }",
        ]);
        let registry = ModuleRegistry::new(&modules);
        let mut links = Links::default();
        link_module(&modules[0], &registry, &mut links);

        let container = modules[0].find(Keyword::Container).unwrap();
        let uses = container.find(Keyword::Uses).unwrap();
        let g = links.grouping_of(uses).unwrap();
        assert_eq!(g.find(Keyword::Leaf).unwrap().arg, "inner");
    }

    #[test]
    fn prefixed_uses_resolves_through_import() {
        let modules = load(&[
            "module base { prefix b; namespace \"urn:base\"; \
             grouping shared { leaf y { type string; } } }",
            "module demo { prefix d; import base { prefix b; } \
             container c { uses b:shared; } }",
        ]);
        let registry = ModuleRegistry::new(&modules);
        let mut links = Links::default();
        link_module(&modules[1], &registry, &mut links);

        let container = modules[1].find(Keyword::Container).unwrap();
        let uses = container.find(Keyword::Uses).unwrap();
        assert_eq!(links.grouping_of(uses).unwrap().arg, "shared");
    }

    #[test]
    fn local_prefix_on_uses_is_treated_as_local() {
        let modules = load(&[
            "module demo { prefix d; grouping g { leaf x { type string; } } \
             container c { uses d:g; } }",
        ]);
        let registry = ModuleRegistry::new(&modules);
        let mut links = Links::default();
        link_module(&modules[0], &registry, &mut links);

        let uses = modules[0].find(Keyword::Container).unwrap().find(Keyword::Uses).unwrap();
        assert_eq!(links.grouping_of(uses).unwrap().arg, "g");
    }

    #[test]
    fn unresolved_uses_has_no_link() {
        let modules =
            load(&["module demo { prefix d; container c { uses missing; } }"]);
        let registry = ModuleRegistry::new(&modules);
        let mut links = Links::default();
        link_module(&modules[0], &registry, &mut links);

        let uses = modules[0].find(Keyword::Container).unwrap().find(Keyword::Uses).unwrap();
        assert!(links.grouping_of(uses).is_none());
    }

    #[test]
    fn augment_target_resolves_by_path_tail() {
        let modules = load(&[
            "module demo { prefix d; container interfaces { list interface { \
             leaf name { type string; } } } \
             augment \"/d:interfaces/d:interface\" { leaf mtu { type uint16; } } }",
        ]);
        let registry = ModuleRegistry::new(&modules);
        let mut links = Links::default();
        link_module(&modules[0], &registry, &mut links);

        let augment = modules[0].find(Keyword::Augment).unwrap();
        let target = links.target_of(augment).expect("target should resolve");
        assert_eq!(target.arg, "interface");
        assert_eq!(target.keyword, Keyword::List);
    }

    #[test]
    fn paths_name_nested_nodes() {
        let modules = load(&[
            "module demo { prefix d; container c { leaf x { type string; } } }",
        ]);
        let registry = ModuleRegistry::new(&modules);
        let mut links = Links::default();
        link_module(&modules[0], &registry, &mut links);

        let c = modules[0].find(Keyword::Container).unwrap();
        let x = c.find(Keyword::Leaf).unwrap();
        assert_eq!(links.path_of(&modules[0]), "/");
        assert_eq!(links.path_of(c), "/c");
        assert_eq!(links.path_of(x), "/c/x");
    }
}

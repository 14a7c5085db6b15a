//! Translator configuration: the YANG → TOSCA type map.
//!
//! Loaded once, before any translation starts. A config file that is missing,
//! unreadable, or unparseable aborts the run: an empty or wrong map would
//! silently corrupt every scalar type translation. When no file is given the
//! built-in map of the YANG built-in types applies.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

/// Reserved mapping target: the named type is a union and gets option-list
/// handling instead of a direct type emission.
pub const UNION_MARKER: &str = "union";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse '{path}' at {location}: {message}")]
    Parse { path: String, location: String, message: String },
}

/// Configuration file shape: a `type_map` mapping of YANG scalar type names
/// to TOSCA scalar type names.
#[derive(Debug, Default, Deserialize)]
pub struct ToscaConfig {
    #[serde(default)]
    pub type_map: IndexMap<String, String>,
}

/// Source scalar type name → target scalar type name. Entry order follows the
/// configuration file. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    map: IndexMap<String, String>,
}

impl TypeMap {
    pub fn lookup(&self, yang_type: &str) -> Option<&str> {
        self.map.get(yang_type).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The YANG built-in types (RFC 7950 section 4.2.4) and their closest
    /// TOSCA scalars.
    pub fn builtin() -> TypeMap {
        let entries = [
            ("binary", "string"),
            ("bits", "string"),
            ("boolean", "boolean"),
            ("decimal64", "float"),
            ("empty", "string"),
            ("enumeration", "string"),
            ("identityref", "string"),
            ("instance-identifier", "string"),
            ("int8", "integer"),
            ("int16", "integer"),
            ("int32", "integer"),
            ("int64", "integer"),
            ("leafref", "string"),
            ("string", "string"),
            ("uint8", "integer"),
            ("uint16", "integer"),
            ("uint32", "integer"),
            ("uint64", "integer"),
            ("union", UNION_MARKER),
        ];
        TypeMap {
            map: entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }
}

impl From<ToscaConfig> for TypeMap {
    fn from(cfg: ToscaConfig) -> Self {
        TypeMap { map: cfg.type_map }
    }
}

/// Load the type map: the built-in map when no file is given, otherwise the
/// file's `type_map` (with deserialization errors carrying the YAML path).
pub fn load_type_map(config_file: Option<&Path>) -> Result<TypeMap, ConfigError> {
    let Some(path) = config_file else {
        return Ok(TypeMap::builtin());
    };
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let cfg = from_yaml_with_path::<ToscaConfig>(&text).map_err(|(location, message)| {
        ConfigError::Parse { path: path.display().to_string(), location, message }
    })?;
    Ok(cfg.into())
}

/// Deserialize with document-path context in error messages.
fn from_yaml_with_path<T: serde::de::DeserializeOwned>(
    src: &str,
) -> Result<T, (String, String)> {
    let de = serde_yaml::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let location = err.path().to_string();
            Err((location, err.into_inner().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_map_covers_the_integer_family() {
        let map = TypeMap::builtin();
        for t in ["int8", "int16", "int32", "int64", "uint8", "uint64"] {
            assert_eq!(map.lookup(t), Some("integer"));
        }
        assert_eq!(map.lookup("union"), Some(UNION_MARKER));
        assert_eq!(map.lookup("my-custom-type"), None);
    }

    #[test]
    fn config_yaml_parses_in_file_order() {
        let cfg: ToscaConfig = from_yaml_with_path(
            "type_map:\n  int8: integer\n  counter64: integer\n  string: string\n",
        )
        .unwrap();
        let keys: Vec<&String> = cfg.type_map.keys().collect();
        assert_eq!(keys, ["int8", "counter64", "string"]);
    }

    #[test]
    fn parse_error_names_the_document_path() {
        let err = from_yaml_with_path::<ToscaConfig>("type_map: [not, a, mapping]\n")
            .unwrap_err();
        assert!(err.0.contains("type_map"));
    }

    #[test]
    fn missing_file_aborts() {
        let err = load_type_map(Some(Path::new("/nonexistent/map.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn no_config_falls_back_to_builtins() {
        let map = load_type_map(None).unwrap();
        assert_eq!(map.lookup("boolean"), Some("boolean"));
    }
}

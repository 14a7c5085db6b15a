//! Minimal CLI: parse → (tosca | tree)
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};

use crate::check::Diagnostics;
use crate::config;
use crate::context::{NameStyle, TranslationContext};
use crate::emit::translate_module;
use crate::yang::parse::{parse_module, IdGen};
use crate::yang::resolve::{link_module, Links, ModuleRegistry};
use crate::yang::Statement;

// ----------------------------------- TYPES --------------------------------- //

/// translate YANG modules to TOSCA Simple YAML data types
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// translate the input modules to a TOSCA definitions document
    Tosca(ToscaOut),
    /// parse the input modules and dump their statement trees as JSON
    Tree(TreeOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// Extra directories searched for *.yang modules referenced by
    /// import/include (loaded into the registry, not translated)
    #[arg(long)]
    path: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct ToscaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// YAML configuration file carrying the YANG -> TOSCA type map
    /// (built-in map of the YANG built-in types if omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// use camel case capitalization for property and attribute names
    #[arg(long, default_value_t = false)]
    camel_case: bool,

    /// output .yaml file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TreeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ------------------------------- IMPLEMENTATION ---------------------------- //

struct LoadedModules {
    /// Modules named on the command line, translated in order.
    inputs: Vec<Statement>,
    /// Modules found on the search path; registry lookups only.
    extra: Vec<Statement>,
}

impl InputSettings {
    fn load(&self) -> anyhow::Result<LoadedModules> {
        let mut ids = IdGen::new();

        let mut inputs = Vec::new();
        for source_path in resolve_file_path_patterns(&self.input)? {
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read '{}'", source_path.display()))?;
            let module = parse_module(&source, &mut ids)
                .with_context(|| format!("failed to parse '{}'", source_path.display()))?;
            inputs.push(module);
        }

        let mut extra = Vec::new();
        for dir in &self.path {
            let entries = std::fs::read_dir(dir)
                .with_context(|| format!("failed to read directory '{}'", dir.display()))?;
            for entry in entries {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("yang") {
                    continue;
                }
                let source = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read '{}'", path.display()))?;
                let module = parse_module(&source, &mut ids)
                    .with_context(|| format!("failed to parse '{}'", path.display()))?;
                extra.push(module);
            }
        }

        Ok(LoadedModules { inputs, extra })
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Tosca(target) => {
                // Type map first: a bad config aborts before any translation.
                let type_map = config::load_type_map(target.config.as_deref())?;
                let name_style =
                    if target.camel_case { NameStyle::CamelCase } else { NameStyle::Preserve };

                let loaded = target.input_settings.load()?;
                let all: Vec<&Statement> =
                    loaded.inputs.iter().chain(loaded.extra.iter()).collect();
                let registry = ModuleRegistry::new(all.iter().copied());
                let mut links = Links::default();
                for module in &all {
                    link_module(module, &registry, &mut links);
                }

                // One context per module: the local prefix is write-once.
                let mut output = String::new();
                for module in &loaded.inputs {
                    let ctx = TranslationContext::new(&type_map, name_style);
                    let (doc, _diags) =
                        translate_module(module, &ctx, &links, &registry, Diagnostics::new());
                    output.push_str(&doc);
                }

                write_output(target.out.as_deref(), &output)
            }
            Command::Tree(target) => {
                let loaded = target.input_settings.load()?;
                let trees = serde_json::to_string_pretty(&loaded.inputs)?;
                write_output(target.out.as_deref(), &trees)
            }
        }
    }
}

fn write_output(out: Option<&std::path::Path>, content: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create '{}'", parent.display()))?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("failed to write '{}'", path.display()))
        }
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

// ------------------------------ INTERNAL HELPERS --------------------------- //

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

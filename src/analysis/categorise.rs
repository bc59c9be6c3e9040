//! Frame classification.
//!
//! A frame's display name (`"{function} {url}:{line}:{column}"`) is run
//! through an ordered table of rules; the first rule that recognises the
//! frame decides its `{type, category}`. Frames nothing recognises belong
//! to the application.

use super::tree::Category;
use std::path::{Path, MAIN_SEPARATOR};

/// Result of classifying one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub frame_type: String,
    pub category: Category,
}

impl Classification {
    fn new(frame_type: impl Into<String>, category: Category) -> Self {
        Self {
            frame_type: frame_type.into(),
            category,
        }
    }

    fn core() -> Self {
        Self::new("core", Category::Core)
    }
}

/// A named classification rule
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&str) -> Option<Classification>,
}

/// Classification rules in priority order
pub const RULES: &[Rule] = &[
    Rule {
        name: "wasm",
        apply: wasm_frame,
    },
    Rule {
        name: "regexp",
        apply: regexp_frame,
    },
    Rule {
        name: "engine",
        apply: engine_frame,
    },
    Rule {
        name: "dependency",
        apply: dependency_frame,
    },
];

/// Engine subtype checks for names that do not reference a JS module
const ENGINE_RULES: &[(fn(&str) -> bool, EngineTag)] = &[
    (is_v8_code, EngineTag::V8),
    (is_stack_terminator, EngineTag::Core),
    (is_compiled_code, EngineTag::Cpp),
    (is_eval, EngineTag::Native),
];

#[derive(Debug, Clone, Copy)]
enum EngineTag {
    V8,
    Core,
    Cpp,
    Native,
}

impl EngineTag {
    fn classification(self) -> Classification {
        match self {
            Self::V8 => Classification::new("v8", Category::AllV8),
            Self::Core => Classification::core(),
            Self::Cpp => Classification::new("cpp", Category::AllV8),
            Self::Native => Classification::new("native", Category::AllV8),
        }
    }
}

/// Marker that V8 appends to compiled regular expression frames
pub const REGEXP_MARKER: &str = "[CODE:RegExp]";

/// Classify a frame by its composed display name
///
/// **Public** - main entry point for classification
pub fn categorise(name: &str, app_name: &str) -> Classification {
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(name))
        .unwrap_or_else(|| Classification::new(app_name, Category::App))
}

/// `/pattern/` display form for a compiled regexp frame name
pub fn regexp_display_name(name: &str) -> String {
    let pattern = name
        .find(" [CODE:RegExp]")
        .map_or(name, |end| &name[..end]);
    format!("/{}/", pattern)
}

fn wasm_frame(name: &str) -> Option<Classification> {
    let inner = name.strip_suffix(']')?;
    let tag = &inner[inner.rfind("[WASM:")? + "[WASM:".len()..];
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';

    (!tag.is_empty() && tag.chars().all(is_word))
        .then(|| Classification::new("wasm", Category::Wasm))
}

fn regexp_frame(name: &str) -> Option<Classification> {
    name.ends_with(REGEXP_MARKER)
        .then(|| Classification::new("regexp", Category::Regexp))
}

fn engine_frame(name: &str) -> Option<Classification> {
    if !references_module(name) {
        let tag = ENGINE_RULES
            .iter()
            .find(|(matches, _)| matches(name))
            .map_or(EngineTag::V8, |(_, tag)| *tag);
        return Some(tag.classification());
    }

    if name.contains(" native ") {
        Some(EngineTag::Native.classification())
    } else if is_node_core(name) {
        Some(Classification::core())
    } else {
        None
    }
}

fn dependency_frame(name: &str) -> Option<Classification> {
    dependency_name(name, MAIN_SEPARATOR).map(|dep| Classification::new(dep, Category::Deps))
}

/// Extract the innermost installed package (`@scope/name` or `name`) from a path
///
/// Only the last `node_modules` segment counts, so a dependency of a
/// dependency is attributed to itself rather than to the package that
/// pulled it in.
pub fn dependency_name(name: &str, separator: char) -> Option<String> {
    let marker = format!("{sep}node_modules{sep}", sep = separator);
    let rest = &name[name.rfind(&marker)? + marker.len()..];

    let (first, after) = rest.split_once(separator)?;
    if first.len() > 1 && first.starts_with('@') {
        if let Some((package, _)) = after.split_once(separator) {
            if !package.is_empty() {
                return Some(format!("{}/{}", first, package));
            }
        }
    }

    (!first.is_empty()).then(|| first.to_string())
}

fn references_module(name: &str) -> bool {
    name.contains(".js") || name.contains(".mjs") || name.contains("node:")
}

fn is_v8_code(name: &str) -> bool {
    ends_with_tagged(name, "[CODE:", "]") || ends_with_tagged(name, "v8::internal::", "[CPP]")
}

fn is_stack_terminator(name: &str) -> bool {
    name.ends_with('.')
}

fn is_compiled_code(name: &str) -> bool {
    name.ends_with("[CPP]") || name.ends_with("[SHARED_LIB]")
}

fn is_eval(name: &str) -> bool {
    name.contains("[eval]")
}

/// `prefix` occurs somewhere before a trailing `suffix`
fn ends_with_tagged(name: &str, prefix: &str, suffix: &str) -> bool {
    name.strip_suffix(suffix)
        .map_or(false, |head| head.contains(prefix))
}

/// Built-in modules are referenced by specifier rather than absolute path
fn is_node_core(name: &str) -> bool {
    name.split(' ')
        .nth(1)
        .map_or(true, |path| !Path::new(path).is_absolute())
}

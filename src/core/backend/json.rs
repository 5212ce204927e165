use std::{
    collections::{BTreeSet, HashSet},
    fmt,
    path::Path,
};

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, MapAccess, Visitor},
};
use serde_json::{Map, Value, ser::PrettyFormatter};

use super::{Backend, first_significant_char};
use crate::core::{
    data::{LanguageInfo, ResourceEntry, ResourceFile},
    error::{CatalogError, CatalogResult},
    utils::LineIndex,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonOptions {
    /// Spaces per indentation level.
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Write dotted keys as nested objects (`{"buttons": {"ok": ..}}`).
    /// Files whose keys cannot be nested unambiguously, or whose grouped keys
    /// are interleaved with others, are written flat.
    #[serde(default = "default_nested")]
    pub nested: bool,
}

fn default_indent() -> usize {
    2
}

fn default_nested() -> bool {
    true
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            nested: default_nested(),
        }
    }
}

/// JSON catalogs: `{"buttons": {"ok": "OK"}}` or `{"buttons.ok": "OK"}`.
///
/// Both layouts are read (and may be mixed); nested objects flatten to dotted
/// keys. JSON has no place for comments, so entry comments are not persisted.
#[derive(Debug, Clone, Default)]
pub struct JsonBackend {
    options: JsonOptions,
}

impl JsonBackend {
    pub const NAME: &'static str = "json";
    pub const EXTENSIONS: &'static [&'static str] = &["json"];

    pub fn new(options: JsonOptions) -> Self {
        Self { options }
    }

    /// Content sniffing used when the extension is not conclusive.
    pub fn detect(content: &str) -> bool {
        first_significant_char(content) == Some('{')
    }
}

impl Backend for JsonBackend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extensions(&self) -> &'static [&'static str] {
        Self::EXTENSIONS
    }

    fn parse(&self, content: &str, language: LanguageInfo) -> CatalogResult<ResourceFile> {
        let path = language.path().to_path_buf();
        let root: JsonNode = serde_json::from_str(content).map_err(|e| {
            let message = strip_location(&e.to_string());
            if e.line() == 0 {
                CatalogError::parse(&path, message)
            } else {
                CatalogError::parse_at(&path, message, e.line(), e.column())
            }
        })?;

        let JsonNode::Object(members) = root else {
            return Err(CatalogError::parse_at(
                &path,
                "root of a JSON catalog must be an object",
                1,
                1,
            ));
        };

        let mut flattener = Flattener {
            path: &path,
            content,
            lines: LineIndex::new(content),
            seen: HashSet::new(),
            entries: Vec::new(),
        };
        flattener.flatten(members, "")?;
        ResourceFile::from_entries(language, flattener.entries)
    }

    fn render(&self, file: &ResourceFile) -> CatalogResult<String> {
        let mut root = Map::new();
        if self.options.nested && can_nest(file) {
            for entry in file.entries() {
                let parts: Vec<&str> = entry.key.split('.').collect();
                insert_nested(&mut root, &parts, Value::String(entry.value.clone()));
            }
        } else {
            for entry in file.entries() {
                root.insert(entry.key.clone(), Value::String(entry.value.clone()));
            }
        }

        let indent = vec![b' '; self.options.indent];
        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
        Value::Object(root)
            .serialize(&mut serializer)
            .map_err(|e| CatalogError::parse(file.language().path(), e.to_string()))?;

        let mut content = String::from_utf8(out)
            .map_err(|e| CatalogError::parse(file.language().path(), e.to_string()))?;
        content.push('\n');
        Ok(content)
    }
}

/// A JSON catalog node. Member order is kept and duplicate member names are
/// rejected while deserializing, so the parser reports their position.
enum JsonNode {
    Text(String),
    Object(Vec<(String, JsonNode)>),
}

impl<'de> Deserialize<'de> for JsonNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = JsonNode;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or an object of strings")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<JsonNode, E> {
        Ok(JsonNode::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<JsonNode, E> {
        Ok(JsonNode::Text(v))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<JsonNode, A::Error> {
        let mut seen = HashSet::new();
        let mut members = Vec::new();
        while let Some(name) = map.next_key::<String>()? {
            if !seen.insert(name.clone()) {
                return Err(de::Error::custom(format!("duplicate key '{}'", name)));
            }
            let value = map.next_value::<JsonNode>()?;
            members.push((name, value));
        }
        Ok(JsonNode::Object(members))
    }
}

struct Flattener<'a> {
    path: &'a Path,
    content: &'a str,
    lines: LineIndex,
    seen: HashSet<String>,
    entries: Vec<ResourceEntry>,
}

impl Flattener<'_> {
    fn flatten(&mut self, members: Vec<(String, JsonNode)>, prefix: &str) -> CatalogResult<()> {
        for (name, node) in members {
            let key = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };
            if name.is_empty() {
                return Err(self.error_at(&key, "entry with an empty key".to_string()));
            }
            match node {
                JsonNode::Text(value) => {
                    // "a.b" written flat and as {"a": {"b"}} in the same file
                    if !self.seen.insert(key.clone()) {
                        let message = format!("duplicate key '{}'", key);
                        return Err(self.error_at(&key, message));
                    }
                    self.entries.push(ResourceEntry::new(key, value));
                }
                JsonNode::Object(children) => self.flatten(children, &key)?,
            }
        }
        Ok(())
    }

    fn error_at(&self, key: &str, message: String) -> CatalogError {
        match find_key_offset(self.content, key) {
            Some(offset) => {
                let (line, column) = self.lines.position(self.content, offset);
                CatalogError::parse_at(self.path, message, line, column)
            }
            None => CatalogError::parse(self.path, message),
        }
    }
}

/// serde_json appends " at line X column Y"; the location is kept separately.
fn strip_location(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(pos) => message[..pos].to_string(),
        None => message.to_string(),
    }
}

/// Byte offset of the last segment of `key_path` as a JSON member name.
///
/// Searches each segment in sequence so that `Common.submit` finds the
/// `"submit"` after `"Common"`, and skips matches in string values (a member
/// name is followed by `:`).
fn find_key_offset(content: &str, key_path: &str) -> Option<usize> {
    let mut search_start = 0;
    let mut found_at = None;
    for part in key_path.split('.') {
        let pattern = format!("\"{}\"", part);
        let remaining = &content[search_start..];

        let mut pos = 0;
        let mut found = false;
        while let Some(rel_pos) = remaining[pos..].find(&pattern) {
            let abs_pos = pos + rel_pos;
            let after_pattern = abs_pos + pattern.len();
            if remaining[after_pattern..].trim_start().starts_with(':') {
                found_at = Some(search_start + abs_pos);
                search_start += after_pattern;
                found = true;
                break;
            }
            pos = abs_pos + 1;
        }

        if !found {
            return found_at;
        }
    }
    found_at
}

/// Keys can be nested when no key has empty segments, no key is a dotted
/// prefix of another (`a` and `a.b` cannot both be nested), and the keys under
/// each prefix are contiguous, so the nested form reads back in file order.
fn can_nest(file: &ResourceFile) -> bool {
    let keys: BTreeSet<&str> = file.keys().collect();
    let unambiguous = keys.iter().all(|key| {
        !key.split('.').any(str::is_empty)
            && key
                .match_indices('.')
                .all(|(pos, _)| !keys.contains(&key[..pos]))
    });
    if !unambiguous {
        return false;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut previous: Vec<&str> = Vec::new();
    for key in file.keys() {
        let prefixes: Vec<&str> = key.match_indices('.').map(|(pos, _)| &key[..pos]).collect();
        if prefixes
            .iter()
            .any(|prefix| seen.contains(prefix) && !previous.contains(prefix))
        {
            return false;
        }
        seen.extend(prefixes.iter().copied());
        previous = prefixes;
    }
    true
}

/// Insert a value at a nested path, creating intermediate objects as needed.
fn insert_nested(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    match path {
        [] => {}
        [last] => {
            root.insert(last.to_string(), value);
        }
        [first, rest @ ..] => {
            let next_level = root
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(inner) = next_level.as_object_mut() {
                insert_nested(inner, rest, value);
            }
        }
    }
}

use std::{
    collections::HashMap,
    fmt::{self, Write as _},
    path::Path,
};

use quick_xml::{
    Reader, Writer,
    escape::escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::{Deserialize, Serialize};

use super::{Backend, first_significant_char};
use crate::core::{
    data::{LanguageInfo, ResourceEntry, ResourceFile},
    error::{CatalogError, CatalogResult},
    utils::LineIndex,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlOptions {
    /// Spaces per indentation level.
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Write non-ASCII characters as numeric character references.
    #[serde(default)]
    pub escape_non_ascii: bool,
}

fn default_indent() -> usize {
    2
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            escape_non_ascii: false,
        }
    }
}

/// XML catalogs in the `.resx` layout:
///
/// ```xml
/// <root>
///   <data name="Greeting" xml:space="preserve">
///     <value>Hello</value>
///     <comment>Shown on the home page</comment>
///   </data>
/// </root>
/// ```
///
/// Any other child of the root element (schemas, headers) is ignored on load
/// and not written back.
#[derive(Debug, Clone, Default)]
pub struct XmlBackend {
    options: XmlOptions,
}

impl XmlBackend {
    pub const NAME: &'static str = "xml";
    pub const EXTENSIONS: &'static [&'static str] = &["resx", "xml"];

    pub fn new(options: XmlOptions) -> Self {
        Self { options }
    }

    pub fn detect(content: &str) -> bool {
        first_significant_char(content) == Some('<')
    }

    fn text<'a>(&self, value: &'a str) -> BytesText<'a> {
        if !self.options.escape_non_ascii || value.is_ascii() {
            return BytesText::new(value);
        }
        let mut escaped = String::with_capacity(value.len());
        for c in escape(value).chars() {
            if c.is_ascii() {
                escaped.push(c);
            } else {
                let _ = write!(escaped, "&#x{:X};", c as u32);
            }
        }
        BytesText::from_escaped(escaped)
    }
}

#[derive(Clone, Copy)]
enum Field {
    Value,
    Comment,
}

/// A `<data>` element being read.
struct PendingEntry {
    key: String,
    value: Option<String>,
    comment: Option<String>,
    offset: usize,
}

impl Backend for XmlBackend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extensions(&self) -> &'static [&'static str] {
        Self::EXTENSIONS
    }

    fn parse(&self, content: &str, language: LanguageInfo) -> CatalogResult<ResourceFile> {
        let path = language.path().to_path_buf();
        let lines = LineIndex::new(content);
        let error_at = |offset: usize, message: String| {
            let (line, column) = lines.position(content, offset);
            CatalogError::parse_at(&path, message, line, column)
        };

        let mut reader = Reader::from_str(content);
        let mut entries: Vec<ResourceEntry> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut depth = 0usize;
        let mut saw_root = false;
        let mut pending: Option<PendingEntry> = None;
        let mut field: Option<(Field, String)> = None;

        loop {
            let event_offset = reader.buffer_position() as usize;
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => return Err(error_at(reader.error_position() as usize, e.to_string())),
            };

            match event {
                Event::Eof => break,
                Event::Start(start) => {
                    depth += 1;
                    saw_root = true;
                    match (start.local_name().as_ref(), depth) {
                        (b"data", 2) => {
                            let key = data_name(&start)
                                .map_err(|message| error_at(event_offset, message))?;
                            pending = Some(PendingEntry {
                                key,
                                value: None,
                                comment: None,
                                offset: event_offset,
                            });
                        }
                        (b"value", 3) if pending.is_some() => {
                            field = Some((Field::Value, String::new()));
                        }
                        (b"comment", 3) if pending.is_some() => {
                            field = Some((Field::Comment, String::new()));
                        }
                        _ => {}
                    }
                }
                Event::Empty(start) => {
                    saw_root = true;
                    match (start.local_name().as_ref(), depth + 1) {
                        (b"data", 2) => {
                            let key = data_name(&start)
                                .map_err(|message| error_at(event_offset, message))?;
                            let entry = PendingEntry {
                                key,
                                value: None,
                                comment: None,
                                offset: event_offset,
                            };
                            push_entry(&mut entries, &mut seen, entry, &error_at)?;
                        }
                        (b"value", 3) => {
                            if let Some(entry) = pending.as_mut() {
                                entry.value = Some(String::new());
                            }
                        }
                        (b"comment", 3) => {
                            if let Some(entry) = pending.as_mut() {
                                entry.comment = Some(String::new());
                            }
                        }
                        _ => {}
                    }
                }
                Event::Text(text) => {
                    if let Some((_, buffer)) = field.as_mut() {
                        let text = text
                            .unescape()
                            .map_err(|e| error_at(event_offset, e.to_string()))?;
                        buffer.push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some((_, buffer)) = field.as_mut() {
                        let text = std::str::from_utf8(&data)
                            .map_err(|e| error_at(event_offset, e.to_string()))?;
                        buffer.push_str(text);
                    }
                }
                Event::End(end) => {
                    match (end.local_name().as_ref(), depth) {
                        (b"value" | b"comment", 3) => {
                            if let (Some((kind, buffer)), Some(entry)) =
                                (field.take(), pending.as_mut())
                            {
                                match kind {
                                    Field::Value => entry.value = Some(buffer),
                                    Field::Comment => entry.comment = Some(buffer),
                                }
                            }
                        }
                        (b"data", 2) => {
                            if let Some(entry) = pending.take() {
                                push_entry(&mut entries, &mut seen, entry, &error_at)?;
                            }
                        }
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
        }

        if depth > 0 {
            return Err(error_at(
                content.len(),
                "unexpected end of document: unclosed element".to_string(),
            ));
        }
        if !saw_root {
            return Err(CatalogError::parse(&path, "missing root element"));
        }

        ResourceFile::from_entries(language, entries)
    }

    fn render(&self, file: &ResourceFile) -> CatalogResult<String> {
        let path = file.language().path();
        let render_error = |e| render_failed(path, e);

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', self.options.indent);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(render_error)?;
        writer
            .write_event(Event::Start(BytesStart::new("root")))
            .map_err(render_error)?;

        for entry in file.entries() {
            let mut data = BytesStart::new("data");
            data.push_attribute(("name", entry.key.as_str()));
            data.push_attribute(("xml:space", "preserve"));
            writer
                .write_event(Event::Start(data))
                .map_err(render_error)?;

            write_text_element(&mut writer, path, "value", self.text(&entry.value))?;
            if let Some(comment) = &entry.comment {
                write_text_element(&mut writer, path, "comment", self.text(comment))?;
            }

            writer
                .write_event(Event::End(BytesEnd::new("data")))
                .map_err(render_error)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("root")))
            .map_err(render_error)?;

        let mut content = String::from_utf8(writer.into_inner())
            .map_err(|e| CatalogError::parse(path, e.to_string()))?;
        content.push('\n');
        Ok(content)
    }
}

/// Start, text and end are written as separate events so that an empty
/// value stays `<value></value>` instead of gaining indentation whitespace.
fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    path: &Path,
    name: &str,
    text: BytesText<'_>,
) -> CatalogResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(|e| render_failed(path, e))?;
    writer
        .write_event(Event::Text(text))
        .map_err(|e| render_failed(path, e))?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| render_failed(path, e))?;
    Ok(())
}

fn render_failed(path: &Path, error: impl fmt::Display) -> CatalogError {
    CatalogError::parse(path, format!("failed to render XML: {}", error))
}

fn data_name(start: &BytesStart<'_>) -> Result<String, String> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        if attr.key.as_ref() == b"name" {
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            if value.is_empty() {
                return Err("<data> element with an empty name".to_string());
            }
            return Ok(value.into_owned());
        }
    }
    Err("<data> element without a name attribute".to_string())
}

fn push_entry(
    entries: &mut Vec<ResourceEntry>,
    seen: &mut HashMap<String, usize>,
    pending: PendingEntry,
    error_at: &impl Fn(usize, String) -> CatalogError,
) -> CatalogResult<()> {
    if seen.contains_key(&pending.key) {
        return Err(error_at(
            pending.offset,
            format!("duplicate key '{}'", pending.key),
        ));
    }
    seen.insert(pending.key.clone(), entries.len());
    entries.push(ResourceEntry {
        key: pending.key,
        value: pending.value.unwrap_or_default(),
        comment: pending.comment,
    });
    Ok(())
}

//! In-memory text documents handed to the validators.

/// An addressable, read-only text document.
///
/// One document is created per retained source file. The version is fixed at
/// zero: this is one-shot checking, documents are never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    uri: String,
    language_id: String,
    version: i32,
    text: String,
}

impl TextDocument {
    /// Creates a document at version zero.
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            version: 0,
            text: text.into(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines, counting a final line after a trailing newline.
    pub fn line_count(&self) -> u32 {
        self.text.split('\n').count() as u32
    }

    /// The text of a zero-based line, without its line terminator.
    pub fn line(&self, line: u32) -> Option<&str> {
        self.text
            .split('\n')
            .nth(line as usize)
            .map(|text| text.strip_suffix('\r').unwrap_or(text))
    }
}

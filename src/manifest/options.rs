use std::fmt;

use super::row::Value;

/// Comment marker used by [`ParserOptions::skip_default_comments`].
pub const DEFAULT_COMMENT: u8 = b'#';

pub type MapHeaders = Box<dyn Fn(&str, usize) -> Option<String> + Send + Sync>;
pub type MapValues = Box<dyn Fn(Option<&str>, usize, Value) -> Value + Send + Sync>;

/// How the header row is obtained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Headers {
    /// The first qualifying record names the columns.
    #[default]
    Infer,
    /// No names at all; rows are keyed `0`, `1`, `2`, ...
    Positional,
    /// Names given up front; the first record is data.
    Explicit(Vec<String>),
}

/// Tokenizer configuration.
///
/// ```
/// use license_harvest::manifest::ParserOptions;
///
/// let opts = ParserOptions::default()
///     .delimiter(b';')
///     .skip_default_comments()
///     .strict(true);
/// assert_eq!(opts.delimiter, b';');
/// assert_eq!(opts.skip_comments, Some(b'#'));
/// ```
pub struct ParserOptions {
    pub delimiter: u8,
    pub quote: u8,
    /// `None` means the quote byte doubles as the escape.
    pub escape: Option<u8>,
    /// `None` auto-detects `\n`, `\r\n` or `\r` from the first terminator.
    pub newline: Option<u8>,
    pub headers: Headers,
    pub map_headers: Option<MapHeaders>,
    pub map_values: Option<MapValues>,
    pub skip_lines: Option<usize>,
    /// Marker byte for comment records; `None` keeps them.
    pub skip_comments: Option<u8>,
    pub max_row_bytes: usize,
    pub strict: bool,
    pub raw: bool,
    pub output_byte_offset: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            delimiter: b',',
            quote: b'"',
            escape: None,
            newline: None,
            headers: Headers::Infer,
            map_headers: None,
            map_values: None,
            skip_lines: None,
            skip_comments: None,
            max_row_bytes: usize::MAX,
            strict: false,
            raw: false,
            output_byte_offset: false,
        }
    }
}

impl ParserOptions {
    pub fn delimiter(mut self, byte: u8) -> Self {
        self.delimiter = byte;
        self
    }

    pub fn quote(mut self, byte: u8) -> Self {
        self.quote = byte;
        self
    }

    pub fn escape(mut self, byte: u8) -> Self {
        self.escape = Some(byte);
        self
    }

    /// Fix the record terminator. Disables auto-detection and carriage-return
    /// trimming.
    pub fn newline(mut self, byte: u8) -> Self {
        self.newline = Some(byte);
        self
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn explicit_headers<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers(Headers::Explicit(names.into_iter().map(Into::into).collect()))
    }

    /// Rename inferred headers. Returning `None` drops the column from rows.
    pub fn map_headers<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, usize) -> Option<String> + Send + Sync + 'static,
    {
        self.map_headers = Some(Box::new(f));
        self
    }

    /// Transform each data value, given its header (if any) and column index.
    pub fn map_values<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&str>, usize, Value) -> Value + Send + Sync + 'static,
    {
        self.map_values = Some(Box::new(f));
        self
    }

    pub fn skip_lines(mut self, n: usize) -> Self {
        self.skip_lines = Some(n);
        self
    }

    pub fn skip_comments(mut self, marker: u8) -> Self {
        self.skip_comments = Some(marker);
        self
    }

    /// Skip records starting with [`DEFAULT_COMMENT`].
    pub fn skip_default_comments(self) -> Self {
        self.skip_comments(DEFAULT_COMMENT)
    }

    pub fn max_row_bytes(mut self, max: usize) -> Self {
        self.max_row_bytes = max;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    pub fn output_byte_offset(mut self, enabled: bool) -> Self {
        self.output_byte_offset = enabled;
        self
    }

    pub(crate) fn escape_byte(&self) -> u8 {
        self.escape.unwrap_or(self.quote)
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("delimiter", &(self.delimiter as char))
            .field("quote", &(self.quote as char))
            .field("escape", &self.escape.map(char::from))
            .field("newline", &self.newline.map(char::from))
            .field("headers", &self.headers)
            .field("map_headers", &self.map_headers.is_some())
            .field("map_values", &self.map_values.is_some())
            .field("skip_lines", &self.skip_lines)
            .field("skip_comments", &self.skip_comments.map(char::from))
            .field("max_row_bytes", &self.max_row_bytes)
            .field("strict", &self.strict)
            .field("raw", &self.raw)
            .field("output_byte_offset", &self.output_byte_offset)
            .finish()
    }
}

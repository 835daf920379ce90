//! Incremental, delimiter-aware record tokenizer.
//!
//! [`RecordParser`] accepts input in chunks of any size through
//! [`RecordParser::feed`] and reports [`Event`]s to a caller-supplied sink.
//! Splitting the input differently never changes the events produced: a
//! byte whose meaning depends on the byte after it (an escape byte, or a
//! carriage return before the newline convention is known) is held back
//! until that byte arrives or [`RecordParser::finish`] is called.
//!
//! Scanning happens in two passes. The stream pass only tracks whether the
//! cursor is inside a quoted region, so that terminators inside quotes are
//! ignored. Each complete record is then split into fields by
//! [`RecordParser::parse_record`].

use super::error::{ParseError, Result};
use super::options::{Headers, ParserOptions};
use super::row::{Event, Row, Value};

pub struct RecordParser {
    opts: ParserOptions,
    escape: u8,
    /// Unconsumed input; index 0 is the first byte of the current record.
    pending: Vec<u8>,
    /// Bytes of `pending` already scanned.
    scanned: usize,
    /// Bytes dropped from the front of `pending` so far.
    consumed: u64,
    quoted: bool,
    escaped: bool,
    row_length: usize,
    line_number: usize,
    first: bool,
    newline: u8,
    newline_known: bool,
    /// `None` in positional mode, and until inference completes.
    headers: Option<Vec<Option<String>>>,
    failed: bool,
}

impl RecordParser {
    pub fn new(opts: ParserOptions) -> Self {
        let (first, headers) = match &opts.headers {
            Headers::Infer => (true, None),
            Headers::Positional => (false, None),
            Headers::Explicit(names) => (false, Some(names.iter().cloned().map(Some).collect())),
        };

        RecordParser {
            escape: opts.escape_byte(),
            newline: opts.newline.unwrap_or(b'\n'),
            newline_known: opts.newline.is_some(),
            opts,
            pending: Vec::new(),
            scanned: 0,
            consumed: 0,
            quoted: false,
            escaped: false,
            row_length: 0,
            line_number: 0,
            first,
            headers,
            failed: false,
        }
    }

    /// Established header names, if any.
    pub fn headers(&self) -> Option<&[Option<String>]> {
        self.headers.as_deref()
    }

    /// Records seen so far, header and skipped lines included, comments not.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Consume the next chunk of input.
    ///
    /// Recoverable problems arrive through `emit` as [`Event::Error`]. A
    /// record longer than `max_row_bytes` is returned as `Err` and ends the
    /// session.
    pub fn feed<F>(&mut self, chunk: &[u8], mut emit: F) -> Result<()>
    where
        F: FnMut(Event),
    {
        if self.failed {
            return Err(ParseError::Aborted);
        }

        self.pending.extend_from_slice(chunk);
        let buffer = std::mem::take(&mut self.pending);
        let mut previous_end = 0;
        let mut i = self.scanned;

        while i < buffer.len() {
            let chr = buffer[i];
            let next = buffer.get(i + 1).copied();
            if next.is_none() && self.needs_lookahead(chr) {
                break;
            }
            if self.advance(chr, next)? {
                let offset = self.consumed + previous_end as u64;
                self.parse_record(&buffer[previous_end..=i], offset, true, &mut emit);
                previous_end = i + 1;
            }
            i += 1;
        }

        self.scanned = i - previous_end;
        self.consumed += previous_end as u64;
        self.pending = buffer;
        self.pending.drain(..previous_end);
        Ok(())
    }

    /// Signal end of input and flush the final unterminated record.
    ///
    /// A stream that ends on a dangling escape inside a quoted field is
    /// malformed; that partial record is dropped without an event.
    pub fn finish<F>(mut self, mut emit: F) -> Result<()>
    where
        F: FnMut(Event),
    {
        if self.failed {
            return Err(ParseError::Aborted);
        }

        let buffer = std::mem::take(&mut self.pending);
        let mut previous_end = 0;

        for i in self.scanned..buffer.len() {
            let chr = buffer[i];
            if self.quoted && !self.escaped && chr == self.escape && self.escape != self.opts.quote {
                self.escaped = true;
                break;
            }
            if self.advance(chr, None)? {
                let offset = self.consumed + previous_end as u64;
                self.parse_record(&buffer[previous_end..=i], offset, true, &mut emit);
                previous_end = i + 1;
            }
        }

        if self.escaped || previous_end == buffer.len() {
            return Ok(());
        }

        let offset = self.consumed + previous_end as u64;
        self.parse_record(&buffer[previous_end..], offset, false, &mut emit);
        Ok(())
    }

    /// Whether `chr` cannot be classified without seeing the following byte.
    fn needs_lookahead(&self, chr: u8) -> bool {
        let pending_escape = !self.escaped && chr == self.escape && self.escape != self.opts.quote;
        let pending_cr = !self.newline_known && !self.quoted && chr == b'\r';
        pending_escape || pending_cr
    }

    /// Stream pass over one byte. Returns `true` when it terminates a record.
    fn advance(&mut self, chr: u8, next: Option<u8>) -> Result<bool> {
        self.row_length += 1;
        if self.row_length > self.opts.max_row_bytes {
            self.failed = true;
            return Err(ParseError::RowTooLarge {
                line: self.line_number + 1,
                max: self.opts.max_row_bytes,
            });
        }

        // Escape resolution before quote toggling.
        if !self.escaped && chr == self.escape && next == Some(self.opts.quote) {
            self.escaped = true;
            return Ok(false);
        }
        if chr == self.opts.quote {
            if self.escaped {
                self.escaped = false;
            } else {
                self.quoted = !self.quoted;
            }
            return Ok(false);
        }
        if self.quoted {
            return Ok(false);
        }

        if !self.newline_known {
            if chr == b'\n' {
                self.newline = b'\n';
                self.newline_known = true;
            } else if chr == b'\r' && next != Some(b'\n') {
                self.newline = b'\r';
                self.newline_known = true;
            }
        }

        if chr == self.newline {
            self.row_length = 0;
            return Ok(true);
        }
        Ok(false)
    }

    /// Split one record into fields and emit the resulting headers or row.
    ///
    /// `record` includes its terminator byte when `terminated` is set.
    pub fn parse_record<F>(&mut self, record: &[u8], offset: u64, terminated: bool, emit: &mut F)
    where
        F: FnMut(Event),
    {
        let quote = self.opts.quote;
        let delimiter = self.opts.delimiter;
        let escape = self.escape;

        let mut end = record.len();
        if terminated && end > 0 {
            end -= 1;
        }
        if self.opts.newline.is_none() && end > 0 && record[end - 1] == b'\r' {
            end -= 1;
        }

        if let Some(marker) = self.opts.skip_comments {
            if record.first() == Some(&marker) {
                return;
            }
        }

        let mut cells: Vec<Value> = Vec::new();
        let mut is_quoted = false;
        let mut field_start = 0;
        let mut i = 0;

        while i < end {
            let byte = record[i];
            let starting_quote = !is_quoted && byte == quote;
            let ending_quote =
                is_quoted && byte == quote && (i + 1 == end || record[i + 1] == delimiter);
            let escaped_quote =
                is_quoted && byte == escape && i + 1 < end && record[i + 1] == quote;

            if starting_quote || ending_quote {
                is_quoted = !is_quoted;
            } else if escaped_quote {
                i += 1;
            } else if byte == delimiter && !is_quoted {
                let value = self.parse_cell(&record[field_start..i]);
                let value = self.map_value(value, cells.len());
                cells.push(value);
                field_start = i + 1;
            }
            i += 1;
        }

        if field_start < end {
            let value = self.parse_cell(&record[field_start..end]);
            let value = self.map_value(value, cells.len());
            cells.push(value);
        }
        if end > 0 && record[end - 1] == delimiter {
            let value = self.map_value(self.empty_value(), cells.len());
            cells.push(value);
        }

        let skip = self.opts.skip_lines.is_some_and(|n| n > self.line_number);
        self.line_number += 1;
        if skip {
            return;
        }

        if self.first {
            self.first = false;
            let headers: Vec<Option<String>> = cells
                .iter()
                .enumerate()
                .map(|(index, cell)| {
                    let name = cell.to_text();
                    match &self.opts.map_headers {
                        Some(map) => map(&name, index),
                        None => Some(name.into_owned()),
                    }
                })
                .collect();
            self.headers = Some(headers.clone());
            emit(Event::Headers(headers));
            return;
        }

        if self.opts.strict {
            if let Some(headers) = &self.headers {
                if cells.len() != headers.len() {
                    emit(Event::Error(ParseError::RowLengthMismatch {
                        line: self.line_number,
                        expected: headers.len(),
                        got: cells.len(),
                    }));
                    return;
                }
            }
        }

        let mut row = self.write_row(cells);
        if self.opts.output_byte_offset {
            row.set_byte_offset(offset);
        }
        emit(Event::Row(row));
    }

    /// Strip wrapping quotes and collapse escaped quotes.
    fn parse_cell(&self, cell: &[u8]) -> Value {
        let quote = self.opts.quote;
        let mut cell = cell;
        if cell.first() == Some(&quote) && cell.last() == Some(&quote) {
            // A lone quote byte counts as an empty quoted field.
            cell = if cell.len() >= 2 { &cell[1..cell.len() - 1] } else { &[] };
        }

        let mut out = Vec::with_capacity(cell.len());
        let mut i = 0;
        while i < cell.len() {
            if cell[i] == self.escape && i + 1 < cell.len() && cell[i + 1] == quote {
                i += 1;
            }
            out.push(cell[i]);
            i += 1;
        }

        if self.opts.raw {
            Value::Raw(out)
        } else {
            match String::from_utf8(out) {
                Ok(s) => Value::Text(s),
                Err(e) => Value::Text(String::from_utf8_lossy(e.as_bytes()).into_owned()),
            }
        }
    }

    fn map_value(&self, value: Value, index: usize) -> Value {
        if self.first {
            return value;
        }
        match &self.opts.map_values {
            Some(map) => {
                let header = self
                    .headers
                    .as_ref()
                    .and_then(|h| h.get(index))
                    .and_then(|h| h.as_deref());
                map(header, index, value)
            }
            None => value,
        }
    }

    fn empty_value(&self) -> Value {
        if self.opts.raw {
            Value::Raw(Vec::new())
        } else {
            Value::Text(String::new())
        }
    }

    fn write_row(&self, cells: Vec<Value>) -> Row {
        let mut row = Row::new();
        for (index, value) in cells.into_iter().enumerate() {
            match &self.headers {
                None => row.insert(index.to_string(), value),
                Some(headers) => match headers.get(index) {
                    Some(Some(name)) => row.insert(name.clone(), value),
                    Some(None) => {}
                    None => row.insert(format!("_{index}"), value),
                },
            }
        }
        row
    }
}

/// Parse a complete in-memory input in one call.
pub fn parse_bytes(opts: ParserOptions, input: &[u8]) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    let mut parser = RecordParser::new(opts);
    parser.feed(input, |e| events.push(e))?;
    parser.finish(|e| events.push(e))?;
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::manifest::options::DEFAULT_COMMENT;

    fn run(opts: ParserOptions, input: &str) -> Vec<Event> {
        parse_bytes(opts, input.as_bytes()).unwrap()
    }

    fn run_chunked(opts: ParserOptions, input: &[u8], sizes: &[usize]) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        let mut parser = RecordParser::new(opts);
        let mut rest = input;
        let mut k = 0;
        while !rest.is_empty() {
            let n = sizes.get(k).copied().unwrap_or(1).clamp(1, rest.len());
            let (chunk, tail) = rest.split_at(n);
            parser.feed(chunk, |e| events.push(e))?;
            rest = tail;
            k += 1;
        }
        parser.finish(|e| events.push(e))?;
        Ok(events)
    }

    fn rows(events: &[Event]) -> Vec<Vec<(String, String)>> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Row(r) => Some(
                    r.iter()
                        .map(|(k, v)| (k.to_string(), v.to_text().into_owned()))
                        .collect(),
                ),
                _ => None,
            })
            .collect()
    }

    fn headers(events: &[Event]) -> Vec<Vec<Option<String>>> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Headers(h) => Some(h.clone()),
                _ => None,
            })
            .collect()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_infers_headers_then_rows() {
        let events = run(ParserOptions::default(), "name,version\nserde,1.0\ntokio,1.25\n");
        assert_eq!(
            headers(&events),
            vec![vec![Some("name".to_string()), Some("version".to_string())]]
        );
        assert_eq!(
            rows(&events),
            vec![
                pairs(&[("name", "serde"), ("version", "1.0")]),
                pairs(&[("name", "tokio"), ("version", "1.25")]),
            ]
        );
    }

    #[test]
    fn test_doubled_quotes_collapse() {
        let events = run(ParserOptions::default(), "quote\n\"he said \"\"hi\"\"\"\n");
        assert_eq!(rows(&events), vec![pairs(&[("quote", "he said \"hi\"")])]);
    }

    #[test]
    fn test_empty_middle_field() {
        let events = run(ParserOptions::default(), "h1,h2,h3\na,,c\n");
        assert_eq!(
            rows(&events),
            vec![pairs(&[("h1", "a"), ("h2", ""), ("h3", "c")])]
        );
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_field() {
        let events = run(ParserOptions::default(), "h1,h2,h3\na,b,\n");
        assert_eq!(
            rows(&events),
            vec![pairs(&[("h1", "a"), ("h2", "b"), ("h3", "")])]
        );
    }

    #[test]
    fn test_positional_headers() {
        let opts = ParserOptions::default().headers(Headers::Positional);
        let events = run(opts, "x,y,z\n");
        assert!(headers(&events).is_empty());
        assert_eq!(rows(&events), vec![pairs(&[("0", "x"), ("1", "y"), ("2", "z")])]);
    }

    #[test]
    fn test_explicit_headers_treat_first_record_as_data() {
        let opts = ParserOptions::default().explicit_headers(["a", "b"]);
        let events = run(opts, "1,2\n3,4,5\n");
        assert!(headers(&events).is_empty());
        assert_eq!(
            rows(&events),
            vec![
                pairs(&[("a", "1"), ("b", "2")]),
                pairs(&[("a", "3"), ("b", "4"), ("_2", "5")]),
            ]
        );
    }

    #[test]
    fn test_strict_mismatch_is_recoverable() {
        let opts = ParserOptions::default().strict(true);
        let events = run(opts, "a,b,c\n1,2\n4,5,6\n");
        let errors: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::Error(err) => Some(err),
                _ => None,
            })
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ParseError::RowLengthMismatch { line: 2, expected: 3, got: 2 }
        ));
        assert!(!errors[0].is_fatal());
        assert_eq!(
            rows(&events),
            vec![pairs(&[("a", "4"), ("b", "5"), ("c", "6")])]
        );
    }

    #[test]
    fn test_strict_ignored_in_positional_mode() {
        let opts = ParserOptions::default()
            .headers(Headers::Positional)
            .strict(true);
        let events = run(opts, "1,2\n1,2,3\n");
        assert_eq!(rows(&events).len(), 2);
    }

    #[test]
    fn test_comment_does_not_become_header() {
        let opts = ParserOptions::default().skip_comments(b'#');
        let events = run(opts, "# generated\nname,version\nx,1\n");
        assert_eq!(
            headers(&events),
            vec![vec![Some("name".to_string()), Some("version".to_string())]]
        );
        assert_eq!(rows(&events), vec![pairs(&[("name", "x"), ("version", "1")])]);
    }

    #[test]
    fn test_default_comment_marker() {
        let opts = ParserOptions::default().skip_default_comments();
        assert_eq!(opts.skip_comments, Some(DEFAULT_COMMENT));
        let events = run(opts, "# generated\nname\n;x\n#y\n");
        assert_eq!(headers(&events), vec![vec![Some("name".to_string())]]);
        assert_eq!(rows(&events), vec![pairs(&[("name", ";x")])]);
    }

    #[test]
    fn test_comments_kept_when_disabled() {
        let events = run(ParserOptions::default(), "# generated\nx\n");
        assert_eq!(headers(&events), vec![vec![Some("# generated".to_string())]]);
        assert_eq!(rows(&events), vec![pairs(&[("# generated", "x")])]);
    }

    #[test]
    fn test_skip_lines_do_not_count_comments() {
        let opts = ParserOptions::default().skip_lines(1).skip_comments(b'#');
        let events = run(opts, "#c\njunk\nh1,h2\nv1,v2\n");
        assert_eq!(
            headers(&events),
            vec![vec![Some("h1".to_string()), Some("h2".to_string())]]
        );
        assert_eq!(rows(&events), vec![pairs(&[("h1", "v1"), ("h2", "v2")])]);
    }

    #[test]
    fn test_max_row_bytes_is_fatal() {
        let opts = ParserOptions::default()
            .headers(Headers::Positional)
            .max_row_bytes(10);
        let mut parser = RecordParser::new(opts);
        let err = parser.feed(b"abcdefghijk\n", |_| {}).unwrap_err();
        assert!(matches!(err, ParseError::RowTooLarge { max: 10, .. }));
        assert!(err.is_fatal());
        assert!(matches!(parser.feed(b"x\n", |_| {}), Err(ParseError::Aborted)));
    }

    #[test]
    fn test_max_row_bytes_counts_per_record() {
        let opts = ParserOptions::default()
            .headers(Headers::Positional)
            .max_row_bytes(10);
        let events = run(opts, "abcdefghi\nabcdefghi\n");
        assert_eq!(rows(&events).len(), 2);
    }

    #[test]
    fn test_max_row_bytes_across_chunks() {
        let opts = ParserOptions::default()
            .headers(Headers::Positional)
            .max_row_bytes(10);
        let result = run_chunked(opts, b"abcdef\nabcdefghijkl\n", &[3]);
        assert!(matches!(result, Err(ParseError::RowTooLarge { .. })));
    }

    #[test]
    fn test_final_record_without_terminator() {
        let events = run(ParserOptions::default(), "h\nlast");
        assert_eq!(rows(&events), vec![pairs(&[("h", "last")])]);
    }

    #[test]
    fn test_dangling_escape_at_end_is_dropped() {
        let opts = ParserOptions::default().escape(b'\\');
        let events = run(opts, "h\n\"abc\\");
        assert!(rows(&events).is_empty());
    }

    #[test]
    fn test_trailing_escape_outside_quotes_is_literal() {
        let opts = ParserOptions::default().escape(b'\\');
        let events = run(opts, "h\nabc\\");
        assert_eq!(rows(&events), vec![pairs(&[("h", "abc\\")])]);
    }

    #[test]
    fn test_custom_escape() {
        let opts = ParserOptions::default().escape(b'\\');
        let events = run(opts, "h1,h2\n\"a \\\"b\\\" c\",d\n");
        assert_eq!(
            rows(&events),
            vec![pairs(&[("h1", "a \"b\" c"), ("h2", "d")])]
        );
    }

    #[test]
    fn test_quoted_delimiter_and_newline() {
        let events = run(
            ParserOptions::default(),
            "name,license\n\"a,b\",\"line1\nline2\"\n",
        );
        assert_eq!(
            rows(&events),
            vec![pairs(&[("name", "a,b"), ("license", "line1\nline2")])]
        );
    }

    #[test]
    fn test_crlf_detected_and_trimmed() {
        let events = run(ParserOptions::default(), "name,version\r\nx,1\r\n");
        assert_eq!(
            headers(&events),
            vec![vec![Some("name".to_string()), Some("version".to_string())]]
        );
        assert_eq!(rows(&events), vec![pairs(&[("name", "x"), ("version", "1")])]);
    }

    #[test]
    fn test_bare_cr_detected() {
        let events = run(ParserOptions::default(), "a,b\rc,d\r");
        assert_eq!(rows(&events), vec![pairs(&[("a", "c"), ("b", "d")])]);
    }

    #[test]
    fn test_custom_newline() {
        let opts = ParserOptions::default().newline(b';');
        let events = run(opts, "a,b;1,2;");
        assert_eq!(rows(&events), vec![pairs(&[("a", "1"), ("b", "2")])]);
    }

    #[test]
    fn test_custom_delimiter_and_quote() {
        let opts = ParserOptions::default().delimiter(b'\t').quote(b'\'');
        let events = run(opts, "a\tb\n'x\ty'\tz\n");
        assert_eq!(rows(&events), vec![pairs(&[("a", "x\ty"), ("b", "z")])]);
    }

    #[test]
    fn test_map_headers_rename_and_drop() {
        let opts = ParserOptions::default().map_headers(|name, index| {
            if index == 1 {
                None
            } else {
                Some(name.to_uppercase())
            }
        });
        let events = run(opts, "a,b,c\n1,2,3\n");
        assert_eq!(
            headers(&events),
            vec![vec![Some("A".to_string()), None, Some("C".to_string())]]
        );
        assert_eq!(rows(&events), vec![pairs(&[("A", "1"), ("C", "3")])]);
    }

    #[test]
    fn test_map_values_sees_header_and_index() {
        let opts = ParserOptions::default().map_values(|header, index, value| {
            Value::Text(format!("{}:{}:{}", header.unwrap_or("?"), index, value))
        });
        let events = run(opts, "a,b\n1,2,3\n");
        assert_eq!(
            rows(&events),
            vec![pairs(&[("a", "a:0:1"), ("b", "b:1:2"), ("_2", "?:2:3")])]
        );
    }

    #[test]
    fn test_raw_values() {
        let opts = ParserOptions::default().raw(true);
        let events = run(opts, "h\n\"x\"\n");
        let row = events.into_iter().find_map(Event::into_row).unwrap();
        assert_eq!(row.get("h"), Some(&Value::Raw(b"x".to_vec())));
    }

    #[test]
    fn test_byte_offsets_are_absolute() {
        let input = b"a,b\nx,y\nzz,w\n";
        let opts = || ParserOptions::default().output_byte_offset(true);
        for sizes in [vec![input.len()], vec![1], vec![3, 2, 5]] {
            let events = run_chunked(opts(), input, &sizes).unwrap();
            let offsets: Vec<_> = events
                .into_iter()
                .filter_map(Event::into_row)
                .map(|r| r.byte_offset())
                .collect();
            assert_eq!(offsets, vec![Some(4), Some(8)]);
        }
    }

    #[test]
    fn test_blank_line_yields_empty_row() {
        let events = run(ParserOptions::default(), "h\n\nx\n");
        assert_eq!(rows(&events), vec![vec![], pairs(&[("h", "x")])]);
    }

    // A field made of a single quote byte reads as empty, not as a literal
    // quote.
    #[test]
    fn test_lone_quote_field_is_empty() {
        let events = run(ParserOptions::default(), "h\n\"");
        assert_eq!(rows(&events), vec![pairs(&[("h", "")])]);
    }

    #[test]
    fn test_empty_quoted_field_before_delimiter() {
        let opts = ParserOptions::default().headers(Headers::Positional);
        let events = run(opts, "\"\",x\n");
        assert_eq!(rows(&events), vec![pairs(&[("0", ""), ("1", "x")])]);
    }

    #[test]
    fn test_empty_input() {
        assert!(run(ParserOptions::default(), "").is_empty());
    }

    #[test]
    fn test_byte_at_a_time_matches_whole() {
        let input = "a,b,c\r\n\"q,\"\"x\"\"\",2,\r\n# not a comment\r\nlast,\"multi\r\nline\",z";
        let whole = run(ParserOptions::default(), input);
        let split = run_chunked(ParserOptions::default(), input.as_bytes(), &[1]).unwrap();
        assert_eq!(format!("{whole:?}"), format!("{split:?}"));
    }

    fn options_for(variant: u8) -> ParserOptions {
        match variant {
            0 => ParserOptions::default(),
            1 => ParserOptions::default().escape(b'\\'),
            2 => ParserOptions::default().strict(true).skip_comments(b'#'),
            _ => ParserOptions::default()
                .headers(Headers::Positional)
                .skip_lines(1)
                .output_byte_offset(true),
        }
    }

    proptest! {
        #[test]
        fn prop_chunking_never_changes_events(
            input in proptest::collection::vec(
                prop::sample::select(vec![b'a', b'b', b',', b'"', b'\n', b'\r', b'\\', b'#']),
                0..64,
            ),
            sizes in proptest::collection::vec(1usize..8, 0..64),
            variant in 0u8..4,
        ) {
            let whole = parse_bytes(options_for(variant), &input);
            let split = run_chunked(options_for(variant), &input, &sizes);
            prop_assert_eq!(format!("{whole:?}"), format!("{split:?}"));
        }
    }
}

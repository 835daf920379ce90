use std::collections::VecDeque;
use std::io::Read;

use super::error::{ParseError, Result};
use super::options::ParserOptions;
use super::parser::RecordParser;
use super::row::Event;

const CHUNK_SIZE: usize = 64 * 1024;

/// Pulls chunks from a reader on demand and yields tokenizer events.
///
/// At most one chunk's worth of events is buffered. Events produced before
/// a fatal error are still delivered, then the error, then the iterator ends.
pub struct EventReader<R> {
    source: R,
    parser: Option<RecordParser>,
    queue: VecDeque<Event>,
    chunk: Vec<u8>,
    error: Option<ParseError>,
    done: bool,
}

impl<R: Read> EventReader<R> {
    pub fn new(source: R, opts: ParserOptions) -> Self {
        EventReader {
            source,
            parser: Some(RecordParser::new(opts)),
            queue: VecDeque::new(),
            chunk: vec![0; CHUNK_SIZE],
            error: None,
            done: false,
        }
    }

    fn fill(&mut self) -> Result<()> {
        let Some(parser) = self.parser.as_mut() else {
            self.done = true;
            return Ok(());
        };

        let n = loop {
            match self.source.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ParseError::Io(e)),
            }
        };

        let queue = &mut self.queue;
        if n == 0 {
            self.done = true;
            if let Some(parser) = self.parser.take() {
                parser.finish(|e| queue.push_back(e))?;
            }
        } else {
            parser.feed(&self.chunk[..n], |e| queue.push_back(e))?;
        }
        Ok(())
    }
}

impl<R: Read> Iterator for EventReader<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Some(Ok(event));
            }
            if let Some(e) = self.error.take() {
                return Some(Err(e));
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.fill() {
                self.done = true;
                self.parser = None;
                self.error = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Headers;
    use std::io::Cursor;

    #[test]
    fn test_reads_all_rows() {
        let input = "name,version\na,1\nb,2";
        let rows: Vec<_> = EventReader::new(Cursor::new(input), ParserOptions::default())
            .filter_map(|e| e.unwrap().into_row())
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].text("name").as_deref(), Some("b"));
    }

    #[test]
    fn test_fatal_error_ends_iteration() {
        let opts = ParserOptions::default()
            .headers(Headers::Positional)
            .max_row_bytes(4);
        let mut reader = EventReader::new(Cursor::new("ab\nabcdefgh\nc\n"), opts);
        let mut saw_error = false;
        for event in reader.by_ref() {
            if let Err(e) = event {
                assert!(matches!(e, ParseError::RowTooLarge { .. }));
                saw_error = true;
            }
        }
        assert!(saw_error);
        assert!(reader.next().is_none());
    }
}

//! Streaming adapter over any [`Read`].

use std::io::{self, Read};

use crate::scanner::Scanner;

/// A reader that strips comments from the JSON text of its inner reader.
///
/// State is carried across `read` calls, so a comment marker split between
/// two reads of the inner reader is still recognized.
///
/// ```
/// use std::io::Read;
/// use jcon::CommentStripper;
///
/// let mut text = String::new();
/// CommentStripper::new(&b"[1, /* two */ 2]"[..])
///     .read_to_string(&mut text)
///     .unwrap();
/// assert_eq!(text, "[1,  2]");
/// ```
#[derive(Debug)]
pub struct CommentStripper<R> {
    inner: R,
    scanner: Scanner,
    chunk: Vec<u8>,
    pending: Vec<u8>,
    pos: usize,
    eof: bool,
}

const CHUNK: usize = 8 * 1024;

impl<R: Read> CommentStripper<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            scanner: Scanner::default(),
            chunk: vec![0; CHUNK],
            pending: Vec::new(),
            pos: 0,
            eof: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Refill `pending` from the inner reader. Returns false at end of input.
    fn fill(&mut self) -> io::Result<bool> {
        self.pending.clear();
        self.pos = 0;
        while self.pending.is_empty() {
            if self.eof {
                return Ok(false);
            }
            let n = match self.inner.read(&mut self.chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if n == 0 {
                self.eof = true;
                self.scanner.finish(&mut self.pending);
                continue;
            }
            for &b in &self.chunk[..n] {
                self.scanner.feed(b, &mut self.pending);
            }
        }
        Ok(true)
    }
}

impl<R: Read> Read for CommentStripper<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.pos >= self.pending.len() && !self.fill()? {
            return Ok(0);
        }
        let n = buf.len().min(self.pending.len() - self.pos);
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

//! Byte-at-a-time comment filter.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum State {
    #[default]
    Code,
    /// A `/` seen in code, not yet written.
    Slash,
    Str,
    StrEscape,
    LineComment,
    BlockComment,
    /// A `*` seen inside a block comment.
    BlockStar,
}

#[derive(Debug, Default)]
pub(crate) struct Scanner {
    state: State,
}

impl Scanner {
    pub(crate) fn feed(&mut self, b: u8, out: &mut Vec<u8>) {
        self.state = match (self.state, b) {
            (State::Code, b'/') => State::Slash,
            (State::Code, b'"') => {
                out.push(b);
                State::Str
            }
            (State::Code, _) => {
                out.push(b);
                State::Code
            }

            (State::Slash, b'/') => State::LineComment,
            (State::Slash, b'*') => State::BlockComment,
            (State::Slash, _) => {
                out.push(b'/');
                self.state = State::Code;
                return self.feed(b, out);
            }

            (State::Str, b'\\') => {
                out.push(b);
                State::StrEscape
            }
            (State::Str, b'"') => {
                out.push(b);
                State::Code
            }
            (State::Str, _) | (State::StrEscape, _) => {
                out.push(b);
                State::Str
            }

            (State::LineComment, b'\n' | b'\r') => {
                out.push(b);
                State::Code
            }
            (State::LineComment, _) => State::LineComment,

            (State::BlockComment | State::BlockStar, b'*') => State::BlockStar,
            (State::BlockStar, b'/') => State::Code,
            (State::BlockComment | State::BlockStar, _) => State::BlockComment,
        };
    }

    /// Flush a trailing `/` that turned out not to open a comment.
    pub(crate) fn finish(&mut self, out: &mut Vec<u8>) {
        if self.state == State::Slash {
            out.push(b'/');
            self.state = State::Code;
        }
    }
}

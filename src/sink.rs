//! Append-only output document.
//!
//! Single pass: once a line is written it is never revisited. Indentation is
//! an explicit parameter at every call site (two spaces per level), never
//! shared mutable state, so the recursion in the emitter stays honest about
//! the depth it writes at.

const INDENT: &str = "  ";

#[derive(Debug, Default)]
pub struct Doc {
    buf: String,
}

impl Doc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line at the given indent level.
    pub fn line(&mut self, indent: usize, text: impl AsRef<str>) {
        for _ in 0..indent {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    /// Append an empty separator line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

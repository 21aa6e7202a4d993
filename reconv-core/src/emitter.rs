//! Output sinks for the two conversion passes
//!
//! The grammar is walked twice. The first walk uses a [`CountingEmitter`]
//! to size the output, the second a [`WritingEmitter`] allocated from that
//! count. Both implement [`Emitter`] so the grammar code is shared.

/// A sink for converted bytes
pub trait Emitter {
    /// Emit a single byte
    fn emit(&mut self, byte: u8);

    /// Emit a run of bytes
    fn emit_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.emit(byte);
        }
    }

    /// Number of bytes emitted so far
    fn mark(&self) -> usize;

    /// Drop everything emitted after `mark`
    fn rewind(&mut self, mark: usize);
}

/// Counts bytes without storing them
#[derive(Debug, Default)]
pub struct CountingEmitter {
    count: usize,
}

impl CountingEmitter {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        CountingEmitter { count: 0 }
    }

    /// Total number of bytes counted
    pub fn count(&self) -> usize {
        self.count
    }
}

impl Emitter for CountingEmitter {
    fn emit(&mut self, _byte: u8) {
        self.count += 1;
    }

    fn emit_all(&mut self, bytes: &[u8]) {
        self.count += bytes.len();
    }

    fn mark(&self) -> usize {
        self.count
    }

    fn rewind(&mut self, mark: usize) {
        self.count = mark.min(self.count);
    }
}

/// Appends bytes to an owned buffer
#[derive(Debug, Default)]
pub struct WritingEmitter {
    buf: Vec<u8>,
}

impl WritingEmitter {
    /// Create a writer whose buffer is allocated once for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        WritingEmitter {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// The bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer and return its buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Emitter for WritingEmitter {
    fn emit(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    fn emit_all(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn mark(&self) -> usize {
        self.buf.len()
    }

    fn rewind(&mut self, mark: usize) {
        self.buf.truncate(mark);
    }
}

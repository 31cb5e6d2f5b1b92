//! Output capture buffer with bounded prompt search.
//!
//! Device output accumulates here between command send and prompt
//! detection. Prompts only ever appear at the end of output, so the
//! search is restricted to the last `search_depth` bytes; a command that
//! dumps a full routing table never gets rescanned from the top on every
//! received chunk.

use regex::bytes::Regex;

/// Accumulates cleaned device output and searches its tail for prompts.
#[derive(Debug)]
pub struct CaptureBuffer {
    /// Accumulated output, ANSI escapes already removed.
    buffer: Vec<u8>,

    /// How many bytes from the end to consider when matching prompts.
    search_depth: usize,
}

impl CaptureBuffer {
    /// Create a buffer that searches the last `search_depth` bytes.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            search_depth,
        }
    }

    /// Append a chunk of raw output, stripping ANSI escape sequences.
    ///
    /// Devices with colorized CLIs (and Linux shells) emit escape codes
    /// that would otherwise break prompt regexes and pollute transcripts.
    pub fn extend(&mut self, data: &[u8]) {
        let cleaned = strip_ansi_escapes::strip(data);
        self.buffer.extend_from_slice(&cleaned);
    }

    /// Search the tail of the buffer for a prompt pattern.
    pub fn search_tail(&self, pattern: &Regex) -> Option<regex::bytes::Match<'_>> {
        let start = self.buffer.len().saturating_sub(self.search_depth);
        let tail = &self.buffer[start..];
        pattern.find(tail)
    }

    /// Take ownership of everything captured so far and reset.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buffer)
    }

    /// View the captured bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of bytes captured so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether anything has been captured since the last `take`.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for CaptureBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_accumulates() {
        let mut buffer = CaptureBuffer::new(100);
        buffer.extend(b"show version\n");
        buffer.extend(b"Cisco IOS Software\n");
        assert_eq!(buffer.as_slice(), b"show version\nCisco IOS Software\n");
    }

    #[test]
    fn test_ansi_escapes_removed() {
        let mut buffer = CaptureBuffer::new(100);
        buffer.extend(b"\x1b[1;32muser@host\x1b[0m$ ");
        assert_eq!(buffer.as_slice(), b"user@host$ ");
    }

    #[test]
    fn test_prompt_found_in_tail() {
        let mut buffer = CaptureBuffer::new(50);
        buffer.extend(&[b'x'; 300]);
        buffer.extend(b"\nswitch01#");

        let pattern = Regex::new(r"switch01#").unwrap();
        assert!(buffer.search_tail(&pattern).is_some());
    }

    #[test]
    fn test_prompt_outside_search_depth_ignored() {
        let mut buffer = CaptureBuffer::new(10);
        buffer.extend(b"switch01#");
        buffer.extend(&[b'x'; 200]);

        // The prompt text scrolled past the search window, so a match
        // mid-output does not end the read early.
        let pattern = Regex::new(r"switch01#").unwrap();
        assert!(buffer.search_tail(&pattern).is_none());
    }

    #[test]
    fn test_take_resets() {
        let mut buffer = CaptureBuffer::new(100);
        buffer.extend(b"interface output");
        assert_eq!(buffer.take(), b"interface output");
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
    }
}

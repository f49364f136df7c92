//! Recursive character text splitting.
//!
//! Chunks are measured in characters. A chunk that would overflow is cut
//! back to the strongest boundary found in its second half: paragraph,
//! then line, then sentence, then word. Consecutive chunks overlap by up
//! to `chunk_overlap` characters, and the overlap also starts on a
//! boundary whenever one falls inside it.

use crate::error::MemoryError;
use crate::Result;

/// Boundaries in order of preference. The separator stays with the
/// preceding chunk.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "? ", "! ", " "];

/// A chunk of text and the character offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub text: String,
    pub start: usize,
}

/// Splits text into bounded, overlapping chunks.
#[derive(Debug, Clone, Copy)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(MemoryError::Config("chunk_size must be positive".into()));
        }
        if chunk_overlap >= chunk_size {
            return Err(MemoryError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into trimmed, non-empty chunks.
    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < len {
            let mut end = (start + self.chunk_size).min(len);
            if end < len {
                end = self.find_break(&chars, start, end);
            }

            if let Some(chunk) = trimmed_chunk(&chars, start, end) {
                chunks.push(chunk);
            }

            if end >= len {
                break;
            }
            start = self.overlap_start(&chars, start, end);
        }

        chunks
    }

    /// Latest boundary in `[start + chunk_size / 2, end]`, or `end` itself.
    fn find_break(&self, chars: &[char], start: usize, end: usize) -> usize {
        let floor = start + self.chunk_size / 2;

        for separator in SEPARATORS {
            let sep: Vec<char> = separator.chars().collect();
            if end < floor + sep.len() {
                continue;
            }

            let mut pos = end - sep.len();
            loop {
                if chars[pos..pos + sep.len()] == sep[..] {
                    return pos + sep.len();
                }
                if pos == floor {
                    break;
                }
                pos -= 1;
            }
        }

        end
    }

    /// Start of the next chunk: the strongest boundary in
    /// `[end - chunk_overlap, end)`, earliest first, or the raw offset.
    fn overlap_start(&self, chars: &[char], start: usize, end: usize) -> usize {
        let raw = end.saturating_sub(self.chunk_overlap).max(start + 1);

        for separator in SEPARATORS {
            let sep: Vec<char> = separator.chars().collect();
            let mut pos = raw.max(sep.len());
            while pos < end {
                if chars[pos - sep.len()..pos] == sep[..] {
                    return pos;
                }
                pos += 1;
            }
        }

        raw
    }
}

fn trimmed_chunk(chars: &[char], start: usize, end: usize) -> Option<TextChunk> {
    let window = &chars[start..end];
    let leading = window.iter().take_while(|c| c.is_whitespace()).count();
    let trailing = window[leading..]
        .iter()
        .rev()
        .take_while(|c| c.is_whitespace())
        .count();

    let body = &window[leading..window.len() - trailing];
    if body.is_empty() {
        return None;
    }

    Some(TextChunk {
        text: body.iter().collect(),
        start: start + leading,
    })
}

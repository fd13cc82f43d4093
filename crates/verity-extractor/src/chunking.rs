//! Splitting long articles into prompt-sized chunks
//!
//! Sizes are counted in characters, and hard splits always land on a char
//! boundary.

use crate::config::ChunkStrategy;

/// Chunks text according to the specified strategy
pub struct TextChunker {
    strategy: ChunkStrategy,
    max_chunk_chars: usize,
}

impl TextChunker {
    /// Create a new text chunker
    pub fn new(strategy: ChunkStrategy, max_chunk_chars: usize) -> Self {
        Self {
            strategy,
            max_chunk_chars: max_chunk_chars.max(1),
        }
    }

    /// Chunk the given text; never returns an empty list
    pub fn chunk(&self, text: &str) -> Vec<String> {
        if char_len(text) <= self.max_chunk_chars {
            return vec![text.to_string()];
        }

        let pieces = match self.strategy {
            ChunkStrategy::ByParagraph => paragraphs(text),
            ChunkStrategy::BySection => {
                let sections = sections(text);
                if sections.len() > 1 {
                    sections
                } else {
                    paragraphs(text)
                }
            }
            ChunkStrategy::BySentence => sentences(text),
        };

        let chunks = self.pack(pieces);
        if chunks.is_empty() {
            vec![text.to_string()]
        } else {
            chunks
        }
    }

    /// Greedily pack pieces into chunks no longer than the limit
    fn pack(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for piece in pieces {
            let piece_len = char_len(&piece);
            let joined_len = if current.is_empty() {
                piece_len
            } else {
                char_len(&current) + 2 + piece_len
            };

            if joined_len <= self.max_chunk_chars {
                if !current.is_empty() {
                    current.push_str("\n\n");
                }
                current.push_str(&piece);
                continue;
            }

            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }

            if piece_len > self.max_chunk_chars {
                chunks.extend(split_at_char_limit(&piece, self.max_chunk_chars));
            } else {
                current = piece;
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split before markdown headers (`# ...`) and numbered headings (`1. ...`)
fn sections(text: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let trimmed = line.trim_start();
        let is_header = trimmed.starts_with('#') || is_numbered_heading(trimmed);

        if is_header && !current.trim().is_empty() {
            sections.push(current.trim().to_string());
            current.clear();
        }

        current.push_str(line);
        current.push('\n');
    }

    if !current.trim().is_empty() {
        sections.push(current.trim().to_string());
    }

    sections
}

fn is_numbered_heading(line: &str) -> bool {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && line[digits..].starts_with(". ")
}

/// Split after sentence-ending punctuation, keeping the punctuation
fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let sentence = current.trim();
            if !sentence.is_empty() {
                out.push(sentence.to_string());
            }
            current.clear();
        }
    }

    if !current.trim().is_empty() {
        out.push(current.trim().to_string());
    }

    out
}

fn split_at_char_limit(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(limit).map(|c| c.iter().collect()).collect()
}

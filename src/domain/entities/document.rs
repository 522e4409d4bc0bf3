use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata record for an uploaded document, scoped to one organization.
/// The chunk contents themselves live in the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub organization_id: String,
    pub name: String,
    pub content_type: String,
    pub chunk_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(organization_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            organization_id: organization_id.into(),
            name: name.into(),
            content_type: "application/pdf".to_string(),
            chunk_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_chunk_count(mut self, chunk_count: usize) -> Self {
        self.chunk_count = chunk_count;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub document_id: Uuid,
    pub content: String,
    pub chunk_index: usize,
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    pub fn new(document_id: Uuid, content: impl Into<String>, chunk_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content: content.into(),
            chunk_index,
            metadata: ChunkMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ChunkMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub page: Option<usize>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: DocumentChunk,
    pub score: f32,
}

/// Break preferences, best first. A window is cut at the last paragraph
/// break it contains, falling back to line and word breaks, and only then
/// to a hard cut.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Splits text into chunks of at most `chunk_size` bytes, preferring to cut
/// at paragraph, then line, then word boundaries. The trailing
/// `chunk_overlap` bytes of each chunk are carried into the next one so
/// retrieval does not lose context that straddles a cut.
///
/// Chunks are trimmed; empty input yields no chunks.
pub fn split_text(content: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let text = content.trim();
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }
    let overlap = chunk_overlap.min(chunk_size / 2);

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = floor_char_boundary(text, (start + chunk_size).min(text.len()));
        if end < text.len() {
            end = find_break(text, start, end);
        }

        let chunk = text[start..end].trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        if end == text.len() {
            break;
        }

        let mut next = floor_char_boundary(text, end.saturating_sub(overlap));
        if next <= start {
            next = end;
        }
        start = next;
    }

    chunks
}

/// Finds the best cut point in `text[start..end]`, scanning backwards for
/// each separator in preference order. Returns `end` unchanged when the
/// window contains none of them.
fn find_break(text: &str, start: usize, end: usize) -> usize {
    let window = &text[start..end];
    for sep in SEPARATORS {
        if let Some(pos) = window.rfind(sep) {
            if pos > 0 {
                return start + pos;
            }
        }
    }
    end
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_empty() {
        assert!(split_text("", 100, 20).is_empty());
        assert!(split_text("   \n\n  ", 100, 20).is_empty());
    }

    #[test]
    fn test_split_short_text_single_chunk() {
        let chunks = split_text("Hello world.\n\nThis is a test.", 100, 20);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "Hello world.\n\nThis is a test.");
    }

    #[test]
    fn test_split_prefers_paragraph_boundary() {
        let text = "First paragraph.\n\nSecond paragraph.";
        let chunks = split_text(text, 20, 0);

        assert_eq!(chunks, vec!["First paragraph.", "Second paragraph."]);
    }

    #[test]
    fn test_split_falls_back_to_word_boundary() {
        let text = "one two three four five six seven eight nine ten";
        let chunks = split_text(text, 16, 0);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 16);
            assert!(!chunk.starts_with(' ') && !chunk.ends_with(' '));
        }
        // No word may be cut in half.
        for word in text.split(' ') {
            assert!(chunks.iter().any(|c| c.contains(word)), "lost {word}");
        }
    }

    #[test]
    fn test_split_overlap_repeats_tail() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let chunks = split_text(text, 20, 8);

        assert!(chunks.len() > 1);
        let total: usize = chunks.iter().map(String::len).sum();
        // With overlap the chunks must together be longer than the source.
        assert!(total > text.len());
    }

    #[test]
    fn test_split_hard_cut_without_separators() {
        let text = "a".repeat(25);
        let chunks = split_text(&text, 10, 0);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 10);
        assert_eq!(chunks[2].len(), 5);
    }

    #[test]
    fn test_split_respects_char_boundaries() {
        let text = "日本語のテキストを分割するテストです。".repeat(4);
        let chunks = split_text(&text, 30, 6);

        assert!(!chunks.is_empty());
        for chunk in chunks {
            assert!(chunk.len() <= 30);
        }
    }
}

/// Byte offsets of line starts, for O(log n) offset to line lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    offsets: Vec<usize>,
}

impl LineIndex {
    /// Line 1 starts at offset 0, line 2 after the first '\n', etc.
    pub fn new(content: &str) -> Self {
        let mut offsets = vec![0];
        for (i, c) in content.char_indices() {
            if c == '\n' {
                offsets.push(i + 1);
            }
        }
        Self { offsets }
    }

    /// 1-based line containing `offset`.
    pub fn line(&self, offset: usize) -> usize {
        match self.offsets.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// 1-based (line, column) of `offset`; the column counts characters.
    pub fn position(&self, content: &str, offset: usize) -> (usize, usize) {
        let offset = offset.min(content.len());
        let line = self.line(offset);
        let start = self.offsets[line - 1];
        let column = content
            .get(start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(0);
        (line, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_lookup() {
        let content = "line1\nline2\nline3";
        let index = LineIndex::new(content);

        assert_eq!(index.offsets, vec![0, 6, 12]);
        assert_eq!(index.line(0), 1);
        assert_eq!(index.line(3), 1);
        assert_eq!(index.line(6), 2);
        assert_eq!(index.line(8), 2);
        assert_eq!(index.line(12), 3);
    }

    #[test]
    fn test_position() {
        let content = "ab\ncdé\nf";
        let index = LineIndex::new(content);

        assert_eq!(index.position(content, 0), (1, 1));
        assert_eq!(index.position(content, 4), (2, 2));
        // Past the end clamps to the last character boundary.
        assert_eq!(index.position(content, 100), (3, 2));
    }
}

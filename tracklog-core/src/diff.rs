use similar::{ChangeTag, TextDiff};

/// Line diff between a file's current content and the content a revert
/// would restore. Only used for display; diffs are never stored.
#[derive(Debug, Clone)]
pub struct FileDiff {
    pub file_name: String,
    pub diff_lines: Vec<DiffLine>,
    pub binary: bool,
}

#[derive(Debug, Clone)]
pub struct DiffLine {
    pub line_type: DiffLineType,
    pub content: String,
    pub old_line_number: Option<usize>,
    pub new_line_number: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineType {
    Context,
    Addition,
    Deletion,
}

impl FileDiff {
    pub fn between(file_name: &str, old: &[u8], new: &[u8]) -> Self {
        let (diff_lines, binary) = match (std::str::from_utf8(old), std::str::from_utf8(new)) {
            (Ok(old), Ok(new)) => (Self::compute_diff(old, new), false),
            _ => (Vec::new(), true),
        };

        FileDiff {
            file_name: file_name.to_string(),
            diff_lines,
            binary,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        !self.binary
            && self
                .diff_lines
                .iter()
                .all(|l| l.line_type == DiffLineType::Context)
    }

    fn compute_diff(old_text: &str, new_text: &str) -> Vec<DiffLine> {
        let diff = TextDiff::from_lines(old_text, new_text);
        let mut lines = Vec::new();
        let mut old_line_num = 1;
        let mut new_line_num = 1;

        for change in diff.iter_all_changes() {
            let (line_type, old_num, new_num) = match change.tag() {
                ChangeTag::Delete => {
                    let num = old_line_num;
                    old_line_num += 1;
                    (DiffLineType::Deletion, Some(num), None)
                }
                ChangeTag::Insert => {
                    let num = new_line_num;
                    new_line_num += 1;
                    (DiffLineType::Addition, None, Some(num))
                }
                ChangeTag::Equal => {
                    let old_num = old_line_num;
                    let new_num = new_line_num;
                    old_line_num += 1;
                    new_line_num += 1;
                    (DiffLineType::Context, Some(old_num), Some(new_num))
                }
            };

            lines.push(DiffLine {
                line_type,
                content: change.to_string(),
                old_line_number: old_num,
                new_line_number: new_num,
            });
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_computation() {
        let diff = FileDiff::between(
            "notes.txt",
            b"Updated content for notes.txt\n",
            b"This is a simple content for notes.txt\n",
        );

        assert!(!diff.binary);
        assert!(!diff.is_unchanged());
        assert_eq!(diff.diff_lines.len(), 2);
        assert_eq!(diff.diff_lines[0].line_type, DiffLineType::Deletion);
        assert_eq!(diff.diff_lines[0].old_line_number, Some(1));
        assert_eq!(diff.diff_lines[1].line_type, DiffLineType::Addition);
        assert_eq!(diff.diff_lines[1].new_line_number, Some(1));
    }

    #[test]
    fn test_identical_content() {
        let diff = FileDiff::between("notes.txt", b"a\nb\n", b"a\nb\n");

        assert!(diff.is_unchanged());
        assert_eq!(diff.diff_lines.len(), 2);
    }

    #[test]
    fn test_binary_content() {
        let diff = FileDiff::between("blob.bin", &[0xff, 0xfe, 0x00], b"text\n");

        assert!(diff.binary);
        assert!(diff.diff_lines.is_empty());
        assert!(!diff.is_unchanged());
    }
}

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub contents: String,
}

impl SourceFile {
    pub fn new(path: PathBuf, contents: String) -> Self {
        Self { path, contents }
    }

    /// Converts a byte offset into a 1-based `(line, column)` pair.
    ///
    /// Columns count characters, not bytes. Offsets past the end of the file
    /// resolve to the position just after the last character.
    pub fn line_column(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.contents.len());
        let mut line = 1;
        let mut line_start = 0;
        for (index, ch) in self.contents[..offset].char_indices() {
            if ch == '\n' {
                line += 1;
                line_start = index + 1;
            }
        }
        let column = self.contents[line_start..offset].chars().count() + 1;
        (line, column)
    }

    /// The text of the 1-based `line`, without its line terminator.
    pub fn line_text(&self, line: usize) -> Option<&str> {
        self.contents
            .lines()
            .nth(line.checked_sub(1)?)
            .map(|text| text.trim_end_matches('\r'))
    }
}

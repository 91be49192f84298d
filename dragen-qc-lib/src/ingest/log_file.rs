/// A discovered metric file, read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// Directory the file was found in, used to group diagnostics.
    pub directory: String,
    pub file_name: String,
    pub contents: String,
}

impl LogFile {
    #[must_use]
    pub fn new(directory: impl Into<String>, file_name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("tab character in indentation at line {line}")]
    TabIndent { line: usize },

    #[error("line {line} is indented {indent} levels deep but only {open} levels are open")]
    IndentationJump {
        line: usize,
        indent: usize,
        open: usize,
    },

    #[error("line {line} does not belong to the first plan tree")]
    DanglingLine { line: usize },
}

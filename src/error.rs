use thiserror::Error;

pub type TmulResult<T> = Result<T, TmulError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TmulError {
    // --- decode errors ---

    #[error("XML parse error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("Invalid attribute at byte {position}: {message}")]
    InvalidAttribute { position: u64, message: String },

    #[error("Document is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Closing tag </{tag}> has no matching open element")]
    UnbalancedEndTag { tag: String },

    #[error("Multiple root elements found: <{first}> and <{second}>. A document must have exactly one root")]
    MultipleRoots { first: String, second: String },

    #[error("Empty document: no elements found")]
    EmptyDocument,

    #[error("Maximum nesting depth ({max_depth}) exceeded")]
    MaxNestingDepthExceeded { max_depth: usize },

    // --- validation errors ---

    #[error("Root element <{root}> is missing the 'type' attribute")]
    MissingDocumentType { root: String },

    #[error("Unsupported document type '{found}'. Expected '{expected}'")]
    UnsupportedDocumentType { found: String, expected: String },

    // --- loading and configuration ---

    #[error("Required entry document '{name}' was not loaded")]
    MissingEntryDocument { name: String },

    #[error("Invalid style sheet: {0}")]
    Config(String),
}

impl From<std::io::Error> for TmulError {
    fn from(err: std::io::Error) -> Self {
        TmulError::Io(err.to_string())
    }
}

impl From<std::str::Utf8Error> for TmulError {
    fn from(err: std::str::Utf8Error) -> Self {
        TmulError::InvalidUtf8(err.to_string())
    }
}

impl From<serde_yaml::Error> for TmulError {
    fn from(err: serde_yaml::Error) -> Self {
        TmulError::Config(err.to_string())
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolboxError>;

#[derive(Error, Debug)]
pub enum ToolboxError {
    #[error("Git error: {0}")]
    Git(String),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolboxError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        ToolboxError::Parse {
            line,
            message: message.into(),
        }
    }
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::discover::Error> for ToolboxError {
    fn from(err: gix::discover::Error) -> Self {
        ToolboxError::GitDiscover(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for ToolboxError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        ToolboxError::RefFind(Box::new(err))
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenChatError {
    #[error("not initialized: run 'openchat init'")]
    NotInitialized,

    #[error("user name cannot be blank")]
    UserNameBlank,

    #[error("user already registered: {0}")]
    UserAlreadyRegistered(String),

    #[error("user not registered: {0}")]
    UserNotRegistered(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("a user cannot follow themselves")]
    CannotFollowSelf,

    #[error("user is already followed")]
    AlreadyFollowing,

    #[error("post contains inappropriate language")]
    InappropriateLanguage,

    #[error("id already in use: {0}")]
    IdInUse(String),

    #[error("publication not found: {0}")]
    PublicationNotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("record at line {line} rejected during replay: {source}")]
    ReplayRejected {
        line: usize,
        #[source]
        source: Box<OpenChatError>,
    },

    #[error("failed to append to action log: {0}")]
    LogWrite(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OpenChatError>;

pub type RouteResult<T> = Result<T, RouteError>;

#[derive(thiserror::Error, Debug)]
pub enum RouteError {
    #[error("malformed route: {segments} segments, need at least {minimum}")]
    MalformedRoute { segments: usize, minimum: usize },

    #[error("malformed route: missing required field {0}")]
    MissingField(&'static str),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RouteError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Structural failures the caller routes to an error view.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedRoute { .. } | Self::MissingField(_))
    }
}

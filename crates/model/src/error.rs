/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The content is moderated.
    Moderated,
    /// The model provider is rate limited.
    RateLimitExceeded,
    /// The request was rejected before reaching the model, for example
    /// because of an invalid configuration.
    InvalidRequest,
    /// Any other errors.
    Other,
}

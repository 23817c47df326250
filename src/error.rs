/// Errors surfaced by [`DiagramState::load`](crate::DiagramState::load).
///
/// Loading is all-or-nothing: when the data source or the document is
/// broken no partial tree is built and the previously loaded tree (if any)
/// stays untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The data-loading collaborator could not obtain the document.
    #[error("failed to obtain tree data: {0}")]
    Source(#[from] std::io::Error),

    /// The document could not be parsed as JSON.
    #[error("failed to parse tree data: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document root is not an object, so there is no root node to build.
    #[error("expected the document root to be an object")]
    UnexpectedShape,
}

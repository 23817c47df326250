use serde_json::Value;

use crate::error::Error;

/// The data-loading collaborator handing nested `{name, children, ...}`
/// documents to [`DiagramState::load`](crate::DiagramState::load).
///
/// The widget itself is single-threaded and event-driven; a host that
/// fetches over the network does so on its own terms and hands the
/// finished document in via the [`Value`] implementation.
pub trait TreeSource {
    /// Obtain the document.
    ///
    /// # Errors
    ///
    /// Whatever kept the document from being obtained or parsed. The error
    /// is surfaced unchanged by `load`; there is no retry.
    fn fetch(&self) -> Result<Value, Error>;
}

impl TreeSource for Value {
    fn fetch(&self) -> Result<Value, Error> {
        Ok(self.clone())
    }
}

impl TreeSource for str {
    fn fetch(&self) -> Result<Value, Error> {
        serde_json::from_str(self).map_err(Error::from)
    }
}

impl TreeSource for std::path::Path {
    fn fetch(&self) -> Result<Value, Error> {
        let text = std::fs::read_to_string(self)?;
        serde_json::from_str(&text).map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_source_parses_json() {
        let value = r#"{"name": "root"}"#.fetch().unwrap();
        assert_eq!(value["name"], "root");
    }

    #[test]
    fn str_source_propagates_parse_errors() {
        assert!(matches!("{broken".fetch(), Err(Error::Parse(_))));
    }

    #[test]
    fn missing_file_propagates_io_errors() {
        let path = std::path::Path::new("/definitely/not/here.json");
        assert!(matches!(path.fetch(), Err(Error::Source(_))));
    }
}

use std::path::PathBuf;

/// A submitted form left required fields blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill all the fields ({})", .names.join(", "))]
    BlankFields { names: Vec<String> },
}

/// The analyzer call failed or was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout
    #[error("{0}")]
    Connect(String),
    /// Analyzer answered with a non-success status; body kept verbatim
    #[error("{0}")]
    Rejected(String),
    /// Response body was not the expected JSON
    #[error("{0}")]
    Decode(String),
}

/// Reading or writing the durable override cache failed.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cache contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The YAML config override could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_blank_fields() {
        let e = ValidationError::BlankFields { names: vec!["robot".into(), "ns".into()] };
        assert_eq!(e.to_string(), "Please fill all the fields (robot, ns)");
    }

    #[test]
    fn display_rejected_is_verbatim() {
        let e = TransportError::Rejected("launch file not found".into());
        assert_eq!(e.to_string(), "launch file not found");
    }

    #[test]
    fn display_connect_is_verbatim() {
        let e = TransportError::Connect("connection refused".into());
        assert_eq!(e.to_string(), "connection refused");
    }

    #[test]
    fn display_decode_is_verbatim() {
        let e = TransportError::Decode("expected value at line 1 column 1".into());
        assert_eq!(e.to_string(), "expected value at line 1 column 1");
    }

    #[test]
    fn display_cache_io() {
        let e = CacheError::Io { path: PathBuf::from(".launchviz/x.json"), source: std::io::Error::other("disk full") };
        assert_eq!(e.to_string(), "cache I/O failed for .launchviz/x.json: disk full");
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that makes a check end up UNKNOWN instead of with a reading.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open SNMP session to {host}: {source}")]
    Session {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("SNMP request for {oid} failed: {reason}")]
    Request { oid: String, reason: String },
    #[error("invalid OID '{0}'")]
    InvalidOid(String),
    #[error("value '{0}' is not an integer")]
    NotAnInteger(String),
    #[error("walk returned {got} values for column {oid}, expected {expected}")]
    RaggedWalk {
        oid: String,
        got: usize,
        expected: usize,
    },
    #[error("walk returned {len} values which do not split into rows of {width}")]
    IncompleteRow { len: usize, width: usize },
}

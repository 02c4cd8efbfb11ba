use thiserror::Error;

/// Errors raised while building or reading call payloads
#[derive(Error, Debug)]
pub enum MediationError {
    #[error("Failed to encode {type_name}: {source}")]
    Encode {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode {stored_type} payload as {type_name}: {source}")]
    Decode {
        stored_type: String,
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, MediationError>;

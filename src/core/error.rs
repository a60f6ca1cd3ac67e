//! Error types for BSM Options

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BsmError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type BsmResult<T> = Result<T, BsmError>;

impl BsmError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_json::Error> for BsmError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for BsmError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaleError {
    #[error("not initialized: run 'rainsale init'")]
    NotInitialized,

    #[error("sale not found: {0}")]
    SaleNotFound(String),

    #[error("subgraph returned errors: {0}")]
    Subgraph(String),

    #[error("subgraph request failed with status {status}: {body}")]
    SubgraphStatus { status: u16, body: String },

    #[error("invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("invalid sale parameters: {0}")]
    InvalidParams(String),

    #[error("invalid opcode program: {0}")]
    InvalidProgram(String),

    #[error("element with id '{0}' not found")]
    ElementNotFound(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SaleError>;

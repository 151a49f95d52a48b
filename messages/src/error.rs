use thiserror::Error;

pub type Result<T> = std::result::Result<T, MessagesError>;

#[derive(Error, Debug)]
pub enum MessagesError {
    #[error("Missing interpolation value '{key}' in template: {template}")]
    MissingInterpolation { key: String, template: String },

    #[error("Malformed placeholder in template: {0}")]
    MalformedPlaceholder(String),

    #[error("Translation missing, tried: {}", .keys.join(", "))]
    MissingTranslation { keys: Vec<String> },

    #[error("Invalid message table: {0}")]
    InvalidTable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    YamlParsing(#[from] serde_yaml::Error),
}

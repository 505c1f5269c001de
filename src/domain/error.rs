use thiserror::Error;

/// Errors shared by the domain and infrastructure layers
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Token error: {message}")]
    Token { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

macro_rules! constructors {
    ($($name:ident => $variant:ident),* $(,)?) => {
        impl DomainError {
            $(
                pub fn $name(message: impl Into<String>) -> Self {
                    Self::$variant { message: message.into() }
                }
            )*
        }
    };
}

constructors! {
    validation => Validation,
    conflict => Conflict,
    configuration => Configuration,
    token => Token,
    storage => Storage,
    internal => Internal,
}

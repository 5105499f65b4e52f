use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),

    #[error("Invalid time-of-day \"{value}\" for {prayer}: expected HH:mm")]
    TimeParse { prayer: String, value: String },

    #[error("Prayer time set contains no usable entries")]
    EmptyTimings,

    #[error("Prayer times API error: {0}")]
    Api(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn time_parse<P: Into<String>, V: Into<String>>(prayer: P, value: V) -> Self {
        Self::TimeParse {
            prayer: prayer.into(),
            value: value.into(),
        }
    }

    pub fn api<S: Into<String>>(msg: S) -> Self {
        Self::Api(msg.into())
    }

    pub fn audio<S: Into<String>>(msg: S) -> Self {
        Self::Audio(msg.into())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Message suitable for user-facing output. Transport errors can carry
    /// URLs or file paths, so they get a generic line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(_) => "Database operation failed".to_string(),
            Self::Network(_) => "Network request failed".to_string(),
            Self::Anyhow(_) => "Operation failed".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

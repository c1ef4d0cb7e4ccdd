use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("ABCDENT_USERNAME and ABCDENT_PASSWORD credentials are required")]
    MissingCredentials,

    #[error("Invalid URL in {var}: {source}")]
    InvalidUrl {
        var: String,
        source: url::ParseError,
    },

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser could not be started: {0}")]
    Launch(String),

    #[error("Browser error: {0}")]
    Browser(#[from] quizchain_browser::Error),

    #[error("Fetch error: {0}")]
    Fetch(#[from] quizchain_fetch::Error),

    #[error(transparent)]
    Core(#[from] quizchain_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod dump;
pub mod error;
pub mod model;
pub mod numbers;
pub mod parsers;

pub use error::{Error, Result};
pub use model::{
    AnswerCandidate, AnswerValue, AssetKind, DownloadedAsset, Method, PageVisitResult,
    SubmitResponse,
};

//! Wire models exchanged with the Content Explorer API.

pub mod errors;
pub mod history;
pub mod session;

pub use errors::{DEFAULT_ERROR_MESSAGE, ErrorBody};
pub use history::{
    GeneratedImage, HistoryItem, HistoryKind, ImageHistoryItem, ImageHistoryResponse,
    ResultEntry, SearchHistoryItem, SearchHistoryResponse, SearchResponse,
};
pub use session::{Credentials, DEFAULT_ROLE, Session, UserRecord};

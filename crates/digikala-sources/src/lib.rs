pub mod api;
pub mod error;
pub mod fetcher;
pub mod page;
pub mod resolver;
pub mod traits;

pub use api::DigikalaApi;
pub use error::SourceError;
pub use fetcher::{CommentFetcher, FetchProgress, FetchReport};
pub use page::{comment_from_value, CommentPage};
pub use resolver::resolve;
pub use traits::CommentPageSource;

pub mod error;
pub mod extract;
pub mod fetcher;
pub mod page;

pub use error::FetchError;
pub use fetcher::PageFetcher;
pub use page::PageSnapshot;

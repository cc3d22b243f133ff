pub mod czech_central_bank;
pub mod http;

pub use czech_central_bank::CzechCentralBank;
pub use http::HttpFeedClient;

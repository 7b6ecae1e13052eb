pub mod github;
pub mod http_client_factory;
pub mod mock;
pub mod newrelic;
pub mod reqwest_poster;

pub use github::GitHubProfileFetcher;
pub use http_client_factory::HttpClientFactory;
pub use reqwest_poster::ReqwestHttpPoster;

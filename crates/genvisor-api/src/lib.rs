mod http;
pub use http::router;

mod index;

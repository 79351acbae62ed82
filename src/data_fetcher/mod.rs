pub mod descriptor;
pub mod http_client;
pub mod orchestrator;

pub use descriptor::{FetchDescriptor, HttpMethod, RawResponse};
pub use http_client::create_http_client_with_timeout;
pub use orchestrator::{execute, execute_array};

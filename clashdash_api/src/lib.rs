mod client;
mod errors;
pub mod tag;
pub mod types;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::tag::{encode_tag, normalize_tag};
use serde::{Deserialize, Serialize};

/// List envelope used by the war-log and capital-raid endpoints.
#[derive(Serialize, Deserialize)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}

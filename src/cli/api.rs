use clap::Parser;
use http::Uri;

use crate::{api::fleet, core::snapshot::ModelType};

#[derive(Parser)]
pub struct ApiArgs {
    /// Fleet API base URL.
    #[clap(
        long = "api-base-url",
        env = "API_BASE_URL",
        default_value = "https://fioletowe.live/api/v1"
    )]
    pub base_url: Uri,

    #[clap(long, env = "ZONE_ID", default_value = "1")]
    pub zone_id: u32,

    /// Model types to track, vehicles of other types are ignored.
    #[clap(
        long,
        env = "MODEL_TYPES",
        value_delimiter = ',',
        num_args = 1..,
        default_value = "1,2"
    )]
    pub model_types: Vec<ModelType>,

    #[clap(long, env = "HTTP_TIMEOUT", default_value = "10s")]
    pub http_timeout: humantime::Duration,
}

impl ApiArgs {
    pub fn new_client(&self) -> fleet::Api {
        fleet::Api::new(&self.base_url, self.zone_id, self.http_timeout.into())
    }
}

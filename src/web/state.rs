use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;
use crate::service::PassService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: PassService,
    pub client: Client,
}

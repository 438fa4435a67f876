use std::sync::Arc;

use crate::core::{AppConfig, ShowtimesResult};
use crate::notification::EmailComposer;
use crate::templates::ShowtimesRenderer;

#[derive(Clone)]
pub struct ApiState {
    pub renderer: Arc<ShowtimesRenderer>,
    pub composer: Arc<EmailComposer>,
}

impl ApiState {
    pub fn new(config: &AppConfig) -> ShowtimesResult<Self> {
        let renderer = Arc::new(ShowtimesRenderer::new(config.render.clone())?);
        let composer = Arc::new(EmailComposer::from_config(renderer.clone(), &config.mail)?);

        Ok(ApiState { renderer, composer })
    }
}

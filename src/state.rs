use std::sync::Arc;

use crate::application::services::QrService;
use crate::infrastructure::assets::FsLogoRepository;
use crate::infrastructure::render::StyledQrRenderer;

/// The QR service wired with the production renderer and logo resolver.
pub type DefaultQrService = QrService<StyledQrRenderer, FsLogoRepository>;

#[derive(Clone)]
pub struct AppState {
    pub qr_service: Arc<DefaultQrService>,
}

impl AppState {
    pub fn new(qr_service: Arc<DefaultQrService>) -> Self {
        Self { qr_service }
    }
}

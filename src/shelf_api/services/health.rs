use poem_openapi::payload::PlainText;

use crate::app::ShelfApp;

pub struct HealthService<'a> {
    pub app: &'a ShelfApp,
}

impl<'a> HealthService<'a> {
    pub fn new(app: &'a ShelfApp) -> Self {
        Self { app }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn status_text(&self) -> PlainText<String> {
        let sidebar = self.app.sidebar().await;
        PlainText(format!(
            "{} version={} catalog={} favorites={}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            self.app.settings().catalog_base_url,
            sidebar.favorites_count
        ))
    }
}

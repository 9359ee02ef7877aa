use poem_openapi::payload::Json;

use crate::{
    app::{ShelfApp, Sidebar},
    domain::models::View,
    shelf_api::models::{NoContentResponseDto, SidebarDto, ToastResponseDto},
};

pub struct ViewService<'a> {
    pub app: &'a ShelfApp,
}

fn sidebar_dto(s: Sidebar) -> Json<SidebarDto> {
    Json(SidebarDto {
        active_view: s.active_view.into(),
        favorites_count: s.favorites_count as u64,
    })
}

impl<'a> ViewService<'a> {
    pub fn new(app: &'a ShelfApp) -> Self {
        Self { app }
    }

    pub async fn sidebar(&self) -> Json<SidebarDto> {
        sidebar_dto(self.app.sidebar().await)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn navigate(&self, view: View) -> Json<SidebarDto> {
        sidebar_dto(self.app.navigate(view).await)
    }

    pub async fn toast(&self) -> ToastResponseDto {
        match self.app.toast().await {
            Some(toast) => ToastResponseDto::Ok(Json(toast.into())),
            None => ToastResponseDto::NoContent,
        }
    }

    pub async fn dismiss_toast(&self) -> NoContentResponseDto {
        self.app.dismiss_toast().await;
        NoContentResponseDto::NoContent
    }
}

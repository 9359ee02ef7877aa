use std::sync::Arc;

use poem_openapi::{
    OpenApi,
    param::Query,
    payload::{Json, PlainText},
};

use super::models::{
    AddFavoriteResponseDto, BookCardDto, BookDto, ContainsDto, DetailsResponseDto,
    NavigateRequestDto, NoContentResponseDto, RemoveFavoriteResponseDto, SearchResponseDto,
    SearchResultsDto, SidebarDto, ToastResponseDto, ToggleFavoriteResponseDto,
};
use super::services::{
    details::DetailsService, favorites::FavoritesService, health::HealthService,
    search::SearchService, view::ViewService,
};
use crate::app::ShelfApp;

pub struct ShelfApi {
    pub app: Arc<ShelfApp>,
}

#[OpenApi]
impl ShelfApi {
    #[oai(path = "/status", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn status(&self) -> PlainText<String> {
        tracing::debug!("handling /status");
        HealthService::new(&self.app).status_text().await
    }

    // ===== search box & result grid =====

    /// Set the search query and run it. A blank query clears the results.
    #[oai(path = "/v1/search", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, q))]
    async fn search(
        &self,
        /// Title to search for
        Query(q): Query<Option<String>>,
    ) -> SearchResponseDto {
        let q = q.unwrap_or_default();
        tracing::debug!(query = %q, "handling search");
        SearchService::new(&self.app).search(&q).await
    }

    /// The query and result set currently displayed
    #[oai(path = "/v1/results", method = "get")]
    async fn results(&self) -> Json<SearchResultsDto> {
        SearchService::new(&self.app).current().await
    }

    // ===== detail overlay =====

    #[oai(path = "/v1/books/details", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, key))]
    async fn details(
        &self,
        /// Catalog key, e.g. "/works/OL893415W"
        Query(key): Query<String>,
    ) -> DetailsResponseDto {
        DetailsService::new(&self.app).details(&key).await
    }

    // ===== favorites =====

    #[oai(path = "/v1/favorites", method = "get")]
    async fn list_favorites(&self) -> Json<Vec<BookCardDto>> {
        FavoritesService::new(&self.app).list().await
    }

    #[oai(path = "/v1/favorites", method = "post")]
    async fn add_favorite(&self, body: Json<BookDto>) -> AddFavoriteResponseDto {
        FavoritesService::new(&self.app).add(body.0).await
    }

    #[oai(path = "/v1/favorites", method = "delete")]
    async fn remove_favorite(&self, Query(key): Query<String>) -> RemoveFavoriteResponseDto {
        FavoritesService::new(&self.app).remove(&key).await
    }

    /// Heart button: remove when favorited, add otherwise
    #[oai(path = "/v1/favorites/toggle", method = "post")]
    async fn toggle_favorite(&self, body: Json<BookDto>) -> ToggleFavoriteResponseDto {
        FavoritesService::new(&self.app).toggle(body.0).await
    }

    #[oai(path = "/v1/favorites/contains", method = "get")]
    async fn contains_favorite(&self, Query(key): Query<String>) -> Json<ContainsDto> {
        FavoritesService::new(&self.app).contains(key).await
    }

    // ===== sidebar & notification =====

    #[oai(path = "/v1/view", method = "get")]
    async fn sidebar(&self) -> Json<SidebarDto> {
        ViewService::new(&self.app).sidebar().await
    }

    #[oai(path = "/v1/view", method = "put")]
    async fn navigate(&self, body: Json<NavigateRequestDto>) -> Json<SidebarDto> {
        ViewService::new(&self.app).navigate(body.0.view.into()).await
    }

    #[oai(path = "/v1/toast", method = "get")]
    async fn toast(&self) -> ToastResponseDto {
        ViewService::new(&self.app).toast().await
    }

    #[oai(path = "/v1/toast", method = "delete")]
    async fn dismiss_toast(&self) -> NoContentResponseDto {
        ViewService::new(&self.app).dismiss_toast().await
    }
}

#[cfg(test)]
mod tests {
    use poem::{Route, http::StatusCode, test::TestClient};
    use poem_openapi::OpenApiService;
    use serde_json::json;

    use super::*;
    use crate::{app::tests::app_with, openlibrary::stub::StubCatalog};

    async fn client(catalog: StubCatalog) -> TestClient<Route> {
        let (app, _) = app_with(catalog).await;
        let api = ShelfApi { app: Arc::new(app) };
        TestClient::new(Route::new().nest("/", OpenApiService::new(api, "OpenShelf", "test")))
    }

    #[tokio::test]
    async fn add_then_duplicate_then_remove() {
        let cli = client(StubCatalog::default()).await;
        let dune = json!({"key": "/works/1", "title": "Dune", "cover_i": 42});

        let resp = cli.post("/v1/favorites").body_json(&dune).send().await;
        resp.assert_status(StatusCode::CREATED);

        let resp = cli.post("/v1/favorites").body_json(&dune).send().await;
        resp.assert_status_is_ok();

        let resp = cli.get("/v1/favorites").send().await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        let list = json.value().array();
        assert_eq!(list.len(), 1);
        list.get(0).object().get("shelf").assert_i64(1);
        list.get(0)
            .object()
            .get("cover_url")
            .assert_string("https://covers.openlibrary.org/b/id/42-M.jpg");

        let resp = cli
            .delete("/v1/favorites")
            .query("key", &"/works/1")
            .send()
            .await;
        resp.assert_status_is_ok();

        let resp = cli
            .delete("/v1/favorites")
            .query("key", &"/works/1")
            .send()
            .await;
        resp.assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn add_without_key_is_rejected() {
        let cli = client(StubCatalog::default()).await;
        let resp = cli
            .post("/v1/favorites")
            .body_json(&json!({"key": "  ", "title": "Nothing"}))
            .send()
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_marks_favorites_and_details_resolve() {
        let catalog = StubCatalog::default().with_title_results(
            "dune",
            r#"{"docs":[{"key":"/works/1","title":"Dune"},{"key":"/works/2","title":"Dune Messiah"}]}"#,
        );
        let cli = client(catalog).await;
        cli.post("/v1/favorites")
            .body_json(&json!({"key": "/works/2", "title": "Dune Messiah"}))
            .send()
            .await
            .assert_status(StatusCode::CREATED);

        let resp = cli.get("/v1/search").query("q", &"dune").send().await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        let body = json.value().object();
        body.get("count").assert_i64(2);
        let books = body.get("books").array();
        books.get(0).object().get("favorite").assert_bool(false);
        books.get(1).object().get("favorite").assert_bool(true);

        let resp = cli
            .get("/v1/books/details")
            .query("key", &"/works/1")
            .send()
            .await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        let options = json.value().object().get("reading_options").array();
        assert_eq!(options.len(), 1);
        options
            .get(0)
            .object()
            .get("kind")
            .assert_string("view_on_catalog");

        cli.get("/v1/books/details")
            .query("key", &"/works/404")
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn navigation_and_toast() {
        let cli = client(StubCatalog::default()).await;
        cli.get("/v1/toast")
            .send()
            .await
            .assert_status(StatusCode::NO_CONTENT);

        cli.post("/v1/favorites/toggle")
            .body_json(&json!({"key": "/works/1", "title": "Dune"}))
            .send()
            .await
            .assert_status_is_ok();

        let resp = cli.get("/v1/toast").send().await;
        resp.assert_status_is_ok();
        resp.json()
            .await
            .value()
            .object()
            .get("kind")
            .assert_string("success");

        let resp = cli
            .put("/v1/view")
            .body_json(&json!({"view": "favorites"}))
            .send()
            .await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        let sidebar = json.value().object();
        sidebar.get("active_view").assert_string("favorites");
        sidebar.get("favorites_count").assert_i64(1);

        cli.delete("/v1/toast")
            .send()
            .await
            .assert_status(StatusCode::NO_CONTENT);
        cli.get("/v1/toast")
            .send()
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }
}

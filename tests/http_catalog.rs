//! The HTTP catalog against a local server publishing GeoJSON documents.
#![cfg(feature = "http-catalog")]

use axum::{Json, Router, http::StatusCode, routing::get};
use geoquiz_back::catalog::{
    CatalogError, QuizCatalog,
    http::{HttpCatalog, HttpCatalogConfig},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/maps/")
}

fn soria() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"NAMEUNIT": "Soria"}},
            {"type": "Feature", "properties": {"name": " Almazán "}},
            {"type": "Feature", "properties": {"NOMBRE_BAR": "Ágreda", "NAMEUNIT": ""}},
            {"type": "Feature", "properties": {"NAMEUNIT": "Soria"}},
            {"type": "Feature", "properties": null}
        ]
    })
}

fn catalog(base_url: String) -> HttpCatalog {
    HttpCatalog::new(HttpCatalogConfig::new(base_url)).unwrap()
}

#[tokio::test]
async fn names_and_index_are_fetched() {
    let router = Router::new()
        .route("/maps/soria.json", get(|| async { Json(soria()) }))
        .route(
            "/maps/index.json",
            get(|| async { Json(json!(["soria", "avila", "soria"])) }),
        );
    let catalog = catalog(serve(router).await);

    assert_eq!(
        catalog.load_feature_names("soria").await.unwrap(),
        vec!["Soria", "Almazán", "Ágreda"]
    );
    assert_eq!(catalog.list_quizzes().await.unwrap(), vec!["avila", "soria"]);
    assert!(catalog.health_check().await.is_ok());
}

#[tokio::test]
async fn missing_documents_map_to_catalog_errors() {
    let router = Router::new()
        .route(
            "/maps/empty.json",
            get(|| async { Json(json!({"type": "FeatureCollection", "features": []})) }),
        )
        .route(
            "/maps/broken.json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    let catalog = catalog(serve(router).await);

    assert!(matches!(
        catalog.load_feature_names("nowhere").await,
        Err(CatalogError::UnknownQuiz { quiz_id }) if quiz_id == "nowhere"
    ));
    assert!(matches!(
        catalog.load_feature_names("empty").await,
        Err(CatalogError::DataFormat { .. })
    ));
    assert!(matches!(
        catalog.load_feature_names("broken").await,
        Err(CatalogError::Unavailable { .. })
    ));
    assert!(catalog.list_quizzes().await.unwrap().is_empty());
}

//! Movie and series providers wired through the registry, against a mock TMDb.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::json;
use textless::config::TmdbConfig;
use textless::item::{BaseItem, ItemKind, MetadataProviderKind};
use textless::metadata::provider::{ImageType, RemoteImageResult};
use textless::metadata::registry::ProviderRegistry;
use textless::plugin::{register_services, ConfigurationSource, PluginConfiguration};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/";

fn image(path: &str, lang: Option<&str>) -> serde_json::Value {
    json!({
        "file_path": path,
        "iso_639_1": lang,
        "width": 1000,
        "height": 1500,
        "aspect_ratio": 0.667,
        "vote_average": 5.0,
        "vote_count": 3
    })
}

fn details(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "images": {
            "posters": [image("/en.jpg", Some("en")), image("/clean.jpg", None)],
            "backdrops": [image("/bd.jpg", None)],
            "logos": [image("/logo.png", Some("en"))]
        }
    })
}

struct Harness {
    server: MockServer,
    registry: ProviderRegistry,
    live: Arc<RwLock<PluginConfiguration>>,
}

async fn harness(exclude: bool) -> Harness {
    let server = MockServer::start().await;
    let live = Arc::new(RwLock::new(PluginConfiguration {
        exclude_text_less_images: exclude,
    }));
    let config = TmdbConfig {
        api_key: "test-key".to_string(),
        base_url: server.uri(),
        ..TmdbConfig::default()
    };
    let source: Arc<dyn ConfigurationSource> = live.clone();
    let (_client, registry) = register_services(reqwest::Client::new(), &config, source);

    Harness {
        server,
        registry,
        live,
    }
}

fn urls(result: &RemoteImageResult) -> Vec<String> {
    result
        .images
        .iter()
        .map(|i| i.url.trim_start_matches(IMAGE_BASE).to_string())
        .collect()
}

#[tokio::test]
async fn movie_by_imdb_id_excluding_textless() {
    let h = harness(true).await;
    Mock::given(method("GET"))
        .and(path("/find/tt0133093"))
        .and(query_param("external_source", "imdb_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "movie_results": [{ "id": 603, "title": "The Matrix" }]
        })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/603"))
        .respond_with(ResponseTemplate::new(200).set_body_json(details(603)))
        .expect(1)
        .mount(&h.server)
        .await;

    let item = BaseItem::new(ItemKind::Movie, "The Matrix")
        .with_language("en-US")
        .with_provider_id(MetadataProviderKind::Imdb, "tt0133093");
    let result = h
        .registry
        .get_remote_images(&item, None, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        urls(&result),
        ["original/en.jpg", "original/bd.jpg", "original/logo.png"]
    );
    assert_eq!(result.providers, ["TheMovieDb"]);
    assert_eq!(result.images[0].language.as_deref(), Some("en-US"));
    assert_eq!(result.images[0].width, Some(1000));
}

#[tokio::test]
async fn configuration_change_applies_to_next_query() {
    let h = harness(true).await;
    Mock::given(method("GET"))
        .and(path("/movie/603"))
        .respond_with(ResponseTemplate::new(200).set_body_json(details(603)))
        .expect(2)
        .mount(&h.server)
        .await;

    let item = BaseItem::new(ItemKind::Movie, "The Matrix")
        .with_provider_id(MetadataProviderKind::Tmdb, "603");
    let cancel = CancellationToken::new();

    let before = h.registry.get_remote_images(&item, Some(ImageType::Primary), &cancel).await.unwrap();
    assert_eq!(urls(&before), ["original/en.jpg"]);

    h.live.write().exclude_text_less_images = false;

    let after = h.registry.get_remote_images(&item, Some(ImageType::Primary), &cancel).await.unwrap();
    assert_eq!(urls(&after), ["original/en.jpg", "original/clean.jpg"]);
}

#[tokio::test]
async fn series_never_uses_find() {
    let h = harness(true).await;
    Mock::given(method("GET"))
        .and(path("/find/tt0944947"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tv_results": [{ "id": 1399 }] })))
        .expect(0)
        .mount(&h.server)
        .await;

    let item = BaseItem::new(ItemKind::Series, "Game of Thrones")
        .with_provider_id(MetadataProviderKind::Imdb, "tt0944947");
    let result = h
        .registry
        .get_remote_images(&item, None, &CancellationToken::new())
        .await
        .unwrap();
    assert!(result.images.is_empty());
}

#[tokio::test]
async fn series_by_tmdb_id() {
    let h = harness(false).await;
    Mock::given(method("GET"))
        .and(path("/tv/1399"))
        .and(query_param("append_to_response", "images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(details(1399)))
        .expect(1)
        .mount(&h.server)
        .await;

    let item = BaseItem::new(ItemKind::Series, "Game of Thrones")
        .with_provider_id(MetadataProviderKind::Tmdb, "1399");
    let result = h
        .registry
        .get_remote_images(&item, None, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(result.total_record_count, 4);
    assert_eq!(result.images[3].image_type, ImageType::Logo);
}

#[tokio::test]
async fn upstream_failure_is_skipped_by_registry() {
    let h = harness(false).await;
    Mock::given(method("GET"))
        .and(path("/movie/603"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&h.server)
        .await;

    let item = BaseItem::new(ItemKind::Movie, "m").with_provider_id(MetadataProviderKind::Tmdb, "603");
    let result = h
        .registry
        .get_remote_images(&item, None, &CancellationToken::new())
        .await
        .unwrap();
    assert!(result.images.is_empty());
    assert!(result.providers.is_empty());

    // Called directly, the provider surfaces the failure.
    let provider = h.registry.for_item(&item)[0];
    let err = provider
        .get_images(&item, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 502);
}

#[tokio::test]
async fn image_pass_through_keeps_status_and_body() {
    let h = harness(false).await;
    Mock::given(method("GET"))
        .and(path("/t/p/original/en.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(vec![0xFF, 0xD8, 0xFF]),
        )
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/t/p/original/missing.jpg"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&h.server)
        .await;

    let provider = h.registry.get("TheMovieDb").unwrap();
    let cancel = CancellationToken::new();

    let ok = provider
        .get_image_response(&format!("{}/t/p/original/en.jpg", h.server.uri()), &cancel)
        .await
        .unwrap();
    assert_eq!(ok.status().as_u16(), 200);
    assert_eq!(ok.bytes().await.unwrap().as_ref(), [0xFF, 0xD8, 0xFF]);

    let missing = provider
        .get_image_response(&format!("{}/t/p/original/missing.jpg", h.server.uri()), &cancel)
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
    assert_eq!(missing.text().await.unwrap(), "gone");
}

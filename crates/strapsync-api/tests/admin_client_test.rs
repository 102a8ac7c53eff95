#![allow(clippy::unwrap_used)]
// Integration tests for `AdminClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use strapsync_api::{AdminClient, Error, FolderQuery, TransportConfig, UploadRequest};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AdminClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = AdminClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn ids(prefix: &str, count: usize) -> Vec<serde_json::Value> {
    (0..count)
        .map(|i| json!({ "documentId": format!("{prefix}{i}") }))
        .collect()
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_attaches_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .and(body_json(json!({ "email": "ops@example.com", "password": "hunter2" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "token": "jwt-abc" } })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/content-type-builder/schema"))
        .and(header("authorization", "Bearer jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let password = SecretString::from("hunter2".to_string());
    let client = AdminClient::login(
        Url::parse(&server.uri()).unwrap(),
        "ops@example.com",
        &password,
        &TransportConfig::default(),
    )
    .await
    .unwrap();

    client.content_type_schema().await.unwrap();
}

#[tokio::test]
async fn test_login_without_token_reports_account_not_password() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "status": 400, "message": "Invalid credentials" }
        })))
        .mount(&server)
        .await;

    let password = SecretString::from("s3cret-value".to_string());
    let result = AdminClient::login(
        Url::parse(&server.uri()).unwrap(),
        "ops@example.com",
        &password,
        &TransportConfig::default(),
    )
    .await;

    let Err(err) = result else {
        panic!("expected login failure");
    };
    assert!(err.is_auth_failure(), "unexpected error: {err:?}");
    let message = err.to_string();
    assert!(message.contains("ops@example.com"));
    assert!(message.contains("Invalid credentials"));
    assert!(!message.contains("s3cret-value"));
}

#[tokio::test]
async fn test_rejected_token_is_auth_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/content-type-builder/schema"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.content_type_schema().await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }), "got {err:?}");
}

// ── Content manager ─────────────────────────────────────────────────

#[tokio::test]
async fn test_single_type_read_uses_published_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/content-manager/single-types/api::homepage.homepage"))
        .and(query_param("status", "published"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": 3, "title": "Welcome" }
        })))
        .mount(&server)
        .await;

    let doc = client
        .get_single_type("api::homepage.homepage")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc["title"], "Welcome");
}

#[tokio::test]
async fn test_single_type_without_data_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/content-manager/single-types/api::footer.footer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .mount(&server)
        .await;

    assert!(
        client
            .get_single_type("api::footer.footer")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_unfilled_single_type_404_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/content-manager/single-types/api::homepage.homepage"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "data": null,
            "error": { "status": 404, "name": "NotFoundError", "message": "Not Found" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(
        client
            .get_single_type("api::homepage.homepage")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_single_type_server_error_still_fails() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/content-manager/single-types/api::homepage.homepage"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client
        .get_single_type("api::homepage.homepage")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { status: 500, .. }), "got {err:?}");
}

#[tokio::test]
async fn test_list_document_ids_walks_every_page() {
    let (server, client) = setup().await;
    let uid = "api::article.article";
    let list_path = format!("/content-manager/collection-types/{uid}");

    for (page, count) in [("1", 100), ("2", 100), ("3", 50)] {
        Mock::given(method("GET"))
            .and(path(list_path.as_str()))
            .and(query_param("page", page))
            .and(query_param("pageSize", "100"))
            .and(query_param("status", "published"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": ids(&format!("p{page}-"), count),
                "pagination": { "page": 1, "pageSize": 100, "pageCount": 3, "total": 250 }
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let all = client.list_document_ids(uid).await.unwrap();
    assert_eq!(all.len(), 250);
    assert_eq!(all[0], "p1-0");
    assert_eq!(all[249], "p3-49");
}

#[tokio::test]
async fn test_exact_page_multiple_fetches_trailing_empty_page() {
    let (server, client) = setup().await;
    let uid = "api::tag.tag";
    let list_path = format!("/content-manager/collection-types/{uid}");

    Mock::given(method("GET"))
        .and(path(list_path.as_str()))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "results": ids("t", 100) })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(list_path.as_str()))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.list_document_ids(uid).await.unwrap().len(), 100);
}

#[tokio::test]
async fn test_bulk_delete_and_publish_paths() {
    let (server, client) = setup().await;
    let base = "/content-manager/collection-types/api::article.article";

    Mock::given(method("POST"))
        .and(path(format!("{base}/actions/bulkDelete")))
        .and(body_json(json!({ "documentIds": ["a", "b"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 2 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{base}/actions/publish")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{base}/doc-1/actions/publish")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let uid = "api::article.article";
    client
        .bulk_delete_documents(uid, &["a".into(), "b".into()])
        .await
        .unwrap();
    client
        .publish_new_document(uid, &json!({ "title": "x" }))
        .await
        .unwrap();
    client
        .publish_existing_document(uid, "doc-1", &json!({ "title": "y" }))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_api_error_message_is_extracted() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(
            "/content-manager/single-types/api::homepage.homepage/actions/publish",
        ))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "status": 400, "message": "title must be defined" }
        })))
        .mount(&server)
        .await;

    let err = client
        .publish_single_type("api::homepage.homepage", &json!({}))
        .await
        .unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "title must be defined");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

// ── Media library ───────────────────────────────────────────────────

#[tokio::test]
async fn test_root_and_child_folder_queries() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/upload/folders"))
        .and(query_param("filters[$and][0][parent][id][$null]", "true"))
        .and(query_param("sort", "createdAt:DESC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": 1, "name": "banners", "path": "/1", "pathId": 1,
                "children": { "count": 0 }, "files": { "count": 2 }
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/upload/folders"))
        .and(query_param("folderPath", "/1"))
        .and(query_param("filters[$and][0][parent][id]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let roots = client.list_folders(&FolderQuery::Root).await.unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].name, "banners");
    assert_eq!(roots[0].files.count, 2);

    let children = client
        .list_folders(&FolderQuery::Children {
            parent_id: 1,
            path: "/1".into(),
        })
        .await
        .unwrap();
    assert!(children.is_empty());
}

#[tokio::test]
async fn test_list_files_filters_on_folder_path() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/upload/files"))
        .and(query_param("filters[$and][0][folderPath][$eq]", "/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": 10, "name": "hero.png", "url": "/uploads/hero.png", "folderPath": "/" }],
            "pagination": { "page": 1, "pageSize": 100, "pageCount": 1, "total": 1 }
        })))
        .mount(&server)
        .await;

    let files = client.list_files("/").await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "hero.png");
    assert_eq!(files[0].folder_path, "/");
}

#[tokio::test]
async fn test_create_folder_and_bulk_delete() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/upload/folders"))
        .and(body_json(json!({ "name": "banners", "parent": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": 42, "name": "banners", "path": "/42" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload/actions/bulk-delete"))
        .and(body_json(json!({ "fileIds": [1, 2], "folderIds": [3] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_folder("banners", None).await.unwrap();
    assert_eq!(created.id, 42);
    assert_eq!(created.path, "/42");

    client.bulk_delete_media(&[1, 2], &[3]).await.unwrap();
}

#[tokio::test]
async fn test_download_resolves_relative_url() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/uploads/hero.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNGDATA".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("hero.png");
    let written = client.download_to("/uploads/hero.png", &dest).await.unwrap();

    assert_eq!(written, 7);
    assert_eq!(std::fs::read(&dest).unwrap(), b"PNGDATA");
}

#[tokio::test]
async fn test_upload_sends_file_info_and_returns_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("\"folder\":5"))
        .and(body_string_contains("\"name\":\"hero.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 77 }])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("hero.png");
    std::fs::write(&local, b"PNGDATA").unwrap();

    let id = client
        .upload_file(&UploadRequest {
            path: local,
            file_name: "hero.png".into(),
            folder_id: Some(5),
            replace_id: None,
        })
        .await
        .unwrap();
    assert_eq!(id, 77);
}

#[tokio::test]
async fn test_replace_upload_keeps_existing_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(query_param("id", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "hero.png" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("hero.png");
    std::fs::write(&local, b"PNGDATA").unwrap();

    let id = client
        .upload_file(&UploadRequest {
            path: local,
            file_name: "hero.png".into(),
            folder_id: None,
            replace_id: Some(12),
        })
        .await
        .unwrap();
    assert_eq!(id, 12);
}

//! Route registration — collects module routes + pages + system endpoints.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::middleware;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;

use pendataan::service::PendataanService;

use crate::auth_middleware::{self, JwtState};
use crate::login;

/// Application shared state.
#[derive(Clone)]
pub struct AppState {
    pub jwt_state: Arc<JwtState>,
    pub server_config: Arc<crate::config::ServerConfig>,
    pub service: Arc<PendataanService>,
}

/// Build the complete router with all routes.
pub fn build_router(state: AppState, module_routes: Vec<(&str, Router)>) -> Router {
    let jwt_state = state.jwt_state.clone();

    // System endpoints (public, no state needed).
    let system_routes = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    // Pages and the login route (which needs AppState).
    let mut app: Router<()> = Router::new()
        .route("/", get(index_page))
        .route("/enumerator", get(enumerator_page))
        .route("/enumerator/tambah", get(enumerator_form_page))
        .route("/enumerator/ubah/{id}", get(enumerator_form_page))
        .route("/kebijakan", get(kebijakan_page))
        .merge(login::routes())
        .with_state(state);

    // Merge stateless system routes.
    app = app.merge(system_routes);

    // Module routes are already Router<()> (they called .with_state()
    // internally) and carry absolute paths.
    for (name, router) in module_routes {
        tracing::info!("Mounting {} module routes", name);
        app = app.merge(router);
    }

    // Registered before the middleware layer so a wrong method on a known
    // path answers with the JSON 405 contract instead of an empty body.
    app = app.method_not_allowed_fallback(method_not_allowed);

    // Apply JWT auth middleware to all routes.
    app.layer(middleware::from_fn_with_state(
        jwt_state,
        auth_middleware::auth_middleware,
    ))
}

async fn index_page() -> impl IntoResponse {
    Html(include_str!("web/login.html"))
}

async fn enumerator_page() -> impl IntoResponse {
    Html(include_str!("web/enumerator.html"))
}

async fn enumerator_form_page() -> impl IntoResponse {
    Html(include_str!("web/enumerator_form.html"))
}

async fn kebijakan_page() -> impl IntoResponse {
    Html(include_str!("web/kebijakan.html"))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "sipekad",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        axum::Json(serde_json::json!({
            "message": "Method not allowed",
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JwtConfig, RootConfig, ServerConfig, StorageConfig};
    use jsonwebtoken::{DecodingKey, Validation};
    use pendataan::model::{
        CreateAdmin, CreateEnumerator, CreateInstansi, CreateKebijakan, KebijakanDetail,
    };
    use pendataan::PendataanModule;
    use serde_json::{json, Value};
    use sipeka_core::Module;

    struct TestServer {
        base_url: String,
        service: Arc<PendataanService>,
        shutdown: Option<tokio::sync::oneshot::Sender<()>>,
    }

    impl TestServer {
        async fn spawn() -> TestServer {
            let sql: Arc<dyn sipeka_sql::SQLStore> =
                Arc::new(sipeka_sql::sqlite::SqliteStore::open_in_memory().unwrap());
            let module = PendataanModule::new(sql).unwrap();
            let service = module.service().clone();

            let server_config = Arc::new(ServerConfig {
                root: RootConfig {
                    password_hash: "$argon2id$fake".to_string(),
                    email: "root@sipeka.local".to_string(),
                },
                storage: StorageConfig {
                    data_dir: "/tmp".to_string(),
                },
                jwt: JwtConfig {
                    secret: "test-secret".to_string(),
                    expire_secs: 3600,
                },
            });
            let jwt_state = Arc::new(JwtState {
                decoding_key: DecodingKey::from_secret(server_config.jwt.secret.as_bytes()),
                validation: Validation::default(),
            });

            let state = AppState {
                jwt_state,
                server_config,
                service: service.clone(),
            };
            let routes = vec![(module.name(), module.routes())];
            let app = build_router(state, routes);

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let (tx, rx) = tokio::sync::oneshot::channel::<()>();
            tokio::spawn(async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = rx.await;
                    })
                    .await
                    .unwrap();
            });

            TestServer {
                base_url: format!("http://{}", addr),
                service,
                shutdown: Some(tx),
            }
        }

        fn url(&self, path: &str) -> String {
            format!("{}{}", self.base_url, path)
        }
    }

    impl Drop for TestServer {
        fn drop(&mut self) {
            if let Some(tx) = self.shutdown.take() {
                let _ = tx.send(());
            }
        }
    }

    fn seed_agency_admin_enumerators(
        server: &TestServer,
    ) -> (pendataan::model::Instansi, pendataan::model::Pengguna) {
        let agency = server
            .service
            .create_instansi(CreateInstansi { name: "BKN".into() })
            .unwrap();
        let admin = server
            .service
            .create_admin(CreateAdmin {
                name: "Admin Satu".into(),
                email: "admin@bkn.go.id".into(),
                password: "rahasia123".into(),
                instansi_id: Some(agency.id),
            })
            .unwrap();
        for (name, email, nip) in [
            ("Citra Lestari", "citra@bkn.go.id", Some("198802022011012002")),
            ("Budi Santoso", "budi@bkn.go.id", None),
        ] {
            server
                .service
                .create_enumerator(CreateEnumerator {
                    name: name.into(),
                    email: email.into(),
                    instansi_id: agency.id,
                    password: None,
                    nip: nip.map(str::to_string),
                    unit_kerja: None,
                })
                .unwrap();
        }
        (agency, admin)
    }

    async fn login_token(server: &TestServer, email: &str, password: &str) -> String {
        let resp = reqwest::Client::new()
            .post(server.url("/auth/login"))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["access_token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_pengguna_enumerator_listing() {
        let server = TestServer::spawn().await;
        let (agency, admin) = seed_agency_admin_enumerators(&server);

        let resp = reqwest::get(server.url(&format!(
            "/api/pengguna_enumerator?admin_instansi_id={}",
            admin.id
        )))
        .await
        .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();

        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"], json!(agency.id.to_string()));
        assert_eq!(list[0]["name"], json!("BKN"));

        let enumerator = list[0]["enumerator"].as_array().unwrap();
        assert_eq!(enumerator.len(), 2);
        // Ordered by name; ids come back as strings.
        assert_eq!(enumerator[0]["name"], json!("Budi Santoso"));
        assert_eq!(enumerator[1]["name"], json!("Citra Lestari"));
        assert!(enumerator[0]["id"].is_string());
        assert_eq!(enumerator[0]["nip"], Value::Null);
        assert_eq!(enumerator[1]["nip"], json!("198802022011012002"));
        for e in enumerator {
            let keys = e.as_object().unwrap();
            for key in ["id", "name", "nip", "unit_kerja"] {
                assert!(keys.contains_key(key), "missing key {}", key);
            }
        }
    }

    #[tokio::test]
    async fn test_pengguna_enumerator_edge_shapes() {
        let server = TestServer::spawn().await;

        // Missing parameter.
        let resp = reqwest::get(server.url("/api/pengguna_enumerator"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], json!("admin_instansi_id is required"));

        // Unknown admin: empty array, still 200.
        let resp = reqwest::get(server.url("/api/pengguna_enumerator?admin_instansi_id=999"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!([]));

        // Agency without enumerators: one element, empty nested array.
        let agency = server
            .service
            .create_instansi(CreateInstansi { name: "BPS".into() })
            .unwrap();
        let admin = server
            .service
            .create_admin(CreateAdmin {
                name: "Admin".into(),
                email: "admin@bps.go.id".into(),
                password: "rahasia123".into(),
                instansi_id: Some(agency.id),
            })
            .unwrap();
        let resp = reqwest::get(server.url(&format!(
            "/api/pengguna_enumerator?admin_instansi_id={}",
            admin.id
        )))
        .await
        .unwrap();
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["enumerator"], json!([]));
    }

    #[tokio::test]
    async fn test_kebijakan_instansi_rows() {
        let server = TestServer::spawn().await;
        let (agency, _) = seed_agency_admin_enumerators(&server);
        let enumerator = server
            .service
            .find_pengguna_by_email("budi@bkn.go.id")
            .unwrap()
            .unwrap();

        server
            .service
            .create_kebijakan(CreateKebijakan {
                name: "Perka Arsip Digital".into(),
                instansi_id: agency.id,
                enumerator_id: Some(enumerator.id),
                proses_id: None,
                detail: Some(KebijakanDetail {
                    progress: Some(75),
                    effective_date: Some("2025-01-01".into()),
                }),
            })
            .unwrap();
        server
            .service
            .create_kebijakan(CreateKebijakan {
                name: "Perka Tata Naskah".into(),
                instansi_id: agency.id,
                enumerator_id: None,
                proses_id: None,
                detail: None,
            })
            .unwrap();

        let resp = reqwest::get(server.url(&format!(
            "/api/policies/instansi?agency_id={}",
            agency.id
        )))
        .await
        .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 2);

        // Every row carries all eight fields, nulls included.
        for row in rows {
            let obj = row.as_object().unwrap();
            assert_eq!(obj.len(), 8);
            for key in [
                "id",
                "enumerator",
                "name",
                "tanggal_proses",
                "tanggal_berlaku",
                "instansi",
                "progress_pengisian",
                "status_kebijakan",
            ] {
                assert!(obj.contains_key(key), "missing key {}", key);
            }
        }

        assert!(rows[0]["id"].is_string());
        assert_eq!(rows[0]["enumerator"], json!("Budi Santoso"));
        assert_eq!(rows[0]["name"], json!("Perka Arsip Digital"));
        assert!(rows[0]["tanggal_proses"].is_string());
        assert_eq!(rows[0]["tanggal_berlaku"], json!("2025-01-01"));
        assert_eq!(rows[0]["instansi"], json!("BKN"));
        assert_eq!(rows[0]["progress_pengisian"], json!(75));
        assert_eq!(rows[0]["status_kebijakan"], json!("Belum Diproses"));

        assert_eq!(rows[1]["enumerator"], Value::Null);
        assert_eq!(rows[1]["tanggal_proses"], Value::Null);
        assert_eq!(rows[1]["tanggal_berlaku"], Value::Null);
        assert_eq!(rows[1]["progress_pengisian"], Value::Null);
    }

    #[tokio::test]
    async fn test_kebijakan_instansi_errors() {
        let server = TestServer::spawn().await;

        // Missing parameter.
        let resp = reqwest::get(server.url("/api/policies/instansi"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], json!("agency_id is required"));

        // Non-numeric id falls into the catch-all envelope.
        let resp = reqwest::get(server.url("/api/policies/instansi?agency_id=abc"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 500);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], json!("Something went wrong"));
        assert!(!body["error"].as_str().unwrap().is_empty());

        // Unknown agency is just empty, not an error.
        let resp = reqwest::get(server.url("/api/policies/instansi?agency_id=999"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_read_endpoints_reject_other_methods() {
        let server = TestServer::spawn().await;
        let client = reqwest::Client::new();

        for url in [
            server.url("/api/policies/instansi?agency_id=1"),
            server.url("/api/pengguna_enumerator?admin_instansi_id=1"),
        ] {
            let resp = client.post(&url).json(&json!({})).send().await.unwrap();
            assert_eq!(resp.status(), 405);
            let body: Value = resp.json().await.unwrap();
            assert_eq!(body["message"], json!("Method not allowed"));

            let resp = client.delete(&url).send().await.unwrap();
            assert_eq!(resp.status(), 405);
        }
    }

    #[tokio::test]
    async fn test_login_issues_token() {
        let server = TestServer::spawn().await;
        let (agency, admin) = seed_agency_admin_enumerators(&server);

        let resp = reqwest::Client::new()
            .post(server.url("/auth/login"))
            .json(&json!({"email": "admin@bkn.go.id", "password": "rahasia123"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert!(!body["access_token"].as_str().unwrap().is_empty());
        assert_eq!(body["token_type"], json!("Bearer"));
        assert_eq!(body["id"], json!(admin.id.to_string()));
        assert_eq!(body["name"], json!("Admin Satu"));
        assert_eq!(body["peran"], json!(4));
        assert_eq!(body["instansi_id"], json!(agency.id.to_string()));

        // Wrong password and unknown email both answer 401.
        let resp = reqwest::Client::new()
            .post(server.url("/auth/login"))
            .json(&json!({"email": "admin@bkn.go.id", "password": "salah"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 401);

        let resp = reqwest::Client::new()
            .post(server.url("/auth/login"))
            .json(&json!({"email": "nobody@bkn.go.id", "password": "rahasia123"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 401);
    }

    #[tokio::test]
    async fn test_crud_requires_token() {
        let server = TestServer::spawn().await;
        let (agency, _) = seed_agency_admin_enumerators(&server);
        let client = reqwest::Client::new();

        let input = json!({
            "name": "Dewi Anggraini",
            "email": "dewi@bkn.go.id",
            "instansi_id": agency.id.to_string(),
        });

        // No token: 401 from the middleware.
        let resp = client
            .post(server.url("/api/enumerator"))
            .json(&input)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 401);

        // Garbage token: still 401.
        let resp = client
            .post(server.url("/api/enumerator"))
            .bearer_auth("garbage")
            .json(&input)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 401);

        // Valid token: created.
        let token = login_token(&server, "admin@bkn.go.id", "rahasia123").await;
        let resp = client
            .post(server.url("/api/enumerator"))
            .bearer_auth(&token)
            .json(&input)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["name"], json!("Dewi Anggraini"));
        assert!(body.get("password_hash").is_none());

        let resp = client
            .get(server.url("/api/enumerator"))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["total"], json!(3));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflict_envelope() {
        let server = TestServer::spawn().await;
        let (agency, _) = seed_agency_admin_enumerators(&server);
        let token = login_token(&server, "admin@bkn.go.id", "rahasia123").await;

        let input = json!({
            "name": "Budi Kedua",
            "email": "budi@bkn.go.id",
            "instansi_id": agency.id.to_string(),
        });
        let resp = reqwest::Client::new()
            .post(server.url("/api/enumerator"))
            .bearer_auth(&token)
            .json(&input)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 409);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["code"], json!("ALREADY_EXISTS"));
    }

    #[tokio::test]
    async fn test_pages_served() {
        let server = TestServer::spawn().await;

        let body = reqwest::get(server.url("/")).await.unwrap().text().await.unwrap();
        assert!(body.contains("SIPEKA"));

        let body = reqwest::get(server.url("/enumerator"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("Daftar Enumerator"));
        assert!(body.contains("Tidak ada data enumerator"));
        assert!(body.contains("Apakah kamu yakin ingin menghapus enumerator ini?"));

        let body = reqwest::get(server.url("/enumerator/ubah/12"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("Enumerator"));

        let body = reqwest::get(server.url("/kebijakan"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("Daftar Kebijakan"));
    }

    #[tokio::test]
    async fn test_system_endpoints() {
        let server = TestServer::spawn().await;

        let resp = reqwest::get(server.url("/health")).await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], json!("ok"));

        let resp = reqwest::get(server.url("/version")).await.unwrap();
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["name"], json!("sipekad"));

        let resp = reqwest::get(server.url("/nonexistent")).await.unwrap();
        assert_eq!(resp.status(), 404);
    }
}

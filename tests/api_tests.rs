use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

use vehicle_rental::{
    build_router,
    config::EnvironmentConfig,
    repositories::Repositories,
    services::{EmailSender, LocalFileStorage},
    state::AppState,
};

const BOUNDARY: &str = "----vehicle-rental-test-boundary";

/// Sender que guarda los tokens enviados en lugar de mandar emails
#[derive(Default)]
struct RecordingEmailSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingEmailSender {
    fn last_token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send_verification(&self, email: &str, token: &str) -> bool {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        true
    }
}

struct TestApp {
    router: Router,
    state: AppState,
    emails: Arc<RecordingEmailSender>,
    uploads: TempDir,
}

fn test_config(upload_dir: &Path) -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expiration_minutes: 30,
        bcrypt_cost: 4,
        cors_origins: Vec::new(),
        upload_dir: upload_dir.to_string_lossy().into_owned(),
        public_upload_path: "/uploads".to_string(),
        max_file_size: 1024 * 1024,
        frontend_url: "http://localhost:3000".to_string(),
        brevo_api_key: None,
        email_from: "no-reply@example.com".to_string(),
        email_from_name: "Test Rentals".to_string(),
        admin_email: None,
        admin_password: None,
    }
}

impl TestApp {
    fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let config = test_config(uploads.path());
        let storage = LocalFileStorage::new(uploads.path(), "/uploads", config.max_file_size);
        let emails = Arc::new(RecordingEmailSender::default());

        let state = AppState::new(
            config,
            Repositories::in_memory(),
            Arc::new(storage),
            emails.clone(),
        );
        let router = build_router(state.clone());

        Self {
            router,
            state,
            emails,
            uploads,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn upload(
        &self,
        uri: &str,
        token: &str,
        file_name: &str,
        contents: &[u8],
        fields: &[(&str, &str)],
    ) -> (StatusCode, Value) {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, name, value
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.json(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registra, verifica y devuelve un access token
    async fn verified_user(&self, email: &str) -> String {
        let (status, _) = self
            .json(
                Method::POST,
                "/auth/signup",
                None,
                Some(json!({ "email": email, "password": "secret1" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let token = self.emails.last_token_for(email).unwrap();
        let (status, _) = self
            .json(
                Method::POST,
                "/auth/verify-email",
                None,
                Some(json!({ "token": token })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = self.login(email, "secret1").await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    async fn admin(&self) -> String {
        self.state
            .auth
            .create_admin("admin@example.com", "adminpass")
            .await
            .unwrap();
        let (status, body) = self.login("admin@example.com", "adminpass").await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    async fn create_vehicle(&self, admin: &str, plate: &str, vin: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/vehicles",
                Some(admin),
                Some(json!({
                    "make": "Toyota",
                    "model": "Camry",
                    "year": 2022,
                    "license_plate": plate,
                    "vin": vin,
                    "bond_amount": "1000.00",
                    "rent_per_week": "350.00",
                    "current_mileage": 12000,
                    "odo_meter": 12000,
                    "next_service_date": "2026-06-01",
                    "vehicle_type": "Sedan",
                    "color": "White",
                    "fuel_type": "Hybrid",
                    "transmission": "Automatic"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn submit_rental(&self, token: &str, vehicle_id: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/rentals",
                Some(token),
                Some(json!({
                    "vehicle_id": vehicle_id,
                    "first_name": "Alex",
                    "last_name": "Driver",
                    "email": "alex@example.com",
                    "phone": "+61 400 123 456",
                    "license_number": "DL-998877",
                    "license_expiry": "2028-03-01",
                    "address": "1 Main St",
                    "emergency_contact": "Sam Driver",
                    "emergency_phone": "+61 400 654 321",
                    "contract_period": "6 months"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["data"]["status"], "pending");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn vehicle_status(&self, token: &str, vehicle_id: &str) -> String {
        let (status, body) = self
            .json(Method::GET, &format!("/vehicles/{}", vehicle_id), Some(token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["status"].as_str().unwrap().to_string()
    }

    async fn decide(&self, admin: &str, rental_id: &str, outcome: &str) -> (StatusCode, Value) {
        self.json(
            Method::PUT,
            &format!("/rentals/{}/decision", rental_id),
            Some(admin),
            Some(json!({ "status": outcome, "admin_notes": "checked" })),
        )
        .await
    }

    fn files_in(&self, category: &str) -> usize {
        std::fs::read_dir(self.uploads.path().join(category))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

#[tokio::test]
async fn test_health_and_document_types_are_public() {
    let app = TestApp::new();

    let (status, body) = app.json(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.json(Method::GET, "/document-types", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t == "Car Insurance"));
}

#[tokio::test]
async fn test_login_requires_verified_email() {
    let app = TestApp::new();

    let (status, body) = app
        .json(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({ "email": "new@example.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email_sent"], true);
    assert_eq!(body["data"]["user"]["is_verified"], false);
    assert!(body["data"]["user"].get("password_hash").is_none());

    let (status, body) = app.login("new@example.com", "secret1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "EMAIL_NOT_VERIFIED");

    let token = app.emails.last_token_for("new@example.com").unwrap();
    let (status, _) = app
        .json(
            Method::POST,
            "/auth/verify-email",
            None,
            Some(json!({ "token": token })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.login("new@example.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "bearer");
    assert_eq!(body["data"]["expires_in"], 30 * 60);

    let access_token = body["data"]["access_token"].as_str().unwrap();
    let (status, body) = app
        .json(Method::GET, "/auth/me", Some(access_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "new@example.com");
    assert_eq!(body["data"]["role"], "user");
}

#[tokio::test]
async fn test_verification_token_is_single_use_and_resend_rotates_it() {
    let app = TestApp::new();
    app.json(
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "email": "rotate@example.com", "password": "secret1" })),
    )
    .await;
    let first = app.emails.last_token_for("rotate@example.com").unwrap();

    let (status, body) = app
        .json(
            Method::POST,
            "/auth/resend-verification",
            None,
            Some(json!({ "email": "rotate@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email_sent"], true);
    let second = app.emails.last_token_for("rotate@example.com").unwrap();
    assert_ne!(first, second);

    let (status, body) = app
        .json(
            Method::POST,
            "/auth/verify-email",
            None,
            Some(json!({ "token": first })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TOKEN");

    let (status, _) = app
        .json(
            Method::POST,
            "/auth/verify-email",
            None,
            Some(json!({ "token": second })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .json(
            Method::POST,
            "/auth/resend-verification",
            None,
            Some(json!({ "email": "rotate@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ALREADY_VERIFIED");
}

#[tokio::test]
async fn test_signup_validation_and_duplicates() {
    let app = TestApp::new();

    let (status, body) = app
        .json(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({ "email": "short@example.com", "password": "123" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    app.verified_user("dup@example.com").await;
    let (status, body) = app
        .json(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({ "email": "dup@example.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = TestApp::new();
    app.verified_user("known@example.com").await;

    let (unknown_status, unknown) = app.login("nobody@example.com", "secret1").await;
    let (wrong_status, wrong) = app.login("known@example.com", "wrong-password").await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown["message"], wrong["message"]);
    assert_eq!(unknown["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_access_guard_preconditions() {
    let app = TestApp::new();
    let user = app.verified_user("user@example.com").await;

    let (status, _) = app.json(Method::GET, "/vehicles", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .json(Method::GET, "/vehicles", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = app
        .state
        .jwt
        .issue(uuid::Uuid::new_v4(), Duration::minutes(-5))
        .unwrap();
    let (status, _) = app.json(Method::GET, "/vehicles", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let unverified = app
        .state
        .auth
        .create("pending@example.com", "secret1")
        .await
        .unwrap();
    let unverified_token = app.state.jwt.generate_access_token(unverified.id).unwrap();
    let (status, body) = app
        .json(Method::GET, "/vehicles", Some(&unverified_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "EMAIL_NOT_VERIFIED");

    let (status, _) = app.json(Method::GET, "/vehicles", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .json(Method::POST, "/vehicles", Some(&user), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = app
        .json(
            Method::POST,
            "/auth/create-admin",
            Some(&user),
            Some(json!({ "email": "x@example.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rental_lifecycle_approval_rents_vehicle() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let user = app.verified_user("renter@example.com").await;
    let vehicle_id = app.create_vehicle(&admin, "ABC123", "1HGCM82633A004352").await;
    let rental_id = app.submit_rental(&user, &vehicle_id).await;
    assert_eq!(app.vehicle_status(&user, &vehicle_id).await, "available");

    let receipt_uri = format!("/rentals/{}/payment-receipt", rental_id);
    let (status, body) = app
        .upload(&receipt_uri, &user, "receipt.pdf", b"%PDF-1.4 first", &[])
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["application"]["status"], "payment_received");
    assert_eq!(body["data"]["vehicle_status"], "pending_approval");
    let first_url = body["data"]["application"]["payment_receipt_url"].clone();
    assert_eq!(app.files_in("payments"), 1);

    // Un segundo comprobante reemplaza al primero
    let (status, body) = app
        .upload(&receipt_uri, &user, "receipt2.pdf", b"%PDF-1.4 second", &[])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["application"]["status"], "payment_received");
    assert_ne!(body["data"]["application"]["payment_receipt_url"], first_url);
    assert_eq!(app.vehicle_status(&user, &vehicle_id).await, "pending_approval");
    assert_eq!(app.files_in("payments"), 1);

    let (status, body) = app.decide(&admin, &rental_id, "approved").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["application"]["status"], "approved");
    assert_eq!(body["data"]["application"]["processed_by"], "admin@example.com");
    assert_eq!(body["data"]["application"]["admin_notes"], "checked");
    assert_eq!(app.vehicle_status(&user, &vehicle_id).await, "rented");

    let (status, body) = app.decide(&admin, &rental_id, "rejected").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");
    assert_eq!(app.vehicle_status(&user, &vehicle_id).await, "rented");
}

#[tokio::test]
async fn test_rejection_after_payment_frees_vehicle() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let user = app.verified_user("renter@example.com").await;
    let vehicle_id = app.create_vehicle(&admin, "ABC123", "1HGCM82633A004352").await;
    let rental_id = app.submit_rental(&user, &vehicle_id).await;

    app.upload(
        &format!("/rentals/{}/payment-receipt", rental_id),
        &user,
        "receipt.jpg",
        b"jpeg",
        &[],
    )
    .await;
    assert_eq!(app.vehicle_status(&user, &vehicle_id).await, "pending_approval");

    let (status, body) = app.decide(&admin, &rental_id, "rejected").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["application"]["status"], "rejected");
    assert_eq!(app.vehicle_status(&user, &vehicle_id).await, "available");
}

#[tokio::test]
async fn test_decision_guards() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let user = app.verified_user("renter@example.com").await;
    let vehicle_id = app.create_vehicle(&admin, "ABC123", "1HGCM82633A004352").await;
    let rental_id = app.submit_rental(&user, &vehicle_id).await;

    let (status, body) = app.decide(&admin, &rental_id, "maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_OUTCOME");

    // Aprobar exige un pago recibido
    let (status, body) = app.decide(&admin, &rental_id, "approved").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    let (status, _) = app.decide(&user, &rental_id, "rejected").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .decide(&admin, &uuid::Uuid::new_v4().to_string(), "rejected")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Rechazar una solicitud pendiente no toca el vehículo
    let (status, _) = app.decide(&admin, &rental_id, "rejected").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.vehicle_status(&user, &vehicle_id).await, "available");
}

#[tokio::test]
async fn test_held_vehicle_cannot_be_reserved_twice() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let first = app.verified_user("first@example.com").await;
    let second = app.verified_user("second@example.com").await;
    let vehicle_id = app.create_vehicle(&admin, "ABC123", "1HGCM82633A004352").await;
    let first_rental = app.submit_rental(&first, &vehicle_id).await;
    let second_rental = app.submit_rental(&second, &vehicle_id).await;

    let (status, _) = app
        .upload(
            &format!("/rentals/{}/payment-receipt", first_rental),
            &first,
            "receipt.pdf",
            b"%PDF",
            &[],
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .upload(
            &format!("/rentals/{}/payment-receipt", second_rental),
            &second,
            "receipt.pdf",
            b"%PDF",
            &[],
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "VEHICLE_UNAVAILABLE");
    // El archivo del intento fallido se borra
    assert_eq!(app.files_in("payments"), 1);

    // Un usuario no puede subir comprobantes a solicitudes ajenas
    let (status, _) = app
        .upload(
            &format!("/rentals/{}/payment-receipt", first_rental),
            &second,
            "receipt.pdf",
            b"%PDF",
            &[],
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.json(Method::GET, "/rentals/mine", Some(&second), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["status"], "pending");

    let (status, body) = app
        .json(Method::GET, "/rentals?status=payment_received", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["id"], first_rental.as_str());
}

#[tokio::test]
async fn test_vehicle_delete_blocked_by_active_rental() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let user = app.verified_user("renter@example.com").await;
    let vehicle_id = app.create_vehicle(&admin, "ABC123", "1HGCM82633A004352").await;
    let rental_id = app.submit_rental(&user, &vehicle_id).await;
    app.upload(
        &format!("/rentals/{}/payment-receipt", rental_id),
        &user,
        "receipt.pdf",
        b"%PDF",
        &[],
    )
    .await;
    app.decide(&admin, &rental_id, "approved").await;

    let vehicle_uri = format!("/vehicles/{}", vehicle_id);
    let (status, body) = app.json(Method::DELETE, &vehicle_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // Borrar la solicitud aprobada libera el vehículo y su comprobante
    let (status, _) = app
        .json(Method::DELETE, &format!("/rentals/{}", rental_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.vehicle_status(&admin, &vehicle_id).await, "available");
    assert_eq!(app.files_in("payments"), 0);

    let (status, _) = app.json(Method::DELETE, &vehicle_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.json(Method::GET, &vehicle_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_vehicle_status_update_guard() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let user = app.verified_user("renter@example.com").await;
    let vehicle_id = app.create_vehicle(&admin, "ABC123", "1HGCM82633A004352").await;
    let vehicle_uri = format!("/vehicles/{}", vehicle_id);

    let (status, _) = app
        .json(Method::PUT, &vehicle_uri, Some(&admin), Some(json!({ "status": "rented" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .json(
            Method::PUT,
            &vehicle_uri,
            Some(&admin),
            Some(json!({ "status": "maintenance", "color": "Blue" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "maintenance");
    assert_eq!(body["data"]["color"], "Blue");

    app.json(Method::PUT, &vehicle_uri, Some(&admin), Some(json!({ "status": "available" })))
        .await;
    let rental_id = app.submit_rental(&user, &vehicle_id).await;
    app.upload(
        &format!("/rentals/{}/payment-receipt", rental_id),
        &user,
        "receipt.pdf",
        b"%PDF",
        &[],
    )
    .await;

    let (status, _) = app
        .json(Method::PUT, &vehicle_uri, Some(&admin), Some(json!({ "status": "maintenance" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.vehicle_status(&admin, &vehicle_id).await, "pending_approval");

    // Los demás campos se siguen pudiendo editar
    let (status, _) = app
        .json(Method::PUT, &vehicle_uri, Some(&admin), Some(json!({ "odo_meter": 13000 })))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_plate_conflicts() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.create_vehicle(&admin, "ABC123", "1HGCM82633A004352").await;

    let (status, _) = app
        .json(
            Method::POST,
            "/vehicles",
            Some(&admin),
            Some(json!({
                "make": "Honda",
                "model": "Civic",
                "year": 2021,
                "license_plate": "abc123",
                "vin": "2HGFC2F59MH000001",
                "bond_amount": "800",
                "rent_per_week": "300",
                "current_mileage": 100,
                "odo_meter": 100,
                "next_service_date": "2026-01-01",
                "vehicle_type": "Sedan",
                "color": "Red",
                "fuel_type": "Petrol",
                "transmission": "Manual"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_vehicle_photo_is_replaced_and_served() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let vehicle_id = app.create_vehicle(&admin, "ABC123", "1HGCM82633A004352").await;
    let photo_uri = format!("/vehicles/{}/photo", vehicle_id);

    let (status, body) = app.upload(&photo_uri, &admin, "car.jpg", b"first", &[]).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["photo_name"], "car.jpg");

    let (status, body) = app.upload(&photo_uri, &admin, "car.png", b"second", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.files_in("vehicles"), 1);

    let url = body["data"]["photo_url"].as_str().unwrap().to_string();
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(&url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"second");

    let (status, _) = app.upload(&photo_uri, &admin, "car.gif", b"gif", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_driver_delete_cascades_documents_and_files() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let (status, body) = app
        .json(
            Method::POST,
            "/drivers",
            Some(&admin),
            Some(json!({
                "first_name": "Jamie",
                "last_name": "Lee",
                "email": "jamie@example.com",
                "phone": "+61 400 111 222",
                "license_number": "DL-123",
                "license_expiry": "2027-01-01",
                "address": "2 High St",
                "emergency_contact": "Pat Lee",
                "emergency_phone": "+61 400 333 444"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["status"], "pending");
    let driver_id = body["data"]["id"].as_str().unwrap().to_string();

    let documents_uri = format!("/drivers/{}/documents", driver_id);
    for name in ["license.pdf", "insurance.pdf"] {
        let (status, body) = app
            .upload(
                &documents_uri,
                &admin,
                name,
                b"%PDF-1.4",
                &[("document_type", "Driver License"), ("expiry_date", "2027-01-01")],
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }
    assert_eq!(app.files_in("documents"), 2);

    let (status, body) = app.json(Method::GET, &documents_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app
        .json(
            Method::POST,
            &format!("/drivers/{}/contract", driver_id),
            Some(&admin),
            Some(json!({ "contract_start_date": "2025-01-01", "contract_signed": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["contract_signed"], true);

    let (status, _) = app
        .json(Method::DELETE, &format!("/drivers/{}", driver_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.files_in("documents"), 0);

    let (status, _) = app
        .json(Method::GET, &format!("/drivers/{}", driver_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_document_upload_requires_type_and_valid_expiry() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let vehicle_id = app.create_vehicle(&admin, "ABC123", "1HGCM82633A004352").await;
    let uri = format!("/vehicles/{}/documents", vehicle_id);

    let (status, _) = app.upload(&uri, &admin, "rego.pdf", b"%PDF", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .upload(
            &uri,
            &admin,
            "rego.pdf",
            b"%PDF",
            &[("document_type", "Car Registration"), ("expiry_date", "31/12/2025")],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.files_in("documents"), 0);

    let (status, _) = app
        .upload(
            &format!("/vehicles/{}/documents", uuid::Uuid::new_v4()),
            &admin,
            "rego.pdf",
            b"%PDF",
            &[("document_type", "Car Registration")],
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_document_expiry_alerts_and_stats() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let vehicle_id = app.create_vehicle(&admin, "ABC123", "1HGCM82633A004352").await;
    let uri = format!("/vehicles/{}/documents", vehicle_id);

    let now = Utc::now();
    let expired = (now - Duration::days(3)).to_rfc3339();
    let soon = (now + Duration::days(5) + Duration::hours(1)).to_rfc3339();
    let later = (now + Duration::days(40)).to_rfc3339();
    let uploads = [
        ("Car Insurance", Some(later.as_str())),
        ("Car Registration", Some(expired.as_str())),
        ("Car Contract", Some(soon.as_str())),
        ("CPV Registration", None),
    ];
    let mut registration_id = String::new();
    for (document_type, expiry) in uploads {
        let mut fields = vec![("document_type", document_type)];
        if let Some(expiry) = expiry {
            fields.push(("expiry_date", expiry));
        }
        let (status, body) = app.upload(&uri, &admin, "doc.pdf", b"%PDF", &fields).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        if document_type == "Car Registration" {
            registration_id = body["data"]["id"].as_str().unwrap().to_string();
        }
    }

    let (status, body) = app
        .json(Method::GET, "/document-expiry-alerts", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let alerts = body["data"].as_array().unwrap();
    assert_eq!(alerts.len(), 3);
    assert_eq!(alerts[0]["document_type"], "Car Registration");
    assert_eq!(alerts[0]["status"], "expired");
    assert_eq!(alerts[0]["alert_level"], "critical");
    assert_eq!(alerts[0]["vehicle_name"], "Toyota Camry (ABC123)");
    assert_eq!(alerts[1]["document_type"], "Car Contract");
    assert_eq!(alerts[1]["alert_level"], "warning");
    assert_eq!(alerts[2]["document_type"], "Car Insurance");
    assert_eq!(alerts[2]["status"], "valid");
    assert_eq!(alerts[2]["alert_level"], "normal");

    let (status, body) = app
        .json(Method::GET, "/dashboard/document-stats", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_documents"], 4);
    assert_eq!(body["data"]["expired_documents"], 1);
    assert_eq!(body["data"]["expiring_soon_documents"], 1);
    assert_eq!(body["data"]["valid_documents"], 2);

    // Renovar la matrícula la saca de las alertas críticas
    let (status, _) = app
        .json(
            Method::PUT,
            &format!("/vehicles/{}/documents/{}/expiry", vehicle_id, registration_id),
            Some(&admin),
            Some(json!({ "expiry_date": later })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app
        .json(Method::GET, "/document-expiry-alerts", Some(&admin), None)
        .await;
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|alert| alert["alert_level"] != "critical"));
}

#[tokio::test]
async fn test_dashboard_stats() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let user = app.verified_user("renter@example.com").await;
    let rented = app.create_vehicle(&admin, "ABC123", "1HGCM82633A004352").await;
    let waiting = app.create_vehicle(&admin, "XYZ789", "1HGCM82633A004353").await;
    app.create_vehicle(&admin, "LMN456", "1HGCM82633A004354").await;

    let first = app.submit_rental(&user, &rented).await;
    app.upload(
        &format!("/rentals/{}/payment-receipt", first),
        &user,
        "receipt.pdf",
        b"%PDF",
        &[],
    )
    .await;
    app.decide(&admin, &first, "approved").await;

    let second = app.submit_rental(&user, &waiting).await;
    app.upload(
        &format!("/rentals/{}/payment-receipt", second),
        &user,
        "receipt.pdf",
        b"%PDF",
        &[],
    )
    .await;

    let (status, body) = app.json(Method::GET, "/dashboard/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_vehicles"], 3);
    assert_eq!(body["data"]["available_vehicles"], 1);
    assert_eq!(body["data"]["rented_vehicles"], 1);
    assert_eq!(body["data"]["payment_alerts"], 1);
    assert_eq!(body["data"]["active_trips"], 1);

    let (status, _) = app.json(Method::GET, "/dashboard/stats", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_negative_counters_are_rejected() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let (status, body) = app
        .json(
            Method::POST,
            "/vehicles",
            Some(&admin),
            Some(json!({
                "make": "Toyota",
                "model": "Corolla",
                "year": 2020,
                "license_plate": "NEG123",
                "vin": "1HGCM82633A004399",
                "bond_amount": "500",
                "rent_per_week": "250",
                "current_mileage": -5,
                "odo_meter": 100,
                "next_service_date": "2026-01-01",
                "vehicle_type": "Sedan",
                "color": "Grey",
                "fuel_type": "Petrol",
                "transmission": "Automatic"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let vehicle_id = app.create_vehicle(&admin, "ABC123", "1HGCM82633A004352").await;
    let (status, _) = app
        .json(
            Method::PUT,
            &format!("/vehicles/{}", vehicle_id),
            Some(&admin),
            Some(json!({ "odo_meter": -1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_for_unknown_vehicle_is_not_found() {
    let app = TestApp::new();
    let user = app.verified_user("renter@example.com").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/rentals",
            Some(&user),
            Some(json!({
                "vehicle_id": uuid::Uuid::new_v4(),
                "first_name": "Alex",
                "last_name": "Driver",
                "email": "alex@example.com",
                "phone": "+61 400 123 456",
                "license_number": "DL-998877",
                "license_expiry": "2028-03-01",
                "address": "1 Main St",
                "emergency_contact": "Sam Driver",
                "emergency_phone": "+61 400 654 321",
                "contract_period": "6 months"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["message"], "Vehicle not found");
}

#[tokio::test]
async fn test_vehicle_delete_removes_rejected_applications_and_files() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let user = app.verified_user("renter@example.com").await;
    let vehicle_id = app.create_vehicle(&admin, "ABC123", "1HGCM82633A004352").await;

    let rental_id = app.submit_rental(&user, &vehicle_id).await;
    app.upload(
        &format!("/rentals/{}/payment-receipt", rental_id),
        &user,
        "receipt.pdf",
        b"%PDF",
        &[],
    )
    .await;
    let (status, _) = app.decide(&admin, &rental_id, "rejected").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .upload(
            &format!("/vehicles/{}/documents", vehicle_id),
            &admin,
            "rego.pdf",
            b"%PDF",
            &[("document_type", "Car Registration")],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.files_in("payments"), 1);
    assert_eq!(app.files_in("documents"), 1);

    let (status, _) = app
        .json(Method::DELETE, &format!("/vehicles/{}", vehicle_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.files_in("payments"), 0);
    assert_eq!(app.files_in("documents"), 0);

    let (status, _) = app
        .json(Method::GET, &format!("/rentals/{}", rental_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_driver_document_expiry_update_and_paid_download() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let user = app.verified_user("viewer@example.com").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/drivers",
            Some(&admin),
            Some(json!({
                "first_name": "Jamie",
                "last_name": "Lee",
                "email": "jamie@example.com",
                "phone": "+61 400 111 222",
                "license_number": "DL-123",
                "license_expiry": "2027-01-01",
                "address": "2 High St",
                "emergency_contact": "Pat Lee",
                "emergency_phone": "+61 400 333 444"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let driver_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .upload(
            &format!("/drivers/{}/documents", driver_id),
            &admin,
            "license.pdf",
            b"%PDF-1.4 license",
            &[("document_type", "Driver License"), ("expiry_date", "2027-01-01")],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let doc_id = body["data"]["id"].as_str().unwrap().to_string();

    let expiry_uri = format!("/drivers/{}/documents/{}/expiry", driver_id, doc_id);
    let (status, body) = app
        .json(
            Method::PUT,
            &expiry_uri,
            Some(&admin),
            Some(json!({ "expiry_date": "2028-06-30" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["expiry_date"]
        .as_str()
        .unwrap()
        .starts_with("2028-06-30"));

    let (status, _) = app
        .json(
            Method::PUT,
            &expiry_uri,
            Some(&user),
            Some(json!({ "expiry_date": "2029-01-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .json(
            Method::PUT,
            &format!("/drivers/{}/documents/{}/expiry", uuid::Uuid::new_v4(), doc_id),
            Some(&admin),
            Some(json!({ "expiry_date": "2029-01-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Sin comprobante de pago no hay descarga
    let download_uri = format!("/drivers/{}/documents/{}/download", driver_id, doc_id);
    let (status, body) = app.json(Method::GET, &download_uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Payment required to access documents");

    let (status, _) = app
        .json(
            Method::POST,
            &format!("/drivers/{}/payment", driver_id),
            Some(&admin),
            Some(json!({ "payment_receipt_uploaded": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(&download_uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", user))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"license.pdf\""
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.4 license");

    let (status, body) = app
        .json(
            Method::GET,
            &format!("/drivers/{}/documents/{}/download", driver_id, uuid::Uuid::new_v4()),
            Some(&user),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Document not found");
}

use crate::application::PayrollBatchUseCase;
use crate::domain::country_profile::CountryProfile;
use crate::domain::error::AppError;
use crate::infrastructure::security::{BasicCredentials, CredentialStore};
use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{
    dev::Server, get, http::header, post, web, App, HttpRequest, HttpResponse, HttpServer,
    Responder,
};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct HttpState {
    pub payroll: Arc<PayrollBatchUseCase>,
    pub credentials: CredentialStore,
    pub max_upload_bytes: usize,
}

#[derive(Deserialize)]
pub struct ProcessQuery {
    #[serde(default)]
    pub country: CountryProfile,
    pub company: String,
}

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>API de Nómina</title>
</head>
<body>
    <h1>Bienvenido a la API de Nómina</h1>
    <p>POST <code>/process?country=do|USA&amp;company=NAME</code> with a CSV file in the <code>file</code> form field.</p>
</body>
</html>
"#;

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(LANDING_PAGE)
}

#[post("/process")]
async fn process_payroll(
    data: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<ProcessQuery>,
    payload: Multipart,
) -> impl Responder {
    if !is_authorized(&req, &data.credentials) {
        warn!(path = %req.path(), "Rejected payroll upload: invalid credentials");
        return HttpResponse::Unauthorized()
            .insert_header((header::WWW_AUTHENTICATE, "Basic"))
            .json(json!({ "detail": "Invalid credentials" }));
    }

    let csv = match read_file_field(payload, data.max_upload_bytes).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            return HttpResponse::BadRequest().json(json!({ "detail": "No CSV file provided" }))
        }
        Err(e @ UploadError::TooLarge(_)) => {
            warn!(error = %e, "Rejected payroll upload");
            return HttpResponse::PayloadTooLarge().json(json!({ "detail": e.to_string() }));
        }
        Err(e) => {
            error!(error = %e, "Error reading multipart upload");
            return HttpResponse::BadRequest().json(json!({ "detail": e.to_string() }));
        }
    };

    info!(
        bytes = csv.len(),
        country = %query.country,
        company = %query.company,
        "Processing payroll upload"
    );

    match data
        .payroll
        .process_csv(&csv, query.country, &query.company)
        .await
    {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(AppError::ParseError(msg)) => {
            warn!(error = %msg, "Unreadable payroll CSV");
            HttpResponse::BadRequest().json(json!({ "detail": msg }))
        }
        Err(e) => {
            error!(error = %e, "Payroll batch failed");
            HttpResponse::InternalServerError().json(json!({ "detail": e.to_string() }))
        }
    }
}

fn is_authorized(req: &HttpRequest, store: &CredentialStore) -> bool {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| BasicCredentials::from_header(value).ok())
        .map(|credentials| store.verify(&credentials))
        .unwrap_or(false)
}

#[derive(Debug)]
enum UploadError {
    TooLarge(usize),
    Malformed(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::TooLarge(limit) => {
                write!(f, "CSV upload exceeds the {} byte limit", limit)
            }
            UploadError::Malformed(msg) => write!(f, "Invalid multipart data: {}", msg),
        }
    }
}

/// Bytes of the `file` form field, capped at `limit`; other fields are
/// drained and ignored
async fn read_file_field(
    mut payload: Multipart,
    limit: usize,
) -> Result<Option<Vec<u8>>, UploadError> {
    let mut file_data = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| UploadError::Malformed(e.to_string()))?;
        let is_file = field.name() == Some("file");

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let bytes = chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;
            if is_file {
                if data.len() + bytes.len() > limit {
                    return Err(UploadError::TooLarge(limit));
                }
                data.extend_from_slice(&bytes);
            }
        }

        if is_file {
            file_data = Some(data);
        }
    }

    Ok(file_data)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(process_payroll);
}

pub fn start_server(
    state: HttpState,
    assets_dir: PathBuf,
    bind: (String, u16),
) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
            .service(actix_files::Files::new("/static", assets_dir.clone()))
    })
    .bind(bind)?
    .run();

    Ok(server)
}

//! Inference service.
//!
//! Lifecycle: `ServiceContext::load` runs before the socket is bound. A load
//! failure returns an error and the process exits without ever serving a
//! route; after that the context is shared read-only across actix workers.

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::error::AppError;

pub mod context;
pub mod handlers;

pub use context::*;
pub use handlers::configure;

/// Permissive CORS: any origin, method and header.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
}

/// Bind and serve until the server shuts down.
pub async fn serve(ctx: ServiceContext, host: &str, port: u16) -> Result<(), AppError> {
    let data = web::Data::new(ctx);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .app_data(data.clone())
            .configure(configure)
    })
    .bind((host, port))
    .map_err(|e| AppError::new(5, format!("Failed to bind {host}:{port}: {e}")))?;

    info!(%host, port, "serving predictions");

    server
        .run()
        .await
        .map_err(|e| AppError::new(5, format!("Server error: {e}")))
}

mod handlers;
mod state;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

pub use state::AppState;

/// Serve the forecast API on `127.0.0.1:{port}` until interrupted.
pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    let data = web::Data::new(state);

    tracing::info!(port, "starting forecast web server");
    println!("Starting Orchard Forecast API on http://localhost:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(data.clone())
            .route("/api/defaults", web::get().to(handlers::defaults))
            .route("/api/forecast", web::post().to(handlers::forecast))
            .route("/api/scenarios", web::post().to(handlers::scenarios))
            .route("/api/export", web::post().to(handlers::export))
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer, Responder};
use chrono::Utc;
use mongodb::bson::doc;
use mongodb::{Client, Database};
use post_service::handlers;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn service_status() -> impl Responder {
    HttpResponse::Ok().body("Post service is running")
}

async fn health_summary(db: web::Data<Database>) -> HttpResponse {
    match db.run_command(doc! { "ping": 1 }).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "post-service",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": Utc::now().to_rfc3339(),
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("MongoDB connection failed: {}", e),
            "service": "post-service",
            "timestamp": Utc::now().to_rfc3339(),
        })),
    }
}

/// Post Service
///
/// A small HTTP service exposing create, list, like, and delete operations
/// over a single post collection stored in MongoDB.
///
/// # Routes
///
/// - `POST /api/posts` - Create a post from an arbitrary JSON object
/// - `GET /api/posts` - List posts with pagination and ordering
/// - `PUT /api/posts/{id}/like` - Increment a post's like counter
/// - `DELETE /api/posts/{id}` - Delete a post
/// - `GET /` - Plain-text liveness banner
/// - `GET /api/health` - Database-backed health check
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match post_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting post-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // The driver connects lazily; an unreachable server surfaces per request,
    // not here. Only an unparseable connection string fails startup.
    let client = match Client::with_uri_str(&config.database.uri).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Invalid MongoDB connection string: {}", e);
            eprintln!("ERROR: Invalid MongoDB connection string: {}", e);
            std::process::exit(1);
        }
    };
    let db = client.database(&config.database.name);

    match db.run_command(doc! { "ping": 1 }).await {
        Ok(_) => tracing::info!("Connected to MongoDB database '{}'", config.database.name),
        Err(e) => tracing::error!(
            "MongoDB ping failed ({}); serving anyway, requests will fail until the store is reachable",
            e
        ),
    }

    let db_data = web::Data::new(db);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/", web::get().to(service_status))
            .route("/api/health", web::get().to(health_summary))
            .service(
                web::scope("/api/posts")
                    .service(
                        web::resource("")
                            .route(web::post().to(handlers::create_post))
                            .route(web::get().to(handlers::list_posts)),
                    )
                    .route("/{post_id}/like", web::put().to(handlers::like_post))
                    .route("/{post_id}", web::delete().to(handlers::delete_post)),
            )
    })
    .bind(&bind_address)?
    // Single event loop; consistency between interleaved requests is
    // delegated to store-side atomic updates.
    .workers(1)
    .run()
    .await
}

#[cfg(feature = "server")]
use std::sync::Arc;

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::forms::recordings::multipart_config;
#[cfg(feature = "server")]
use crate::messaging::{JobPublisher, ZmqSender};
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::routes::{
    commissions, guard_duty, health, metrics, prospects, recordings, tenancy, training, users,
    vehicles, zones,
};
#[cfg(feature = "server")]
use crate::storage::{LocalStorage, RecordingStorage};

pub mod db;
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod messaging;
pub mod models;
#[cfg(feature = "server")]
pub mod pagination;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod storage;

pub const SERVICE_ACCESS_ROLE: &str = "crm";
pub const SERVICE_ADMIN_ROLE: &str = "crm_admin";
pub const SERVICE_SALES_ROLE: &str = "crm_sales";

/// Registers every `/api/v1` handler.
#[cfg(feature = "server")]
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(tenancy::current_agency)
        .service(tenancy::list_agencies)
        .service(tenancy::create_agency)
        .service(tenancy::list_brands)
        .service(tenancy::create_brand)
        .service(tenancy::create_group)
        .service(users::current_user)
        .service(users::list_users)
        .service(users::add_user)
        .service(users::set_user_active)
        .service(prospects::list_prospects)
        .service(prospects::create_prospect)
        .service(prospects::import_prospects)
        .service(prospects::assign_prospects)
        .service(prospects::show_prospect)
        .service(prospects::update_prospect)
        .service(prospects::delete_prospect)
        .service(prospects::add_prospect_event)
        .service(prospects::evaluate_prospect)
        .service(prospects::list_evaluations)
        .service(vehicles::list_vehicles)
        .service(vehicles::create_vehicle)
        .service(vehicles::show_vehicle)
        .service(vehicles::update_vehicle)
        .service(vehicles::set_vehicle_active)
        .service(zones::list_zones)
        .service(zones::create_zone)
        .service(zones::check_proximity)
        .service(zones::update_zone)
        .service(zones::delete_zone)
        .service(recordings::upload_recording)
        .service(recordings::list_recordings)
        .service(recordings::show_recording)
        .service(recordings::delete_recording)
        .service(commissions::list_commission_rules)
        .service(commissions::set_commission_rule)
        .service(commissions::register_sale)
        .service(commissions::list_commissions)
        .service(commissions::commission_summary)
        .service(commissions::set_commission_status)
        .service(training::list_scenarios)
        .service(training::create_scenario)
        .service(training::update_scenario)
        .service(training::set_scenario_active)
        .service(training::record_session)
        .service(training::training_stats)
        .service(guard_duty::show_roster)
        .service(guard_duty::set_roster)
        .service(guard_duty::load_report)
        .service(guard_duty::auto_assign)
        .service(guard_duty::transfer)
        .service(metrics::dashboard)
        .service(metrics::salesperson_performance);
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Background ZeroMQ publisher for transcription jobs.
    let publisher: Arc<dyn JobPublisher> = Arc::new(
        ZmqSender::start(&server_config.zmq_recordings_pub)
            .map_err(|e| std::io::Error::other(format!("Failed to start ZMQ sender: {e}")))?,
    );

    let storage: Arc<dyn RecordingStorage> =
        Arc::new(LocalStorage::new(&server_config.storage_dir));

    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    let secret_key = Key::from(server_config.secret.as_bytes());

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(health::health)
            .service(web::scope("/api/v1").configure(configure_api))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(multipart_config(server_config.max_recording_bytes))
            .app_data(web::Data::from(storage.clone()))
            .app_data(web::Data::from(publisher.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}

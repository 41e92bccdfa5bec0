use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use merkle_pow_ledger::api::{self, AppState};
use merkle_pow_ledger::{Config, Ledger};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let ledger = Ledger::from_config(&config).map_err(std::io::Error::other)?;

    info!(
        "Starting ledger API at http://{}:{} (difficulty={}, max_attempts={:?}, parallel={})",
        config.host,
        config.port,
        config.difficulty,
        config.mining.max_attempts,
        config.mining.parallel
    );

    let state = web::Data::new(AppState::new(ledger));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

mod chain;
mod health;
mod merkle;
pub mod models;

use actix_web::HttpResponse;
use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

use crate::error::LedgerError;
use models::ErrorResponse;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(chain::mine_block)
            .service(chain::get_difficulty)
            .service(merkle::prove_transaction)
            .service(merkle::prove_in_block)
            .service(merkle::verify_proof),
    );
}

/// Map a core error onto an HTTP status with a JSON body.
fn error_response(err: &LedgerError) -> HttpResponse {
    let body = ErrorResponse::from(err);
    match err {
        LedgerError::TransactionNotFound | LedgerError::BlockNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        LedgerError::MiningTimeout { .. } => HttpResponse::ServiceUnavailable().json(body),
        LedgerError::RejectedBlock(_) => HttpResponse::Conflict().json(body),
        LedgerError::MalformedInput(_)
        | LedgerError::InvalidDifficulty(_)
        | LedgerError::InvalidConfig { .. } => HttpResponse::BadRequest().json(body),
    }
}

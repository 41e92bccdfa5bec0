use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::error_response;
use super::models::{
    AppState, DifficultyResponse, ErrorResponse, MineRequest, MineResponse, ValidateResponse,
};
use crate::blockchain::ChainValidation;

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.ledger.snapshot())
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let report = state.ledger.validation_report();
    let validation = report.validation;
    let (invalid_index, reason) = match validation {
        ChainValidation::Valid => (None, None),
        ChainValidation::Invalid { index, reason } => (Some(index), Some(reason)),
    };
    HttpResponse::Ok().json(ValidateResponse {
        message: format!("Blockchain is {}.", validation.status()),
        valid: validation.is_valid(),
        length: report.length,
        difficulty: report.difficulty,
        invalid_index,
        reason,
    })
}

/// Mine a new block over the posted transactions (an empty or missing body
/// mines an empty block). The PoW search runs on the blocking pool.
#[post("/mine/")]
pub async fn mine_block(
    state: web::Data<AppState>,
    body: Option<web::Json<MineRequest>>,
) -> impl Responder {
    let transactions = body.map(|b| b.into_inner().transactions).unwrap_or_default();
    debug!("POST /mine/ - {} transactions", transactions.len());

    let worker = state.clone();
    match web::block(move || worker.ledger.mine(transactions)).await {
        Ok(Ok(block)) => {
            info!(
                "POST /mine/ - block #{} accepted (hash={})",
                block.index(),
                block.hash()
            );
            HttpResponse::Ok().json(MineResponse::from(block))
        }
        Ok(Err(err)) => {
            warn!("POST /mine/ - {err}");
            error_response(&err)
        }
        Err(err) => HttpResponse::InternalServerError().json(ErrorResponse {
            error: err.to_string(),
        }),
    }
}

/// Get the configured PoW difficulty.
#[get("/difficulty/")]
pub async fn get_difficulty(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(DifficultyResponse {
        difficulty: state.ledger.difficulty(),
    })
}

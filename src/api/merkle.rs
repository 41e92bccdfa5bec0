use actix_web::{HttpResponse, Responder, post, web};
use log::debug;

use super::error_response;
use super::models::{AppState, ProveInBlockRequest, ProveRequest, VerifyRequest, VerifyResponse};

/// Inclusion proof for `target` within an arbitrary transaction batch.
#[post("/merkle/prove/")]
pub async fn prove_transaction(
    state: web::Data<AppState>,
    body: web::Json<ProveRequest>,
) -> impl Responder {
    match state
        .ledger
        .prove_transaction(&body.transactions, &body.target)
    {
        Ok(proof) => HttpResponse::Ok().json(proof),
        Err(err) => {
            debug!("POST /merkle/prove/ - {err}");
            error_response(&err)
        }
    }
}

/// Inclusion proof for `target` within an already mined block.
#[post("/blocks/{index}/prove/")]
pub async fn prove_in_block(
    state: web::Data<AppState>,
    path: web::Path<(u64,)>,
    body: web::Json<ProveInBlockRequest>,
) -> impl Responder {
    let index = path.into_inner().0;
    match state.ledger.prove_in_block(index, &body.target) {
        Ok(proof) => HttpResponse::Ok().json(proof),
        Err(err) => {
            debug!("POST /blocks/{index}/prove/ - {err}");
            error_response(&err)
        }
    }
}

/// Check a proof against a claimed root. Never consults the chain.
#[post("/merkle/verify/")]
pub async fn verify_proof(
    state: web::Data<AppState>,
    body: web::Json<VerifyRequest>,
) -> impl Responder {
    let valid = state
        .ledger
        .verify_proof(&body.proof, &body.target, &body.root);
    HttpResponse::Ok().json(VerifyResponse { valid })
}

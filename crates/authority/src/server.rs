use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Form, Router,
    extract::{State, rejection::FormRejection},
    routing::get,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::error::AuthorityError;
use crate::signing::{DeviceSigner, parse_hex_digest};

#[derive(Clone)]
pub struct AppState {
    pub signer: Arc<dyn DeviceSigner>,
}

#[derive(Debug, Deserialize)]
pub struct SignRequest {
    #[serde(default)]
    pub digest: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "OK\n" }).post(sign_handler))
        .route("/publickey", get(public_key_handler))
        .with_state(state)
}

pub async fn run(host: String, port: u16, signer: Arc<dyn DeviceSigner>) -> Result<()> {
    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("binding {host}:{port}"))?;
    serve(listener, signer).await
}

/// Serves the authority on an already bound listener until it fails.
pub async fn serve(listener: TcpListener, signer: Arc<dyn DeviceSigner>) -> Result<()> {
    info!(addr = %listener.local_addr()?, "signing authority listening");
    axum::serve(listener, router(AppState { signer }))
        .await
        .context("serving signing authority")
}

async fn sign_handler(
    State(state): State<AppState>,
    form: Result<Form<SignRequest>, FormRejection>,
) -> Result<String, AuthorityError> {
    let Form(request) = form.map_err(|e| AuthorityError::BadRequest(e.to_string()))?;
    let digest = parse_hex_digest(&request.digest)?;
    let signature = state.signer.sign_digest(&digest)?;
    debug!(digest = %request.digest, "http signature issued");
    Ok(BASE64.encode(signature))
}

async fn public_key_handler(State(state): State<AppState>) -> Result<String, AuthorityError> {
    Ok(state.signer.public_key_pem()?)
}

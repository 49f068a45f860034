//! Extractors that reject with `AppError`
//!
//! Axum's stock extractors answer malformed input with plain-text bodies.
//! These wrappers route the rejection through `AppError` so every 400 has
//! the same JSON shape.

use axum::extract::{FromRequest, FromRequestParts};
use sakila_common::AppError;

/// JSON body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

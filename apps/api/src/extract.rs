use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejections (bad syntax, missing fields, wrong types,
/// missing content type) render as the usual `AppError` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

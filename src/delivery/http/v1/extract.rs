//! Extractors whose rejections render as `{detail}` with 422 instead of
//! axum's plain-text bodies.

use axum::extract::{FromRequest, FromRequestParts};

use crate::usecase::error::UsecaseError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(UsecaseError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(UsecaseError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(UsecaseError))]
pub struct ApiPath<T>(pub T);

/*
 * Responsibility
 * - どの route にも一致しない request と、method 不一致の request を AppError で返す
 * - axum 既定の空 body を使わず、ErrorNormalizer の共通 JSON shape に揃える
 */
use crate::error::AppError;

pub async fn route_not_found() -> AppError {
    AppError::not_found("route not found")
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (Authenticator / RoleGate), errors (ErrorNormalizer), http (横断的な transport 層)
 */
pub mod auth;
pub mod errors;
pub mod http;

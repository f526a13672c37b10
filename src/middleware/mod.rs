/*
 * Responsibility
 * - auth: Bearer token → principal (request extensions)
 * - http: request-id / body limit / timeout / trace
 */
pub mod auth;
pub mod http;

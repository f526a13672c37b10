/*
 * Responsibility
 * - GET /health (疎通用, 認証不要)
 */
pub async fn health() -> &'static str {
    "ok"
}

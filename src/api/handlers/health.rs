/*
 * Responsibility
 * - GET /_health (liveness, no token required)
 */
pub async fn health() -> &'static str {
    "OK"
}

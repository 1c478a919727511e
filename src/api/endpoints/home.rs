/// `GET /`: plain-text banner.
pub async fn welcome() -> &'static str {
    "Welcome to HealthRecAPI"
}

use chrono::Utc;

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

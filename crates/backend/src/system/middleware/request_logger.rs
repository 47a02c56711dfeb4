use axum::body::to_bytes;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{FixedOffset, Utc};

/// Часовой пояс Маската (UTC+4) для отметок времени в консоли
const MUSCAT_OFFSET_SECS: i32 = 4 * 3600;

/// Middleware для логирования HTTP запросов
///
/// Одна строка на запрос: время, длительность, размер ответа, статус,
/// метод и путь. Успешные ответы подсвечиваются голубым, остальные жёлтым.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    let (body, size) = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            let size = group_thousands(bytes.len());
            (Body::from(bytes), size)
        }
        Err(e) => {
            tracing::warn!("Cannot read response body for {}: {}", uri.path(), e);
            (Body::default(), "error".to_string())
        }
    };

    let status = parts.status.as_u16();
    let color_code = if parts.status.is_success() { "36" } else { "33" };

    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        color_code,
        local_time(),
        start.elapsed().as_millis(),
        size,
        status,
        method,
        uri.path()
    );
    tracing::debug!(status, method = %method, path = uri.path(), "request served");

    Response::from_parts(parts, body)
}

fn local_time() -> String {
    let now = Utc::now();
    match FixedOffset::east_opt(MUSCAT_OFFSET_SECS) {
        Some(offset) => now.with_timezone(&offset).format("%H:%M:%S").to_string(),
        None => now.format("%H:%M:%S").to_string(),
    }
}

/// Размер с разделителем тысяч: `1234567` -> `1.234.567`
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - head) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

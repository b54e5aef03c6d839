//! Responses synthesized when a routed fetch fails and nothing is cached.

use http::StatusCode;
use vitrine_core::FetchResponse;

const OFFLINE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="it">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Offline</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
            min-height: 100vh;
            margin: 0;
            background: #f8fafc;
            color: #334155;
            text-align: center;
            padding: 2rem;
        }
        h1 { font-size: 2rem; margin-bottom: 1rem; color: #1e293b; }
        p { font-size: 1.1rem; margin-bottom: 2rem; max-width: 600px; line-height: 1.6; }
        button {
            background: #3b82f6;
            color: white;
            border: none;
            padding: 0.75rem 1.5rem;
            border-radius: 0.5rem;
            font-size: 1rem;
            cursor: pointer;
        }
    </style>
</head>
<body>
    <h1>Sei Offline</h1>
    <p>Non è possibile connettersi a Internet in questo momento. Controlla la connessione e riprova.</p>
    <button onclick="window.location.reload()">Riprova</button>
</body>
</html>
"#;

const OFFLINE_IMAGE: &str = r##"<svg width="400" height="300" xmlns="http://www.w3.org/2000/svg">
    <rect width="100%" height="100%" fill="#f1f5f9"/>
    <text x="50%" y="50%" font-family="Arial, sans-serif" font-size="18"
          fill="#64748b" text-anchor="middle" dy="0.3em">Immagine non disponibile offline</text>
</svg>
"##;

/// Built-in page for navigations when even the cached index is missing.
pub fn offline_page() -> FetchResponse {
    FetchResponse::with_content_type(StatusCode::OK, "text/html", OFFLINE_PAGE)
}

/// Placeholder for image requests.
pub fn offline_image() -> FetchResponse {
    FetchResponse::with_content_type(StatusCode::OK, "image/svg+xml", OFFLINE_IMAGE)
}

/// Last resort for everything else.
pub fn service_unavailable() -> FetchResponse {
    FetchResponse::with_content_type(
        StatusCode::SERVICE_UNAVAILABLE,
        "text/plain",
        "Service Unavailable",
    )
}

//! Local test site served by tiny_http.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tiny_http::{Header, Response, Server};

pub const INDEX: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Scout Test</title>
<link rel="stylesheet" href="/a.css">
<link rel="stylesheet" href="/missing.css">
</head>
<body>
<h1 class="spin">Hello</h1>
<p>Plain text</p>
<img src="/logo.svg">
<img src="photo.png">
<svg width="10" height="10"><rect width="10" height="10"/></svg>
</body>
</html>"#;

pub const SHEET: &str = r#"body { font-family: "Open Sans", Arial, sans-serif; color: #333; }
.spin { animation: spin 2s linear infinite; }
@media (max-width: 600px) { .b { transition: color .2s; } }
"#;

fn header(raw: &str) -> Header {
    raw.parse::<Header>().unwrap()
}

/// Start the site on an ephemeral port and return its base URL.
pub fn start_site() -> String {
    start_counting_site().0
}

/// Like [`start_site`], also counting requests for `/a.css`.
pub fn start_counting_site() -> (String, Arc<AtomicUsize>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let sheet_hits = Arc::new(AtomicUsize::new(0));
    let hits = sheet_hits.clone();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = match request.url() {
                "/" => Response::from_string(INDEX)
                    .with_header(header("Content-Type: text/html; charset=utf-8")),
                "/a.css" => {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Response::from_string(SHEET).with_header(header("Content-Type: text/css"))
                }
                "/redirect" => Response::from_string("")
                    .with_status_code(302)
                    .with_header(header("Location: /")),
                _ => Response::from_string("Not Found").with_status_code(404),
            };
            let _ = request.respond(response);
        }
    });
    (format!("http://{}", addr), sheet_hits)
}

/// Network tests are skipped when `CI` is set.
pub fn skip_in_ci() -> bool {
    if std::env::var("CI").is_ok() {
        eprintln!("Skipping network test in CI");
        return true;
    }
    false
}

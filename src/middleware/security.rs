// SPDX-License-Identifier: MIT

//! Security headers applied to every response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Headers a JSON API should always carry.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "DENY"),
    ("Referrer-Policy", "no-referrer"),
];

pub async fn add_security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    for (name, value) in SECURITY_HEADERS {
        response
            .headers_mut()
            .insert(*name, HeaderValue::from_static(value));
    }

    response
}

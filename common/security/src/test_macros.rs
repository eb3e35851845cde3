//! Shared test helper macro for constructing security headers quickly.
//! Usage: test_request_headers!(req, roles="member", tenant="<uuid>", member="<uuid>");
#[macro_export]
macro_rules! test_request_headers {
    ($req:expr, roles=$roles:expr, tenant=$tenant:expr, member=$member:expr) => {{
        let h = $req.headers_mut();
        h.insert("X-Tenant-ID", ::axum::http::HeaderValue::from_str($tenant).unwrap());
        h.insert("X-Roles", ::axum::http::HeaderValue::from_str($roles).unwrap());
        h.insert("X-Member-ID", ::axum::http::HeaderValue::from_str($member).unwrap());
    }};
    ($req:expr, roles=$roles:expr, member=$member:expr) => {{
        let h = $req.headers_mut();
        h.insert("X-Roles", ::axum::http::HeaderValue::from_str($roles).unwrap());
        h.insert("X-Member-ID", ::axum::http::HeaderValue::from_str($member).unwrap());
    }};
}

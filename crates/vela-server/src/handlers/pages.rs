//! Minimal HTML shells for the gated pages.
//!
//! Presentation is deliberately thin: each page is a shell that the
//! client-side fetches the JSON API from. The interesting behavior —
//! who may see a page at all — lives in the session-gate middleware.

use axum::response::Html;

fn shell(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">\
         <title>{title} — VELA</title></head>\n<body>\n{body}\n</body>\n</html>"
    ))
}

pub async fn dashboard() -> Html<String> {
    shell("Dashboard", "<h1>Dashboard</h1><div id=\"app\" data-page=\"dashboard\"></div>")
}

pub async fn customers() -> Html<String> {
    shell("Customers", "<h1>Customers</h1><div id=\"app\" data-page=\"customers\"></div>")
}

pub async fn tickets() -> Html<String> {
    shell("Tickets", "<h1>Tickets</h1><div id=\"app\" data-page=\"tickets\"></div>")
}

pub async fn users() -> Html<String> {
    shell("Users", "<h1>Users</h1><div id=\"app\" data-page=\"users\"></div>")
}

pub async fn login() -> Html<String> {
    shell("Sign in", "<h1>Sign in</h1><div id=\"app\" data-page=\"login\"></div>")
}

pub async fn signup() -> Html<String> {
    shell("Sign up", "<h1>Sign up</h1><div id=\"app\" data-page=\"signup\"></div>")
}

pub async fn password_reset() -> Html<String> {
    shell(
        "Reset password",
        "<h1>Reset password</h1><div id=\"app\" data-page=\"password-reset\"></div>",
    )
}

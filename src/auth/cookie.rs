use axum_extra::extract::cookie::{Cookie, SameSite};

pub const TOKEN_COOKIE: &str = "token";

/// Session cookie carrying the signed token. Cross-site delivery
/// (`SameSite=None; Secure`) is only enabled in production.
pub fn session_cookie(token: String, production: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .secure(production)
        .same_site(if production { SameSite::None } else { SameSite::Strict })
        .path("/")
        .build()
}

/// Removal cookie with the same attributes as the session cookie
pub fn removal_cookie(production: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), production);
    cookie.make_removal();
    cookie
}

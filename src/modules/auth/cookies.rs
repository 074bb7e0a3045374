use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use vidtube_auth::TokenPair;
use vidtube_config::CookieConfig;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

fn session_cookie(name: &'static str, value: String, config: &CookieConfig) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .path(config.path.clone())
        .build()
}

pub fn with_session_cookies(jar: CookieJar, tokens: &TokenPair, config: &CookieConfig) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
        config,
    ))
    .add(session_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token.clone(),
        config,
    ))
}

fn expired_cookie(name: &'static str, config: &CookieConfig) -> Cookie<'static> {
    let mut cookie = session_cookie(name, String::new(), config);
    cookie.make_removal();
    cookie
}

/// Always emits expired cookies, even when the request carried none.
pub fn without_session_cookies(jar: CookieJar, config: &CookieConfig) -> CookieJar {
    jar.add(expired_cookie(ACCESS_TOKEN_COOKIE, config))
        .add(expired_cookie(REFRESH_TOKEN_COOKIE, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> TokenPair {
        TokenPair {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        }
    }

    #[test]
    fn test_session_cookies_are_http_only_and_secure() {
        let jar = with_session_cookies(CookieJar::new(), &tokens(), &CookieConfig::default());

        let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
        assert_eq!(access.value(), "access");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(access.path(), Some("/"));

        assert_eq!(jar.get(REFRESH_TOKEN_COOKIE).unwrap().value(), "refresh");
    }

    #[test]
    fn test_secure_flag_follows_config() {
        let config = CookieConfig {
            secure: false,
            ..CookieConfig::default()
        };
        let jar = with_session_cookies(CookieJar::new(), &tokens(), &config);
        assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).unwrap().secure(), Some(false));
    }

    #[test]
    fn test_removal_expires_both_cookies_on_an_empty_jar() {
        let config = CookieConfig::default();
        let jar = without_session_cookies(CookieJar::new(), &config);

        for name in [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE] {
            let cookie = jar.get(name).unwrap();
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age().map(|age| age.whole_seconds()), Some(0));
            assert_eq!(cookie.http_only(), Some(true));
            assert_eq!(cookie.secure(), Some(true));
            assert_eq!(cookie.path(), Some("/"));
        }
    }
}

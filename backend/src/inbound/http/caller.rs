//! Request identity helpers.
//!
//! Parses the `Authorization` header into an [`AuthToken`] and exposes the
//! [`Caller`] resolved by the access gate to handlers as an extractor.

use actix_web::dev::Payload;
use actix_web::http::header::HeaderValue;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::{AuthToken, Caller, Error, INVALID_TOKEN};

/// Schemes accepted in the `Authorization` header.
const TOKEN_SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// Extract the token from `Token <key>` or `Bearer <key>`.
///
/// A header naming some other scheme, or no scheme at all, carries no token
/// and yields `None`. A recognised scheme with a missing or extra part is
/// reported as `unauthorized`.
///
/// # Examples
/// ```
/// use actix_web::http::header::HeaderValue;
/// use ticketrax::inbound::http::caller::parse_authorization;
///
/// let token = parse_authorization(&HeaderValue::from_static("Token abc123"))
///     .expect("well formed")
///     .expect("token scheme");
/// assert_eq!(token.as_str(), "abc123");
///
/// let basic = parse_authorization(&HeaderValue::from_static("Basic a2ltOnB3"));
/// assert!(matches!(basic, Ok(None)));
/// ```
pub fn parse_authorization(header: &HeaderValue) -> Result<Option<AuthToken>, Error> {
    let mut parts = header
        .as_bytes()
        .split(u8::is_ascii_whitespace)
        .filter(|part| !part.is_empty());
    let Some(scheme) = parts.next() else {
        return Ok(None);
    };
    if !TOKEN_SCHEMES
        .iter()
        .any(|accepted| accepted.as_bytes().eq_ignore_ascii_case(scheme))
    {
        return Ok(None);
    }
    let (Some(key), None) = (parts.next(), parts.next()) else {
        return Err(Error::unauthorized(INVALID_TOKEN));
    };
    let key = std::str::from_utf8(key).map_err(|_| Error::unauthorized(INVALID_TOKEN))?;
    Ok(Some(AuthToken::new(key)))
}

impl FromRequest for Caller {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let caller = req
            .extensions()
            .get::<Caller>()
            .cloned()
            .unwrap_or(Caller::Anonymous);
        ready(Ok(caller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn parse(header: &str) -> Result<Option<AuthToken>, Error> {
        parse_authorization(&HeaderValue::from_str(header).expect("header"))
    }

    #[rstest]
    #[case("Token abc", "abc")]
    #[case("Bearer abc", "abc")]
    #[case("token abc", "abc")]
    #[case("  Token   abc  ", "abc")]
    fn accepts_known_schemes(#[case] header: &str, #[case] expected: &str) {
        let token = parse(header).expect("well formed").expect("token");
        assert_eq!(token.as_str(), expected);
    }

    #[rstest]
    #[case("Basic dXNlcjpwYXNz")]
    #[case("Digest username=\"kim\"")]
    #[case("")]
    #[case("   ")]
    fn other_schemes_carry_no_token(#[case] header: &str) {
        assert_eq!(parse(header), Ok(None));
    }

    #[rstest]
    #[case("Token")]
    #[case("Bearer   ")]
    #[case("Token abc def")]
    fn rejects_malformed_token_headers(#[case] header: &str) {
        let err = parse(header).expect_err("malformed");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[rstest]
    fn rejects_non_utf8_key() {
        let header = HeaderValue::from_bytes(b"Token \xff\xfe").expect("opaque header");
        let err = parse_authorization(&header).expect_err("non-utf8 key");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}

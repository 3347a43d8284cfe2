use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::http::header::LOCATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, HttpResponseBuilder, dev::Payload};
use futures::future::{Ready, ready};
use serde::Serialize;

pub const FLASH_COOKIE: &str = "flash";

fn encode(messages: &[String]) -> String {
    let raw = serde_json::to_string(messages).unwrap_or_else(|_| "[]".to_string());
    urlencoding::encode(&raw).into_owned()
}

pub(crate) fn decode(value: &str) -> Vec<String> {
    urlencoding::decode(value)
        .ok()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

fn flash_cookie(messages: &[String]) -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, encode(messages))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(5))
        .finish()
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// 303 redirect to `location`, carrying `messages` to the next page view
pub fn redirect(location: &str, messages: &[String]) -> HttpResponse {
    redirect_builder(location, messages).finish()
}

pub fn notice(location: &str, message: &str) -> HttpResponse {
    redirect(location, &[message.to_string()])
}

/// Like [`redirect`], for responses that set further cookies
pub fn redirect_builder(location: &str, messages: &[String]) -> HttpResponseBuilder {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((LOCATION, location));
    if !messages.is_empty() {
        builder.cookie(flash_cookie(messages));
    }
    builder
}

/// Flash messages left by the previous redirect
#[derive(Debug, Default)]
pub struct Flash(pub Vec<String>);

impl FromRequest for Flash {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let messages = req
            .cookie(FLASH_COOKIE)
            .map(|c| decode(c.value()))
            .unwrap_or_default();
        ready(Ok(Flash(messages)))
    }
}

#[derive(Serialize)]
struct Page<T: Serialize> {
    messages: Vec<String>,
    #[serde(flatten)]
    data: T,
}

impl Flash {
    /// JSON page view; pending messages are consumed
    pub fn render<T: Serialize>(self, data: T) -> HttpResponse {
        let mut builder = HttpResponse::Ok();
        if !self.0.is_empty() {
            builder.cookie(removal_cookie());
        }
        builder.json(Page {
            messages: self.0,
            data,
        })
    }
}

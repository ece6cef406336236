//! Response headers shared by the resource handlers.
//!
//! - Alert headers tell the client application which mutation happened
//!   (`X-{app}-alert` + `X-{app}-params`) or why a request was refused
//!   (`X-{app}-error` + `X-{app}-params`).
//! - Pagination headers carry the total element count (`X-Total-Count`) and
//!   RFC 8288 `Link` relations to neighbouring pages.

use axum::http::header::{InvalidHeaderName, LINK};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

use crate::config::ApplicationConfig;
use crate::domain::Page;

pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// Builds notification headers for one client application.
#[derive(Debug, Clone)]
pub struct AlertHeaders {
    application_name: String,
    enable_translation: bool,
    alert: HeaderName,
    error: HeaderName,
    params: HeaderName,
}

impl AlertHeaders {
    pub fn new(config: &ApplicationConfig) -> Result<Self, InvalidHeaderName> {
        let header = |suffix: &str| HeaderName::try_from(format!("X-{}-{}", config.name, suffix));

        Ok(Self {
            application_name: config.name.clone(),
            enable_translation: config.enable_translation,
            alert: header("alert")?,
            error: header("error")?,
            params: header("params")?,
        })
    }

    pub fn entity_created(&self, entity_name: &str, id: &str) -> HeaderMap {
        let message = if self.enable_translation {
            format!("{}.{}.created", self.application_name, entity_name)
        } else {
            format!("A new {entity_name} is created with identifier {id}")
        };
        self.alert(message, id)
    }

    pub fn entity_updated(&self, entity_name: &str, id: &str) -> HeaderMap {
        let message = if self.enable_translation {
            format!("{}.{}.updated", self.application_name, entity_name)
        } else {
            format!("A {entity_name} is updated with identifier {id}")
        };
        self.alert(message, id)
    }

    pub fn entity_deleted(&self, entity_name: &str, id: &str) -> HeaderMap {
        let message = if self.enable_translation {
            format!("{}.{}.deleted", self.application_name, entity_name)
        } else {
            format!("A {entity_name} is deleted with identifier {id}")
        };
        self.alert(message, id)
    }

    pub fn failure(&self, entity_name: &str, error_key: &str, default_message: &str) -> HeaderMap {
        let message = if self.enable_translation {
            format!("error.{error_key}")
        } else {
            default_message.to_string()
        };

        let mut headers = HeaderMap::new();
        insert(&mut headers, &self.error, message);
        insert(&mut headers, &self.params, entity_name.to_string());
        headers
    }

    fn alert(&self, message: String, param: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        insert(&mut headers, &self.alert, message);
        insert(&mut headers, &self.params, urlencoding::encode(param).into_owned());
        headers
    }
}

fn insert(headers: &mut HeaderMap, name: &HeaderName, value: String) {
    match HeaderValue::try_from(value) {
        Ok(value) => {
            headers.insert(name.clone(), value);
        }
        Err(err) => warn!(header = %name, %err, "Dropping header with invalid value"),
    }
}

/// `X-Total-Count` and `Link` headers for `page`.
///
/// Links reuse `path` and the request's query parameters with `page` and
/// `size` replaced. Relations are emitted in the order next, prev, last, first.
pub fn pagination_headers<T>(path: &str, query: &[(String, String)], page: &Page<T>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(page.total_elements));

    let number = u64::from(page.number);
    let mut links = Vec::with_capacity(4);
    if page.has_next() {
        links.push(prepare_link(path, query, number + 1, page.size, "next"));
    }
    if page.has_previous() {
        links.push(prepare_link(path, query, number - 1, page.size, "prev"));
    }
    let last_page = page.total_pages().saturating_sub(1);
    links.push(prepare_link(path, query, last_page, page.size, "last"));
    links.push(prepare_link(path, query, 0, page.size, "first"));

    insert(&mut headers, &LINK, links.join(","));
    headers
}

fn prepare_link(path: &str, query: &[(String, String)], page: u64, size: u32, rel: &str) -> String {
    let mut pairs: Vec<String> = query
        .iter()
        .filter(|(key, _)| key != "page" && key != "size")
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect();
    pairs.push(format!("page={page}"));
    pairs.push(format!("size={size}"));

    format!("<{}?{}>; rel=\"{}\"", path, pairs.join("&"), rel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Pageable;

    fn alerts(enable_translation: bool) -> AlertHeaders {
        AlertHeaders::new(&ApplicationConfig {
            name: "libraryApp".to_string(),
            enable_translation,
        })
        .unwrap()
    }

    fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn translated_alerts() {
        let alerts = alerts(true);

        let created = alerts.entity_created("publisher", "7");
        assert_eq!(header(&created, "x-libraryapp-alert"), Some("libraryApp.publisher.created"));
        assert_eq!(header(&created, "x-libraryapp-params"), Some("7"));

        let deleted = alerts.entity_deleted("publisher", "7");
        assert_eq!(header(&deleted, "x-libraryapp-alert"), Some("libraryApp.publisher.deleted"));
    }

    #[test]
    fn plain_alerts() {
        let alerts = alerts(false);

        let updated = alerts.entity_updated("publisher", "3");
        assert_eq!(
            header(&updated, "x-libraryapp-alert"),
            Some("A publisher is updated with identifier 3")
        );

        let failure = alerts.failure("publisher", "idnull", "Invalid id");
        assert_eq!(header(&failure, "x-libraryapp-error"), Some("Invalid id"));
        assert_eq!(header(&failure, "x-libraryapp-params"), Some("publisher"));
    }

    #[test]
    fn translated_failure_uses_error_key() {
        let failure = alerts(true).failure("publisher", "idexists", "ignored");
        assert_eq!(header(&failure, "x-libraryapp-error"), Some("error.idexists"));
    }

    #[test]
    fn rejects_application_name_that_is_not_a_token() {
        let config = ApplicationConfig {
            name: "library app".to_string(),
            enable_translation: true,
        };
        assert!(AlertHeaders::new(&config).is_err());
    }

    #[test]
    fn middle_page_links() {
        let page = Page::new(vec![(); 2], &Pageable::new(1, 2), 5);
        let query = vec![
            ("name.contains".to_string(), "a,b".to_string()),
            ("page".to_string(), "1".to_string()),
            ("size".to_string(), "2".to_string()),
        ];

        let headers = pagination_headers("/api/publishers", &query, &page);

        assert_eq!(header(&headers, "x-total-count"), Some("5"));
        assert_eq!(
            header(&headers, "link"),
            Some(concat!(
                "</api/publishers?name.contains=a%2Cb&page=2&size=2>; rel=\"next\",",
                "</api/publishers?name.contains=a%2Cb&page=0&size=2>; rel=\"prev\",",
                "</api/publishers?name.contains=a%2Cb&page=2&size=2>; rel=\"last\",",
                "</api/publishers?name.contains=a%2Cb&page=0&size=2>; rel=\"first\""
            ))
        );
    }

    #[test]
    fn empty_result_links() {
        let page: Page<()> = Page::new(vec![], &Pageable::new(0, 20), 0);

        let headers = pagination_headers("/api/publishers", &[], &page);

        assert_eq!(header(&headers, "x-total-count"), Some("0"));
        assert_eq!(
            header(&headers, "link"),
            Some(concat!(
                "</api/publishers?page=0&size=20>; rel=\"last\",",
                "</api/publishers?page=0&size=20>; rel=\"first\""
            ))
        );
    }
}

//! Hypermedia link construction
//!
//! Every href is absolute and derived from one collection root. When
//! `comics.base_uri` is configured it always wins; otherwise the root is
//! rebuilt from the request's scheme, host and the collection mount path.
//!
//! ```rust
//! use comics_api::links::LinkBuilder;
//!
//! let links = LinkBuilder::new("http://localhost:8000/comics/");
//! assert_eq!(links.collection(), "http://localhost:8000/comics");
//! assert_eq!(
//!     links.page(&[("title", "x men")], 2, Some(4)),
//!     "http://localhost:8000/comics?title=x+men&page=2&limit=4"
//! );
//! ```

use axum::http::HeaderMap;
use serde::Serialize;
use url::form_urlencoded;

use crate::config::ComicsConfig;
use crate::ids::ComicId;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// Builds hrefs relative to a fixed collection root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    root: String,
}

impl LinkBuilder {
    /// Trailing slashes on `root` are stripped
    pub fn new(root: impl AsRef<str>) -> Self {
        Self {
            root: root.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the collection root for one request
    pub fn for_request(config: &ComicsConfig, headers: &HeaderMap) -> Self {
        if let Some(base_uri) = config.base_uri.as_deref().filter(|b| !b.trim().is_empty()) {
            return Self::new(base_uri.trim());
        }

        let scheme = header_token(headers, FORWARDED_PROTO).unwrap_or("http");
        let host = header_token(headers, FORWARDED_HOST)
            .or_else(|| header_token(headers, axum::http::header::HOST.as_str()))
            .unwrap_or("localhost");

        Self::new(format!(
            "{scheme}://{host}{}",
            config.normalized_mount_path()
        ))
    }

    /// Href of the unfiltered, unpaged collection
    pub fn collection(&self) -> String {
        self.root.clone()
    }

    /// Href of a single comic
    pub fn resource(&self, id: &ComicId) -> String {
        format!("{}/{}", self.root, id)
    }

    /// Href of a collection view: filters first, then `page` and `limit` when paging
    ///
    /// `page` is only rendered together with a bounded `limit`.
    pub fn page(&self, filters: &[(&str, &str)], page: u32, limit: Option<u32>) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (name, value) in filters {
            query.append_pair(name, value);
        }
        if let Some(limit) = limit {
            query.append_pair("page", &page.to_string());
            query.append_pair("limit", &limit.to_string());
        }

        let query = query.finish();
        if query.is_empty() {
            self.collection()
        } else {
            format!("{}?{}", self.root, query)
        }
    }

    /// `self` + `collection` links of a single comic
    pub fn resource_links(&self, id: &ComicId) -> ResourceLinks {
        ResourceLinks::new(self.resource(id), self.collection())
    }
}

/// First comma-separated token of a header, trimmed
fn header_token<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

/// `_links` block carried by every payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub collection: Link,
}

impl ResourceLinks {
    pub fn new(self_href: String, collection_href: String) -> Self {
        Self {
            self_link: Link { href: self_href },
            collection: Link {
                href: collection_href,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::str::FromStr;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_trailing_slashes_stripped() {
        assert_eq!(LinkBuilder::new("http://a.test/comics///").collection(), "http://a.test/comics");
        assert_eq!(LinkBuilder::new("http://a.test/comics"), LinkBuilder::new("http://a.test/comics/"));
    }

    #[test]
    fn test_configured_base_uri_wins() {
        let config = ComicsConfig {
            base_uri: Some("https://api.example.com/v1/comics/".to_string()),
            ..ComicsConfig::default()
        };
        let links = LinkBuilder::for_request(
            &config,
            &headers(&[("host", "internal:8000"), ("x-forwarded-proto", "http")]),
        );
        assert_eq!(links.collection(), "https://api.example.com/v1/comics");
    }

    #[test]
    fn test_root_rebuilt_from_request() {
        let config = ComicsConfig::default();

        let links = LinkBuilder::for_request(&config, &headers(&[("host", "localhost:8000")]));
        assert_eq!(links.collection(), "http://localhost:8000/comics");

        let links = LinkBuilder::for_request(
            &config,
            &headers(&[
                ("host", "internal:8000"),
                ("x-forwarded-proto", "https, http"),
                ("x-forwarded-host", "comics.example.com"),
            ]),
        );
        assert_eq!(links.collection(), "https://comics.example.com/comics");

        let links = LinkBuilder::for_request(&config, &HeaderMap::new());
        assert_eq!(links.collection(), "http://localhost/comics");
    }

    #[test]
    fn test_page_without_params_is_plain_root() {
        let links = LinkBuilder::new("http://a.test/comics");
        assert_eq!(links.page(&[], 3, None), "http://a.test/comics");
    }

    #[test]
    fn test_page_orders_filters_before_paging() {
        let links = LinkBuilder::new("http://a.test/comics");
        let href = links.page(&[("title", "bat"), ("date", "2024-01-01")], 2, Some(4));
        assert_eq!(href, "http://a.test/comics?title=bat&date=2024-01-01&page=2&limit=4");
    }

    #[test]
    fn test_page_encodes_raw_values() {
        let links = LinkBuilder::new("http://a.test/comics");
        let href = links.page(&[("author", "Moore & Gibbons")], 1, None);
        assert_eq!(href, "http://a.test/comics?author=Moore+%26+Gibbons");
    }

    #[test]
    fn test_links_are_idempotent() {
        let links = LinkBuilder::new("http://a.test/comics/");
        let filters = [("title", "saga"), ("author", "Vaughan")];
        assert_eq!(links.page(&filters, 2, Some(6)), links.page(&filters, 2, Some(6)));

        let id = ComicId::from_str("comic_01h455vb4pex5vsknk084sn02q").unwrap();
        assert_eq!(links.resource(&id), links.resource(&id));
        assert_eq!(links.resource(&id), "http://a.test/comics/comic_01h455vb4pex5vsknk084sn02q");
    }

    #[test]
    fn test_resource_links_serialize_with_self_key() {
        let links = ResourceLinks::new("http://a.test/comics/1".into(), "http://a.test/comics".into());
        let json = serde_json::to_value(&links).unwrap();
        assert_eq!(json["self"]["href"], "http://a.test/comics/1");
        assert_eq!(json["collection"]["href"], "http://a.test/comics");
    }
}

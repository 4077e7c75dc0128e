use actix_web::http::header::HeaderMap;

pub const UNKNOWN_CLIENT: &str = "unknown";

/// Best-effort client identifier: the first configured header that carries a
/// non-empty value wins. Comma-separated chains such as `X-Forwarded-For`
/// contribute their first hop. Not trusted for anything but rate-limit keys
/// and display.
pub fn client_identifier(headers: &HeaderMap, preferred: &[String]) -> String {
    preferred
        .iter()
        .filter_map(|name| headers.get(name.as_str()))
        .filter_map(|value| value.to_str().ok())
        .map(|value| value.split(',').next().unwrap_or("").trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        }
        map
    }

    fn preferred() -> Vec<String> {
        vec!["cf-connecting-ip".into(), "x-forwarded-for".into()]
    }

    #[test]
    fn first_configured_header_wins() {
        let map = headers(&[("x-forwarded-for", "10.0.0.1"), ("cf-connecting-ip", "203.0.113.5")]);
        assert_eq!(client_identifier(&map, &preferred()), "203.0.113.5");
    }

    #[test]
    fn forwarded_chain_uses_first_hop() {
        let map = headers(&[("x-forwarded-for", " 198.51.100.2 , 10.0.0.1")]);
        assert_eq!(client_identifier(&map, &preferred()), "198.51.100.2");
    }

    #[test]
    fn empty_header_falls_through() {
        let map = headers(&[("cf-connecting-ip", ""), ("x-forwarded-for", "198.51.100.2")]);
        assert_eq!(client_identifier(&map, &preferred()), "198.51.100.2");
    }

    #[test]
    fn defaults_to_unknown() {
        assert_eq!(client_identifier(&HeaderMap::new(), &preferred()), UNKNOWN_CLIENT);
        let map = headers(&[("x-real-ip", "1.1.1.1")]);
        assert_eq!(client_identifier(&map, &preferred()), UNKNOWN_CLIENT);
    }
}

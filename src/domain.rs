/// Registrable-domain extraction for search and favicon placeholders
///
/// Reduces a URL to the domain a user would type when searching, e.g.
/// "https://news.bbc.co.uk/article" → "bbc.co.uk" and
/// "https://ai.microsoft.com" → "microsoft.com". Two labels are kept,
/// three when the TLD is a two-letter country code behind "co"/"com".
use url::Url;

pub fn extract_domain(raw: &str) -> Option<String> {
    let host = extract_hostname(raw)?;

    // localhost and IP literals pass through unchanged
    if host == "localhost" || is_ip_literal(&host) {
        return Some(host);
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return Some(host);
    }

    let tld = labels[labels.len() - 1];
    let keep = if labels.len() >= 3
        && tld.len() == 2
        && matches!(labels[labels.len() - 2], "co" | "com")
    {
        3
    } else {
        2
    };

    Some(labels[labels.len() - keep..].join("."))
}

/// Lowercased hostname of `raw`; scheme-less input is tolerated.
fn extract_hostname(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("http://{trimmed}")))
        .ok()?;

    parsed.host_str().map(|h| h.to_lowercase())
}

fn is_ip_literal(host: &str) -> bool {
    host.parse::<std::net::IpAddr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain_basic() {
        assert_eq!(extract_domain("https://www.google.com"), Some("google.com".to_string()));
        assert_eq!(extract_domain("https://google.com"), Some("google.com".to_string()));
        assert_eq!(extract_domain("http://google.com"), Some("google.com".to_string()));
    }

    #[test]
    fn test_extract_domain_subdomains() {
        assert_eq!(extract_domain("https://ai.microsoft.com"), Some("microsoft.com".to_string()));
        assert_eq!(extract_domain("https://docs.microsoft.com"), Some("microsoft.com".to_string()));
        assert_eq!(extract_domain("https://www.microsoft.com"), Some("microsoft.com".to_string()));
    }

    #[test]
    fn test_extract_domain_with_path() {
        assert_eq!(extract_domain("https://www.google.com/search?q=rust"), Some("google.com".to_string()));
        assert_eq!(extract_domain("https://github.com/rust-lang/rust"), Some("github.com".to_string()));
    }

    #[test]
    fn test_extract_domain_country_tlds() {
        assert_eq!(extract_domain("https://news.bbc.co.uk"), Some("bbc.co.uk".to_string()));
        assert_eq!(extract_domain("https://shop.example.com.au/products"), Some("example.com.au".to_string()));
    }

    #[test]
    fn test_extract_domain_special_cases() {
        assert_eq!(extract_domain("https://localhost:3000"), Some("localhost".to_string()));
        assert_eq!(extract_domain("http://127.0.0.1:8080"), Some("127.0.0.1".to_string()));
        assert_eq!(extract_domain("https://192.168.1.1"), Some("192.168.1.1".to_string()));
    }

    #[test]
    fn test_extract_domain_scheme_less() {
        assert_eq!(extract_domain("www.google.com/maps"), Some("google.com".to_string()));
        assert_eq!(extract_domain("zinfandel.io"), Some("zinfandel.io".to_string()));
    }

    #[test]
    fn test_extract_domain_empty() {
        assert_eq!(extract_domain(""), None);
        assert_eq!(extract_domain("   "), None);
    }
}

use url::Url;

pub struct DomainParser;
impl DomainParser {
    #[must_use]
    pub fn get_domain(url: &Url) -> Option<addr::domain::Name<'_>> {
        url.domain().and_then(|x| addr::parse_domain_name(x).ok())
    }

    /// Get the root domain (the registrable part)
    #[must_use]
    pub fn get_domain_root(url: &Url) -> Option<&str> {
        Self::get_domain(url).and_then(|x| x.root())
    }

    /// Whether the url's registrable domain is exactly `root`
    #[must_use]
    pub fn has_domain_root(url: &Url, root: &str) -> bool {
        Self::get_domain_root(url).is_some_and(|x| x.eq_ignore_ascii_case(root))
    }

    /// The subdomain part of the host, if any (eg. `vm` for `vm.tiktok.com`)
    #[must_use]
    pub fn get_subdomain(url: &Url) -> Option<&str> {
        Self::get_domain(url).and_then(|x| x.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("valid url")
    }

    #[test]
    fn root_ignores_subdomains() {
        assert_eq!(
            DomainParser::get_domain_root(&url("https://vm.tiktok.com/ZM123/")),
            Some("tiktok.com")
        );
        assert!(DomainParser::has_domain_root(
            &url("https://www.TikTok.com/@a/video/1"),
            "tiktok.com"
        ));
    }

    #[test]
    fn lookalike_domains_have_their_own_root() {
        assert!(!DomainParser::has_domain_root(
            &url("https://tiktok.com.evil.example/@a/video/1"),
            "tiktok.com"
        ));
    }

    #[test]
    fn subdomain_prefix() {
        assert_eq!(
            DomainParser::get_subdomain(&url("https://vt.tiktok.com/x")),
            Some("vt")
        );
        assert_eq!(DomainParser::get_subdomain(&url("https://tiktok.com/t/x")), None);
    }
}

//! Mobile attribution and affiliate-tracking link platforms
//!
//! These hosts serve deep links whose destination does not depend on the
//! attribution parameters, so every identifier and sub-identifier goes.

use url::Url;

use crate::host::hostname_matches;
use crate::query::{QueryParam, QueryParams};

/// Parameter layout of one attribution platform.
#[derive(Debug, PartialEq, Eq)]
pub struct AttributionPlatform {
    pub name: &'static str,
    pub hosts: &'static [&'static str],
    /// Exact parameter names, lowercase.
    pub params: &'static [&'static str],
    /// Parameter name prefixes, lowercase.
    pub prefixes: &'static [&'static str],
}

impl AttributionPlatform {
    fn owns(&self, param: &QueryParam) -> bool {
        let key = param.key();
        self.params.contains(&key.as_str()) || self.prefixes.iter().any(|prefix| key.starts_with(prefix))
    }

    /// Remove this platform's identifiers. Returns `true` if the URL changed.
    pub fn strip(&self, url: &mut Url) -> bool {
        let mut params = QueryParams::from_url(url);
        if params.retain(|param| !self.owns(param)) == 0 {
            return false;
        }
        params.apply_to(url);
        true
    }
}

pub static PLATFORMS: &[AttributionPlatform] = &[
    AttributionPlatform {
        name: "appsflyer",
        hosts: &["onelink.me", "app.appsflyer.com"],
        params: &["pid", "c", "clickid", "is_retargeting", "shortlink", "deep_link_sub1"],
        prefixes: &["af_"],
    },
    AttributionPlatform {
        name: "branch",
        hosts: &["app.link", "bnc.lt", "test-app.link"],
        params: &["_branch_match_id", "_branch_referrer"],
        prefixes: &["~", "$3p", "_branch_"],
    },
    AttributionPlatform {
        name: "adjust",
        hosts: &["adj.st", "app.adjust.com", "app.adjust.io", "go.link"],
        params: &["campaign", "adgroup", "creative", "label", "tracker_limit"],
        prefixes: &["adj_", "adjust_"],
    },
    AttributionPlatform {
        name: "impact",
        hosts: &["sjv.io", "pxf.io", "ojrq.net", "evyy.net"],
        params: &["irclickid", "irgwc", "sharedid", "clickid", "partnerid", "mpid"],
        prefixes: &["subid", "sub_id"],
    },
];

/// Find the attribution platform serving a host.
pub fn platform_for_host(host: &str) -> Option<&'static AttributionPlatform> {
    PLATFORMS
        .iter()
        .find(|platform| hostname_matches(host, platform.hosts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(url: &str) -> String {
        let mut url = Url::parse(url).unwrap();
        let platform = platform_for_host(url.host_str().unwrap()).unwrap();
        platform.strip(&mut url);
        url.into()
    }

    #[test]
    fn test_appsflyer() {
        assert_eq!(
            strip("https://shop.onelink.me/Ab12?pid=email&c=spring&af_sub1=x&af_dp=shop%3A%2F%2Fitem&deep_link_value=42"),
            "https://shop.onelink.me/Ab12?deep_link_value=42"
        );
    }

    #[test]
    fn test_branch() {
        assert_eq!(
            strip("https://myapp.app.link/xyz?~channel=twitter&~feature=share&$3p=a_fb&id=7"),
            "https://myapp.app.link/xyz?id=7"
        );
    }

    #[test]
    fn test_impact_subids_case_insensitive() {
        assert_eq!(
            strip("https://brand.sjv.io/c/1/2/3?subId1=a&SubId2=b&irgwc=1&u=https%3A%2F%2Fbrand.example%2F"),
            "https://brand.sjv.io/c/1/2/3?u=https%3A%2F%2Fbrand.example%2F"
        );
    }

    #[test]
    fn test_unrelated_host() {
        assert!(platform_for_host("example.com").is_none());
        assert!(platform_for_host("notapp.link").is_none());
        assert_eq!(platform_for_host("x.adj.st").map(|p| p.name), Some("adjust"));
    }
}

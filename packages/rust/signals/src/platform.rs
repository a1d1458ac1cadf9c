//! Platform detection.

use std::sync::LazyLock;

use regex::Regex;

use crate::text::dedup_preserving;

/// Platforms a tool can be offered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Web,
    Ios,
    Android,
    Api,
    Desktop,
}

impl Platform {
    /// Value stored in `Tool::platforms`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Api => "api",
            Self::Desktop => "desktop",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

static IOS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bios\b|iphone|ipad").expect("ios regex"));

/// Inputs a platform rule may look at.
pub struct Evidence<'a> {
    /// Lower-cased page text.
    pub text: &'a str,
    pub has_website: bool,
}

/// A single platform test.
pub type PlatformTest = fn(&Evidence<'_>) -> bool;

fn contains_any(text: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| text.contains(cue))
}

fn has_website(e: &Evidence<'_>) -> bool {
    e.has_website
}

fn mentions_ios(e: &Evidence<'_>) -> bool {
    IOS_RE.is_match(e.text)
}

fn mentions_android(e: &Evidence<'_>) -> bool {
    e.text.contains("android")
}

fn mentions_api(e: &Evidence<'_>) -> bool {
    contains_any(e.text, &["api", "sdk"])
}

fn mentions_desktop(e: &Evidence<'_>) -> bool {
    contains_any(e.text, &["windows", "mac", "desktop", "linux"])
}

/// Independent tests, evaluated in this order; every match is appended.
pub const PLATFORM_RULES: &[(Platform, PlatformTest)] = &[
    (Platform::Web, has_website),
    (Platform::Ios, mentions_ios),
    (Platform::Android, mentions_android),
    (Platform::Api, mentions_api),
    (Platform::Desktop, mentions_desktop),
];

/// Detect the platforms a tool is available on.
///
/// `web` is implied by a non-empty website URL rather than by page content.
pub fn detect_platforms(text: &str, website_url: &str) -> Vec<Platform> {
    let lowered = text.to_lowercase();
    let evidence = Evidence {
        text: &lowered,
        has_website: !website_url.trim().is_empty(),
    };

    dedup_preserving(
        PLATFORM_RULES
            .iter()
            .filter(|(_, test)| test(&evidence))
            .map(|(platform, _)| *platform),
    )
}

//! Price model detection.
//!
//! Raw marketing text rarely commits to a single pricing model, so the
//! detector walks [`PRICE_RULES`] in order and the first rule that matches
//! wins.

/// Recognised price models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceModel {
    Freemium,
    Free,
    Usage,
    Enterprise,
    Subscription,
}

impl PriceModel {
    /// Value stored in `Tool::price_model`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Freemium => "freemium",
            Self::Free => "free",
            Self::Usage => "usage",
            Self::Enterprise => "enterprise",
            Self::Subscription => "subscription",
        }
    }
}

impl std::fmt::Display for PriceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the decision list. Matches when, for every cue group, the text
/// contains at least one cue of that group.
#[derive(Debug)]
pub struct PriceRule {
    pub model: PriceModel,
    pub all_of: &'static [&'static [&'static str]],
}

impl PriceRule {
    /// Test this rule against already lower-cased text.
    pub fn matches(&self, lowered: &str) -> bool {
        self.all_of
            .iter()
            .all(|group| group.iter().any(|cue| lowered.contains(cue)))
    }
}

const FREE: &[&str] = &["free"];
const FREEMIUM_PAID: &[&str] = &[
    "per month",
    "monthly",
    "/mo",
    "per year",
    "annual",
    "yearly",
    "pro",
];
const USAGE: &[&str] = &["pay as you go", "usage", "per token", "per 1m"];
const ENTERPRISE: &[&str] = &["enterprise"];
const SALES_CONTACT: &[&str] = &["contact", "sales"];
const RECURRING: &[&str] = &[
    "per month",
    "monthly",
    "per year",
    "annual",
    "yearly",
    "subscription",
];

/// Ordered decision list; earlier rows take precedence.
pub const PRICE_RULES: &[PriceRule] = &[
    PriceRule {
        model: PriceModel::Freemium,
        all_of: &[FREE, FREEMIUM_PAID],
    },
    PriceRule {
        model: PriceModel::Free,
        all_of: &[FREE],
    },
    PriceRule {
        model: PriceModel::Usage,
        all_of: &[USAGE],
    },
    PriceRule {
        model: PriceModel::Enterprise,
        all_of: &[ENTERPRISE, SALES_CONTACT],
    },
    PriceRule {
        model: PriceModel::Subscription,
        all_of: &[RECURRING],
    },
];

/// Detect the price model of a product from its page text.
///
/// Returns `None` when no rule matches.
pub fn detect_price_model(text: &str) -> Option<PriceModel> {
    let lowered = text.to_lowercase();
    PRICE_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.model)
}

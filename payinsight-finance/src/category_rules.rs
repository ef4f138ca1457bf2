//! Deterministic keyword rules mapping payment entries to spending categories.
//!
//! Rules are checked in table order and the first category with any keyword
//! found in the lowercased merchant or entry text wins. No match is "others".

/// Label returned when no rule matches
pub const OTHERS: &str = "others";

/// One category and the keywords that select it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

impl CategoryRule {
    /// Inputs must already be lowercased
    pub fn matches(&self, merchant: &str, raw: &str) -> bool {
        self.keywords
            .iter()
            .any(|kw| merchant.contains(kw) || raw.contains(kw))
    }
}

const fn rule(label: &'static str, keywords: &'static [&'static str]) -> CategoryRule {
    CategoryRule { label, keywords }
}

static BUILTIN_RULES: [CategoryRule; 12] = [
    rule(
        "groceries",
        &["bigbasket", "grofers", "more", "dmart", "spencer", "reliance fresh", "nature's basket"],
    ),
    rule(
        "fuel",
        &["indian oil", "bharat petroleum", "hpcl", "fuel", "petrol", "shell"],
    ),
    rule(
        "travel",
        &[
            "uber", "ola", "irctc", "makemytrip", "goibibo", "yatra", "air india", "indigo",
            "spicejet", "flight", "train", "bus",
        ],
    ),
    rule(
        "food delivery",
        &["zomato", "swiggy", "domino", "pizza hut", "mcdonald", "kfc", "foodpanda"],
    ),
    rule(
        "shopping",
        &["amazon", "flipkart", "myntra", "ajio", "snapdeal", "tatacliq"],
    ),
    rule(
        "utilities",
        &[
            "electricity", "power", "water", "gas", "broadband", "internet", "tata power",
            "bills", "apcpdcl", "tsspdcl",
        ],
    ),
    rule(
        "mobile recharge",
        &["airtel", "jio", "vi", "vodafone", "idea", "bsnl", "recharge"],
    ),
    rule(
        "entertainment",
        &["netflix", "hotstar", "prime video", "bookmyshow", "spotify", "gaana", "wynk"],
    ),
    rule(
        "health",
        &["apollo", "pharmacy", "medplus", "practo", "hospital", "clinic", "diagnostics"],
    ),
    rule(
        "education",
        &["byju", "unacademy", "udemy", "coursera", "edx", "school", "college", "university"],
    ),
    rule("rent", &["rent", "no broker", "housing.com", "nestaway"]),
    rule(OTHERS, &[]),
];

/// Ordered, immutable rule list
#[derive(Debug)]
pub struct RuleTable {
    rules: &'static [CategoryRule],
}

static BUILTIN_TABLE: RuleTable = RuleTable {
    rules: &BUILTIN_RULES,
};

impl RuleTable {
    /// The process-wide built-in table
    pub fn builtin() -> &'static RuleTable {
        &BUILTIN_TABLE
    }

    pub fn rules(&self) -> &'static [CategoryRule] {
        self.rules
    }

    /// Every label this table can return, in rule order
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.label)
    }

    /// Classify by merchant then entry text. Always returns a label.
    pub fn classify(&self, merchant: Option<&str>, raw: &str) -> &'static str {
        let merchant = merchant.unwrap_or("").to_lowercase();
        let raw = raw.to_lowercase();

        self.rules
            .iter()
            .find(|r| r.matches(&merchant, &raw))
            .map(|r| r.label)
            .unwrap_or(OTHERS)
    }
}

//! Static lookup data for the spam scorer. Built once, read-only afterwards.

use lazy_static::lazy_static;
use regex::Regex;

/// Institutional sender ids that are never scored (substring match, lowercase).
pub const TRUSTED_SENDERS: &[&str] = &[
    // Indian banks (DLT header ids)
    "hdfcbk",
    "hdfcbank",
    "icicib",
    "icicibank",
    "sbiinb",
    "sbibnk",
    "sbipsg",
    "cbssbi",
    "axisbk",
    "kotakb",
    "pnbsms",
    "boiind",
    "canbnk",
    "unionb",
    "idfcfb",
    "yesbnk",
    "indusb",
    "bobtxn",
    // Payments
    "paytmb",
    "phonpe",
    "phonepe",
    "googlepay",
    "amazonpay",
    "bhimupi",
    "npci",
    // Government
    "uidai",
    "epfoho",
    "itdept",
    "cbdt",
    "digilocker",
    "govtin",
    // US/EU institutions
    "chasebank",
    "jpmchase",
    "wellsfargo",
    "bankofamerica",
    "citibank",
    "capitalone",
    "americanexpress",
    "paypal",
    "venmo",
    "zelle",
];

/// Phrases that on their own are a strong scam indicator.
pub const HIGH_CONFIDENCE_PHRASES: &[&str] = &[
    "you have won",
    "you've won",
    "you have been selected",
    "claim your prize",
    "claim your reward",
    "claim your gift",
    "lottery winner",
    "won a lottery",
    "your account has been suspended",
    "your account will be suspended",
    "your account has been blocked",
    "your account will be blocked",
    "account will be deactivated",
    "update your kyc",
    "kyc update pending",
    "kyc has expired",
    "verify your account immediately",
    "confirm your identity to avoid",
    "share your otp",
    "send your otp",
    "your package could not be delivered",
    "your parcel is on hold",
    "package is on hold",
    "delivery attempt failed",
    "unpaid toll",
    "outstanding toll",
    "toll balance due",
    "final notice",
    "electricity will be disconnected",
    "power will be disconnected",
    "your sim will be blocked",
    "work from home and earn",
    "earn money from home",
    "guaranteed returns",
    "double your money",
    "investment opportunity with",
    "pre-approved loan",
    "instant loan approved",
    "refund has been initiated click",
    "irs refund",
];

/// Generic spam vocabulary. Each distinct hit counts once toward a capped score.
pub const SPAM_KEYWORDS: &[&str] = &[
    "congratulations",
    "winner",
    "prize",
    "cash prize",
    "jackpot",
    "lottery",
    "lucky draw",
    "reward",
    "free gift",
    "gift card",
    "voucher",
    "cashback",
    "claim now",
    "claim",
    "act now",
    "urgent",
    "immediately",
    "limited time",
    "limited offer",
    "offer ends",
    "expires today",
    "last chance",
    "hurry",
    "don't miss",
    "exclusive deal",
    "special offer",
    "discount",
    "% off",
    "flat off",
    "sale ends",
    "buy now",
    "order now",
    "click here",
    "click the link",
    "tap the link",
    "visit now",
    "subscribe",
    "unsubscribe",
    "opt out",
    "reply stop",
    "free",
    "100% free",
    "risk free",
    "no cost",
    "guaranteed",
    "earn money",
    "earn up to",
    "income",
    "per day",
    "per week",
    "part time job",
    "work from home",
    "investment",
    "crypto",
    "bitcoin",
    "trading",
    "profit",
    "loan",
    "credit card",
    "pre-approved",
    "low interest",
    "debt",
    "insurance",
    "verify",
    "verification",
    "suspended",
    "deactivated",
    "kyc",
    "pan card",
    "aadhaar",
    "password",
    "login",
    "account blocked",
    "security alert",
    "unusual activity",
    "refund",
    "tax refund",
    "payment failed",
    "overdue",
    "penalty",
    "toll",
    "parcel",
    "delivery",
    "customs fee",
    "shipping fee",
    "redeem",
    "points expire",
    "bonus",
    "casino",
    "betting",
    "rummy",
    "selected",
    "eligible",
    "apply now",
    "call now",
    "whatsapp",
    "telegram",
    "dear customer",
    "dear user",
    "valued customer",
];

/// Phrases from dating/romance bait messages.
pub const DATING_PHRASES: &[&str] = &[
    "hey babe",
    "hi babe",
    "hello babe",
    "hey handsome",
    "hi handsome",
    "hey sexy",
    "check my profile",
    "see my profile",
    "my profile pic",
    "my private pics",
    "see my pics",
    "private photos",
    "lonely tonight",
    "feeling lonely",
    "looking for a man",
    "looking for fun",
    "want to meet",
    "meet tonight",
    "meet up tonight",
    "hook up",
    "hookup",
    "hot singles",
    "single women",
    "single ladies",
    "dating site",
    "text me back babe",
    "are you single",
    "video chat with me",
];

/// Host fragments typical of dating/adult bait domains.
pub const DATING_DOMAIN_KEYWORDS: &[&str] = &[
    "dating", "single", "flirt", "hookup", "babe", "girl", "romance", "lover", "sexy",
    "xxx", "adult",
];

/// Openers used by "wrong number" and romance scams.
pub const CASUAL_GREETINGS: &[&str] = &[
    "hi", "hii", "hiii", "hey", "heyy", "hello", "helo", "yo", "sup", "hola", "howdy",
];

pub const TERMS_PHRASES: &[&str] = &[
    "t&c",
    "t & c",
    "t&cs",
    "tnc apply",
    "terms and conditions apply",
    "terms & conditions apply",
    "conditions apply",
];

pub const HIDDEN_SENDER_MARKERS: &[&str] = &["unknown", "private", "blocked"];

/// Brand names and the domains they legitimately send links from.
pub const BRAND_DOMAINS: &[(&str, &[&str])] = &[
    (
        "amazon",
        &["amazon.com", "amazon.in", "amazon.co.uk", "amzn.to", "amzn.in"],
    ),
    ("paypal", &["paypal.com", "paypal.me"]),
    ("netflix", &["netflix.com"]),
    ("apple", &["apple.com", "icloud.com", "apple.co"]),
    ("google", &["google.com", "goo.gl"]),
    ("microsoft", &["microsoft.com", "live.com", "office.com"]),
    ("fedex", &["fedex.com"]),
    ("usps", &["usps.com"]),
    ("ups", &["ups.com"]),
    ("dhl", &["dhl.com", "dhl.in"]),
    ("india post", &["indiapost.gov.in"]),
    ("flipkart", &["flipkart.com", "fkrt.it"]),
    ("paytm", &["paytm.com", "paytm.me"]),
    ("hdfc", &["hdfcbank.com"]),
    ("icici", &["icicibank.com"]),
    ("sbi", &["sbi.co.in", "onlinesbi.sbi", "onlinesbi.com"]),
    ("whatsapp", &["whatsapp.com", "wa.me"]),
    ("instagram", &["instagram.com"]),
    ("facebook", &["facebook.com", "fb.com", "fb.me"]),
    ("chase", &["chase.com"]),
    ("wells fargo", &["wellsfargo.com"]),
    ("bank of america", &["bankofamerica.com", "bofa.com"]),
    ("irs", &["irs.gov"]),
];

/// Top-level domains recognized when spotting bare domains in text.
const URL_TLDS: &str = "com|net|org|info|biz|io|co|in|me|us|uk|ly|gl|gd|to|cc|tv|ru|cn|xyz|top|\
club|online|site|live|link|click|app|store|shop|vip|win|loan|work|icu|buzz|tk|ml|ga|cf|gq|cam|\
rest|today|support|help|page|lol|fun|bid|date|men|party|review|trade|stream|gov|sbi";

lazy_static! {
    /// DLT-style `XX-BRAND` header ids of trusted institutions, e.g. `VM-HDFCBK`, `JD-SBIINB-S`.
    pub static ref TRUSTED_SENDER_ID_PATTERNS: Vec<Regex> = vec![
        Regex::new(
            r"(?i)^[a-z]{2}-(hdfc|icici|sbi|axis|kotak|pnb|bob|canara|canbnk|union|idfc|yes|indus|federal|rbl)[a-z0-9]{0,6}(-[sgtp])?$"
        )
        .unwrap(),
        Regex::new(r"(?i)^[a-z]{2}-(govt|uidai|epfo|cbdt|itdept|npci|irctc|digilk)[a-z0-9]{0,6}(-[sgtp])?$")
            .unwrap(),
    ];

    pub static ref SUSPICIOUS_URL_PATTERNS: Vec<Regex> = vec![
        // URL shorteners
        Regex::new(
            r"(?i)\b(bit\.ly|tinyurl\.com|goo\.gl|t\.co|ow\.ly|is\.gd|buff\.ly|rb\.gy|cutt\.ly|shorturl\.at|tiny\.cc|s\.id|t\.ly)/"
        )
        .unwrap(),
        // High-abuse TLDs
        Regex::new(
            r"(?i)\b[a-z0-9-]+\.(xyz|top|club|online|site|live|click|link|tk|ml|ga|cf|gq|icu|buzz|vip|win|loan|work|rest|cam)\b"
        )
        .unwrap(),
        // Fake toll and parking payment domains
        Regex::new(
            r"(?i)\b[a-z0-9-]*(toll|ezpass|e-zpass|sunpass|fastrak|txtag|parking|dmv)[a-z0-9-]*\.(com|net|org|info|us|co|xyz|top|vip|icu|live)\b"
        )
        .unwrap(),
        // Hyphenated carrier/courier look-alikes such as usps-redelivery.com
        Regex::new(
            r"(?i)\b[a-z0-9-]*(usps|fedex|dhl|ups|indiapost|royalmail|canadapost)-[a-z0-9-]+\.[a-z]{2,}\b"
        )
        .unwrap(),
        // Raw IP address links
        Regex::new(r"(?i)https?://\d{1,3}(\.\d{1,3}){3}").unwrap(),
    ];

    pub static ref SUSPICIOUS_SENDER_PATTERNS: Vec<Regex> = vec![
        // Longer than any real mobile number
        Regex::new(r"^\+?\d{13,}$").unwrap(),
        // Email-to-SMS gateways
        Regex::new(r"(?i)^[^@\s]+@[^@\s]+\.[a-z]{2,}$").unwrap(),
        // Random-looking word plus digits, e.g. "deals83412"
        Regex::new(r"(?i)^[a-z]+\d{5,}$").unwrap(),
    ];

    pub static ref PROMOTIONAL_PREFIX: Regex = Regex::new(r"(?i)^(ad|bz|lm|mk)-").unwrap();

    pub static ref BUSINESS_SHORTCODE: Regex = Regex::new(r"^[A-Za-z]{5,11}$").unwrap();

    pub static ref LONG_NUMBER: Regex = Regex::new(r"\d{10,}").unwrap();

    pub static ref URL_CANDIDATE: Regex = Regex::new(&format!(
        r#"(?i)\b(?:https?://[^\s<>"']+|www\.[^\s<>"']+|[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.(?:{})\b(?:/[^\s<>"']*)?)"#,
        URL_TLDS
    ))
    .unwrap();

    /// Brand name matched on word boundaries, with its legitimate domains.
    pub static ref BRAND_PATTERNS: Vec<(&'static str, Regex, &'static [&'static str])> = BRAND_DOMAINS
        .iter()
        .map(|(brand, domains)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(brand).replace(' ', r"\s+"));
            (*brand, Regex::new(&pattern).unwrap(), *domains)
        })
        .collect();
}

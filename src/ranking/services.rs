//! Hosting-provider detection from CNAME targets

/// How a CNAME target is compared against a provider hostname
#[derive(Debug, Clone, Copy)]
enum Rule {
    Suffix(&'static str),
    Exact(&'static str),
    Contains(&'static str),
}

impl Rule {
    fn matches(&self, cname: &str) -> bool {
        match self {
            Self::Suffix(suffix) => cname.ends_with(suffix),
            Self::Exact(host) => cname == *host,
            Self::Contains(part) => cname.contains(part),
        }
    }
}

/// Name reported for CNAMEs no rule claims, and for domains without one
pub const OTHER: &str = "other";

/// Provider table, checked in order; the first matching row wins.
const PROVIDERS: &[(&str, &[Rule])] = &[
    ("github", &[Rule::Suffix(".github.io")]),
    (
        "vercel",
        &[Rule::Suffix(".vercel.app"), Rule::Exact("cname.vercel-dns.com")],
    ),
    (
        "netlify",
        &[
            Rule::Suffix(".netlify.app"),
            Rule::Contains(".netlify.global"),
            Rule::Exact("apex-loadbalancer.netlify.com"),
        ],
    ),
    ("surge.sh", &[Rule::Suffix(".surge.sh")]),
    (
        "firebase",
        &[Rule::Suffix(".web.app"), Rule::Suffix(".firebaseapp.com")],
    ),
    ("replit", &[Rule::Suffix(".repl.co")]),
    ("gitlab", &[Rule::Suffix(".gitlab.io")]),
    ("render", &[Rule::Suffix(".onrender.com")]),
    (
        "cloudflare pages",
        &[Rule::Suffix(".pages.dev"), Rule::Exact("pages.cloudflare.com")],
    ),
    ("glitch", &[Rule::Suffix(".glitch.me")]),
    ("redirect.pizza", &[Rule::Exact("edge.redirect.pizza")]),
    // Historically never labelled "digital ocean"; the published counts
    // have always filed these under "other".
    (OTHER, &[Rule::Suffix(".ondigitalocean.app")]),
    ("hashnode", &[Rule::Exact("hashnode.network")]),
    ("deno", &[Rule::Suffix(".deno.dev")]),
    ("streamlit", &[Rule::Suffix(".streamlit.app")]),
    ("gitbook", &[Rule::Suffix(".gitbook.io")]),
    ("codeberg", &[Rule::Suffix(".codeberg.page")]),
    ("nekoweb.org", &[Rule::Exact("dns.nekoweb.org")]),
    ("readthedocs", &[Rule::Exact("readthedocs.io")]),
];

/// Classifies a CNAME target into a hosting provider name
///
/// Matching is case-insensitive. Unknown targets map to [`OTHER`].
///
/// # Examples
///
/// ```
/// use subdomain_census::ranking::classify_service;
///
/// assert_eq!(classify_service("foo.github.io"), "github");
/// assert_eq!(classify_service("random.example.com"), "other");
/// ```
pub fn classify_service(cname: &str) -> &'static str {
    let cname = cname.to_lowercase();
    PROVIDERS
        .iter()
        .find(|(_, rules)| rules.iter().any(|rule| rule.matches(&cname)))
        .map(|(name, _)| *name)
        .unwrap_or(OTHER)
}

//! Related-role table used to widen a job-function query to adjacent fields.
//!
//! Keys are single normalized tokens; related terms may be multi-word phrases.
//! Lookups are symmetric: a token that appears as a related term of some key
//! also expands to that key.

pub const RELATED_ROLES: &[(&str, &[&str])] = &[
    (
        "electrical",
        &[
            "electronics",
            "electronic",
            "computer engineering",
            "hardware",
            "power systems",
            "controls",
            "instrumentation",
        ],
    ),
    ("electronics", &["embedded", "pcb", "circuit", "firmware"]),
    ("mechanical", &["mechatronics", "manufacturing", "hvac", "product design", "automotive"]),
    ("civil", &["structural", "construction", "geotechnical", "transportation"]),
    ("chemical", &["process engineering", "process engineer", "refinery", "petrochemical"]),
    ("software", &["developer", "programmer", "backend", "frontend", "full stack", "coder"]),
    ("developer", &["programmer", "software engineer", "coder"]),
    ("backend", &["server side", "api", "platform"]),
    ("frontend", &["front end", "ui", "web developer"]),
    ("devops", &["sre", "site reliability", "infrastructure", "platform engineer", "cloud engineer"]),
    ("data", &["analytics", "data science", "machine learning", "business intelligence"]),
    ("scientist", &["researcher", "research"]),
    ("analyst", &["analytics", "business intelligence", "reporting"]),
    ("manager", &["lead", "head", "director", "supervisor"]),
    ("product", &["product owner", "program manager"]),
    ("designer", &["ux", "ui", "user experience"]),
    ("aerospace", &["aeronautical", "avionics", "aviation"]),
    ("industrial", &["manufacturing", "operations", "lean", "six sigma"]),
    ("quality", &["qa", "qc", "quality assurance", "quality control"]),
    ("technician", &["tech", "maintenance", "field service"]),
];

/// Related terms for a normalized token, in table order, without duplicates.
pub fn related_terms(token: &str) -> Vec<&'static str> {
    let mut terms: Vec<&'static str> = Vec::new();
    for (key, related) in RELATED_ROLES {
        let forward = *key == token;
        let backward = related.contains(&token);
        if forward {
            for term in related.iter() {
                if *term != token && !terms.contains(term) {
                    terms.push(*term);
                }
            }
        }
        if backward && !terms.contains(key) {
            terms.push(*key);
        }
    }
    terms
}

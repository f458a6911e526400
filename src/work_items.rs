// src/work_items.rs

use regex::Regex;
use std::sync::OnceLock;

static WORK_ITEM: OnceLock<Regex> = OnceLock::new();

fn work_item_pattern() -> &'static Regex {
    WORK_ITEM.get_or_init(|| {
        // AB#123 / #123 (Azure Boards, GitHub) and PROJ-123 (Jira)
        Regex::new(r"\b[A-Z][A-Z0-9]+-\d+\b|(?:\b[A-Za-z]+)?#\d+\b").expect("valid regex")
    })
}

/// Upper-case prefixes of standards and algorithms that look like issue keys
const NOT_ISSUE_KEYS: &[&str] = &[
    "AES", "ASCII", "CP", "ECMA", "ES", "GPT", "HTTP", "IEC", "IEEE", "IPV", "ISO", "MD", "RFC",
    "SHA", "SSL", "TLS", "UCS", "UTF", "WIN",
];

fn is_issue_key(id: &str) -> bool {
    match id.split_once('-') {
        Some((prefix, _)) => !NOT_ISSUE_KEYS.contains(&prefix),
        None => true,
    }
}

/// Work item identifiers referenced by a commit message, in first-seen order.
pub fn extract_work_items(message: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in work_item_pattern().find_iter(message) {
        let id = m.as_str();
        if is_issue_key(id) && !found.iter().any(|f| f == id) {
            found.push(id.to_string());
        }
    }
    found
}

//! `@mention` extraction.
//!
//! # Invariants
//! - A mention is `@` followed by ASCII word characters `[A-Za-z0-9_]`.
//! - Usernames are matched exactly and case-sensitively.
//! - Resolved ids keep first-occurrence order and contain no duplicates.

use crate::model::user::{User, UserId};
use once_cell::sync::Lazy;
use regex::Regex;

static MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@([A-Za-z0-9_]+)").expect("valid mention regex"));

/// Returns every `@name` token captured in `text`, in order, without the `@`.
pub fn extract_mention_names(text: &str) -> Vec<&str> {
    MENTION_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Maps mentioned names to ids of roster users with an identical username.
///
/// Unknown names are dropped.
pub fn resolve_mentions(text: &str, roster: &[User]) -> Vec<UserId> {
    let mut ids: Vec<UserId> = Vec::new();
    for name in extract_mention_names(text) {
        let Some(user) = roster.iter().find(|user| user.username == name) else {
            continue;
        };
        if !ids.contains(&user.id) {
            ids.push(user.id.clone());
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::{extract_mention_names, resolve_mentions};
    use crate::model::user::User;

    fn user(id: &str, username: &str) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            name: String::new(),
            email: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn extracts_word_tokens_after_at_sign() {
        assert_eq!(
            extract_mention_names("hi @al, cc @bo_2 and mail@host"),
            vec!["al", "bo_2", "host"]
        );
        assert!(extract_mention_names("no mentions @ here").is_empty());
    }

    #[test]
    fn mention_stops_at_first_non_ascii_character() {
        assert_eq!(extract_mention_names("hi @josé"), vec!["jos"]);
        assert_eq!(extract_mention_names("@ünter @bo°"), vec!["bo"]);

        let roster = vec![user("u1", "jos"), user("u2", "josé")];
        assert_eq!(resolve_mentions("ping @josé", &roster), vec!["u1"]);
    }

    #[test]
    fn resolves_single_known_mention() {
        let roster = vec![user("u1", "al")];
        assert_eq!(resolve_mentions("ping @al please", &roster), vec!["u1"]);
    }

    #[test]
    fn matching_is_case_sensitive_and_deduplicated() {
        let roster = vec![user("u1", "al"), user("u2", "Bo")];
        assert_eq!(
            resolve_mentions("@Al @bo @Bo @al @Bo @ghost", &roster),
            vec!["u2", "u1"]
        );
    }
}

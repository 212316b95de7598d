//! Protected-account guard.
//!
//! Some accounts are categorically undeletable. The allow-list comes from
//! [`init_protected_emails`] or, failing that, the `PROTECTED_EMAILS`
//! environment variable (comma-separated). The check runs before any other
//! cascade work and no fallback path bypasses it.

use once_cell::sync::OnceCell;

static PROTECTED_EMAILS: OnceCell<Vec<String>> = OnceCell::new();

const DEFAULT_PROTECTED: &str = "admin@bazari.example";

/// Install the allow-list programmatically. First writer wins; a second call
/// after the list has been read is ignored with a warning.
pub fn init_protected_emails(emails: Vec<String>) {
    let normalized: Vec<String> = emails.into_iter().map(|e| e.to_lowercase()).collect();
    if PROTECTED_EMAILS.set(normalized).is_err() {
        log::warn!("init_protected_emails() called after the list was already fixed");
    }
}

fn protected_list() -> &'static [String] {
    PROTECTED_EMAILS.get_or_init(|| match std::env::var("PROTECTED_EMAILS") {
        Ok(raw) => raw
            .split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect(),
        Err(_) => vec![DEFAULT_PROTECTED.to_owned()],
    })
}

pub fn is_protected(email: Option<&str>) -> bool {
    matches_list(protected_list(), email)
}

fn matches_list(list: &[String], email: Option<&str>) -> bool {
    match email {
        Some(email) => {
            let email = email.to_lowercase();
            list.iter().any(|p| *p == email)
        }
        None => false,
    }
}

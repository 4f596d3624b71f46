//! Log sanitization utilities for masking sensitive data.
//!
//! Email addresses are personal data; they are masked before they reach the
//! log output.

/// Mask an email address for safe logging.
///
/// Shows only the first 3 characters (or fewer if the local part is shorter)
/// followed by asterisks and the domain.
///
/// # Examples
/// ```ignore
/// assert_eq!(mask_email("user@example.com"), "use***@example.com");
/// assert_eq!(mask_email("ab@test.org"), "ab***@test.org");
/// ```
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local_part, domain)) => format!("{}***@{}", visible_prefix(local_part), domain),
        // Not a valid email format, just mask most of it
        None => format!("{}***", visible_prefix(email)),
    }
}

fn visible_prefix(value: &str) -> String {
    value.chars().take(3).collect()
}

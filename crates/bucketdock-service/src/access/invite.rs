//! Parsing free-text invite lists.

use validator::ValidateEmail;

/// Addresses split out of an invite box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteList {
    /// Well-formed addresses, in input order.
    pub valid: Vec<String>,
    /// Entries that are not email addresses.
    pub skipped: Vec<String>,
}

/// Split `input` on commas, semicolons and newlines.
///
/// Entries are trimmed and empty ones dropped. Malformed addresses go to
/// [`InviteList::skipped`].
pub fn parse_invite_emails(input: &str) -> InviteList {
    let mut list = InviteList::default();
    for entry in input
        .split([',', ';', '\n', '\r'])
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        if entry.validate_email() {
            list.valid.push(entry.to_string());
        } else {
            list.skipped.push(entry.to_string());
        }
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_skip() {
        let list = parse_invite_emails("a@x.com, b@x.com; bad");
        assert_eq!(list.valid, ["a@x.com", "b@x.com"]);
        assert_eq!(list.skipped, ["bad"]);
    }

    #[test]
    fn test_newlines_and_blanks() {
        let list = parse_invite_emails("\n c@y.org \r\n,,;\nd@y.org\n");
        assert_eq!(list.valid, ["c@y.org", "d@y.org"]);
        assert!(list.skipped.is_empty());
    }
}

//! Registrable domain lookup.
//!
//! Dinahosting manages zones by registrable domain, i.e. one label below a [public suffix]. For
//! `_acme-challenge.www.example.co.uk` the registrable domain is `example.co.uk` and the record
//! is created with the hostname `_acme-challenge.www`.
//!
//! [`SuffixList`] implements the public suffix list matching algorithm. By
//! [default][SuffixList::builtin] it consults the full list bundled with the [`psl`] crate, and
//! extra rules can be [added][SuffixList::extend] on top. A list can also be
//! [loaded][SuffixList::from_dat] from a copy of `public_suffix_list.dat` instead.
//!
//! [public suffix]: https://publicsuffix.org/list/

use crate::error::Error;
use std::collections::HashSet;

/// A set of public suffix rules, optionally backed by the bundled public suffix list.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SuffixList {
    bundled: bool,
    rules: HashSet<String>,
    // Stored without the leading "*.".
    wildcards: HashSet<String>,
    // Stored without the leading "!".
    exceptions: HashSet<String>,
}

impl SuffixList {
    /// The full public suffix list, ICANN and private sections, as bundled with [`psl`].
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            bundled: true,
            ..Self::default()
        }
    }

    /// Parse rules in the `public_suffix_list.dat` format: one rule per line, `//` comments,
    /// `*.` wildcard rules and `!` exception rules.
    #[must_use]
    pub fn from_dat(contents: &str) -> Self {
        let mut list = Self::default();
        list.extend(contents.lines());
        list
    }

    /// Add rules to the list.
    pub fn extend<I, S>(&mut self, rules: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for rule in rules {
            let Some(rule) = rule.as_ref().split_whitespace().next() else {
                continue;
            };
            if rule.starts_with("//") {
                continue;
            }
            let rule = rule.trim_end_matches('.').to_ascii_lowercase();
            if let Some(exception) = rule.strip_prefix('!') {
                self.exceptions.insert(exception.to_string());
            } else if let Some(wildcard) = rule.strip_prefix("*.") {
                self.wildcards.insert(wildcard.to_string());
            } else if !rule.is_empty() {
                self.rules.insert(rule);
            }
        }
    }

    /// The number of explicitly added rules. The bundled list isn't counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len() + self.wildcards.len() + self.exceptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The registrable domain of `name`: its public suffix plus one label. The result is
    /// lowercase and has no trailing dot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRegistrableDomain`] if `name` is empty, has an empty label, or is
    /// itself a public suffix.
    pub fn registrable_domain(&self, name: &str) -> Result<String, Error> {
        let lowered = name.trim_end_matches('.').to_ascii_lowercase();
        let labels: Vec<&str> = lowered.split('.').collect();
        if labels.iter().any(|l| l.is_empty()) {
            return Err(Error::NoRegistrableDomain(name.to_string()));
        }

        let suffix_len = self.suffix_len(&lowered, &labels);
        if labels.len() <= suffix_len {
            return Err(Error::NoRegistrableDomain(name.to_string()));
        }
        Ok(labels[labels.len() - suffix_len - 1..].join("."))
    }

    // Number of trailing labels forming the public suffix of `name`.
    fn suffix_len(&self, name: &str, labels: &[&str]) -> usize {
        let n = labels.len();

        // An exception rule prevails over every other rule. Its suffix drops the leftmost label.
        for i in 0..n {
            if self.exceptions.contains(&labels[i..].join(".")) {
                return n - i - 1;
            }
        }

        // Otherwise the longest matching rule wins, with "*" as the default.
        let explicit = (0..n)
            .find(|&i| {
                let wildcard = i + 1 < n && self.wildcards.contains(&labels[i + 1..].join("."));
                wildcard || self.rules.contains(&labels[i..].join("."))
            })
            .map_or(0, |i| n - i);
        let bundled = if self.bundled {
            psl::suffix_str(name).map_or(0, |suffix| suffix.split('.').count())
        } else {
            0
        };
        explicit.max(bundled).max(1)
    }
}

/// The hostname of `name` relative to `domain`, i.e. `name` with the trailing `.domain` removed.
///
/// # Errors
///
/// Returns [`Error::NotInDomain`] if `name` isn't a strict subdomain of `domain`.
pub fn relative_hostname(name: &str, domain: &str) -> Result<String, Error> {
    let trimmed = name.trim_end_matches('.');
    let suffix = format!(".{}", domain.trim_end_matches('.')).to_ascii_lowercase();
    let lowered = trimmed.to_ascii_lowercase();
    match lowered.strip_suffix(&suffix) {
        Some(hostname) if !hostname.is_empty() => Ok(trimmed[..hostname.len()].to_string()),
        _ => Err(Error::NotInDomain {
            name: name.to_string(),
            domain: domain.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registrable_domains() {
        let list = SuffixList::builtin();
        assert_eq!(list.registrable_domain("example.com").unwrap(), "example.com");
        assert_eq!(
            list.registrable_domain("_acme-challenge.www.example.com").unwrap(),
            "example.com"
        );
        assert_eq!(
            list.registrable_domain("foo.example.co.uk").unwrap(),
            "example.co.uk"
        );
        assert_eq!(
            list.registrable_domain("Sub.Example.COM.ES.").unwrap(),
            "example.com.es"
        );
    }

    #[test]
    fn builtin_covers_full_list() {
        let list = SuffixList::builtin();
        for (name, expected) in [
            ("www.example.com.cn", "example.com.cn"),
            ("www.example.co.kr", "example.co.kr"),
            ("foo.github.io", "foo.github.io"),
            ("www.example.com.ve", "example.com.ve"),
            ("www.example.co.at", "example.co.at"),
        ] {
            assert_eq!(list.registrable_domain(name).unwrap(), expected, "{name}");
        }
    }

    #[test]
    fn extend_builtin_with_private_suffix() {
        let mut list = SuffixList::builtin();
        assert_eq!(
            list.registrable_domain("_acme-challenge.a.b.example.test").unwrap(),
            "example.test"
        );
        list.extend(["b.example.test"]);
        assert_eq!(
            list.registrable_domain("_acme-challenge.a.b.example.test").unwrap(),
            "a.b.example.test"
        );
        // Rules added on top never shorten a suffix from the bundled list.
        list.extend(["uk"]);
        assert_eq!(
            list.registrable_domain("www.example.co.uk").unwrap(),
            "example.co.uk"
        );
    }

    #[test]
    fn suffix_only_names_are_rejected() {
        let list = SuffixList::builtin();
        for name in ["com", "co.uk", "", "example..com"] {
            assert!(
                matches!(
                    list.registrable_domain(name),
                    Err(Error::NoRegistrableDomain(_))
                ),
                "{name}"
            );
        }
    }

    #[test]
    fn wildcard_and_exception_rules() {
        let list = SuffixList::from_dat(
            "// ck : https://en.wikipedia.org/wiki/.ck\n\
             *.ck\n\
             !www.ck\n\
             \n\
             jp\n\
             kobe.jp\n\
             *.kobe.jp\n\
             !city.kobe.jp\n",
        );
        assert_eq!(list.len(), 6);
        assert_eq!(list.registrable_domain("a.b.test.ck").unwrap(), "b.test.ck");
        assert!(list.registrable_domain("test.ck").is_err());
        assert_eq!(list.registrable_domain("www.ck").unwrap(), "www.ck");
        assert_eq!(list.registrable_domain("www.www.ck").unwrap(), "www.ck");
        assert_eq!(list.registrable_domain("a.c.kobe.jp").unwrap(), "a.c.kobe.jp");
        assert_eq!(
            list.registrable_domain("www.city.kobe.jp").unwrap(),
            "city.kobe.jp"
        );
    }

    #[test]
    fn extend_adds_rules() {
        let mut list = SuffixList::default();
        assert!(list.is_empty());
        assert_eq!(list.registrable_domain("a.example.test").unwrap(), "example.test");
        list.extend(["example.test"]);
        assert_eq!(
            list.registrable_domain("a.example.test").unwrap(),
            "a.example.test"
        );
    }

    #[test]
    fn relative_hostnames() {
        assert_eq!(
            relative_hostname("_acme-challenge.example.com", "example.com").unwrap(),
            "_acme-challenge"
        );
        assert_eq!(
            relative_hostname("_acme-challenge.www.Example.co.uk.", "example.co.uk").unwrap(),
            "_acme-challenge.www"
        );
        assert!(matches!(
            relative_hostname("example.com", "example.com"),
            Err(Error::NotInDomain { .. })
        ));
        assert!(matches!(
            relative_hostname("_acme-challenge.notexample.com", "example.com"),
            Err(Error::NotInDomain { .. })
        ));
        assert!(matches!(
            relative_hostname("_acme-challenge.example.org", "example.com"),
            Err(Error::NotInDomain { .. })
        ));
    }
}

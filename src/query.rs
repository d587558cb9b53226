//! Query option tokenization.
//!
//! Query values are untrusted external text. This layer recognizes single
//! tokens of the shape `key` or `key=value`; comparison against a
//! resource's keyword sets is exact, never prefix or fuzzy, and anything
//! unmatched is reported as an unsupported query by the dispatcher rather
//! than guessed at.

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Query<'a> {
    pub key: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> Query<'a> {
    /// Splits a raw query option at the first `=`. A token without `=` is
    /// a bare key.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once('=') {
            Some((key, value)) => Self {
                key,
                value: Some(value),
            },
            None => Self {
                key: raw,
                value: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_key() {
        assert_eq!(
            Query::parse("cfg"),
            Query {
                key: "cfg",
                value: None
            }
        );
    }

    #[test]
    fn key_value() {
        assert_eq!(
            Query::parse("cfg_temp=C"),
            Query {
                key: "cfg_temp",
                value: Some("C")
            }
        );
    }

    #[test]
    fn splits_at_first_equals_only() {
        assert_eq!(
            Query::parse("cfg=a=b"),
            Query {
                key: "cfg",
                value: Some("a=b")
            }
        );
    }

    #[test]
    fn empty_value_is_preserved() {
        // `cfg=` is a recognized key with an (invalid) empty value, which
        // must stay distinguishable from the bare `cfg` read
        assert_eq!(
            Query::parse("cfg="),
            Query {
                key: "cfg",
                value: Some("")
            }
        );
    }
}

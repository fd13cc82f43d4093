//! Claim module - the atomic assertion a session tries to verify

use std::fmt;

/// Unique identifier for a claim based on UUIDv7
///
/// UUIDv7 keeps identifiers chronologically sortable, which gives
/// reports and ledgers a stable claim ordering without extra bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimId(u128);

impl ClaimId {
    /// Generate a new UUIDv7-based ClaimId
    ///
    /// # Examples
    ///
    /// ```
    /// use verity_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a ClaimId from a raw u128 value
    ///
    /// Used by storage backends when reading ids back.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a ClaimId from its hyphenated UUID form
    ///
    /// # Examples
    ///
    /// ```
    /// use verity_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// let parsed = ClaimId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid claim id '{}': {}", s, e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A factual assertion to be verified
///
/// Claims are immutable once handed to the controller. `origin_domain`
/// records the outlet the claim was extracted from; when
/// `origin_source_excluded` is set, that outlet is never accepted as
/// evidence for its own claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// The assertion, as extracted
    pub text: String,

    /// Whether the originating source must be excluded from evidence
    pub origin_source_excluded: bool,

    /// Domain of the document the claim came from, if known
    pub origin_domain: Option<String>,
}

impl Claim {
    /// Create a claim with a fresh id and no origin information
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ClaimId::new(),
            text: text.into(),
            origin_source_excluded: false,
            origin_domain: None,
        }
    }

    /// Record the originating domain and exclude it from evidence
    pub fn excluding_origin(mut self, domain: impl Into<String>) -> Self {
        self.origin_domain = Some(domain.into());
        self.origin_source_excluded = true;
        self
    }

    /// Whether a candidate from `domain` must be skipped for this claim
    ///
    /// Comparison ignores case and a leading `www.`.
    pub fn excludes_domain(&self, domain: &str) -> bool {
        if !self.origin_source_excluded {
            return false;
        }
        match &self.origin_domain {
            Some(origin) => normalize_domain(origin) == normalize_domain(domain),
            None => false,
        }
    }
}

/// Canonical form of a domain name: trimmed, lowercase, no `www.` prefix
pub fn normalize_domain(domain: &str) -> String {
    let lowered = domain.trim().to_lowercase();
    match lowered.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_id_ordering() {
        let id1 = ClaimId::from_value(1000);
        let id2 = ClaimId::from_value(2000);

        assert!(id1 < id2);
        assert!(id2 > id1);
    }

    #[test]
    fn test_claim_id_display_and_parse() {
        let id = ClaimId::new();
        let id_str = id.to_string();

        assert_eq!(id_str.len(), 36);
        assert_eq!(ClaimId::from_string(&id_str).unwrap(), id);
    }

    #[test]
    fn test_claim_id_invalid_string() {
        assert!(ClaimId::from_string("not-a-claim").is_err());
        assert!(ClaimId::from_string("").is_err());
    }

    #[test]
    fn test_origin_exclusion() {
        let claim = Claim::new("Mars has two moons").excluding_origin("www.Example.com");

        assert!(claim.excludes_domain("example.com"));
        assert!(claim.excludes_domain("WWW.EXAMPLE.COM "));
        assert!(!claim.excludes_domain("nasa.gov"));
    }

    #[test]
    fn test_no_exclusion_without_flag() {
        let mut claim = Claim::new("Mars has two moons");
        claim.origin_domain = Some("example.com".to_string());

        assert!(!claim.excludes_domain("example.com"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Ordering of ids matches ordering of the raw values
        #[test]
        fn test_id_ordering_property(a: u128, b: u128) {
            let id_a = ClaimId::from_value(a);
            let id_b = ClaimId::from_value(b);

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        #[test]
        fn test_id_string_roundtrip(value: u128) {
            let id = ClaimId::from_value(value);
            match ClaimId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }
    }
}

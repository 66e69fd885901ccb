//! Principal classification and caller principal sets

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Anyone, including anonymous users
pub const PUBLIC_PRINCIPAL: &str = "everyone";

/// Any logged-in user
pub const AUTHENTICATED_PRINCIPAL: &str = "authenticated";

/// Default namespace for named patron groups
pub const DEFAULT_PATRON_NAMESPACE: &str = "patron:";

/// Which side of the patron/staff divide a principal falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Patron,
    Staff,
}

/// Classifies principals as patron or staff
///
/// Patron principals are the two well-known constants plus anything under the
/// patron namespace prefix. Everything else is a staff principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalClassifier {
    patron_namespace: String,
}

impl PrincipalClassifier {
    pub fn new(patron_namespace: impl Into<String>) -> Self {
        PrincipalClassifier {
            patron_namespace: patron_namespace.into(),
        }
    }

    pub fn patron_namespace(&self) -> &str {
        &self.patron_namespace
    }

    pub fn classify(&self, principal: &str) -> PrincipalKind {
        if self.is_patron(principal) {
            PrincipalKind::Patron
        } else {
            PrincipalKind::Staff
        }
    }

    pub fn is_patron(&self, principal: &str) -> bool {
        principal == PUBLIC_PRINCIPAL
            || principal == AUTHENTICATED_PRINCIPAL
            || (!self.patron_namespace.is_empty() && principal.starts_with(&self.patron_namespace))
    }

    pub fn is_staff(&self, principal: &str) -> bool {
        !self.is_patron(principal)
    }
}

impl Default for PrincipalClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_PATRON_NAMESPACE)
    }
}

/// The principals a caller has been authenticated as
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalSet(BTreeSet<String>);

impl PrincipalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, principal: impl Into<String>) -> bool {
        self.0.insert(principal.into())
    }

    pub fn contains(&self, principal: &str) -> bool {
        self.0.contains(principal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PrincipalSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        PrincipalSet(iter.into_iter().map(Into::into).collect())
    }
}

//! Subscription box records and creation input.

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::chain::Address;

/// Placeholder shown wherever the encrypted preference would appear.
pub const ENCRYPTED_PLACEHOLDER: &str = "FHE-Protected Integer";

/// Lowest accepted preference score.
pub const MIN_PREFERENCE: u32 = 1;

/// Highest accepted preference score.
pub const MAX_PREFERENCE: u32 = 100;

/// Raw record as returned by the contract's `getBusinessData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessData {
    pub name: String,
    pub public_value1: u64,
    pub public_value2: u64,
    pub description: String,
    pub creator: Address,
    /// Unix seconds
    pub timestamp: u64,
    pub is_verified: bool,
    pub decrypted_value: u32,
}

/// Client-side projection of one on-chain subscription box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionBox {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub public_value1: u64,
    pub public_value2: u64,
    pub description: String,
    pub creator: Address,
    /// Unix seconds
    pub timestamp: u64,
    pub is_verified: bool,
    decrypted_value: u32,
}

impl SubscriptionBox {
    /// Build the projection from the contract record.
    #[must_use]
    pub fn from_contract(id: impl Into<String>, data: BusinessData) -> Self {
        Self {
            id: id.into(),
            name: data.name,
            category: Category::from_code(data.public_value1),
            public_value1: data.public_value1,
            public_value2: data.public_value2,
            description: data.description,
            creator: data.creator,
            timestamp: data.timestamp,
            is_verified: data.is_verified,
            decrypted_value: data.decrypted_value,
        }
    }

    /// The authoritative cleartext preference, once verified on-chain.
    ///
    /// Unverified records return `None`; their stored value is meaningless.
    #[must_use]
    pub fn verified_preference(&self) -> Option<u32> {
        self.is_verified.then_some(self.decrypted_value)
    }

    #[must_use]
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        i64::try_from(self.timestamp)
            .ok()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    }

    #[must_use]
    pub fn preference_label(&self) -> String {
        match self.verified_preference() {
            Some(v) => v.to_string(),
            None => ENCRYPTED_PLACEHOLDER.to_string(),
        }
    }
}

/// Errors found while validating creation input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Box name is required")]
    MissingName,

    #[error("Preference score is required")]
    MissingPreference,

    #[error("Preference score must be a whole number")]
    InvalidPreference,

    #[error("Preference score must be between {MIN_PREFERENCE} and {MAX_PREFERENCE}")]
    PreferenceOutOfRange(u64),
}

/// A preference score within the declared range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Preference(u32);

impl Preference {
    /// # Errors
    /// Returns `ValidationError::PreferenceOutOfRange` outside `1..=100`.
    pub fn new(value: u64) -> Result<Self, ValidationError> {
        if (u64::from(MIN_PREFERENCE)..=u64::from(MAX_PREFERENCE)).contains(&value) {
            Ok(Self(value as u32))
        } else {
            Err(ValidationError::PreferenceOutOfRange(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

/// Raw form input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionDraft {
    pub name: String,
    pub category: Category,
    pub preference: String,
    pub description: String,
}

impl SubscriptionDraft {
    /// Whether the submit control should be enabled.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty() && !self.preference.trim().is_empty()
    }

    /// Validate and convert into creation input.
    ///
    /// # Errors
    /// Returns the first validation failure.
    pub fn validate(&self) -> Result<NewSubscription, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let raw = self.preference.trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingPreference);
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidPreference);
        }
        let value: u64 = raw
            .parse()
            .map_err(|_| ValidationError::PreferenceOutOfRange(u64::MAX))?;
        let preference = Preference::new(value)?;

        Ok(NewSubscription {
            name: name.to_string(),
            category: self.category,
            preference,
            description: self.description.trim().to_string(),
        })
    }
}

/// Validated creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub name: String,
    pub category: Category,
    pub preference: Preference,
    pub description: String,
}

/// Generate a record id from the current wall clock.
#[must_use]
pub fn new_subscription_id() -> String {
    format!("subscription-{}", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(verified: bool, value: u32) -> BusinessData {
        BusinessData {
            name: "Gadget Box".into(),
            public_value1: 8,
            public_value2: 0,
            description: "Surprise gadgets".into(),
            creator: Address::derive("creator"),
            timestamp: 1_700_000_000,
            is_verified: verified,
            decrypted_value: value,
        }
    }

    #[test]
    fn test_projection_derives_category() {
        let sub = SubscriptionBox::from_contract("subscription-1", record(false, 0));
        assert_eq!(sub.category, Category::Books);
        assert_eq!(sub.id, "subscription-1");
        assert!(sub.created_at().is_some());
    }

    #[test]
    fn test_unverified_value_is_hidden() {
        let sub = SubscriptionBox::from_contract("x", record(false, 77));
        assert_eq!(sub.verified_preference(), None);
        assert_eq!(sub.preference_label(), ENCRYPTED_PLACEHOLDER);

        let sub = SubscriptionBox::from_contract("x", record(true, 77));
        assert_eq!(sub.verified_preference(), Some(77));
        assert_eq!(sub.preference_label(), "77");
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = SubscriptionDraft {
            name: "  Book Club ".into(),
            category: Category::Books,
            preference: "55".into(),
            description: String::new(),
        };
        let new = draft.validate().expect("valid draft");
        assert_eq!(new.name, "Book Club");
        assert_eq!(new.preference.value(), 55);

        draft.name = "   ".into();
        assert_eq!(draft.validate(), Err(ValidationError::MissingName));

        draft.name = "Box".into();
        draft.preference = String::new();
        assert!(!draft.is_submittable());
        assert_eq!(draft.validate(), Err(ValidationError::MissingPreference));

        draft.preference = "5x".into();
        assert_eq!(draft.validate(), Err(ValidationError::InvalidPreference));

        draft.preference = "0".into();
        assert_eq!(draft.validate(), Err(ValidationError::PreferenceOutOfRange(0)));

        draft.preference = "101".into();
        assert!(draft.validate().is_err());

        draft.preference = "99999999999999999999999".into();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_preference_bounds() {
        assert!(Preference::new(1).is_ok());
        assert!(Preference::new(100).is_ok());
        assert!(Preference::new(101).is_err());
    }

    #[test]
    fn test_subscription_id_format() {
        let id = new_subscription_id();
        assert!(id.starts_with("subscription-"));
        assert!(id["subscription-".len()..].parse::<i64>().is_ok());
    }
}

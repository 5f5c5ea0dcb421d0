//! The [`Cost`] value type: money plus per-resource requirements.
//!
//! A cost is immutable once built. Operations that "pay" part of it return a
//! new value, so every branch of the payment search owns its own copy and
//! sibling branches never see each other's tentative payments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What a purchase requires: an amount of money and units of resources.
///
/// Resources with a zero requirement are never stored; a missing entry and a
/// zero entry mean the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cost {
    /// Money that must be paid directly (never substituted by resources).
    #[serde(default)]
    money: u32,

    /// Required units per resource name.
    #[serde(default)]
    resources: BTreeMap<String, u32>,
}

impl Cost {
    /// A cost with nothing to pay.
    pub const fn free() -> Self {
        Self {
            money: 0,
            resources: BTreeMap::new(),
        }
    }

    /// A cost consisting only of money.
    pub const fn money_only(money: u32) -> Self {
        Self {
            money,
            resources: BTreeMap::new(),
        }
    }

    /// Return a copy that additionally requires `amount` units of `resource`.
    ///
    /// Requirements for the same resource accumulate.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>, amount: u32) -> Self {
        if amount > 0 {
            let entry = self.resources.entry(resource.into()).or_insert(0);
            *entry = entry.saturating_add(amount);
        }
        self
    }

    /// Money to pay directly.
    pub const fn money(&self) -> u32 {
        self.money
    }

    /// Units of `resource` still required.
    pub fn required(&self, resource: &str) -> u32 {
        self.resources.get(resource).copied().unwrap_or(0)
    }

    /// Iterate over outstanding resource requirements (zero entries skipped).
    pub fn resources(&self) -> impl Iterator<Item = (&str, u32)> {
        self.resources
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .map(|(name, amount)| (name.as_str(), *amount))
    }

    /// Whether there is nothing left to pay.
    pub fn is_free(&self) -> bool {
        self.money == 0 && self.resources.values().all(|amount| *amount == 0)
    }

    /// Whether any resource requirement remains, ignoring money.
    pub fn needs_resources(&self) -> bool {
        self.resources.values().any(|amount| *amount > 0)
    }

    /// The same cost with the money component settled.
    #[must_use]
    pub fn without_money(&self) -> Self {
        Self {
            money: 0,
            resources: self.resources.clone(),
        }
    }

    /// The same cost with `amount` units of `resource` settled.
    ///
    /// Settling more than is required clears the requirement.
    #[must_use]
    pub fn reduced(&self, resource: &str, amount: u32) -> Self {
        let mut resources = self.resources.clone();
        let remaining = self.required(resource).saturating_sub(amount);
        if remaining == 0 {
            resources.remove(resource);
        } else {
            resources.insert(resource.to_owned(), remaining);
        }
        Self {
            money: self.money,
            resources,
        }
    }
}

impl core::fmt::Display for Cost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut items = Vec::new();
        if self.money > 0 {
            items.push(format!("${}", self.money));
        }
        for (name, amount) in self.resources() {
            if amount == 1 {
                items.push(name.to_owned());
            } else {
                items.push(format!("{amount}\u{d7}{name}"));
            }
        }
        if items.is_empty() {
            write!(f, "Free")
        } else {
            write!(f, "{}", items.join(", "))
        }
    }
}

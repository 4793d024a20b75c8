//! Buyer-side checkout state: quantity, chosen add-ons, contact details.

use compact_str::CompactString;
use smallvec::SmallVec;
use thiserror::Error;

/// Chosen add-on ids. Unique; insertion order only matters for display.
pub type AddOnSelection = SmallVec<[CompactString; 4]>;

/// Everything the buyer has picked so far. Owned exclusively by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub quantity: u32,
    pub add_ons: AddOnSelection,
    pub contact: Option<ContactInfo>,
}

impl Selection {
    pub fn new(quantity: u32) -> Self {
        Self {
            quantity,
            add_ons: SmallVec::new_const(),
            contact: None,
        }
    }

    /// Flip an add-on; returns whether it is selected afterwards.
    pub fn toggle_add_on(&mut self, id: &str) -> bool {
        if let Some(position) = self.add_ons.iter().position(|chosen| chosen.as_str() == id) {
            self.add_ons.remove(position);
            false
        } else {
            self.add_ons.push(CompactString::from(id));
            true
        }
    }

    pub fn has_add_on(&self, id: &str) -> bool {
        self.add_ons.iter().any(|chosen| chosen.as_str() == id)
    }
}

/// Raised when a required contact field is blank at submit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("name, email and phone are required")]
pub struct MissingContactField;

impl MissingContactField {
    /// Inline message shown to the buyer, in the storefront's voice.
    pub fn user_message() -> &'static str {
        "Nome, email e telefone são obrigatórios"
    }
}

/// Contact fields as typed into the form. Normalization happens at the
/// gateway boundary, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactInfo {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// All three fields must survive trimming.
    pub fn validate(&self) -> Result<(), MissingContactField> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.phone.trim().is_empty()
        {
            return Err(MissingContactField);
        }
        Ok(())
    }

    /// Canonical form for the gateway: trimmed name, lowercased email, phone
    /// as `+<country code><digits>`.
    pub fn normalized(&self, country_code: &str) -> ContactInfo {
        ContactInfo {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: normalize_phone(&self.phone, country_code),
        }
    }
}

/// Numbers already carrying the international prefix pass through untouched;
/// everything else is stripped to digits and prefixed.
fn normalize_phone(raw: &str, country_code: &str) -> String {
    let trimmed = raw.trim();
    let prefix = format!("+{country_code}");
    if trimmed.starts_with(&prefix) {
        return trimmed.to_string();
    }
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("{prefix}{digits}")
}

//! Client-side form rules, checked before any request is issued.

use api::{Id, Lead, LeadDraft};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Longest meeting note accepted, in characters.
pub const MAX_MEETING_NOTES: usize = 50;

lazy_static! {
    // Indian mobile numbers: ten ASCII digits, leading 6-9.
    static ref MOBILE_RE: Regex = Regex::new(r"^[6-9][0-9]{9}$").unwrap();
}

/// Whether `mobile` is a valid 10-digit number starting with 6, 7, 8 or 9.
pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_RE.is_match(mobile)
}

/// First failing rule of a form. The message is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Name is mandatory.")]
    NameRequired,
    #[error("Mobile number is mandatory.")]
    MobileRequired,
    #[error("Please enter a valid Indian mobile number.")]
    InvalidMobile,
    #[error("Email is mandatory.")]
    EmailRequired,
    #[error("Meeting date is mandatory.")]
    MeetingDateRequired,
    #[error("Meeting notes cannot exceed 50 characters.")]
    MeetingNotesTooLong,
    #[error("Please complete the CAPTCHA.")]
    CaptchaRequired,
    #[error("Please enter the OTP.")]
    OtpRequired,
}

/// Editable lead fields, shared by the add form and the inline editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadForm {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub meeting_date: String,
    pub meeting_notes: String,
}

/// A single field of [`LeadForm`], for generic input handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadField {
    Name,
    Mobile,
    Email,
    MeetingDate,
    MeetingNotes,
}

/// Rules that differ between deployments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeadRules {
    pub mobile_required: bool,
}

impl LeadForm {
    /// Seed the form from an existing lead.
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            name: lead.name.clone(),
            mobile: lead.mobile.clone(),
            email: lead.email.clone(),
            meeting_date: lead.meeting_date.clone(),
            meeting_notes: lead.meeting_notes.clone(),
        }
    }

    pub fn set(&mut self, field: LeadField, value: String) {
        match field {
            LeadField::Name => self.name = value,
            LeadField::Mobile => self.mobile = value,
            LeadField::Email => self.email = value,
            LeadField::MeetingDate => self.meeting_date = value,
            LeadField::MeetingNotes => self.meeting_notes = value,
        }
    }

    pub fn get(&self, field: LeadField) -> &str {
        match field {
            LeadField::Name => &self.name,
            LeadField::Mobile => &self.mobile,
            LeadField::Email => &self.email,
            LeadField::MeetingDate => &self.meeting_date,
            LeadField::MeetingNotes => &self.meeting_notes,
        }
    }

    /// Check the rules in order: name, mobile presence, mobile pattern,
    /// meeting date, notes length. The first failure wins.
    pub fn validate(&self, rules: LeadRules) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::NameRequired);
        }
        let mobile = self.mobile.trim();
        if mobile.is_empty() {
            if rules.mobile_required {
                return Err(FormError::MobileRequired);
            }
        } else if !is_valid_mobile(mobile) {
            return Err(FormError::InvalidMobile);
        }
        if self.meeting_date.trim().is_empty() {
            return Err(FormError::MeetingDateRequired);
        }
        if self.meeting_notes.chars().count() > MAX_MEETING_NOTES {
            return Err(FormError::MeetingNotesTooLong);
        }
        Ok(())
    }

    /// Request body for `user_id`, with surrounding whitespace trimmed.
    pub fn to_draft(&self, user_id: Id, is_active: bool) -> LeadDraft {
        LeadDraft {
            user_id,
            name: self.name.trim().to_string(),
            mobile: self.mobile.trim().to_string(),
            email: self.email.trim().to_string(),
            meeting_date: self.meeting_date.trim().to_string(),
            meeting_notes: self.meeting_notes.clone(),
            is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> LeadForm {
        LeadForm {
            name: "Asha".into(),
            mobile: "9876543210".into(),
            email: String::new(),
            meeting_date: "2025-03-01".into(),
            meeting_notes: "Intro call".into(),
        }
    }

    #[test]
    fn test_mobile_pattern() {
        assert!(is_valid_mobile("9876543210"));
        assert!(is_valid_mobile("6000000000"));
        assert!(!is_valid_mobile("5876543210"));
        assert!(!is_valid_mobile("98765432100"));
        assert!(!is_valid_mobile("987654321"));
        assert!(!is_valid_mobile("98765a3210"));
        assert!(!is_valid_mobile(""));
        // Non-ASCII digits are not digits here.
        assert!(!is_valid_mobile("९८७६५४३२१०"));
    }

    #[test]
    fn test_rule_order() {
        let empty = LeadForm::default();
        assert_eq!(
            empty.validate(LeadRules { mobile_required: true }),
            Err(FormError::NameRequired)
        );

        let mut form = LeadForm {
            name: "Asha".into(),
            ..LeadForm::default()
        };
        assert_eq!(
            form.validate(LeadRules { mobile_required: true }),
            Err(FormError::MobileRequired)
        );
        // Optional mobile skips straight to the date rule.
        assert_eq!(
            form.validate(LeadRules::default()),
            Err(FormError::MeetingDateRequired)
        );

        form.mobile = "12345".into();
        assert_eq!(
            form.validate(LeadRules::default()),
            Err(FormError::InvalidMobile)
        );
    }

    #[test]
    fn test_meeting_notes_limit_counts_chars() {
        let mut form = valid_form();
        form.meeting_notes = "x".repeat(MAX_MEETING_NOTES);
        assert_eq!(form.validate(LeadRules::default()), Ok(()));

        form.meeting_notes = "x".repeat(MAX_MEETING_NOTES + 1);
        assert_eq!(
            form.validate(LeadRules::default()),
            Err(FormError::MeetingNotesTooLong)
        );

        // 50 multi-byte characters are still 50 characters.
        form.meeting_notes = "é".repeat(MAX_MEETING_NOTES);
        assert_eq!(form.validate(LeadRules::default()), Ok(()));
    }

    #[test]
    fn test_messages() {
        assert_eq!(FormError::NameRequired.to_string(), "Name is mandatory.");
        assert_eq!(
            FormError::InvalidMobile.to_string(),
            "Please enter a valid Indian mobile number."
        );
        assert_eq!(
            FormError::MeetingNotesTooLong.to_string(),
            "Meeting notes cannot exceed 50 characters."
        );
    }

    #[test]
    fn test_to_draft_tags_owner() {
        let draft = valid_form().to_draft(3, true);
        assert_eq!(draft.user_id, 3);
        assert!(draft.is_active);
        assert_eq!(draft.name, "Asha");
        assert_eq!(draft.meeting_notes, "Intro call");
    }

    #[test]
    fn test_field_access() {
        let mut form = valid_form();
        form.set(LeadField::MeetingDate, "2025-04-02".into());
        assert_eq!(form.get(LeadField::MeetingDate), "2025-04-02");
        assert_eq!(form.get(LeadField::Mobile), "9876543210");
        assert_eq!(form.meeting_date, "2025-04-02");
    }
}

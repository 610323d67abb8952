//! Intake validation for new submissions.
//!
//! Mirrors the required-field checks of the red-tag form. Records that are
//! already on file (legacy imports) are not re-validated.

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::config::IntakeConfig;
use crate::error::{Error, Result};
use crate::record::{Submission, DATE_FORMAT};

/// Compiled intake rules.
#[derive(Debug, Clone)]
pub struct IntakeRules {
    mfc_pattern: Regex,
    max_attachments: usize,
}

impl IntakeRules {
    /// Compile the rules from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the MFC pattern is not a valid regex.
    pub fn from_config(config: &IntakeConfig) -> Result<Self> {
        let mfc_pattern = Regex::new(&config.mfc_pattern).map_err(|e| Error::ConfigValidation {
            message: format!("invalid mfc_pattern {}: {e}", config.mfc_pattern),
        })?;
        Ok(Self {
            mfc_pattern,
            max_attachments: config.max_attachments,
        })
    }

    /// Check a submission, returning the first failing field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSubmission`] naming the offending field.
    pub fn validate(&self, submission: &Submission) -> Result<()> {
        let required = [
            ("mfc", submission.mfc.as_str()),
            ("taggedBy", submission.tagged_by.as_str()),
            ("itemType", submission.item_type.as_str()),
            ("partNumber", submission.part_number.as_str()),
            ("removedFrom", submission.removed_from.as_str()),
            ("reasonRemove", submission.reason_remove.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::invalid_submission(field, "is required"));
            }
        }

        if !self.mfc_pattern.is_match(submission.mfc.trim()) {
            return Err(Error::invalid_submission(
                "mfc",
                format!("{:?} is not a valid site code", submission.mfc),
            ));
        }

        let Some(date) = submission.removal_date.as_deref().map(str::trim) else {
            return Err(Error::invalid_submission("removalDate", "is required"));
        };
        if date.is_empty() {
            return Err(Error::invalid_submission("removalDate", "is required"));
        }
        if NaiveDate::parse_from_str(date, DATE_FORMAT).is_err() {
            return Err(Error::invalid_submission(
                "removalDate",
                format!("{date:?} is not a YYYY-MM-DD date"),
            ));
        }

        if submission.attached_files.len() > self.max_attachments {
            return Err(Error::invalid_submission(
                "attachedFiles",
                format!(
                    "{} files attached, at most {} allowed",
                    submission.attached_files.len(),
                    self.max_attachments
                ),
            ));
        }

        debug!("Submission for part {} passed intake", submission.part_number);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::sample_submission;

    fn rules() -> IntakeRules {
        IntakeRules::from_config(&IntakeConfig::default()).unwrap()
    }

    #[test]
    fn test_valid_submission_passes() {
        let submission = sample_submission("P-1", "SN-1", "DFW1");
        assert!(rules().validate(&submission).is_ok());
    }

    #[test]
    fn test_service_call_and_comments_optional() {
        let mut submission = sample_submission("P-1", "SN-1", "DFW1");
        submission.service_call_id = None;
        submission.comments = None;
        assert!(rules().validate(&submission).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let mut submission = sample_submission("P-1", "SN-1", "DFW1");
        submission.part_number = "   ".to_string();

        let err = rules().validate(&submission).unwrap_err();
        assert!(err.is_validation_error());
        assert!(err.to_string().contains("partNumber"));
    }

    #[test]
    fn test_missing_removal_date() {
        let mut submission = sample_submission("P-1", "SN-1", "DFW1");
        submission.removal_date = None;

        let err = rules().validate(&submission).unwrap_err();
        assert!(err.to_string().contains("removalDate"));
    }

    #[test]
    fn test_malformed_removal_date() {
        let mut submission = sample_submission("P-1", "SN-1", "DFW1");
        submission.removal_date = Some("03/01/2024".to_string());

        let err = rules().validate(&submission).unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_invalid_mfc_code() {
        let submission = sample_submission("P-1", "SN-1", "DFW 1!");
        let err = rules().validate(&submission).unwrap_err();
        assert!(err.to_string().contains("site code"));
    }

    #[test]
    fn test_too_many_attachments() {
        let config = IntakeConfig {
            max_attachments: 1,
            ..IntakeConfig::default()
        };
        let rules = IntakeRules::from_config(&config).unwrap();

        let mut submission = sample_submission("P-1", "SN-1", "DFW1");
        submission.attached_files = vec!["a.jpg".to_string(), "b.jpg".to_string()];

        let err = rules.validate(&submission).unwrap_err();
        assert!(err.to_string().contains("attachedFiles"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config = IntakeConfig {
            mfc_pattern: "[unclosed".to_string(),
            ..IntakeConfig::default()
        };
        assert!(IntakeRules::from_config(&config).is_err());
    }
}

use std::ops::RangeInclusive;

use super::account::{AccountPatch, SignupRequest};
use super::error::{
    DirectoryError, CAUSE_LENGTH, CAUSE_PATTERN, CAUSE_SIGNUP_REQUIRED, CAUSE_UPDATE_LIMIT,
    CAUSE_UPDATE_REQUIRED,
};

/// Field constraints for account records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRules {
    pub user_id_len: RangeInclusive<usize>,
    pub password_len: RangeInclusive<usize>,
    pub max_nickname_len: usize,
    pub max_comment_len: usize,
}

impl Default for AccountRules {
    fn default() -> Self {
        Self {
            user_id_len: 6..=20,
            password_len: 8..=20,
            max_nickname_len: 30,
            max_comment_len: 100,
        }
    }
}

/// Signup input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct AccountValidator {
    rules: AccountRules,
}

impl AccountValidator {
    pub fn new(rules: AccountRules) -> Self {
        Self { rules }
    }

    pub fn validate_signup(&self, req: SignupRequest) -> Result<NewAccount, DirectoryError> {
        let (Some(user_id), Some(password)) = (req.user_id, req.password) else {
            return Err(DirectoryError::signup(CAUSE_SIGNUP_REQUIRED));
        };

        // Length is checked first so an over-long id with bad characters reports length.
        if !self.rules.user_id_len.contains(&user_id.chars().count())
            || !self.rules.password_len.contains(&password.chars().count())
        {
            return Err(DirectoryError::signup(CAUSE_LENGTH));
        }
        if !user_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DirectoryError::signup(CAUSE_PATTERN));
        }

        Ok(NewAccount { user_id, password })
    }

    /// Length limits; checked as soon as the body is parsed, before any
    /// lookup of the target record.
    pub fn check_patch_limits(&self, patch: &AccountPatch) -> Result<(), DirectoryError> {
        if patch.nickname.char_len() > self.rules.max_nickname_len
            || patch.comment.char_len() > self.rules.max_comment_len
        {
            return Err(DirectoryError::update(CAUSE_UPDATE_LIMIT));
        }
        Ok(())
    }

    /// At least one field must change; checked once ownership is confirmed.
    pub fn check_patch_present(&self, patch: &AccountPatch) -> Result<(), DirectoryError> {
        if patch.nickname.is_keep() && patch.comment.is_keep() {
            return Err(DirectoryError::update(CAUSE_UPDATE_REQUIRED));
        }
        Ok(())
    }
}

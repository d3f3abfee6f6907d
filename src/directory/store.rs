use std::collections::HashMap;
use std::sync::Arc;

use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

use super::account::{Account, AccountPatch, AccountProfile, CreatedAccount, UpdatedProfile};
use super::error::DirectoryError;
use super::validator::{AccountValidator, NewAccount};

/// In-memory account store. Cloning shares the same map.
///
/// Every check-then-write sequence runs under a single write guard, so a
/// duplicate check and its insert (or an owner check and its mutation) are
/// atomic with respect to other requests.
#[derive(Debug, Clone, Default)]
pub struct AccountDirectory {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    validator: AccountValidator,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validator(validator: AccountValidator) -> Self {
        Self {
            accounts: Arc::default(),
            validator,
        }
    }

    pub fn validator(&self) -> &AccountValidator {
        &self.validator
    }

    pub async fn signup(&self, new: NewAccount) -> Result<CreatedAccount, DirectoryError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&new.user_id) {
            return Err(DirectoryError::DuplicateUser);
        }
        let account = Account::new(new.user_id.clone(), new.password);
        let created = account.created();
        accounts.insert(new.user_id, account);
        Ok(created)
    }

    /// Check a credential pair. Unknown user and wrong password are the same error.
    pub async fn authenticate(&self, user_id: &str, password: &str) -> Result<(), DirectoryError> {
        let accounts = self.accounts.read().await;
        let account = accounts.get(user_id).ok_or(DirectoryError::AuthFailure)?;
        if bool::from(account.password().as_bytes().ct_eq(password.as_bytes())) {
            Ok(())
        } else {
            Err(DirectoryError::AuthFailure)
        }
    }

    pub async fn get(&self, user_id: &str) -> Result<AccountProfile, DirectoryError> {
        let accounts = self.accounts.read().await;
        accounts
            .get(user_id)
            .map(Account::profile)
            .ok_or(DirectoryError::NotFound)
    }

    /// Checks run in order: length limits, existence, ownership, then that
    /// the patch changes something. The record is only mutated once all pass.
    pub async fn update(
        &self,
        caller: &str,
        user_id: &str,
        patch: &AccountPatch,
    ) -> Result<UpdatedProfile, DirectoryError> {
        self.validator.check_patch_limits(patch)?;

        let mut accounts = self.accounts.write().await;
        Self::check_owner(&accounts, caller, user_id)?;
        self.validator.check_patch_present(patch)?;

        let account = accounts.get_mut(user_id).ok_or(DirectoryError::NotFound)?;
        account.apply(patch);
        Ok(account.updated())
    }

    /// Remove the account. Returns whether a record existed.
    pub async fn close(&self, user_id: &str) -> bool {
        let mut accounts = self.accounts.write().await;
        accounts.remove(user_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }

    fn check_owner<'a>(
        accounts: &'a HashMap<String, Account>,
        caller: &str,
        user_id: &str,
    ) -> Result<&'a Account, DirectoryError> {
        let account = accounts.get(user_id).ok_or(DirectoryError::NotFound)?;
        if caller != account.user_id() {
            return Err(DirectoryError::Forbidden);
        }
        Ok(account)
    }
}

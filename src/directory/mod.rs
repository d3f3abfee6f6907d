pub mod account;
pub mod error;
pub mod store;
pub mod validator;

pub use account::{
    Account, AccountPatch, AccountProfile, CreatedAccount, FieldUpdate, SignupRequest,
    UpdatedProfile,
};
pub use error::{DirectoryError, Operation};
pub use store::AccountDirectory;
pub use validator::{AccountRules, AccountValidator, NewAccount};

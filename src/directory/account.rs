use serde::{Deserialize, Deserializer, Serialize};

/// Stored record for one user. `nickname` is never empty; `comment` is never `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    user_id: String,
    password: String,
    nickname: String,
    comment: Option<String>,
}

impl Account {
    pub fn new(user_id: String, password: String) -> Self {
        Self {
            nickname: user_id.clone(),
            user_id,
            password,
            comment: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Apply an already validated patch. Empty values collapse to the defaults.
    pub fn apply(&mut self, patch: &AccountPatch) {
        match &patch.nickname {
            FieldUpdate::Keep => {}
            FieldUpdate::Reset => self.nickname = self.user_id.clone(),
            FieldUpdate::Set(v) => self.nickname = v.clone(),
        }
        match &patch.comment {
            FieldUpdate::Keep => {}
            FieldUpdate::Reset => self.comment = None,
            FieldUpdate::Set(v) => self.comment = Some(v.clone()),
        }
    }

    pub fn created(&self) -> CreatedAccount {
        CreatedAccount {
            user_id: self.user_id.clone(),
            nickname: self.nickname.clone(),
        }
    }

    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            user_id: self.user_id.clone(),
            nickname: self.nickname.clone(),
            comment: self.comment.clone(),
        }
    }

    pub fn updated(&self) -> UpdatedProfile {
        UpdatedProfile {
            nickname: self.nickname.clone(),
            comment: self.comment.clone(),
        }
    }
}

/// Presence of one field in an update body.
///
/// Omitted and `null` both map to `Keep`; `""` maps to `Reset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate {
    #[default]
    Keep,
    Reset,
    Set(String),
}

impl FieldUpdate {
    pub fn is_keep(&self) -> bool {
        matches!(self, FieldUpdate::Keep)
    }

    /// Length in characters of the value being set, if any.
    pub fn char_len(&self) -> usize {
        match self {
            FieldUpdate::Set(v) => v.chars().count(),
            _ => 0,
        }
    }
}

impl From<Option<String>> for FieldUpdate {
    fn from(value: Option<String>) -> Self {
        match value {
            None => FieldUpdate::Keep,
            Some(s) if s.is_empty() => FieldUpdate::Reset,
            Some(s) => FieldUpdate::Set(s),
        }
    }
}

impl<'de> Deserialize<'de> for FieldUpdate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(FieldUpdate::from)
    }
}

/// Body of `PATCH /users/{user_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountPatch {
    #[serde(default)]
    pub nickname: FieldUpdate,
    #[serde(default)]
    pub comment: FieldUpdate,
}

/// Body of `POST /signup`. Fields are optional so a missing one can be
/// reported as a validation failure rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    pub user_id: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedAccount {
    pub user_id: String,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub user_id: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Update echo; `comment` is serialized as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedProfile {
    pub nickname: String,
    pub comment: Option<String>,
}

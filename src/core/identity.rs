use crate::store::LocalStore;

pub const USERNAME_KEY: &str = "username";
pub const AVATAR_KEY: &str = "profilePic";

/// The active user. Set once at onboarding, replaced only by a full logout
/// followed by re-onboarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    /// Avatar image as an opaque data URL, if one was captured.
    pub avatar: Option<String>,
}

impl Identity {
    pub fn new(username: impl Into<String>, avatar: Option<String>) -> Self {
        Self {
            username: username.into(),
            avatar,
        }
    }
}

/// Returns `None` when no username is stored or the stored value is blank;
/// a blank username means the gate stays closed.
pub fn load_identity(store: &dyn LocalStore) -> Option<Identity> {
    let username = store.get(USERNAME_KEY)?;
    if username.trim().is_empty() {
        return None;
    }
    Some(Identity {
        username,
        avatar: store.get(AVATAR_KEY),
    })
}

/// Persist both fields. The avatar key is only written when an avatar is
/// present; saving without one leaves any stored avatar untouched.
pub fn save_identity(store: &dyn LocalStore, identity: &Identity) {
    if let Err(e) = store.set(USERNAME_KEY, &identity.username) {
        log::error!("Failed to save username: {}", e);
    }
    if let Some(avatar) = &identity.avatar {
        if let Err(e) = store.set(AVATAR_KEY, avatar) {
            log::error!("Failed to save avatar: {}", e);
        }
    }
}

pub fn clear_identity(store: &dyn LocalStore) {
    store.remove(USERNAME_KEY);
    store.remove(AVATAR_KEY);
}

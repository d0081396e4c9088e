//! Populates the user selector once per page.

use std::sync::Arc;

use tracing::info;

use crate::api::{ApiError, PresenceApi};
use crate::view::{SelectOption, ViewHandles};

#[cfg(test)]
#[path = "selector_test.rs"]
mod tests;

pub struct UserSelector {
    api: Arc<dyn PresenceApi>,
    view: ViewHandles,
}

impl UserSelector {
    #[must_use]
    pub fn new(api: Arc<dyn PresenceApi>, view: ViewHandles) -> Self {
        Self { api, view }
    }

    /// Fetch users, append one option each in response order, then reveal
    /// the selector and hide the loading indicator. Returns the option count.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the selector then stays hidden and the
    /// loading indicator stays up.
    pub async fn initialize(&self) -> Result<usize, ApiError> {
        let users = self.api.users().await?;
        for user in &users {
            self.view
                .selector
                .append(SelectOption { value: user.id, label: user.display_name.clone() });
        }
        self.view.selector.show();
        self.view.loading.hide();
        info!(count = users.len(), "user selector populated");
        Ok(users.len())
    }
}

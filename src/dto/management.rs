use serde::Serialize;

use crate::domain::profile::Profile;
use crate::domain::types::Role;

/// Data required to render the staff management page.
#[derive(Debug, Serialize)]
pub struct ManagementPageData {
    /// Newest first.
    pub profiles: Vec<Profile>,
    pub roles: Vec<Role>,
}

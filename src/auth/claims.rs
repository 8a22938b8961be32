use serde::{Deserialize, Serialize};

/// Session token payload. Scoped to `app_id` by the app's signing secret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub uid: i64,      // user ID
    pub email: String, // user email
    pub app_id: i32,   // issuing application
    pub exp: i64,      // expires at (unix timestamp)
}

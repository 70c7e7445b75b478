use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Identity printed on exported results. Authentication happens elsewhere.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Display name of the candidate.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

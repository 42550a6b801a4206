use thiserror::Error;

use crate::model::work_item::FieldType;

#[derive(Debug, Error)]
pub enum NumberingError {
    #[error(
        "Field '{field}' of type '{field_type}' has predefined options and cannot accept arbitrary values. Please either:\n  \
         1. Change the field to a plain text or number field (remove its options) in ClickUp, OR\n  \
         2. Use a different custom field without predefined options (--field-name)"
    )]
    ConstrainedField { field: String, field_type: FieldType },

    #[error("ClickUp API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error(
        "No ClickUp API token. Pass --api-token, set CLICKUP_API_KEY, or add api_token under [clickup] in the config file"
    )]
    MissingToken,
}

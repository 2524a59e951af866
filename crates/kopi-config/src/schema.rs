use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::KopiConfig;

/// JSON schema for `kopi.toml`, for editor integration and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(KopiConfig)
}

use serde::Deserialize;

/// Body of a successful client-credentials exchange. Only the access token
/// is used; it is never logged, so this type has no `Debug` impl.
#[derive(Deserialize, Default)]
pub struct OnepassToken {
    #[serde(default)]
    pub access_token: Option<String>,
}

use serde::{Deserialize, Serialize};

/// Claims of a bearer token issued by the hosted auth provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
}

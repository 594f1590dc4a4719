use serde::{Deserialize, Serialize};

/// Configuration for the recipes module (`modules.recipes`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipesConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    #[serde(default = "default_min_cooking_time")]
    pub min_cooking_time: i32,
    #[serde(default = "default_max_cooking_time")]
    pub max_cooking_time: i32,
    #[serde(default = "default_min_amount")]
    pub min_amount: i32,
    #[serde(default = "default_max_amount")]
    pub max_amount: i32,
    /// Absolute URL prefix used for short links and page envelopes.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Upload directory; relative paths are resolved against `server.home_dir`.
    #[serde(default = "default_media_dir")]
    pub media_dir: String,
    /// URL prefix under which `media_dir` is served.
    #[serde(default = "default_media_url")]
    pub media_url: String,
    /// Header carrying the caller's numeric user id, set by the auth proxy.
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_name_length: default_max_name_length(),
            min_cooking_time: default_min_cooking_time(),
            max_cooking_time: default_max_cooking_time(),
            min_amount: default_min_amount(),
            max_amount: default_max_amount(),
            public_base_url: default_public_base_url(),
            media_dir: default_media_dir(),
            media_url: default_media_url(),
            identity_header: default_identity_header(),
        }
    }
}

fn default_page_size() -> u64 {
    6
}

fn default_max_page_size() -> u64 {
    100
}

fn default_max_name_length() -> usize {
    256
}

fn default_min_cooking_time() -> i32 {
    1
}

fn default_max_cooking_time() -> i32 {
    32_000
}

fn default_min_amount() -> i32 {
    1
}

fn default_max_amount() -> i32 {
    32_000
}

fn default_public_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_media_dir() -> String {
    "media".to_string()
}

fn default_media_url() -> String {
    "/media".to_string()
}

fn default_identity_header() -> String {
    "x-user-id".to_string()
}

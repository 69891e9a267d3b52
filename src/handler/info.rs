//! Update metadata schema — the positive-result contract of every handler.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Update metadata for one package, as served by a remote update endpoint.
///
/// Optional sections are omitted from serialized output when absent so the
/// host sees the same shape the endpoint produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateInfo {
    pub id: String,
    pub slug: String,
    pub version: String,
    pub url: String,
    pub package: String,
    pub homepage: String,
    pub download_link: String,
    /// Highest host version the package was tested against.
    pub tested: String,
    pub requires_php: String,
    pub auto_update: bool,
    pub last_updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<Icons>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banners: Option<Banners>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banners_rtl: Option<Banners>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Sections>,
    /// Contributor name → profile details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributors: Option<HashMap<String, Contributor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations: Option<Vec<Translation>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icons {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    #[serde(rename = "1x", default, skip_serializing_if = "Option::is_none")]
    pub one_x: Option<String>,
    #[serde(rename = "2x", default, skip_serializing_if = "Option::is_none")]
    pub two_x: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banners {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sections {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshots: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// One translation pack offer. All fields are strings on the wire,
/// `autoupdate` included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub language: String,
    pub version: String,
    pub package: String,
    pub updated: String,
    pub autoupdate: String,
}

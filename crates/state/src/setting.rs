use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Recognized setting names stored in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    /// API token used to authenticate against the tracker.
    Token,
    /// Identifier of the project commands operate on by default.
    CurrentProject,
    /// Base URL of the tracker API.
    ApiUrl,
}

impl Setting {
    pub const ALL: [Setting; 3] = [Setting::Token, Setting::CurrentProject, Setting::ApiUrl];

    /// Key under which this setting is stored in the JSON file.
    pub fn as_str(self) -> &'static str {
        match self {
            Setting::Token => "token",
            Setting::CurrentProject => "current_project",
            Setting::ApiUrl => "api_url",
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown setting '{0}' (expected one of: token, current_project, api_url)")]
pub struct UnknownSetting(pub String);

impl FromStr for Setting {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Setting::ALL
            .into_iter()
            .find(|setting| setting.as_str() == s)
            .ok_or_else(|| UnknownSetting(s.to_string()))
    }
}

//! Static lookup tables: dataset identifiers, channel convention and reporting folds.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::foundation::{
    error::{CorruptError, CorruptResult},
    image::ChannelLayout,
};

/// One of the twelve supported medical imaging datasets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Dataset {
    PathMnist,
    BloodMnist,
    DermaMnist,
    RetinaMnist,
    TissueMnist,
    OctMnist,
    BreastMnist,
    ChestMnist,
    PneumoniaMnist,
    OrganAMnist,
    OrganCMnist,
    OrganSMnist,
}

impl Dataset {
    /// Every dataset, in canonical order.
    pub const ALL: [Dataset; 12] = [
        Self::PathMnist,
        Self::BloodMnist,
        Self::DermaMnist,
        Self::RetinaMnist,
        Self::TissueMnist,
        Self::OctMnist,
        Self::BreastMnist,
        Self::ChestMnist,
        Self::PneumoniaMnist,
        Self::OrganAMnist,
        Self::OrganCMnist,
        Self::OrganSMnist,
    ];

    /// Lowercase identifier used as the registry key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PathMnist => "pathmnist",
            Self::BloodMnist => "bloodmnist",
            Self::DermaMnist => "dermamnist",
            Self::RetinaMnist => "retinamnist",
            Self::TissueMnist => "tissuemnist",
            Self::OctMnist => "octmnist",
            Self::BreastMnist => "breastmnist",
            Self::ChestMnist => "chestmnist",
            Self::PneumoniaMnist => "pneumoniamnist",
            Self::OrganAMnist => "organamnist",
            Self::OrganCMnist => "organcmnist",
            Self::OrganSMnist => "organsmnist",
        }
    }

    /// Channel layout corrupted images are stored in.
    pub fn channel_layout(self) -> ChannelLayout {
        match self {
            Self::BloodMnist | Self::DermaMnist | Self::PathMnist | Self::RetinaMnist => {
                ChannelLayout::Rgb
            }
            _ => ChannelLayout::Gray,
        }
    }

    /// Whether the dataset is stored as RGB.
    pub fn is_rgb(self) -> bool {
        self.channel_layout() == ChannelLayout::Rgb
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = CorruptError;

    fn from_str(s: &str) -> CorruptResult<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| CorruptError::not_found(format!("unknown dataset '{s}'")))
    }
}

/// Reporting category of a corruption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum Fold {
    Digital,
    Noise,
    Blur,
    Color,
    TaskSpecific,
}

impl Fold {
    /// Every fold, in reporting order.
    pub const ALL: [Fold; 5] = [
        Self::Digital,
        Self::Noise,
        Self::Blur,
        Self::Color,
        Self::TaskSpecific,
    ];

    /// Identifier used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Digital => "digital",
            Self::Noise => "noise",
            Self::Blur => "blur",
            Self::Color => "color",
            Self::TaskSpecific => "task-specific",
        }
    }

    /// Corruption names reported under this fold.
    pub fn members(self) -> &'static [&'static str] {
        match self {
            Self::Digital => &["pixelate", "jpeg_compression"],
            Self::Noise => &[
                "gaussian_noise",
                "speckle_noise",
                "impulse_noise",
                "shot_noise",
            ],
            Self::Blur => &["defocus_blur", "motion_blur", "zoom_blur", "gaussian_blur"],
            Self::Color => &[
                "brightness_up",
                "brightness_down",
                "contrast_up",
                "contrast_down",
                "saturate",
            ],
            Self::TaskSpecific => &[
                "stain_deposit",
                "bubble",
                "black_corner",
                "characters",
                "gamma_corr_up",
                "gamma_corr_down",
            ],
        }
    }

    /// Fold a corruption name is reported under.
    pub fn of(name: &str) -> Option<Fold> {
        Self::ALL.into_iter().find(|f| f.members().contains(&name))
    }
}

impl fmt::Display for Fold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/tables.rs"]
mod tests;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! districts {
    ($($variant:ident => $name:literal, $ascii:literal;)+) => {
        /// Administrative districts of Ho Chi Minh City offered by the estimate form.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum District {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl District {
            /// Selectable districts in display order.
            pub const ALL: &'static [District] = &[$(District::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $(District::$variant => $name,)+
                }
            }

            /// Unaccented spelling, as typed on keyboards without a Vietnamese layout.
            pub fn ascii_name(self) -> &'static str {
                match self {
                    $(District::$variant => $ascii,)+
                }
            }
        }
    };
}

districts! {
    Quan1 => "Quận 1", "Quan 1";
    Quan2 => "Quận 2", "Quan 2";
    Quan3 => "Quận 3", "Quan 3";
    Quan4 => "Quận 4", "Quan 4";
    Quan5 => "Quận 5", "Quan 5";
    Quan6 => "Quận 6", "Quan 6";
    Quan7 => "Quận 7", "Quan 7";
    Quan8 => "Quận 8", "Quan 8";
    Quan9 => "Quận 9", "Quan 9";
    Quan10 => "Quận 10", "Quan 10";
    Quan11 => "Quận 11", "Quan 11";
    Quan12 => "Quận 12", "Quan 12";
    BinhThanh => "Quận Bình Thạnh", "Quan Binh Thanh";
    GoVap => "Quận Gò Vấp", "Quan Go Vap";
    PhuNhuan => "Quận Phú Nhuận", "Quan Phu Nhuan";
    TanBinh => "Quận Tân Bình", "Quan Tan Binh";
    TanPhu => "Quận Tân Phú", "Quan Tan Phu";
    BinhChanh => "Huyện Bình Chánh", "Huyen Binh Chanh";
    HocMon => "Huyện Hóc Môn", "Huyen Hoc Mon";
    NhaBe => "Huyện Nhà Bè", "Huyen Nha Be";
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown district: {0}")]
pub struct UnknownDistrict(pub String);

impl FromStr for District {
    type Err = UnknownDistrict;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        if let Some(exact) = District::ALL.iter().find(|d| d.name() == wanted) {
            return Ok(*exact);
        }

        let lower = wanted.to_lowercase();
        District::ALL
            .iter()
            .find(|d| d.name().to_lowercase() == lower || d.ascii_name().to_lowercase() == lower)
            .copied()
            .ok_or_else(|| UnknownDistrict(raw.to_string()))
    }
}

/// Body of a simple price prediction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub bedrooms: u32,
    pub district: District,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub estimated_price_per_m2: f64,
}

/// Phase of the most recent submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Loading,
    Success(PredictionResult),
    Failure(String),
}

impl LifecycleState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LifecycleState::Loading)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            LifecycleState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LifecycleState::Failure(message) => Some(message),
            _ => None,
        }
    }
}

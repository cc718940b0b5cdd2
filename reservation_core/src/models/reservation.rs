//! Reservation models shared by the form, the submission service and the store

use crate::validation::{Validatable, ValidationResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Order in which field errors are reported back to the visitor.
pub const FIELD_ORDER: &[&str] = &[
    "name",
    "phone",
    "photo_types",
    "shooting_month",
    "privacy_consent",
    "referral_sources",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoType {
    Family,
    LargeFamily,
    Remind,
    Longevity,
}

impl PhotoType {
    pub const ALL: [PhotoType; 4] = [
        PhotoType::Family,
        PhotoType::LargeFamily,
        PhotoType::Remind,
        PhotoType::Longevity,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PhotoType::Family => "family",
            PhotoType::LargeFamily => "largefamily",
            PhotoType::Remind => "remind",
            PhotoType::Longevity => "longevity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PhotoType::Family => "가족사진 (5인 이하)",
            PhotoType::LargeFamily => "대가족사진 (6인 이상)",
            PhotoType::Remind => "리마인드웨딩",
            PhotoType::Longevity => "장수사진",
        }
    }
}

impl fmt::Display for PhotoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PhotoType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhotoType::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| format!("unknown photo type '{}'", s))
    }
}

/// Catalog entry as rendered next to a checkbox.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoTypeOption {
    pub id: PhotoType,
    pub label: &'static str,
}

pub fn photo_type_catalog() -> Vec<PhotoTypeOption> {
    PhotoType::ALL
        .into_iter()
        .map(|t| PhotoTypeOption {
            id: t,
            label: t.label(),
        })
        .collect()
}

/// A calendar year-month, written `YYYY-MM` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShootingMonth {
    year: i32,
    month: u32,
}

impl ShootingMonth {
    pub const MIN: ShootingMonth = ShootingMonth { year: 1, month: 1 };

    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return None;
        }
        Some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn label(&self) -> String {
        format!("{}년 {}월", self.year, self.month)
    }
}

impl fmt::Display for ShootingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for ShootingMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid shooting month '{}', expected YYYY-MM", s);

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        ShootingMonth::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for ShootingMonth {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShootingMonth> for String {
    fn from(month: ShootingMonth) -> Self {
        month.to_string()
    }
}

/// Everything the visitor entered, as handed to the submission service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReservationRequest {
    #[validate(length(min = 1, max = 100, message = "성함을 입력해주세요. (100자 이내)"))]
    pub name: String,

    #[validate(length(min = 1, max = 30, message = "연락처를 입력해주세요. (30자 이내)"))]
    pub phone: String,

    #[validate(length(min = 1, message = "촬영 종류를 하나 이상 선택해주세요."))]
    pub photo_types: Vec<PhotoType>,

    pub shooting_month: ShootingMonth,

    pub privacy_consent: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(length(max = 10, message = "유입 경로는 10개까지 입력할 수 있습니다."))]
    pub referral_sources: Vec<String>,
}

impl ReservationRequest {
    /// Derive checks plus the rules the derive cannot express.
    pub fn check(&self) -> ValidationResult {
        let mut result = self.validate_comprehensive();

        if !self.name.is_empty() && self.name.trim().is_empty() {
            result.add_error("name", "성함을 입력해주세요. (100자 이내)");
        }
        if !self.phone.is_empty() && self.phone.trim().is_empty() {
            result.add_error("phone", "연락처를 입력해주세요. (30자 이내)");
        }
        if !self.privacy_consent {
            result.add_error("privacy_consent", "개인정보 수집 및 이용에 동의해주세요.");
        }

        result
    }

    /// Photo types with duplicates removed, first occurrence wins.
    pub fn distinct_photo_types(&self) -> Vec<PhotoType> {
        let mut seen = Vec::with_capacity(self.photo_types.len());
        for t in &self.photo_types {
            if !seen.contains(t) {
                seen.push(*t);
            }
        }
        seen
    }
}

/// Column layout of the reservations table.
///
/// Two layouts exist in deployed databases. `StudioReservation` mirrors the
/// request fields one to one and is the default. `Reservations` is the older
/// table where photo types land in `shooting_type` and the month in `date`;
/// it has no consent column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreSchema {
    StudioReservation,
    Reservations,
}

impl StoreSchema {
    pub fn default_table(&self) -> &'static str {
        match self {
            StoreSchema::StudioReservation => "studio_reservation",
            StoreSchema::Reservations => "reservations",
        }
    }

    pub fn to_row(&self, request: &ReservationRequest) -> ReservationRow {
        let name = request.name.trim().to_string();
        let phone = request.phone.trim().to_string();
        let photo_types = request.distinct_photo_types();

        match self {
            StoreSchema::StudioReservation => ReservationRow::StudioReservation(StudioReservationRow {
                name,
                phone,
                photo_types,
                shooting_month: request.shooting_month,
                privacy_consent: request.privacy_consent,
                referral_sources: request.referral_sources.clone(),
            }),
            StoreSchema::Reservations => ReservationRow::Reservations(LegacyReservationRow {
                name,
                phone,
                shooting_type: photo_types,
                date: request.shooting_month,
                referral_sources: request.referral_sources.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudioReservationRow {
    pub name: String,
    pub phone: String,
    pub photo_types: Vec<PhotoType>,
    pub shooting_month: ShootingMonth,
    pub privacy_consent: bool,
    pub referral_sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyReservationRow {
    pub name: String,
    pub phone: String,
    pub shooting_type: Vec<PhotoType>,
    pub date: ShootingMonth,
    pub referral_sources: Vec<String>,
}

/// One row as written to the store, without storage-assigned `id`/`created_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReservationRow {
    StudioReservation(StudioReservationRow),
    Reservations(LegacyReservationRow),
}

/// Outcome of one submission, serialized as `{success, data}` or `{success, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SubmissionEnvelope", from = "SubmissionEnvelope")]
pub enum SubmissionResult {
    Success { data: Vec<serde_json::Value> },
    Failure { error: String },
}

impl SubmissionResult {
    pub fn success(data: Vec<serde_json::Value>) -> Self {
        SubmissionResult::Success { data }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        SubmissionResult::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmissionResult::Success { .. } => None,
            SubmissionResult::Failure { error } => Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SubmissionEnvelope {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<SubmissionResult> for SubmissionEnvelope {
    fn from(result: SubmissionResult) -> Self {
        match result {
            SubmissionResult::Success { data } => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            SubmissionResult::Failure { error } => Self {
                success: false,
                data: None,
                error: Some(error),
            },
        }
    }
}

impl From<SubmissionEnvelope> for SubmissionResult {
    fn from(envelope: SubmissionEnvelope) -> Self {
        if envelope.success {
            SubmissionResult::Success {
                data: envelope.data.unwrap_or_default(),
            }
        } else {
            SubmissionResult::Failure {
                error: envelope.error.unwrap_or_default(),
            }
        }
    }
}

// src/model/mod.rs
//! Dataset model: the complete exportable state of the local store
//!
//! Records mirror the JSON shape of a backup (camelCase field names).
//! Optional fields stay `Option` so an absent field round-trips as absent,
//! and unknown fields land in `extra` and are written back verbatim.

use std::num::NonZeroU32;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::DEFAULT_SPREAD;
use crate::enums::{AbcdeFlag, ConditionType, Gender};

mod validate;

pub use validate::validate;

/// Every mole and every check-up entry, in store order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub moles: Vec<Mole>,
    pub entries: Vec<MoleEntry>,
}

impl Dataset {
    pub fn new(moles: Vec<Mole>, entries: Vec<MoleEntry>) -> Self {
        Self { moles, entries }
    }

    pub fn is_empty(&self) -> bool {
        self.moles.is_empty() && self.entries.is_empty()
    }

    pub fn mole(&self, id: i64) -> Option<&Mole> {
        self.moles.iter().find(|m| m.id == id)
    }

    pub fn entries_for(&self, mole_id: i64) -> impl Iterator<Item = &MoleEntry> {
        self.entries.iter().filter(move |e| e.mole_id == mole_id)
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            moles: self.moles.len(),
            entries: self.entries.len(),
            photos: self.entries.iter().filter(|e| e.photo.is_some()).count(),
        }
    }
}

/// Record counts, safe to log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatasetSummary {
    pub moles: usize,
    pub entries: usize,
    pub photos: usize,
}

impl std::fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} mole(s), {} entr{} ({} with photo)",
            self.moles,
            self.entries,
            if self.entries == 1 { "y" } else { "ies" },
            self.photos
        )
    }
}

/// A tracked skin feature placed on the body model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mole {
    pub id: i64,
    pub label: String,
    pub gender: Gender,
    pub position: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<[f64; 3]>,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<LesionCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Mole {
    pub fn new(
        id: i64,
        label: impl Into<String>,
        gender: Gender,
        position: [f64; 3],
        created_at: i64,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            gender,
            position,
            normal: None,
            created_at,
            starred: None,
            condition: None,
            count: None,
            spread: None,
            extra: Map::new(),
        }
    }

    pub fn is_starred(&self) -> bool {
        self.starred.unwrap_or(false)
    }

    pub fn condition_type(&self) -> ConditionType {
        self.condition.unwrap_or_default()
    }

    pub fn spread_or_default(&self) -> f64 {
        self.spread.unwrap_or(DEFAULT_SPREAD)
    }

    /// The stored normal scaled to unit length. Imported normals are not
    /// checked for length, so consumers go through here.
    pub fn unit_normal(&self) -> Option<[f64; 3]> {
        let [x, y, z] = self.normal?;
        let len = (x * x + y * y + z * z).sqrt();
        if !len.is_finite() || len <= f64::EPSILON {
            return None;
        }
        Some([x / len, y / len, z / len])
    }
}

/// Number of lesions a marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCount", into = "RawCount")]
pub enum LesionCount {
    Exact(NonZeroU32),
    Several,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(u64),
    Text(String),
}

const SEVERAL: &str = "several";

impl TryFrom<RawCount> for LesionCount {
    type Error = String;

    fn try_from(raw: RawCount) -> Result<Self, Self::Error> {
        match raw {
            RawCount::Number(n) => u32::try_from(n)
                .ok()
                .and_then(NonZeroU32::new)
                .map(LesionCount::Exact)
                .ok_or_else(|| format!("count must be a positive integer, got {n}")),
            RawCount::Text(s) if s == SEVERAL => Ok(LesionCount::Several),
            RawCount::Text(s) => Err(format!("count must be a number or \"{SEVERAL}\", got {s:?}")),
        }
    }
}

impl From<LesionCount> for RawCount {
    fn from(count: LesionCount) -> Self {
        match count {
            LesionCount::Exact(n) => RawCount::Number(u64::from(n.get())),
            LesionCount::Several => RawCount::Text(SEVERAL.to_owned()),
        }
    }
}

/// One dated check-up of a mole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoleEntry {
    pub id: i64,
    pub mole_id: i64,
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abcde: Option<Vec<AbcdeFlag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flare_up: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_reference: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MoleEntry {
    pub fn new(id: i64, mole_id: i64, date: i64, size: f64, notes: impl Into<String>) -> Self {
        Self {
            id,
            mole_id,
            date,
            photo: None,
            size,
            texture: None,
            notes: notes.into(),
            abcde: None,
            severity: None,
            symptoms: None,
            flare_up: None,
            reference_object: None,
            scale_reference: None,
            extra: Map::new(),
        }
    }

    pub fn has_flag(&self, flag: AbcdeFlag) -> bool {
        self.abcde.as_ref().is_some_and(|flags| flags.contains(&flag))
    }
}

/// Self-contained image as a data URL: `data:<mime>;base64,<payload>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Photo(String);

impl Photo {
    pub fn from_data_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{mime_type};base64,{}", STANDARD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(mime, base64 payload)`, or `None` if this is not a
    /// base64 data URL.
    pub fn parts(&self) -> Option<(&str, &str)> {
        self.0.strip_prefix("data:")?.split_once(";base64,")
    }

    pub fn is_blob_url(&self) -> bool {
        self.0.starts_with("blob:")
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.parts().map(|(mime, _)| mime)
    }

    pub fn decode(&self) -> Result<Vec<u8>, PhotoError> {
        let (_, payload) = self.parts().ok_or(PhotoError::NotDataUrl)?;
        Ok(STANDARD.decode(payload)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("not a base64 data URL")]
    NotDataUrl,
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_from_bytes_decodes_back() {
        let photo = Photo::from_bytes("image/png", &[0x89, b'P', b'N', b'G']);
        assert!(photo.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(photo.mime_type(), Some("image/png"));
        assert_eq!(photo.decode().unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn blob_url_is_not_a_data_url() {
        let photo = Photo::from_data_url("blob:http://localhost/1234");
        assert!(photo.parts().is_none());
        assert!(photo.is_blob_url());
        assert!(matches!(photo.decode(), Err(PhotoError::NotDataUrl)));
    }

    #[test]
    fn lesion_count_wire_format() {
        let several: LesionCount = serde_json::from_str("\"several\"").unwrap();
        assert_eq!(several, LesionCount::Several);
        let three: LesionCount = serde_json::from_str("3").unwrap();
        assert_eq!(three, LesionCount::Exact(NonZeroU32::new(3).unwrap()));
        assert_eq!(serde_json::to_string(&three).unwrap(), "3");
        assert!(serde_json::from_str::<LesionCount>("0").is_err());
        assert!(serde_json::from_str::<LesionCount>("\"many\"").is_err());
    }

    #[test]
    fn unit_normal_renormalizes() {
        let mut mole = Mole::new(1, "Back", Gender::Male, [0.0, 0.0, 0.0], 0);
        assert_eq!(mole.unit_normal(), None);
        mole.normal = Some([0.0, 3.0, 4.0]);
        let [x, y, z] = mole.unit_normal().unwrap();
        assert!((x - 0.0).abs() < 1e-12);
        assert!((y - 0.6).abs() < 1e-12);
        assert!((z - 0.8).abs() < 1e-12);
        mole.normal = Some([0.0, 0.0, 0.0]);
        assert_eq!(mole.unit_normal(), None);
    }

    #[test]
    fn unknown_fields_are_kept() {
        let json = r##"{"id":7,"label":"Neck","gender":"female","position":[0,1,2],
            "createdAt":5,"colorHint":"#ff0000"}"##;
        let mole: Mole = serde_json::from_str(json).unwrap();
        assert_eq!(mole.extra.get("colorHint"), Some(&Value::from("#ff0000")));
        assert_eq!(mole.condition_type(), ConditionType::Mole);
        assert_eq!(mole.spread_or_default(), DEFAULT_SPREAD);

        let back = serde_json::to_value(&mole).unwrap();
        assert_eq!(back["colorHint"], "#ff0000");
        assert!(back.get("normal").is_none());
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Gravity Forms 的一筆原始回覆，鍵為欄位 id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        let data = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), serde_json::Value::String(v.into())))
            .collect();
        Self { data }
    }

    /// 取欄位文字；空字串與缺值一律視為 None
    pub fn text(&self, field: &str) -> Option<String> {
        let value = self.data.get(field)?;
        let text = match value {
            serde_json::Value::Null => return None,
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &serde_json::Value> {
        self.data.values()
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub processed_records: Vec<Record>,
    pub csv_output: String,
}

/// TRL band a project falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "TRL 1-3")]
    Initial,
    #[serde(rename = "TRL 4-7")]
    Development,
    #[serde(rename = "TRL 8-9")]
    Ready,
    #[serde(rename = "Desconocido")]
    Unknown,
}

impl Segment {
    /// Bands that carry a score.
    pub const SCORED: [Segment; 3] = [Segment::Initial, Segment::Development, Segment::Ready];

    pub fn from_level(level: f64) -> Self {
        if (1.0..=3.0).contains(&level) {
            Segment::Initial
        } else if (4.0..=7.0).contains(&level) {
            Segment::Development
        } else if (8.0..=9.0).contains(&level) {
            Segment::Ready
        } else {
            Segment::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Segment::Initial => "TRL 1-3",
            Segment::Development => "TRL 4-7",
            Segment::Ready => "TRL 8-9",
            Segment::Unknown => "Desconocido",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "TRL 1-3" => Some(Segment::Initial),
            "TRL 4-7" => Some(Segment::Development),
            "TRL 8-9" => Some(Segment::Ready),
            "Desconocido" => Some(Segment::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approval {
    #[serde(rename = "Sí")]
    Approved,
    #[serde(rename = "No")]
    Rejected,
}

impl Approval {
    pub fn is_approved(&self) -> bool {
        matches!(self, Approval::Approved)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Approval::Approved => "Sí",
            Approval::Rejected => "No",
        }
    }
}

impl From<bool> for Approval {
    fn from(approved: bool) -> Self {
        if approved {
            Approval::Approved
        } else {
            Approval::Rejected
        }
    }
}

/// Score per scored band, bonus included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentScores {
    pub initial: f64,
    pub development: f64,
    pub ready: f64,
}

impl SegmentScores {
    pub fn get(&self, segment: Segment) -> f64 {
        match segment {
            Segment::Initial => self.initial,
            Segment::Development => self.development,
            Segment::Ready => self.ready,
            Segment::Unknown => 0.0,
        }
    }

    pub fn add(&mut self, segment: Segment, points: f64) {
        match segment {
            Segment::Initial => self.initial += points,
            Segment::Development => self.development += points,
            Segment::Ready => self.ready += points,
            Segment::Unknown => {}
        }
    }

    pub fn total(&self) -> f64 {
        self.initial + self.development + self.ready
    }
}

/// 評分完成的專案，以儀表板使用的欄位名稱序列化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "Nombre del Proyecto")]
    pub name: String,
    #[serde(rename = "Aprobado")]
    pub approval: Approval,
    #[serde(rename = "Nivel TRL")]
    pub trl_level: f64,
    #[serde(rename = "Segmento TRL")]
    pub segment: Segment,
    #[serde(rename = "Docente Acompañante")]
    pub has_mentor: bool,
    #[serde(rename = "Nivel de Inglés")]
    pub english_level: String,
    #[serde(rename = "Ubicación")]
    pub location: Option<String>,
    #[serde(rename = "Industria")]
    pub industry: Option<String>,
    #[serde(rename = "Puntaje TRL 1-3")]
    pub score_initial: f64,
    #[serde(rename = "Puntaje TRL 4-7")]
    pub score_development: f64,
    #[serde(rename = "Puntaje TRL 8-9")]
    pub score_ready: f64,
    #[serde(rename = "Puntaje Total")]
    pub total_score: f64,
    #[serde(rename = "Insights")]
    pub insights: Vec<String>,
}

impl Project {
    pub fn scores(&self) -> SegmentScores {
        SegmentScores {
            initial: self.score_initial,
            development: self.score_development,
            ready: self.score_ready,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approval.is_approved()
    }
}

/// Row shape returned by the project listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    #[serde(rename = "Nombre del Proyecto")]
    pub name: String,
    #[serde(rename = "Aprobado")]
    pub approval: Approval,
    #[serde(rename = "Puntaje TRL 1-3")]
    pub score_initial: f64,
    #[serde(rename = "Puntaje TRL 4-7")]
    pub score_development: f64,
    #[serde(rename = "Puntaje TRL 8-9")]
    pub score_ready: f64,
    #[serde(rename = "Puntaje Total")]
    pub total_score: f64,
    #[serde(rename = "Segmento TRL")]
    pub segment: Segment,
    #[serde(rename = "Industria")]
    pub industry: Option<String>,
    #[serde(rename = "Insights", default)]
    pub insights: Vec<String>,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            approval: project.approval,
            score_initial: project.score_initial,
            score_development: project.score_development,
            score_ready: project.score_ready,
            total_score: project.total_score,
            segment: project.segment,
            industry: project.industry.clone(),
            insights: project.insights.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_bands() {
        assert_eq!(Segment::from_level(1.0), Segment::Initial);
        assert_eq!(Segment::from_level(3.0), Segment::Initial);
        assert_eq!(Segment::from_level(4.0), Segment::Development);
        assert_eq!(Segment::from_level(7.0), Segment::Development);
        assert_eq!(Segment::from_level(9.0), Segment::Ready);
        assert_eq!(Segment::from_level(0.0), Segment::Unknown);
        assert_eq!(Segment::from_level(3.5), Segment::Unknown);
        assert_eq!(Segment::from_level(10.0), Segment::Unknown);
    }

    #[test]
    fn test_record_text_treats_blank_as_missing() {
        let mut record = Record::from_pairs([("1", "Robot"), ("3", "")]);
        record.data.insert("14".to_string(), serde_json::json!(5));
        record.data.insert("17".to_string(), serde_json::Value::Null);

        assert_eq!(record.text("1").as_deref(), Some("Robot"));
        assert_eq!(record.text("14").as_deref(), Some("5"));
        assert_eq!(record.text("3"), None);
        assert_eq!(record.text("17"), None);
        assert_eq!(record.text("30"), None);
    }

    #[test]
    fn test_approval_serializes_as_spanish_labels() {
        assert_eq!(serde_json::to_string(&Approval::Approved).unwrap(), "\"Sí\"");
        assert_eq!(serde_json::to_string(&Approval::Rejected).unwrap(), "\"No\"");
        assert_eq!(serde_json::to_string(&Segment::Ready).unwrap(), "\"TRL 8-9\"");
    }
}

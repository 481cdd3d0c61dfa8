use crate::core::dictionary::ScoringDictionary;
use crate::core::insights;
use crate::domain::model::{Approval, Project, Record, Segment, SegmentScores};

/// Gravity Forms field ids used by the evaluation.
pub mod fields {
    pub const PROJECT_NAME: &str = "1";
    pub const INDUSTRY: &str = "3";
    pub const TRL_LEVEL: &str = "14";
    pub const MENTOR: &str = "15";
    pub const ENGLISH_LEVEL: &str = "17";
    pub const LOCATION: &str = "30";
}

pub const APPROVAL_THRESHOLD: f64 = 50.0;
pub const UNSPECIFIED_ENGLISH: &str = "No especificado";

const INTERMEDIATE_ENGLISH_BONUS: f64 = 2.0;
const ADVANCED_ENGLISH_BONUS: f64 = 4.0;
const MENTOR_BONUS: f64 = 10.0;

/// First character upper case, the rest lower case.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// 非數字或缺值一律當作 0
pub fn parse_trl_level(raw: Option<&str>) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Raw dictionary points per band, before bonuses.
pub fn dictionary_scores(record: &Record, dictionary: &ScoringDictionary) -> SegmentScores {
    let mut scores = SegmentScores::default();
    for (_question, answers) in dictionary.questions() {
        for value in record.values() {
            let Some(answer) = value.as_str() else {
                continue;
            };
            if let Some(score) = answers.get(answer) {
                scores.add(score.segment, score.points);
            }
        }
    }
    scores
}

pub fn bonus_points(english: Option<&str>, mentor: Option<&str>) -> f64 {
    let mut bonus = 0.0;

    let english = english.unwrap_or_default().trim().to_lowercase();
    if english.contains("intermedio") {
        bonus += INTERMEDIATE_ENGLISH_BONUS;
    } else if english.contains("avanzado") {
        bonus += ADVANCED_ENGLISH_BONUS;
    }

    if mentor.unwrap_or_default().trim().to_lowercase() == "si" {
        bonus += MENTOR_BONUS;
    }

    bonus
}

pub fn is_approved(scores: &SegmentScores) -> bool {
    Segment::SCORED
        .iter()
        .any(|segment| scores.get(*segment) >= APPROVAL_THRESHOLD)
}

pub fn evaluate(record: &Record, dictionary: &ScoringDictionary) -> Project {
    let trl_level = parse_trl_level(record.text(fields::TRL_LEVEL).as_deref());
    let english_raw = record.text(fields::ENGLISH_LEVEL);
    let mentor_raw = record.text(fields::MENTOR);

    let bonus = bonus_points(english_raw.as_deref(), mentor_raw.as_deref());
    let mut scores = dictionary_scores(record, dictionary);
    for segment in Segment::SCORED {
        scores.add(segment, bonus);
    }

    let english_level = english_raw
        .map(|e| capitalize(e.trim()))
        .unwrap_or_else(|| UNSPECIFIED_ENGLISH.to_string());
    let has_mentor = mentor_raw
        .map(|m| m.trim().to_uppercase() == "SI")
        .unwrap_or(false);

    let mut project = Project {
        name: record.text(fields::PROJECT_NAME).unwrap_or_default(),
        approval: Approval::from(is_approved(&scores)),
        trl_level,
        segment: Segment::from_level(trl_level),
        has_mentor,
        english_level,
        location: record.text(fields::LOCATION),
        industry: record.text(fields::INDUSTRY),
        score_initial: scores.initial,
        score_development: scores.development,
        score_ready: scores.ready,
        total_score: scores.total(),
        insights: Vec::new(),
    };
    project.insights = insights::project_insights(&project);
    project
}

pub fn evaluate_all(records: &[Record], dictionary: &ScoringDictionary) -> Vec<Project> {
    records.iter().map(|r| evaluate(r, dictionary)).collect()
}

use crate::domain::model::Segment;
use crate::utils::error::{DashboardError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Points an answer is worth and the band it counts towards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerScore {
    pub segment: Segment,
    pub points: f64,
}

#[derive(Debug, Deserialize)]
struct DictionaryRow {
    pregunta: String,
    respuesta: String,
    segmento: String,
    puntaje: f64,
}

/// Scoring dictionary: question -> (answer -> score).
#[derive(Debug, Clone, Default)]
pub struct ScoringDictionary {
    questions: BTreeMap<String, HashMap<String, AnswerScore>>,
}

impl ScoringDictionary {
    pub fn from_csv(data: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(data);
        let mut dictionary = Self::default();

        for (line, row) in reader.deserialize::<DictionaryRow>().enumerate() {
            let row = row?;
            let segment = match Segment::from_label(&row.segmento) {
                Some(segment) if segment != Segment::Unknown => segment,
                _ => {
                    return Err(DashboardError::ConfigError {
                        message: format!(
                            "Unknown segment '{}' in dictionary row {}",
                            row.segmento,
                            line + 2
                        ),
                    })
                }
            };
            dictionary.insert(&row.pregunta, &row.respuesta, segment, row.puntaje);
        }

        tracing::debug!(
            "Loaded scoring dictionary with {} question(s)",
            dictionary.questions.len()
        );
        Ok(dictionary)
    }

    pub fn insert(&mut self, question: &str, answer: &str, segment: Segment, points: f64) {
        self.questions
            .entry(question.to_string())
            .or_default()
            .insert(answer.to_string(), AnswerScore { segment, points });
    }

    pub fn questions(&self) -> impl Iterator<Item = (&String, &HashMap<String, AnswerScore>)> {
        self.questions.iter()
    }
}

use crate::core::scoring::UNSPECIFIED_ENGLISH;
use crate::domain::model::{Project, Segment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Round half away from zero to one decimal.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Decimal rendering that keeps a trailing `.0` on whole numbers (`50.0`, `33.3`).
pub fn fmt_decimal(value: f64) -> String {
    format!("{:?}", value)
}

/// Counts values in first-seen order.
pub fn first_seen_counts<I, S>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut result: Vec<(String, usize)> = Vec::new();
    for value in values {
        let value = value.into();
        match result.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => result.push((value, 1)),
        }
    }
    result
}

/// Counts values, most frequent first; ties keep first-seen order.
pub fn value_counts<I, S>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut result = first_seen_counts(values);
    result.sort_by(|a, b| b.1.cmp(&a.1));
    result
}

/// Most frequent value; ties resolve to the smallest one.
pub fn mode<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    let max = counts.values().copied().max()?;
    counts
        .into_iter()
        .find(|(_, count)| *count == max)
        .map(|(value, _)| value.to_string())
}

/// Highest total first; ties keep input order.
pub fn top_by_total(projects: &[Project], n: usize) -> Vec<&Project> {
    let mut sorted: Vec<&Project> = projects.iter().collect();
    sorted.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    sorted.truncate(n);
    sorted
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainMetrics {
    pub formularios: usize,
    pub trl_max: i64,
    pub aprobados: usize,
    pub docente_si: usize,
    pub docente_no: usize,
    pub puntaje_maximo: f64,
    pub top_proyectos_trl: BTreeMap<String, String>,
    pub nivel_ingles_mas_comun: String,
}

pub fn main_metrics(projects: &[Project]) -> MainMetrics {
    let formularios = projects.len();
    let docente_si = projects.iter().filter(|p| p.has_mentor).count();

    let mut top_proyectos_trl = BTreeMap::new();
    for segment in Segment::SCORED {
        let mut best: Option<&Project> = None;
        for project in projects.iter().filter(|p| p.segment == segment) {
            // 同分時保留先出現者
            if best.map_or(true, |b| project.total_score > b.total_score) {
                best = Some(project);
            }
        }
        if let Some(best) = best {
            top_proyectos_trl.insert(segment.label().to_string(), best.name.clone());
        }
    }

    MainMetrics {
        formularios,
        trl_max: projects
            .iter()
            .map(|p| p.trl_level)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            .map(|v| v.trunc() as i64)
            .unwrap_or(0),
        aprobados: projects.iter().filter(|p| p.is_approved()).count(),
        docente_si,
        docente_no: formularios - docente_si,
        puntaje_maximo: projects
            .iter()
            .map(|p| p.total_score)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            .map(round1)
            .unwrap_or(0.0),
        top_proyectos_trl,
        nivel_ingles_mas_comun: mode(projects.iter().map(|p| p.english_level.as_str()))
            .unwrap_or_else(|| UNSPECIFIED_ENGLISH.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAverages {
    #[serde(rename = "TRL 1-3")]
    pub initial: f64,
    #[serde(rename = "TRL 4-7")]
    pub development: f64,
    #[serde(rename = "TRL 8-9")]
    pub ready: f64,
    #[serde(rename = "Total")]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightMetrics {
    pub total_proyectos: usize,
    pub aprobados: usize,
    pub porcentaje_aprobados: f64,
    pub distribucion_trl: BTreeMap<String, usize>,
    pub promedios: ScoreAverages,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProject {
    #[serde(rename = "Nombre del Proyecto")]
    pub name: String,
    #[serde(rename = "Puntaje Total")]
    pub total_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralInsights {
    pub metricas: InsightMetrics,
    pub top_proyectos: Vec<TopProject>,
    pub insights: Vec<String>,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub fn general_insights(projects: &[Project]) -> GeneralInsights {
    let total = projects.len();
    let approved = projects.iter().filter(|p| p.is_approved()).count();
    let percentage = if total > 0 {
        round1(approved as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    let distribution: BTreeMap<String, usize> =
        value_counts(projects.iter().map(|p| p.segment.label()))
            .into_iter()
            .collect();

    let averages = ScoreAverages {
        initial: round1(mean(projects.iter().map(|p| p.score_initial))),
        development: round1(mean(projects.iter().map(|p| p.score_development))),
        ready: round1(mean(projects.iter().map(|p| p.score_ready))),
        total: round1(mean(projects.iter().map(|p| p.total_score))),
    };

    let top: Vec<TopProject> = top_by_total(projects, 3)
        .into_iter()
        .map(|p| TopProject {
            name: p.name.clone(),
            total_score: round1(p.total_score),
        })
        .collect();

    let count_of = |segment: Segment| distribution.get(segment.label()).copied().unwrap_or(0);
    let initial = count_of(Segment::Initial);
    let development = count_of(Segment::Development);
    let ready = count_of(Segment::Ready);

    let insights = vec![
        format!(
            "📊 {} de {} proyectos están aprobados ({}%)",
            approved,
            total,
            fmt_decimal(percentage)
        ),
        match top.first() {
            Some(best) => format!(
                "🏆 Proyecto con mayor puntaje: {} ({} pts)",
                best.name,
                fmt_decimal(best.total_score)
            ),
            None => "No hay proyectos destacados".to_string(),
        },
        format!(
            "🔍 Distribución TRL: {} inicial, {} en desarrollo, {} listos",
            initial, development, ready
        ),
        format!(
            "📈 Promedios: TRL 1-3: {}, TRL 4-7: {}, TRL 8-9: {}",
            fmt_decimal(averages.initial),
            fmt_decimal(averages.development),
            fmt_decimal(averages.ready)
        ),
        format!(
            "💡 Recomendación: {}",
            if initial > ready {
                "Mentoría a proyectos iniciales"
            } else {
                "Preparar implementación"
            }
        ),
    ];

    GeneralInsights {
        metricas: InsightMetrics {
            total_proyectos: total,
            aprobados: approved,
            porcentaje_aprobados: percentage,
            distribucion_trl: distribution,
            promedios: averages,
        },
        top_proyectos: top,
        insights,
    }
}

//! Plot payloads for the chart carousel.
//!
//! Each chart is a plotly-compatible figure (`{"data": [...], "layout": {...}}`)
//! serialized to a JSON string, so the front end can hand it to its plotting
//! library untouched.

use crate::core::analytics::{first_seen_counts, value_counts};
use crate::core::insights::UNSPECIFIED_INDUSTRY;
use crate::core::scoring::{capitalize, APPROVAL_THRESHOLD};
use crate::domain::model::{Project, Segment};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const APPROVED_COLOR: &str = "#27ae60";
const REJECTED_COLOR: &str = "#e74c3c";
const LOCATION_COLORS: [&str; 5] = ["#3498db", "#2ecc71", "#e74c3c", "#f1c40f", "#95a5a6"];
const CHART_HEIGHT: u32 = 600;
pub const UNSPECIFIED_LOCATION: &str = "No especificada";

fn segment_color(segment: Segment) -> &'static str {
    match segment {
        Segment::Initial => "#3498db",
        Segment::Development => "#9b59b6",
        Segment::Ready => "#e67e22",
        Segment::Unknown => "#95a5a6",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSet {
    pub grafico_1: Option<String>,
    pub grafico_2: Option<String>,
    pub grafico_3: Option<String>,
    pub grafico_4: Option<String>,
    pub grafico_5: Option<String>,
    pub grafico_6: Option<String>,
    pub grafico_7: Option<String>,
}

impl ChartSet {
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Titles and payloads in carousel order, skipping absent charts.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("📊 Aprobados por Nivel TRL", &self.grafico_1),
            ("✅ Proyectos Aprobados", &self.grafico_2),
            ("📈 Aprobación por TRL", &self.grafico_3),
            ("🔍 Puntajes TRL 1-3", &self.grafico_4),
            ("🏭 Proyectos por Industria", &self.grafico_5),
            ("🌍 Nivel de Inglés", &self.grafico_6),
            ("📍 Ubicación Geográfica", &self.grafico_7),
        ]
        .into_iter()
        .filter_map(|(title, chart)| chart.as_deref().map(|c| (title, c)))
        .collect()
    }
}

/// Shared title block, fonts, colors, margins and legend.
fn base_layout(title: &str) -> serde_json::Map<String, Value> {
    let layout = json!({
        "title": {
            "text": format!("<b>{}</b>", title),
            "font": {"family": "Arial", "size": 22, "color": "#2c3e50"},
            "x": 0.5,
            "y": 0.95
        },
        "font": {"family": "Arial", "size": 14, "color": "#34495e"},
        "plot_bgcolor": "#ffffff",
        "paper_bgcolor": "#f8f9fa",
        "margin": {"l": 50, "r": 50, "t": 80, "b": 70},
        "hoverlabel": {
            "bgcolor": "white",
            "font_size": 14,
            "font_family": "Arial",
            "bordercolor": "#bdc3c7"
        },
        "legend": {
            "orientation": "h",
            "yanchor": "top",
            "y": -0.25,
            "xanchor": "center",
            "x": 0.5
        },
        "height": CHART_HEIGHT,
        "template": "plotly_white"
    });
    match layout {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

fn figure(data: Vec<Value>, title: &str, extra: Value) -> Result<String> {
    let mut layout = base_layout(title);
    if let Value::Object(extra) = extra {
        layout.extend(extra);
    }
    Ok(serde_json::to_string(&json!({
        "data": data,
        "layout": layout,
    }))?)
}

fn approved_by_segment(projects: &[Project]) -> Result<String> {
    let approved_segments = projects
        .iter()
        .filter(|p| p.is_approved())
        .flat_map(|p| {
            Segment::SCORED
                .into_iter()
                .filter(move |s| p.scores().get(*s) >= APPROVAL_THRESHOLD)
        })
        .map(|s| s.label());

    let data = value_counts(approved_segments)
        .into_iter()
        .map(|(label, count)| {
            let color = Segment::from_label(&label)
                .map(segment_color)
                .unwrap_or("#95a5a6");
            json!({
                "type": "bar",
                "name": label,
                "x": [label],
                "y": [count],
                "marker": {"color": color},
                "text": [count],
                "texttemplate": "%{y}",
                "textposition": "outside",
                "textfont": {"size": 14}
            })
        })
        .collect();

    figure(
        data,
        "📊 Aprobados por Nivel TRL",
        json!({
            "xaxis": {"title": {"text": "Segmento TRL"}, "tickangle": -30},
            "yaxis": {"title": {"text": "Número de Proyectos"}},
            "showlegend": false
        }),
    )
}

fn approval_share(projects: &[Project]) -> Result<String> {
    // 依資料出現順序排列
    let counts = first_seen_counts(projects.iter().map(|p| p.approval.label()));
    let colors: Vec<&str> = counts
        .iter()
        .map(|(label, _)| if label == "Sí" { APPROVED_COLOR } else { REJECTED_COLOR })
        .collect();
    let pull: Vec<f64> = (0..counts.len())
        .map(|i| if i == 0 { 0.05 } else { 0.0 })
        .collect();

    figure(
        vec![json!({
            "type": "pie",
            "labels": counts.iter().map(|(l, _)| l).collect::<Vec<_>>(),
            "values": counts.iter().map(|(_, c)| c).collect::<Vec<_>>(),
            "hole": 0.4,
            "marker": {"colors": colors},
            "textinfo": "percent+label",
            "pull": pull,
            "textfont": {"size": 14}
        })],
        "✅ Proyectos Aprobados",
        json!({"showlegend": false}),
    )
}

fn approval_per_segment(projects: &[Project]) -> Result<String> {
    let mut approved = Vec::new();
    let mut rejected = Vec::new();
    for segment in Segment::SCORED {
        let passing = projects
            .iter()
            .filter(|p| p.scores().get(segment) >= APPROVAL_THRESHOLD)
            .count();
        approved.push(passing);
        rejected.push(projects.len() - passing);
    }
    let labels: Vec<&str> = Segment::SCORED.iter().map(|s| s.label()).collect();

    figure(
        vec![
            json!({
                "type": "bar",
                "name": "Sí",
                "x": labels,
                "y": approved,
                "marker": {"color": APPROVED_COLOR}
            }),
            json!({
                "type": "bar",
                "name": "No",
                "x": labels,
                "y": rejected,
                "marker": {"color": REJECTED_COLOR}
            }),
        ],
        "📈 Aprobación por Segmento TRL",
        json!({
            "barmode": "group",
            "xaxis": {"title": {"text": "Segmento TRL"}, "tickangle": -30},
            "yaxis": {"title": {"text": "Número de Proyectos"}}
        }),
    )
}

fn initial_score_histogram(projects: &[Project]) -> Result<String> {
    let scores: Vec<f64> = projects.iter().map(|p| p.score_initial).collect();
    figure(
        vec![json!({
            "type": "histogram",
            "x": scores,
            "nbinsx": 20,
            "marker": {"color": segment_color(Segment::Initial)}
        })],
        "🔍 Puntajes TRL 1-3",
        json!({
            "xaxis": {"title": {"text": "Puntaje"}, "tickangle": -30},
            "yaxis": {"title": {"text": "Número de Proyectos"}}
        }),
    )
}

fn projects_per_industry(projects: &[Project]) -> Result<Option<String>> {
    if projects.iter().all(|p| p.industry.is_none()) {
        return Ok(None);
    }
    let counts = value_counts(projects.iter().map(|p| {
        p.industry
            .as_deref()
            .map(str::trim)
            .unwrap_or(UNSPECIFIED_INDUSTRY)
            .to_string()
    }));

    let data = counts
        .into_iter()
        .map(|(industry, count)| {
            json!({
                "type": "bar",
                "orientation": "h",
                "name": industry,
                "x": [count],
                "y": [industry]
            })
        })
        .collect();

    figure(data, "🏭 Proyectos por Industria", json!({"showlegend": false})).map(Some)
}

fn english_levels(projects: &[Project]) -> Result<Option<String>> {
    if projects.is_empty() {
        return Ok(None);
    }
    let data = value_counts(projects.iter().map(|p| p.english_level.as_str()))
        .into_iter()
        .map(|(level, count)| {
            json!({
                "type": "bar",
                "name": level,
                "x": [level],
                "y": [count]
            })
        })
        .collect();

    figure(
        data,
        "🌍 Nivel de Inglés",
        json!({"showlegend": false, "xaxis": {"tickangle": -30}}),
    )
    .map(Some)
}

fn locations(projects: &[Project]) -> Result<Option<String>> {
    if projects.iter().all(|p| p.location.is_none()) {
        return Ok(None);
    }
    let counts = value_counts(projects.iter().map(|p| {
        match p.location.as_deref().map(|l| capitalize(l.trim())) {
            Some(l) if !l.is_empty() && l != "Nan" => l,
            _ => UNSPECIFIED_LOCATION.to_string(),
        }
    }));

    figure(
        vec![json!({
            "type": "pie",
            "labels": counts.iter().map(|(l, _)| l).collect::<Vec<_>>(),
            "values": counts.iter().map(|(_, c)| c).collect::<Vec<_>>(),
            "hole": 0.3,
            "marker": {"colors": LOCATION_COLORS},
            "textinfo": "percent+label",
            "textfont": {"size": 14}
        })],
        "📍 Ubicación Geográfica",
        json!({"showlegend": false}),
    )
    .map(Some)
}

pub fn general_charts(projects: &[Project]) -> Result<ChartSet> {
    Ok(ChartSet {
        grafico_1: Some(approved_by_segment(projects)?),
        grafico_2: Some(approval_share(projects)?),
        grafico_3: Some(approval_per_segment(projects)?),
        grafico_4: Some(initial_score_histogram(projects)?),
        grafico_5: projects_per_industry(projects)?,
        grafico_6: english_levels(projects)?,
        grafico_7: locations(projects)?,
    })
}

use super::yes_no;
use crate::core::analytics::fmt_decimal;
use crate::core::charts::UNSPECIFIED_LOCATION;
use crate::domain::model::Project;
use chrono::NaiveDateTime;
use std::fmt::Write;

pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

const STYLE: &str = r#"
body { font-family: 'Segoe UI', Arial, sans-serif; color: #1f2937; margin: 2rem; }
h1 { color: #6d28d9; }
h2 { color: #4c1d95; border-bottom: 2px solid #ddd6fe; padding-bottom: .25rem; }
.meta { color: #6b7280; font-size: .9rem; }
.project { margin-bottom: 2.5rem; }
table { border-collapse: collapse; margin: 1rem 0; }
th, td { border: 1px solid #d1d5db; padding: .4rem .8rem; text-align: left; }
th { background: #6d28d9; color: #fff; }
.badge { padding: .15rem .6rem; border-radius: 999px; font-weight: 600; }
.si { background: #dcfce7; color: #166534; }
.no { background: #fee2e2; color: #991b1b; }
ul.insights li { margin: .2rem 0; }
"#;

/// Minimal HTML escaping for text and attribute positions.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, generated_at: NaiveDateTime, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n<p class=\"meta\">Generado el {date}</p>\n{body}</body>\n</html>\n",
        title = escape(title),
        date = generated_at.format(DATE_FORMAT),
    )
}

fn project_section(out: &mut String, project: &Project, heading: &str) {
    let approval = project.approval.label();
    let badge = if project.is_approved() { "si" } else { "no" };
    let location = project.location.as_deref().unwrap_or(UNSPECIFIED_LOCATION);

    // write! 到 String 不會失敗
    let _ = write!(
        out,
        "<section class=\"project\">\n<h2>{heading}</h2>\n<table>\n\
<tr><th>Aprobado</th><td><span class=\"badge {badge}\">{approval}</span></td></tr>\n\
<tr><th>Nivel TRL</th><td>{level}</td></tr>\n\
<tr><th>Segmento TRL</th><td>{segment}</td></tr>\n\
<tr><th>Docente Acompañante</th><td>{mentor}</td></tr>\n\
<tr><th>Ubicación</th><td>{location}</td></tr>\n\
<tr><th>Nivel de Inglés</th><td>{english}</td></tr>\n\
</table>\n<table>\n<tr><th>TRL 1-3</th><th>TRL 4-7</th><th>TRL 8-9</th><th>Total</th></tr>\n\
<tr><td>{s1}</td><td>{s2}</td><td>{s3}</td><td>{total}</td></tr>\n</table>\n\
<h3>Insights</h3>\n<ul class=\"insights\">\n",
        heading = escape(heading),
        level = fmt_decimal(project.trl_level),
        segment = project.segment.label(),
        mentor = yes_no(project.has_mentor),
        location = escape(location),
        english = escape(&project.english_level),
        s1 = fmt_decimal(project.score_initial),
        s2 = fmt_decimal(project.score_development),
        s3 = fmt_decimal(project.score_ready),
        total = fmt_decimal(project.total_score),
    );
    for insight in &project.insights {
        let _ = writeln!(out, "<li>{}</li>", escape(insight));
    }
    out.push_str("</ul>\n</section>\n");
}

/// Single-project evaluation report.
pub fn project_report(project: &Project, generated_at: NaiveDateTime) -> String {
    let mut body = String::new();
    project_section(&mut body, project, &project.name);
    page(
        &format!("Reporte de Proyecto: {}", project.name),
        generated_at,
        &body,
    )
}

/// Ranked report; `projects` is expected in ranking order.
pub fn top10_report(projects: &[&Project], generated_at: NaiveDateTime) -> String {
    let mut body = String::new();
    if projects.is_empty() {
        body.push_str("<p>No hay proyectos registrados.</p>\n");
    }
    for (rank, project) in projects.iter().enumerate() {
        project_section(&mut body, project, &format!("{}. {}", rank + 1, project.name));
    }
    page("Top 10 Proyectos por Puntaje Total", generated_at, &body)
}

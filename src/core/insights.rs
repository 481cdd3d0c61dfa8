//! Per-project narrative insights shown in the detail view and the reports.

use crate::domain::model::{Project, Segment};

pub const UNSPECIFIED_INDUSTRY: &str = "No especificada";

pub fn maturity(project: &Project) -> &'static str {
    match project.segment {
        Segment::Initial => {
            if project.score_initial >= 40.0 {
                "Investigación sólida: Buen fundamento teórico y validación inicial"
            } else {
                "Etapa conceptual: Necesita más desarrollo teórico y validación"
            }
        }
        Segment::Development => {
            if project.score_development >= 50.0 {
                "Prototipo funcional: Validación técnica en progreso"
            } else {
                "Prototipo inicial: Requiere más desarrollo técnico"
            }
        }
        // Desconocido se evalúa como TRL 8-9
        Segment::Ready | Segment::Unknown => {
            if project.score_ready >= 60.0 {
                "Listo para implementación: Alta preparación para el mercado"
            } else {
                "Casi listo: Necesita ajustes finales para implementación"
            }
        }
    }
}

pub fn strengths(project: &Project) -> Vec<&'static str> {
    let mut strengths = Vec::new();

    if project.score_initial >= 40.0 {
        strengths.push("✅ Innovación bien fundamentada con investigación sólida");
    }
    if project.score_development >= 50.0 {
        strengths.push("✅ Desarrollo técnico avanzado y validado");
    }
    if project.score_ready >= 50.0 {
        strengths.push("✅ Alto potencial de implementación y escalabilidad");
    }

    if project.has_mentor {
        strengths.push("✅ Excelente acompañamiento académico");
    }
    if matches!(project.english_level.as_str(), "Avanzado" | "Intermedio") {
        strengths.push("✅ Buena capacidad para documentación internacional");
    }

    strengths
}

pub fn weaknesses(project: &Project) -> Vec<&'static str> {
    let mut weaknesses = Vec::new();

    if project.score_initial < 30.0 {
        weaknesses.push("⚠️ Fundamentación teórica débil - necesita más investigación");
    }
    if project.score_development < 40.0 {
        weaknesses.push("⚠️ Desarrollo técnico insuficiente - requiere más validación");
    }
    if project.score_ready < 40.0 {
        weaknesses.push("⚠️ Preparación para el mercado limitada - necesita más desarrollo");
    }

    if !project.has_mentor {
        weaknesses.push("⚠️ Falta acompañamiento docente - recomendar mentoría");
    }
    if project.english_level == "Básico" {
        weaknesses.push("⚠️ Limitaciones en inglés - afecta potencial internacional");
    }

    weaknesses
}

pub fn recommendations(project: &Project) -> Vec<&'static str> {
    let mut recommendations = Vec::new();

    match Segment::from_level(project.trl_level) {
        Segment::Initial => {
            recommendations.push("Priorizar investigación y validación conceptual");
            if project.score_initial < 30.0 {
                recommendations.push("Realizar más investigación de mercado y técnica");
            }
        }
        Segment::Development => {
            recommendations.push("Enfocarse en desarrollo técnico y pruebas");
            if project.score_development < 40.0 {
                recommendations.push("Realizar pruebas técnicas más rigurosas");
            }
        }
        Segment::Ready | Segment::Unknown => {
            recommendations.push("Preparar estrategia de implementación y comercialización");
            if project.score_ready < 50.0 {
                recommendations.push("Realizar pruebas piloto con usuarios finales");
            }
        }
    }

    if !project.has_mentor {
        recommendations.push("Buscar mentoría docente para fortalecer el proyecto");
    }
    if project.english_level == "Básico" {
        recommendations.push("Mejorar documentación en inglés para mayor impacto");
    }

    recommendations
}

pub fn potential(project: &Project) -> &'static str {
    let total = project.score_initial + project.score_development + project.score_ready;
    if total >= 120.0 {
        "🌟 Excelente potencial: Proyecto bien desarrollado en todas las áreas"
    } else if total >= 80.0 {
        "✨ Buen potencial: Proyecto sólido con algunas áreas para mejorar"
    } else if total >= 50.0 {
        "💡 Potencial moderado: Necesita trabajo en varias áreas"
    } else {
        "🔍 Potencial limitado: Requiere desarrollo significativo"
    }
}

pub fn project_insights(project: &Project) -> Vec<String> {
    let mut insights = vec![maturity(project).to_string()];
    insights.extend(strengths(project).into_iter().map(String::from));
    insights.extend(weaknesses(project).into_iter().map(String::from));
    insights.extend(recommendations(project).into_iter().map(String::from));
    insights.push(potential(project).to_string());

    let industry = project.industry.as_deref().unwrap_or(UNSPECIFIED_INDUSTRY);
    insights.push(format!(
        "🏭 Sector: {} - Considerar tendencias del mercado relacionadas",
        industry
    ));

    insights
}

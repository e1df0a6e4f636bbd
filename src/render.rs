//! Display projection of an estimate, as markdown or JSON.

use crate::pricing::Estimate;
use crate::pricing::estimate::{AddonLine, Door, StandardWindow};
use clap::ValueEnum;
use serde::Serialize;

const NBSP: char = '\u{a0}';

/// Output format for rendered estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Markdown,
}

/// One label/value line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub label: String,
    pub value: String,
    /// Secondary text, e.g. quantity and unit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Row {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            detail: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Row>,
}

/// Format an amount in roubles: no fractional digits, grouped thousands.
pub fn format_rub(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 2 + 4);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(NBSP);
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}{}₽", sign, grouped, NBSP)
}

fn window_row(window: &StandardWindow) -> Row {
    Row::new(
        format!("{} ({})", window.size, window.kind),
        format_rub(window.total_rub),
    )
    .with_detail(format!("{} × {}", window.quantity, format_rub(window.unit_price_rub)))
}

fn door_row(door: &Door) -> Row {
    Row::new(door.name.clone(), format_rub(door.total_rub))
        .with_detail(format!("{} × {}", door.quantity, format_rub(door.unit_price_rub)))
}

fn addon_row(addon: &AddonLine) -> Row {
    Row::new(addon.name.clone(), format_rub(addon.total_rub)).with_detail(addon.calculation.clone())
}

/// Project an estimate into its four display sections, in display order.
pub fn sections(estimate: &Estimate) -> Vec<Section> {
    let dims = &estimate.dimensions;
    let dimensions = Section {
        title: "Габариты".into(),
        rows: vec![
            Row::new("Площадь теплого контура, м²", dims.warm_area_m2.to_string()),
            Row::new("Площадь террас, м²", dims.terrace_area_m2.to_string()),
            Row::new("Площадь крылец, м²", dims.porch_area_m2.to_string()),
            Row::new("Высота потолка, м", dims.ceiling_height_m.to_string()),
            Row::new("Тип потолка", dims.ceiling_type.clone()),
            Row::new("Повышение конька, см", dims.ridge_delta_cm.to_string()),
            Row::new("Вынос крыши", dims.roof_overhang.clone()),
        ],
        total: None,
    };

    let openings = &estimate.openings;
    let openings = Section {
        title: "Окна и двери".into(),
        rows: openings
            .standard_windows
            .iter()
            .map(window_row)
            .chain(openings.doors.iter().map(door_row))
            .collect(),
        total: Some(Row::new("Итого по разделу", format_rub(openings.section_total_rub))),
    };

    let construction = &estimate.construction;
    let mut rows = vec![Row::new("Базовая стоимость", format_rub(construction.base_rub))];
    rows.extend(construction.addons.iter().map(addon_row));
    rows.push(Row::new("Доставка", format_rub(construction.delivery_rub)));
    let construction = Section {
        title: "Конструктив".into(),
        rows,
        total: None,
    };

    let totals = &estimate.totals;
    let totals = Section {
        title: "Итоговая стоимость".into(),
        rows: vec![
            Row::new("Итого без комиссии", format_rub(totals.subtotal_rub)),
            Row::new("Комиссия", format_rub(totals.commission_rub)),
        ],
        total: Some(Row::new("Окончательная цена", format_rub(totals.final_rub))),
    };

    vec![dimensions, openings, construction, totals]
}

/// Format display sections as markdown.
pub fn format_markdown(sections: &[Section]) -> String {
    let mut md = String::new();

    for section in sections {
        md.push_str(&format!("## {}\n", section.title));
        for row in &section.rows {
            md.push_str(&format!("- {}: {}", row.label, row.value));
            if let Some(ref detail) = row.detail {
                md.push_str(&format!(" ({})", detail));
            }
            md.push('\n');
        }
        if let Some(ref total) = section.total {
            md.push_str(&format!("\n**{}:** {}\n", total.label, total.value));
        }
        md.push('\n');
    }

    md
}

/// Render an estimate in the requested format.
pub fn render(estimate: &Estimate, format: OutputFormat) -> serde_json::Result<String> {
    let sections = sections(estimate);
    match format {
        OutputFormat::Markdown => Ok(format_markdown(&sections)),
        OutputFormat::Json => serde_json::to_string_pretty(&sections),
    }
}

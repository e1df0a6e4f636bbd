//! Integration tests for estimate rendering.

mod common;

use prefab_estimate::pricing::Estimate;
use prefab_estimate::render::{OutputFormat, render, sections};
use serde_json::{Value, json};

fn sample() -> Estimate {
    let request = json!({
        "house": {"length_m": 8.0, "width_m": 6.0},
        "ceiling": {"type": "flat", "height_m": 2.5, "ridge_delta_cm": 20},
        "roof": {"overhang_cm": "std"},
        "commission_rub": 0.0
    });
    serde_json::from_value(common::breakdown(&request)).expect("fixture should parse")
}

#[test]
fn four_sections_in_display_order() {
    let titles: Vec<String> = sections(&sample()).into_iter().map(|s| s.title).collect();
    assert_eq!(
        titles,
        vec!["Габариты", "Окна и двери", "Конструктив", "Итоговая стоимость"]
    );
}

#[test]
fn openings_list_windows_then_doors() {
    let openings = &sections(&sample())[1];
    assert_eq!(openings.rows.len(), 2);
    assert_eq!(openings.rows[0].label, "100x100 (povorot_otkid)");
    assert_eq!(openings.rows[0].value, "60\u{a0}000\u{a0}₽");
    assert_eq!(
        openings.rows[0].detail.as_deref(),
        Some("4 × 15\u{a0}000\u{a0}₽")
    );
    assert_eq!(openings.rows[1].label, "Входная дверь");
    assert_eq!(
        openings.total.as_ref().map(|t| t.value.as_str()),
        Some("85\u{a0}000\u{a0}₽")
    );
}

#[test]
fn construction_lists_addons_between_base_and_delivery() {
    let construction = &sections(&sample())[2];
    let labels: Vec<&str> = construction.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Базовая стоимость", "Утепление крыши", "Доставка"]);
    assert_eq!(
        construction.rows[1].detail.as_deref(),
        Some("100.5 м2 * 500 руб/м2")
    );
}

#[test]
fn markdown_has_headings_and_final_price() {
    let md = render(&sample(), OutputFormat::Markdown).unwrap();
    assert!(md.starts_with("## Габариты\n"));
    assert!(md.contains("- Площадь теплого контура, м²: 48\n"));
    assert!(md.contains("- Повышение конька, см: 20\n"));
    assert!(md.contains("**Окончательная цена:** 1\u{a0}645\u{a0}250\u{a0}₽"));
}

#[test]
fn json_serializes_sections() {
    let out = render(&sample(), OutputFormat::Json).unwrap();
    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(4));
    assert_eq!(value[0]["title"], "Габариты");
    assert!(value[0].get("total").is_none());
    assert_eq!(value[3]["total"]["label"], "Окончательная цена");
}

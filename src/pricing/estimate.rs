//! Response record returned by the pricing service.
//!
//! The service names its sections in Russian; the Rust side uses English
//! names and maps them with `serde(rename)`. Amounts are in roubles.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    #[serde(rename = "Габариты")]
    pub dimensions: Dimensions,
    #[serde(rename = "Окна_и_двери")]
    pub openings: Openings,
    #[serde(rename = "Конструктив")]
    pub construction: Construction,
    #[serde(rename = "Итоговая_стоимость")]
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(rename = "Площадь_теплого_контура_м2")]
    pub warm_area_m2: f64,
    #[serde(rename = "Площадь_террас_м2")]
    pub terrace_area_m2: f64,
    #[serde(rename = "Площадь_крылец_м2")]
    pub porch_area_m2: f64,
    #[serde(rename = "Высота_потолка_м")]
    pub ceiling_height_m: f64,
    #[serde(rename = "Тип_потолка")]
    pub ceiling_type: String,
    #[serde(rename = "Повышение_конька_см")]
    pub ridge_delta_cm: i64,
    #[serde(rename = "Вынос_крыши")]
    pub roof_overhang: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardWindow {
    #[serde(rename = "Размер")]
    pub size: String,
    #[serde(rename = "Тип")]
    pub kind: String,
    #[serde(rename = "Колво")]
    pub quantity: i64,
    #[serde(rename = "Цена_шт_руб")]
    pub unit_price_rub: f64,
    #[serde(rename = "Сумма_руб")]
    pub total_rub: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    #[serde(rename = "Наименование")]
    pub name: String,
    #[serde(rename = "Колво")]
    pub quantity: i64,
    #[serde(rename = "Цена_шт_руб")]
    pub unit_price_rub: f64,
    #[serde(rename = "Сумма_руб")]
    pub total_rub: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Openings {
    #[serde(rename = "Стандартные_окна")]
    pub standard_windows: Vec<StandardWindow>,
    #[serde(rename = "Двери")]
    pub doors: Vec<Door>,
    #[serde(rename = "Итого_по_разделу_руб")]
    pub section_total_rub: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonLine {
    #[serde(rename = "Код")]
    pub code: String,
    #[serde(rename = "Наименование")]
    pub name: String,
    /// How the amount was derived, e.g. `100.5 м2 * 500 руб/м2`.
    #[serde(rename = "Расчёт")]
    pub calculation: String,
    #[serde(rename = "Сумма_руб")]
    pub total_rub: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Construction {
    #[serde(rename = "База_руб")]
    pub base_rub: f64,
    #[serde(rename = "Дополнения")]
    pub addons: Vec<AddonLine>,
    #[serde(rename = "Доставка_руб")]
    pub delivery_rub: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(rename = "Итого_без_комиссии_руб")]
    pub subtotal_rub: f64,
    #[serde(rename = "Комиссия_руб")]
    pub commission_rub: f64,
    #[serde(rename = "Окончательная_цена_руб")]
    pub final_rub: f64,
}

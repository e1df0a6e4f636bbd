//! Registry of every addressable leaf in the configuration tree.
//!
//! Each entry carries the kind of input it is edited through, the domain a
//! value must satisfy and a visibility predicate. Hidden fields stay
//! addressable; the normalizer decides what is dropped on submission.

use super::types::{
    BuildTech, Brand, CEILING_HEIGHTS_M, CeilingType, Choice, Configuration, Contour, FRAME_MM,
    INSULATION_MM, Overhang, PartitionType, RIDGE_DELTAS_CM,
};
use serde::Serialize;

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free numeric input.
    Number,
    Checkbox,
    /// Select over string options.
    Select,
    /// Select over a fixed set of numbers.
    NumericSelect,
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Number | FieldKind::NumericSelect)
    }
}

/// Constraint a value must satisfy to be stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    Positive,
    NonNegative,
    OneOf(&'static [f64]),
    Options(&'static [&'static str]),
    Flag,
}

impl Domain {
    /// Whether a number belongs to this domain.
    pub fn admits(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self {
            Domain::Positive => value > 0.0,
            Domain::NonNegative => value >= 0.0,
            Domain::OneOf(allowed) => allowed.iter().any(|a| (a - value).abs() < 1e-9),
            Domain::Options(_) | Domain::Flag => false,
        }
    }

    /// Whether a string option belongs to this domain.
    pub fn admits_option(&self, value: &str) -> bool {
        match self {
            Domain::Options(allowed) => allowed.contains(&value),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        match self {
            Domain::Positive => "a positive number".to_string(),
            Domain::NonNegative => "a non-negative number".to_string(),
            Domain::OneOf(allowed) => {
                let list: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                format!("one of {}", list.join(", "))
            }
            Domain::Options(allowed) => format!("one of {}", allowed.join(", ")),
            Domain::Flag => "true or false".to_string(),
        }
    }
}

/// Static description of one leaf.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub path: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub domain: Domain,
    /// Whether an empty input stores the unset marker. Fields that are
    /// always chosen (contour, build technique, overhang) reject it.
    pub clearable: bool,
    visible: fn(&Configuration) -> bool,
}

impl FieldSpec {
    pub fn is_visible(&self, config: &Configuration) -> bool {
        (self.visible)(config)
    }

    /// Human-readable domain, used in error messages.
    pub fn expectation(&self) -> String {
        self.domain.describe()
    }

    pub fn view(&self, config: &Configuration) -> FieldView {
        let options = match self.domain {
            Domain::Options(allowed) => allowed.iter().map(|s| s.to_string()).collect(),
            Domain::OneOf(allowed) => allowed.iter().map(|v| v.to_string()).collect(),
            _ => Vec::new(),
        };
        FieldView {
            path: self.path,
            label: self.label,
            kind: self.kind,
            options,
            visible: self.is_visible(config),
        }
    }
}

/// Serializable view of a field against a particular snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub path: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub visible: bool,
}

fn always(_: &Configuration) -> bool {
    true
}

const fn number(
    path: &'static str,
    label: &'static str,
    domain: Domain,
    visible: fn(&Configuration) -> bool,
) -> FieldSpec {
    FieldSpec {
        path,
        label,
        kind: FieldKind::Number,
        domain,
        clearable: true,
        visible,
    }
}

const fn checkbox(path: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        path,
        label,
        kind: FieldKind::Checkbox,
        domain: Domain::Flag,
        clearable: false,
        visible: always,
    }
}

const fn select(
    path: &'static str,
    label: &'static str,
    options: &'static [&'static str],
    clearable: bool,
    visible: fn(&Configuration) -> bool,
) -> FieldSpec {
    FieldSpec {
        path,
        label,
        kind: FieldKind::Select,
        domain: Domain::Options(options),
        clearable,
        visible,
    }
}

const fn numeric_select(
    path: &'static str,
    label: &'static str,
    allowed: &'static [f64],
    visible: fn(&Configuration) -> bool,
) -> FieldSpec {
    FieldSpec {
        path,
        label,
        kind: FieldKind::NumericSelect,
        domain: Domain::OneOf(allowed),
        clearable: true,
        visible,
    }
}

/// Every addressable field, in form order.
pub static FIELDS: &[FieldSpec] = &[
    number("house.length_m", "House length (m)", Domain::Positive, always),
    number("house.width_m", "House width (m)", Domain::Positive, always),
    select(
        "ceiling.type",
        "Ceiling type",
        CeilingType::OPTIONS,
        true,
        always,
    ),
    numeric_select("ceiling.height_m", "Ceiling height (m)", CEILING_HEIGHTS_M, always),
    numeric_select(
        "ceiling.ridge_delta_cm",
        "Ridge raise (cm)",
        RIDGE_DELTAS_CM,
        |c| c.ceiling.kind.get() == Some(CeilingType::Flat),
    ),
    select("roof.overhang_cm", "Roof overhang (cm)", Overhang::OPTIONS, false, always),
    checkbox("partitions.enabled", "Include partitions"),
    select(
        "partitions.type",
        "Partition type",
        PartitionType::OPTIONS,
        true,
        |c| c.partitions.enabled,
    ),
    number(
        "partitions.run_m",
        "Partition run length (m)",
        Domain::NonNegative,
        |c| c.partitions.enabled,
    ),
    select("insulation.contour", "Contour", Contour::OPTIONS, false, always),
    select(
        "insulation.build_tech",
        "Build technique",
        BuildTech::OPTIONS,
        false,
        always,
    ),
    select(
        "insulation.brand",
        "Insulation brand",
        Brand::OPTIONS,
        true,
        |c| c.insulation.contour == Contour::Warm,
    ),
    numeric_select(
        "insulation.mm",
        "Insulation thickness (mm)",
        INSULATION_MM,
        |c| c.insulation.contour == Contour::Warm,
    ),
    numeric_select(
        "insulation.frame_mm",
        "Frame thickness (mm)",
        FRAME_MM,
        |c| c.insulation.contour == Contour::Cold,
    ),
    checkbox("terrace.primary.enabled", "Include main terrace"),
    number(
        "terrace.primary.length_m",
        "Main terrace length (m)",
        Domain::NonNegative,
        |c| c.terrace.primary.enabled,
    ),
    number(
        "terrace.primary.width_m",
        "Main terrace width (m)",
        Domain::NonNegative,
        |c| c.terrace.primary.enabled,
    ),
    checkbox("terrace.extra.enabled", "Include extra terrace"),
    number(
        "terrace.extra.length_m",
        "Extra terrace length (m)",
        Domain::NonNegative,
        |c| c.terrace.extra.enabled,
    ),
    number(
        "terrace.extra.width_m",
        "Extra terrace width (m)",
        Domain::NonNegative,
        |c| c.terrace.extra.enabled,
    ),
    checkbox("porch.primary.enabled", "Include main porch"),
    number(
        "porch.primary.length_m",
        "Main porch length (m)",
        Domain::NonNegative,
        |c| c.porch.primary.enabled,
    ),
    number(
        "porch.primary.width_m",
        "Main porch width (m)",
        Domain::NonNegative,
        |c| c.porch.primary.enabled,
    ),
    checkbox("porch.extra.enabled", "Include extra porch"),
    number(
        "porch.extra.length_m",
        "Extra porch length (m)",
        Domain::NonNegative,
        |c| c.porch.extra.enabled,
    ),
    number(
        "porch.extra.width_m",
        "Extra porch width (m)",
        Domain::NonNegative,
        |c| c.porch.extra.enabled,
    ),
    number(
        "delivery.distance_km",
        "Delivery distance (km)",
        Domain::NonNegative,
        always,
    ),
    number("commission_rub", "Agent commission (RUB)", Domain::NonNegative, always),
];

/// Resolve a dot-delimited path to its field.
pub fn lookup(path: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.path == path)
}

/// Views of every field against `config`, in form order.
pub fn describe(config: &Configuration) -> Vec<FieldView> {
    FIELDS.iter().map(|spec| spec.view(config)).collect()
}

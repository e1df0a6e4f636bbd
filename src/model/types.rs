//! The configuration tree for a single estimate session.
//!
//! Sections are held behind `Arc` so that an edit clones the root, then
//! rebuilds only the section it touches with `Arc::make_mut`. Every snapshot
//! handed out earlier keeps pointing at the old sections.

use super::field::Field;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A closed set of string options, as offered by a select box.
pub trait Choice: Sized + Copy + 'static {
    /// Wire values in display order.
    const OPTIONS: &'static [&'static str];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self>;
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl Choice for $name {
            const OPTIONS: &'static [&'static str] = &[$($wire),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            fn parse(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum! {
    /// How the ceiling is framed.
    pub enum CeilingType {
        Flat => "flat",
        Rafters => "rafters",
    }
}

choice_enum! {
    /// Roof overhang beyond the walls.
    pub enum Overhang {
        Standard => "std",
        Cm30 => "30",
        Cm40 => "40",
        Cm50 => "50",
    }
}

choice_enum! {
    /// Interior partition build.
    pub enum PartitionType {
        Plain => "plain",
        Insulated50 => "insul50",
        Insulated100 => "insul100",
    }
}

choice_enum! {
    /// Insulation strategy for the building envelope.
    pub enum Contour {
        Warm => "warm",
        Cold => "cold",
    }
}

choice_enum! {
    pub enum BuildTech {
        Panel => "panel",
        Frame => "frame",
    }
}

choice_enum! {
    /// Insulation manufacturer (warm contour only).
    pub enum Brand {
        Izobel => "izobel",
        NemanPlus => "neman_plus",
        Technonicol => "technonicol",
    }
}

choice_enum! {
    /// Window opening mechanism.
    pub enum WindowType {
        Fixed => "gluh",
        Turn => "povorot",
        TiltTurn => "povorot_otkid",
    }
}

/// Allowed ceiling heights, meters.
pub const CEILING_HEIGHTS_M: &[f64] = &[2.4, 2.5, 2.6, 2.7, 2.8, 3.0];
/// Allowed ridge raises for a flat ceiling, centimeters.
pub const RIDGE_DELTAS_CM: &[f64] = &[0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
/// Allowed warm-contour insulation thicknesses, millimeters.
pub const INSULATION_MM: &[f64] = &[100.0, 150.0, 200.0];
/// Allowed cold-contour frame thicknesses, millimeters.
pub const FRAME_MM: &[f64] = &[100.0, 150.0];

pub const DEFAULT_BRAND: Brand = Brand::Izobel;
pub const DEFAULT_INSULATION_MM: u16 = 150;
pub const DEFAULT_FRAME_MM: u16 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub length_m: Field<f64>,
    pub width_m: Field<f64>,
}

/// A terrace or porch slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accessory {
    pub enabled: bool,
    pub length_m: Field<f64>,
    pub width_m: Field<f64>,
}

impl Default for Accessory {
    fn default() -> Self {
        Self {
            enabled: false,
            length_m: Field::Value(0.0),
            width_m: Field::Value(0.0),
        }
    }
}

/// The two independent slots every accessory kind offers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessoryPair {
    pub primary: Accessory,
    pub extra: Accessory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ceiling {
    #[serde(rename = "type")]
    pub kind: Field<CeilingType>,
    pub height_m: Field<f64>,
    /// Only meaningful for a flat ceiling.
    pub ridge_delta_cm: Field<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roof {
    pub overhang_cm: Overhang,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partitions {
    pub enabled: bool,
    /// Only meaningful when enabled.
    #[serde(rename = "type")]
    pub kind: Field<PartitionType>,
    pub run_m: Field<f64>,
}

/// Envelope insulation.
///
/// Exactly one field group is populated at rest: `brand` + `mm` for a warm
/// contour, `frame_mm` for a cold one. Switching contour goes through
/// [`Insulation::reset_for_contour`]; an edit to the other group is dropped
/// by [`Insulation::clear_inactive_group`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insulation {
    pub contour: Contour,
    pub build_tech: BuildTech,
    pub brand: Field<Brand>,
    pub mm: Field<u16>,
    pub frame_mm: Field<u16>,
}

impl Insulation {
    /// Clear the group the current contour does not use and restore the
    /// defaults of the one it does.
    pub fn reset_for_contour(&mut self) {
        match self.contour {
            Contour::Warm => {
                self.brand = Field::Value(DEFAULT_BRAND);
                self.mm = Field::Value(DEFAULT_INSULATION_MM);
                self.frame_mm = Field::Unset;
            }
            Contour::Cold => {
                self.brand = Field::Unset;
                self.mm = Field::Unset;
                self.frame_mm = Field::Value(DEFAULT_FRAME_MM);
            }
        }
    }

    /// Whether the group the current contour does not use holds a value.
    pub fn inactive_group_is_set(&self) -> bool {
        match self.contour {
            Contour::Warm => self.frame_mm.is_set(),
            Contour::Cold => self.brand.is_set() || self.mm.is_set(),
        }
    }

    /// Clear the group the current contour does not use, leaving the active
    /// group as entered.
    pub fn clear_inactive_group(&mut self) {
        match self.contour {
            Contour::Warm => self.frame_mm = Field::Unset,
            Contour::Cold => {
                self.brand = Field::Unset;
                self.mm = Field::Unset;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub distance_km: Field<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addon {
    pub code: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub width_cm: f64,
    pub height_cm: f64,
    #[serde(rename = "type")]
    pub kind: WindowType,
    pub quantity: u32,
    #[serde(default)]
    pub dual_chamber: bool,
    #[serde(default)]
    pub laminated: bool,
}

/// The full estimate input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub house: Arc<House>,
    pub terrace: Arc<AccessoryPair>,
    pub porch: Arc<AccessoryPair>,
    pub ceiling: Arc<Ceiling>,
    pub roof: Arc<Roof>,
    pub partitions: Arc<Partitions>,
    pub insulation: Arc<Insulation>,
    pub delivery: Arc<Delivery>,
    pub commission_rub: Field<f64>,
    pub addons: Arc<Vec<Addon>>,
    pub windows: Arc<Vec<WindowSpec>>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            house: Arc::new(House {
                length_m: Field::Value(6.0),
                width_m: Field::Value(6.0),
            }),
            terrace: Arc::default(),
            porch: Arc::default(),
            ceiling: Arc::new(Ceiling {
                kind: Field::Value(CeilingType::Rafters),
                height_m: Field::Value(2.4),
                ridge_delta_cm: Field::Unset,
            }),
            roof: Arc::new(Roof {
                overhang_cm: Overhang::Standard,
            }),
            partitions: Arc::new(Partitions {
                enabled: false,
                kind: Field::Unset,
                run_m: Field::Value(0.0),
            }),
            insulation: Arc::new(Insulation {
                contour: Contour::Warm,
                build_tech: BuildTech::Panel,
                brand: Field::Value(DEFAULT_BRAND),
                mm: Field::Value(DEFAULT_INSULATION_MM),
                frame_mm: Field::Unset,
            }),
            delivery: Arc::new(Delivery {
                distance_km: Field::Value(100.0),
            }),
            commission_rub: Field::Value(0.0),
            addons: Arc::default(),
            windows: Arc::default(),
        }
    }
}

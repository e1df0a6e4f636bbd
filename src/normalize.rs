//! Conversion of a configuration snapshot into the request payload.
//!
//! Resolution runs in a fixed order: insulation contour, ceiling ridge,
//! partitions type, then completeness of the remaining required fields.
//! Values are passed through as entered; nothing is rounded or converted.

use crate::error::ValidationError;
use crate::model::{
    Accessory, AccessoryPair, Addon, Brand, BuildTech, Ceiling, CeilingType, Configuration,
    Contour, Field, Insulation, Overhang, PartitionType, Partitions, WindowSpec,
};
use serde::{Deserialize, Serialize};

/// Submission-ready request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub house: HousePayload,
    pub terrace: AccessoryPairPayload,
    pub porch: AccessoryPairPayload,
    pub ceiling: CeilingPayload,
    pub roof: RoofPayload,
    pub partitions: PartitionsPayload,
    pub insulation: InsulationPayload,
    pub delivery: DeliveryPayload,
    pub commission_rub: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addons: Vec<Addon>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub windows: Vec<WindowSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousePayload {
    pub length_m: f64,
    pub width_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryPayload {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryPairPayload {
    pub primary: AccessoryPayload,
    pub extra: AccessoryPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeilingPayload {
    #[serde(rename = "type")]
    pub kind: CeilingType,
    pub height_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ridge_delta_cm: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofPayload {
    pub overhang_cm: Overhang,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionsPayload {
    pub enabled: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PartitionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsulationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<Brand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mm: Option<u16>,
    pub build_tech: BuildTech,
    pub contour: Contour,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_mm: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPayload {
    pub distance_km: f64,
}

fn require<T>(field: Field<T>, path: &str) -> Result<T, ValidationError> {
    field
        .into_option()
        .ok_or_else(|| ValidationError::IncompleteField(path.to_string()))
}

/// Keep only the group the contour uses; it must be complete.
fn resolve_insulation(insulation: &Insulation) -> Result<InsulationPayload, ValidationError> {
    let (brand, mm, frame_mm) = match insulation.contour {
        Contour::Warm => match (insulation.brand, insulation.mm) {
            (Field::Value(brand), Field::Value(mm)) => (Some(brand), Some(mm), None),
            _ => return Err(ValidationError::MissingWarmContourFields),
        },
        Contour::Cold => match insulation.frame_mm {
            Field::Value(frame_mm) => (None, None, Some(frame_mm)),
            Field::Unset => return Err(ValidationError::MissingColdContourFields),
        },
    };
    Ok(InsulationPayload {
        brand,
        mm,
        build_tech: insulation.build_tech,
        contour: insulation.contour,
        frame_mm,
    })
}

/// Ridge raise is sent only for a flat ceiling with a non-zero raise.
fn resolve_ridge_delta(ceiling: &Ceiling) -> Option<u16> {
    match (ceiling.kind, ceiling.ridge_delta_cm) {
        (Field::Value(CeilingType::Flat), Field::Value(delta)) if delta != 0 => Some(delta),
        _ => None,
    }
}

/// Partition type is sent only when partitions are enabled.
fn resolve_partition_type(partitions: &Partitions) -> Option<PartitionType> {
    if partitions.enabled {
        partitions.kind.get()
    } else {
        None
    }
}

fn accessory(slot: &Accessory, prefix: &str) -> Result<AccessoryPayload, ValidationError> {
    if slot.enabled {
        Ok(AccessoryPayload {
            enabled: true,
            length_m: Some(require(slot.length_m, &format!("{}.length_m", prefix))?),
            width_m: Some(require(slot.width_m, &format!("{}.width_m", prefix))?),
        })
    } else {
        Ok(AccessoryPayload {
            enabled: false,
            length_m: slot.length_m.get(),
            width_m: slot.width_m.get(),
        })
    }
}

fn accessory_pair(pair: &AccessoryPair, kind: &str) -> Result<AccessoryPairPayload, ValidationError> {
    Ok(AccessoryPairPayload {
        primary: accessory(&pair.primary, &format!("{}.primary", kind))?,
        extra: accessory(&pair.extra, &format!("{}.extra", kind))?,
    })
}

/// Turn a snapshot into the minimal valid payload.
///
/// Pure: the same tree always yields the same payload or the same error.
pub fn normalize(config: &Configuration) -> Result<Payload, ValidationError> {
    let insulation = resolve_insulation(&config.insulation)?;
    let ridge_delta_cm = resolve_ridge_delta(&config.ceiling);
    let partition_type = resolve_partition_type(&config.partitions);

    let house = HousePayload {
        length_m: require(config.house.length_m, "house.length_m")?,
        width_m: require(config.house.width_m, "house.width_m")?,
    };
    let terrace = accessory_pair(&config.terrace, "terrace")?;
    let porch = accessory_pair(&config.porch, "porch")?;
    let ceiling = CeilingPayload {
        kind: require(config.ceiling.kind, "ceiling.type")?,
        height_m: require(config.ceiling.height_m, "ceiling.height_m")?,
        ridge_delta_cm,
    };
    let partitions = PartitionsPayload {
        enabled: config.partitions.enabled,
        kind: partition_type,
        run_m: if config.partitions.enabled {
            Some(require(config.partitions.run_m, "partitions.run_m")?)
        } else {
            config.partitions.run_m.get()
        },
    };
    let delivery = DeliveryPayload {
        distance_km: require(config.delivery.distance_km, "delivery.distance_km")?,
    };
    let commission_rub = require(config.commission_rub, "commission_rub")?;

    Ok(Payload {
        house,
        terrace,
        porch,
        ceiling,
        roof: RoofPayload {
            overhang_cm: config.roof.overhang_cm,
        },
        partitions,
        insulation,
        delivery,
        commission_rub,
        addons: config.addons.as_ref().clone(),
        windows: config.windows.as_ref().clone(),
    })
}

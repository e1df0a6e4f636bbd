//! Configuration tree store.
//!
//! Holds the authoritative tree for one session and applies one edit at a
//! time. Each edit produces a fresh root; sections the edit does not touch
//! are shared with the previous snapshot, the touched section is cloned via
//! `Arc::make_mut`. Snapshots handed out earlier never observe later edits.

mod transitions;

use crate::error::EditError;
use crate::model::{
    Accessory, Addon, Choice, Configuration, Domain, Field, FieldKind, FieldSpec, WindowSpec,
    schema,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A value as entered by the user.
///
/// Deserializes from plain JSON (`true`, `8.5`, `"flat"`), which is what a
/// form posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for EditValue {
    fn from(value: &str) -> Self {
        EditValue::Text(value.to_string())
    }
}

impl From<String> for EditValue {
    fn from(value: String) -> Self {
        EditValue::Text(value)
    }
}

impl From<f64> for EditValue {
    fn from(value: f64) -> Self {
        EditValue::Number(value)
    }
}

impl From<bool> for EditValue {
    fn from(value: bool) -> Self {
        EditValue::Bool(value)
    }
}

impl EditValue {
    fn describe(&self) -> String {
        match self {
            EditValue::Bool(b) => b.to_string(),
            EditValue::Number(n) => n.to_string(),
            EditValue::Text(s) => s.clone(),
        }
    }
}

/// A value coerced to the kind its field declares.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Coerced {
    Number(Field<f64>),
    Flag(bool),
    Option(Field<&'static str>),
}

impl Coerced {
    fn number(self, path: &str) -> Result<Field<f64>, EditError> {
        match self {
            Coerced::Number(value) => Ok(value),
            other => Err(other.mismatch(path, "a number")),
        }
    }

    /// Numbers from an enumerated set of whole values.
    fn whole(self, path: &str) -> Result<Field<u16>, EditError> {
        self.number(path).map(|field| field.map(|v| v.round() as u16))
    }

    fn flag(self, path: &str) -> Result<bool, EditError> {
        match self {
            Coerced::Flag(value) => Ok(value),
            other => Err(other.mismatch(path, "true or false")),
        }
    }

    fn choice<T: Choice>(self, path: &str) -> Result<Field<T>, EditError> {
        match self {
            Coerced::Option(Field::Unset) => Ok(Field::Unset),
            Coerced::Option(Field::Value(wire)) => {
                T::parse(wire)
                    .map(Field::Value)
                    .ok_or_else(|| EditError::OutOfDomain {
                        path: path.to_string(),
                        got: wire.to_string(),
                        expected: format!("one of {}", T::OPTIONS.join(", ")),
                    })
            }
            other => Err(other.mismatch(path, "an option")),
        }
    }

    fn required_choice<T: Choice>(self, path: &str) -> Result<T, EditError> {
        match self.choice::<T>(path)? {
            Field::Value(value) => Ok(value),
            Field::Unset => Err(EditError::InvalidValue {
                path: path.to_string(),
                got: String::new(),
                expected: format!("one of {}", T::OPTIONS.join(", ")),
            }),
        }
    }

    fn mismatch(self, path: &str, expected: &str) -> EditError {
        EditError::InvalidValue {
            path: path.to_string(),
            got: format!("{:?}", self),
            expected: expected.to_string(),
        }
    }
}

/// Coerce a raw value according to the field's declared kind and check it
/// against the field's domain.
fn coerce(spec: &FieldSpec, value: EditValue) -> Result<Coerced, EditError> {
    let invalid = |got: String| EditError::InvalidValue {
        path: spec.path.to_string(),
        got,
        expected: spec.expectation(),
    };
    let out_of_domain = |got: String| EditError::OutOfDomain {
        path: spec.path.to_string(),
        got,
        expected: spec.expectation(),
    };

    match spec.kind {
        FieldKind::Checkbox => match value {
            EditValue::Bool(flag) => Ok(Coerced::Flag(flag)),
            EditValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "1" => Ok(Coerced::Flag(true)),
                "false" | "off" | "0" => Ok(Coerced::Flag(false)),
                _ => Err(invalid(text)),
            },
            other => Err(invalid(other.describe())),
        },
        FieldKind::Number | FieldKind::NumericSelect => {
            let number = match value {
                EditValue::Number(n) => n,
                EditValue::Text(text) => {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        // An emptied input stays editable rather than becoming 0.
                        return if spec.clearable {
                            Ok(Coerced::Number(Field::Unset))
                        } else {
                            Err(invalid(text))
                        };
                    }
                    trimmed.parse::<f64>().map_err(|_| invalid(text.clone()))?
                }
                other => return Err(invalid(other.describe())),
            };
            if spec.domain.admits(number) {
                Ok(Coerced::Number(Field::Value(number)))
            } else {
                Err(out_of_domain(number.to_string()))
            }
        }
        FieldKind::Select => {
            let text = match value {
                EditValue::Text(text) => text.trim().to_string(),
                // Numeric-looking options ("30") may arrive as JSON numbers.
                EditValue::Number(n) => n.to_string(),
                other => return Err(invalid(other.describe())),
            };
            if text.is_empty() {
                return if spec.clearable {
                    Ok(Coerced::Option(Field::Unset))
                } else {
                    Err(invalid(text))
                };
            }
            match spec.domain {
                Domain::Options(allowed) => allowed
                    .iter()
                    .find(|option| **option == text)
                    .map(|option| Coerced::Option(Field::Value(*option)))
                    .ok_or_else(|| out_of_domain(text)),
                _ => Err(invalid(text)),
            }
        }
    }
}

/// Resolve an accessory path (`terrace.primary.length_m`) to the slot and
/// the leaf name. Only the addressed pair is cloned.
fn accessory_mut<'a, 'p>(
    config: &'a mut Configuration,
    path: &'p str,
) -> Option<(&'a mut Accessory, &'p str)> {
    let mut parts = path.splitn(3, '.');
    let pair = match parts.next()? {
        "terrace" => &mut config.terrace,
        "porch" => &mut config.porch,
        _ => return None,
    };
    let slot = parts.next()?;
    let leaf = parts.next()?;
    if !matches!(slot, "primary" | "extra") {
        return None;
    }
    let pair = Arc::make_mut(pair);
    let accessory = if slot == "primary" {
        &mut pair.primary
    } else {
        &mut pair.extra
    };
    Some((accessory, leaf))
}

/// Write a coerced value at `path`, rebuilding only its ancestors.
fn assign(config: &mut Configuration, path: &str, value: Coerced) -> Result<(), EditError> {
    match path {
        "house.length_m" => Arc::make_mut(&mut config.house).length_m = value.number(path)?,
        "house.width_m" => Arc::make_mut(&mut config.house).width_m = value.number(path)?,
        "ceiling.type" => Arc::make_mut(&mut config.ceiling).kind = value.choice(path)?,
        "ceiling.height_m" => Arc::make_mut(&mut config.ceiling).height_m = value.number(path)?,
        "ceiling.ridge_delta_cm" => {
            Arc::make_mut(&mut config.ceiling).ridge_delta_cm = value.whole(path)?
        }
        "roof.overhang_cm" => {
            Arc::make_mut(&mut config.roof).overhang_cm = value.required_choice(path)?
        }
        "partitions.enabled" => Arc::make_mut(&mut config.partitions).enabled = value.flag(path)?,
        "partitions.type" => Arc::make_mut(&mut config.partitions).kind = value.choice(path)?,
        "partitions.run_m" => Arc::make_mut(&mut config.partitions).run_m = value.number(path)?,
        "insulation.contour" => {
            Arc::make_mut(&mut config.insulation).contour = value.required_choice(path)?
        }
        "insulation.build_tech" => {
            Arc::make_mut(&mut config.insulation).build_tech = value.required_choice(path)?
        }
        "insulation.brand" => Arc::make_mut(&mut config.insulation).brand = value.choice(path)?,
        "insulation.mm" => Arc::make_mut(&mut config.insulation).mm = value.whole(path)?,
        "insulation.frame_mm" => {
            Arc::make_mut(&mut config.insulation).frame_mm = value.whole(path)?
        }
        "delivery.distance_km" => {
            Arc::make_mut(&mut config.delivery).distance_km = value.number(path)?
        }
        "commission_rub" => config.commission_rub = value.number(path)?,
        other => {
            let unknown = || EditError::UnknownPath(other.to_string());
            let (accessory, leaf) = accessory_mut(config, other).ok_or_else(unknown)?;
            match leaf {
                "enabled" => accessory.enabled = value.flag(path)?,
                "length_m" => accessory.length_m = value.number(path)?,
                "width_m" => accessory.width_m = value.number(path)?,
                _ => return Err(unknown()),
            }
        }
    }
    Ok(())
}

/// Owner of the configuration tree for one session.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    current: Arc<Configuration>,
    revision: u64,
}

impl ConfigStore {
    /// Create a store holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tree. Cheap; the returned handle never changes.
    pub fn snapshot(&self) -> Arc<Configuration> {
        Arc::clone(&self.current)
    }

    /// Number of edits applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply a single edit and any consistency rule keyed by its path.
    ///
    /// Numeric fields parse text input; an empty input stores
    /// [`Field::Unset`]. A rejected edit leaves the tree unchanged.
    pub fn apply_edit(
        &mut self,
        path: &str,
        value: impl Into<EditValue>,
    ) -> Result<Arc<Configuration>, EditError> {
        let spec = schema::lookup(path).ok_or_else(|| EditError::UnknownPath(path.to_string()))?;
        let coerced = coerce(spec, value.into())?;

        let mut next = Configuration::clone(&self.current);
        assign(&mut next, spec.path, coerced)?;
        transitions::apply(spec.path, &self.current, &mut next);

        self.commit(next, spec.path);
        Ok(self.snapshot())
    }

    /// Append an addon line.
    pub fn append_addon(&mut self, addon: Addon) -> Result<Arc<Configuration>, EditError> {
        if addon.code.trim().is_empty() {
            return Err(EditError::InvalidValue {
                path: "addons.code".to_string(),
                got: addon.code,
                expected: "a non-empty addon code".to_string(),
            });
        }
        if addon.quantity == 0 {
            return Err(EditError::OutOfDomain {
                path: "addons.quantity".to_string(),
                got: "0".to_string(),
                expected: "at least 1".to_string(),
            });
        }

        let mut next = Configuration::clone(&self.current);
        Arc::make_mut(&mut next.addons).push(addon);
        self.commit(next, "addons");
        Ok(self.snapshot())
    }

    /// Append a window line.
    pub fn append_window(&mut self, window: WindowSpec) -> Result<Arc<Configuration>, EditError> {
        for (path, value) in [
            ("windows.width_cm", window.width_cm),
            ("windows.height_cm", window.height_cm),
        ] {
            if !Domain::Positive.admits(value) {
                return Err(EditError::OutOfDomain {
                    path: path.to_string(),
                    got: value.to_string(),
                    expected: "a positive number".to_string(),
                });
            }
        }
        if window.quantity == 0 {
            return Err(EditError::OutOfDomain {
                path: "windows.quantity".to_string(),
                got: "0".to_string(),
                expected: "at least 1".to_string(),
            });
        }

        let mut next = Configuration::clone(&self.current);
        Arc::make_mut(&mut next.windows).push(window);
        self.commit(next, "windows");
        Ok(self.snapshot())
    }

    fn commit(&mut self, next: Configuration, field: &str) {
        self.current = Arc::new(next);
        self.revision += 1;
        debug!(field, revision = self.revision, "edit applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CeilingType, Overhang, PartitionType};

    #[test]
    fn test_empty_number_becomes_unset() {
        let mut store = ConfigStore::new();
        let snap = store.apply_edit("house.length_m", "").unwrap();
        assert_eq!(snap.house.length_m, Field::Unset);
    }

    #[test]
    fn test_zero_is_kept_as_value() {
        let mut store = ConfigStore::new();
        let snap = store.apply_edit("delivery.distance_km", "0").unwrap();
        assert_eq!(snap.delivery.distance_km, Field::Value(0.0));
    }

    #[test]
    fn test_numeric_text_is_parsed() {
        let mut store = ConfigStore::new();
        let snap = store.apply_edit("house.width_m", " 7.5 ").unwrap();
        assert_eq!(snap.house.width_m, Field::Value(7.5));
    }

    #[test]
    fn test_garbage_number_rejected() {
        let mut store = ConfigStore::new();
        let err = store.apply_edit("house.width_m", "wide").unwrap_err();
        assert!(matches!(err, EditError::InvalidValue { .. }));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_negative_dimension_out_of_domain() {
        let mut store = ConfigStore::new();
        let err = store.apply_edit("house.length_m", -2.0).unwrap_err();
        assert!(matches!(err, EditError::OutOfDomain { .. }));
        assert_eq!(store.snapshot().house.length_m, Field::Value(6.0));
    }

    #[test]
    fn test_numeric_select_checks_enumeration() {
        let mut store = ConfigStore::new();
        assert!(store.apply_edit("ceiling.height_m", "2.9").is_err());
        let snap = store.apply_edit("ceiling.height_m", "3").unwrap();
        assert_eq!(snap.ceiling.height_m, Field::Value(3.0));
    }

    #[test]
    fn test_select_accepts_number_for_numeric_options() {
        let mut store = ConfigStore::new();
        let snap = store.apply_edit("roof.overhang_cm", 40.0).unwrap();
        assert_eq!(snap.roof.overhang_cm, Overhang::Cm40);
    }

    #[test]
    fn test_required_select_rejects_empty() {
        let mut store = ConfigStore::new();
        assert!(store.apply_edit("insulation.contour", "").is_err());
        assert!(store.apply_edit("roof.overhang_cm", "").is_err());
    }

    #[test]
    fn test_clearable_select_accepts_empty() {
        let mut store = ConfigStore::new();
        let snap = store.apply_edit("ceiling.type", "").unwrap();
        assert!(snap.ceiling.kind.is_unset());
        let snap = store.apply_edit("ceiling.type", "flat").unwrap();
        assert_eq!(snap.ceiling.kind, Field::Value(CeilingType::Flat));
    }

    #[test]
    fn test_checkbox_from_text() {
        let mut store = ConfigStore::new();
        let snap = store.apply_edit("partitions.enabled", "on").unwrap();
        assert!(snap.partitions.enabled);
        let snap = store.apply_edit("partitions.type", "insul100").unwrap();
        assert_eq!(snap.partitions.kind, Field::Value(PartitionType::Insulated100));
    }

    #[test]
    fn test_checkbox_rejects_number() {
        let mut store = ConfigStore::new();
        assert!(store.apply_edit("terrace.primary.enabled", 1.0).is_err());
    }

    #[test]
    fn test_accessory_paths() {
        let mut store = ConfigStore::new();
        store.apply_edit("porch.extra.enabled", true).unwrap();
        let snap = store.apply_edit("porch.extra.length_m", "1.5").unwrap();
        assert!(snap.porch.extra.enabled);
        assert_eq!(snap.porch.extra.length_m, Field::Value(1.5));
        assert!(!snap.porch.primary.enabled);
    }

    #[test]
    fn test_unknown_path() {
        let mut store = ConfigStore::new();
        let err = store.apply_edit("terrace.side.enabled", true).unwrap_err();
        assert_eq!(err, EditError::UnknownPath("terrace.side.enabled".to_string()));
    }

    #[test]
    fn test_untouched_sections_are_shared() {
        let mut store = ConfigStore::new();
        let before = store.snapshot();
        let after = store.apply_edit("house.length_m", 9.0).unwrap();
        assert!(Arc::ptr_eq(&before.ceiling, &after.ceiling));
        assert!(Arc::ptr_eq(&before.insulation, &after.insulation));
        assert!(!Arc::ptr_eq(&before.house, &after.house));
    }

    #[test]
    fn test_revision_counts_edits() {
        let mut store = ConfigStore::new();
        store.apply_edit("house.length_m", 9.0).unwrap();
        store.apply_edit("house.width_m", 7.0).unwrap();
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_append_rejects_zero_quantity() {
        let mut store = ConfigStore::new();
        let err = store
            .append_addon(Addon {
                code: "STAIRS".to_string(),
                quantity: 0,
            })
            .unwrap_err();
        assert_eq!(err.path(), "addons.quantity");
        assert!(store.snapshot().addons.is_empty());
    }
}

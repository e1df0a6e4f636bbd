//! Implementations of the one-shot subcommands.
//!
//! Each command starts from a fresh session, applies the edits from the
//! command line in order and returns the text to print.

use super::{EditArgs, SubmitArgs};
use crate::config::PricingConfig;
use crate::model::{Configuration, FieldView, schema};
use crate::normalize::normalize;
use crate::pricing::{HttpPricingService, Submitter};
use crate::render;
use crate::store::ConfigStore;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Build a store from command-line edits. Stops at the first rejected edit.
pub fn apply_edits(args: &EditArgs) -> Result<ConfigStore> {
    let mut store = ConfigStore::new();
    for (path, value) in &args.sets {
        store
            .apply_edit(path, value.clone())
            .with_context(|| format!("--set {}", path))?;
    }
    for addon in &args.addons {
        store
            .append_addon(addon.clone())
            .with_context(|| format!("--addon {}", addon.code))?;
    }
    for window in &args.windows {
        store
            .append_window(window.clone())
            .context("--window")?;
    }
    Ok(store)
}

/// `defaults`: the default tree as JSON.
pub fn run_defaults() -> Result<String> {
    Ok(serde_json::to_string_pretty(&Configuration::default())?)
}

fn format_field(view: &FieldView) -> String {
    let mut line = format!("- `{}` {} ({:?})", view.path, view.label, view.kind);
    if !view.options.is_empty() {
        line.push_str(&format!(": {}", view.options.join(" | ")));
    }
    if !view.visible {
        line.push_str(" [hidden]");
    }
    line
}

/// `fields`: the schema with visibility for the edited tree.
pub fn run_fields(args: &EditArgs) -> Result<String> {
    let store = apply_edits(args)?;
    let views = schema::describe(&store.snapshot());

    let mut md = format!("# Fields ({})\n\n", views.len());
    for view in &views {
        md.push_str(&format_field(view));
        md.push('\n');
    }
    Ok(md)
}

/// `payload`: the normalized request body as JSON.
pub fn run_payload(args: &EditArgs) -> Result<String> {
    let store = apply_edits(args)?;
    let payload = normalize(&store.snapshot())?;
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// `submit`: send the payload and render the estimate.
pub async fn run_submit(pricing: &PricingConfig, args: &SubmitArgs) -> Result<String> {
    let store = apply_edits(&args.edits)?;
    let submitter = Submitter::new(Arc::new(HttpPricingService::new(pricing)));

    let submission = submitter
        .submit(store.snapshot())
        .await
        .with_context(|| format!("submitting to {}", pricing.endpoint))?;

    Ok(render::render(&submission.estimate, args.format)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EditError, ValidationError};
    use crate::store::EditValue;

    fn sets(pairs: &[(&str, &str)]) -> EditArgs {
        EditArgs {
            sets: pairs
                .iter()
                .map(|(p, v)| (p.to_string(), EditValue::from(*v)))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_payload_reflects_edits() {
        let args = sets(&[
            ("house.length_m", "8"),
            ("ceiling.type", "flat"),
            ("ceiling.ridge_delta_cm", "20"),
        ]);
        let json: serde_json::Value = serde_json::from_str(&run_payload(&args).unwrap()).unwrap();
        assert_eq!(json["house"]["length_m"], 8.0);
        assert_eq!(json["ceiling"]["ridge_delta_cm"], 20);
    }

    #[test]
    fn test_payload_reports_validation_failure() {
        let args = sets(&[("insulation.brand", "")]);
        let err = run_payload(&args).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::MissingWarmContourFields)
        );
    }

    #[test]
    fn test_rejected_edit_names_flag() {
        let err = apply_edits(&sets(&[("house.height_m", "3")])).unwrap_err();
        assert!(err.to_string().contains("--set house.height_m"));
        assert!(matches!(
            err.downcast_ref::<EditError>(),
            Some(EditError::UnknownPath(_))
        ));
    }

    #[test]
    fn test_fields_marks_hidden() {
        let out = run_fields(&EditArgs::default()).unwrap();
        assert!(out.contains("`ceiling.ridge_delta_cm`"));
        assert!(out.lines().any(|l| l.contains("insulation.frame_mm") && l.ends_with("[hidden]")));
        assert!(!out.lines().any(|l| l.contains("insulation.brand") && l.ends_with("[hidden]")));
    }
}

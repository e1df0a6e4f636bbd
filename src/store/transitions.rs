//! Consistency rewrites that an edit to one field triggers on its siblings.
//!
//! Each rule is keyed by the edited path and receives the tree as it was
//! before the edit and the tree with the new value already written. Rules
//! only touch sections they actually change, so unrelated sections stay
//! shared with the previous snapshot.

use crate::model::Configuration;
use std::sync::Arc;
use tracing::debug;

/// A deterministic rewrite of `after`, given the tree before the edit.
type Rewrite = fn(before: &Configuration, after: &mut Configuration);

/// Path-keyed rules.
static TRANSITIONS: &[(&str, Rewrite)] = &[
    ("insulation.contour", contour_selected),
    ("insulation.brand", inactive_group_cleared),
    ("insulation.mm", inactive_group_cleared),
    ("insulation.frame_mm", inactive_group_cleared),
];

/// Run the rule registered for `path`, if any.
pub(crate) fn apply(path: &str, before: &Configuration, after: &mut Configuration) {
    for (rule_path, rewrite) in TRANSITIONS {
        if *rule_path == path {
            rewrite(before, after);
        }
    }
}

/// Selecting a contour, even the current one, populates its group with
/// defaults and clears the other. Resetting is idempotent.
fn contour_selected(before: &Configuration, after: &mut Configuration) {
    let contour = after.insulation.contour;
    Arc::make_mut(&mut after.insulation).reset_for_contour();
    if before.insulation.contour != contour {
        debug!(%contour, "contour switched, insulation group reset to defaults");
    }
}

/// A value written to the group the contour does not use is dropped.
fn inactive_group_cleared(_before: &Configuration, after: &mut Configuration) {
    if !after.insulation.inactive_group_is_set() {
        return;
    }
    let contour = after.insulation.contour;
    Arc::make_mut(&mut after.insulation).clear_inactive_group();
    debug!(%contour, "edit to unused insulation group dropped");
}

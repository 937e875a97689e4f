use rewire_wiring::{WiringRecord, DEFAULT_SCOPE};
use serde::Serialize;

use crate::java_ast::ClassView;
use crate::markers;

/// Where a planned marker attaches.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum MarkerTarget {
    Class,
    Field { name: String },
    Constructor { param_count: usize },
    Parameter { param_count: usize, ordinal: usize },
}

/// One marker to add: target, literal tag text, and the bare name used for
/// presence checks.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlannedMarker {
    pub target: MarkerTarget,
    pub tag: String,
    pub name: String,
}

impl PlannedMarker {
    fn new(target: MarkerTarget, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let name = markers::marker_name(&tag).to_string();
        Self { target, tag, name }
    }
}

/// The full set of markers to add for one record, plus the reference
/// properties whose fields were missing (these downgrade the outcome to
/// partial without failing it).
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MarkerPlan {
    pub entries: Vec<PlannedMarker>,
    pub missing_fields: Vec<String>,
    pub notes: Vec<String>,
}

impl MarkerPlan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pure decision logic: given a record and the resolved class structure,
/// decide which markers to add and where. Always produces a plan (possibly
/// empty); ambiguity is the resolver's concern, not the planner's.
pub struct MarkerPlanner;

impl MarkerPlanner {
    pub fn plan(record: &WiringRecord, class: &ClassView) -> MarkerPlan {
        let mut plan = MarkerPlan::default();

        Self::plan_class_markers(record, class, &mut plan);
        Self::plan_field_markers(record, class, &mut plan);
        Self::plan_constructor_markers(record, class, &mut plan);

        log::debug!(
            "Planned {} markers for record '{}' on class {}",
            plan.entries.len(),
            record.id,
            class.name
        );
        plan
    }

    fn plan_class_markers(record: &WiringRecord, class: &ClassView, plan: &mut MarkerPlan) {
        let role = markers::classify_role(record.unqualified_name());
        if !class.has_marker(markers::marker_name(role)) {
            plan.entries
                .push(PlannedMarker::new(MarkerTarget::Class, role));
        }

        if record.primary && !class.has_marker("Primary") {
            plan.entries
                .push(PlannedMarker::new(MarkerTarget::Class, markers::PRIMARY));
        }

        if record.lazy && !class.has_marker("Lazy") {
            plan.entries
                .push(PlannedMarker::new(MarkerTarget::Class, markers::LAZY));
        }

        // The scope marker alone carries no presence check: re-running the
        // pipeline adds a second copy. Known quirk, pinned by tests.
        if record.scope != DEFAULT_SCOPE {
            plan.entries.push(PlannedMarker::new(
                MarkerTarget::Class,
                markers::scope_marker(&record.scope),
            ));
        }
    }

    fn plan_field_markers(record: &WiringRecord, class: &ClassView, plan: &mut MarkerPlan) {
        for property in &record.properties {
            if property.is_reference() {
                let Some(field) = class.field(&property.name) else {
                    plan.missing_fields.push(property.name.clone());
                    plan.notes.push(format!(
                        "Field '{}' not found on {}; injection marker must be added manually",
                        property.name, class.name
                    ));
                    continue;
                };

                let target = MarkerTarget::Field {
                    name: field.name.clone(),
                };
                if !field.has_marker("Autowired") {
                    plan.entries
                        .push(PlannedMarker::new(target.clone(), markers::AUTOWIRED));
                }
                let ref_id = property.ref_id.as_deref().unwrap_or_default();
                if !ref_id.is_empty() && !field.has_marker("Qualifier") {
                    plan.entries.push(PlannedMarker::new(
                        target,
                        markers::qualifier_marker(ref_id),
                    ));
                }
            } else if property.is_value() {
                let Some(field) = class.field(&property.name) else {
                    continue;
                };
                if !field.has_marker("Value") {
                    plan.entries.push(PlannedMarker::new(
                        MarkerTarget::Field {
                            name: field.name.clone(),
                        },
                        markers::value_marker(property.value.as_deref().unwrap_or_default()),
                    ));
                }
            }
        }
    }

    fn plan_constructor_markers(record: &WiringRecord, class: &ClassView, plan: &mut MarkerPlan) {
        if record.constructor_args.is_empty() {
            return;
        }

        let param_count = record.constructor_args.len();
        let Some(constructor) = class.constructor_with_arity(param_count) else {
            // No arity match: a missed opportunity, not an error.
            log::debug!(
                "No {}-parameter constructor on {}; skipping constructor markers",
                param_count,
                class.name
            );
            return;
        };

        if !constructor.has_marker("Autowired") {
            plan.entries.push(PlannedMarker::new(
                MarkerTarget::Constructor { param_count },
                markers::AUTOWIRED,
            ));
        }

        for (ordinal, binding) in record.constructor_args.iter().enumerate() {
            if !binding.is_reference() {
                continue;
            }
            let Some(param) = constructor.params.get(ordinal) else {
                continue;
            };
            if !param.has_marker("Qualifier") {
                plan.entries.push(PlannedMarker::new(
                    MarkerTarget::Parameter {
                        param_count,
                        ordinal,
                    },
                    markers::qualifier_marker(binding.ref_id.as_deref().unwrap_or_default()),
                ));
            }
        }
    }
}

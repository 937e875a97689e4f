use crate::java_ast::ClassView;
use crate::planner::{MarkerPlan, MarkerTarget};

/// Result of applying a plan to one source file's text.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// Full rewritten text; identical to the input when nothing applied
    pub content: String,

    /// Marker tags actually applied, in plan order
    pub markers_added: Vec<String>,

    /// Human-readable modification descriptions
    pub notes: Vec<String>,

    pub changed: bool,
}

/// Applies a [`MarkerPlan`] to source text. Pure text transform: whole-line
/// markers go above their target declaration at its indentation, parameter
/// markers inline before the parameter. File I/O stays with the caller.
pub struct SourceRewriter;

struct Edit {
    offset: usize,
    text: String,
}

impl SourceRewriter {
    pub fn apply(content: &str, class: &ClassView, plan: &MarkerPlan) -> RewriteOutcome {
        let mut edits = Vec::new();
        let mut markers_added = Vec::new();
        let mut notes = Vec::new();

        for entry in &plan.entries {
            let edit = match &entry.target {
                MarkerTarget::Class => Some((
                    class.insert_at,
                    format!("{}{}\n", class.indent, entry.tag),
                    format!("Added {} to class {}", entry.tag, class.name),
                )),
                MarkerTarget::Field { name } => class.field(name).map(|field| {
                    (
                        field.insert_at,
                        format!("{}{}\n", field.indent, entry.tag),
                        format!("Added {} to field {}", entry.tag, name),
                    )
                }),
                MarkerTarget::Constructor { param_count } => {
                    class.constructor_with_arity(*param_count).map(|ctor| {
                        (
                            ctor.insert_at,
                            format!("{}{}\n", ctor.indent, entry.tag),
                            format!("Added {} to constructor", entry.tag),
                        )
                    })
                }
                MarkerTarget::Parameter {
                    param_count,
                    ordinal,
                } => class
                    .constructor_with_arity(*param_count)
                    .and_then(|ctor| ctor.params.get(*ordinal))
                    .map(|param| {
                        (
                            param.insert_at,
                            format!("{} ", entry.tag),
                            format!("Added {} to constructor parameter {}", entry.tag, param.name),
                        )
                    }),
            };

            match edit {
                Some((offset, text, note)) => {
                    edits.push(Edit { offset, text });
                    markers_added.push(entry.tag.clone());
                    notes.push(note);
                }
                None => log::warn!(
                    "Plan entry {} has no target in class {}; skipping",
                    entry.tag,
                    class.name
                ),
            }
        }

        notes.extend(plan.notes.iter().cloned());

        // Single mutation pass, back to front. Ties keep plan order on the
        // page: later entries are inserted first, so earlier ones land above.
        edits.sort_by_key(|e| e.offset);
        let mut rewritten = content.to_string();
        for edit in edits.iter().rev() {
            rewritten.insert_str(edit.offset, &edit.text);
        }

        let changed = !edits.is_empty();
        RewriteOutcome {
            content: rewritten,
            markers_added,
            notes,
            changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::java_ast::JavaSource;
    use crate::planner::MarkerPlanner;
    use pretty_assertions::assert_eq;
    use rewire_wiring::{ConstructorBinding, PropertyBinding, WiringRecord};

    fn convert(source: &str, record: &WiringRecord) -> RewriteOutcome {
        let parsed = JavaSource::parse(source).unwrap();
        let class = parsed.find_class(record.unqualified_name()).unwrap();
        let plan = MarkerPlanner::plan(record, class);
        SourceRewriter::apply(source, class, &plan)
    }

    #[test]
    fn class_markers_land_above_declaration_in_plan_order() {
        let mut record = WiringRecord::new("widget", "com.example.Widget");
        record.scope = "prototype".into();
        record.lazy = true;
        record.primary = true;

        let outcome = convert("public class Widget {\n}\n", &record);

        assert!(outcome.changed);
        assert_eq!(
            outcome.content,
            "@Component\n@Primary\n@Lazy\n@Scope(\"prototype\")\npublic class Widget {\n}\n"
        );
        assert_eq!(
            outcome.markers_added,
            vec!["@Component", "@Primary", "@Lazy", "@Scope(\"prototype\")"]
        );
    }

    #[test]
    fn field_markers_keep_field_indentation() {
        let mut record = WiringRecord::new("svc", "com.example.UserService");
        record.properties.push(PropertyBinding {
            name: "userDao".into(),
            ref_id: Some("userDao".into()),
            ..Default::default()
        });

        let outcome = convert(
            "public class UserService {\n    private UserDao userDao;\n}\n",
            &record,
        );

        assert_eq!(
            outcome.content,
            "@Service\npublic class UserService {\n    @Autowired\n    @Qualifier(\"userDao\")\n    private UserDao userDao;\n}\n"
        );
    }

    #[test]
    fn value_marker_carries_the_literal() {
        let mut record = WiringRecord::new("svc", "com.example.UserService");
        record
            .properties
            .push(PropertyBinding::with_value("maxUsers", "100"));

        let outcome = convert(
            "public class UserService {\n    private int maxUsers;\n}\n",
            &record,
        );

        assert!(outcome.content.contains("    @Value(\"100\")\n    private int maxUsers;"));
    }

    #[test]
    fn constructor_and_parameter_markers() {
        let mut record = WiringRecord::new("svc", "com.example.UserService");
        record.constructor_args.push(ConstructorBinding {
            ref_id: Some("userDao".into()),
            ..Default::default()
        });
        record.constructor_args.push(ConstructorBinding {
            value: Some("10".into()),
            ..Default::default()
        });

        let outcome = convert(
            "public class UserService {\n    public UserService(UserDao dao, int max) {\n    }\n}\n",
            &record,
        );

        assert!(outcome
            .content
            .contains("    @Autowired\n    public UserService(@Qualifier(\"userDao\") UserDao dao, int max)"));
    }

    #[test]
    fn rerun_adds_only_the_scope_marker_again() {
        let mut record = WiringRecord::new("svc", "com.example.UserService");
        record.scope = "prototype".into();
        record.properties.push(PropertyBinding {
            name: "userDao".into(),
            ref_id: Some("userDao".into()),
            ..Default::default()
        });

        let source = "public class UserService {\n    private UserDao userDao;\n}\n";
        let first = convert(source, &record);
        let second = convert(&first.content, &record);

        // Injection markers are idempotent; the scope marker duplicates.
        assert_eq!(second.markers_added, vec!["@Scope(\"prototype\")"]);
        assert_eq!(second.content.matches("@Autowired").count(), 1);
        assert_eq!(second.content.matches("@Scope(\"prototype\")").count(), 2);
    }

    #[test]
    fn rewritten_output_still_parses() {
        let mut record = WiringRecord::new("svc", "com.example.UserService");
        record.primary = true;
        record.properties.push(PropertyBinding {
            name: "userDao".into(),
            ref_id: Some("userDao".into()),
            ..Default::default()
        });

        let outcome = convert(
            "public class UserService {\n    private UserDao userDao;\n\n    public UserService(UserDao userDao) {\n        this.userDao = userDao;\n    }\n}\n",
            &record,
        );
        assert!(JavaSource::parse(&outcome.content).is_ok());
    }

    #[test]
    fn empty_plan_changes_nothing() {
        let record = WiringRecord::new("svc", "com.example.UserService");
        let source = "@Service\npublic class UserService {\n}\n";
        let outcome = convert(source, &record);

        assert!(!outcome.changed);
        assert_eq!(outcome.content, source);
        assert!(outcome.markers_added.is_empty());
    }
}

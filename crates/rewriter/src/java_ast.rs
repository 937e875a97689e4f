use tree_sitter::{Node, Parser};

use crate::error::{Result, RewriteError};

/// Structure view over one class declaration: everything the planner and
/// rewriter need, with byte offsets for whole-line marker insertion.
#[derive(Debug, Clone)]
pub struct ClassView {
    /// Declared (simple) class name
    pub name: String,

    /// Names of markers already present on the class, `@` stripped
    pub annotations: Vec<String>,

    /// Offset of the start of the declaration's first line
    pub insert_at: usize,

    /// Leading whitespace of the declaration line
    pub indent: String,

    pub fields: Vec<FieldView>,
    pub constructors: Vec<ConstructorView>,
}

#[derive(Debug, Clone)]
pub struct FieldView {
    pub name: String,
    pub annotations: Vec<String>,
    pub insert_at: usize,
    pub indent: String,
}

#[derive(Debug, Clone)]
pub struct ConstructorView {
    pub annotations: Vec<String>,
    pub insert_at: usize,
    pub indent: String,
    pub params: Vec<ParamView>,
}

#[derive(Debug, Clone)]
pub struct ParamView {
    pub name: String,
    pub annotations: Vec<String>,
    /// Offset of the parameter itself; inline markers go right here
    pub insert_at: usize,
}

impl ClassView {
    pub fn has_marker(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Constructor matched by parameter count alone; first hit wins.
    pub fn constructor_with_arity(&self, param_count: usize) -> Option<&ConstructorView> {
        self.constructors
            .iter()
            .find(|c| c.params.len() == param_count)
    }
}

impl FieldView {
    pub fn has_marker(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }
}

impl ConstructorView {
    pub fn has_marker(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }
}

impl ParamView {
    pub fn has_marker(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }
}

/// Parsed structure view of one source file.
#[derive(Debug)]
pub struct JavaSource {
    classes: Vec<ClassView>,
}

impl JavaSource {
    /// Parse source text into class structure views.
    pub fn parse(content: &str) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| RewriteError::grammar(format!("Failed to set language: {e}")))?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| RewriteError::source_parse("Failed to parse source file"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(RewriteError::source_parse(
                "Source file contains syntax errors",
            ));
        }

        let mut classes = Vec::new();
        collect_classes(content, root, &mut classes);
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[ClassView] {
        &self.classes
    }

    /// First declaration whose name matches exactly, in tree order.
    pub fn find_class(&self, unqualified_name: &str) -> Option<&ClassView> {
        self.classes.iter().find(|c| c.name == unqualified_name)
    }
}

fn collect_classes(content: &str, node: Node, out: &mut Vec<ClassView>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "class_declaration" {
            if let Some(view) = class_view(content, child) {
                out.push(view);
            }
        }
        collect_classes(content, child, out);
    }
}

fn class_view(content: &str, node: Node) -> Option<ClassView> {
    let name = field_text(content, node, "name")?;
    let (insert_at, indent) = line_anchor(content, node.start_byte());

    let mut fields = Vec::new();
    let mut constructors = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            match member.kind() {
                "field_declaration" => {
                    if let Some(view) = field_view(content, member) {
                        fields.push(view);
                    }
                }
                "constructor_declaration" => {
                    constructors.push(constructor_view(content, member));
                }
                _ => {}
            }
        }
    }

    Some(ClassView {
        name,
        annotations: annotation_names(content, node),
        insert_at,
        indent,
        fields,
        constructors,
    })
}

fn field_view(content: &str, node: Node) -> Option<FieldView> {
    // Multi-declarator fields use the first declared name, matching how the
    // planner locates injection targets.
    let declarator = node
        .child_by_field_name("declarator")
        .filter(|d| d.kind() == "variable_declarator")?;
    let name = field_text(content, declarator, "name")?;
    let (insert_at, indent) = line_anchor(content, node.start_byte());

    Some(FieldView {
        name,
        annotations: annotation_names(content, node),
        insert_at,
        indent,
    })
}

fn constructor_view(content: &str, node: Node) -> ConstructorView {
    let (insert_at, indent) = line_anchor(content, node.start_byte());

    let mut params = Vec::new();
    if let Some(list) = node.child_by_field_name("parameters") {
        let mut cursor = list.walk();
        for param in list.children(&mut cursor) {
            if param.kind() != "formal_parameter" {
                continue;
            }
            let Some(name) = field_text(content, param, "name") else {
                continue;
            };
            params.push(ParamView {
                name,
                annotations: annotation_names(content, param),
                insert_at: param.start_byte(),
            });
        }
    }

    ConstructorView {
        annotations: annotation_names(content, node),
        insert_at,
        indent,
        params,
    }
}

/// Marker names attached to a declaration, as written, `@` stripped and
/// argument lists ignored.
fn annotation_names(content: &str, node: Node) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "modifiers" {
            continue;
        }
        let mut inner = child.walk();
        for modifier in child.children(&mut inner) {
            if matches!(modifier.kind(), "marker_annotation" | "annotation") {
                if let Some(name) = field_text(content, modifier, "name") {
                    names.push(name);
                }
            }
        }
    }
    names
}

fn field_text(content: &str, node: Node, field: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|n| content[n.start_byte()..n.end_byte()].to_string())
}

/// Start-of-line offset and leading whitespace for the line containing
/// `offset`. Whole-line marker insertions anchor here.
fn line_anchor(content: &str, offset: usize) -> (usize, String) {
    let line_start = content[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let indent: String = content[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();
    (line_start, indent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"package com.example.service;

@Deprecated
public class UserServiceImpl implements UserService {

    @Autowired
    private UserDao userDao;

    private int maxUsers;

    public UserServiceImpl(UserDao userDao, EmailService emailService) {
        this.userDao = userDao;
    }

    public void createUser(String name) {
    }
}
"#;

    #[test]
    fn parses_class_fields_and_constructors() {
        let source = JavaSource::parse(SAMPLE).unwrap();
        let class = source.find_class("UserServiceImpl").unwrap();

        assert_eq!(class.annotations, vec!["Deprecated"]);
        assert_eq!(class.fields.len(), 2);
        assert_eq!(class.fields[0].name, "userDao");
        assert_eq!(class.fields[0].annotations, vec!["Autowired"]);
        assert_eq!(class.fields[1].name, "maxUsers");
        assert!(class.fields[1].annotations.is_empty());

        assert_eq!(class.constructors.len(), 1);
        let ctor = &class.constructors[0];
        assert_eq!(ctor.params.len(), 2);
        assert_eq!(ctor.params[0].name, "userDao");
        assert_eq!(ctor.params[1].name, "emailService");
    }

    #[test]
    fn class_anchor_points_at_annotation_line() {
        let source = JavaSource::parse(SAMPLE).unwrap();
        let class = source.find_class("UserServiceImpl").unwrap();

        // Declaration (including its modifiers) starts at the @Deprecated line.
        let line = &SAMPLE[class.insert_at..SAMPLE[class.insert_at..]
            .find('\n')
            .map(|i| class.insert_at + i)
            .unwrap()];
        assert_eq!(line, "@Deprecated");
        assert_eq!(class.indent, "");
    }

    #[test]
    fn field_indent_is_preserved() {
        let source = JavaSource::parse(SAMPLE).unwrap();
        let class = source.find_class("UserServiceImpl").unwrap();
        assert_eq!(class.fields[1].indent, "    ");
    }

    #[test]
    fn nested_classes_are_visible() {
        let source = JavaSource::parse(
            "public class Outer {\n    public static class InnerDao {\n    }\n}\n",
        )
        .unwrap();
        assert!(source.find_class("Outer").is_some());
        assert!(source.find_class("InnerDao").is_some());
    }

    #[test]
    fn constructor_lookup_by_arity() {
        let source = JavaSource::parse(
            "public class A {\n    public A() {}\n    public A(int x, int y) {}\n}\n",
        )
        .unwrap();
        let class = source.find_class("A").unwrap();
        assert!(class.constructor_with_arity(2).is_some());
        assert!(class.constructor_with_arity(0).is_some());
        assert!(class.constructor_with_arity(3).is_none());
    }

    #[test]
    fn syntax_errors_are_rejected() {
        let err = JavaSource::parse("public class A { int = ; }").unwrap_err();
        assert!(matches!(err, RewriteError::SourceParse(_)));
    }

    #[test]
    fn missing_class_is_none() {
        let source = JavaSource::parse("public class A {}\n").unwrap();
        assert!(source.find_class("B").is_none());
    }
}

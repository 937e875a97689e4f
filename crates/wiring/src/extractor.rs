use roxmltree::{Document, Node};
use std::fs;
use std::path::Path;

use crate::error::{Result, WiringError};
use crate::record::{ConstructorBinding, PropertyBinding, WiringRecord};

/// Content markers that identify an XML file as a wiring descriptor. Any
/// other XML file is ignored entirely by discovery.
const DESCRIPTOR_MARKERS: &[&str] = &[
    "xmlns:beans",
    "http://www.springframework.org/schema/beans",
    "<bean",
    "context:component-scan",
    "aop:config",
    "tx:advice",
];

/// Synthetic type names for directive elements. They resolve to no source
/// file, so downstream reports them as follow-up work instead of rewriting.
const SCAN_DIRECTIVE_TYPE: &str = "org.springframework.context.annotation.ComponentScan";
const IMPORT_DIRECTIVE_TYPE: &str = "org.springframework.context.annotation.Import";

/// Check whether file content looks like a wiring descriptor
pub fn is_wiring_descriptor(content: &str) -> bool {
    DESCRIPTOR_MARKERS.iter().any(|m| content.contains(m))
}

/// Parses wiring descriptors into lists of [`WiringRecord`]s.
pub struct RecordExtractor;

impl RecordExtractor {
    /// Extract every wiring record from a descriptor file.
    ///
    /// Fails with [`WiringError::MarkupParse`] when the file is not
    /// well-formed; callers treat that as fatal for this file only.
    pub fn extract(path: &Path) -> Result<Vec<WiringRecord>> {
        log::info!("Parsing descriptor: {}", path.display());
        let content = fs::read_to_string(path)?;
        let records = Self::extract_from_str(&content, path)?;
        log::info!("Parsed {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Extract records from descriptor content already in memory.
    pub fn extract_from_str(content: &str, source: &Path) -> Result<Vec<WiringRecord>> {
        let doc =
            Document::parse(content).map_err(|e| WiringError::markup_parse(source, e))?;

        let mut records = Vec::new();

        // Component declarations first, then directives, matching the order
        // downstream reports list them in.
        for node in Self::elements_named(&doc, "bean") {
            records.push(Self::component_record(&doc, node, source));
        }
        for node in Self::elements_named(&doc, "component-scan") {
            records.push(Self::scan_record(&doc, node, source));
        }
        for node in Self::elements_named(&doc, "import") {
            records.push(Self::import_record(&doc, node, source));
        }

        Ok(records)
    }

    fn elements_named<'a>(
        doc: &'a Document<'a>,
        local_name: &'a str,
    ) -> impl Iterator<Item = Node<'a, 'a>> {
        doc.descendants()
            .filter(move |n| n.is_element() && n.tag_name().name() == local_name)
    }

    fn component_record(doc: &Document<'_>, node: Node<'_, '_>, source: &Path) -> WiringRecord {
        let mut record = WiringRecord::new(
            node.attribute("id").unwrap_or_default(),
            node.attribute("class").unwrap_or_default(),
        );

        if let Some(scope) = node.attribute("scope").filter(|s| !s.is_empty()) {
            record.scope = scope.to_string();
        }
        record.lazy = bool_attribute(node, "lazy-init");
        record.primary = bool_attribute(node, "primary");
        record.init_method = owned_attribute(node, "init-method");
        record.destroy_method = owned_attribute(node, "destroy-method");

        for child in node.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "property" => record.properties.push(Self::property_binding(child)),
                "constructor-arg" => record
                    .constructor_args
                    .push(Self::constructor_binding(child)),
                _ => {}
            }
        }

        // Every attribute survives, unknown ones included; downstream logic
        // only reads the known set.
        for attr in node.attributes() {
            record
                .raw_attributes
                .insert(attr.name().to_string(), attr.value().to_string());
        }

        Self::stamp_origin(&mut record, doc, node, source);
        record
    }

    fn property_binding(node: Node<'_, '_>) -> PropertyBinding {
        let mut binding = PropertyBinding::new(node.attribute("name").unwrap_or_default());
        binding.type_hint = owned_attribute(node, "type");

        // Precedence: value attribute > ref attribute > nested child element.
        if let Some(value) = node.attribute("value").filter(|v| !v.is_empty()) {
            binding.value = Some(value.to_string());
        } else if let Some(ref_id) = node.attribute("ref").filter(|r| !r.is_empty()) {
            binding.ref_id = Some(ref_id.to_string());
        } else {
            for child in node.children().filter(Node::is_element) {
                match child.tag_name().name() {
                    "list" => {
                        binding.is_list = true;
                        binding.value = Some(flatten_list_values(child));
                    }
                    // Map/set composites are recognized but their items are
                    // not extracted; the empty binding surfaces as an
                    // unsupported-element follow-up downstream.
                    "map" => binding.is_map = true,
                    "set" => binding.is_set = true,
                    "value" => binding.value = Some(child.text().unwrap_or_default().to_string()),
                    "ref" => binding.ref_id = owned_attribute(child, "bean"),
                    _ => {}
                }
            }
        }

        binding
    }

    fn constructor_binding(node: Node<'_, '_>) -> ConstructorBinding {
        let mut binding = ConstructorBinding {
            name: owned_attribute(node, "name"),
            type_hint: owned_attribute(node, "type"),
            ..Default::default()
        };

        if let Some(index) = node.attribute("index").filter(|i| !i.is_empty()) {
            match index.parse::<u32>() {
                Ok(parsed) => binding.index = Some(parsed),
                Err(_) => log::warn!("Invalid index value: {index}"),
            }
        }

        if let Some(value) = node.attribute("value").filter(|v| !v.is_empty()) {
            binding.value = Some(value.to_string());
        } else if let Some(ref_id) = node.attribute("ref").filter(|r| !r.is_empty()) {
            binding.ref_id = Some(ref_id.to_string());
        } else {
            for child in node.children().filter(Node::is_element) {
                match child.tag_name().name() {
                    "value" => binding.value = Some(child.text().unwrap_or_default().to_string()),
                    "ref" => binding.ref_id = owned_attribute(child, "bean"),
                    _ => {}
                }
            }
        }

        binding
    }

    /// A scan directive becomes a synthetic record with one `basePackage`
    /// property: a wholesale auto-discovery declaration, not a component.
    fn scan_record(doc: &Document<'_>, node: Node<'_, '_>, source: &Path) -> WiringRecord {
        let mut record = WiringRecord::new("componentScan", SCAN_DIRECTIVE_TYPE);
        record.properties.push(PropertyBinding::with_value(
            "basePackage",
            node.attribute("base-package").unwrap_or_default(),
        ));
        Self::stamp_origin(&mut record, doc, node, source);
        record
    }

    fn import_record(doc: &Document<'_>, node: Node<'_, '_>, source: &Path) -> WiringRecord {
        let mut record = WiringRecord::new("import", IMPORT_DIRECTIVE_TYPE);
        record.properties.push(PropertyBinding::with_value(
            "resource",
            node.attribute("resource").unwrap_or_default(),
        ));
        Self::stamp_origin(&mut record, doc, node, source);
        record
    }

    fn stamp_origin(
        record: &mut WiringRecord,
        doc: &Document<'_>,
        node: Node<'_, '_>,
        source: &Path,
    ) {
        record.source_file = source.to_path_buf();
        record.line_number = doc.text_pos_at(node.range().start).row;
    }
}

fn bool_attribute(node: Node<'_, '_>, name: &str) -> bool {
    node.attribute(name)
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn owned_attribute(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn flatten_list_values(list: Node<'_, '_>) -> String {
    list.children()
        .filter(|n| n.is_element() && n.tag_name().name() == "value")
        .map(|n| n.text().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn extract(content: &str) -> Vec<WiringRecord> {
        RecordExtractor::extract_from_str(content, Path::new("beans.xml")).unwrap()
    }

    #[test]
    fn parses_component_declaration_with_attributes() {
        let records = extract(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<beans xmlns="http://www.springframework.org/schema/beans">
    <bean id="userService" class="com.example.service.UserServiceImpl"
          scope="prototype" lazy-init="TRUE" primary="true"
          init-method="setUp" destroy-method="tearDown" depends-on="other"/>
</beans>"#,
        );

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, "userService");
        assert_eq!(record.type_name, "com.example.service.UserServiceImpl");
        assert_eq!(record.scope, "prototype");
        assert!(record.lazy);
        assert!(record.primary);
        assert_eq!(record.init_method.as_deref(), Some("setUp"));
        assert_eq!(record.destroy_method.as_deref(), Some("tearDown"));
        assert_eq!(
            record.raw_attributes.get("depends-on").map(String::as_str),
            Some("other")
        );
        assert_eq!(record.source_file, PathBuf::from("beans.xml"));
        assert_eq!(record.line_number, 3);
    }

    #[test]
    fn boolean_attributes_default_to_false() {
        let records = extract(
            r#"<beans><bean id="a" class="com.example.A" lazy-init="yes" primary=""/></beans>"#,
        );
        assert!(!records[0].lazy);
        assert!(!records[0].primary);
        assert_eq!(records[0].scope, "singleton");
    }

    #[test]
    fn value_attribute_wins_over_nested_children() {
        let records = extract(
            r#"<beans>
    <bean id="a" class="com.example.A">
        <property name="maxUsers" value="100"><value>999</value></property>
        <property name="userDao" ref="userDao"/>
    </bean>
</beans>"#,
        );

        let props = &records[0].properties;
        assert_eq!(props[0].value.as_deref(), Some("100"));
        assert!(props[0].is_value());
        assert_eq!(props[1].ref_id.as_deref(), Some("userDao"));
        assert!(props[1].is_reference());
    }

    #[test]
    fn nested_value_and_ref_elements_are_extracted() {
        let records = extract(
            r#"<beans>
    <bean id="a" class="com.example.A">
        <property name="timeout"><value>30</value></property>
        <property name="emailService"><ref bean="emailService"/></property>
    </bean>
</beans>"#,
        );

        let props = &records[0].properties;
        assert_eq!(props[0].value.as_deref(), Some("30"));
        assert_eq!(props[1].ref_id.as_deref(), Some("emailService"));
    }

    #[test]
    fn list_values_are_flattened_comma_joined() {
        let records = extract(
            r#"<beans>
    <bean id="a" class="com.example.A">
        <property name="servers">
            <list><value>alpha</value><value>beta</value></list>
        </property>
    </bean>
</beans>"#,
        );

        let prop = &records[0].properties[0];
        assert!(prop.is_list);
        assert_eq!(prop.value.as_deref(), Some("alpha,beta"));
    }

    #[test]
    fn map_and_set_are_recognized_but_not_extracted() {
        let records = extract(
            r#"<beans>
    <bean id="a" class="com.example.A">
        <property name="lookup">
            <map><entry key="k" value="v"/></map>
        </property>
        <property name="tags">
            <set><value>x</value></set>
        </property>
    </bean>
</beans>"#,
        );

        let props = &records[0].properties;
        assert!(props[0].is_map);
        assert!(props[0].is_unsupported());
        assert!(props[1].is_set);
        assert!(props[1].is_unsupported());
    }

    #[test]
    fn constructor_args_keep_declaration_order_and_index() {
        let records = extract(
            r#"<beans>
    <bean id="a" class="com.example.A">
        <constructor-arg index="0" ref="userDao"/>
        <constructor-arg index="bogus" value="42"/>
        <constructor-arg name="label"><value>primary</value></constructor-arg>
    </bean>
</beans>"#,
        );

        let args = &records[0].constructor_args;
        assert_eq!(args.len(), 3);
        assert_eq!(args[0].index, Some(0));
        assert!(args[0].is_reference());
        assert_eq!(args[1].index, None);
        assert_eq!(args[1].value.as_deref(), Some("42"));
        assert_eq!(args[2].name.as_deref(), Some("label"));
        assert_eq!(args[2].value.as_deref(), Some("primary"));
    }

    #[test]
    fn scan_directive_becomes_synthetic_record() {
        let records = extract(
            r#"<beans xmlns:context="http://www.springframework.org/schema/context">
    <context:component-scan base-package="com.example"/>
</beans>"#,
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "componentScan");
        assert_eq!(records[0].properties.len(), 1);
        assert_eq!(records[0].properties[0].name, "basePackage");
        assert_eq!(records[0].properties[0].value.as_deref(), Some("com.example"));
    }

    #[test]
    fn import_directive_becomes_synthetic_record() {
        let records = extract(
            r#"<beans><import resource="classpath:more-beans.xml"/></beans>"#,
        );

        assert_eq!(records[0].id, "import");
        assert_eq!(
            records[0].properties[0].value.as_deref(),
            Some("classpath:more-beans.xml")
        );
    }

    #[test]
    fn malformed_markup_is_a_parse_error() {
        let err = RecordExtractor::extract_from_str(
            "<beans><bean id=\"a\"</beans>",
            Path::new("broken.xml"),
        )
        .unwrap_err();
        assert!(matches!(err, WiringError::MarkupParse { .. }));
    }

    #[test]
    fn descriptor_sniff_accepts_known_markers_only() {
        assert!(is_wiring_descriptor("<beans><bean id=\"a\"/></beans>"));
        assert!(is_wiring_descriptor(
            "<x xmlns=\"http://www.springframework.org/schema/beans\"/>"
        ));
        assert!(is_wiring_descriptor("<tx:advice id=\"t\"/>"));
        assert!(!is_wiring_descriptor("<project><dependency/></project>"));
    }
}

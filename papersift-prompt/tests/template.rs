use std::collections::HashMap;

use papersift_prompt::PromptTemplate;

#[test]
fn renders_template_with_vars() {
    let tmpl = PromptTemplate::new("Hello {{name}}");
    let vars = HashMap::from([("name", "Sift".to_string())]);
    assert_eq!(tmpl.render(&vars), "Hello Sift");
}

#[test]
fn does_not_confuse_overlapping_keys() {
    let tmpl = PromptTemplate::new("{{name}} {{ fullname }}");
    let vars = HashMap::from([("name", "X".to_string()), ("fullname", "Y".to_string())]);
    assert_eq!(tmpl.render(&vars), "X Y");
}

#[test]
fn missing_vars_render_empty() {
    let tmpl = PromptTemplate::new("[{{missing}}]");
    assert_eq!(tmpl.render(&HashMap::new()), "[]");
}

#[test]
fn substituted_values_are_not_rescanned() {
    let tmpl = PromptTemplate::new("{{a}}");
    let vars = HashMap::from([("a", "{{b}}".to_string()), ("b", "nope".to_string())]);
    assert_eq!(tmpl.render(&vars), "{{b}}");
}

#[test]
fn lists_variables_once_in_order() {
    let tmpl = PromptTemplate::new("{{b}} {{a}} {{b}}");
    assert_eq!(tmpl.variables(), vec!["b".to_string(), "a".to_string()]);
}

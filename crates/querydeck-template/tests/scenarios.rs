//! End-to-end templating scenarios.

use querydeck_template::{extract, substitute, unresolved, Variable, VariableType};

#[test]
fn test_typed_where_clause() {
    let template = "SELECT * FROM t WHERE id = {{id}} AND active = {{flag}}";
    let vars = vec![
        Variable::new("id").with_type("number").with_value("5"),
        Variable::new("flag").with_type("boolean"),
    ];

    assert_eq!(
        substitute(template, &vars),
        "SELECT * FROM t WHERE id = 5 AND active = FALSE"
    );
}

#[test]
fn test_repeated_placeholder() {
    let template = "{{a}} {{a}}";

    let extracted = extract(template);
    assert_eq!(extracted.len(), 1);

    let vars = vec![Variable::new("a").with_value("x")];
    assert_eq!(substitute(template, &vars), "'x' 'x'");
}

#[test]
fn test_extract_then_fill_in() {
    let template = "SELECT region, SUM(amount) FROM sales \
                    WHERE day >= {{start}} AND region = {{region}} GROUP BY region";

    let mut vars = extract(template);
    for var in vars.iter_mut() {
        match var.name.as_str() {
            "start" => {
                var.var_type = VariableType::Date;
                var.value = "2024-01-01".into();
            }
            "region" => var.value = "EMEA".into(),
            _ => unreachable!(),
        }
    }

    assert_eq!(
        substitute(template, &vars),
        "SELECT region, SUM(amount) FROM sales \
         WHERE day >= '2024-01-01' AND region = 'EMEA' GROUP BY region"
    );
}

#[test]
fn test_partial_bindings_leave_placeholders() {
    let template = "SELECT {{cols}} FROM {{table}}";
    let vars = vec![Variable::new("table").with_type("number").with_value("events")];

    assert_eq!(substitute(template, &vars), "SELECT {{cols}} FROM events");
    assert_eq!(unresolved(template, &vars), ["cols"]);
}

#[test]
fn test_variables_from_json() {
    let json = r#"[
        {"name": "limit", "type": "number", "value": "10"},
        {"name": "since", "type": "date", "value": "2024-02-01"}
    ]"#;
    let vars: Vec<Variable> = serde_json::from_str(json).unwrap();

    assert_eq!(
        substitute("WHERE ts > {{since}} LIMIT {{limit}}", &vars),
        "WHERE ts > '2024-02-01' LIMIT 10"
    );
}

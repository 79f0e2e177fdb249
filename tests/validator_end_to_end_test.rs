/// End-to-end checks of rule sets and validators over plain Rust structs.
///
/// The entities mirror a small domain: an entity holding an array of
/// sub-entities, a string array and an optional sub-entity.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use fieldrules::prelude::*;

    struct SubEntity {
        test_prop: Option<String>,
        secondary_sub: Vec<String>,
    }

    struct TestEntity {
        sub_class_array: Vec<SubEntity>,
        string_array: Vec<String>,
        sub_class: Option<SubEntity>,
    }

    impl Walkable for SubEntity {
        fn type_name(&self) -> &str {
            "SubEntity"
        }

        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new("testProp", self.test_prop.as_deref().map(FieldValue::text).into()),
                Field::new("secondarySub", FieldValue::texts(&self.secondary_sub)),
            ]
        }
    }

    impl Walkable for TestEntity {
        fn type_name(&self) -> &str {
            "TestEntity"
        }

        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new("subClassArray", FieldValue::objects(&self.sub_class_array)),
                Field::new("stringArray", FieldValue::texts(&self.string_array)),
                Field::new("subClass", self.sub_class.as_ref().map(FieldValue::object).into()),
            ]
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn entity_with_prop(prop: &str) -> TestEntity {
        TestEntity {
            sub_class_array: vec![SubEntity {
                test_prop: Some(prop.to_string()),
                secondary_sub: Vec::new(),
            }],
            string_array: Vec::new(),
            sub_class: None,
        }
    }

    fn entity_with_strings(values: &[&str]) -> TestEntity {
        TestEntity {
            sub_class_array: Vec::new(),
            string_array: strings(values),
            sub_class: None,
        }
    }

    fn sub_with_secondary(values: &[&str]) -> SubEntity {
        SubEntity {
            test_prop: None,
            secondary_sub: strings(values),
        }
    }

    fn comparison_set(seen: Arc<Mutex<Vec<String>>>) -> RuleSet {
        RuleSet::new(vec![Rule::builder("Test rule")
            .field("Entity", "stringArray")
            .compare_to(FieldComparison::new("SubEntity", "secondarySub"))
            .build()
            .unwrap()])
        .on_invalid(move |field| seen.lock().unwrap().push(field.value.clone()))
    }

    #[test]
    fn test_case_sensitive_pattern_fails() {
        let set = RuleSet::new(vec![Rule::builder("Test rule")
            .field("Entity.subClassArray", "testProp")
            .index(0)
            .pattern("^.*Test.*$")
            .build()
            .unwrap()])
        .on_invalid(|_| {});

        let t = entity_with_prop("this is a TEST");
        let report = set.run(&[&t]);

        assert!(!report.succeeded);
        assert_eq!(report.rejected_fields.len(), 1);
        assert_eq!(report.rejected_fields[0].value, "this is a TEST");
        assert_eq!(report.rejected_fields[0].path, "Entity.subClassArray.testProp");
    }

    #[test]
    fn test_pattern_fails_for_other_text() {
        let set = RuleSet::new(vec![Rule::builder("Test rule")
            .field("TestEntity.subClassArray", "testProp")
            .index(0)
            .pattern("^.*TEST.*$")
            .build()
            .unwrap()]);

        let t = entity_with_prop("this is not a....");
        assert!(!set.run(&[&t]).succeeded);
    }

    #[test]
    fn test_comparison_same_multiset_different_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let t = entity_with_strings(&["v1", "v2"]);
        let t1 = sub_with_secondary(&["v2", "v1"]);

        let set = comparison_set(Arc::clone(&seen));
        let report = set.run(&[&t, &t1]);
        assert!(report.succeeded);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_comparison_size_mismatch_reports_all_elements() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let t = entity_with_strings(&["v1"]);
        let t1 = sub_with_secondary(&["v1", "v2"]);

        let set = comparison_set(Arc::clone(&seen));
        let report = set.run(&[&t, &t1]);
        assert!(!report.succeeded);
        assert_eq!(*seen.lock().unwrap(), vec!["v1", "v1", "v2"]);
    }

    #[test]
    fn test_comparison_duplicate_values_fail() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let t = entity_with_strings(&["valor1", "valor1"]);
        let t1 = sub_with_secondary(&["valor1", "valor2"]);

        let set = comparison_set(Arc::clone(&seen));
        let report = set.run(&[&t, &t1]);
        assert!(!report.succeeded);
        assert_eq!(*seen.lock().unwrap(), vec!["valor1", "valor2"]);
    }

    #[test]
    fn test_validator_aggregates_across_rule_sets() {
        let failing = RuleSet::new(vec![
            Rule::builder("prop is lowercase")
                .field("Entity.subClassArray", "testProp")
                .pattern("[a-z ]+")
                .build()
                .unwrap(),
            Rule::builder("not reached")
                .field("Entity", "stringArray")
                .pattern(".*")
                .build()
                .unwrap(),
        ]);
        let passing = RuleSet::new(vec![Rule::builder("prop mentions TEST")
            .field("Entity.subClassArray", "testProp")
            .pattern(".*TEST.*")
            .build()
            .unwrap()]);

        let validator = Validator::new("aggregate", vec![failing, passing]);
        let t = entity_with_prop("this is a TEST");
        let result = validator.execute(&[&t]);

        assert!(!result.succeeded);
        assert_eq!(result.failed_rule_names(), vec!["prop is lowercase"]);
        assert_eq!(result.not_ran_rules[0].name(), "not reached");
        assert_eq!(result.succeeded_rules[0].name(), "prop mentions TEST");
    }

    #[test]
    fn test_skip_on_error_probe_in_validator() {
        let only_for_arrays = RuleSet::new(vec![
            Rule::builder("has sub entities")
                .field("Entity.subClassArray", "testProp")
                .pattern(".+")
                .build()
                .unwrap(),
            Rule::builder("props are upper")
                .field("Entity.subClassArray", "testProp")
                .pattern("[A-Z ]+")
                .build()
                .unwrap(),
        ])
        .skip_on_error(true);

        let validator = Validator::new("probe", vec![only_for_arrays]);

        let without_array = entity_with_strings(&["x"]);
        let result = validator.execute(&[&without_array]);
        assert!(result.succeeded);
        assert!(result.failed_rules.is_empty());

        let lower = entity_with_prop("lower case");
        let result = validator.execute(&[&lower]);
        assert!(!result.succeeded);
        assert_eq!(result.failed_rule_names(), vec!["props are upper"]);
    }

    #[test]
    fn test_validator_is_reusable_across_threads() {
        let validator = Arc::new(Validator::new(
            "shared",
            vec![RuleSet::new(vec![Rule::builder("upper")
                .field("Entity.subClassArray", "testProp")
                .pattern("[A-Z]+")
                .build()
                .unwrap()])],
        ));

        let handles: Vec<_> = ["ABC", "abc"]
            .into_iter()
            .map(|prop| {
                let validator = Arc::clone(&validator);
                std::thread::spawn(move || {
                    let t = entity_with_prop(prop);
                    validator.execute(&[&t]).succeeded
                })
            })
            .collect();

        let outcomes: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(outcomes, vec![true, false]);
    }

    #[test]
    fn test_result_serializes_to_json() {
        let validator = Validator::new(
            "json",
            vec![RuleSet::new(vec![Rule::builder("upper")
                .field("Entity.subClassArray", "testProp")
                .pattern("[A-Z]+")
                .build()
                .unwrap()])],
        );

        let t = entity_with_prop("abc");
        let json: serde_json::Value =
            serde_json::from_str(&validator.execute(&[&t]).to_json().unwrap()).unwrap();

        assert_eq!(json["succeeded"], false);
        assert_eq!(json["failedRules"][0], "upper");
        assert_eq!(json["rejectedFields"][0]["owner"], "SubEntity");
        assert_eq!(json["rejectedFields"][0]["value"], "abc");
    }
}

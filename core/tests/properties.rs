use tool_schema_core::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sample_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("zebra").required(true),
        FieldDefinition::new("apple")
            .with_type("number")
            .with_min(0)
            .with_max(10),
        FieldDefinition::new("mango").with_options(vec![
            OptionPair::new("ripe", "Ripe"),
            OptionPair::new("green", "Green"),
        ]),
        FieldDefinition::new("Banana").with_type("checkbox").required(true),
    ]
}

/// Every permutation of `items`, generated with Heap's algorithm.
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    fn heap<T: Clone>(k: usize, items: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
        if k <= 1 {
            out.push(items.clone());
            return;
        }
        heap(k - 1, items, out);
        for i in 0..k - 1 {
            if k % 2 == 0 {
                items.swap(i, k - 1);
            } else {
                items.swap(0, k - 1);
            }
            heap(k - 1, items, out);
        }
    }

    let mut items = items.to_vec();
    let mut out = Vec::new();
    heap(items.len(), &mut items, &mut out);
    out
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn test_compile_is_byte_identical_for_all_permutations() {
    let fields = sample_fields();
    let expected = compile(&fields).to_json_string();

    let all = permutations(&fields);
    assert_eq!(all.len(), 24);
    for permuted in all {
        assert_eq!(compile(&permuted).to_json_string(), expected);
    }
}

#[test]
fn test_compile_orders_properties_and_required() {
    let schema = compile(&sample_fields());
    assert_eq!(
        schema.property_names(),
        vec!["apple", "Banana", "mango", "zebra"]
    );
    assert_eq!(schema.required, vec!["Banana", "zebra"]);
}

#[test]
fn test_zebra_apple_mango_scenario() {
    let first = compile(&[
        FieldDefinition::new("zebra"),
        FieldDefinition::new("apple"),
        FieldDefinition::new("mango"),
    ]);
    let second = compile(&[
        FieldDefinition::new("mango"),
        FieldDefinition::new("apple"),
        FieldDefinition::new("zebra"),
    ]);
    assert_eq!(first.property_names(), vec!["apple", "mango", "zebra"]);
    assert_eq!(second.property_names(), vec!["apple", "mango", "zebra"]);
    assert_eq!(first.to_json_string(), second.to_json_string());
}

// ---------------------------------------------------------------------------
// Merge precedence
// ---------------------------------------------------------------------------

#[test]
fn test_registered_attributes_always_reach_compiled_output() {
    let tree = vec![
        FieldDefinition::new("email")
            .with_type("email")
            .with_description("from tree")
            .required(true),
    ];
    let mut overrides = OverrideMap::new();
    overrides.insert(
        "email".into(),
        FieldOverride::default()
            .with_description("Recipient")
            .required(true)
            .with_title("Email"),
    );
    let mut registry = FieldRegistry::new();
    registry.register(
        FieldDefinition::new("email")
            .with_description("Context override")
            .required(false),
    );

    let schema = compile_merged(&merge_fields(&tree, &overrides, &registry));
    let email = schema.properties.get("email").unwrap();
    assert_eq!(email.description.as_deref(), Some("Context override"));
    assert_eq!(email.title.as_deref(), Some("Email"));
    assert_eq!(email.schema_type, SchemaType::String);
    assert!(schema.required.is_empty());
}

#[test]
fn test_merge_is_independent_of_registration_order() {
    let tree = sample_fields();

    let mut forward = FieldRegistry::new();
    forward.register(FieldDefinition::new("apple").with_title("A"));
    forward.register(FieldDefinition::new("kiwi"));

    let mut backward = FieldRegistry::new();
    backward.register(FieldDefinition::new("kiwi"));
    backward.register(FieldDefinition::new("apple").with_title("A"));

    let overrides = OverrideMap::new();
    assert_eq!(
        merge_fields(&tree, &overrides, &forward),
        merge_fields(&tree, &overrides, &backward)
    );
}

#[test]
fn test_override_synthesizes_missing_field() {
    let mut overrides = OverrideMap::new();
    overrides.insert(
        "extra".into(),
        FieldOverride::default().with_type("range").required(true),
    );
    let schema = compile_merged(&merge_fields(&[], &overrides, &FieldRegistry::new()));
    assert_eq!(
        schema.to_json_string(),
        r#"{"type":"object","properties":{"extra":{"type":"number"}},"required":["extra"]}"#
    );
}

// ---------------------------------------------------------------------------
// Fingerprints
// ---------------------------------------------------------------------------

#[test]
fn test_fingerprint_stable_across_reallocation() {
    let fields = sample_fields();
    let rebuilt: Vec<FieldDefinition> = fields
        .iter()
        .map(|f| serde_json::from_str(&serde_json::to_string(f).unwrap()).unwrap())
        .collect();

    assert_eq!(fingerprint_fields(&fields), fingerprint_fields(&rebuilt));
}

#[test]
fn test_fingerprint_tracks_every_attribute() {
    let base = FieldDefinition::new("f");
    let variants = vec![
        base.clone().with_type("number"),
        base.clone().required(true),
        base.clone().with_title("t"),
        base.clone().with_description("d"),
        base.clone().with_enum(["x"]),
        base.clone().with_options(vec![OptionPair::new("x", "X")]),
        base.clone().with_min(1),
        base.clone().with_max(1),
        base.clone().with_min_length(1),
        base.clone().with_max_length(1),
        base.clone().with_pattern("x"),
    ];

    let base_print = fingerprint_field(&base);
    for variant in &variants {
        assert_ne!(fingerprint_field(variant), base_print, "{variant:?}");
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_duplicate_email_produces_one_issue_and_strict_error() {
    let fields = vec![FieldDefinition::new("email"), FieldDefinition::new("email")];

    let issues = collect_issues(&fields);
    assert_eq!(issues.len(), 1);
    assert!(matches!(&issues[0], SchemaIssue::DuplicateName(name) if name == "email"));

    let options = ValidateOptions {
        dev_mode: true,
        strict: true,
    };
    let err = validate_fields(&fields, &options).unwrap_err();
    assert!(err.to_string().contains(ISSUE_PREFIX));
}

#[test]
fn test_partial_one_of_override_is_flagged() {
    let tree = vec![FieldDefinition::new("tier").with_options(vec![
        OptionPair::new("a", "A"),
        OptionPair::new("b", "B"),
    ])];
    let mut overrides = OverrideMap::new();
    overrides.insert(
        "tier".into(),
        FieldOverride::default().with_one_of(vec![OptionPair::new("c", "C")]),
    );

    let merged = merge_fields(&tree, &overrides, &FieldRegistry::new());
    let issues = collect_issues(&merged.to_fields());
    assert_eq!(
        issues,
        vec![SchemaIssue::OptionsMismatch {
            name: "tier".into()
        }]
    );
}

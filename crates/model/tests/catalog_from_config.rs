use ops_agent_model::{
    CannedReply, ModelCatalog, ModelDescriptor, ModelSelector, ReplyComposer,
};

const CATALOG_JSON: &str = r#"[
    { "id": "ops-mini", "name": "Ops Mini", "badge": "Fast" },
    {
        "id": "ops-max",
        "name": "Ops Max",
        "description": "For the hard questions",
        "badge": "Premium"
    }
]"#;

#[test]
fn test_catalog_from_json() {
    let models: Vec<ModelDescriptor> =
        serde_json::from_str(CATALOG_JSON).unwrap();
    let catalog = ModelCatalog::new(models);
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get("ops-mini").unwrap().description, "");

    let mut selector = ModelSelector::new(catalog, "ops-mini").unwrap();
    let composer = CannedReply::with_body("On it.");
    assert_eq!(
        composer.compose(selector.current(), "status?"),
        "[Ops Mini] On it."
    );

    selector.select("ops-max").unwrap();
    assert_eq!(
        composer.compose(selector.current(), "status?"),
        "[Ops Max] On it."
    );
    assert!(selector.select("gpt-4o").is_err());
    assert_eq!(selector.current().id, "ops-max");
}

#[test]
fn test_descriptor_serializes_all_fields() {
    let catalog = ModelCatalog::builtin();
    let value = serde_json::to_value(catalog.get("gpt-4.1").unwrap()).unwrap();
    assert_eq!(value["name"], "GPT-4.1");
    assert_eq!(value["badge"], "Official");
    assert!(value["description"].as_str().unwrap().contains("reasoning"));
}

use jmc_layout::{Migrator, SyncConfig, Synchronizer, Validator, VersionError};
use jmc_model::{ControlType, DocumentFormat, JusVersion, LayoutDocument};
use jmc_test_utils::{analysis_from_yaml, layout_from_yaml};
use pretty_assertions::assert_eq;
use serde_json::json;

const LEGACY_LAYOUT: &str = r#"{
  "title": "Correlation",
  "name": "corr",
  "stage": 0,
  "compilerMode": "tame",
  "children": [
    {
      "type": "VariableSupplier",
      "persistentItems": false,
      "stretchFactor": 1,
      "children": [
        {
          "type": "VariableTargetListBox",
          "name": "vars",
          "label": "Variables",
          "columns": [
            {
              "name": "column1",
              "type": "VariableLabel",
              "stretchFactor": 1
            }
          ]
        }
      ]
    },
    {
      "type": "LayoutBox",
      "margin": "large",
      "children": [
        { "type": "RadioButton", "name": "hypo_corr", "optionName": "hypo", "checkedValue": "corr" },
        { "type": "RadioButton", "name": "hypo_pos", "optionName": "hypo", "checkedValue": "pos" }
      ]
    }
  ]
}"#;

#[test]
fn test_json_legacy_layout_migrates_and_validates() {
    let mut doc = LayoutDocument::parse(LEGACY_LAYOUT, DocumentFormat::Json).unwrap();
    let outcome = Migrator::new().migrate(&mut doc).unwrap();

    assert_eq!(outcome.from, JusVersion::LEGACY);
    assert_eq!(outcome.to, JusVersion::CURRENT);
    assert!(outcome.rewritten);
    assert_eq!(doc.extra.get("compilerMode"), Some(&json!("tame")));

    let wrapper = &doc.children[0].child_nodes()[0];
    assert_eq!(wrapper.control, ControlType::TargetLayoutBox);
    let list = &wrapper.child_nodes()[0];
    assert_eq!(list.control, ControlType::VariablesListBox);
    let cell = list.columns.as_deref().unwrap()[0].template.as_deref().unwrap();
    assert_eq!(cell.control, ControlType::VariableLabel);

    let radios = doc.children[1].child_nodes();
    assert_eq!(radios[0].attr("focusValue"), Some(&json!("corr")));
    assert_eq!(radios[1].attr("focusValue"), Some(&json!("pos")));

    assert!(Validator::new().validate(&doc).is_ok());
}

#[test]
fn test_migrated_layout_roundtrips_through_yaml() {
    let mut doc = LayoutDocument::parse(LEGACY_LAYOUT, DocumentFormat::Json).unwrap();
    Migrator::new().migrate(&mut doc).unwrap();

    let yaml = doc.render(DocumentFormat::Yaml).unwrap();
    let reloaded = LayoutDocument::parse(&yaml, DocumentFormat::Yaml).unwrap();
    assert_eq!(reloaded, doc);

    let mut again = reloaded.clone();
    let outcome = Migrator::new().migrate(&mut again).unwrap();
    assert!(!outcome.upgraded());
    assert_eq!(again, reloaded);
}

#[test]
fn test_version_errors_leave_document_untouched() {
    let definition = analysis_from_yaml("name: demo\noptions:\n  - {name: a, type: Bool}\n");
    let sync = Synchronizer::new(SyncConfig::new());

    for tag in ["abc", "2", "1.x", "0.9", "2.1"] {
        let layout = layout_from_yaml(&format!("name: demo\njus: '{tag}'\nchildren: []\n"));
        let err = sync.sync(&definition, Some(layout)).unwrap_err();
        assert!(err.to_string().contains("layout 'demo'"), "{tag}: {err}");
    }

    let mut doc = layout_from_yaml("name: demo\njus: '9.0'\nchildren: []\n");
    let before = doc.clone();
    let err = Migrator::new().migrate(&mut doc).unwrap_err();
    assert!(matches!(err, VersionError::Newer { .. }));
    assert_eq!(doc, before);
}

use pretty_assertions::assert_eq;
use serde_json::json;
use strum::IntoEnumIterator;

use crate::column_classifier_impl::ColumnClassifier;
use crate::config_error::ConfigError;
use crate::config_structs::{
    column_mapping_struct::{ColumnMapping, ColumnRole},
    configuration_struct::ConfigurationDraft,
    dataset_struct::Dataset,
    draft_record_struct::DraftRecord,
    technique_struct::{Technique, TechniqueAssignment, TechniqueParameters},
};
use crate::wizard_step::WizardStep;

fn dataset(columns: &[&str]) -> Dataset {
    Dataset {
        id: "ds-1".to_string(),
        name: "patients".to_string(),
        column_names: columns.iter().map(|column| column.to_string()).collect(),
        ..Default::default()
    }
}

fn scenario_draft() -> ConfigurationDraft {
    ConfigurationDraft::for_dataset(&dataset(&["id", "age", "zip", "salary"]))
}

#[test]
fn test_classifier_maps_every_column_once() {
    let mappings = ColumnClassifier::classify(&dataset(&["id", "age", "zip", "age", "salary"]));

    assert_eq!(
        mappings,
        vec![
            ColumnMapping::new("id", ColumnRole::NonSensitive),
            ColumnMapping::new("age", ColumnRole::NonSensitive),
            ColumnMapping::new("zip", ColumnRole::NonSensitive),
            ColumnMapping::new("salary", ColumnRole::NonSensitive),
        ]
    );
}

#[test]
fn test_classifier_handles_empty_dataset() {
    assert!(ColumnClassifier::classify(&dataset(&[])).is_empty());
}

#[test]
fn test_new_draft_defaults() {
    let draft = scenario_draft();

    assert_eq!(draft.dataset_id(), "ds-1");
    assert_eq!(draft.name(), "Config for patients");
    assert!(draft.techniques().is_empty());
    assert_eq!(draft.column_mappings().len(), 4);
}

#[test]
fn test_reclassifying_as_identifier_clears_technique() {
    let mut draft = scenario_draft();
    draft.assign_default("age", Technique::Generalization).unwrap();

    let previous = draft.set_role("age", ColumnRole::Identifier);

    assert_eq!(previous, Some(ColumnRole::NonSensitive));
    assert!(draft.lookup("age").is_none());
    assert!(draft.assignable_columns().all(|mapping| mapping.column != "age"));
}

#[test]
fn test_reclassifying_to_other_role_keeps_technique() {
    let mut draft = scenario_draft();
    draft.assign_default("age", Technique::Suppression).unwrap();

    draft.set_role("age", ColumnRole::QuasiIdentifier);
    draft.set_role("age", ColumnRole::Sensitive);

    assert_eq!(draft.lookup("age").unwrap().technique(), Technique::Suppression);
}

#[test]
fn test_set_role_on_unknown_column_is_noop() {
    let mut draft = scenario_draft();
    let before = draft.clone();

    assert_eq!(draft.set_role("email", ColumnRole::Identifier), None);
    assert_eq!(draft, before);
}

#[test]
fn test_assign_upserts_by_column() {
    let mut draft = scenario_draft();
    draft
        .assign("zip", TechniqueParameters::Generalization { bins: 3 })
        .unwrap();
    draft
        .assign("zip", TechniqueParameters::Suppression { threshold: 0.4 })
        .unwrap();

    assert_eq!(draft.techniques().len(), 1);
    assert_eq!(
        draft.lookup("zip"),
        Some(&TechniqueAssignment::new(
            "zip",
            TechniqueParameters::Suppression { threshold: 0.4 }
        ))
    );
}

#[test]
fn test_clear_technique_leaves_column_unassigned() {
    let mut draft = scenario_draft();
    draft.assign_default("age", Technique::Generalization).unwrap();
    draft.assign_default("zip", Technique::Suppression).unwrap();

    assert_eq!(
        draft.clear_technique("age"),
        Some(TechniqueAssignment::with_defaults(
            "age",
            Technique::Generalization
        ))
    );
    assert_eq!(draft.clear_technique("age"), None);
    assert_eq!(draft.lookup("age"), None);
    assert_eq!(
        draft.techniques().to_vec(),
        vec![TechniqueAssignment::with_defaults("zip", Technique::Suppression)]
    );
    assert!(draft
        .to_payload()
        .unwrap()
        .techniques
        .iter()
        .all(|assignment| assignment.column != "age"));
}

#[test]
fn test_assign_rejects_identifier_unknown_and_out_of_range() {
    let mut draft = scenario_draft();
    draft.set_role("id", ColumnRole::Identifier);

    assert!(matches!(
        draft.assign_default("id", Technique::Generalization),
        Err(ConfigError::IdentifierColumn { .. })
    ));
    assert!(matches!(
        draft.assign_default("email", Technique::Generalization),
        Err(ConfigError::UnknownColumn { .. })
    ));
    assert!(matches!(
        draft.assign("age", TechniqueParameters::Generalization { bins: 11 }),
        Err(ConfigError::ParameterOutOfRange { parameter: "bins", .. })
    ));
    assert!(draft
        .assign("age", TechniqueParameters::Suppression { threshold: 1.2 })
        .is_err());
    assert!(draft
        .assign("age", TechniqueParameters::DifferentialPrivacy { epsilon: 0.0 })
        .is_err());
    assert!(draft.techniques().is_empty());
}

#[test]
fn test_technique_defaults() {
    assert_eq!(
        TechniqueAssignment::with_defaults("a", Technique::Generalization).parameters,
        TechniqueParameters::Generalization { bins: 5 }
    );
    assert_eq!(
        TechniqueAssignment::with_defaults("a", Technique::Suppression).parameters,
        TechniqueParameters::Suppression { threshold: 0.1 }
    );
    assert_eq!(
        TechniqueAssignment::with_defaults("a", Technique::DifferentialPrivacy).parameters,
        TechniqueParameters::DifferentialPrivacy { epsilon: 1.0 }
    );
    assert_eq!(
        TechniqueAssignment::with_defaults("a", Technique::None).parameters,
        TechniqueParameters::None
    );
}

#[test]
fn test_no_identifier_ever_carries_a_technique() {
    let mut draft = scenario_draft();
    let roles: Vec<ColumnRole> = ColumnRole::iter().collect();
    for (index, role) in roles.iter().cycle().take(12).enumerate() {
        let column = ["id", "age", "zip", "salary"][index % 4];
        draft.set_role(column, *role);
        let _ = draft.assign_default(column, Technique::Generalization);

        assert!(draft
            .techniques()
            .iter()
            .all(|assignment| draft.role_of(&assignment.column) != Some(ColumnRole::Identifier)));
    }
}

#[test]
fn test_technique_wire_format() {
    let assignment = TechniqueAssignment::new("age", TechniqueParameters::Generalization { bins: 5 });
    assert_eq!(
        serde_json::to_value(&assignment).unwrap(),
        json!({"column": "age", "technique": "generalization", "params": {"bins": 5, "levels": 5}})
    );

    let none = TechniqueAssignment::new("zip", TechniqueParameters::None);
    assert_eq!(
        serde_json::to_value(&none).unwrap(),
        json!({"column": "zip", "technique": "none", "params": {}})
    );

    let from_levels: TechniqueAssignment = serde_json::from_value(
        json!({"column": "city", "technique": "generalization", "params": {"levels": 3}}),
    )
    .unwrap();
    assert_eq!(
        from_levels.parameters,
        TechniqueParameters::Generalization { bins: 3 }
    );

    let without_params: TechniqueAssignment =
        serde_json::from_value(json!({"column": "salary", "technique": "differential_privacy"}))
            .unwrap();
    assert_eq!(
        without_params.parameters,
        TechniqueParameters::DifferentialPrivacy { epsilon: 1.0 }
    );

    assert!(serde_json::from_value::<TechniqueAssignment>(
        json!({"column": "salary", "technique": "suppression", "params": {"threshold": 3.0}})
    )
    .is_err());
    assert!(serde_json::from_value::<TechniqueAssignment>(
        json!({"column": "salary", "technique": "masking"})
    )
    .is_err());
}

#[test]
fn test_column_mapping_wire_format() {
    let mapping = ColumnMapping::new("zip", ColumnRole::QuasiIdentifier);
    assert_eq!(
        serde_json::to_value(&mapping).unwrap(),
        json!({"column": "zip", "type": "quasi-identifier"})
    );
}

#[test]
fn test_deserialize_draft_record_from_toml() {
    let record = r#"
        name = "Payroll release"

        [[columnMappings]]
        column = "id"
        type = "identifier"

        [[columnMappings]]
        column = "age"
        type = "quasi-identifier"

        [[techniques]]
        column = "age"
        technique = "generalization"
        [techniques.params]
        bins = 4

        [globalParams]
        k = 3
        l = 2
        t = 0.2
        epsilon = 1.0
    "#;

    let record: DraftRecord = toml::from_str(record).unwrap();
    assert_eq!(record.name, "Payroll release");
    assert_eq!(record.column_mappings.len(), 2);
    assert_eq!(record.column_mappings[0].role, ColumnRole::Identifier);
    assert_eq!(
        record.techniques[0].parameters,
        TechniqueParameters::Generalization { bins: 4 }
    );
    assert_eq!(record.global_params.k(), 3);
}

#[test]
fn test_draft_record_toml_round_trip() {
    let mut draft = scenario_draft();
    draft.set_role("id", ColumnRole::Identifier);
    draft.set_role("salary", ColumnRole::Sensitive);
    draft
        .assign("salary", TechniqueParameters::DifferentialPrivacy { epsilon: 0.5 })
        .unwrap();
    draft
        .assign("zip", TechniqueParameters::Suppression { threshold: 0.1 })
        .unwrap();
    draft.global_params_mut().set_t(0.3).unwrap();

    let record = draft.to_draft_record();
    let serialized = toml::to_string(&record).unwrap();
    let restored: DraftRecord = toml::from_str(&serialized).unwrap();

    assert_eq!(restored, record);
}

#[test]
fn test_apply_draft_record_reconciles_with_dataset() {
    let mut draft = scenario_draft();
    let record = DraftRecord {
        name: String::new(),
        column_mappings: vec![
            ColumnMapping::new("id", ColumnRole::Identifier),
            ColumnMapping::new("age", ColumnRole::QuasiIdentifier),
            ColumnMapping::new("dropped_column", ColumnRole::Sensitive),
        ],
        techniques: vec![
            TechniqueAssignment::with_defaults("id", Technique::Suppression),
            TechniqueAssignment::with_defaults("age", Technique::Generalization),
            TechniqueAssignment::with_defaults("dropped_column", Technique::Suppression),
        ],
        global_params: Default::default(),
    };

    draft.apply_draft_record(record);

    assert_eq!(draft.name(), "Config for patients");
    assert_eq!(draft.role_of("id"), Some(ColumnRole::Identifier));
    assert_eq!(draft.role_of("age"), Some(ColumnRole::QuasiIdentifier));
    assert_eq!(draft.role_of("zip"), Some(ColumnRole::NonSensitive));
    assert_eq!(draft.role_of("dropped_column"), None);
    assert_eq!(
        draft.techniques(),
        &[TechniqueAssignment::with_defaults("age", Technique::Generalization)]
    );
    assert!(draft.validate().is_ok());
}

#[test]
fn test_validate_rejects_empty_name() {
    let mut draft = scenario_draft();
    draft.set_name("   ");

    assert_eq!(draft.validate(), Err(ConfigError::EmptyName));
    assert!(draft.to_payload().is_err());
}

#[test]
fn test_scenario_payload() {
    let mut draft = scenario_draft();
    draft.set_role("id", ColumnRole::Identifier);
    draft.set_role("age", ColumnRole::QuasiIdentifier);
    draft.set_role("zip", ColumnRole::QuasiIdentifier);
    draft.set_role("salary", ColumnRole::Sensitive);
    draft
        .assign("age", TechniqueParameters::Generalization { bins: 5 })
        .unwrap();
    draft
        .assign("zip", TechniqueParameters::Generalization { bins: 3 })
        .unwrap();
    draft.global_params_mut().set_k(3).unwrap();

    let payload = draft.to_payload().unwrap();

    assert_eq!(payload.dataset_id, "ds-1");
    assert!(payload.techniques.iter().all(|assignment| assignment.column != "id"));
    assert_eq!(
        serde_json::to_value(&payload).unwrap()["global_params"],
        json!({"k": 3, "l": 2, "t": 0.2, "epsilon": 1.0})
    );
}

#[test]
fn test_wizard_navigation_is_permissive() {
    // An untouched draft can still walk to the last step.
    let draft = scenario_draft();
    let step = WizardStep::default().next().next();

    assert!(step.is_last());
    assert_eq!(step.next(), WizardStep::Parameters);
    assert_eq!(step.previous().previous(), WizardStep::ColumnMapping);
    assert_eq!(WizardStep::ColumnMapping.previous(), WizardStep::ColumnMapping);
    assert!(draft.validate().is_ok());
}

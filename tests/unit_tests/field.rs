use gemicro::field::{Component, Field, FieldMap};
use gemicro::ConfigurationError;

#[test]
fn component_validates_index() {
    assert_eq!(Component::new(2).unwrap(), Component::Z);
    assert_eq!(Component::new(3), Err(ConfigurationError::InvalidComponent { component: 3 }));
    assert_eq!(Component::try_from(1).unwrap().index(), 1);
    assert_eq!(usize::from(Component::X), 0);
    assert_eq!(Component::Y.to_string(), "1");
}

#[test]
fn component_deserialization_rejects_out_of_range_values() {
    let component: Component = serde_json::from_str("2").unwrap();
    assert_eq!(component, Component::Z);
    assert!(serde_json::from_str::<Component>("5").is_err());
    assert_eq!(serde_json::to_string(&Component::Y).unwrap(), "1");
}

#[test]
fn field_map_lookup() {
    let fields = FieldMap::new()
        .with_field(4, Field::Displacement(Component::X))
        .with_field(9, Field::NonlocalDamage);
    assert_eq!(fields.len(), 2);
    assert!(!fields.is_empty());
    assert_eq!(fields.field(9), Ok(Field::NonlocalDamage));
    assert_eq!(fields.field(5), Err(ConfigurationError::UnknownVariable { variable: 5 }));
    assert_eq!(fields.variable(Field::Displacement(Component::X)), Some(4));
    assert_eq!(fields.variable(Field::LoadParameter), None);
}

#[test]
fn field_map_insert_replaces_previous_assignment() {
    let mut fields = FieldMap::new();
    assert!(fields.is_empty());
    assert_eq!(fields.insert(1, Field::LoadParameter), None);
    assert_eq!(
        fields.insert(1, Field::MicroRotation(Component::Z)),
        Some(Field::LoadParameter)
    );
    assert_eq!(fields.field(1), Ok(Field::MicroRotation(Component::Z)));
}

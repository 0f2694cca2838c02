use diorama::{
    SceneError,
    scene::material::{MaterialLibrary, ObjectMaterial},
};

fn material(tag: &str, shininess: f32) -> ObjectMaterial {
    ObjectMaterial {
        tag: tag.to_string(),
        shininess,
        ..Default::default()
    }
}

#[test]
fn materials_are_found_by_tag() {
    let mut library = MaterialLibrary::new();
    library.define(material("wood", 0.3)).unwrap();
    library.define(material("shiny", 12.0)).unwrap();

    assert_eq!(library.find("shiny").map(|m| m.shininess), Some(12.0));
    assert_eq!(library.find("wood").map(|m| m.shininess), Some(0.3));
    assert!(library.find("glass").is_none());
    assert_eq!(
        library.iter().map(|m| m.tag.as_str()).collect::<Vec<_>>(),
        vec!["wood", "shiny"]
    );
}

#[test]
fn duplicate_material_is_rejected() {
    let mut library = MaterialLibrary::new();
    library.define(material("wood", 0.3)).unwrap();

    let err = library.define(material("wood", 5.0)).unwrap_err();

    assert!(matches!(err, SceneError::DuplicateMaterial(ref tag) if tag == "wood"));
    assert_eq!(library.len(), 1);
    assert_eq!(library.find("wood").map(|m| m.shininess), Some(0.3));
}

#[test]
fn missing_material_fields_default_to_zero() {
    let parsed: ObjectMaterial = ron::from_str(r#"(tag: "grass", shininess: 0.1)"#).unwrap();

    assert_eq!(parsed.ambient_color, [0.0; 3]);
    assert_eq!(parsed.ambient_strength, 0.0);
    assert_eq!(parsed.diffuse_color, [0.0; 3]);
    assert_eq!(parsed.specular_color, [0.0; 3]);
    assert_eq!(parsed.shininess, 0.1);
}

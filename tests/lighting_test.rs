use cgmath::Vector3;
use diorama::{
    SceneError,
    scene::{
        lighting::{LightSource, Lighting, MAX_LIGHT_SOURCES},
        uniforms::{self, LightField, UniformValue, light_uniform, parse_light_uniform},
    },
};

mod common;
use common::test_utils::Recorder;

fn sun() -> LightSource {
    LightSource {
        position: [35.0, 32.0, -1.0],
        ambient_color: [1.5, 1.5, 0.0],
        diffuse_color: [2.8, 2.8, 2.8],
        specular_color: [5.5, 5.5, 5.5],
        focal_strength: 10.0,
        specular_intensity: 2.5,
    }
}

#[test]
fn light_uniform_names_round_trip() {
    assert_eq!(
        light_uniform(2, LightField::SpecularIntensity),
        "lightSources[2].specularIntensity"
    );
    for index in 0..MAX_LIGHT_SOURCES {
        for field in LightField::ALL {
            assert_eq!(parse_light_uniform(&light_uniform(index, field)), Some((index, field)));
        }
    }
    assert_eq!(parse_light_uniform("lightSources[x].position"), None);
    assert_eq!(parse_light_uniform("lightSources[0].colour"), None);
    assert_eq!(parse_light_uniform("model"), None);
}

#[test]
fn apply_sets_switch_ambient_and_sources() {
    let lighting = Lighting {
        enabled: true,
        global_ambient: [0.2, 0.2, 0.0],
        sources: vec![sun()],
    };
    let mut shader = Recorder::new();

    lighting.apply(&mut shader).unwrap();

    assert_eq!(shader.uniform(uniforms::USE_LIGHTING), Some(UniformValue::Bool(true)));
    assert_eq!(
        shader.uniform(uniforms::GLOBAL_AMBIENT_COLOR),
        Some(UniformValue::Vec3(Vector3::new(0.2, 0.2, 0.0)))
    );
    assert_eq!(
        shader.uniform("lightSources[0].position"),
        Some(UniformValue::Vec3(Vector3::new(35.0, 32.0, -1.0)))
    );
    assert_eq!(
        shader.uniform("lightSources[0].focalStrength"),
        Some(UniformValue::Float(10.0))
    );
    assert_eq!(
        shader.uniform("lightSources[0].specularIntensity"),
        Some(UniformValue::Float(2.5))
    );
}

#[test]
fn unused_light_slots_are_zeroed() {
    let lighting = Lighting {
        sources: vec![sun()],
        ..Default::default()
    };
    let mut shader = Recorder::new();

    lighting.apply(&mut shader).unwrap();

    for index in 1..MAX_LIGHT_SOURCES {
        assert_eq!(
            shader.uniform(&light_uniform(index, LightField::DiffuseColor)),
            Some(UniformValue::Vec3(Vector3::new(0.0, 0.0, 0.0)))
        );
        assert_eq!(
            shader.uniform(&light_uniform(index, LightField::FocalStrength)),
            Some(UniformValue::Float(0.0))
        );
    }
    // switch + ambient + every field of every slot
    assert_eq!(shader.uniform_commands().len(), 2 + MAX_LIGHT_SOURCES * LightField::ALL.len());
}

#[test]
fn disabled_lighting_is_published() {
    let lighting = Lighting {
        enabled: false,
        ..Default::default()
    };
    let mut shader = Recorder::new();

    lighting.apply(&mut shader).unwrap();

    assert_eq!(shader.uniform(uniforms::USE_LIGHTING), Some(UniformValue::Bool(false)));
}

#[test]
fn five_sources_are_too_many() {
    let lighting = Lighting {
        sources: vec![sun(); 5],
        ..Default::default()
    };
    let mut shader = Recorder::new();

    let err = lighting.apply(&mut shader).unwrap_err();

    assert!(matches!(err, SceneError::TooManyLights { count: 5, max: 4 }));
    assert!(shader.commands.is_empty());
}

#[test]
fn lighting_defaults_to_enabled_when_omitted() {
    let lighting: Lighting = ron::from_str("(global_ambient: (0.1, 0.1, 0.1))").unwrap();
    assert!(lighting.enabled);
    assert!(lighting.sources.is_empty());
}

use glam::{Mat4, Quat, Vec3};
use super::*;

// ============================================================================
// Transform
// ============================================================================

#[test]
fn test_transform_default_is_identity() {
    assert_eq!(Transform::default().local_matrix(), Mat4::IDENTITY);
}

#[test]
fn test_transform_local_matrix_applies_scale_rotation_translation() {
    let transform = Transform::new(
        Vec3::new(10.0, 0.0, 0.0),
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        Vec3::splat(2.0),
    );

    // +X scaled to 2, rotated onto -Z, then moved by +10 X
    let point = transform.local_matrix().transform_point3(Vec3::X);
    assert!((point - Vec3::new(10.0, 0.0, -2.0)).length() < 1e-5);
}

#[test]
fn test_transform_from_matrix_roundtrip() {
    let transform = Transform::new(
        Vec3::new(1.0, 2.0, 3.0),
        Quat::from_rotation_x(0.3),
        Vec3::new(1.0, 2.0, 0.5),
    );
    let decomposed = Transform::from_matrix(&transform.local_matrix());

    assert!((decomposed.position - transform.position).length() < 1e-5);
    assert!((decomposed.scale - transform.scale).length() < 1e-5);
    assert!(decomposed.rotation.angle_between(transform.rotation) < 1e-4);
}

#[test]
fn test_transform_axes_follow_rotation() {
    let mut transform = Transform::default();
    assert_eq!(transform.forward(), Vec3::Z);

    transform.rotate(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
    assert!((transform.forward() - Vec3::X).length() < 1e-5);
    assert!((transform.up() - Vec3::Y).length() < 1e-5);
}

// ============================================================================
// Capabilities
// ============================================================================

#[test]
fn test_component_type_masks_are_distinct() {
    let all = ComponentType::Transform.mask()
        | ComponentType::Camera.mask()
        | ComponentType::Mesh.mask()
        | ComponentType::Material.mask();

    assert_eq!(all, ComponentMask::all());
    assert_eq!(Component::Mesh(MeshComponent::new("m", 3, 3)).component_type(), ComponentType::Mesh);
}

// ============================================================================
// Mesh / Material
// ============================================================================

#[test]
fn test_mesh_starts_render_eligible() {
    let mut mesh = MeshComponent::new("cube", 24, 36);
    assert!(mesh.is_render_eligible());

    mesh.set_render_eligible(false);
    assert!(!mesh.is_render_eligible());
}

#[test]
fn test_mesh_render_flag_is_not_persisted() {
    let mut mesh = MeshComponent::new("cube", 24, 36);
    mesh.set_render_eligible(false);

    let json = serde_json::to_string(&mesh).unwrap();
    assert!(!json.contains("render"));

    let restored: MeshComponent = serde_json::from_str(&json).unwrap();
    assert!(restored.is_render_eligible());
    assert_eq!(restored.index_count, 36);
}

#[test]
fn test_material_texture_is_optional() {
    let plain: MaterialComponent = serde_json::from_str(r#"{"Name": "Default"}"#).unwrap();
    assert_eq!(plain.texture_path, None);
    assert_eq!(plain.color, glam::Vec4::ONE);

    let textured = MaterialComponent::new("Brick").with_texture("Assets/brick.png");
    assert_eq!(textured.texture_path.as_deref(), Some("Assets/brick.png"));
}

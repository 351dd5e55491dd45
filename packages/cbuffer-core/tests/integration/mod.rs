//! End-to-end tests: declaration stream in, packed bytes out.

use anyhow::Result;
use cbuffer_core::declare::{layout_from_declarations, Declaration};
use cbuffer_core::{BufferRegistry, ConstantBuffer, ElementType, LayoutBuilder, LayoutManifest};
use rand::{Rng, SeedableRng};

/// A scene constant buffer the way a reflection producer would declare it,
/// with 16-byte packing decisions already made: the float3 light position
/// is padded out to 16 bytes before the color that follows it.
fn scene_declarations() -> Vec<Declaration> {
    vec![
        Declaration::value("view_projection", ElementType::Matrix4x4, 0),
        Declaration::structure(
            "light",
            64,
            vec![
                Declaration::value("position", ElementType::Float3, 0),
                Declaration::value("color", ElementType::Float4, 16),
                Declaration::value("intensity", ElementType::Float, 32),
            ],
        ),
        Declaration::value("time", ElementType::Float, 100),
        Declaration::value("frame_count", ElementType::Int, 104),
        Declaration::value("shadows_enabled", ElementType::Bool, 108),
    ]
}

#[test]
fn declared_buffer_round_trips_through_packed_bytes() -> Result<()> {
    let builder = layout_from_declarations(&scene_declarations())?;
    let mut buffer = ConstantBuffer::new(builder)?;

    // 64 + (12 + 4 + 16 + 4) = 100 for the struct, then the tail scalars.
    assert_eq!(buffer.layout().stride(), 112);
    assert_eq!(buffer.element_count(), 1);

    let mut identity = [[0.0f32; 4]; 4];
    for i in 0..4 {
        identity[i][i] = 1.0;
    }

    buffer
        .element_mut(0)?
        .field("view_projection")?
        .set(identity)?;
    buffer
        .element_mut(0)?
        .field("light")?
        .field("position")?
        .set([100.0f32, 200.0, 50.0])?;
    buffer
        .element_mut(0)?
        .field("light")?
        .field("color")?
        .set([1.0f32, 0.8, 0.5, 1.0])?;
    buffer
        .element_mut(0)?
        .field("light")?
        .field("intensity")?
        .set(550.0f32)?;
    buffer.element_mut(0)?.field("time")?.set(0.016f32)?;
    buffer.element_mut(0)?.field("frame_count")?.set(1234i32)?;
    buffer.element_mut(0)?.field("shadows_enabled")?.set(true)?;

    let element = buffer.element(0)?;
    let position: [f32; 3] = element.field("light")?.field("position")?.get()?;
    let intensity: f32 = element.field("light")?.field("intensity")?.get()?;
    let shadows: bool = element.field("shadows_enabled")?.get()?;
    assert_eq!(position, [100.0, 200.0, 50.0]);
    assert_eq!(intensity, 550.0);
    assert!(shadows);

    // Spot-check the packed bytes against the declared offsets.
    let bytes = buffer.bytes();
    assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes()); // identity[0][0]
    assert_eq!(&bytes[64..68], &100.0f32.to_le_bytes()); // light.position.x
    assert_eq!(&bytes[80..84], &1.0f32.to_le_bytes()); // light.color.r
    assert_eq!(&bytes[96..100], &550.0f32.to_le_bytes()); // light.intensity
    assert_eq!(&bytes[108..112], &[1, 0, 0, 0]); // shadows_enabled

    Ok(())
}

#[test]
fn dump_lists_every_declared_field() -> Result<()> {
    let layout = layout_from_declarations(&scene_declarations())?.finalize()?;
    let dump = layout.to_string();

    assert!(dump.contains("view_projection (offset: 0, size: 64, type: Matrix4x4)"));
    assert!(dump.contains("light (offset: 64, size: 36, type: Struct)"));
    assert!(dump.contains("  position (offset: 0, size: 12, type: Float3)"));
    assert!(dump.contains("  color (offset: 16, size: 16, type: Float4)"));
    assert!(dump.contains("type: Padding"));

    Ok(())
}

#[test]
fn multi_element_writes_stay_isolated() -> Result<()> {
    let mut builder = LayoutBuilder::new();
    builder.append(ElementType::Float, "value")?;
    builder.append(ElementType::Int, "index")?;

    const COUNT: usize = 16;
    let mut buffer = ConstantBuffer::with_elements(builder, COUNT)?;
    assert_eq!(buffer.element_count(), COUNT);

    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let values: Vec<f32> = (0..COUNT).map(|_| rng.gen_range(-1.0..1.0)).collect();

    for (index, value) in values.iter().enumerate() {
        buffer.element_mut(index)?.field("value")?.set(*value)?;
        buffer
            .element_mut(index)?
            .field("index")?
            .set(index as i32)?;
    }

    for (index, value) in values.iter().enumerate() {
        let element = buffer.element(index)?;
        assert_eq!(element.field("value")?.get::<f32>()?, *value);
        assert_eq!(element.field("index")?.get::<i32>()?, index as i32);
    }

    Ok(())
}

#[test]
fn manifest_rebuild_matches_original_bytes() -> Result<()> {
    let layout = layout_from_declarations(&scene_declarations())?.finalize()?;

    let json = serde_json::to_string_pretty(&LayoutManifest::from_layout(&layout))?;
    let manifest: LayoutManifest = serde_json::from_str(&json)?;
    let rebuilt = manifest.into_builder()?.finalize()?;

    assert_eq!(rebuilt.stride(), layout.stride());
    let original_light = layout.field_by_name("light")?;
    let rebuilt_light = rebuilt.field_by_name("light")?;
    assert_eq!(rebuilt_light.offset(), original_light.offset());
    assert_eq!(rebuilt_light.size(), original_light.size());

    Ok(())
}

#[test]
fn registry_holds_one_mirror_per_shader_buffer() -> Result<()> {
    let mut per_frame = LayoutBuilder::new();
    per_frame.append(ElementType::Matrix4x4, "view_projection")?;
    per_frame.append(ElementType::Float, "time")?;

    let mut per_object = LayoutBuilder::new();
    per_object.append(ElementType::Matrix4x4, "model")?;
    per_object.append(ElementType::Float4, "tint")?;

    let mut registry = BufferRegistry::new();
    registry.insert("per_frame", ConstantBuffer::new(per_frame)?)?;
    registry.insert("per_object", ConstantBuffer::new(per_object)?)?;

    registry
        .get_mut("per_object")
        .unwrap()
        .element_mut(0)?
        .field("tint")?
        .set([0.5f32, 0.5, 0.5, 1.0])?;

    let tint: [f32; 4] = registry
        .get("per_object")
        .unwrap()
        .element(0)?
        .field("tint")?
        .get()?;
    assert_eq!(tint, [0.5, 0.5, 0.5, 1.0]);
    assert_eq!(registry.get("per_frame").unwrap().layout().stride(), 68);

    Ok(())
}

#[test]
fn cloned_layout_drives_an_independent_buffer() -> Result<()> {
    let layout = layout_from_declarations(&scene_declarations())?.finalize()?;
    let clone = layout.clone();

    let mut first = ConstantBuffer::from_layout(layout, 1)?;
    let mut second = ConstantBuffer::from_layout(clone, 1)?;

    first.element_mut(0)?.field("time")?.set(1.0f32)?;
    second.element_mut(0)?.field("time")?.set(2.0f32)?;

    assert_eq!(first.element(0)?.field("time")?.get::<f32>()?, 1.0);
    assert_eq!(second.element(0)?.field("time")?.get::<f32>()?, 2.0);

    Ok(())
}

use crate::error::SeguiError;
use crate::model::{Component, LabelMap};

/// Paints components onto a zeroed `width` x `height` label map.
///
/// Each box is clipped to the canvas; boxes with nothing left after
/// clipping are skipped. Later components overwrite earlier ones where they
/// overlap.
pub fn rasterize(width: u32, height: u32, components: &[Component]) -> Result<LabelMap, SeguiError> {
    let mut labels = LabelMap::new(width, height);

    for component in components {
        let value = u8::try_from(component.class_id).map_err(|_| {
            SeguiError::configuration(format!(
                "class_id {} of '{}' does not fit an 8-bit label map",
                component.class_id, component.kind
            ))
        })?;

        let bbox = component.bbox;
        let x0 = bbox.x.max(0);
        let y0 = bbox.y.max(0);
        let x1 = bbox.right().min(width as i64);
        let y1 = bbox.bottom().min(height as i64);
        if x1 <= x0 || y1 <= y0 {
            continue;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                labels.set(x as u32, y as u32, value);
            }
        }
    }

    Ok(labels)
}

use crate::model::{LabelMap, IGNORE_INDEX};

use super::ClassMapping;

/// Remaps raw identifiers to their position in `mapping`.
///
/// Values not listed become [`IGNORE_INDEX`], so the output only holds
/// `0..mapping.len()` and the sentinel.
pub fn remap(labels: &LabelMap, mapping: &ClassMapping) -> LabelMap {
    labels.map_values(&remap_table(mapping))
}

/// Turns background 0 into the ignore index and shifts other classes down.
///
/// `0 -> 255`, `v -> v - 1` otherwise, and any result of 254 is coerced to
/// 255. Only a raw 255 can reach 254, so the sentinel maps to itself and
/// every legitimate class `1..=254` lands in `0..=253`.
pub fn reduce_zero_label(labels: &LabelMap) -> LabelMap {
    labels.map_values(&reduce_table())
}

/// Optional remap followed by optional background reduction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTransform {
    pub mapping: Option<ClassMapping>,
    pub reduce_zero_label: bool,
}

impl LabelTransform {
    pub fn new(mapping: Option<ClassMapping>, reduce_zero_label: bool) -> Self {
        Self {
            mapping,
            reduce_zero_label,
        }
    }

    /// Returns true if applying the transform changes nothing.
    pub fn is_identity(&self) -> bool {
        self.mapping.is_none() && !self.reduce_zero_label
    }

    /// Applies the remap first, then the reduction, in a single pass.
    pub fn apply(&self, labels: &LabelMap) -> LabelMap {
        if self.is_identity() {
            return labels.clone();
        }
        labels.map_values(&self.table())
    }

    /// The composed per-value lookup table.
    pub fn table(&self) -> [u8; 256] {
        let first = match &self.mapping {
            Some(mapping) => remap_table(mapping),
            None => identity_table(),
        };
        if !self.reduce_zero_label {
            return first;
        }
        let second = reduce_table();
        let mut composed = [0u8; 256];
        for (value, slot) in composed.iter_mut().enumerate() {
            *slot = second[first[value] as usize];
        }
        composed
    }
}

fn identity_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    for (value, slot) in table.iter_mut().enumerate() {
        *slot = value as u8;
    }
    table
}

fn remap_table(mapping: &ClassMapping) -> [u8; 256] {
    let mut table = [IGNORE_INDEX; 256];
    for (target, &raw) in mapping.ids().iter().enumerate() {
        table[raw as usize] = target as u8;
    }
    table
}

fn reduce_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    for (value, slot) in table.iter_mut().enumerate() {
        *slot = match value {
            0 => IGNORE_INDEX,
            v if v - 1 == 254 => IGNORE_INDEX,
            v => (v - 1) as u8,
        };
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(rows: &[&[u8]]) -> LabelMap {
        LabelMap::from_rows(rows).expect("label map")
    }

    #[test]
    fn remap_uses_positions_and_ignores_unmapped() {
        let mapping = ClassMapping::from_values([10, 20, 30]).expect("mapping");
        let out = remap(&map(&[&[10, 20, 30], &[99, 0, 20]]), &mapping);
        assert_eq!(out, map(&[&[0, 1, 2], &[255, 255, 1]]));
    }

    #[test]
    fn reduce_moves_background_to_ignore() {
        let out = reduce_zero_label(&map(&[&[0, 1, 2], &[254, 255, 7]]));
        assert_eq!(out, map(&[&[255, 0, 1], &[253, 255, 6]]));
    }

    #[test]
    fn reduce_twice_is_not_identity() {
        let once = reduce_zero_label(&map(&[&[0, 1]]));
        let twice = reduce_zero_label(&once);
        assert_eq!(once, map(&[&[255, 0]]));
        assert_eq!(twice, map(&[&[255, 255]]));
    }

    #[test]
    fn sentinel_survives_remap_then_reduce() {
        let transform = LabelTransform::new(
            Some(ClassMapping::from_values([10, 20]).expect("mapping")),
            true,
        );
        let input = LabelMap::filled(4, 3, IGNORE_INDEX);
        assert_eq!(transform.apply(&input), input);
    }

    #[test]
    fn composed_order_is_remap_then_reduce() {
        let transform = LabelTransform::new(
            Some(ClassMapping::from_values([0, 5, 9]).expect("mapping")),
            true,
        );
        // 0 -> 0 -> 255, 5 -> 1 -> 0, 9 -> 2 -> 1, 7 -> 255 -> 255
        let out = transform.apply(&map(&[&[0, 5, 9, 7]]));
        assert_eq!(out, map(&[&[255, 0, 1, 255]]));
    }

    #[test]
    fn transforms_leave_input_untouched() {
        let input = map(&[&[0, 1, 2]]);
        let snapshot = input.clone();
        let _ = reduce_zero_label(&input);
        let _ = remap(&input, &ClassMapping::from_values([2]).expect("mapping"));
        assert_eq!(input, snapshot);
    }

    #[test]
    fn empty_maps_pass_through() {
        let empty = LabelMap::new(0, 0);
        assert_eq!(reduce_zero_label(&empty), empty);
        assert_eq!(LabelTransform::new(None, true).apply(&empty), empty);
    }
}

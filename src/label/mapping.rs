use crate::error::SeguiError;
use crate::model::IGNORE_INDEX;

/// Ordered raw class identifiers; position is the target contiguous index.
///
/// Values are unique and never the ignore sentinel, so every target index
/// fits below it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassMapping {
    ids: Vec<u8>,
}

impl ClassMapping {
    pub fn new(ids: Vec<u8>) -> Result<Self, SeguiError> {
        let mut seen = [false; 256];
        for (position, &id) in ids.iter().enumerate() {
            if id == IGNORE_INDEX {
                return Err(SeguiError::configuration(format!(
                    "label_list entry {} is the ignore index {}",
                    position, IGNORE_INDEX
                )));
            }
            if seen[id as usize] {
                return Err(SeguiError::configuration(format!(
                    "label_list contains {} more than once",
                    id
                )));
            }
            seen[id as usize] = true;
        }
        Ok(Self { ids })
    }

    /// Converts wider integers, as read from configuration files.
    pub fn from_values<I>(values: I) -> Result<Self, SeguiError>
    where
        I: IntoIterator<Item = i64>,
    {
        let ids = values
            .into_iter()
            .map(|v| {
                u8::try_from(v).map_err(|_| {
                    SeguiError::configuration(format!(
                        "label_list value {} is outside 0..={}",
                        v,
                        IGNORE_INDEX - 1
                    ))
                })
            })
            .collect::<Result<Vec<u8>, _>>()?;
        Self::new(ids)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[u8] {
        &self.ids
    }

    /// Target index of a raw identifier, if mapped.
    pub fn target_of(&self, raw: u8) -> Option<u8> {
        self.ids.iter().position(|&id| id == raw).map(|p| p as u8)
    }
}

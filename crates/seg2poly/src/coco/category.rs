// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! COCO category id remapping.
//!
//! COCO instance annotations use ids 1..=90 of which only 80 are assigned.
//! Detector training expects a dense 0-based class index, so the 80 used ids
//! are mapped in ascending order to 0..=79.

use crate::Error;

/// Raw COCO ids of the 80 object categories, indexed by dense class.
pub const COCO80_CATEGORY_IDS: [u32; 80] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 27, 28,
    31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 46, 47, 48, 49, 50, 51, 52, 53, 54, 55,
    56, 57, 58, 59, 60, 61, 62, 63, 64, 65, 67, 70, 72, 73, 74, 75, 76, 77, 78, 79, 80, 81, 82, 84,
    85, 86, 87, 88, 89, 90,
];

/// Dense class for each raw COCO id, `None` for the 11 unused ids (0 and the
/// gaps 12, 26, 29, 30, 45, 66, 68, 69, 71, 83).
const COCO91_TO_80: [Option<u32>; 91] = {
    let mut table = [None; 91];
    let mut class = 0;
    while class < COCO80_CATEGORY_IDS.len() {
        table[COCO80_CATEGORY_IDS[class] as usize] = Some(class as u32);
        class += 1;
    }
    table
};

/// Map a raw COCO category id to its dense 0..=79 class index.
///
/// # Errors
/// [`Error::UnknownCategory`] when `category_id` is not one of the 80 ids.
///
/// # Example
/// ```
/// use seg2poly::coco::coco91_to_80;
///
/// assert_eq!(coco91_to_80(1).unwrap(), 0);
/// assert_eq!(coco91_to_80(90).unwrap(), 79);
/// assert!(coco91_to_80(12).is_err());
/// ```
pub fn coco91_to_80(category_id: u32) -> Result<u32, Error> {
    COCO91_TO_80
        .get(category_id as usize)
        .copied()
        .flatten()
        .ok_or(Error::UnknownCategory(category_id))
}

/// Map a dense class index back to its raw COCO category id.
pub fn coco80_to_91(class: u32) -> Option<u32> {
    COCO80_CATEGORY_IDS.get(class as usize).copied()
}

/// How raw category ids become label class indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryMapping {
    /// Fixed COCO 80 class table, see [`coco91_to_80`].
    #[default]
    Coco80,
    /// Raw category id is written unchanged, for datasets that already use
    /// dense ids.
    Identity,
}

impl CategoryMapping {
    pub fn class_index(&self, category_id: u32) -> Result<u32, Error> {
        match self {
            CategoryMapping::Coco80 => coco91_to_80(category_id),
            CategoryMapping::Identity => Ok(category_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const UNUSED: [u32; 10] = [12, 26, 29, 30, 45, 66, 68, 69, 71, 83];

    #[test]
    fn test_known_ids() {
        assert_eq!(coco91_to_80(1).unwrap(), 0);
        assert_eq!(coco91_to_80(11).unwrap(), 10);
        assert_eq!(coco91_to_80(13).unwrap(), 11);
        assert_eq!(coco91_to_80(27).unwrap(), 24);
        assert_eq!(coco91_to_80(46).unwrap(), 40);
        assert_eq!(coco91_to_80(67).unwrap(), 60);
        assert_eq!(coco91_to_80(84).unwrap(), 73);
        assert_eq!(coco91_to_80(90).unwrap(), 79);
    }

    #[test]
    fn test_roundtrip_is_bijective() {
        let mut seen = HashSet::new();
        for raw in 1..=90u32 {
            if let Ok(class) = coco91_to_80(raw) {
                assert!(class < 80);
                assert!(seen.insert(class), "class {} assigned twice", class);
                assert_eq!(coco80_to_91(class), Some(raw));
            }
        }
        assert_eq!(seen.len(), 80);
    }

    #[test]
    fn test_unknown_ids_fail() {
        for raw in UNUSED.iter().copied().chain([0, 91, 1000, u32::MAX]) {
            match coco91_to_80(raw) {
                Err(Error::UnknownCategory(id)) => assert_eq!(id, raw),
                other => panic!("expected lookup failure for {}, got {:?}", raw, other),
            }
        }
        assert_eq!(coco80_to_91(80), None);
    }

    #[test]
    fn test_identity_mapping() {
        assert_eq!(CategoryMapping::Identity.class_index(12).unwrap(), 12);
        assert!(CategoryMapping::Coco80.class_index(12).is_err());
    }
}

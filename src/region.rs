//! Surface regions: named face sets on a mesh object.
//!
//! Each object that carries regions owns one [`SurfaceRegions`]. A region is
//! a name plus a sorted set of face indices; faces are added and removed
//! from the host's face selection, which is passed in as a per-face mask.
//! One region is active at a time and the face operations act on it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Region bookkeeping failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    /// Region names may not be empty.
    EmptyName,
    /// Name contains something other than alphanumerics, `_`, `-`, `.`.
    IllegalName(String),
    /// Another region of this object already has the name.
    DuplicateName(String),
    /// No region with this name.
    Unknown(String),
    /// The object has no regions.
    NoActiveRegion,
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "region name is empty"),
            Self::IllegalName(name) => {
                write!(f, "illegal character in region name '{name}'")
            }
            Self::DuplicateName(name) => {
                write!(f, "duplicate region name '{name}'")
            }
            Self::Unknown(name) => write!(f, "no region named '{name}'"),
            Self::NoActiveRegion => write!(f, "object has no regions"),
        }
    }
}

impl std::error::Error for RegionError {}

/// A named set of mesh faces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    name: String,
    faces: BTreeSet<u32>,
}

impl Region {
    /// Region name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Face indices in ascending order.
    #[must_use]
    pub fn faces(&self) -> &BTreeSet<u32> {
        &self.faces
    }
}

/// Ordered list of regions on one object with an active cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceRegions {
    regions: Vec<Region>,
    active: usize,
}

fn validate_name(name: &str) -> Result<(), RegionError> {
    if name.is_empty() {
        return Err(RegionError::EmptyName);
    }
    let legal = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !legal {
        return Err(RegionError::IllegalName(name.to_owned()));
    }
    Ok(())
}

impl SurfaceRegions {
    /// No regions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Regions in insertion order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether there are no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    fn position(&self, name: &str) -> Result<usize, RegionError> {
        self.regions
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| RegionError::Unknown(name.to_owned()))
    }

    /// The active region, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Region> {
        self.regions.get(self.active)
    }

    /// Make `name` the active region.
    pub fn set_active(&mut self, name: &str) -> Result<(), RegionError> {
        self.active = self.position(name)?;
        Ok(())
    }

    /// Append an empty region and make it active.
    pub fn add(&mut self, name: &str) -> Result<&Region, RegionError> {
        validate_name(name)?;
        if self.get(name).is_some() {
            return Err(RegionError::DuplicateName(name.to_owned()));
        }
        self.regions.push(Region {
            name: name.to_owned(),
            faces: BTreeSet::new(),
        });
        self.active = self.regions.len() - 1;
        Ok(&self.regions[self.active])
    }

    /// Remove the named region. The cursor moves to the previous region.
    pub fn remove(&mut self, name: &str) -> Result<Region, RegionError> {
        let i = self.position(name)?;
        let region = self.regions.remove(i);
        if self.active >= i {
            self.active = self.active.saturating_sub(1);
        }
        Ok(region)
    }

    /// Remove the active region.
    pub fn remove_active(&mut self) -> Result<Region, RegionError> {
        let name = self
            .active()
            .map(|r| r.name.clone())
            .ok_or(RegionError::NoActiveRegion)?;
        self.remove(&name)
    }

    /// Rename a region, keeping its faces.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), RegionError> {
        let i = self.position(old)?;
        if old == new {
            return Ok(());
        }
        validate_name(new)?;
        if self.get(new).is_some() {
            return Err(RegionError::DuplicateName(new.to_owned()));
        }
        new.clone_into(&mut self.regions[i].name);
        Ok(())
    }

    fn active_mut(&mut self) -> Result<&mut Region, RegionError> {
        self.regions
            .get_mut(self.active)
            .ok_or(RegionError::NoActiveRegion)
    }

    /// Add every selected face to the active region. Returns how many
    /// faces were new.
    pub fn assign_selected(
        &mut self,
        selection: &[bool],
    ) -> Result<usize, RegionError> {
        let region = self.active_mut()?;
        let before = region.faces.len();
        region.faces.extend(selected_faces(selection));
        Ok(region.faces.len() - before)
    }

    /// Drop every selected face from the active region. Returns how many
    /// faces were removed.
    pub fn remove_selected(
        &mut self,
        selection: &[bool],
    ) -> Result<usize, RegionError> {
        let region = self.active_mut()?;
        let before = region.faces.len();
        for face in selected_faces(selection) {
            let _ = region.faces.remove(&face);
        }
        Ok(before - region.faces.len())
    }

    /// Mark the active region's faces as selected in `selection`.
    pub fn select_faces(
        &self,
        selection: &mut [bool],
    ) -> Result<(), RegionError> {
        self.mark_faces(selection, true)
    }

    /// Clear the active region's faces in `selection`.
    pub fn deselect_faces(
        &self,
        selection: &mut [bool],
    ) -> Result<(), RegionError> {
        self.mark_faces(selection, false)
    }

    fn mark_faces(
        &self,
        selection: &mut [bool],
        value: bool,
    ) -> Result<(), RegionError> {
        let region = self.active().ok_or(RegionError::NoActiveRegion)?;
        for &face in &region.faces {
            match selection.get_mut(face as usize) {
                Some(slot) => *slot = value,
                None => log::warn!(
                    "region '{}' refers to face {face} beyond the mesh ({} faces)",
                    region.name,
                    selection.len()
                ),
            }
        }
        Ok(())
    }
}

fn selected_faces(selection: &[bool]) -> impl Iterator<Item = u32> + '_ {
    selection
        .iter()
        .enumerate()
        .filter(|(_, &selected)| selected)
        .filter_map(|(i, _)| u32::try_from(i).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(len: usize, on: &[usize]) -> Vec<bool> {
        let mut m = vec![false; len];
        for &i in on {
            m[i] = true;
        }
        m
    }

    #[test]
    fn add_makes_region_active() {
        let mut regions = SurfaceRegions::new();
        let _ = regions.add("top").unwrap();
        let _ = regions.add("bottom").unwrap();
        assert_eq!(regions.active().unwrap().name(), "bottom");
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn names_are_validated() {
        let mut regions = SurfaceRegions::new();
        assert_eq!(regions.add(""), Err(RegionError::EmptyName));
        assert!(matches!(
            regions.add("has space"),
            Err(RegionError::IllegalName(_))
        ));
        let _ = regions.add("wall-1.a_b").unwrap();
        assert!(matches!(
            regions.add("wall-1.a_b"),
            Err(RegionError::DuplicateName(_))
        ));
    }

    #[test]
    fn assign_and_remove_selected_faces() {
        let mut regions = SurfaceRegions::new();
        let _ = regions.add("r").unwrap();

        assert_eq!(regions.assign_selected(&mask(8, &[5, 1, 3])).unwrap(), 3);
        assert_eq!(regions.assign_selected(&mask(8, &[3, 7])).unwrap(), 1);
        let faces: Vec<u32> = regions.get("r").unwrap().faces().iter().copied().collect();
        assert_eq!(faces, vec![1, 3, 5, 7]);

        assert_eq!(regions.remove_selected(&mask(8, &[3, 4])).unwrap(), 1);
        let faces: Vec<u32> = regions.get("r").unwrap().faces().iter().copied().collect();
        assert_eq!(faces, vec![1, 5, 7]);
    }

    #[test]
    fn select_and_deselect_mark_region_faces() {
        let mut regions = SurfaceRegions::new();
        let _ = regions.add("r").unwrap();
        let _ = regions.assign_selected(&mask(6, &[0, 4])).unwrap();

        let mut selection = mask(4, &[1]);
        regions.select_faces(&mut selection).unwrap();
        // Face 4 is beyond this (smaller) mesh and is skipped.
        assert_eq!(selection, vec![true, true, false, false]);
        regions.deselect_faces(&mut selection).unwrap();
        assert_eq!(selection, vec![false, true, false, false]);
    }

    #[test]
    fn remove_moves_cursor_back() {
        let mut regions = SurfaceRegions::new();
        for name in ["a", "b", "c"] {
            let _ = regions.add(name).unwrap();
        }
        regions.set_active("b").unwrap();
        assert_eq!(regions.remove_active().unwrap().name(), "b");
        assert_eq!(regions.active().unwrap().name(), "a");
        let _ = regions.remove("a").unwrap();
        assert_eq!(regions.active().unwrap().name(), "c");
        let _ = regions.remove("c").unwrap();
        assert_eq!(regions.remove_active(), Err(RegionError::NoActiveRegion));
        assert_eq!(
            regions.assign_selected(&[true]),
            Err(RegionError::NoActiveRegion)
        );
    }

    #[test]
    fn rename_keeps_faces() {
        let mut regions = SurfaceRegions::new();
        let _ = regions.add("old").unwrap();
        let _ = regions.add("other").unwrap();
        regions.set_active("old").unwrap();
        let _ = regions.assign_selected(&mask(3, &[2])).unwrap();

        assert!(matches!(
            regions.rename("old", "other"),
            Err(RegionError::DuplicateName(_))
        ));
        assert!(matches!(
            regions.rename("missing", "x"),
            Err(RegionError::Unknown(_))
        ));
        regions.rename("old", "new").unwrap();
        assert!(regions.get("old").is_none());
        assert!(regions.get("new").unwrap().faces().contains(&2));
    }

    #[test]
    fn regions_serialize_as_sorted_face_lists() {
        let mut regions = SurfaceRegions::new();
        let _ = regions.add("r").unwrap();
        let _ = regions.assign_selected(&mask(4, &[3, 0])).unwrap();
        let json = serde_json::to_value(&regions).unwrap();
        assert_eq!(json["regions"][0]["faces"], serde_json::json!([0, 3]));
    }
}

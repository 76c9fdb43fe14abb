//! Species records.
//!
//! Species rows are created by the admin tooling and destroyed through the
//! deletion flow in [`crate::deletion`]. There is no edit path here.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Image shown when a species has no image of its own.
pub const DEFAULT_IMAGE: &str = "/default-image.png";

/// Taxonomic kingdom. Stored and displayed by its Latin name.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Kingdom {
  Animalia,
  Plantae,
  Fungi,
  Protista,
  Archaea,
  Bacteria,
}

/// A stored species row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
  pub id:               i64,
  pub scientific_name:  String,
  pub common_name:      Option<String>,
  pub kingdom:          Kingdom,
  pub total_population: Option<i64>,
  pub description:      Option<String>,
  /// URL of an illustrative image.
  pub image:            Option<String>,
  /// Profile that created the row.
  pub author:           Uuid,
}

impl Species {
  /// The image URL to render, falling back to [`DEFAULT_IMAGE`].
  pub fn image_or_default(&self) -> &str {
    self.image.as_deref().unwrap_or(DEFAULT_IMAGE)
  }

  /// Population as shown to readers; `"Unknown"` when not recorded.
  pub fn population_label(&self) -> String {
    match self.total_population {
      Some(n) => n.to_string(),
      None => "Unknown".to_string(),
    }
  }
}

/// Input for [`BestiaryStore::add_species`](crate::store::BestiaryStore::add_species).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSpecies {
  pub scientific_name:  String,
  pub common_name:      Option<String>,
  pub kingdom:          Kingdom,
  pub total_population: Option<i64>,
  pub description:      Option<String>,
  pub image:            Option<String>,
  pub author:           Uuid,
}

impl NewSpecies {
  pub fn new(scientific_name: impl Into<String>, kingdom: Kingdom, author: Uuid) -> Self {
    Self {
      scientific_name: scientific_name.into(),
      common_name: None,
      kingdom,
      total_population: None,
      description: None,
      image: None,
      author,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn kingdom_parses_case_insensitively() {
    assert_eq!(Kingdom::from_str("plantae").unwrap(), Kingdom::Plantae);
    assert_eq!(Kingdom::from_str("FUNGI").unwrap(), Kingdom::Fungi);
    assert!(Kingdom::from_str("Minerals").is_err());
  }

  #[test]
  fn kingdom_display_matches_stored_name() {
    let all = [
      Kingdom::Animalia,
      Kingdom::Plantae,
      Kingdom::Fungi,
      Kingdom::Protista,
      Kingdom::Archaea,
      Kingdom::Bacteria,
    ];
    for k in all {
      assert_eq!(k.to_string(), k.as_ref());
      assert_eq!(Kingdom::from_str(k.as_ref()).unwrap(), k);
    }
  }

  #[test]
  fn missing_population_and_image_fall_back() {
    let mut s = Species {
      id:               1,
      scientific_name:  "Panthera leo".into(),
      common_name:      Some("Lion".into()),
      kingdom:          Kingdom::Animalia,
      total_population: None,
      description:      None,
      image:            None,
      author:           Uuid::nil(),
    };
    assert_eq!(s.population_label(), "Unknown");
    assert_eq!(s.image_or_default(), DEFAULT_IMAGE);

    s.total_population = Some(23_000);
    s.image = Some("https://example.com/lion.jpg".into());
    assert_eq!(s.population_label(), "23000");
    assert_eq!(s.image_or_default(), "https://example.com/lion.jpg");
  }
}

//! Species deletion.
//!
//! Removing a species is two independent statements: the species row, then
//! every comment that references it. Both are always attempted and neither
//! is rolled back if the other fails.

use serde::Serialize;

use crate::store::BestiaryStore;

/// Result of one step of [`delete_species`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
  Done { rows: usize },
  Failed { message: String },
}

impl StepOutcome {
  pub fn is_done(&self) -> bool { matches!(self, Self::Done { .. }) }

  fn from_result<E: std::fmt::Display>(result: Result<usize, E>) -> Self {
    match result {
      Ok(rows) => Self::Done { rows },
      Err(e) => Self::Failed { message: e.to_string() },
    }
  }
}

/// Per-step report of a species deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeciesDeletion {
  pub species_id: i64,
  pub species:    StepOutcome,
  pub comments:   StepOutcome,
}

impl SpeciesDeletion {
  pub fn is_complete(&self) -> bool {
    self.species.is_done() && self.comments.is_done()
  }
}

/// Delete a species row and then its comments.
///
/// Failures are captured in the returned report rather than propagated, so
/// the comment step still runs when the species step fails.
pub async fn delete_species<S: BestiaryStore>(store: &S, species_id: i64) -> SpeciesDeletion {
  let species = StepOutcome::from_result(store.delete_species(species_id).await);
  if let StepOutcome::Failed { message } = &species {
    tracing::warn!(species_id, %message, "species row was not deleted");
  }

  let comments =
    StepOutcome::from_result(store.delete_comments_for_species(species_id).await);
  if let StepOutcome::Failed { message } = &comments {
    tracing::warn!(species_id, %message, "comments for species were not deleted");
  }

  SpeciesDeletion { species_id, species, comments }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;
  use crate::{
    comment::NewComment,
    memory::{Fail, MemoryStore},
    species::{Kingdom, NewSpecies},
  };

  async fn seeded(n_comments: usize) -> (MemoryStore, i64) {
    let store = MemoryStore::default();
    let author = Uuid::new_v4();
    let species = store
      .add_species(NewSpecies::new("Ursus arctos", Kingdom::Animalia, author))
      .await
      .unwrap();
    for i in 0..n_comments {
      store
        .add_comment(NewComment {
          species_id:   species.id,
          author,
          display_name: "Alice".into(),
          comment:      format!("note {i}"),
        })
        .await
        .unwrap();
    }
    (store, species.id)
  }

  #[tokio::test]
  async fn removes_species_and_all_comments() {
    let (store, id) = seeded(4).await;

    let report = delete_species(&store, id).await;

    assert!(report.is_complete());
    assert_eq!(report.species, StepOutcome::Done { rows: 1 });
    assert_eq!(report.comments, StepOutcome::Done { rows: 4 });
    assert!(store.get_species(id).await.unwrap().is_none());
    assert!(store.list_comments(id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn leaves_other_species_comments_alone() {
    let (store, id) = seeded(2).await;
    let other = store
      .add_species(NewSpecies::new("Quercus robur", Kingdom::Plantae, Uuid::new_v4()))
      .await
      .unwrap();
    store
      .add_comment(NewComment {
        species_id:   other.id,
        author:       Uuid::new_v4(),
        display_name: "Bob".into(),
        comment:      "keep me".into(),
      })
      .await
      .unwrap();

    delete_species(&store, id).await;

    assert_eq!(store.list_comments(other.id).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn comment_step_runs_after_species_step_fails() {
    let (store, id) = seeded(3).await;
    store.fail(Fail::DeleteSpecies);

    let report = delete_species(&store, id).await;

    assert!(!report.is_complete());
    assert!(matches!(report.species, StepOutcome::Failed { .. }));
    assert_eq!(report.comments, StepOutcome::Done { rows: 3 });
    assert!(store.get_species(id).await.unwrap().is_some());
    assert!(store.list_comments(id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn comment_step_failure_is_reported_separately() {
    let (store, id) = seeded(2).await;
    store.fail(Fail::DeleteComments);

    let report = delete_species(&store, id).await;

    assert!(!report.is_complete());
    assert_eq!(report.species, StepOutcome::Done { rows: 1 });
    assert!(matches!(report.comments, StepOutcome::Failed { .. }));
    assert!(store.get_species(id).await.unwrap().is_none());
    assert_eq!(store.list_comments(id).await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn missing_species_is_not_an_error() {
    let store = MemoryStore::default();
    let report = delete_species(&store, 42).await;
    assert!(report.is_complete());
    assert_eq!(report.species, StepOutcome::Done { rows: 0 });
  }
}

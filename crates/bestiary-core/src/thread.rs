//! The comment thread shown on a species detail view.
//!
//! A [`CommentThread`] owns everything a single open detail view needs: the
//! viewer's display name, the fetched comments in display order, and the
//! draft text of a comment being written. Nothing is shared between threads;
//! each open re-fetches from the store.
//!
//! ```text
//!   Closed ──open()──▶ Loading ──▶ Ready
//!      ▲                  │
//!      │                  └──────▶ Failed(message)
//!      └────────── close() ───────────┘
//! ```

use uuid::Uuid;

use crate::{
  Error, Result,
  comment::{Comment, NewComment, SortOrder, sort_comments},
  store::BestiaryStore,
};

/// Where a thread is in its open/close lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadState {
  Closed,
  Loading,
  Ready,
  Failed(String),
}

/// A comment paired with whether the current viewer may delete it.
#[derive(Debug, Clone, Copy)]
pub struct CommentRow<'a> {
  pub comment:    &'a Comment,
  pub can_delete: bool,
}

#[derive(Debug, Clone)]
pub struct CommentThread {
  species_id:  i64,
  viewer:      Uuid,
  viewer_name: String,
  comments:    Vec<Comment>,
  order:       SortOrder,
  state:       ThreadState,
  draft:       String,
}

impl CommentThread {
  pub fn new(species_id: i64, viewer: Uuid) -> Self {
    Self {
      species_id,
      viewer,
      viewer_name: String::new(),
      comments: Vec::new(),
      order: SortOrder::default(),
      state: ThreadState::Closed,
      draft: String::new(),
    }
  }

  pub fn with_order(mut self, order: SortOrder) -> Self {
    self.order = order;
    self
  }

  pub fn species_id(&self) -> i64 { self.species_id }

  pub fn state(&self) -> &ThreadState { &self.state }

  pub fn order(&self) -> SortOrder { self.order }

  /// The viewer's display name; empty if it could not be fetched.
  pub fn viewer_name(&self) -> &str { &self.viewer_name }

  pub fn draft(&self) -> &str { &self.draft }

  pub fn set_draft(&mut self, text: impl Into<String>) { self.draft = text.into(); }

  /// Comments in the current display order.
  pub fn comments(&self) -> &[Comment] { &self.comments }

  /// Comments in display order, each with its delete affordance resolved.
  pub fn rows(&self) -> impl Iterator<Item = CommentRow<'_>> {
    self.comments.iter().map(|comment| CommentRow {
      comment,
      can_delete: comment.is_authored_by(self.viewer),
    })
  }

  /// Fetch the viewer's display name and the species' comments.
  ///
  /// The two fetches are independent: a missing or failing profile lookup is
  /// logged and leaves the name empty, while a failing comment fetch moves
  /// the thread to [`ThreadState::Failed`].
  pub async fn open<S: BestiaryStore>(&mut self, store: &S) -> Result<()> {
    self.state = ThreadState::Loading;

    match store.get_profile(self.viewer).await {
      Ok(Some(profile)) => self.viewer_name = profile.display_name,
      Ok(None) => {
        tracing::warn!(viewer = %self.viewer, "no profile for viewer");
        self.viewer_name.clear();
      }
      Err(e) => {
        tracing::warn!(viewer = %self.viewer, error = %e, "error fetching viewer display name");
        self.viewer_name.clear();
      }
    }

    match self.refresh(store).await {
      Ok(()) => {
        self.state = ThreadState::Ready;
        Ok(())
      }
      Err(e) => {
        self.state = ThreadState::Failed(e.to_string());
        Err(e)
      }
    }
  }

  /// Drop fetched state and return to [`ThreadState::Closed`]. The sort
  /// order is kept.
  pub fn close(&mut self) {
    self.comments.clear();
    self.viewer_name.clear();
    self.draft.clear();
    self.state = ThreadState::Closed;
  }

  /// Flip between oldest-first and newest-first without touching the store.
  pub fn toggle_order(&mut self) {
    self.order = self.order.toggled();
    sort_comments(&mut self.comments, self.order);
  }

  /// Post the current draft as a new comment.
  ///
  /// The author's display name is read fresh from their profile and copied
  /// into the row. Once the row is stored the draft is cleared and the call
  /// succeeds; a failing re-fetch after that only moves the thread to
  /// [`ThreadState::Failed`]. If nothing was stored the draft is left as it
  /// was.
  pub async fn post<S: BestiaryStore>(&mut self, store: &S) -> Result<Comment> {
    let text = self.draft.trim();
    if text.is_empty() {
      return Err(Error::EmptyComment);
    }

    let profile = store
      .get_profile(self.viewer)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ProfileNotFound(self.viewer))?;

    let comment = store
      .add_comment(NewComment {
        species_id:   self.species_id,
        author:       self.viewer,
        display_name: profile.display_name.clone(),
        comment:      text.to_string(),
      })
      .await
      .map_err(Error::store)?;

    tracing::info!(species_id = self.species_id, comment_id = comment.id, "comment posted");

    self.viewer_name = profile.display_name;
    self.draft.clear();
    if let Err(e) = self.refresh(store).await {
      tracing::warn!(species_id = self.species_id, error = %e, "error re-fetching comments after post");
      self.state = ThreadState::Failed(e.to_string());
    }
    Ok(comment)
  }

  /// Delete one of the viewer's comments and re-fetch.
  ///
  /// The store only removes the row when the species and author match, so a
  /// comment belonging to someone else yields `Ok(0)` and nothing changes.
  pub async fn delete<S: BestiaryStore>(&mut self, store: &S, comment_id: i64) -> Result<usize> {
    let removed = store
      .delete_comment(comment_id, self.species_id, self.viewer)
      .await
      .map_err(Error::store)?;

    if removed == 0 {
      tracing::debug!(comment_id, viewer = %self.viewer, "comment delete matched no rows");
    }

    self.refresh(store).await?;
    Ok(removed)
  }

  async fn refresh<S: BestiaryStore>(&mut self, store: &S) -> Result<()> {
    let mut comments = store
      .list_comments(self.species_id)
      .await
      .map_err(Error::store)?;
    sort_comments(&mut comments, self.order);
    self.comments = comments;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    memory::{Fail, MemoryStore},
    profile::NewProfile,
    species::{Kingdom, NewSpecies},
  };

  struct Fixture {
    store:   MemoryStore,
    species: i64,
    alice:   Uuid,
    bob:     Uuid,
  }

  async fn fixture() -> Fixture {
    let store = MemoryStore::default();
    let alice = store
      .add_profile(NewProfile {
        display_name:  "Alice".into(),
        email:         "alice@example.com".into(),
        biography:     None,
        password_hash: String::new(),
      })
      .await
      .unwrap()
      .id;
    let bob = store
      .add_profile(NewProfile {
        display_name:  "Bob".into(),
        email:         "bob@example.com".into(),
        biography:     None,
        password_hash: String::new(),
      })
      .await
      .unwrap()
      .id;
    let species = store
      .add_species(NewSpecies::new("Vulpes vulpes", Kingdom::Animalia, alice))
      .await
      .unwrap()
      .id;
    Fixture { store, species, alice, bob }
  }

  async fn post_as(f: &Fixture, who: Uuid, text: &str) -> Comment {
    let mut t = CommentThread::new(f.species, who);
    t.set_draft(text);
    t.post(&f.store).await.unwrap()
  }

  #[tokio::test]
  async fn open_moves_to_ready_and_loads_name() {
    let f = fixture().await;
    let mut t = CommentThread::new(f.species, f.alice);
    assert_eq!(t.state(), &ThreadState::Closed);

    t.open(&f.store).await.unwrap();

    assert_eq!(t.state(), &ThreadState::Ready);
    assert_eq!(t.viewer_name(), "Alice");
    assert!(t.comments().is_empty());
  }

  #[tokio::test]
  async fn open_survives_profile_failure() {
    let f = fixture().await;
    post_as(&f, f.bob, "hi").await;
    f.store.fail(Fail::GetProfile);

    let mut t = CommentThread::new(f.species, f.alice);
    t.open(&f.store).await.unwrap();

    assert_eq!(t.state(), &ThreadState::Ready);
    assert_eq!(t.viewer_name(), "");
    assert_eq!(t.comments().len(), 1);
  }

  #[tokio::test]
  async fn open_fails_when_comments_cannot_load() {
    let f = fixture().await;
    f.store.fail(Fail::ListComments);

    let mut t = CommentThread::new(f.species, f.alice);
    assert!(t.open(&f.store).await.is_err());
    assert!(matches!(t.state(), ThreadState::Failed(_)));

    f.store.heal(Fail::ListComments);
    t.open(&f.store).await.unwrap();
    assert_eq!(t.state(), &ThreadState::Ready);
  }

  #[tokio::test]
  async fn posting_hello_as_alice_adds_one_row() {
    let f = fixture().await;
    let mut t = CommentThread::new(f.species, f.alice);
    t.open(&f.store).await.unwrap();

    t.set_draft("hello");
    let posted = t.post(&f.store).await.unwrap();

    assert_eq!(posted.display_name, "Alice");
    assert_eq!(posted.comment, "hello");
    assert_eq!(posted.author, f.alice);
    assert_eq!(t.draft(), "");
    assert_eq!(t.comments().len(), 1);
    assert_eq!(t.comments()[0].id, posted.id);
    assert_eq!(f.store.list_comments(f.species).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn blank_draft_is_rejected_and_kept() {
    let f = fixture().await;
    let mut t = CommentThread::new(f.species, f.alice);
    t.set_draft("   ");

    assert!(matches!(t.post(&f.store).await, Err(Error::EmptyComment)));
    assert_eq!(t.draft(), "   ");
    assert!(f.store.list_comments(f.species).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn failed_post_keeps_draft() {
    let f = fixture().await;
    f.store.fail(Fail::AddComment);
    let mut t = CommentThread::new(f.species, f.alice);
    t.set_draft("will not land");

    assert!(matches!(t.post(&f.store).await, Err(Error::Store(_))));
    assert_eq!(t.draft(), "will not land");
  }

  #[tokio::test]
  async fn stored_comment_is_ok_even_if_refetch_fails() {
    let f = fixture().await;
    let mut t = CommentThread::new(f.species, f.alice);
    t.open(&f.store).await.unwrap();
    f.store.fail(Fail::ListComments);

    t.set_draft("hello");
    let posted = t.post(&f.store).await.unwrap();

    assert_eq!(posted.comment, "hello");
    assert_eq!(t.draft(), "");
    assert!(matches!(t.state(), ThreadState::Failed(_)));

    f.store.heal(Fail::ListComments);
    assert_eq!(f.store.list_comments(f.species).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn post_trims_surrounding_whitespace() {
    let f = fixture().await;
    let c = post_as(&f, f.alice, "  spotted at dusk \n").await;
    assert_eq!(c.comment, "spotted at dusk");
  }

  #[tokio::test]
  async fn delete_affordance_only_on_own_comments() {
    let f = fixture().await;
    post_as(&f, f.bob, "bob was here").await;
    post_as(&f, f.alice, "alice too").await;

    let mut t = CommentThread::new(f.species, f.alice);
    t.open(&f.store).await.unwrap();

    for row in t.rows() {
      assert_eq!(row.can_delete, row.comment.display_name == "Alice");
    }
    assert_eq!(t.rows().filter(|r| r.can_delete).count(), 1);
  }

  #[tokio::test]
  async fn toggling_twice_restores_order_without_refetch() {
    let f = fixture().await;
    for text in ["one", "two", "three"] {
      post_as(&f, f.alice, text).await;
    }

    let mut t = CommentThread::new(f.species, f.alice);
    t.open(&f.store).await.unwrap();
    let hits = f.store.list_hits();
    let original: Vec<i64> = t.comments().iter().map(|c| c.id).collect();
    assert_eq!(t.comments()[0].comment, "three");

    t.toggle_order();
    assert_eq!(t.order(), SortOrder::Ascending);
    assert_eq!(t.comments()[0].comment, "one");

    t.toggle_order();
    let restored: Vec<i64> = t.comments().iter().map(|c| c.id).collect();
    assert_eq!(restored, original);
    assert_eq!(f.store.list_hits(), hits);
  }

  #[tokio::test]
  async fn delete_own_comment_refreshes() {
    let f = fixture().await;
    let c = post_as(&f, f.alice, "mine").await;

    let mut t = CommentThread::new(f.species, f.alice);
    t.open(&f.store).await.unwrap();
    assert_eq!(t.delete(&f.store, c.id).await.unwrap(), 1);
    assert!(t.comments().is_empty());
  }

  #[tokio::test]
  async fn delete_someone_elses_comment_is_noop() {
    let f = fixture().await;
    let c = post_as(&f, f.bob, "not yours").await;

    let mut t = CommentThread::new(f.species, f.alice);
    t.open(&f.store).await.unwrap();
    assert_eq!(t.delete(&f.store, c.id).await.unwrap(), 0);
    assert_eq!(t.comments().len(), 1);
  }

  #[tokio::test]
  async fn delete_with_wrong_species_is_noop() {
    let f = fixture().await;
    let c = post_as(&f, f.alice, "elsewhere").await;

    let mut t = CommentThread::new(f.species + 1000, f.alice);
    assert_eq!(t.delete(&f.store, c.id).await.unwrap(), 0);
    assert_eq!(f.store.list_comments(f.species).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn close_drops_fetched_state() {
    let f = fixture().await;
    post_as(&f, f.alice, "x").await;
    let mut t = CommentThread::new(f.species, f.alice).with_order(SortOrder::Ascending);
    t.open(&f.store).await.unwrap();

    t.close();

    assert_eq!(t.state(), &ThreadState::Closed);
    assert!(t.comments().is_empty());
    assert_eq!(t.viewer_name(), "");
    assert_eq!(t.order(), SortOrder::Ascending);
  }
}

//! Page composition for each screen.

use axum::response::Html;
use bestiary_core::{
  profile::Profile,
  species::Species,
  thread::{CommentThread, ThreadState},
};

use crate::{html::Page, notice::Notice};

fn notice_slot(page: &mut Page, notice: Option<&Notice>) {
  if let Some(n) = notice {
    page.notice(n);
  }
}

// ─── Sign in ─────────────────────────────────────────────────────────────────

pub fn login(notice: Option<&Notice>, email: &str) -> Html<String> {
  let mut page = Page::new("Sign in", false);
  page.text_elem("h2", &[], "Bestiary");
  notice_slot(&mut page, notice);

  page.open("form", &[("method", "post"), ("action", "/login")]);
  page.text_elem("label", &[("for", "email")], "Email");
  page.void("input", &[
    ("id", "email"),
    ("name", "email"),
    ("type", "email"),
    ("value", email),
    ("required", "required"),
  ]);
  page.text_elem("label", &[("for", "password")], "Password");
  page.void("input", &[
    ("id", "password"),
    ("name", "password"),
    ("type", "password"),
    ("required", "required"),
  ]);
  page.text_elem("button", &[("type", "submit")], "Sign in");
  page.close("form");

  page.finish()
}

// ─── Species list ────────────────────────────────────────────────────────────

pub fn species_list(species: &[Species], notice: Option<&Notice>) -> Html<String> {
  let mut page = Page::new("Species", true);
  page.text_elem("h2", &[], "Species List");
  notice_slot(&mut page, notice);

  if species.is_empty() {
    page.text_elem("p", &[("class", "muted")], "No species recorded yet.");
  }

  page.open("div", &[("class", "cards")]);
  for s in species {
    page.open("div", &[("class", "card")]);
    page.void("img", &[("src", s.image_or_default()), ("alt", s.scientific_name.as_str()), ("width", "160")]);
    page.text_elem("h3", &[], &s.scientific_name);
    if let Some(common) = &s.common_name {
      page.text_elem("p", &[("class", "muted")], common);
    }
    if let Some(desc) = &s.description {
      page.text_elem("p", &[], desc);
    }
    page.link(&format!("/species/{}", s.id), "Learn More");
    page.text(" ");
    page.link(&format!("/species/{}/delete", s.id), "Delete");
    page.close("div");
  }
  page.close("div");

  page.finish()
}

// ─── Delete confirmation ─────────────────────────────────────────────────────

pub fn confirm_delete(species: &Species) -> Html<String> {
  let mut page = Page::new("Confirm Deletion", true);
  page.text_elem("h2", &[], "Confirm Deletion");
  page.text_elem("p", &[("class", "muted")], &species.scientific_name);
  page.text_elem(
    "p",
    &[],
    "Are you sure you want to delete this species? This action cannot be undone.",
  );
  page.link("/species", "Cancel");
  page.button_form(&format!("/species/{}/delete", species.id), "Delete", &[]);
  page.finish()
}

// ─── Detail with comments ────────────────────────────────────────────────────

pub fn species_detail(
  species: &Species,
  thread: &CommentThread,
  notice: Option<&Notice>,
) -> Html<String> {
  let mut page = Page::new(&species.scientific_name, true);
  notice_slot(&mut page, notice);

  page.text_elem("h2", &[], &species.scientific_name);
  if let Some(common) = &species.common_name {
    page.text_elem("p", &[("class", "muted")], common);
  }
  page.void("img", &[("src", species.image_or_default()), ("alt", species.scientific_name.as_str()), ("width", "320")]);
  page.text_elem(
    "p",
    &[("class", "muted")],
    &format!("Total Population: {}", species.population_label()),
  );
  page.text_elem("p", &[("class", "muted")], &format!("Kingdom: {}", species.kingdom));
  page.text_elem("h3", &[], "Description");
  page.text_elem("p", &[], species.description.as_deref().unwrap_or(""));

  page.text_elem("p", &[("class", "muted")], "Comments:");

  let base = format!("/species/{}", species.id);
  let order = thread.order();

  match thread.state() {
    ThreadState::Failed(message) => {
      page.notice(&Notice::destructive("Comments could not be loaded.", message.as_str()));
    }
    ThreadState::Closed | ThreadState::Loading => {
      page.text_elem("p", &[("class", "muted")], "Loading comments…");
    }
    ThreadState::Ready => {
      // Flipping the order reverses the rendered list in place; no request.
      page.void("input", &[("type", "checkbox"), ("id", "order-toggle"), ("class", "order-toggle")]);
      page.open("label", &[("for", "order-toggle"), ("class", "order-label")]);
      page.text_elem("span", &[("class", "order-current")], order.label());
      page.text_elem("span", &[("class", "order-flipped")], order.toggled().label());
      page.close("label");

      page.open("div", &[("class", "comments")]);
      for row in thread.rows() {
        let c = row.comment;
        page.open("div", &[("class", "comment")]);
        page.open("div", &[]);
        page.text_elem("strong", &[], &c.display_name);
        page.text_elem("p", &[("class", "muted")], &c.formatted_timestamp());
        page.text_elem("p", &[], &c.comment);
        page.close("div");
        if row.can_delete {
          page.button_form(
            &format!("{base}/comments/{}/delete", c.id),
            "Delete",
            &[("order", order.as_query())],
          );
        }
        page.close("div");
      }
      page.close("div");
    }
  }

  let post_action = format!("{base}/comments");
  page.open("form", &[("method", "post"), ("action", post_action.as_str())]);
  page.void("input", &[("type", "hidden"), ("name", "order"), ("value", order.as_query())]);
  page.void("input", &[
    ("name", "comment"),
    ("placeholder", "Add a comment..."),
    ("value", thread.draft()),
  ]);
  page.text_elem("button", &[("type", "submit")], "Post Comment");
  page.close("form");

  page.finish()
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub fn users(profiles: &[Profile]) -> Html<String> {
  let mut page = Page::new("Users", true);
  page.text_elem("h2", &[], "Users List");
  page.void("hr", &[]);

  page.open("div", &[("class", "cards")]);
  for p in profiles {
    page.open("div", &[("class", "card")]);
    page.text_elem("h3", &[], &p.display_name);
    page.text_elem("p", &[("class", "muted")], &p.email);
    if let Some(bio) = &p.biography {
      page.text_elem("p", &[("class", "muted")], bio);
    }
    page.close("div");
  }
  page.close("div");

  page.finish()
}

//! HTML generation.
//!
//! Pages are written with `quick-xml`'s writer, which escapes all text and
//! attribute values. Only HTML void elements (`meta`, `img`, `input`, …) are
//! ever written as empty tags.

use std::io::Cursor;

use axum::response::Html;
use quick_xml::{
  Writer,
  events::{BytesEnd, BytesStart, BytesText, Event},
};

use crate::notice::{Notice, NoticeVariant};

const STYLE: &str = "
body { font-family: system-ui, sans-serif; margin: 0 auto; max-width: 60rem; padding: 1rem; }
nav { display: flex; gap: 1rem; align-items: center; border-bottom: 1px solid #ddd; padding-bottom: .5rem; }
nav form { margin-left: auto; }
.notice { border: 1px solid #ccc; border-radius: .5rem; padding: .5rem 1rem; margin: 1rem 0; }
.notice.destructive { border-color: #c00; color: #900; }
.cards { display: flex; flex-wrap: wrap; gap: 1rem; }
.card { border: 1px solid #e5e5e5; border-radius: .5rem; padding: 1rem; width: 18rem; }
.comment { display: flex; justify-content: space-between; border: 2px solid #eee; border-radius: .25rem; padding: .5rem; margin-top: .5rem; }
.muted { color: #666; font-size: .875rem; }
.order-toggle { position: absolute; opacity: 0; }
.order-label { cursor: pointer; text-decoration: underline; }
.order-flipped, .order-toggle:checked + .order-label .order-current { display: none; }
.order-toggle:checked + .order-label .order-flipped { display: inline; }
.comments { display: flex; flex-direction: column; }
.order-toggle:checked ~ .comments { flex-direction: column-reverse; }
";

/// A single HTML document under construction.
pub struct Page {
  writer: Writer<Cursor<Vec<u8>>>,
}

impl Page {
  /// Start a document. When `signed_in` is set, the navigation bar with
  /// the sign-out button is included.
  pub fn new(title: &str, signed_in: bool) -> Self {
    let mut page = Self { writer: Writer::new(Cursor::new(Vec::new())) };

    page.emit(Event::DocType(BytesText::from_escaped("html")));
    page.open("html", &[("lang", "en")]);
    page.open("head", &[]);
    page.void("meta", &[("charset", "utf-8")]);
    page.void("meta", &[
      ("name", "viewport"),
      ("content", "width=device-width, initial-scale=1"),
    ]);
    page.text_elem("title", &[], &format!("{title} · Bestiary"));
    page.text_elem("style", &[], STYLE);
    page.close("head");
    page.open("body", &[]);

    if signed_in {
      page.open("nav", &[]);
      page.link("/species", "Species");
      page.link("/users", "Users");
      page.open("form", &[("method", "post"), ("action", "/logout")]);
      page.text_elem("button", &[("type", "submit")], "Sign out");
      page.close("form");
      page.close("nav");
    }

    page.open("main", &[]);
    page
  }

  fn emit(&mut self, event: Event<'_>) {
    self
      .writer
      .write_event(event)
      .expect("writing to an in-memory buffer");
  }

  pub fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) {
    let mut el = BytesStart::new(tag);
    for (k, v) in attrs {
      el.push_attribute((*k, *v));
    }
    self.emit(Event::Start(el));
  }

  pub fn close(&mut self, tag: &str) { self.emit(Event::End(BytesEnd::new(tag))); }

  /// A void element such as `<img>` or `<input>`.
  pub fn void(&mut self, tag: &str, attrs: &[(&str, &str)]) {
    let mut el = BytesStart::new(tag);
    for (k, v) in attrs {
      el.push_attribute((*k, *v));
    }
    self.emit(Event::Empty(el));
  }

  pub fn text(&mut self, text: &str) { self.emit(Event::Text(BytesText::new(text))); }

  pub fn text_elem(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) {
    self.open(tag, attrs);
    self.text(text);
    self.close(tag);
  }

  pub fn link(&mut self, href: &str, text: &str) {
    self.text_elem("a", &[("href", href)], text);
  }

  /// A form with a single submit button, optionally carrying hidden fields.
  pub fn button_form(&mut self, action: &str, label: &str, hidden: &[(&str, &str)]) {
    self.open("form", &[("method", "post"), ("action", action)]);
    for &(name, value) in hidden {
      self.void("input", &[("type", "hidden"), ("name", name), ("value", value)]);
    }
    self.text_elem("button", &[("type", "submit")], label);
    self.close("form");
  }

  pub fn notice(&mut self, notice: &Notice) {
    let class = match notice.variant {
      NoticeVariant::Default => "notice",
      NoticeVariant::Destructive => "notice destructive",
    };
    self.open("div", &[("class", class), ("role", "status")]);
    self.text_elem("strong", &[], &notice.title);
    self.text_elem("p", &[], &notice.description);
    self.close("div");
  }

  pub fn finish(mut self) -> Html<String> {
    self.close("main");
    self.close("body");
    self.close("html");
    let bytes = self.writer.into_inner().into_inner();
    Html(String::from_utf8_lossy(&bytes).into_owned())
  }
}

/// A bare page for error responses.
pub fn error_page(title: &str, message: &str) -> Html<String> {
  let mut page = Page::new(title, false);
  page.text_elem("h2", &[], title);
  page.text_elem("p", &[], message);
  page.link("/", "Back to start");
  page.finish()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn text_and_attributes_are_escaped() {
    let mut page = Page::new("Test", false);
    page.text_elem("p", &[("title", "a\"b")], "<script>alert(1)</script>");
    let Html(body) = page.finish();

    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(!body.contains("<script>"));
    assert!(body.contains("&lt;script&gt;"));
    assert!(body.contains("title=\"a&quot;b\""));
  }

  #[test]
  fn navigation_only_when_signed_in() {
    let Html(out) = Page::new("x", false).finish();
    assert!(!out.contains("/logout"));
    let Html(inside) = Page::new("x", true).finish();
    assert!(inside.contains("action=\"/logout\""));
  }

  #[test]
  fn destructive_notice_is_marked() {
    let mut page = Page::new("x", false);
    page.notice(&Notice::destructive("Something went wrong.", "boom"));
    let Html(body) = page.finish();
    assert!(body.contains("notice destructive"));
    assert!(body.contains("Something went wrong."));
    assert!(body.contains("boom"));
  }
}

//! HTML generation on top of `quick-xml`'s writer.
//!
//! Text and attribute values are escaped by construction. Elements are always
//! written with an explicit end tag except for HTML void elements (`input`,
//! `meta`), which are written self-closed.

use std::io::Cursor;

use quick_xml::{
  Writer,
  events::{BytesEnd, BytesStart, BytesText, Event},
};

use crate::error::Error;

pub type Attrs<'a> = &'a [(&'a str, &'a str)];

/// An HTML document under construction.
///
/// Writer failures are remembered and surfaced by [`Html::finish`], so
/// rendering code can chain calls without threading a `Result` through every
/// element.
pub struct Html {
  writer: Writer<Cursor<Vec<u8>>>,
  error:  Option<String>,
}

impl Default for Html {
  fn default() -> Self { Self::new() }
}

impl Html {
  /// A fragment, without a doctype.
  pub fn new() -> Self {
    Self {
      writer: Writer::new(Cursor::new(Vec::new())),
      error:  None,
    }
  }

  /// A full document, starting with `<!DOCTYPE html>`.
  pub fn document() -> Self {
    let mut html = Self::new();
    html.emit(Event::DocType(BytesText::from_escaped("html")));
    html
  }

  fn emit(&mut self, event: Event<'_>) {
    if self.error.is_some() {
      return;
    }
    if let Err(e) = self.writer.write_event(event) {
      self.error = Some(e.to_string());
    }
  }

  fn start_tag<'a>(tag: &'a str, attrs: Attrs<'_>) -> BytesStart<'a> {
    let mut start = BytesStart::new(tag);
    for &(k, v) in attrs {
      start.push_attribute((k, v));
    }
    start
  }

  pub fn open(&mut self, tag: &str, attrs: Attrs<'_>) -> &mut Self {
    self.emit(Event::Start(Self::start_tag(tag, attrs)));
    self
  }

  pub fn close(&mut self, tag: &str) -> &mut Self {
    self.emit(Event::End(BytesEnd::new(tag)));
    self
  }

  pub fn text(&mut self, text: &str) -> &mut Self {
    if !text.is_empty() {
      self.emit(Event::Text(BytesText::new(text)));
    }
    self
  }

  /// `<tag attrs>text</tag>`
  pub fn elem(&mut self, tag: &str, attrs: Attrs<'_>, text: &str) -> &mut Self {
    self.open(tag, attrs).text(text).close(tag)
  }

  /// A void element such as `<input>`.
  pub fn void(&mut self, tag: &str, attrs: Attrs<'_>) -> &mut Self {
    self.emit(Event::Empty(Self::start_tag(tag, attrs)));
    self
  }

  pub fn finish(self) -> Result<String, Error> {
    if let Some(e) = self.error {
      return Err(Error::Render(e));
    }
    String::from_utf8(self.writer.into_inner().into_inner())
      .map_err(|e| Error::Render(e.to_string()))
  }
}

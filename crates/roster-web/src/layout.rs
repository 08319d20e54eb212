//! The page shell: navigation, signed-in user, pending toasts.

use axum::response::Html as HtmlResponse;
use roster_core::{CurrentUser, resources::ALL};

use crate::{error::Result, html::Html};

/// Wrap `body` in the common page chrome.
pub fn page(
  title: &str,
  user: &CurrentUser,
  toasts: &[String],
  body: impl FnOnce(&mut Html),
) -> Result<HtmlResponse<String>> {
  let mut html = Html::document();
  html
    .open("html", &[("lang", "en")])
    .open("head", &[])
    .void("meta", &[("charset", "utf-8")])
    .elem("title", &[], title)
    .close("head")
    .open("body", &[]);

  html.open("nav", &[("class", "navbar")]);
  html.elem("a", &[("href", "/"), ("class", "navbar-brand")], "Roster");
  for desc in ALL {
    html.elem("a", &[("href", desc.route), ("class", "nav-link")], desc.title);
  }
  html.elem("span", &[("data-testid", "current-user")], &user.email);
  html.close("nav");

  for toast in toasts {
    html.elem("div", &[("class", "toast show"), ("data-testid", "toast")], toast);
  }

  html.open("main", &[("class", "container")]);
  body(&mut html);
  html.close("main").close("body").close("html");

  html.finish().map(HtmlResponse)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn shell_lists_resources_and_toasts() {
    let user = CurrentUser::new("a@ucsb.edu", false);
    let HtmlResponse(out) = page("Home", &user, &["saved".into()], |html| {
      html.elem("h1", &[], "Home");
    })
    .unwrap();

    assert!(out.starts_with("<!DOCTYPE html>"));
    assert!(out.contains("href=\"/ucsborganizations\""));
    assert!(out.contains("data-testid=\"toast\">saved</div>"));
    assert!(out.contains("a@ucsb.edu"));
    assert!(out.contains("<h1>Home</h1>"));
  }
}

//! Tag-based template rendering.
//!
//! Line formats and message bodies use `{name}` tags. Rendering is plain
//! text substitution: a tag is any `{` + alphanumeric name + `}` sequence,
//! so a literal brace run that happens to spell a tag name is
//! indistinguishable from the tag itself. Unresolved tags are stripped by
//! [`erase_tags`] as the last step before a line reaches a destination.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[a-zA-Z0-9]+\}").unwrap());

/// Replaces every occurrence of `{name}` with `value`, for each binding.
///
/// Substituted values are not rescanned for the tag being replaced, so a
/// value containing its own tag name cannot loop.
pub fn render<'a, I>(template: &str, bindings: I) -> String
where
  I: IntoIterator<Item = (&'a str, &'a str)>,
{
  let mut out = template.to_string();
  for (name, value) in bindings {
    let tag = format!("{{{}}}", name);
    if out.contains(&tag) {
      out = out.replace(&tag, value);
    }
  }
  out
}

/// Replaces successive `{}` slots with the next argument.
///
/// Surplus arguments are ignored; surplus slots stay literal.
pub fn render_positional(template: &str, args: &[String]) -> String {
  if args.is_empty() {
    return template.to_string();
  }
  let extra: usize = args.iter().map(String::len).sum();
  let mut out = String::with_capacity(template.len() + extra);
  let mut pieces = template.split("{}");
  if let Some(first) = pieces.next() {
    out.push_str(first);
  }
  let mut args = args.iter();
  for piece in pieces {
    match args.next() {
      Some(arg) => out.push_str(arg),
      None => out.push_str("{}"),
    }
    out.push_str(piece);
  }
  out
}

/// Deletes every tag-shaped substring.
pub fn erase_tags(input: &str) -> String {
  TAG_REGEX.replace_all(input, "").into_owned()
}

/// Literal presence test for `{name}`, used to skip preparing tag values
/// the active line format never asks for.
pub fn has_tag(template: &str, name: &str) -> bool {
  template.contains(&format!("{{{}}}", name))
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_render_replaces_every_occurrence() {
    assert_eq!(render("{a}-{a}", [("a", "x")]), "x-x");
  }

  #[test]
  fn test_render_leaves_unknown_tags_alone() {
    assert_eq!(render("{a} {b}", [("a", "x")]), "x {b}");
  }

  #[test]
  fn test_render_value_containing_own_tag_does_not_loop() {
    assert_eq!(render("{a}", [("a", "{a}!")]), "{a}!");
  }

  #[test]
  fn test_render_applies_bindings_in_order() {
    let out = render("{msg}", [("msg", "level={level}"), ("level", "I")]);
    assert_eq!(out, "level=I");
  }

  #[test]
  fn test_positional_fills_slots_left_to_right() {
    let args = vec!["1".to_string(), "two".to_string()];
    assert_eq!(render_positional("a={} b={}", &args), "a=1 b=two");
  }

  #[test]
  fn test_positional_surplus_slots_stay_literal() {
    let args = vec!["1".to_string()];
    assert_eq!(render_positional("{} {}", &args), "1 {}");
  }

  #[test]
  fn test_positional_surplus_args_are_ignored() {
    let args = vec!["1".to_string(), "2".to_string()];
    assert_eq!(render_positional("only {}", &args), "only 1");
  }

  #[test]
  fn test_positional_arg_value_is_not_rescanned() {
    let args = vec!["{}".to_string(), "x".to_string()];
    assert_eq!(render_positional("{}-{}", &args), "{}-x");
  }

  #[test]
  fn test_erase_tags_strips_unresolved_tags() {
    assert_eq!(erase_tags("{unknown}hi{nc}"), "hi");
    assert_eq!(erase_tags("no tags"), "no tags");
  }

  #[test]
  fn test_erase_tags_keeps_non_alphanumeric_braces() {
    assert_eq!(erase_tags("{not a tag} {}"), "{not a tag} {}");
  }

  #[test]
  fn test_has_tag() {
    assert!(has_tag("{level} x", "level"));
    assert!(!has_tag("x", "level"));
    assert!(!has_tag("{levels}", "level"));
  }
}

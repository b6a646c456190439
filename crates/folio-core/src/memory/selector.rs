//! Minimal CSS selector matching for the in-memory document.
//!
//! Supports comma-separated lists of compound selectors built from a tag
//! name, `.class`, `#id` and attribute predicates (`[a]`, `[a="v"]`,
//! `[a*="v"]`, `[a^="v"]`). Combinators are not supported.

#[derive(Debug, Clone, PartialEq)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq)]
struct AttrPredicate {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrPredicate>,
}

/// Element data a selector is matched against.
pub(crate) trait Matchable {
    fn tag(&self) -> &str;
    fn has_class(&self, class: &str) -> bool;
    fn attr(&self, name: &str) -> Option<&str>;
}

/// Parsed selector list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SelectorList {
    alternatives: Vec<Compound>,
}

impl SelectorList {
    /// Parse a selector. Returns `None` for syntax this matcher does not
    /// understand.
    pub(crate) fn parse(input: &str) -> Option<Self> {
        let alternatives = split_top_level(input)
            .into_iter()
            .map(|part| parse_compound(part.trim()))
            .collect::<Option<Vec<_>>>()?;

        if alternatives.is_empty() {
            return None;
        }
        Some(Self { alternatives })
    }

    pub(crate) fn matches<M: Matchable>(&self, el: &M) -> bool {
        self.alternatives.iter().any(|c| compound_matches(c, el))
    }
}

fn compound_matches<M: Matchable>(compound: &Compound, el: &M) -> bool {
    if let Some(tag) = &compound.tag {
        if !tag.eq_ignore_ascii_case(el.tag()) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if el.attr("id") != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|c| el.has_class(c)) {
        return false;
    }
    compound.attrs.iter().all(|pred| {
        let Some(value) = el.attr(&pred.name) else {
            return false;
        };
        match &pred.op {
            AttrOp::Exists => true,
            AttrOp::Equals(v) => value == v,
            AttrOp::Contains(v) => value.contains(v.as_str()),
            AttrOp::Prefix(v) => value.starts_with(v.as_str()),
        }
    })
}

/// Split on commas that are not inside brackets or quotes.
fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, ch) in input.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn parse_compound(input: &str) -> Option<Compound> {
    if input.is_empty() {
        return None;
    }

    let chars: Vec<char> = input.chars().collect();
    let mut compound = Compound::default();
    let mut i = 0;

    let read_ident = |i: &mut usize| -> Option<String> {
        let start = *i;
        while *i < chars.len() && is_ident_char(chars[*i]) {
            *i += 1;
        }
        (*i > start).then(|| chars[start..*i].iter().collect())
    };

    if chars[0] == '*' {
        i = 1;
    } else if chars[0].is_ascii_alphabetic() {
        compound.tag = Some(read_ident(&mut i)?);
    }

    while i < chars.len() {
        match chars[i] {
            '.' => {
                i += 1;
                compound.classes.push(read_ident(&mut i)?);
            }
            '#' => {
                i += 1;
                compound.id = Some(read_ident(&mut i)?);
            }
            '[' => {
                i += 1;
                let end = find_closing_bracket(&chars, i)?;
                compound.attrs.push(parse_attr(&chars[i..end])?);
                i = end + 1;
            }
            _ => return None,
        }
    }

    Some(compound)
}

fn find_closing_bracket(chars: &[char], from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (offset, &ch) in chars[from..].iter().enumerate() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, ']') => return Some(from + offset),
            _ => {}
        }
    }
    None
}

fn parse_attr(body: &[char]) -> Option<AttrPredicate> {
    let text: String = body.iter().collect();
    let text = text.trim();

    let (name, op, raw) = if let Some(pos) = text.find("*=") {
        (&text[..pos], "*=", &text[pos + 2..])
    } else if let Some(pos) = text.find("^=") {
        (&text[..pos], "^=", &text[pos + 2..])
    } else if let Some(pos) = text.find('=') {
        (&text[..pos], "=", &text[pos + 1..])
    } else {
        let name = text.to_string();
        if name.is_empty() || !name.chars().all(is_ident_char) {
            return None;
        }
        return Some(AttrPredicate {
            name,
            op: AttrOp::Exists,
        });
    };

    let name = name.trim();
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return None;
    }
    let value = unquote(raw.trim())?;
    let op = match op {
        "*=" => AttrOp::Contains(value),
        "^=" => AttrOp::Prefix(value),
        _ => AttrOp::Equals(value),
    };
    Some(AttrPredicate {
        name: name.to_string(),
        op,
    })
}

fn unquote(raw: &str) -> Option<String> {
    let mut chars = raw.chars();
    match chars.next() {
        Some(q @ ('"' | '\'')) => {
            let inner = &raw[1..];
            let end = inner.rfind(q)?;
            Some(inner[..end].to_string())
        }
        Some(_) if raw.chars().all(is_ident_char) => Some(raw.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fake {
        tag: &'static str,
        classes: Vec<&'static str>,
        attrs: HashMap<&'static str, &'static str>,
    }

    impl Matchable for Fake {
        fn tag(&self) -> &str {
            self.tag
        }
        fn has_class(&self, class: &str) -> bool {
            self.classes.contains(&class)
        }
        fn attr(&self, name: &str) -> Option<&str> {
            self.attrs.get(name).copied()
        }
    }

    fn link(href: &'static str) -> Fake {
        Fake {
            tag: "a",
            classes: vec!["nav__link"],
            attrs: HashMap::from([("href", href)]),
        }
    }

    #[test]
    fn test_class_and_attribute_equality() {
        let sel = SelectorList::parse(r##".nav__link[href="#projects"]"##).unwrap();
        assert!(sel.matches(&link("#projects")));
        assert!(!sel.matches(&link("#about")));
    }

    #[test]
    fn test_contains_and_prefix() {
        let contains = SelectorList::parse(r#"a[href*="github.com"]"#).unwrap();
        assert!(contains.matches(&link("https://github.com/x")));
        assert!(!contains.matches(&link("#home")));

        let prefix = SelectorList::parse(r##"a[href^="#"]"##).unwrap();
        assert!(prefix.matches(&link("#home")));
    }

    #[test]
    fn test_selector_list_with_quoted_comma() {
        let sel = SelectorList::parse(r#".section-header, a[title="a,b"]"#).unwrap();
        let titled = Fake {
            tag: "a",
            classes: vec![],
            attrs: HashMap::from([("title", "a,b")]),
        };
        assert!(sel.matches(&titled));
    }

    #[test]
    fn test_tag_with_attribute_presence() {
        let sel = SelectorList::parse("section[id]").unwrap();
        let section = Fake {
            tag: "section",
            classes: vec![],
            attrs: HashMap::from([("id", "about")]),
        };
        assert!(sel.matches(&section));
        assert!(!sel.matches(&link("#about")));
    }

    #[test]
    fn test_combinators_unsupported() {
        assert!(SelectorList::parse(".nav .nav__link").is_none());
        assert!(SelectorList::parse(".a > .b").is_none());
        assert!(SelectorList::parse("").is_none());
    }
}

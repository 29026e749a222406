//! Ordered, optionally named collections of lazy values.

use crate::lazy::LazyValue;
use crate::scope::ScopeChain;
use defer_ir::{Name, StringInterner};

/// A list of lazy values, each with an optional name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LazyDots {
    entries: Vec<(Option<Name>, LazyValue)>,
}

impl LazyDots {
    pub fn new() -> Self {
        LazyDots::default()
    }

    pub fn push(&mut self, name: Option<Name>, lazy: LazyValue) {
        self.entries.push((name, lazy));
    }

    #[must_use]
    pub fn with(mut self, name: Option<Name>, lazy: LazyValue) -> Self {
        self.push(name, lazy);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Option<Name>, &LazyValue)> {
        self.entries.iter().map(|(name, lazy)| (*name, lazy))
    }

    pub fn values(&self) -> impl Iterator<Item = &LazyValue> {
        self.entries.iter().map(|(_, lazy)| lazy)
    }

    /// First entry bound to `name`.
    pub fn get(&self, name: Name) -> Option<&LazyValue> {
        self.entries
            .iter()
            .find(|(n, _)| *n == Some(name))
            .map(|(_, lazy)| lazy)
    }

    /// The scope every entry shares, or `fallback` when the entries disagree
    /// or there are none.
    pub fn common_scope(&self, fallback: &ScopeChain) -> ScopeChain {
        let mut scopes = self.values().map(LazyValue::scope);
        let Some(first) = scopes.next() else {
            return fallback.clone();
        };
        if scopes.all(|scope| scope == first) {
            first.clone()
        } else {
            fallback.clone()
        }
    }

    /// Give every unnamed entry a name derived from its expression: a bare
    /// symbol names itself, anything else uses its deparsed text truncated to
    /// `width` characters.
    #[must_use]
    pub fn auto_named(&self, interner: &StringInterner, width: usize) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(name, lazy)| {
                let name = name.unwrap_or_else(|| {
                    lazy.expr()
                        .as_symbol()
                        .unwrap_or_else(|| interner.intern(&truncate(&lazy.deparse(interner), width)))
                });
                (Some(name), lazy.clone())
            })
            .collect();
        LazyDots { entries }
    }
}

impl FromIterator<(Option<Name>, LazyValue)> for LazyDots {
    fn from_iter<I: IntoIterator<Item = (Option<Name>, LazyValue)>>(iter: I) -> Self {
        LazyDots {
            entries: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<LazyValue> for LazyDots {
    fn from_iter<I: IntoIterator<Item = LazyValue>>(iter: I) -> Self {
        iter.into_iter().map(|lazy| (None, lazy)).collect()
    }
}

/// `text` if it fits in `width` characters, otherwise its prefix followed by
/// `...`, `width` characters in total.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Frame;
    use defer_parse::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("abcdef", 5), "ab...");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_auto_named_keeps_explicit_names() {
        let interner = StringInterner::new();
        let scope = ScopeChain::empty();
        let lazy = |s: &str| LazyValue::new(parse(s, &interner).unwrap(), scope.clone());
        let dots = LazyDots::new()
            .with(None, lazy("mpg"))
            .with(Some(interner.intern("ratio")), lazy("disp / cyl"))
            .with(None, lazy("mean(hp) * 2"))
            .with(None, lazy("a_very_long_variable_name + another_long_name"));

        let names: Vec<_> = dots
            .auto_named(&interner, 20)
            .iter()
            .map(|(name, _)| interner.lookup(name.unwrap()))
            .collect();
        assert_eq!(names, vec!["mpg", "ratio", "mean(hp) * 2", "a_very_long_varia..."]);
    }

    #[test]
    fn test_common_scope() {
        let interner = StringInterner::new();
        let root = ScopeChain::empty().child(Frame::new());
        let a = root.child(Frame::new());
        let b = root.child(Frame::new());
        let tree = parse("x", &interner).unwrap();

        let same: LazyDots = [LazyValue::new(tree.clone(), a.clone()), LazyValue::new(tree.clone(), a.clone())]
            .into_iter()
            .collect();
        assert_eq!(same.common_scope(&root), a);

        let mixed: LazyDots = [LazyValue::new(tree.clone(), a), LazyValue::new(tree, b)]
            .into_iter()
            .collect();
        assert_eq!(mixed.common_scope(&root), root);
        assert_eq!(LazyDots::new().common_scope(&root), root);
    }
}

//! Ordered, named rule chains.
//!
//! Each parsing pass walks its chain in order and stops at the first rule
//! that matches.  Extensions slot their rules in relative to a named core
//! rule, e.g. math goes before `fence` in the block chain and before
//! `escape` in the inline chain.

use smallvec::SmallVec;
use std::fmt::{self, Debug, Formatter};
use thiserror::Error;

/// Errors raised while editing a rule chain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulerError {
    /// The named rule does not exist in the chain.
    #[error("no rule named `{0}` in the chain")]
    UnknownRule(String),

    /// A rule with this name is already registered.
    #[error("a rule named `{0}` is already registered")]
    DuplicateRule(String),
}

#[derive(Clone)]
struct Rule<F> {
    name: &'static str,
    enabled: bool,
    alt: SmallVec<[&'static str; 2]>,
    func: F,
}

/// An ordered list of named rules of type `F`.
///
/// Besides the main chain, a rule may list alternate chains it also belongs
/// to.  The block pass uses the `paragraph` alternate chain to decide which
/// constructs may interrupt a paragraph.
#[derive(Clone)]
pub struct Ruler<F> {
    rules: Vec<Rule<F>>,
}

impl<F> Debug for Ruler<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.rules.iter().map(|rule| (rule.name, rule.enabled)))
            .finish()
    }
}

impl<F> Default for Ruler<F> {
    fn default() -> Self {
        Ruler { rules: Vec::new() }
    }
}

impl<F: Copy> Ruler<F> {
    /// An empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain holding `rules` in the given order.  Names must be distinct.
    pub(crate) fn with_rules(rules: &[(&'static str, F, &[&'static str])]) -> Self {
        let rules = rules
            .iter()
            .map(|&(name, func, alt)| Rule {
                name,
                enabled: true,
                alt: SmallVec::from_slice(alt),
                func,
            })
            .collect::<Vec<_>>();
        debug_assert!(rules
            .iter()
            .enumerate()
            .all(|(i, rule)| rules[..i].iter().all(|prior| prior.name != rule.name)));
        Ruler { rules }
    }

    /// Append a rule to the end of the chain.
    pub fn push(
        &mut self,
        name: &'static str,
        func: F,
        alt: &[&'static str],
    ) -> Result<(), RulerError> {
        let rule = self.make_rule(name, func, alt)?;
        self.rules.push(rule);
        Ok(())
    }

    /// Insert a rule directly before the rule named `anchor`.
    pub fn before(
        &mut self,
        anchor: &str,
        name: &'static str,
        func: F,
        alt: &[&'static str],
    ) -> Result<(), RulerError> {
        let ix = self.find(anchor)?;
        let rule = self.make_rule(name, func, alt)?;
        self.rules.insert(ix, rule);
        Ok(())
    }

    /// Insert a rule directly after the rule named `anchor`.
    pub fn after(
        &mut self,
        anchor: &str,
        name: &'static str,
        func: F,
        alt: &[&'static str],
    ) -> Result<(), RulerError> {
        let ix = self.find(anchor)?;
        let rule = self.make_rule(name, func, alt)?;
        self.rules.insert(ix + 1, rule);
        Ok(())
    }

    /// Re-enable a disabled rule.
    pub fn enable(&mut self, name: &str) -> Result<(), RulerError> {
        let ix = self.find(name)?;
        self.rules[ix].enabled = true;
        Ok(())
    }

    /// Disable a rule; it stays in place but is skipped by every chain.
    pub fn disable(&mut self, name: &str) -> Result<(), RulerError> {
        let ix = self.find(name)?;
        self.rules[ix].enabled = false;
        Ok(())
    }

    /// Names of all rules in order, enabled or not.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name)
    }

    /// The enabled rules of the main chain, in order.
    pub fn rules(&self) -> impl Iterator<Item = F> + '_ {
        self.rules
            .iter()
            .filter(|rule| rule.enabled)
            .map(|rule| rule.func)
    }

    /// The enabled rules that list `chain` among their alternates, in order.
    pub fn rules_for_chain<'r>(&'r self, chain: &'r str) -> impl Iterator<Item = F> + 'r {
        self.rules
            .iter()
            .filter(move |rule| rule.enabled && rule.alt.iter().any(|&alt| alt == chain))
            .map(|rule| rule.func)
    }

    fn find(&self, name: &str) -> Result<usize, RulerError> {
        self.rules
            .iter()
            .position(|rule| rule.name == name)
            .ok_or_else(|| RulerError::UnknownRule(name.to_string()))
    }

    fn make_rule(
        &self,
        name: &'static str,
        func: F,
        alt: &[&'static str],
    ) -> Result<Rule<F>, RulerError> {
        if self.find(name).is_ok() {
            return Err(RulerError::DuplicateRule(name.to_string()));
        }
        Ok(Rule {
            name,
            enabled: true,
            alt: SmallVec::from_slice(alt),
            func,
        })
    }
}

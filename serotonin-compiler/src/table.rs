//! The rule table: every definition in the program, in the order it was
//! loaded, indexed by head name.
//!
//! The table is append-only for the duration of a compilation. Staged
//! evaluation inserts its specialisations through the same interface, so
//! they participate in matching like any source rule.

use std::collections::HashMap;

use lasso::Spur;
use serotonin_parser::ast::{Definition, DefinitionKind, Expression, StackArg};
use serotonin_parser::Span;

pub type RuleId = usize;

#[derive(Debug, Clone)]
pub struct Rule {
    pub head: Spur,
    pub stack: Vec<StackArg>,
    pub kind: DefinitionKind,
    pub body: Vec<Expression>,
    pub span: Span,
}

impl Rule {
    pub fn arity(&self) -> usize {
        self.stack.len()
    }
}

impl From<Definition> for Rule {
    fn from(def: Definition) -> Self {
        Rule {
            head: def.name,
            stack: def.stack.unwrap_or_default(),
            kind: def.kind,
            body: def.body,
            span: def.span,
        }
    }
}

#[derive(Debug, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
    index: HashMap<Spur, Vec<RuleId>>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rule: Rule) -> RuleId {
        let id = self.rules.len();
        self.index.entry(rule.head).or_default().push(id);
        self.rules.push(rule);
        id
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id]
    }

    /// Every rule defined under `name`, in definition order. Matching
    /// walks the list backwards so that later rules shadow earlier ones.
    pub fn candidates(&self, name: Spur) -> Option<&[RuleId]> {
        self.index.get(&name).map(|ids| ids.as_slice())
    }

    pub fn contains(&self, name: Spur) -> bool {
        self.index.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}

#[cfg(test)]
mod test {
    use lasso::Rodeo;
    use serotonin_parser::ast::DefinitionKind;
    use serotonin_parser::Span;

    use super::{Rule, RuleTable};

    #[test]
    fn candidates_keep_definition_order() {
        let mut rodeo = Rodeo::default();
        let head = rodeo.get_or_intern("dup");

        let mut table = RuleTable::new();
        let first = table.insert(Rule {
            head,
            stack: Vec::new(),
            kind: DefinitionKind::Substitution,
            body: Vec::new(),
            span: Span::default(),
        });
        let second = table.insert(Rule {
            head,
            stack: Vec::new(),
            kind: DefinitionKind::Substitution,
            body: Vec::new(),
            span: Span::default(),
        });

        assert_eq!(table.candidates(head), Some(&[first, second][..]));
        assert!(table.candidates(rodeo.get_or_intern("swap")).is_none());
    }
}

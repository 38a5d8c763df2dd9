use super::{Ident, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Leaf and fallback expressions
    Column(Ident),
    QualifiedColumn { qualifier: Ident, name: Ident },
    Literal(Value),
    Param,
    Raw(String),

    // Operators and logical combinators
    Comparison {
        left: Box<Expr>,
        op: ComparisonOp,
        right: Box<Expr>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Is {
        expr: Box<Expr>,
        test: IsTest,
    },
    In {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    Paren(Box<Expr>),
    Function {
        name: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsTest {
    Null,
    NotNull,
}

impl Expr {
    pub fn column(name: impl Into<Ident>) -> Self {
        Self::Column(name.into())
    }

    pub fn qualified(qualifier: impl Into<Ident>, name: impl Into<Ident>) -> Self {
        Self::QualifiedColumn {
            qualifier: qualifier.into(),
            name: name.into(),
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    #[must_use]
    pub fn compare(self, op: ComparisonOp, right: Expr) -> Self {
        Self::Comparison {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn equals(self, right: Expr) -> Self {
        self.compare(ComparisonOp::Equal, right)
    }

    #[must_use]
    pub fn greater_than(self, right: Expr) -> Self {
        self.compare(ComparisonOp::GreaterThan, right)
    }

    #[must_use]
    pub fn and(self, right: Expr) -> Self {
        Self::And(Box::new(self), Box::new(right))
    }

    #[must_use]
    pub fn or(self, right: Expr) -> Self {
        Self::Or(Box::new(self), Box::new(right))
    }

    #[must_use]
    pub fn is_null(self) -> Self {
        Self::Is {
            expr: Box::new(self),
            test: IsTest::Null,
        }
    }

    /// Names of every column the expression references, in visit order,
    /// duplicates removed.
    #[must_use]
    pub fn referenced_columns(&self) -> Vec<&Ident> {
        let mut names = Vec::new();
        self.collect_columns(&mut names);
        names
    }

    fn collect_columns<'a>(&'a self, names: &mut Vec<&'a Ident>) {
        match self {
            Self::Column(name) | Self::QualifiedColumn { name, .. } => {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            Self::Literal(_) | Self::Param | Self::Raw(_) => {}
            Self::Comparison { left, right, .. } | Self::And(left, right) | Self::Or(left, right) => {
                left.collect_columns(names);
                right.collect_columns(names);
            }
            Self::Not(expr) | Self::Paren(expr) | Self::Is { expr, .. } => {
                expr.collect_columns(names);
            }
            Self::In { expr, list, .. } => {
                expr.collect_columns(names);
                for item in list {
                    item.collect_columns(names);
                }
            }
            Self::Function { args, .. } => {
                for arg in args {
                    arg.collect_columns(names);
                }
            }
        }
    }
}

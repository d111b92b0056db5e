//! Add/subtract and multiply/divide combinators.
//!
//! A combinator folds its inputs left to right, one operator per input,
//! starting from an initial value: `"*/"` over `[a, b]` computes
//! `(initial * a) / b`. Folding is elementwise with scalar broadcasting.

use sf_core::{CoreResult, Value};

use crate::error::{BlockError, BlockResult};

/// One step of a combinator fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    fn apply(self, acc: f64, v: f64) -> f64 {
        match self {
            Operator::Add => acc + v,
            Operator::Sub => acc - v,
            Operator::Mul => acc * v,
            Operator::Div => acc / v,
        }
    }
}

/// Which operators a combinator accepts, and its default seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    AddSub,
    MulDiv,
}

impl Family {
    pub fn name(self) -> &'static str {
        match self {
            Family::AddSub => "add/sub",
            Family::MulDiv => "mul/div",
        }
    }

    pub fn default_initial(self) -> f64 {
        match self {
            Family::AddSub => 0.0,
            Family::MulDiv => 1.0,
        }
    }

    fn parse(self, c: char) -> Option<Operator> {
        match (self, c) {
            (Family::AddSub, '+') => Some(Operator::Add),
            (Family::AddSub, '-') => Some(Operator::Sub),
            (Family::MulDiv, '*') => Some(Operator::Mul),
            (Family::MulDiv, '/') => Some(Operator::Div),
            _ => None,
        }
    }
}

/// Elementwise fold over the inputs of an arithmetic block.
#[derive(Debug, Clone, PartialEq)]
pub struct Combinator {
    family: Family,
    operators: Vec<Operator>,
    initial: f64,
}

impl Combinator {
    /// Parse an operator string such as `"+-"` or `"*/"`.
    pub fn new(family: Family, operators: &str) -> BlockResult<Self> {
        let operators = operators
            .chars()
            .map(|c| {
                family.parse(c).ok_or(BlockError::UnknownOperator {
                    op: c,
                    family: family.name(),
                })
            })
            .collect::<BlockResult<Vec<_>>>()?;
        Ok(Self {
            family,
            operators,
            initial: family.default_initial(),
        })
    }

    pub fn add_sub(operators: &str) -> BlockResult<Self> {
        Self::new(Family::AddSub, operators)
    }

    pub fn mul_div(operators: &str) -> BlockResult<Self> {
        Self::new(Family::MulDiv, operators)
    }

    /// Override the fold seed.
    pub fn with_initial(mut self, initial: f64) -> Self {
        self.initial = initial;
        self
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn initial(&self) -> f64 {
        self.initial
    }

    /// Number of inputs this combinator consumes.
    pub fn arity(&self) -> usize {
        self.operators.len()
    }

    pub fn operators(&self) -> String {
        self.operators.iter().map(|op| op.symbol()).collect()
    }

    pub fn apply(&self, inputs: &[Value]) -> CoreResult<Value> {
        let mut acc = Value::scalar(self.initial);
        for (op, v) in self.operators.iter().zip(inputs) {
            acc = acc.zip_with(v, self.family.name(), |a, b| op.apply(a, b))?;
        }
        Ok(acc)
    }
}

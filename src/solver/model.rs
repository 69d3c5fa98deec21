//! Selection model definition.

use super::variables::{VarId, Variable};

/// Relation of a linear constraint to its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Expression equals the bound.
    Eq,
    /// Expression is at most the bound.
    Le,
    /// Expression is at least the bound.
    Ge,
}

/// An integer linear expression: `sum(coeff * var) + constant`.
///
/// # Examples
///
/// ```
/// use papergen::solver::{LinearExpr, Relation, SelectionModel};
///
/// let mut model = SelectionModel::new();
/// let x = model.new_bool("x");
/// let y = model.new_bool("y");
/// model.add(LinearExpr::new().term(x, 1).term(y, 2), Relation::Le, 2);
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinearExpr {
    pub(crate) terms: Vec<(VarId, i64)>,
    pub(crate) constant: i64,
}

impl LinearExpr {
    /// Creates an empty expression (value 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a `coeff * var` term.
    pub fn term(mut self, var: VarId, coeff: i64) -> Self {
        self.terms.push((var, coeff));
        self
    }

    /// Adds a constant offset.
    pub fn plus(mut self, constant: i64) -> Self {
        self.constant += constant;
        self
    }

    /// Unit-coefficient sum of the given variables.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        let mut expr = Self::new();
        for v in vars {
            expr.terms.push((v, 1));
        }
        expr
    }

    /// Whether the expression carries no variable terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        Self::new().term(var, 1)
    }
}

/// A linear constraint `expr (relation) bound`.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    pub expr: LinearExpr,
    pub rel: Relation,
    pub bound: i64,
}

/// A boolean-selection constraint model.
///
/// Holds the decision variables, linear constraints, and an optional
/// minimization objective for one paper-generation run. Built fresh per
/// run and discarded after the assignment is read back; re-solving with
/// different parameters means rebuilding from scratch.
#[derive(Debug, Default)]
pub struct SelectionModel {
    pub(crate) vars: Vec<Variable>,
    pub(crate) constraints: Vec<LinearConstraint>,
    pub(crate) objective: Option<LinearExpr>,
}

impl SelectionModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a boolean (0/1) decision variable.
    pub fn new_bool(&mut self, name: impl Into<String>) -> VarId {
        self.vars.push(Variable {
            name: name.into(),
            lo: 0,
            hi: 1,
            is_bool: true,
        });
        VarId(self.vars.len() - 1)
    }

    /// Declares an integer variable with domain `[lo, hi]`.
    pub fn new_int(&mut self, name: impl Into<String>, lo: i64, hi: i64) -> VarId {
        self.vars.push(Variable {
            name: name.into(),
            lo,
            hi,
            is_bool: false,
        });
        VarId(self.vars.len() - 1)
    }

    /// Adds a linear constraint `expr (rel) bound`.
    pub fn add(&mut self, expr: LinearExpr, rel: Relation, bound: i64) {
        self.constraints.push(LinearConstraint { expr, rel, bound });
    }

    /// Sets the minimization objective, replacing any previous one.
    pub fn minimize(&mut self, expr: LinearExpr) {
        self.objective = Some(expr);
    }

    /// Number of declared variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Number of boolean decision variables.
    pub fn bool_var_count(&self) -> usize {
        self.vars.iter().filter(|v| v.is_bool).count()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Validates the model for consistency.
    ///
    /// Checks that all variable domains are non-empty and that every
    /// constraint and the objective reference declared variables.
    /// Constraints without variable terms are allowed; they degenerate
    /// to constant checks (a quota over an empty pool must surface as
    /// infeasibility at solve time, not as a modeling error).
    pub fn validate(&self) -> Result<(), String> {
        for var in &self.vars {
            if var.lo > var.hi {
                return Err(format!(
                    "empty domain [{}, {}] for variable `{}`",
                    var.lo, var.hi, var.name
                ));
            }
        }
        for (i, c) in self.constraints.iter().enumerate() {
            for &(var, _) in &c.expr.terms {
                if var.0 >= self.vars.len() {
                    return Err(format!("constraint #{i} references undeclared variable"));
                }
            }
        }
        if let Some(obj) = &self.objective {
            for &(var, _) in &obj.terms {
                if var.0 >= self.vars.len() {
                    return Err("objective references undeclared variable".into());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_creation() {
        let mut model = SelectionModel::new();
        let a = model.new_bool("a");
        let b = model.new_bool("b");
        let cnt = model.new_int("cnt", 0, 2);
        model.add(
            LinearExpr::sum([a, b]).term(cnt, -1),
            Relation::Eq,
            0,
        );
        model.minimize(cnt.into());

        assert_eq!(model.var_count(), 3);
        assert_eq!(model.bool_var_count(), 2);
        assert_eq!(model.constraint_count(), 1);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_empty_domain_rejected() {
        let mut model = SelectionModel::new();
        model.new_int("bad", 5, 3);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_constant_constraint_allowed() {
        let mut model = SelectionModel::new();
        model.new_bool("x");
        model.add(LinearExpr::new(), Relation::Ge, 1);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_foreign_var_rejected() {
        let mut model = SelectionModel::new();
        let mut other = SelectionModel::new();
        model.new_bool("x");
        other.new_bool("a");
        let foreign = other.new_bool("b");
        model.add(foreign.into(), Relation::Eq, 1);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_expr_helpers() {
        let mut model = SelectionModel::new();
        let x = model.new_bool("x");
        let expr = LinearExpr::from(x).plus(3);
        assert_eq!(expr.constant, 3);
        assert_eq!(expr.terms.len(), 1);
        assert!(LinearExpr::new().is_empty());
    }
}
